use crate::error::EngineResult;
use crate::rfm::policy::SegmentPolicy;
use crate::rfm::quartile::{Metric, quartile_scores};
use crate::rfm::types::{CustomerMetrics, ScoredCustomer};

/// Scores every customer and assigns a segment under the given policy.
///
/// The output carries exactly the customer_ids of the input, sorted by
/// customer_id. Pure function of the metrics table and the policy: scoring
/// the same table twice yields identical output.
pub fn score_customers(
    metrics: &[CustomerMetrics],
    policy: &SegmentPolicy,
) -> EngineResult<Vec<ScoredCustomer>> {
    policy.validate()?;

    let mut ordered = metrics.to_vec();
    ordered.sort_by(|left, right| left.customer_id.cmp(&right.customer_id));

    let recency = ordered.iter().map(|m| m.recency_days).collect::<Vec<i64>>();
    let frequency = ordered.iter().map(|m| m.frequency).collect::<Vec<i64>>();
    let monetary = ordered.iter().map(|m| m.monetary).collect::<Vec<i64>>();

    let r_scores = quartile_scores(&recency, Metric::Recency)?;
    let f_scores = quartile_scores(&frequency, Metric::Frequency)?;
    let m_scores = quartile_scores(&monetary, Metric::Monetary)?;

    let scored = ordered
        .into_iter()
        .enumerate()
        .map(|(index, customer)| {
            let r = r_scores[index];
            let f = f_scores[index];
            let m = m_scores[index];
            let composite = format!("{r}{f}{m}");
            let composite_value = i64::from(r) * 100 + i64::from(f) * 10 + i64::from(m);
            let segment = policy.classify(r, f, m, composite_value);

            ScoredCustomer {
                metrics: customer,
                r_score: r,
                f_score: f,
                m_score: m,
                composite,
                composite_value,
                segment,
            }
        })
        .collect::<Vec<ScoredCustomer>>();

    log::debug!(
        "scored {} customers under the {} policy",
        scored.len(),
        policy.kind_str()
    );

    Ok(scored)
}
