use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CompositeCount, ScoreData, ScoreFilters, ScoreSummary, ScoredCustomerRow, SegmentCount,
};
use crate::error::{EngineError, EngineResult};
use crate::export::write_scored_csv;
use crate::input::{parse_source, resolve_source};
use crate::rfm::date::{format_iso_date, parse_iso_date};
use crate::rfm::metrics::derive_metrics;
use crate::rfm::policy::{SEGMENT_POLICY_VERSION, SegmentPolicy};
use crate::rfm::score::score_customers;

#[derive(Debug, Default)]
pub struct ScoreRunOptions {
    pub path: Option<String>,
    /// Evaluation date, strict YYYY-MM-DD. Captured once and shared by every
    /// customer in the run.
    pub as_of: String,
    /// `pattern` or `range`.
    pub policy: String,
    /// Case-insensitive customer_id substring filter over the result rows.
    pub customer: Option<String>,
    /// Exact segment-label filter over the result rows.
    pub segment: Option<String>,
    /// When set, the full (unfiltered) scored table is also written here
    /// as CSV.
    pub out: Option<String>,
    /// Test seam for piped input.
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<&str>, as_of: &str, policy: &str) -> EngineResult<SuccessEnvelope> {
    run_with_options(ScoreRunOptions {
        path: path.map(std::string::ToString::to_string),
        as_of: as_of.to_string(),
        policy: policy.to_string(),
        ..ScoreRunOptions::default()
    })
}

pub fn run_with_options(options: ScoreRunOptions) -> EngineResult<SuccessEnvelope> {
    let as_of = parse_as_of(&options.as_of)?;
    let policy = SegmentPolicy::from_kind(&options.policy)?;

    let source = resolve_source(options.path.clone(), options.stdin_override)?;
    let transactions = parse_source(&source.content)?;
    log::debug!(
        "scoring {} transactions from {} as of {}",
        transactions.len(),
        source.kind.as_str(),
        format_iso_date(&as_of)
    );

    let metrics = derive_metrics(&transactions, as_of)?;
    let scored = score_customers(&metrics, &policy)?;

    let all_rows = scored
        .iter()
        .map(ScoredCustomerRow::from)
        .collect::<Vec<ScoredCustomerRow>>();

    let export_path = match options.out.as_deref() {
        Some(out) => {
            write_scored_csv(Path::new(out), &all_rows)?;
            Some(out.to_string())
        }
        None => None,
    };

    let segment_distribution = segment_counts(&all_rows);
    let composite_distribution = composite_counts(&all_rows);

    let filtered_rows = apply_filters(
        all_rows,
        options.customer.as_deref(),
        options.segment.as_deref(),
    );

    let data = ScoreData {
        as_of: format_iso_date(&as_of),
        policy: policy.kind_str().to_string(),
        policy_version: SEGMENT_POLICY_VERSION.to_string(),
        summary: ScoreSummary {
            transactions_read: transactions.len() as i64,
            customers_scored: scored.len() as i64,
            rows_returned: filtered_rows.len() as i64,
        },
        filters: ScoreFilters {
            customer: options.customer,
            segment: options.segment,
        },
        rows: filtered_rows,
        segment_distribution,
        composite_distribution,
        export_path,
    };

    success("score", data)
}

fn parse_as_of(value: &str) -> EngineResult<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| {
        EngineError::invalid_argument_with_recovery(
            &format!("`as-of` must use YYYY-MM-DD format with a real calendar date; got `{value}`."),
            vec!["Rerun with `segmint score <path> --as-of YYYY-MM-DD`.".to_string()],
        )
    })
}

/// Read-only result filters. They narrow the rendered rows and never feed
/// back into scoring.
fn apply_filters(
    rows: Vec<ScoredCustomerRow>,
    customer: Option<&str>,
    segment: Option<&str>,
) -> Vec<ScoredCustomerRow> {
    let customer_needle = customer.map(str::to_lowercase);

    rows.into_iter()
        .filter(|row| {
            if let Some(needle) = customer_needle.as_deref()
                && !row.customer_id.to_lowercase().contains(needle)
            {
                return false;
            }
            if let Some(label) = segment
                && row.segment != label
            {
                return false;
            }
            true
        })
        .collect()
}

fn segment_counts(rows: &[ScoredCustomerRow]) -> Vec<SegmentCount> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.segment.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(segment, customers)| SegmentCount {
            segment: segment.to_string(),
            customers,
        })
        .collect()
}

fn composite_counts(rows: &[ScoredCustomerRow]) -> Vec<CompositeCount> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.composite.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(composite, customers)| CompositeCount {
            composite: composite.to_string(),
            customers,
        })
        .collect()
}
