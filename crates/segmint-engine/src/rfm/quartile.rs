use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};

/// Which RFM metric a value column belongs to. Direction differs by metric:
/// the most recent customers (smallest recency) score 4, while the most
/// frequent and highest-monetary customers (largest values) score 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Recency,
    Frequency,
    Monetary,
}

impl Metric {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recency => "recency",
            Self::Frequency => "frequency",
            Self::Monetary => "monetary",
        }
    }

    const fn smallest_scores_highest(self) -> bool {
        matches!(self, Self::Recency)
    }
}

/// Assigns each value an ordinal quartile score in 1..=4 using
/// equal-population binning over the empirical distribution. Ties at a
/// boundary fall by rank order (position in the input breaks ties), matching
/// standard quantile-cut semantics.
///
/// Fails with a degenerate-distribution error instead of collapsing bins:
/// fewer than 4 values, or fewer than 4 distinct values, cannot fill 4
/// non-empty quartiles without corrupting composite-score cardinality.
pub fn quartile_scores(values: &[i64], metric: Metric) -> EngineResult<Vec<u8>> {
    let population = values.len();
    let distinct = values.iter().collect::<BTreeSet<&i64>>().len();
    if population < 4 || distinct < 4 {
        return Err(EngineError::degenerate_distribution(
            metric.as_str(),
            population,
            distinct,
        ));
    }

    let mut order = (0..population).collect::<Vec<usize>>();
    order.sort_by_key(|&index| (values[index], index));

    let mut scores = vec![0u8; population];
    for (rank, &index) in order.iter().enumerate() {
        let quartile = (rank * 4 / population) as u8;
        scores[index] = if metric.smallest_scores_highest() {
            4 - quartile
        } else {
            quartile + 1
        };
    }

    Ok(scores)
}
