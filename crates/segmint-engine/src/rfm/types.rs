use chrono::NaiveDate;

/// Per-customer RFM metrics, one row per distinct customer_id.
///
/// `frequency` and `monetary` are both transaction counts. They are
/// accumulated independently on purpose: monetary is a count proxy standing
/// in for a real spend column the input schema does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerMetrics {
    pub customer_id: String,
    pub recency_days: i64,
    pub frequency: i64,
    pub monetary: i64,
    pub last_purchase: NaiveDate,
    pub first_branch: String,
    pub first_route: String,
}

/// A customer with quartile scores and an assigned segment. Derived once
/// per run from `CustomerMetrics` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCustomer {
    pub metrics: CustomerMetrics,
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    pub composite: String,
    pub composite_value: i64,
    pub segment: String,
}
