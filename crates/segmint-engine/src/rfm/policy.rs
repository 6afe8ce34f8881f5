use crate::error::{EngineError, EngineResult};

/// Deterministic segment-policy identifier, emitted with score results so
/// future table changes remain auditable.
pub const SEGMENT_POLICY_VERSION: &str = "segments/v1";

pub const COMPOSITE_MIN: i64 = 111;
pub const COMPOSITE_MAX: i64 = 444;

/// Exact (r, f, m) rule for the pattern policy. First match wins.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub r: u8,
    pub f: u8,
    pub m: u8,
    pub segment: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternPolicy {
    pub rules: &'static [PatternRule],
    pub default_segment: &'static str,
}

/// Inclusive composite-value bucket for the range policy.
#[derive(Debug, Clone, Copy)]
pub struct RangeBucket {
    pub lower: i64,
    pub upper: i64,
    pub segment: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct RangePolicy {
    pub buckets: &'static [RangeBucket],
}

/// v1 pattern table. Rules are keyed to the engine's score direction
/// (r=4 means most recent), so the top-tier triple (4,4,4) lands on
/// "Best Customers". Sparse coverage with an explicit "Other" default is
/// intentional: only 8 of the 64 triples carry a named segment.
pub const PATTERN_POLICY_V1: PatternPolicy = PatternPolicy {
    rules: &[
        PatternRule { r: 4, f: 4, m: 4, segment: "Best Customers" },
        PatternRule { r: 3, f: 4, m: 4, segment: "Loyal Customers" },
        PatternRule { r: 3, f: 3, m: 3, segment: "Potential Loyalists" },
        PatternRule { r: 4, f: 1, m: 1, segment: "New Customers" },
        PatternRule { r: 3, f: 1, m: 1, segment: "Recent Customers" },
        PatternRule { r: 2, f: 2, m: 2, segment: "At Risk" },
        PatternRule { r: 1, f: 3, m: 3, segment: "Churned" },
        PatternRule { r: 1, f: 1, m: 1, segment: "Lost Customers" },
    ],
    default_segment: "Other",
};

/// v1 range table over the 3-digit composite value. Inclusive-lowest
/// boundaries; the top bucket closes at the maximum attainable composite.
pub const RANGE_POLICY_V1: RangePolicy = RangePolicy {
    buckets: &[
        RangeBucket { lower: 111, upper: 199, segment: "Lost Customers" },
        RangeBucket { lower: 200, upper: 299, segment: "At-Risk Customers" },
        RangeBucket { lower: 300, upper: 399, segment: "Potential Loyalists" },
        RangeBucket { lower: 400, upper: 444, segment: "Loyal Customers" },
    ],
};

/// The two classification strategies. Both read the same three ordinal
/// scores; they are never blended within a run.
#[derive(Debug, Clone, Copy)]
pub enum SegmentPolicy {
    Pattern(PatternPolicy),
    Range(RangePolicy),
}

impl SegmentPolicy {
    pub const fn pattern_v1() -> Self {
        Self::Pattern(PATTERN_POLICY_V1)
    }

    pub const fn range_v1() -> Self {
        Self::Range(RANGE_POLICY_V1)
    }

    pub fn from_kind(kind: &str) -> EngineResult<Self> {
        match kind {
            "pattern" => Ok(Self::pattern_v1()),
            "range" => Ok(Self::range_v1()),
            other => Err(EngineError::invalid_argument(&format!(
                "Unknown segment policy `{other}`. Use `pattern` or `range`."
            ))),
        }
    }

    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "pattern",
            Self::Range(_) => "range",
        }
    }

    /// Checks the table before any customer is classified: every reachable
    /// (r, f, m) triple, or every composite value in [111, 444], must resolve
    /// to exactly one segment.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::Pattern(pattern) => validate_pattern(pattern),
            Self::Range(range) => validate_range(range),
        }
    }

    pub fn classify(&self, r: u8, f: u8, m: u8, composite_value: i64) -> String {
        match self {
            Self::Pattern(pattern) => pattern
                .rules
                .iter()
                .find(|rule| rule.r == r && rule.f == f && rule.m == m)
                .map(|rule| rule.segment)
                .unwrap_or(pattern.default_segment)
                .to_string(),
            Self::Range(range) => range
                .buckets
                .iter()
                .find(|bucket| composite_value >= bucket.lower && composite_value <= bucket.upper)
                .map(|bucket| bucket.segment)
                // validate() guarantees full coverage; this arm is for the
                // type system, not for reachable input.
                .unwrap_or("Other")
                .to_string(),
        }
    }
}

fn validate_pattern(pattern: &PatternPolicy) -> EngineResult<()> {
    if pattern.default_segment.trim().is_empty() {
        return Err(EngineError::classification_config_invalid(
            "pattern",
            "default segment label is empty",
        ));
    }

    let mut seen = Vec::new();
    for rule in pattern.rules {
        let digits_ok = [rule.r, rule.f, rule.m]
            .iter()
            .all(|digit| (1..=4).contains(digit));
        if !digits_ok {
            return Err(EngineError::classification_config_invalid(
                "pattern",
                &format!("rule ({},{},{}) uses digits outside 1..=4", rule.r, rule.f, rule.m),
            ));
        }
        if rule.segment.trim().is_empty() {
            return Err(EngineError::classification_config_invalid(
                "pattern",
                &format!("rule ({},{},{}) has an empty segment label", rule.r, rule.f, rule.m),
            ));
        }

        let key = (rule.r, rule.f, rule.m);
        if seen.contains(&key) {
            return Err(EngineError::classification_config_invalid(
                "pattern",
                &format!("rule ({},{},{}) appears more than once", rule.r, rule.f, rule.m),
            ));
        }
        seen.push(key);
    }

    Ok(())
}

fn validate_range(range: &RangePolicy) -> EngineResult<()> {
    if range.buckets.is_empty() {
        return Err(EngineError::classification_config_invalid(
            "range",
            "bucket table is empty",
        ));
    }

    let mut expected_lower = COMPOSITE_MIN;
    for bucket in range.buckets {
        if bucket.lower != expected_lower {
            return Err(EngineError::classification_config_invalid(
                "range",
                &format!(
                    "bucket `{}` starts at {} but {} is uncovered",
                    bucket.segment, bucket.lower, expected_lower
                ),
            ));
        }
        if bucket.upper < bucket.lower {
            return Err(EngineError::classification_config_invalid(
                "range",
                &format!("bucket `{}` has upper below lower", bucket.segment),
            ));
        }
        if bucket.segment.trim().is_empty() {
            return Err(EngineError::classification_config_invalid(
                "range",
                "a bucket has an empty segment label",
            ));
        }
        expected_lower = bucket.upper + 1;
    }

    if expected_lower != COMPOSITE_MAX + 1 {
        return Err(EngineError::classification_config_invalid(
            "range",
            &format!(
                "buckets end at {} but must close at {}",
                expected_lower - 1,
                COMPOSITE_MAX
            ),
        ));
    }

    Ok(())
}
