use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::contracts::types::RowIssue;
use crate::error::{EngineError, EngineResult};
use crate::input::RawTransaction;
use crate::rfm::date::parse_iso_date;
use crate::rfm::types::CustomerMetrics;

struct CustomerGroup {
    last_purchase: NaiveDate,
    frequency: i64,
    monetary: i64,
    first_branch: String,
    first_route: String,
}

/// Reduces the transaction table to one `CustomerMetrics` row per distinct
/// customer_id, sorted by customer_id.
///
/// `as_of` is the single evaluation instant for the whole run: every
/// customer's recency is measured against the same date, so relative
/// ordering stays consistent no matter how long the run takes.
///
/// Pure function of the rows and `as_of`. Field-presence issues across all
/// rows are collected before failing; presence issues take precedence over
/// date-parse issues when both occur.
pub fn derive_metrics(
    rows: &[RawTransaction],
    as_of: NaiveDate,
) -> EngineResult<Vec<CustomerMetrics>> {
    let mut missing_field_issues = Vec::new();
    let mut date_issues = Vec::new();
    let mut groups: BTreeMap<String, CustomerGroup> = BTreeMap::new();

    for raw in rows {
        let customer_id = required_field(raw.row, "customer_id", raw.customer_id.as_deref());
        let branch = required_field(raw.row, "branch", raw.branch.as_deref());
        let route = required_field(raw.row, "route", raw.route.as_deref());
        let purchase_date_text = required_field(raw.row, "purchase_date", raw.purchase_date.as_deref());

        let mut row_missing = Vec::new();
        for field in [&customer_id, &branch, &route, &purchase_date_text] {
            if let Err(issue) = field {
                row_missing.push(issue.clone());
            }
        }
        if !row_missing.is_empty() {
            missing_field_issues.extend(row_missing);
            continue;
        }

        let (Ok(customer_id), Ok(branch), Ok(route), Ok(date_text)) =
            (customer_id, branch, route, purchase_date_text)
        else {
            continue;
        };

        let Some(purchase_date) = parse_iso_date(&date_text) else {
            date_issues.push(RowIssue {
                row: raw.row,
                field: "purchase_date".to_string(),
                code: "invalid_date".to_string(),
                description: format!("purchase_date must be YYYY-MM-DD; got \"{date_text}\""),
                received: Some(date_text),
            });
            continue;
        };

        groups
            .entry(customer_id)
            .and_modify(|group| {
                group.frequency += 1;
                group.monetary += 1;
                if purchase_date > group.last_purchase {
                    group.last_purchase = purchase_date;
                }
            })
            .or_insert_with(|| CustomerGroup {
                last_purchase: purchase_date,
                frequency: 1,
                monetary: 1,
                first_branch: branch,
                first_route: route,
            });
    }

    if !missing_field_issues.is_empty() {
        return Err(EngineError::schema_missing_field(missing_field_issues));
    }
    if !date_issues.is_empty() {
        return Err(EngineError::date_parse_failed(date_issues));
    }

    let metrics = groups
        .into_iter()
        .map(|(customer_id, group)| CustomerMetrics {
            customer_id,
            recency_days: (as_of - group.last_purchase).num_days().max(0),
            frequency: group.frequency,
            monetary: group.monetary,
            last_purchase: group.last_purchase,
            first_branch: group.first_branch,
            first_route: group.first_route,
        })
        .collect::<Vec<CustomerMetrics>>();

    log::debug!(
        "derived metrics for {} customers from {} transactions",
        metrics.len(),
        rows.len()
    );

    Ok(metrics)
}

fn required_field(row: i64, field: &str, value: Option<&str>) -> Result<String, RowIssue> {
    let trimmed = value.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Err(RowIssue {
            row,
            field: field.to_string(),
            code: "missing_required_field".to_string(),
            description: format!("{field} must be present and non-empty."),
            received: Some(String::new()),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::input::RawTransaction;

    use super::derive_metrics;

    fn txn(row: i64, customer: &str, branch: &str, route: &str, date: &str) -> RawTransaction {
        RawTransaction {
            row,
            customer_id: Some(customer.to_string()),
            branch: Some(branch.to_string()),
            route: Some(route.to_string()),
            purchase_date: Some(date.to_string()),
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap_or(NaiveDate::MIN)
    }

    #[test]
    fn groups_by_customer_and_counts_both_proxies() {
        let rows = vec![
            txn(1, "cust_b", "north", "r1", "2026-05-01"),
            txn(2, "cust_a", "south", "r2", "2026-04-10"),
            txn(3, "cust_b", "east", "r3", "2026-05-20"),
            txn(4, "cust_b", "north", "r1", "2026-03-15"),
        ];

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_ok());
        if let Ok(derived) = metrics {
            assert_eq!(derived.len(), 2);
            // BTreeMap grouping sorts output by customer_id.
            assert_eq!(derived[0].customer_id, "cust_a");
            assert_eq!(derived[0].recency_days, 52);
            assert_eq!(derived[0].frequency, 1);
            assert_eq!(derived[0].monetary, 1);

            assert_eq!(derived[1].customer_id, "cust_b");
            assert_eq!(derived[1].recency_days, 12);
            assert_eq!(derived[1].frequency, 3);
            assert_eq!(derived[1].monetary, 3);
            assert_eq!(derived[1].first_branch, "north");
            assert_eq!(derived[1].first_route, "r1");
        }
    }

    #[test]
    fn recency_uses_the_shared_as_of_not_per_customer_clocks() {
        let rows = vec![
            txn(1, "cust_a", "north", "r1", "2026-05-31"),
            txn(2, "cust_b", "north", "r1", "2026-06-01"),
        ];

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_ok());
        if let Ok(derived) = metrics {
            assert_eq!(derived[0].recency_days, 1);
            assert_eq!(derived[1].recency_days, 0);
        }
    }

    #[test]
    fn future_dated_purchase_clamps_recency_at_zero() {
        let rows = vec![
            txn(1, "cust_a", "north", "r1", "2026-06-15"),
            txn(2, "cust_b", "north", "r1", "2026-05-01"),
        ];

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_ok());
        if let Ok(derived) = metrics {
            assert_eq!(derived[0].customer_id, "cust_a");
            assert_eq!(derived[0].recency_days, 0);
            assert_eq!(derived[1].recency_days, 31);
        }
    }

    #[test]
    fn empty_required_field_fails_with_schema_missing_field() {
        let mut rows = vec![txn(1, "cust_a", "north", "r1", "2026-05-01")];
        rows.push(RawTransaction {
            row: 2,
            customer_id: Some("cust_b".to_string()),
            branch: None,
            route: Some("r2".to_string()),
            purchase_date: Some("2026-05-02".to_string()),
        });

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_err());
        if let Err(error) = metrics {
            assert_eq!(error.code, "schema_missing_field");
        }
    }

    #[test]
    fn unparseable_date_fails_with_date_parse_failed() {
        let rows = vec![
            txn(1, "cust_a", "north", "r1", "2026-05-01"),
            txn(2, "cust_b", "north", "r1", "05/02/2026"),
        ];

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_err());
        if let Err(error) = metrics {
            assert_eq!(error.code, "date_parse_failed");
        }
    }

    #[test]
    fn missing_field_issues_take_precedence_over_date_issues() {
        let rows = vec![
            RawTransaction {
                row: 1,
                customer_id: None,
                branch: Some("north".to_string()),
                route: Some("r1".to_string()),
                purchase_date: Some("2026-05-01".to_string()),
            },
            txn(2, "cust_b", "north", "r1", "not-a-date"),
        ];

        let metrics = derive_metrics(&rows, as_of());
        assert!(metrics.is_err());
        if let Err(error) = metrics {
            assert_eq!(error.code, "schema_missing_field");
        }
    }

    #[test]
    fn deriving_twice_is_identical() {
        let rows = vec![
            txn(1, "cust_a", "north", "r1", "2026-05-01"),
            txn(2, "cust_b", "south", "r2", "2026-04-01"),
        ];

        let first = derive_metrics(&rows, as_of());
        let second = derive_metrics(&rows, as_of());
        assert!(first.is_ok());
        assert!(second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            assert_eq!(a, b);
        }
    }
}
