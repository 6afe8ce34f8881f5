use chrono::NaiveDate;

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Strict `YYYY-MM-DD` parse with a shape check first, so `2026-1-5` and
/// locale formats are rejected rather than guessed at.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !looks_like_iso_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{format_iso_date, parse_iso_date};

    #[test]
    fn parses_and_formats_round_trip() {
        let parsed = parse_iso_date("2026-02-28");
        assert!(parsed.is_some());
        if let Some(date) = parsed {
            assert_eq!(format_iso_date(&date), "2026-02-28");
        }
    }

    #[test]
    fn rejects_loose_shapes_and_fake_calendar_values() {
        assert!(parse_iso_date("2026-1-5").is_none());
        assert!(parse_iso_date("05/01/2026").is_none());
        assert!(parse_iso_date("2026-02-30").is_none());
        assert!(parse_iso_date("2026-13-01").is_none());
    }
}
