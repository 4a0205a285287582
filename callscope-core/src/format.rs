//! Formatting helpers shared across report builders and UIs.

/// Parse a `HH:MM:SS` duration string into seconds. Malformed or empty input
/// degrades to 0, matching the zero-default policy for missing fields.
pub fn hms_to_seconds(hms: &str) -> i64 {
    let mut parts = hms.split(':');
    let (h, m, s) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s)) => (h, m, s),
        _ => return 0,
    };
    let h: i64 = h.trim().parse().unwrap_or(0);
    let m: i64 = m.trim().parse().unwrap_or(0);
    let s: i64 = s.trim().parse().unwrap_or(0);
    h * 3600 + m * 60 + s
}

/// Format seconds as a `HH:MM:SS` string.
pub fn seconds_to_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Convert a `HH:MM:SS` duration string to fractional minutes.
pub fn hms_to_minutes(hms: &str) -> f64 {
    hms_to_seconds(hms) as f64 / 60.0
}

/// Display an f64 the way the tables do: whole values without a decimal
/// point, everything else with one decimal place.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Number of days in a (year, month), accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    use chrono::NaiveDate;
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_round_trip() {
        assert_eq!(hms_to_seconds("00:05:30"), 330);
        assert_eq!(seconds_to_hms(330), "00:05:30");
        assert_eq!(seconds_to_hms(3661), "01:01:01");
    }

    #[test]
    fn test_hms_malformed_defaults_to_zero() {
        assert_eq!(hms_to_seconds(""), 0);
        assert_eq!(hms_to_seconds("garbage"), 0);
        assert_eq!(hms_to_seconds("1:2"), 0);
    }

    #[test]
    fn test_hms_to_minutes() {
        assert_eq!(hms_to_minutes("00:06:00"), 6.0);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(8.0), "8");
        assert_eq!(format_count(8.25), "8.2");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
