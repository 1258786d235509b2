//! Formatting helpers shared across the CLIs.

use chrono::{DateTime, Utc};

/// Placeholder for a value that is absent.
pub const MISSING: &str = "—";

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Money with two decimals.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Signed money, e.g. "+12.50" or "-3.00".
pub fn format_net(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{:.2}", amount.abs())
    } else {
        format!("+{:.2}", amount)
    }
}

/// An average with one decimal.
pub fn format_average(value: f64) -> String {
    format!("{:.1}", value)
}

/// An optional average with one decimal, or [`MISSING`].
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_average).unwrap_or_else(|| MISSING.to_string())
}

/// Whole counts like steps and calories, with thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(None), "—");
        assert_eq!(format_optional(Some(6.26)), "6.3");
        assert_eq!(format_optional(Some(7.0)), "7.0");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_net(25.0), "+25.00");
        assert_eq!(format_net(-3.456), "-3.46");
        assert_eq!(format_net(0.0), "+0.00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(12500.0), "12,500");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-4200.0), "-4,200");
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        let future = Utc::now() + chrono::Duration::minutes(5);
        assert_eq!(format_relative_time(future), "just now");
    }
}
