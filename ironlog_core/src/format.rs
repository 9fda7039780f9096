//! Display formatting helpers. Stateless, no I/O.

use chrono::{DateTime, Utc};

/// Render a volume in kilograms with thousands separators, e.g. "12 480 kg"
pub fn format_volume(kg: f64) -> String {
    let rounded = kg.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if rounded < 0 {
        format!("-{} kg", grouped)
    } else {
        format!("{} kg", grouped)
    }
}

/// Render a duration as "1h 05m", "12m 30s" or "45s"
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Render a timestamp as a calendar date, e.g. "2024-01-15"
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_volume_groups_thousands() {
        assert_eq!(format_volume(12480.0), "12 480 kg");
        assert_eq!(format_volume(500.0), "500 kg");
        assert_eq!(format_volume(1_234_567.4), "1 234 567 kg");
        assert_eq!(format_volume(0.0), "0 kg");
    }

    #[test]
    fn test_format_volume_rounds() {
        assert_eq!(format_volume(999.6), "1 000 kg");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(750), "12m 30s");
        assert_eq!(format_duration(3900), "1h 05m");
        assert_eq!(format_duration(0), "0s");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).unwrap();
        assert_eq!(format_date(ts), "2024-01-15");
    }
}
