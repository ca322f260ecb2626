//! Duration and timestamp formatting.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Format a duration for display: `500ms`, `5.3s`, `1.5m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Describe how long ago a timestamp was: `just now`, `3 hours ago`.
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(timestamp).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 30 {
        plural(days, "day")
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }

    #[test]
    fn format_duration_seconds() {
        assert_eq!(format_duration(Duration::from_secs_f64(5.3)), "5.3s");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn relative_time_recent() {
        assert_eq!(format_relative_time(Utc::now()), "just now");
        let future = Utc::now() + chrono::Duration::minutes(5);
        assert_eq!(format_relative_time(future), "just now");
    }

    #[test]
    fn relative_time_minutes_and_hours() {
        let one = Utc::now() - chrono::Duration::minutes(1);
        assert_eq!(format_relative_time(one), "1 minute ago");
        let many = Utc::now() - chrono::Duration::minutes(15);
        assert_eq!(format_relative_time(many), "15 minutes ago");
        let hours = Utc::now() - chrono::Duration::hours(3);
        assert_eq!(format_relative_time(hours), "3 hours ago");
    }

    #[test]
    fn relative_time_days() {
        let yesterday = Utc::now() - chrono::Duration::hours(30);
        assert_eq!(format_relative_time(yesterday), "yesterday");
        let week = Utc::now() - chrono::Duration::days(7);
        assert_eq!(format_relative_time(week), "7 days ago");
    }

    #[test]
    fn relative_time_old_dates_are_absolute() {
        let old = Utc::now() - chrono::Duration::days(90);
        assert_eq!(format_relative_time(old), old.format("%Y-%m-%d").to_string());
    }
}
