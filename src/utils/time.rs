//! Time helpers

use chrono::{DateTime, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a millisecond timestamp for operator-facing output.
///
/// Out-of-range values fall back to the raw number.
pub fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        // 2025-12-31 19:30:00 UTC
        assert_eq!(format_millis(1_767_209_400_000), "2025-12-31 19:30");
    }

    #[test]
    fn test_format_millis_out_of_range() {
        assert_eq!(format_millis(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_now_millis_is_recent() {
        // Sanity: after 2024-01-01 UTC
        assert!(now_millis() > 1_704_067_200_000);
    }
}
