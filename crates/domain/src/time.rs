//! Время в формате backend'а: наносекунды с Unix epoch

use chrono::{DateTime, Utc};

/// Наносекунды с начала Unix epoch
pub type Time = i64;

/// Текущее время в наносекундах
pub fn now_nanos() -> Time {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Конвертация в chrono для отображения
pub fn to_datetime(time: Time) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(time)
}

/// Человекочитаемое время; 0 означает "никогда не обновлялось"
pub fn format_time(time: Time) -> String {
    if time <= 0 {
        return "Never".to_string();
    }
    to_datetime(time).format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_never() {
        assert_eq!(format_time(0), "Never");
    }

    #[test]
    fn test_format_time_known_instant() {
        // 2024-01-01T00:00:00Z
        let t: Time = 1_704_067_200 * 1_000_000_000;
        assert_eq!(format_time(t), "2024-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_now_is_positive() {
        assert!(now_nanos() > 0);
    }
}
