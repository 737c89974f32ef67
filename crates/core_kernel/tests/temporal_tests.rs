//! Tests for service periods and date ranges

use chrono::NaiveDate;
use core_kernel::{DateRange, ServicePeriod, TemporalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod service_period {
    use super::*;

    #[test]
    fn test_single_day_period() {
        let period = ServicePeriod::single_day(date(2024, 4, 2));
        assert_eq!(period.from(), period.to());
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_period_days_counts_both_ends() {
        let period = ServicePeriod::new(date(2024, 4, 1), date(2024, 4, 10)).unwrap();
        assert_eq!(period.days(), 10);
    }

    #[test]
    fn test_inverted_period_rejected_on_deserialize() {
        let json = r#"{"from":"2024-05-01","to":"2024-04-01"}"#;
        let result: Result<ServicePeriod, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_period_deserializes() {
        let json = r#"{"from":"2024-04-01","to":"2024-04-03"}"#;
        let period: ServicePeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.days(), 3);
    }
}

mod date_range {
    use super::*;

    #[test]
    fn test_default_range_is_unbounded() {
        let range = DateRange::default();
        assert!(range.is_unbounded());
        assert!(range.contains(date(1900, 1, 1)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::between(date(2024, 2, 1), date(2024, 1, 1));
        assert_eq!(
            result,
            Err(TemporalError::InvalidPeriod {
                start: date(2024, 2, 1),
                end: date(2024, 1, 1),
            })
        );
    }

    #[test]
    fn test_ending_range_includes_end_date() {
        let range = DateRange::ending(date(2024, 1, 31));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
    }

    #[test]
    fn test_range_omits_missing_bounds_in_json() {
        let json = serde_json::to_string(&DateRange::starting(date(2024, 1, 1))).unwrap();
        assert_eq!(json, r#"{"from":"2024-01-01"}"#);
    }

    #[test]
    fn test_inverted_range_rejected_on_deserialize() {
        let result = serde_json::from_str::<DateRange>(r#"{"from":"2024-02-01","to":"2024-01-01"}"#);
        assert!(result.is_err());

        let open: DateRange = serde_json::from_str(r#"{"to":"2024-01-31"}"#).unwrap();
        assert_eq!(open, DateRange::ending(date(2024, 1, 31)));
        assert_eq!(open.from(), None);
    }
}
