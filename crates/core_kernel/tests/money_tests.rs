//! Unit tests for the Money module

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_zero() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_default_currency_is_usd() {
        assert_eq!(Currency::default(), Currency::USD);
    }
}

mod totals {
    use super::*;

    #[test]
    fn test_total_of_line_charges() {
        let total = Money::total([dec!(75.00), dec!(75.00), dec!(9.50)], Currency::USD).unwrap();
        assert_eq!(total.amount(), dec!(159.50));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let result = Money::total([Decimal::MAX, dec!(1)], Currency::EUR);
        assert_eq!(result, Err(MoneyError::Overflow { currency: Currency::EUR }));
    }

    #[test]
    fn test_total_of_nothing_is_zero() {
        let total = Money::total(std::iter::empty::<Decimal>(), Currency::GBP).unwrap();
        assert_eq!(total, Money::zero(Currency::GBP));
    }

    #[test]
    fn test_currency_mismatch_names_both_codes() {
        let error = Money::new(dec!(50.00), Currency::CAD)
            .ensure_currency(Currency::GBP)
            .unwrap_err();
        assert_eq!(
            error,
            MoneyError::CurrencyMismatch {
                expected: Currency::GBP,
                found: Currency::CAD,
            }
        );
        assert_eq!(error.to_string(), "Amount currency CAD does not match GBP");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::USD).unwrap();
        assert_eq!(json, "\"USD\"");
    }

    #[test]
    fn test_money_round_trips_through_json() {
        let m = Money::new(dec!(42.10), Currency::EUR);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
