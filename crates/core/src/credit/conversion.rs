//! Conversion between money and credits.
//!
//! The effective value per credit is resolved in order: customer custom
//! field, customer group custom field, global default setting, then
//! [`FALLBACK_VALUE_PER_CREDIT`]. Every step that is missing, non-numeric,
//! non-finite or not strictly positive falls through to the next one.

use serde_json::Value;

use super::types::{CustomFields, RateSource, ValuePerCredit};

/// Custom field carrying a per-customer or per-group rate override.
pub const VALUE_PER_UNIT_FIELD: &str = "store_credit_value_per_unit";

/// Settings key of the global default rate.
pub const DEFAULT_VALUE_PER_CREDIT_KEY: &str = "StoreCredit.config.defaultValuePerCredit";

/// Rate used when nothing else is configured.
pub const FALLBACK_VALUE_PER_CREDIT: f64 = 1.0;

/// Parses a rate from a JSON value.
///
/// Accepts JSON numbers and numeric strings. Returns `None` for anything
/// that is not a finite, strictly positive number.
pub fn parse_rate(value: &Value) -> Option<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

fn rate_from_fields(fields: Option<&CustomFields>) -> Option<f64> {
    fields
        .and_then(|fields| fields.get(VALUE_PER_UNIT_FIELD))
        .and_then(parse_rate)
}

/// Resolves the effective value per credit.
pub fn resolve_value_per_credit(
    customer_fields: Option<&CustomFields>,
    group_fields: Option<&CustomFields>,
    default_setting: Option<&Value>,
) -> ValuePerCredit {
    if let Some(value) = rate_from_fields(customer_fields) {
        return ValuePerCredit {
            value,
            source: RateSource::Customer,
        };
    }
    if let Some(value) = rate_from_fields(group_fields) {
        return ValuePerCredit {
            value,
            source: RateSource::CustomerGroup,
        };
    }
    if let Some(value) = default_setting.and_then(parse_rate) {
        return ValuePerCredit {
            value,
            source: RateSource::Default,
        };
    }
    ValuePerCredit {
        value: FALLBACK_VALUE_PER_CREDIT,
        source: RateSource::Fallback,
    }
}

/// Converts a money amount to credits.
///
/// A non-positive or non-finite rate is treated as the fallback rate.
pub fn money_to_credits(amount: f64, value_per_credit: f64) -> f64 {
    amount / sanitize_rate(value_per_credit)
}

/// Converts credits back to their money value.
pub fn credits_to_money(credits: f64, value_per_credit: f64) -> f64 {
    credits * sanitize_rate(value_per_credit)
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        FALLBACK_VALUE_PER_CREDIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> CustomFields {
        let mut map = CustomFields::new();
        map.insert(VALUE_PER_UNIT_FIELD.to_string(), value);
        map
    }

    #[test]
    fn test_parse_rate_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_rate(&json!(3)), Some(3.0));
        assert_eq!(parse_rate(&json!(0.25)), Some(0.25));
        assert_eq!(parse_rate(&json!("2.5")), Some(2.5));
        assert_eq!(parse_rate(&json!(" 4 ")), Some(4.0));
    }

    #[test]
    fn test_parse_rate_rejects_invalid_values() {
        assert_eq!(parse_rate(&json!(0)), None);
        assert_eq!(parse_rate(&json!(-1.5)), None);
        assert_eq!(parse_rate(&json!("abc")), None);
        assert_eq!(parse_rate(&json!("NaN")), None);
        assert_eq!(parse_rate(&json!("inf")), None);
        assert_eq!(parse_rate(&json!(null)), None);
        assert_eq!(parse_rate(&json!(true)), None);
        assert_eq!(parse_rate(&json!([1])), None);
    }

    #[test]
    fn test_customer_override_wins() {
        let customer = fields(json!(3));
        let group = fields(json!(2));
        let rate = resolve_value_per_credit(Some(&customer), Some(&group), Some(&json!(5)));
        assert_eq!(rate.value, 3.0);
        assert_eq!(rate.source, RateSource::Customer);
    }

    #[test]
    fn test_group_override_used_when_customer_has_none() {
        let group = fields(json!("2"));
        let rate = resolve_value_per_credit(Some(&CustomFields::new()), Some(&group), None);
        assert_eq!(rate.value, 2.0);
        assert_eq!(rate.source, RateSource::CustomerGroup);
    }

    #[test]
    fn test_invalid_customer_override_falls_back_to_default() {
        for bad in [json!(0), json!(-2), json!("not a number"), json!(null)] {
            let customer = fields(bad);
            let rate = resolve_value_per_credit(Some(&customer), None, Some(&json!(1.5)));
            assert_eq!(rate.value, 1.5);
            assert_eq!(rate.source, RateSource::Default);
        }
    }

    #[test]
    fn test_invalid_default_falls_back_to_one() {
        for bad in [json!(0), json!(-1), json!("x")] {
            let rate = resolve_value_per_credit(None, None, Some(&bad));
            assert_eq!(rate.value, FALLBACK_VALUE_PER_CREDIT);
            assert_eq!(rate.source, RateSource::Fallback);
        }
        let rate = resolve_value_per_credit(None, None, None);
        assert_eq!(rate.source, RateSource::Fallback);
    }

    #[test]
    fn test_money_credit_round_trip_within_tolerance() {
        for amount in [0.01, 1.0, 9.99, 123.45, 10_000.0] {
            for rate in [0.1, 0.3, 1.0, 3.0, 7.77] {
                let credits = money_to_credits(amount, rate);
                assert!((credits - amount / rate).abs() < 1e-12);
                let back = credits_to_money(credits, rate);
                assert!((back - amount).abs() < 1e-9, "{amount} at {rate} -> {back}");
            }
        }
    }

    #[test]
    fn test_invalid_rate_treated_as_fallback() {
        assert_eq!(money_to_credits(10.0, 0.0), 10.0);
        assert_eq!(money_to_credits(10.0, -3.0), 10.0);
        assert_eq!(credits_to_money(10.0, f64::NAN), 10.0);
    }
}
