//! Rate payload probing.
//!
//! The vendor has moved its rate endpoint and reshaped its payload more
//! than once across API versions. Extraction is an ordered first-match
//! probe over the shapes seen in the wild: a new shape means a new entry
//! in one of the tables below, never a new call site.

use serde_json::Value;

/// Rate endpoint paths tried in priority order, relative to the API base.
pub(crate) const RATE_ENDPOINTS: &[&str] = &[
    "rates",
    "rates/latest",
    "exchange-rates",
    "exchange-rates/latest",
    "exchange-rates/spot",
    "prices",
];

/// Field names that may carry the rate at any level of the payload.
const RATE_FIELDS: &[&str] = &["rate", "price", "amount", "value"];

/// Container keys the rate may be nested under.
const NESTED_KEYS: &[&str] = &["data", "rates", "quote", "spot"];

/// Extract a finite, strictly positive rate from a vendor payload.
///
/// Checks the known field names at the top level first, then walks the same
/// fields under each known container key, recursing through nested objects
/// and array elements. The first match wins. Zero and negative values are
/// unparseable, not valid rates.
pub(crate) fn extract_rate(payload: &Value) -> Option<f64> {
    if let Some(rate) = as_positive_number(payload) {
        return Some(rate);
    }

    let object = payload.as_object()?;

    for field in RATE_FIELDS {
        if let Some(rate) = object.get(*field).and_then(as_positive_number) {
            return Some(rate);
        }
    }

    for key in NESTED_KEYS {
        match object.get(*key) {
            Some(Value::Array(items)) => {
                if let Some(rate) = items.iter().find_map(extract_rate) {
                    return Some(rate);
                }
            }
            Some(nested @ Value::Object(_)) => {
                if let Some(rate) = extract_rate(nested) {
                    return Some(rate);
                }
            }
            _ => {}
        }
    }

    None
}

fn as_positive_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::extract_rate;

    #[test]
    fn equivalent_payload_shapes_resolve_to_the_same_rate() {
        let shapes = [
            json!({ "rate": 65000 }),
            json!({ "price": "65000" }),
            json!({ "data": { "rate": 65000 } }),
            json!({ "rates": [{ "rate": 65000 }] }),
            json!({ "quote": { "price": "65000" } }),
            json!({ "spot": { "amount": 65000.0 } }),
            json!({ "data": [{ "value": "65000" }] }),
        ];

        for shape in shapes {
            assert_eq!(extract_rate(&shape), Some(65000.0), "shape {shape}");
        }
    }

    #[test]
    fn top_level_fields_win_over_nested_ones() {
        let payload = json!({ "rate": 65000, "data": { "rate": 1 } });
        assert_eq!(extract_rate(&payload), Some(65000.0));
    }

    #[test]
    fn bare_numeric_payloads_parse() {
        assert_eq!(extract_rate(&json!(65000)), Some(65000.0));
        assert_eq!(extract_rate(&json!("65000")), Some(65000.0));
    }

    #[test]
    fn zero_and_negative_rates_are_unparseable() {
        assert_eq!(extract_rate(&json!({ "rate": 0 })), None);
        assert_eq!(extract_rate(&json!({ "rate": -65000 })), None);
        assert_eq!(extract_rate(&json!({ "rate": "0" })), None);
    }

    #[test]
    fn skips_unusable_candidates_for_later_ones() {
        // `rate` is garbage, `price` carries the number.
        let payload = json!({ "rate": "soon", "price": 65000 });
        assert_eq!(extract_rate(&payload), Some(65000.0));

        // The first array element is unusable, the second is not.
        let payload = json!({ "rates": [{ "rate": null }, { "rate": 65000 }] });
        assert_eq!(extract_rate(&payload), Some(65000.0));
    }

    #[test]
    fn unrecognized_payloads_yield_nothing() {
        assert_eq!(extract_rate(&json!({})), None);
        assert_eq!(extract_rate(&json!({ "btc": 65000 })), None);
        assert_eq!(extract_rate(&json!(null)), None);
        assert_eq!(extract_rate(&json!("not a number")), None);
    }
}
