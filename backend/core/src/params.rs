use serde_json::Value;

/// Typed view of an event's `parameters` block.
///
/// The gateway decodes the NLU's loose JSON into this shape; validation
/// (parallel-sequence lengths, positivity, id coercion) happens in the
/// order operations so that every malformed input becomes a user-facing
/// reply rather than a transport failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderParams {
    /// Ordered food-item names.
    pub food_items: Vec<String>,
    /// Quantities parallel to `food_items`, or `None` when the NLU omitted
    /// the `number` parameter entirely.
    pub quantities: Option<Vec<i64>>,
    /// Raw `order_id` parameter for track requests.
    pub order_id: Option<Value>,
}

/// Coerce a raw `order_id` parameter to an integer order identifier.
///
/// Accepts JSON integers, whole-valued floats (the NLU front end encodes
/// all numbers as floats), and numeric strings. Everything else is `None`.
pub fn coerce_order_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_integers_floats_and_strings() {
        assert_eq!(coerce_order_id(&json!(41)), Some(41));
        assert_eq!(coerce_order_id(&json!(41.0)), Some(41));
        assert_eq!(coerce_order_id(&json!("41")), Some(41));
        assert_eq!(coerce_order_id(&json!(" 41 ")), Some(41));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(coerce_order_id(&json!("abc")), None);
        assert_eq!(coerce_order_id(&json!(41.5)), None);
        assert_eq!(coerce_order_id(&json!(["41"])), None);
        assert_eq!(coerce_order_id(&json!(null)), None);
    }
}
