//! Webhook payload contract with the NLU front end.
//!
//! The front end POSTs a query-result envelope per classified utterance;
//! the reply is a single fulfillment text. Parameter values arrive loosely
//! typed (the NLU flattens single-element lists to scalars and encodes
//! numbers as floats), so decoding is deliberately permissive — strict
//! validation happens in the order operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use platewire_core::OrderParams;

/// Inbound webhook request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: QueryResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub intent: IntentRef,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub output_contexts: Vec<OutputContext>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct OutputContext {
    pub name: String,
}

/// Outbound fulfillment reply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl QueryResult {
    /// Decode the loose parameter map into the typed shape the order
    /// operations consume.
    pub fn decode_params(&self) -> OrderParams {
        OrderParams {
            food_items: string_seq(self.parameters.get("food-item")),
            quantities: self.parameters.get("number").map(number_seq),
            order_id: self.parameters.get("order_id").and_then(non_empty),
        }
    }
}

fn string_seq(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn number_seq(value: &Value) -> Vec<i64> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_int).collect(),
        other => as_int(other).into_iter().collect(),
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn non_empty(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other.clone()),
    }
}
