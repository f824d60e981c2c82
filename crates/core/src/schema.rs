//! Tolerant parsing of embedded JSON-LD structured data.

use serde_json::Value;

use crate::Result;

/// The schema.org type flagged on FAQ sections.
pub const FAQ_PAGE_TYPE: &str = "FAQPage";

/// Parses the text of a `<script type="application/ld+json">` element.
///
/// # Errors
///
/// Returns [`BlockmapError::SchemaError`](crate::BlockmapError::SchemaError)
/// when the payload is not valid JSON.
pub fn parse_ld_json(payload: &str) -> Result<Value> {
    Ok(serde_json::from_str(payload.trim())?)
}

/// Whether a JSON-LD payload declares a `FAQPage`.
///
/// The payload may be a single item, an array of items, or an item carrying
/// an `@graph` array. Malformed payloads simply report `false`.
pub fn declares_faq_page(payload: &str) -> bool {
    match parse_ld_json(payload) {
        Ok(value) => value_declares_faq(&value),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed JSON-LD");
            false
        }
    }
}

fn value_declares_faq(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(item_declares_faq),
        Value::Object(_) => item_declares_faq(value),
        _ => false,
    }
}

fn item_declares_faq(item: &Value) -> bool {
    let Value::Object(map) = item else {
        return false;
    };

    let typed = match map.get("@type") {
        Some(Value::String(ty)) => ty == FAQ_PAGE_TYPE,
        Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some(FAQ_PAGE_TYPE)),
        _ => false,
    };

    typed
        || map
            .get("@graph")
            .and_then(Value::as_array)
            .is_some_and(|graph| graph.iter().any(item_declares_faq))
}
