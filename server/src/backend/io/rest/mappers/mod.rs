//! Conversions between the `shared` DTOs and domain types.

pub mod entry_mapper;
pub mod goal_mapper;

use serde_json::Value;

/// Amounts arrive as JSON numbers or strings; the domain parses the text.
/// Any other JSON value is passed through as text and rejected there.
pub(crate) fn amount_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_text_accepts_numbers_and_strings() {
        assert_eq!(amount_text(Some(json!(12.5))), Some("12.5".to_string()));
        assert_eq!(amount_text(Some(json!("7"))), Some("7".to_string()));
        assert_eq!(amount_text(Some(Value::Null)), None);
        assert_eq!(amount_text(None), None);
        assert_eq!(amount_text(Some(json!(true))), Some("true".to_string()));
    }
}
