//! Script-safe JSON serialization for hydration payloads.

use serde::Serialize;

use crate::error::{DocumentError, Result};

/// Global binding holding the host configuration payload.
pub const CONFIG_GLOBAL: &str = "__CONFIG__";

/// Global binding holding the initial application state.
pub const STATE_GLOBAL: &str = "__INITIAL_STATE__";

/// Serialize a value to JSON that can sit inside an inline `<script>`.
///
/// The output is still valid JSON: `</` becomes `<\/`, comment openers and
/// the JavaScript line terminators U+2028/U+2029 become `\u` escapes.
pub fn to_script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json =
        serde_json::to_string(value).map_err(|e| DocumentError::Serialization(e.to_string()))?;
    Ok(escape_json_for_script(&json))
}

/// `window.<global>=<json>`
pub fn inline_assignment<T: Serialize + ?Sized>(global: &str, value: &T) -> Result<String> {
    Ok(format!("window.{global}={}", to_script_json(value)?))
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy; arrays and objects are truthy
/// even when empty.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

fn escape_json_for_script(json: &str) -> String {
    json.replace("<!--", "\\u003c!--")
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_assignment() {
        let script = inline_assignment(STATE_GLOBAL, &json!({"a": 1})).unwrap();
        assert_eq!(script, r#"window.__INITIAL_STATE__={"a":1}"#);
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_closing_script_tag_is_escaped() {
        let payload = json!({"x": "</script><script>alert(1)</script>"});
        let escaped = to_script_json(&payload).unwrap();
        assert!(!escaped.contains("</script>"));
        // Still parses back to the original value
        let parsed: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_comment_and_line_separators_are_escaped() {
        let payload = json!({"x": "<!-- a\u{2028}b\u{2029}"});
        let escaped = to_script_json(&payload).unwrap();
        assert!(!escaped.contains("<!--"));
        assert!(!escaped.contains('\u{2028}'));
        assert!(!escaped.contains('\u{2029}'));
        let parsed: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(parsed, payload);
    }
}
