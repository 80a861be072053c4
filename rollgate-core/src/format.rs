//! Format-string rendering against event fields.
//!
//! Templates use `%{name}` placeholders that resolve against top-level event
//! fields, the same contract the message format of the item builder relies
//! on. Resolution policy, applied consistently:
//!
//! - strings substitute verbatim
//! - numbers and booleans substitute via their display form
//! - arrays and objects substitute as compact JSON
//! - null and unknown field names substitute the empty string
//! - a `%{` with no closing brace is emitted literally

use serde_json::{Map, Value};

/// Render a template against a set of event fields.
pub fn render(template: &str, fields: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if let Some(value) = fields.get(name) {
                    out.push_str(&stringify(value));
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder, keep the literal text
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Flatten a field value to its placeholder substitution.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        composite => serde_json::to_string(composite).unwrap_or_default(),
    }
}
