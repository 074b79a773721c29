//! Key and text sanitization helpers.

use serde_json::Value;

/// Characters permitted in derived field names.
pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Reduce a caller-supplied key to the permitted character set.
pub(crate) fn filter_key(key: &str) -> String {
    key.chars().filter(|c| is_key_char(*c)).collect()
}

/// Strip code points XML cannot represent: C0 controls other than tab and
/// the two line separators, plus the two noncharacters. Surrogates cannot
/// occur in a Rust string.
pub(crate) fn strip_xml_illegal_chars(value: &str) -> String {
    value.chars().filter(|c| !is_xml_illegal(*c)).collect()
}

fn is_xml_illegal(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

/// Render a JSON scalar the way it reads, not the way it serializes.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Space-join array values; scalars pass through untouched.
pub(crate) fn flatten_extra_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(scalar_string).collect();
            Value::String(joined.join(" "))
        }
        other => other.clone(),
    }
}
