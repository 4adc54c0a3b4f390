use serde_json::Value;

/// Key preference order when coercing an object element to a string.
/// Checked in sequence; the first string-typed value wins.
const PREFERRED_OBJECT_KEYS: [&str; 3] = ["cause", "suggestion", "advice"];

/// Strip a leading/trailing markdown code-fence wrapper from model output.
///
/// Anchored removal only: a leading ``` fence (with an optional
/// case-insensitive `json` tag) and a trailing ``` fence are removed, then
/// the text is trimmed. Fences embedded mid-text are left untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        s = rest.trim_start();
    }

    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }

    s
}

/// Normalize a loosely-typed model output value into a string array.
///
/// null becomes an empty array, a non-array scalar becomes a one-element
/// array, and array elements are coerced element-wise. Order-preserving and
/// idempotent on already-coerced arrays.
pub fn to_string_array(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(coerce_element).collect(),
        other => vec![coerce_scalar(other)],
    }
}

fn coerce_element(item: &Value) -> String {
    if let Value::String(s) = item {
        return s.clone();
    }
    if let Value::Object(map) = item {
        for key in PREFERRED_OBJECT_KEYS {
            if let Some(Value::String(s)) = map.get(key) {
                return s.clone();
            }
        }
        // No preferred key present: keep the whole object as compact JSON.
        return item.to_string();
    }
    coerce_scalar(item)
}

/// String form of a scalar: strings pass through unquoted, everything else
/// renders as compact JSON.
pub(crate) fn coerce_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
