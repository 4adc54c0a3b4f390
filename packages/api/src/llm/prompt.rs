use serde_json::Value;

const EXTRACTION_TEMPLATE: &str = include_str!("../../prompts/extraction.txt");
const DIAGNOSIS_TEMPLATE: &str = include_str!("../../prompts/diagnosis.txt");

const NOT_PROVIDED: &str = "(not provided)";
const NONE_YET: &str = "(none yet)";

/// Build the extraction prompt for a raw pasted input.
pub fn build_extraction_prompt(raw_input: &str) -> String {
    EXTRACTION_TEMPLATE.replace("{raw_input}", raw_input)
}

/// Build the diagnosis prompt from the raw input, the extraction result and
/// optional similar-bug text. Pure substitution into the fixed template;
/// absent optional fields default to literal placeholders.
pub fn build_diagnosis_prompt(
    raw_input: &str,
    parsed: &Value,
    similar_bugs: Option<&str>,
) -> String {
    let similar = similar_bugs
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NONE_YET);

    DIAGNOSIS_TEMPLATE
        .replace("{raw_input}", raw_input)
        .replace("{language_guess}", &text_field(parsed, "language_guess"))
        .replace("{top_error_line}", &text_field(parsed, "top_error_line"))
        .replace("{error_text}", &text_field(parsed, "error_text"))
        .replace(
            "{stack_trace_lines_json}",
            &json_field(parsed, "stack_trace_lines"),
        )
        .replace("{code_blocks_json}", &json_field(parsed, "code_blocks"))
        .replace("{logs_json}", &json_field(parsed, "logs"))
        .replace("{file_paths_json}", &json_field(parsed, "file_paths"))
        .replace(
            "{environment_hints_json}",
            &json_field(parsed, "environment_hints"),
        )
        .replace("{user_intent}", &text_field(parsed, "user_intent"))
        .replace("{similar_bugs}", similar)
}

/// A free-text field from the extraction result, defaulting when absent,
/// null or blank.
fn text_field(parsed: &Value, key: &str) -> String {
    match parsed.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => NOT_PROVIDED.to_string(),
    }
}

/// A structured field from the extraction result, serialized to compact JSON
/// for substitution.
fn json_field(parsed: &Value, key: &str) -> String {
    match parsed.get(key) {
        Some(v) if !v.is_null() => v.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_not_empty() {
        assert!(!EXTRACTION_TEMPLATE.is_empty());
        assert!(!DIAGNOSIS_TEMPLATE.is_empty());
    }

    #[test]
    fn test_extraction_prompt_embeds_input() {
        let prompt = build_extraction_prompt("TypeError: x is not a function");
        assert!(prompt.contains("TypeError: x is not a function"));
        assert!(!prompt.contains("{raw_input}"));
    }

    #[test]
    fn test_diagnosis_prompt_substitutes_parsed_fields() {
        let parsed = json!({
            "language_guess": "python",
            "top_error_line": "KeyError: 'id'",
            "error_text": "KeyError in handler",
            "stack_trace_lines": ["File \"app.py\", line 3"],
            "user_intent": "load a record"
        });

        let prompt = build_diagnosis_prompt("raw paste", &parsed, None);
        assert!(prompt.contains("raw paste"));
        assert!(prompt.contains("python"));
        assert!(prompt.contains("KeyError: 'id'"));
        assert!(prompt.contains("[\"File \\\"app.py\\\", line 3\"]"));
        assert!(!prompt.contains("{language_guess}"));
        assert!(!prompt.contains("{stack_trace_lines_json}"));
    }

    #[test]
    fn test_diagnosis_prompt_defaults_absent_fields() {
        let prompt = build_diagnosis_prompt("raw", &json!({}), None);
        assert!(prompt.contains("(not provided)"));
        assert!(prompt.contains("(none yet)"));
    }

    #[test]
    fn test_diagnosis_prompt_includes_similar_bugs() {
        let prompt =
            build_diagnosis_prompt("raw", &json!({}), Some("bug #42: same KeyError"));
        assert!(prompt.contains("bug #42: same KeyError"));
        assert!(!prompt.contains("(none yet)"));
    }

    #[test]
    fn test_blank_similar_bugs_defaults() {
        let prompt = build_diagnosis_prompt("raw", &json!({}), Some("   "));
        assert!(prompt.contains("(none yet)"));
    }
}
