// src/template/render.rs
// =============================================================================
// Single-pass {{ key }} substitution.
//
// How it works:
// 1. A regex finds every token: "{{", optional whitespace, a key made of
//    ASCII letters, digits and underscores, optional whitespace, "}}"
// 2. Each token is replaced with the record's field converted to text
// 3. Replacement text is never scanned again, so a value containing
//    "{{other}}" comes out literally
//
// Rust concepts:
// - OnceLock: compile the regex the first time it is needed, then reuse it
// - Closures: regex calls our closure once per match
// - serde_json::Value: a record with an open set of fields
// =============================================================================

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The pattern is a constant, so failing to compile it is a programmer error
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("token pattern is a valid regex")
    })
}

/// Substitutes every `{{ key }}` token in `template` with `record[key]`.
///
/// Missing, `null`, `false`, `0` and `""` fields all render as the empty
/// string. A record that is not a JSON object renders every token empty.
///
/// ```text
/// render("{{ a }} and {{b}}", {"a": "x", "b": "y"})  ->  "x and y"
/// ```
pub fn render(template: &str, record: &Value) -> String {
    token_pattern()
        .replace_all(template, |caps: &Captures| field_text(record, &caps[1]))
        .into_owned()
}

// Converts one field to the text that replaces its token
fn field_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => {
            if number.as_f64() == Some(0.0) {
                String::new()
            } else {
                number.to_string()
            }
        }
        // Arrays and objects: compact JSON
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_single_field() {
        assert_eq!(render("{{name}}", &json!({"name": "foo"})), "foo");
    }

    #[test]
    fn test_render_missing_field_is_empty() {
        assert_eq!(render("{{missing}}", &json!({})), "");
    }

    #[test]
    fn test_render_whitespace_inside_braces() {
        let record = json!({"a": "x", "b": "y"});
        assert_eq!(render("{{ a }} and {{b}}", &record), "x and y");
        assert_eq!(render("{{\ta\n}}", &record), "x");
    }

    #[test]
    fn test_render_falsy_values_are_empty() {
        let record = json!({"null": null, "no": false, "zero": 0, "empty": "", "zero_float": 0.0});
        assert_eq!(
            render("[{{null}}|{{no}}|{{zero}}|{{empty}}|{{zero_float}}]", &record),
            "[||||]"
        );
    }

    #[test]
    fn test_render_truthy_scalars() {
        let record = json!({"stars": 42, "ratio": 1.5, "has_pages": true, "topics": ["a", "b"]});
        assert_eq!(
            render("{{stars}} {{ratio}} {{has_pages}} {{topics}}", &record),
            r#"42 1.5 true ["a","b"]"#
        );
    }

    #[test]
    fn test_render_leaves_non_tokens_alone() {
        let record = json!({"a": "x"});
        assert_eq!(render("{{ a-b }} {a} {{}} {{a}", &record), "{{ a-b }} {a} {{}} {{a}");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let record = json!({"a": "{{b}}", "b": "nope"});
        assert_eq!(render("{{a}}", &record), "{{b}}");
    }

    #[test]
    fn test_render_no_escaping() {
        let record = json!({"description": "<b>bold</b> & co"});
        assert_eq!(
            render("<p>{{description}}</p>", &record),
            "<p><b>bold</b> & co</p>"
        );
    }

    #[test]
    fn test_render_non_object_record() {
        assert_eq!(render("<{{name}}>", &json!("just a string")), "<>");
        assert_eq!(render("<{{name}}>", &Value::Null), "<>");
    }

    #[test]
    fn test_render_repeated_token() {
        let record = json!({"name": "site"});
        assert_eq!(
            render(r#"<a href="/{{name}}">{{ name }}</a>"#, &record),
            r#"<a href="/site">site</a>"#
        );
    }
}
