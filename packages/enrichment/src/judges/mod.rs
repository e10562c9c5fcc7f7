//! Judge implementations and shared response-parsing helpers.
//!
//! Model responses are JSON-shaped text that must be located inside a
//! possibly-noisy reply: surrounding prose, markdown code fences, or
//! several braces before the payload. The helpers here pull out the first
//! well-formed JSON object.

use serde::de::DeserializeOwned;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAiJudge;

/// Locate the first well-formed JSON object in noisy text.
///
/// Brace-matches from each `{`, tracking string literals and escapes, and
/// validates each balanced span with serde before accepting it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(open) = text[start..].find('{').map(|i| start + i) {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &byte) in bytes[open..].iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match byte {
                b'\\' if in_string => escaped = true,
                b'"' => in_string = !in_string,
                b'{' if !in_string => depth += 1,
                b'}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        let span = &text[open..=open + offset];
                        if serde_json::from_str::<serde_json::Value>(span).is_ok() {
                            return Some(span);
                        }
                        break;
                    }
                }
                _ => {}
            }
        }

        start = open + 1;
    }

    None
}

/// Parse a judgment response, tolerating markdown fences and prose.
///
/// Tries a direct parse first, then falls back to the first extractable
/// JSON object.
pub fn parse_judgment<T: DeserializeOwned>(text: &str) -> Option<T> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(parsed) = serde_json::from_str(trimmed) {
        return Some(parsed);
    }

    extract_json_object(text).and_then(|span| serde_json::from_str(span).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Identity {
        name: String,
    }

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"name": "EcoSoap Bar"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_from_surrounding_prose() {
        let text = r#"Sure! Here is the product: {"name": "EcoSoap Bar", "brand": "Greenly"} Hope that helps."#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"name": "EcoSoap Bar", "brand": "Greenly"}"#)
        );
    }

    #[test]
    fn test_extract_nested_and_escaped() {
        let text = r#"note {"a": {"b": "braces } in \" string {"}, "c": 1} trailing"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": "braces } in \" string {"}, "c": 1}"#)
        );
    }

    #[test]
    fn test_extract_skips_unbalanced_prefix() {
        let text = r#"set {x} aside; the payload is {"name": "Soap"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"name": "Soap"}"#));
    }

    #[test]
    fn test_extract_none_when_absent() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{broken"), None);
    }

    #[test]
    fn test_parse_judgment_with_code_fence() {
        let text = "```json\n{\"name\": \"EcoSoap Bar\"}\n```";
        let identity: Identity = parse_judgment(text).unwrap();
        assert_eq!(identity.name, "EcoSoap Bar");
    }

    #[test]
    fn test_parse_judgment_with_prose() {
        let text = "The answer:\n{\"name\": \"EcoSoap Bar\"}\nDone.";
        let identity: Identity = parse_judgment(text).unwrap();
        assert_eq!(identity.name, "EcoSoap Bar");
    }
}
