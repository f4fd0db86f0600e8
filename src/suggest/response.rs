use encoding_rs::{Encoding, UTF_8};
use serde_json::Value;

use super::SuggestError;

/// Extracts suggestion strings from an autocomplete payload of the shape
/// `["query", ["s1", "s2", ...], ...]`.
///
/// Non-string members of the suggestion array are skipped.
pub fn parse_suggestions(body: &str) -> Result<Vec<String>, SuggestError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SuggestError::Malformed(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(SuggestError::Malformed("payload is not a JSON array".into()));
    };

    match items.get(1) {
        Some(Value::Array(suggestions)) => Ok(suggestions
            .iter()
            .filter_map(|s| s.as_str().map(str::to_string))
            .collect()),
        Some(_) => Err(SuggestError::Malformed(
            "second element is not an array".into(),
        )),
        None => Err(SuggestError::Malformed("missing suggestion array".into())),
    }
}

/// Decodes a response body using the charset from its `Content-Type`,
/// falling back to UTF-8.
pub(super) fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let param = param.trim().to_ascii_lowercase();
        param
            .strip_prefix("charset=")
            .map(|label| label.trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_firefox_payload() {
        let body = r#"["coffee",["coffee maker","coffee shop near me"]]"#;
        let suggestions = parse_suggestions(body).unwrap();
        assert_eq!(suggestions, vec!["coffee maker", "coffee shop near me"]);
    }

    #[test]
    fn ignores_trailing_elements() {
        let body = r#"["q",["a"],[],{"google:suggesttype":["QUERY"]}]"#;
        assert_eq!(parse_suggestions(body).unwrap(), vec!["a"]);
    }

    #[test]
    fn skips_non_string_suggestions() {
        let body = r#"["q",["a",1,null,"b"]]"#;
        assert_eq!(parse_suggestions(body).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn empty_suggestion_array_is_ok() {
        assert!(parse_suggestions(r#"["q",[]]"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_suggestions("<html>blocked</html>"),
            Err(SuggestError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_object_payload() {
        assert!(matches!(
            parse_suggestions(r#"{"q":"coffee"}"#),
            Err(SuggestError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_missing_second_element() {
        assert!(matches!(
            parse_suggestions(r#"["coffee"]"#),
            Err(SuggestError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_non_array_second_element() {
        let err = parse_suggestions(r#"["coffee","oops"]"#).unwrap_err();
        assert!(err.to_string().contains("not an array"), "got: {err}");
    }

    #[test]
    fn decodes_latin1_body() {
        let bytes = b"[\"caf\xe9\",[\"caf\xe9 au lait\"]]";
        let text = decode_body(bytes, Some("text/javascript; charset=ISO-8859-1"));
        assert_eq!(text, "[\"café\",[\"café au lait\"]]");
    }

    #[test]
    fn defaults_to_utf8() {
        let text = decode_body("[\"café\"]".as_bytes(), Some("application/json"));
        assert_eq!(text, "[\"café\"]");
        assert_eq!(decode_body(b"[]", None), "[]");
    }

    #[test]
    fn charset_label_handles_quotes_and_case() {
        assert_eq!(
            charset_label(r#"text/plain; Charset="UTF-8""#).as_deref(),
            Some("utf-8")
        );
        assert_eq!(charset_label("text/plain"), None);
    }
}
