//! JSON extraction from free-form model output.

use serde_json::Value;

/// Raised when no JSON value can be recovered from model text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model output is not valid JSON: {message}")]
pub struct ModelJsonError {
    /// Parser diagnostic for the last attempt.
    pub message: String,
}

/// Parse `text` as JSON, falling back to the outermost `{...}` span.
///
/// Models often wrap JSON in prose or code fences; the fallback takes
/// everything from the first `{` to the last `}` inclusive.
///
/// # Examples
/// ```
/// use backend::domain::extract_json;
///
/// let value = extract_json("Sure! ```json\n{\"a\": 1}\n```").expect("json");
/// assert_eq!(value["a"], 1);
/// ```
pub fn extract_json(text: &str) -> Result<Value, ModelJsonError> {
    let trimmed = text.trim();
    let direct = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let span = trimmed
        .find('{')
        .zip(trimmed.rfind('}'))
        .filter(|(start, end)| end > start)
        .and_then(|(start, end)| trimmed.get(start..=end));

    match span {
        Some(candidate) => serde_json::from_str(candidate).map_err(|err| ModelJsonError {
            message: err.to_string(),
        }),
        None => Err(ModelJsonError {
            message: direct.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(r#"{"sentiment": "positive"}"#)]
    #[case("  {\"sentiment\": \"positive\"}\n")]
    #[case("Here you go:\n{\"sentiment\": \"positive\"}\nThanks.")]
    #[case("```json\n{\"sentiment\": \"positive\"}\n```")]
    fn recovers_the_object(#[case] text: &str) {
        let value = extract_json(text).expect("object recovered");
        assert_eq!(value, json!({"sentiment": "positive"}));
    }

    #[rstest]
    #[case("no json here")]
    #[case("} backwards {")]
    #[case("{ broken: ")]
    #[case("prefix {not json} suffix")]
    fn rejects_unrecoverable_text(#[case] text: &str) {
        assert!(extract_json(text).is_err());
    }

    #[rstest]
    fn direct_parse_accepts_non_object_values() {
        assert_eq!(extract_json("[1, 2]").expect("array"), json!([1, 2]));
    }
}
