use serde::de::DeserializeOwned;

use crate::error::LexError;

/// Parse a model reply that must be a JSON object of type `T`.
///
/// Tolerates a surrounding Markdown code fence and leading/trailing prose
/// around a single top-level object. Anything else is a malformed response.
pub fn parse_structured<T: DeserializeOwned>(stage: &str, text: &str) -> Result<T, LexError> {
    let cleaned = strip_code_fence(text.trim());
    if cleaned.is_empty() {
        return Err(LexError::malformed(stage, "empty response text"));
    }

    match serde_json::from_str::<T>(cleaned) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            // Fall back to the outermost braces when the model wrapped the object in prose
            let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if end > start => &cleaned[start..=end],
                _ => {
                    return Err(LexError::malformed(
                        stage,
                        format!("invalid JSON response: {}", first_error),
                    ));
                }
            };
            serde_json::from_str::<T>(candidate).map_err(|_| {
                LexError::malformed(stage, format!("invalid JSON response: {}", first_error))
            })
        }
    }
}

/// Remove a ```/```json fence wrapping the whole text
pub fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string ("json", "html", ...) on the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisResult, ReviewResult};

    #[test]
    fn test_parse_plain_json() {
        let analysis: AnalysisResult =
            parse_structured("analysis", r#"{"riscos": ["Prescrição"]}"#).unwrap();
        assert_eq!(analysis.risks, vec!["Prescrição"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"estrutura\": \"Boa\", \"clareza\": \"Boa\", \"coerencia\": \"Boa\", \"sugestoes_melhoria\": []}\n```";
        let review: ReviewResult = parse_structured("review", text).unwrap();
        assert_eq!(review.structure, "Boa");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let text = "Segue a análise:\n{\"pontos_fortes\": [\"Contrato assinado\"]}\nAtenciosamente.";
        let analysis: AnalysisResult = parse_structured("analysis", text).unwrap();
        assert_eq!(analysis.strengths, vec!["Contrato assinado"]);
    }

    #[test]
    fn test_empty_text_is_malformed() {
        let result: Result<AnalysisResult, _> = parse_structured("analysis", "   ");
        assert!(matches!(result, Err(LexError::MalformedResponse { .. })));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result: Result<ReviewResult, _> = parse_structured("review", "O documento está ótimo.");
        match result {
            Err(LexError::MalformedResponse { stage, message }) => {
                assert_eq!(stage, "review");
                assert!(message.contains("invalid JSON"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_strip_code_fence_without_fence() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\nDOS FATOS\n```"), "DOS FATOS");
    }
}
