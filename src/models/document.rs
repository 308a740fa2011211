use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Signature block details; blank fields fall back to placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub city_date: String,
    #[serde(default)]
    pub lawyer_name: String,
    #[serde(default)]
    pub lawyer_oab: String,
}

impl Signature {
    pub fn lawyer_name_or_default(&self) -> &str {
        non_blank_or(&self.lawyer_name, "Advogado(a)")
    }

    pub fn lawyer_oab_or_default(&self) -> &str {
        non_blank_or(&self.lawyer_oab, "OAB/XX XXX.XXX")
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { fallback } else { value }
}

/// Sanitized document ready for the PDF renderer
///
/// `content_html` only ever holds markup that went through the sanitizer and
/// pruner; the shell around it is produced by [`crate::normalize::shell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Document title (the case type label)
    pub title: String,
    pub generated_on: NaiveDate,
    pub content_html: String,
    #[serde(default)]
    pub signature: Signature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_defaults() {
        let signature = Signature {
            lawyer_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(signature.lawyer_name_or_default(), "Advogado(a)");
        assert_eq!(signature.lawyer_oab_or_default(), "OAB/XX XXX.XXX");
    }

    #[test]
    fn test_document_serializes_date() {
        let document = NormalizedDocument {
            title: "Recurso".to_string(),
            generated_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            content_html: "<p class=\"document-paragraph\">x</p>".to_string(),
            signature: Signature::default(),
        };
        let json = serde_json::to_string(&document).unwrap();
        assert!(json.contains("2024-03-05"));
        let back: NormalizedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document);
    }
}
