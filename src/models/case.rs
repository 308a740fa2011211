use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LexError;

/// Kinds of legal document the pipeline can draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "Petição Inicial")]
    PeticaoInicial,
    #[serde(rename = "Contestação")]
    Contestacao,
    #[serde(rename = "Recurso")]
    Recurso,
    #[serde(rename = "Agravo")]
    Agravo,
    #[serde(rename = "Embargos")]
    Embargos,
}

impl CaseType {
    pub const ALL: [CaseType; 5] = [
        CaseType::PeticaoInicial,
        CaseType::Contestacao,
        CaseType::Recurso,
        CaseType::Agravo,
        CaseType::Embargos,
    ];

    /// The label shown on the form and in the document title
    pub fn label(self) -> &'static str {
        match self {
            CaseType::PeticaoInicial => "Petição Inicial",
            CaseType::Contestacao => "Contestação",
            CaseType::Recurso => "Recurso",
            CaseType::Agravo => "Agravo",
            CaseType::Embargos => "Embargos",
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseType {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CaseType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| LexError::invalid_input("case_type", "Tipo de peça inválido"))
    }
}

/// Length bounds applied to every free-text field
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub min_text_length: usize,
    pub max_text_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_text_length: 5000,
        }
    }
}

static FORBIDDEN_CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<script|javascript:|on\w+\s*=").expect("valid regex"));

/// Raw form submission, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseForm {
    #[serde(default)]
    pub case_type: String,
    #[serde(default)]
    pub parties: String,
    #[serde(default)]
    pub facts: String,
    #[serde(default)]
    pub legal_grounds: String,
    #[serde(default)]
    pub requests: String,
}

/// A validated case. Only obtainable through [`CaseForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseInput {
    case_type: CaseType,
    parties: String,
    facts: String,
    legal_grounds: String,
    requests: String,
}

impl CaseInput {
    pub fn case_type(&self) -> CaseType {
        self.case_type
    }

    pub fn parties(&self) -> &str {
        &self.parties
    }

    pub fn facts(&self) -> &str {
        &self.facts
    }

    pub fn legal_grounds(&self) -> &str {
        &self.legal_grounds
    }

    pub fn requests(&self) -> &str {
        &self.requests
    }

    /// Fields in their canonical order, as used for the cache key
    pub fn ordered_fields(&self) -> [&str; 5] {
        [
            self.case_type.label(),
            &self.parties,
            &self.facts,
            &self.legal_grounds,
            &self.requests,
        ]
    }
}

impl CaseForm {
    /// Validate every field and build an immutable [`CaseInput`].
    ///
    /// The first failing field is reported; nothing is sent to a backend.
    pub fn validate(&self, limits: &ValidationLimits) -> Result<CaseInput, LexError> {
        let case_type: CaseType = self.case_type.parse()?;

        Ok(CaseInput {
            case_type,
            parties: validate_text(&self.parties, "parties", "Partes Envolvidas", limits)?,
            facts: validate_text(&self.facts, "facts", "Fatos", limits)?,
            legal_grounds: validate_text(
                &self.legal_grounds,
                "legal_grounds",
                "Fundamentação Jurídica",
                limits,
            )?,
            requests: validate_text(&self.requests, "requests", "Pedidos", limits)?,
        })
    }

    /// Validation outcome in the shape of the JSON validation endpoint
    pub fn report(&self, limits: &ValidationLimits) -> ValidationReport {
        match self.validate(limits) {
            Ok(_) => ValidationReport {
                valid: true,
                message: None,
            },
            Err(LexError::InvalidInput { message, .. }) => ValidationReport {
                valid: false,
                message: Some(message),
            },
            Err(other) => ValidationReport {
                valid: false,
                message: Some(other.to_string()),
            },
        }
    }
}

/// Result returned by `lexgenius validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn validate_text(
    value: &str,
    field: &str,
    display: &str,
    limits: &ValidationLimits,
) -> Result<String, LexError> {
    let text = value.trim();
    if text.is_empty() {
        return Err(LexError::invalid_input(
            field,
            format!("O campo {} não pode estar vazio", display),
        ));
    }

    let length = text.chars().count();
    if length < limits.min_text_length {
        return Err(LexError::invalid_input(
            field,
            format!(
                "O campo {} deve ter pelo menos {} caracteres",
                display, limits.min_text_length
            ),
        ));
    }
    if length > limits.max_text_length {
        return Err(LexError::invalid_input(
            field,
            format!(
                "O campo {} não pode ter mais que {} caracteres",
                display, limits.max_text_length
            ),
        ));
    }

    if FORBIDDEN_CONTENT.is_match(text) {
        return Err(LexError::invalid_input(
            field,
            format!("O campo {} contém caracteres não permitidos", display),
        ));
    }

    Ok(text.to_string())
}
