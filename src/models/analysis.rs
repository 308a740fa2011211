use serde::{Deserialize, Serialize};

/// Structured case analysis returned by the first pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "pontos_fortes", default)]
    pub strengths: Vec<String>,
    #[serde(rename = "pontos_fracos", default)]
    pub weaknesses: Vec<String>,
    #[serde(rename = "riscos", default)]
    pub risks: Vec<String>,
    #[serde(rename = "oportunidades", default)]
    pub opportunities: Vec<String>,
    #[serde(rename = "sugestoes_melhoria", default)]
    pub improvements: Vec<String>,
}

impl AnalysisResult {
    /// Pretty JSON for interpolation into later prompts
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.risks.is_empty()
            && self.opportunities.is_empty()
            && self.improvements.is_empty()
    }
}

/// Critique of the drafted document returned by the review stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(rename = "estrutura", default)]
    pub structure: String,
    #[serde(rename = "clareza", default)]
    pub clarity: String,
    #[serde(rename = "coerencia", default)]
    pub coherence: String,
    #[serde(rename = "sugestoes_melhoria", default)]
    pub improvements: Vec<String>,
}
