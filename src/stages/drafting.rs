use tracing::info;

use super::{PromptPipeline, StageName};
use crate::error::LexError;
use crate::llm::{build_drafting_prompt, strip_code_fence};
use crate::models::AnalysisResult;

impl PromptPipeline {
    /// Stage 3: formal document body built from the analysis and the basis
    pub async fn run_drafting(
        &self,
        analysis: &AnalysisResult,
        basis: &str,
    ) -> Result<String, LexError> {
        let prompt = build_drafting_prompt(analysis, basis);
        let text = self.call(StageName::Drafting, &prompt).await?;
        let document = strip_code_fence(text.trim()).to_string();
        info!("Drafting: {} lines", document.lines().count());
        Ok(document)
    }
}
