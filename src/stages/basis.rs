use super::{PromptPipeline, StageName};
use crate::error::LexError;
use crate::llm::build_basis_prompt;
use crate::models::AnalysisResult;

impl PromptPipeline {
    /// Stage 2: expanded legal grounding, returned as raw text
    pub async fn run_basis_enhancement(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<String, LexError> {
        let prompt = build_basis_prompt(analysis);
        let basis = self.call(StageName::Basis, &prompt).await?;
        Ok(basis.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::tests::pipeline;
    use crate::llm::stub::ScriptedBackend;
    use crate::models::AnalysisResult;

    #[tokio::test]
    async fn test_basis_is_passthrough() {
        let backend = Arc::new(ScriptedBackend::replying(&[
            "\n1. Base legal: art. 186 do CC.\n2. Jurisprudência: REsp 1.234.567.\n",
        ]));
        let basis = pipeline(backend)
            .run_basis_enhancement(&AnalysisResult::default())
            .await
            .unwrap();

        assert_eq!(
            basis,
            "1. Base legal: art. 186 do CC.\n2. Jurisprudência: REsp 1.234.567."
        );
    }
}
