use tracing::{info, warn};

use super::{PromptPipeline, StageName};
use crate::error::LexError;
use crate::llm::{build_analysis_prompt, parse_structured};
use crate::models::{AnalysisResult, CaseInput};

impl PromptPipeline {
    /// Stage 1: ask for a JSON analysis of the case
    ///
    /// Fails with `MalformedResponse` when the reply is not the expected object;
    /// later stages cannot run without it.
    pub async fn run_analysis(&self, case: &CaseInput) -> Result<AnalysisResult, LexError> {
        let prompt = build_analysis_prompt(case);
        let text = self.call(StageName::Analysis, &prompt).await?;
        let analysis: AnalysisResult = parse_structured(StageName::Analysis.as_str(), &text)?;

        info!(
            "Analysis: {} strengths, {} weaknesses, {} risks",
            analysis.strengths.len(),
            analysis.weaknesses.len(),
            analysis.risks.len()
        );
        if analysis.is_empty() {
            warn!("Analysis reply parsed but lists nothing; later stages get an empty analysis");
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::tests::{pipeline, sample_case};
    use crate::error::LexError;
    use crate::llm::BackendError;
    use crate::llm::stub::ScriptedBackend;

    #[tokio::test]
    async fn test_analysis_retries_empty_reply() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok(String::new()),
            Ok(r#"{"oportunidades": ["Acordo extrajudicial"]}"#.to_string()),
        ]));
        let analysis = pipeline(backend.clone())
            .run_analysis(&sample_case())
            .await
            .unwrap();

        assert_eq!(analysis.opportunities, vec!["Acordo extrajudicial"]);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_analysis_surfaces_generation_failure() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            Err(BackendError::Api { status: 500, body: "a".to_string() }),
            Err(BackendError::Api { status: 500, body: "b".to_string() }),
            Err(BackendError::Api { status: 502, body: "c".to_string() }),
        ]));
        let result = pipeline(backend.clone()).run_analysis(&sample_case()).await;

        match result {
            Err(LexError::GenerationFailed { stage, attempts, source }) => {
                assert_eq!(stage, "analysis");
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("502"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
