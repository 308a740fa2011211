use tracing::{info, warn};

use super::{PromptPipeline, StageName};
use crate::error::LexError;
use crate::llm::build_single_call_prompt;
use crate::models::{CaseInput, SectionMap};
use crate::normalize::extract_sections;

/// Raw reply of a single-call generation and the sections parsed from it
#[derive(Debug, Clone)]
pub struct SingleCallOutput {
    pub raw: String,
    pub sections: SectionMap,
}

impl PromptPipeline {
    /// Mode B: one marker-delimited generation parsed into sections.
    ///
    /// Missing markers are not an error; their sections read as `""`.
    pub async fn run_single_call_generation(
        &self,
        case: &CaseInput,
    ) -> Result<SectionMap, LexError> {
        Ok(self.run_single_call(case).await?.sections)
    }

    /// Like [`Self::run_single_call_generation`], keeping the raw reply for fallbacks
    pub async fn run_single_call(&self, case: &CaseInput) -> Result<SingleCallOutput, LexError> {
        let prompt = build_single_call_prompt(case);
        let raw = self.call(StageName::SingleCall, &prompt).await?;
        let sections = extract_sections(&raw);

        let found = sections.found().count();
        info!("Single call: {} of 8 sections found", found);
        if sections.discarded_lines > 0 {
            warn!(
                "Single call: {} line(s) outside any recognized marker were discarded",
                sections.discarded_lines
            );
        }

        Ok(SingleCallOutput { raw, sections })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::tests::{pipeline, sample_case};
    use crate::llm::stub::ScriptedBackend;
    use crate::models::Section;

    #[tokio::test]
    async fn test_single_call_parses_markers() {
        let backend = Arc::new(ScriptedBackend::replying(&[
            "Claro, segue a peça:\n[PARTIES]\nJoão Silva\n[FACTS]\nCompra de produto defeituoso.\n[REQUESTS]\nTroca do produto; danos morais\n",
        ]));
        let sections = pipeline(backend.clone())
            .run_single_call_generation(&sample_case())
            .await
            .unwrap();

        assert_eq!(sections.get(Section::Parties), "João Silva");
        assert_eq!(sections.get(Section::Requests), "Troca do produto; danos morais");
        assert_eq!(sections.get(Section::LawyerOab), "");
        assert_eq!(sections.discarded_lines, 1);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("[LAWYER_OAB]"));
    }
}
