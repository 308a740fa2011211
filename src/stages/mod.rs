pub mod analysis;
pub mod basis;
pub mod drafting;
pub mod review;
pub mod single_call;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LexError;
use crate::llm::{GenerationBackend, RetryPolicy};
use crate::models::{AnalysisResult, CaseInput, ReviewResult, StagedOutput};

/// Names of the LLM calls the pipeline can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Analysis,
    Basis,
    Drafting,
    Review,
    SingleCall,
}

impl StageName {
    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Analysis => "analysis",
            StageName::Basis => "basis",
            StageName::Drafting => "drafting",
            StageName::Review => "review",
            StageName::SingleCall => "single_call",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered call and the earlier outputs its prompt interpolates
#[derive(Debug, Clone, Copy)]
pub struct PipelineStage {
    pub name: StageName,
    pub depends_on: &'static [StageName],
}

/// Mode A: analysis → basis → drafting → review
pub const STAGED_PLAN: [PipelineStage; 4] = [
    PipelineStage {
        name: StageName::Analysis,
        depends_on: &[],
    },
    PipelineStage {
        name: StageName::Basis,
        depends_on: &[StageName::Analysis],
    },
    PipelineStage {
        name: StageName::Drafting,
        depends_on: &[StageName::Analysis, StageName::Basis],
    },
    PipelineStage {
        name: StageName::Review,
        depends_on: &[StageName::Drafting],
    },
];

/// Which generation strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Four sequential calls producing free text
    Staged,
    /// One call producing marker-delimited sections
    #[default]
    Single,
}

/// Sampling parameters passed with every backend call
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// Issues the ordered prompts for a case against one backend
pub struct PromptPipeline {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
    params: GenerationParams,
}

impl PromptPipeline {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        retry: RetryPolicy,
        params: GenerationParams,
    ) -> Self {
        Self {
            backend,
            retry,
            params,
        }
    }

    /// Send one prompt through the retry policy
    async fn call(&self, stage: StageName, prompt: &str) -> Result<String, LexError> {
        debug!(
            "Stage {}: sending {} chars to {}",
            stage,
            prompt.len(),
            self.backend.name()
        );
        let backend = &self.backend;
        let params = self.params;
        self.retry
            .run(stage.as_str(), || {
                backend.generate(prompt, params.max_tokens, params.temperature)
            })
            .await
    }

    /// Execute the whole staged plan for a case
    pub async fn run_staged_pipeline(&self, case: &CaseInput) -> Result<StagedOutput, LexError> {
        self.run_plan(&STAGED_PLAN, case).await
    }

    /// Run `plan` in order, feeding each stage the outputs it depends on
    pub async fn run_plan(
        &self,
        plan: &[PipelineStage],
        case: &CaseInput,
    ) -> Result<StagedOutput, LexError> {
        check_plan(plan)?;

        let total = plan.len();
        let mut analysis: Option<AnalysisResult> = None;
        let mut basis: Option<String> = None;
        let mut document: Option<String> = None;
        let mut review: Option<ReviewResult> = None;

        for (index, stage) in plan.iter().enumerate() {
            info!("Stage {}/{}: {}", index + 1, total, stage.name);
            match stage.name {
                StageName::Analysis => analysis = Some(self.run_analysis(case).await?),
                StageName::Basis => {
                    let analysis = completed(&analysis, StageName::Analysis)?;
                    basis = Some(self.run_basis_enhancement(analysis).await?);
                }
                StageName::Drafting => {
                    let analysis = completed(&analysis, StageName::Analysis)?;
                    let basis = completed(&basis, StageName::Basis)?;
                    document = Some(self.run_drafting(analysis, basis).await?);
                }
                StageName::Review => {
                    let document = completed(&document, StageName::Drafting)?;
                    review = Some(self.run_review(document).await?);
                }
                StageName::SingleCall => {
                    return Err(LexError::Config(
                        "single_call cannot run inside a staged plan".to_string(),
                    ));
                }
            }
        }

        Ok(StagedOutput {
            analysis: take_completed(analysis, StageName::Analysis)?,
            basis: take_completed(basis, StageName::Basis)?,
            document: take_completed(document, StageName::Drafting)?,
            review: take_completed(review, StageName::Review)?,
        })
    }
}

/// Every dependency must appear earlier in the plan than the stage using it
pub fn check_plan(plan: &[PipelineStage]) -> Result<(), LexError> {
    for (index, stage) in plan.iter().enumerate() {
        for dependency in stage.depends_on {
            if !plan[..index].iter().any(|s| s.name == *dependency) {
                return Err(LexError::Config(format!(
                    "stage '{}' depends on '{}', which does not run before it",
                    stage.name, dependency
                )));
            }
        }
    }
    Ok(())
}

fn completed<T>(output: &Option<T>, stage: StageName) -> Result<&T, LexError> {
    output
        .as_ref()
        .ok_or_else(|| LexError::Config(format!("stage '{}' has not run", stage)))
}

fn take_completed<T>(output: Option<T>, stage: StageName) -> Result<T, LexError> {
    output.ok_or_else(|| LexError::Config(format!("stage '{}' has not run", stage)))
}
