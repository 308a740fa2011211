use tracing::info;

use super::{PromptPipeline, StageName};
use crate::error::LexError;
use crate::llm::{build_review_prompt, parse_structured};
use crate::models::ReviewResult;

impl PromptPipeline {
    /// Stage 4: JSON critique of the drafted document
    pub async fn run_review(&self, document: &str) -> Result<ReviewResult, LexError> {
        let prompt = build_review_prompt(document);
        let text = self.call(StageName::Review, &prompt).await?;
        let review: ReviewResult = parse_structured(StageName::Review.as_str(), &text)?;
        info!("Review: {} suggestions", review.improvements.len());
        Ok(review)
    }
}
