use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::cache::{CacheStore, cache_key};
use crate::config::Settings;
use crate::error::LexError;
use crate::llm::GenerationBackend;
use crate::models::{CaseForm, CaseInput, NormalizedDocument};
use crate::normalize::{normalize_free_text, normalize_sections, render_page};
use crate::render::{PdfRenderer, WkhtmltopdfRenderer};
use crate::stages::{GenerationMode, PromptPipeline};

/// Owns everything a generation request needs; built once by the entry point
pub struct DocumentService {
    pipeline: PromptPipeline,
    cache: Arc<dyn CacheStore>,
    settings: Settings,
    renderer: Option<Arc<dyn PdfRenderer>>,
}

impl DocumentService {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        cache: Arc<dyn CacheStore>,
        settings: Settings,
    ) -> Self {
        let pipeline = PromptPipeline::new(backend, settings.retry_policy(), settings.params);
        Self {
            pipeline,
            cache,
            settings,
            renderer: None,
        }
    }

    /// Use this renderer instead of locating `wkhtmltopdf`
    pub fn with_renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate a raw submission against the configured limits
    pub fn validate(&self, form: &CaseForm) -> Result<CaseInput, LexError> {
        form.validate(&self.settings.limits)
    }

    /// Generate and normalize a document, serving repeats from the cache
    pub async fn generate(
        &self,
        case: &CaseInput,
        mode: GenerationMode,
    ) -> Result<NormalizedDocument, LexError> {
        let span = info_span!(
            "generate",
            request_id = %Uuid::new_v4(),
            case_type = %case.case_type(),
            mode = ?mode
        );
        self.generate_for_date(case, mode, Local::now().date_naive())
            .instrument(span)
            .await
    }

    async fn generate_for_date(
        &self,
        case: &CaseInput,
        mode: GenerationMode,
        today: NaiveDate,
    ) -> Result<NormalizedDocument, LexError> {
        let key = cache_key(case);
        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_str::<NormalizedDocument>(&cached) {
                Ok(document) => {
                    debug!("Cache hit for {}", key);
                    return Ok(document);
                }
                Err(e) => warn!("Discarding unreadable cache entry {}: {}", key, e),
            }
        }

        let title = case.case_type().label();
        let document = match mode {
            GenerationMode::Staged => {
                let output = self.pipeline.run_staged_pipeline(case).await?;
                info!(
                    "Review: estrutura={:?}, clareza={:?}, {} suggestion(s)",
                    output.review.structure,
                    output.review.clarity,
                    output.review.improvements.len()
                );
                normalize_free_text(title, &output.document, today)
            }
            GenerationMode::Single => {
                let output = self.pipeline.run_single_call(case).await?;
                if output.sections.is_empty() {
                    warn!("No section markers in reply, normalizing it as free text");
                    normalize_free_text(title, &output.raw, today)
                } else {
                    normalize_sections(title, &output.sections, today)
                }
            }
        };

        match serde_json::to_string(&document) {
            Ok(json) => self.cache.set(&key, json),
            Err(e) => warn!("Could not cache document {}: {}", key, e),
        }
        info!("Generated {} ({} bytes of HTML)", title, document.content_html.len());

        Ok(document)
    }

    /// Render the printable page to PDF. Failures leave the document untouched.
    pub async fn render_pdf(&self, document: &NormalizedDocument) -> Result<Vec<u8>, LexError> {
        let page = render_page(document);
        match &self.renderer {
            Some(renderer) => renderer.render(&page).await,
            None => {
                WkhtmltopdfRenderer::locate(self.settings.wkhtmltopdf_path.as_deref())?
                    .render(&page)
                    .await
            }
        }
    }
}
