pub mod cache;
pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod render;
pub mod service;
pub mod stages;

pub use cache::{CacheStore, MemoryCache, cache_key};
pub use config::{Provider, Settings};
pub use error::LexError;
pub use io::{load_case_form, load_raw_text, write_html, write_json, write_pdf};
pub use llm::{
    AnthropicClient, AnthropicConfig, BackendError, GeminiClient, GeminiConfig, GenerationBackend,
    RetryPolicy,
};
pub use models::{
    AnalysisResult, CaseForm, CaseInput, CaseType, NormalizedDocument, ReviewResult, Section,
    SectionMap, Signature, ValidationLimits, ValidationReport,
};
pub use normalize::{
    extract_sections, normalize_fragment, normalize_free_text, normalize_sections, render_page,
};
pub use render::{PdfRenderer, WkhtmltopdfRenderer};
pub use service::DocumentService;
pub use stages::{GenerationMode, GenerationParams, PromptPipeline};
