use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lexgenius::{
    CaseType, DocumentService, GenerationMode, MemoryCache, Provider, Settings, extract_sections,
    load_case_form, load_raw_text, normalize_free_text, normalize_sections, write_html, write_json,
    write_pdf,
};

#[derive(Parser)]
#[command(name = "lexgenius")]
#[command(author, version, about = "Legal document drafting pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a legal document from a case JSON file
    Generate {
        /// Case submission (JSON with case_type, parties, facts, legal_grounds, requests)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the printable HTML page
        #[arg(long)]
        html: PathBuf,

        /// Also render a PDF through wkhtmltopdf
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Also write the normalized document (title, date, body HTML, signature) as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Generation strategy
        #[arg(long, value_enum, default_value_t = GenerationMode::Single)]
        mode: GenerationMode,

        /// Text-generation provider (overrides LEXGENIUS_PROVIDER)
        #[arg(long, value_enum)]
        provider: Option<Provider>,

        /// Model name (overrides LEXGENIUS_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Maximum attempts per backend call (overrides LEXGENIUS_MAX_RETRIES)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Path to the wkhtmltopdf binary (overrides WKHTMLTOPDF_PATH)
        #[arg(long)]
        wkhtmltopdf: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a case JSON file and print the result as JSON
    Validate {
        /// Case submission to check
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Normalize previously generated model text into an HTML page
    Normalize {
        /// Raw model output
        #[arg(short, long)]
        input: PathBuf,

        /// Case type label used as the document title
        #[arg(long)]
        case_type: String,

        /// Output file for the printable HTML page
        #[arg(short, long)]
        output: PathBuf,

        /// Treat the input as marker-delimited sections
        #[arg(long)]
        sections: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            html,
            pdf,
            json,
            mode,
            provider,
            model,
            max_retries,
            wkhtmltopdf,
            verbose,
        } => {
            setup_logging(verbose);
            let mut settings = Settings::from_env()?;
            if let Some(provider) = provider {
                settings = settings.with_provider(provider, |name| std::env::var(name).ok());
            }
            if let Some(model) = model {
                settings.model = model;
            }
            if let Some(max_retries) = max_retries {
                settings.max_retries = max_retries.max(1);
            }
            if wkhtmltopdf.is_some() {
                settings.wkhtmltopdf_path = wkhtmltopdf;
            }
            let outputs = Outputs {
                html,
                pdf,
                json,
            };
            generate_document(settings, &input, &outputs, mode).await
        }
        Commands::Validate { input, verbose } => {
            setup_logging(verbose);
            validate_case(&input)
        }
        Commands::Normalize {
            input,
            case_type,
            output,
            sections,
            verbose,
        } => {
            setup_logging(verbose);
            normalize_file(&input, &case_type, &output, sections)
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Files a `generate` run writes
struct Outputs {
    html: PathBuf,
    pdf: Option<PathBuf>,
    json: Option<PathBuf>,
}

async fn generate_document(
    settings: Settings,
    input: &Path,
    outputs: &Outputs,
    mode: GenerationMode,
) -> Result<()> {
    info!("Loading case from {:?}", input);
    let form = load_case_form(input).context("Failed to load case")?;

    let backend = settings.build_backend()?;
    let cache = Arc::new(MemoryCache::new(settings.cache_ttl));
    let service = DocumentService::new(backend, cache, settings);
    let case = service.validate(&form)?;

    info!(
        "Generating {} with {} ({}), mode {:?}",
        case.case_type(),
        service.settings().provider,
        service.settings().model,
        mode
    );
    let document = service.generate(&case, mode).await?;
    write_html(&document, &outputs.html)?;
    info!("HTML written to {:?}", outputs.html);

    if let Some(json_path) = &outputs.json {
        write_json(&document, json_path)?;
        info!("JSON written to {:?}", json_path);
    }

    // The HTML is already on disk; a PDF failure only affects the PDF
    if let Some(pdf_path) = &outputs.pdf {
        match service.render_pdf(&document).await {
            Ok(bytes) => {
                write_pdf(&bytes, pdf_path)?;
                info!("PDF written to {:?}", pdf_path);
            }
            Err(e) => {
                warn!("PDF not generated: {}", e);
                return Err(e).context("Failed to render PDF");
            }
        }
    }

    Ok(())
}

fn validate_case(input: &Path) -> Result<()> {
    let settings = Settings::from_env()?;
    let form = load_case_form(input).context("Failed to load case")?;
    let report = form.report(&settings.limits);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn normalize_file(input: &Path, case_type: &str, output: &Path, sections: bool) -> Result<()> {
    let case_type: CaseType = case_type.parse()?;
    let raw = load_raw_text(input).context("Failed to load raw text")?;
    let today = Local::now().date_naive();

    let document = if sections {
        let map = extract_sections(&raw);
        info!(
            "Found {} section(s), {} line(s) discarded",
            map.found().count(),
            map.discarded_lines
        );
        if map.is_empty() {
            normalize_free_text(case_type.label(), &raw, today)
        } else {
            normalize_sections(case_type.label(), &map, today)
        }
    } else {
        normalize_free_text(case_type.label(), &raw, today)
    };

    write_html(&document, output)?;
    info!("HTML written to {:?}", output);
    Ok(())
}
