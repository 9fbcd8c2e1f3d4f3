//! Selection Analyzer CLI
//!
//! Analyzes one rectangular selection of a PDF page and prints the text found.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use selection_analyzer::analysis::{
    AnalysisMode, AnalysisOptions, AnalysisRunner, SelectionAnalyzer, SelectionRequest,
};
use selection_analyzer::config::Config;
use selection_analyzer::document::DocumentSource;
use selection_analyzer::geometry::{ViewportRect, ViewportSize};
use selection_analyzer::ocr::{LanguageMode, OcrEngine, TesseractCli};

#[derive(Debug, Parser)]
#[command(name = "selection-analyzer", version, about = "Extract text from a region of a PDF page")]
struct Args {
    /// PDF file
    pdf: PathBuf,

    /// Page index (0-based)
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Selection in viewport pixels: x,y,width,height
    #[arg(long)]
    rect: ViewportRect,

    /// Viewport size: WIDTHxHEIGHT
    #[arg(long, default_value = "800x600")]
    viewport: ViewportSize,

    /// Preview zoom factor
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// OCR language: jpn+eng, jpn, eng or auto (defaults to the configured one)
    #[arg(long)]
    lang: Option<String>,

    /// Single OCR configuration, no embedded images
    #[arg(long)]
    fast: bool,

    /// Config file (defaults to ./selection_analyzer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env feeds RUST_LOG, so load it before the filter is built
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "selection_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let language = match &args.lang {
        Some(value) => LanguageMode::parse(value).unwrap_or_else(|| {
            tracing::warn!("Unknown language {:?}, using jpn+eng", value);
            LanguageMode::default()
        }),
        None => config.ocr.language_mode(),
    };
    let options = AnalysisOptions {
        language,
        mode: if args.fast {
            AnalysisMode::Fast
        } else {
            AnalysisMode::Thorough
        },
    };

    let engine = TesseractCli::new(
        config.ocr.tesseract.command.clone(),
        config.ocr.tesseract.tessdata_dir.clone(),
    );
    if !engine.is_available() {
        tracing::warn!(
            "OCR engine '{}' not available, image-only selections will report errors",
            config.ocr.tesseract.command
        );
    }

    let analyzer = SelectionAnalyzer::from_config(&config, Arc::new(engine));
    tracing::info!(
        "Starting selection analyzer v{} (backend: {})",
        env!("CARGO_PKG_VERSION"),
        analyzer.backend_name()
    );
    let runner = AnalysisRunner::new(Arc::new(analyzer));

    let request = SelectionRequest {
        document: DocumentSource::from_path(&args.pdf),
        page_index: args.page,
        viewport_rect: args.rect,
        viewport_size: args.viewport,
        zoom_scale: args.zoom,
    };

    let report = runner
        .submit(request, options)
        .await
        .with_context(|| format!("Analysis of {} did not complete", args.pdf.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.combined_text);
    }

    Ok(())
}
