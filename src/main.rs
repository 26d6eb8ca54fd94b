//! # pagetext CLI Application
//!
//! Command-line front end for the extraction pipeline.
//!
//! - `extract`: build the report for one URL or local HTML file and print it
//!   (or save it with `--output`)
//! - `serve`: run the HTTP API (`GET /api/getJSON?url=...`)
//!
//! Content analysis runs when `ANTHROPIC_API_KEY` is set, unless
//! `--no-analysis` is given.

mod telemetry;

use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pagetext::analysis::{API_KEY_ENV, AnalysisConfig, ClaudeClient};
use pagetext::extractor::{ExtractionStrategy, ExtractorConfig, TextScope};
use pagetext::http::{FetchConfig, PageFetcher};
use pagetext::pipeline::{PageProcessor, PageReport, ProcessOptions};
use pagetext::server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch a web page and extract its text, structure and SEO statistics",
    long_about = None
)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one page (URL or local HTML file)
    Extract(ExtractArgs),

    /// Serve the extraction API over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Extraction strategy (tree|scan)
    #[arg(short, long, default_value = "tree")]
    strategy: ExtractionStrategy,

    /// Text attributed to each element (direct|full)
    #[arg(long, default_value = "direct")]
    text_scope: TextScope,

    /// Page fetch timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// Skip the content analysis even when an API key is configured
    #[arg(long)]
    no_analysis: bool,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// URL to fetch, or path to a local HTML file
    #[arg(required = true)]
    source: String,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Save the report to a file instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let _otel = telemetry::init_tracing_subscriber(cli.log_dir)?;

    match command {
        Commands::Extract(args) => extract_command(args).await?,
        Commands::Serve(args) => serve_command(args).await?,
    }

    Ok(())
}

fn build_processor(args: &PipelineArgs) -> anyhow::Result<PageProcessor> {
    let fetcher = PageFetcher::new(FetchConfig {
        timeout: Duration::from_secs(args.timeout),
        ..FetchConfig::default()
    })?;

    let extractor = ExtractorConfig::builder()
        .strategy(args.strategy)
        .text_scope(args.text_scope)
        .build();

    let mut processor = PageProcessor::new(fetcher, extractor);
    if args.no_analysis {
        return Ok(processor);
    }

    match AnalysisConfig::from_env() {
        Some(config) => {
            info!("Content analysis enabled with model {}", config.model);
            processor = processor.with_analyzer(Arc::new(ClaudeClient::new(config)?));
        }
        None => warn!("{} is not set; content analysis disabled", API_KEY_ENV),
    }

    Ok(processor)
}

/// Cancel `token` when the process receives Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            token.cancel();
        }
    });
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let processor = build_processor(&args.pipeline)?;
    let options = ProcessOptions::default();

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template("{spinner:.cyan} [{elapsed}] {msg}")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Extracting {}...", args.source));

    let result = processor.process_source(&args.source, &options, &cancel).await;
    spinner.finish_and_clear();
    let report = result?;

    let rendered = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&report)?,
        _ => render_text(&report),
    };

    if let Some(output_file) = args.output {
        let mut contents = rendered;
        if let (Some(analysis), "text") = (&report.claude_analysis, args.format.as_str()) {
            contents.push_str(&format!("\nAnalysis:\n{}\n", analysis));
        }
        tokio::fs::write(&output_file, contents).await?;
        println!("Saved report to {}", output_file.display());
        return Ok(());
    }

    println!("{}", rendered);
    if args.format != "json" {
        if let Some(analysis) = &report.claude_analysis {
            println!("Analysis:");
            pagetext::format_markdown(analysis)?;
            println!();
        }
    }

    Ok(())
}

fn render_text(report: &PageReport) -> String {
    let stats = &report.seo_stats;
    format!(
        "Source: {}\nExtracted: {}\n\n{}\n\nSEO stats:\n  Words: {}\n  \
         Headings: h1 {}, h2 {}, h3 {}\n  Paragraphs: {}\n  Links: {}\n  Images: {}\n  \
         Meta description: {}\n",
        report.url,
        report.extraction_date,
        report.detailed_text,
        stats.word_count,
        stats.heading_count.h1,
        stats.heading_count.h2,
        stats.heading_count.h3,
        stats.paragraph_count,
        stats.link_count,
        stats.image_count,
        if stats.has_meta_description { "yes" } else { "no" },
    )
}

#[instrument]
async fn serve_command(args: ServeArgs) -> anyhow::Result<()> {
    let processor = build_processor(&args.pipeline)?;
    let state = Arc::new(AppState::new(processor));
    cancel_on_ctrl_c(state.shutdown.clone());

    server::serve(args.bind, state).await?;
    Ok(())
}
