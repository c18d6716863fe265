use anyhow::{Context, Result};
use clap::Parser;
use srtlist::config::{Config, OutputFormat};
use srtlist::interactive::run_interactive_wizard;
use srtlist::subtitle::{create_formatter, json::JsonFormatter, Segment, SegmentFormatter};
use srtlist::transcribe::create_transcriber;
use srtlist::{parse_file, print_summary, transcribe_with, MediaSource, PipelineOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "srtlist")]
#[command(version, about = "Transcribe audio/video and list timestamped segments")]
#[command(long_about = "Upload a media file (or fetch one from a URL) to the OpenAI transcription API and print the returned subtitles as timestamp + caption rows.")]
struct Cli {
    /// Local audio/video file to upload
    file: Option<PathBuf>,

    /// Fetch the media from this URL instead of a local file
    #[arg(short, long)]
    url: Option<String>,

    /// Parse an existing SRT file without calling the API
    #[arg(long, conflicts_with_all = ["file", "url"])]
    srt: Option<PathBuf>,

    /// Output format: text, json
    #[arg(short, long)]
    format: Option<String>,

    /// Write the segment list to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spoken language code (e.g., en, ja, es)
    #[arg(short, long)]
    language: Option<String>,

    /// Transcription model
    #[arg(short, long)]
    model: Option<String>,

    /// Vocabulary hint passed to the API
    #[arg(long)]
    prompt: Option<String>,

    /// Prompt for the source and options interactively
    #[arg(short, long, conflicts_with_all = ["file", "url"])]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn emit(
    segments: &[Segment],
    formatter: &dyn SegmentFormatter,
    output: Option<&PathBuf>,
) -> Result<()> {
    if segments.is_empty() {
        warn!("No transcript to display");
    }

    let content = formatter.format(segments);

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} segments to {}", segments.len(), path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;

    let cli_format = cli
        .format
        .as_deref()
        .map(str::parse::<OutputFormat>)
        .transpose()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if let Some(path) = cli.srt {
        let segments = parse_file(&path).context("Failed to read SRT file")?;
        let formatter = create_formatter(cli_format.unwrap_or(config.default_format));
        return emit(&segments, formatter.as_ref(), cli.output.as_ref());
    }

    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(language) = cli.language {
        config.language = Some(language);
    }
    if let Some(prompt) = cli.prompt {
        config.prompt = Some(prompt);
    }

    let (source, format) = if cli.interactive || (cli.file.is_none() && cli.url.is_none()) {
        let result = run_interactive_wizard(config)?;
        config = result.config;
        (result.source, cli_format.unwrap_or(result.format))
    } else {
        let source = MediaSource::from_parts(cli.file, cli.url)?;
        (source, cli_format.unwrap_or(config.default_format))
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Source:   {}", source);
    info!("Model:    {}", config.model);
    if let Some(ref language) = config.language {
        info!("Language: {}", language);
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancelled.clone();
    ctrlc::set_handler(move || {
        cancel_flag.store(true, Ordering::Relaxed);
        eprintln!("\nCancelling after the current stage...");
    })
    .context("Failed to set Ctrl+C handler")?;

    let transcriber = create_transcriber(&config)?;

    let result = transcribe_with(
        &source,
        transcriber.as_ref(),
        PipelineOptions::default(),
        cancelled,
    )
    .await
    .context("Transcription failed")?;

    let formatter: Box<dyn SegmentFormatter> = match format {
        OutputFormat::Json => Box::new(JsonFormatter {
            source: Some(result.source_name.clone()),
            model: Some(config.model.clone()),
            language: config.language.clone(),
        }),
        other => create_formatter(other),
    };

    emit(&result.segments, formatter.as_ref(), cli.output.as_ref())?;

    if cli.output.is_some() || cli.verbose {
        print_summary(&result);
    }

    Ok(())
}
