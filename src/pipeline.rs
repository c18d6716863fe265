use crate::config::Config;
use crate::error::{Result, SrtlistError};
use crate::input::MediaSource;
use crate::subtitle::{parse_srt, Segment};
use crate::transcribe::{create_transcriber, Transcriber};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Options for a single transcription run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Show spinners while downloading and transcribing.
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// Statistics from one transcription run.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Time spent reading or downloading the media.
    pub acquire_time: Duration,
    /// Time spent waiting on the transcription API.
    pub transcription_time: Duration,
    /// Total time for the run.
    pub total_time: Duration,
    /// Bytes sent to the API.
    pub bytes_uploaded: usize,
    /// Number of parsed segments.
    pub segment_count: usize,
    /// Transcriber that handled the request.
    pub provider: String,
}

/// Result of one transcription run.
#[derive(Debug)]
pub struct TranscriptResult {
    /// Segments in the order their cues appeared in the response.
    pub segments: Vec<Segment>,
    /// File name or URL of the media.
    pub source_name: String,
    /// Raw SRT body returned by the API.
    pub raw_srt: String,
    pub stats: PipelineStats,
}

/// Transcribe `source` with the transcriber described by `config`.
pub async fn transcribe_source(
    source: &MediaSource,
    config: &Config,
    options: PipelineOptions,
) -> Result<TranscriptResult> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let transcriber = create_transcriber(config)?;
    transcribe_with(source, transcriber.as_ref(), options, cancelled).await
}

/// Transcribe `source` with an explicit transcriber and cancellation flag.
///
/// Each call starts from an empty segment list; nothing from a previous run
/// is carried over.
pub async fn transcribe_with(
    source: &MediaSource,
    transcriber: &dyn Transcriber,
    options: PipelineOptions,
    cancelled: Arc<AtomicBool>,
) -> Result<TranscriptResult> {
    let start_time = Instant::now();
    let client = reqwest::Client::new();

    let multi_progress = if options.show_progress {
        Some(MultiProgress::new())
    } else {
        None
    };

    check_cancelled(&cancelled)?;

    // Stage 1: load the media
    info!("Stage 1/3: Loading {}", source);
    let acquire_start = Instant::now();

    let acquire_pb = spinner(multi_progress.as_ref(), "Loading media...");
    let media = source.acquire(&client, transcriber.max_file_size()).await?;
    if let Some(pb) = acquire_pb {
        pb.finish_with_message(format!("✓ Loaded {}", format_size(media.len() as u64)));
    }

    let acquire_time = acquire_start.elapsed();
    debug!(
        "Loaded {} bytes as {} in {:.2}s",
        media.len(),
        media.file_name,
        acquire_time.as_secs_f64()
    );

    check_cancelled(&cancelled)?;

    // Stage 2: upload and transcribe
    info!("Stage 2/3: Transcribing with {}", transcriber.name());
    let transcription_start = Instant::now();

    let transcribe_pb = spinner(multi_progress.as_ref(), "Transcribing...");
    let raw_srt = transcriber.transcribe(&media).await?;
    if let Some(pb) = transcribe_pb {
        pb.finish_with_message("✓ Transcription received");
    }

    let transcription_time = transcription_start.elapsed();
    info!(
        "Transcription complete: {} bytes in {:.2}s",
        raw_srt.len(),
        transcription_time.as_secs_f64()
    );

    check_cancelled(&cancelled)?;

    // Stage 3: parse
    info!("Stage 3/3: Parsing segments");
    let segments = parse_srt(&raw_srt);
    info!("Parsed {} segments", segments.len());

    let stats = PipelineStats {
        acquire_time,
        transcription_time,
        total_time: start_time.elapsed(),
        bytes_uploaded: media.len(),
        segment_count: segments.len(),
        provider: transcriber.name().to_string(),
    };

    Ok(TranscriptResult {
        segments,
        source_name: source.display_name(),
        raw_srt,
        stats,
    })
}

/// Parse an SRT file already on disk.
pub fn parse_file(path: &Path) -> Result<Vec<Segment>> {
    if !path.exists() {
        return Err(SrtlistError::FileNotFound(path.display().to_string()));
    }

    let raw = std::fs::read_to_string(path)?;
    let segments = parse_srt(&raw);
    info!("Parsed {} segments from {}", segments.len(), path.display());

    Ok(segments)
}

/// Print a summary of the run to stderr.
pub fn print_summary(result: &TranscriptResult) {
    eprintln!();
    eprintln!("  Source:     {}", result.source_name);
    eprintln!("  Provider:   {}", result.stats.provider);
    eprintln!("  Segments:   {}", result.stats.segment_count);
    eprintln!("  Uploaded:   {}", format_size(result.stats.bytes_uploaded as u64));
    eprintln!(
        "  Timing:     load {:.2}s, transcribe {:.2}s, total {:.2}s",
        result.stats.acquire_time.as_secs_f64(),
        result.stats.transcription_time.as_secs_f64(),
        result.stats.total_time.as_secs_f64()
    );
    eprintln!();
}

fn check_cancelled(cancelled: &AtomicBool) -> Result<()> {
    if cancelled.load(Ordering::Relaxed) {
        return Err(SrtlistError::Cancelled);
    }
    Ok(())
}

fn spinner(multi_progress: Option<&MultiProgress>, message: &'static str) -> Option<ProgressBar> {
    multi_progress.map(|mp| {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
