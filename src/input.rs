use crate::error::{Result, SrtlistError};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Upload name used for media fetched from a URL.
pub const URL_UPLOAD_NAME: &str = "uploadedfile.mp3";

/// MIME type assumed when a download doesn't declare one.
const URL_FALLBACK_MIME: &str = "audio/mpeg";

/// Where the media to transcribe comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    File(PathBuf),
    Url(String),
}

impl MediaSource {
    /// Pick a source from the two inputs. A file wins over a URL; a blank URL
    /// counts as missing.
    pub fn from_parts(file: Option<PathBuf>, url: Option<String>) -> Result<Self> {
        if let Some(path) = file {
            return Ok(MediaSource::File(path));
        }

        match url {
            Some(url) if !url.trim().is_empty() => Ok(MediaSource::Url(url.trim().to_string())),
            _ => Err(SrtlistError::NoSource),
        }
    }

    /// Short label for logs and output metadata.
    pub fn display_name(&self) -> String {
        match self {
            MediaSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            MediaSource::Url(url) => url.clone(),
        }
    }

    /// Load the media into memory, refusing anything above `max_bytes`.
    pub async fn acquire(&self, client: &reqwest::Client, max_bytes: usize) -> Result<MediaPayload> {
        match self {
            MediaSource::File(path) => read_file(path, max_bytes).await,
            MediaSource::Url(url) => download(client, url, max_bytes).await,
        }
    }
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::File(path) => write!(f, "{}", path.display()),
            MediaSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Media bytes ready to be sent as the multipart `file` part.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl MediaPayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

async fn read_file(path: &Path, max_bytes: usize) -> Result<MediaPayload> {
    if !path.exists() {
        return Err(SrtlistError::FileNotFound(path.display().to_string()));
    }

    let metadata = fs::metadata(path).await?;
    check_size(metadata.len() as usize, max_bytes)?;

    let bytes = fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.mp3")
        .to_string();

    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(MediaPayload {
        bytes,
        file_name,
        mime_type: mime_for_path(path).to_string(),
    })
}

async fn download(client: &reqwest::Client, url: &str, max_bytes: usize) -> Result<MediaPayload> {
    debug!("Downloading media from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SrtlistError::Download(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SrtlistError::Download(format!("{} returned {}", url, status)));
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| URL_FALLBACK_MIME.to_string());

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        bytes.extend_from_slice(&chunk);
        check_size(bytes.len(), max_bytes)?;
    }

    debug!("Downloaded {} bytes ({})", bytes.len(), mime_type);

    Ok(MediaPayload {
        bytes,
        file_name: URL_UPLOAD_NAME.to_string(),
        mime_type,
    })
}

/// Reject payloads above `max` bytes.
pub fn check_size(size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(SrtlistError::TooLarge { size, max });
    }
    Ok(())
}

/// Guess a MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") | Some("mpga") | Some("mpeg") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("webm") => "audio/webm",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}
