use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrtlistError {
    #[error("Please upload a file or enter a URL.")]
    NoSource,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("File too large for transcription: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SrtlistError>;
