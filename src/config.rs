use crate::error::{Result, SrtlistError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// OpenAI audio transcription endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Transcription model requested by default.
pub const DEFAULT_MODEL: &str = "whisper-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub default_format: OutputFormat,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            language: None,
            prompt: None,
            default_format: OutputFormat::default(),
            timeout_secs: 300,
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                match Self::from_toml_str(&contents) {
                    Ok(file_config) => {
                        debug!("Loaded config from {}", config_path.display());
                        config = file_config;
                    }
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(contents)?)
    }

    /// Apply `OPENAI_API_KEY` and `SRTLIST_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = lookup("SRTLIST_MODEL") {
            self.model = model;
        }
        if let Some(url) = lookup("SRTLIST_API_URL") {
            self.api_url = url;
        }
        if let Some(format) = lookup("SRTLIST_FORMAT") {
            if let Ok(f) = format.parse() {
                self.default_format = f;
            }
        }
        if let Some(timeout) = lookup("SRTLIST_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.openai_api_key.as_deref() {
            None | Some("") => {
                return Err(SrtlistError::Config(
                    "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-..."
                        .to_string(),
                ));
            }
            Some(_) => {}
        }

        if self.model.trim().is_empty() {
            return Err(SrtlistError::Config("Model must not be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(SrtlistError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("srtlist").join("config.toml"))
    }
}
