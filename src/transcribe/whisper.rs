use crate::config::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::error::{Result, SrtlistError};
use crate::input::{check_size, MediaPayload};
use crate::transcribe::Transcriber;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum upload size accepted by the transcription endpoint (25 MB).
pub const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Maximum attempts per request.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 1000;

/// OpenAI audio transcription client that asks for SRT output.
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    language: Option<String>,
    prompt: Option<String>,
    timeout: Option<Duration>,
    max_retries: u32,
    base_delay: Duration,
}

impl WhisperClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            language: None,
            prompt: None,
            timeout: None,
            max_retries: MAX_RETRIES,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }

    /// Set the model to use (e.g. `whisper-1`).
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set the source language (ISO 639-1 code).
    pub fn with_language(mut self, language: String) -> Self {
        self.language = Some(language);
        self
    }

    /// Set a prompt for vocabulary hints.
    pub fn with_prompt(mut self, prompt: String) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override attempt count and backoff base.
    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.base_delay = base_delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the multipart form for the API request.
    fn build_form(&self, media: &MediaPayload) -> Result<Form> {
        let file_part = Part::bytes(media.bytes.clone())
            .file_name(media.file_name.clone())
            .mime_str(&media.mime_type)?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "srt");

        if let Some(ref lang) = self.language {
            form = form.text("language", lang.clone());
        }

        if let Some(ref prompt) = self.prompt {
            form = form.text("prompt", prompt.clone());
        }

        Ok(form)
    }

    /// Make the API request (form is consumed, so no retries at this level).
    async fn call_api(&self, form: Form) -> std::result::Result<String, ApiFailure> {
        let mut request = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(ApiFailure::retryable)?;

        let status = response.status();
        debug!("Transcription API response status: {}", status);

        if status.is_success() {
            let body = response.text().await.map_err(ApiFailure::retryable)?;
            debug!("Transcription API response: {}", &body[..floor_char_boundary(&body, 500)]);
            return Ok(body);
        }

        let error_body = response.text().await.unwrap_or_default();
        let error = api_error(status, &error_body);

        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            Err(ApiFailure::fatal(error))
        } else {
            Err(ApiFailure::retryable(error))
        }
    }

    /// Transcribe with retry logic - rebuilds form on each attempt.
    async fn transcribe_with_retry(&self, media: &MediaPayload) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!("Retry attempt {} after {:?} delay", attempt, delay);
                tokio::time::sleep(delay).await;
            }

            let form = self.build_form(media)?;

            match self.call_api(form).await {
                Ok(body) => return Ok(body),
                Err(ApiFailure { error, retry: false }) => return Err(error),
                Err(ApiFailure { error, retry: true }) => {
                    warn!("Attempt {} failed: {}", attempt + 1, error);
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SrtlistError::Api("Unknown error".to_string())))
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, media: &MediaPayload) -> Result<String> {
        debug!(
            "Transcribing {} ({} bytes, {}) with {}",
            media.file_name,
            media.len(),
            media.mime_type,
            self.model
        );

        if media.is_empty() {
            return Err(SrtlistError::Transcription(format!(
                "{} is empty",
                media.file_name
            )));
        }

        check_size(media.len(), MAX_FILE_SIZE)?;

        let body = self.transcribe_with_retry(media).await?;

        debug!("Transcription returned {} bytes of SRT", body.len());

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }

    fn max_file_size(&self) -> usize {
        MAX_FILE_SIZE
    }
}

struct ApiFailure {
    error: SrtlistError,
    retry: bool,
}

impl ApiFailure {
    fn retryable(error: impl Into<SrtlistError>) -> Self {
        Self {
            error: error.into(),
            retry: true,
        }
    }

    fn fatal(error: SrtlistError) -> Self {
        Self { error, retry: false }
    }
}

fn api_error(status: StatusCode, body: &str) -> SrtlistError {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(body) {
        return SrtlistError::Api(format!(
            "Transcription API error ({}): {} ({})",
            status, api_error.error.message, api_error.error.r#type
        ));
    }

    SrtlistError::Api(format!("Transcription API error ({}): {}", status, body))
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

// API response types

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    r#type: String,
    #[allow(dead_code)]
    code: Option<String>,
}
