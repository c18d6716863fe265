//! Mock API tests for the transcription client
//!
//! These tests run the client and pipeline against a local mock server.

use srtlist::error::SrtlistError;
use srtlist::input::{MediaPayload, MediaSource};
use srtlist::pipeline::{transcribe_with, PipelineOptions};
use srtlist::transcribe::{Transcriber, WhisperClient};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SRT_BODY: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n2\n00:00:02,500 --> 00:00:05,000\nSecond line\n\n";

fn payload() -> MediaPayload {
    MediaPayload {
        bytes: b"ID3 not really audio".to_vec(),
        file_name: "clip.mp3".to_string(),
        mime_type: "audio/mpeg".to_string(),
    }
}

fn client_for(server: &MockServer) -> WhisperClient {
    WhisperClient::new("test-key".to_string())
        .with_base_url(format!("{}/v1/audio/transcriptions", server.uri()))
        .with_retries(3, Duration::from_millis(10))
}

fn quiet() -> PipelineOptions {
    PipelineOptions {
        show_progress: false,
    }
}

// ============================================================================
// Whisper Client Tests
// ============================================================================

mod whisper_tests {
    use super::*;

    #[tokio::test]
    async fn test_sends_srt_request_and_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_string_contains("name=\"response_format\""))
            .and(body_string_contains("srt"))
            .and(body_string_contains("whisper-1"))
            .and(body_string_contains("filename=\"clip.mp3\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).transcribe(&payload()).await.unwrap();
        assert_eq!(body, SRT_BODY);
    }

    #[tokio::test]
    async fn test_sends_language_and_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("name=\"language\""))
            .and(body_string_contains("name=\"prompt\""))
            .and(body_string_contains("Ada Lovelace"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server)
            .with_language("en".to_string())
            .with_prompt("Ada Lovelace".to_string());

        assert!(client.transcribe(&payload()).await.is_ok());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).transcribe(&payload()).await.unwrap_err();
        assert!(matches!(err, SrtlistError::Api(_)));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server).transcribe(&payload()).await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .mount(&server)
            .await;

        let body = client_for(&server).transcribe(&payload()).await.unwrap();
        assert_eq!(body, SRT_BODY);
    }

    #[tokio::test]
    async fn test_client_metadata() {
        let client = WhisperClient::new("test-api-key".to_string());
        assert_eq!(client.name(), "OpenAI Whisper");
        assert_eq!(client.max_file_size(), 25 * 1024 * 1024);
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_url_source_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/media/episode.mp3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(b"fake audio bytes".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(body_string_contains("filename=\"uploadedfile.mp3\""))
            .and(body_string_contains("fake audio bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let source = MediaSource::Url(format!("{}/media/episode.mp3", server.uri()));
        let client = client_for(&server);

        let result = transcribe_with(&source, &client, quiet(), Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].time, "00:00:00,000");
        assert_eq!(result.segments[0].text, "Hello world");
        assert_eq!(result.segments[1].time, "00:00:02,500");
        assert_eq!(result.segments[1].text, "Second line");
        assert_eq!(result.stats.segment_count, 2);
        assert_eq!(result.stats.bytes_uploaded, b"fake audio bytes".len());
        assert_eq!(result.stats.provider, "OpenAI Whisper");
        assert_eq!(result.raw_srt, SRT_BODY);
    }

    #[tokio::test]
    async fn test_file_source_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("filename=\"lecture.wav\""))
            .and(body_string_contains("audio/wav"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let media_path = dir.path().join("lecture.wav");
        std::fs::write(&media_path, b"RIFF fake").unwrap();

        let source = MediaSource::File(media_path);
        let result = transcribe_with(&source, &client_for(&server), quiet(), Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(result.source_name, "lecture.wav");
        assert_eq!(result.segments.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let media_path = dir.path().join("silence.mp3");
        std::fs::write(&media_path, b"quiet").unwrap();

        let result = transcribe_with(
            &MediaSource::File(media_path),
            &client_for(&server),
            quiet(),
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

        assert!(result.segments.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_skips_transcription() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SRT_BODY))
            .expect(0)
            .mount(&server)
            .await;

        let source = MediaSource::Url(format!("{}/missing.mp3", server.uri()));
        let result = transcribe_with(&source, &client_for(&server), quiet(), Arc::new(AtomicBool::new(false))).await;

        assert!(matches!(result, Err(SrtlistError::Download(_))));
    }
}
