// speech/http.rs
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{Audio, SpeechService};
use crate::{config::SpeechSettings, error::SpeechError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Records with an external recorder process and transcribes through an
/// OpenAI-compatible `/v1/audio/transcriptions` endpoint.
pub struct HttpSpeech {
    url: String,
    capture_command: Vec<String>,
    capture_timeout: Duration,
    client: reqwest::Client,
}

impl HttpSpeech {
    pub fn new(cfg: &SpeechSettings) -> Result<Self, String> {
        let endpoint = cfg
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or("speech.endpoint is not set")?;
        if cfg.capture_command.is_empty() {
            return Err("speech.capture_command is empty".into());
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| e.to_string())?;

        let url = endpoint.trim_end_matches('/').to_string();
        info!(%url, recorder = %cfg.capture_command[0], "HTTP speech backend configured");
        Ok(Self {
            url,
            capture_command: cfg.capture_command.clone(),
            capture_timeout: Duration::from_secs(cfg.capture_timeout_secs),
            client,
        })
    }
}

#[async_trait]
impl SpeechService for HttpSpeech {
    async fn capture(&self) -> Result<Audio, SpeechError> {
        let (program, args) = self
            .capture_command
            .split_first()
            .ok_or_else(|| SpeechError::Capture("no recorder configured".into()))?;

        let output = tokio::time::timeout(
            self.capture_timeout,
            Command::new(program).args(args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| {
            SpeechError::Capture(format!(
                "no audio within {}s",
                self.capture_timeout.as_secs()
            ))
        })?
        .map_err(|e| SpeechError::Capture(format!("{program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Capture(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(SpeechError::Capture(format!("{program} produced no audio")));
        }

        debug!(bytes = output.stdout.len(), "Captured utterance");
        Ok(Audio {
            bytes: output.stdout,
            mime: "audio/wav".to_string(),
        })
    }

    async fn transcribe(&self, audio: &Audio) -> Result<String, SpeechError> {
        let part = Part::bytes(audio.bytes.clone())
            .file_name("command.wav")
            .mime_str(&audio.mime)
            .map_err(|e| {
                warn!(%e, mime = %audio.mime, "Invalid audio mime type");
                SpeechError::ServiceUnavailable
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.url))
            .multipart(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(%e, "Transcription request failed");
                SpeechError::ServiceUnavailable
            })?;

        let body: TranscriptionResponse = response.json().await.map_err(|e| {
            warn!(%e, "Malformed transcription response");
            SpeechError::ServiceUnavailable
        })?;

        let text = body.text.trim().to_lowercase();
        debug!(%text, "Transcription");
        if text.is_empty() {
            return Err(SpeechError::UnrecognizedSpeech);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};

    fn settings(endpoint: &str, command: &[&str], timeout: u64) -> SpeechSettings {
        SpeechSettings {
            backend: "http".into(),
            endpoint: Some(endpoint.into()),
            capture_command: command.iter().map(|s| s.to_string()).collect(),
            capture_timeout_secs: timeout,
            script: Vec::new(),
        }
    }

    async fn serve_transcript(text: &'static str) -> String {
        let app = Router::new().route(
            "/v1/audio/transcriptions",
            post(move || async move { Json(serde_json::json!({ "text": text })) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{addr}/")
    }

    /// A backend pointed at a port nothing listens on.
    fn offline(command: &[&str], timeout: u64) -> HttpSpeech {
        HttpSpeech::new(&settings("http://127.0.0.1:9", command, timeout)).unwrap()
    }

    fn wav() -> Audio {
        Audio {
            bytes: b"RIFF".to_vec(),
            mime: "audio/wav".into(),
        }
    }

    #[test]
    fn requires_endpoint() {
        let mut cfg = settings("", &["printf", "RIFF"], 5);
        assert!(HttpSpeech::new(&cfg).is_err());
        cfg.endpoint = None;
        assert!(HttpSpeech::new(&cfg).is_err());
    }

    #[tokio::test]
    async fn captures_recorder_stdout() {
        let speech = offline(&["printf", "RIFF"], 5);
        let audio = speech.capture().await.unwrap();
        assert_eq!(audio.bytes, b"RIFF");
        assert_eq!(audio.mime, "audio/wav");
    }

    #[tokio::test]
    async fn capture_times_out() {
        let speech = offline(&["sleep", "5"], 1);
        assert!(matches!(
            speech.capture().await,
            Err(SpeechError::Capture(_))
        ));
    }

    #[tokio::test]
    async fn missing_recorder_is_a_capture_error() {
        let speech = offline(&["definitely-not-a-recorder"], 5);
        assert!(matches!(
            speech.capture().await,
            Err(SpeechError::Capture(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let speech = offline(&["printf", "RIFF"], 5);
        assert_eq!(
            speech.transcribe(&wav()).await,
            Err(SpeechError::ServiceUnavailable)
        );
    }

    #[tokio::test]
    async fn transcript_is_trimmed_and_lowercased() {
        let url = serve_transcript("  Turn On Light ").await;
        let speech = HttpSpeech::new(&settings(&url, &["printf", "RIFF"], 5)).unwrap();
        assert_eq!(speech.transcribe(&wav()).await.unwrap(), "turn on light");
    }

    #[tokio::test]
    async fn empty_transcript_is_unrecognized() {
        let url = serve_transcript("   ").await;
        let speech = HttpSpeech::new(&settings(&url, &["printf", "RIFF"], 5)).unwrap();
        assert_eq!(
            speech.transcribe(&wav()).await,
            Err(SpeechError::UnrecognizedSpeech)
        );
    }
}
