// speech/mod.rs

mod http;
mod scripted;

pub use http::HttpSpeech;
pub use scripted::ScriptedSpeech;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{config::SpeechSettings, error::SpeechError};

/// Raw captured audio, opaque to everything but the backend that produced it.
#[derive(Debug, Clone)]
pub struct Audio {
    pub bytes: Vec<u8>,
    pub mime: String,
}

#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Block until one utterance is captured.
    async fn capture(&self) -> Result<Audio, SpeechError>;
    /// Turn captured audio into lowercase text.
    async fn transcribe(&self, audio: &Audio) -> Result<String, SpeechError>;
    fn name(&self) -> &str;
}

/// Stand-in used when the configured backend can't be built. Every capture
/// reports the service as unavailable.
pub struct UnavailableSpeech {
    reason: String,
}

impl UnavailableSpeech {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SpeechService for UnavailableSpeech {
    async fn capture(&self) -> Result<Audio, SpeechError> {
        warn!(reason = %self.reason, "speech backend unavailable");
        Err(SpeechError::ServiceUnavailable)
    }

    async fn transcribe(&self, _audio: &Audio) -> Result<String, SpeechError> {
        Err(SpeechError::ServiceUnavailable)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Build the configured backend. Never fails: a backend that can't be built
/// is replaced by [`UnavailableSpeech`] so the dashboard still serves.
pub fn create_speech_service(cfg: &SpeechSettings) -> Box<dyn SpeechService> {
    let result: Result<Box<dyn SpeechService>, String> = match cfg.backend.as_str() {
        "http" => HttpSpeech::new(cfg).map(|s| Box::new(s) as Box<dyn SpeechService>),
        "scripted" => Ok(Box::new(ScriptedSpeech::new(cfg.script.clone()))),
        other => Err(format!("unknown speech backend: {other}")),
    };

    match result {
        Ok(service) => {
            info!(backend = service.name(), "Speech backend ready");
            service
        }
        Err(reason) => {
            warn!(backend = %cfg.backend, %reason, "Falling back to unavailable speech backend");
            Box::new(UnavailableSpeech::new(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: &str) -> SpeechSettings {
        SpeechSettings {
            backend: backend.into(),
            capture_timeout_secs: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unknown_backend_falls_back_to_unavailable() {
        let service = create_speech_service(&settings("carrier-pigeon"));
        assert_eq!(service.name(), "unavailable");
        assert_eq!(
            service.capture().await.unwrap_err(),
            SpeechError::ServiceUnavailable
        );
    }

    #[test]
    fn http_without_endpoint_falls_back() {
        let service = create_speech_service(&settings("http"));
        assert_eq!(service.name(), "unavailable");
    }

    #[test]
    fn builds_scripted_backend() {
        let service = create_speech_service(&settings("scripted"));
        assert_eq!(service.name(), "scripted");
    }
}
