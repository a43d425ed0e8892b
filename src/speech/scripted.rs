// speech/scripted.rs
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Audio, SpeechService};
use crate::error::SpeechError;

pub const UNRECOGNIZED_MARKER: &str = "<unrecognized>";
pub const UNAVAILABLE_MARKER: &str = "<unavailable>";

const MIME: &str = "text/plain";

/// Replays a fixed list of utterances in a loop. Useful for demos and for
/// running without a microphone.
pub struct ScriptedSpeech {
    script: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedSpeech {
    pub fn new(script: Vec<String>) -> Self {
        Self {
            script,
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SpeechService for ScriptedSpeech {
    async fn capture(&self) -> Result<Audio, SpeechError> {
        if self.script.is_empty() {
            return Ok(Audio {
                bytes: Vec::new(),
                mime: MIME.to_string(),
            });
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.script.len();
        Ok(Audio {
            bytes: self.script[idx].as_bytes().to_vec(),
            mime: MIME.to_string(),
        })
    }

    async fn transcribe(&self, audio: &Audio) -> Result<String, SpeechError> {
        let text = std::str::from_utf8(&audio.bytes)
            .map_err(|_| SpeechError::UnrecognizedSpeech)?
            .trim();
        match text {
            "" | UNRECOGNIZED_MARKER => Err(SpeechError::UnrecognizedSpeech),
            UNAVAILABLE_MARKER => Err(SpeechError::ServiceUnavailable),
            text => Ok(text.to_lowercase()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn listen(speech: &ScriptedSpeech) -> Result<String, SpeechError> {
        let audio = speech.capture().await?;
        speech.transcribe(&audio).await
    }

    #[tokio::test]
    async fn cycles_through_script() {
        let speech = ScriptedSpeech::new(vec!["Turn On Fan".into(), "turn off fan".into()]);
        assert_eq!(listen(&speech).await.unwrap(), "turn on fan");
        assert_eq!(listen(&speech).await.unwrap(), "turn off fan");
        assert_eq!(listen(&speech).await.unwrap(), "turn on fan");
    }

    #[tokio::test]
    async fn markers_produce_errors() {
        let speech = ScriptedSpeech::new(vec![
            UNRECOGNIZED_MARKER.into(),
            UNAVAILABLE_MARKER.into(),
        ]);
        assert_eq!(listen(&speech).await, Err(SpeechError::UnrecognizedSpeech));
        assert_eq!(listen(&speech).await, Err(SpeechError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn empty_script_is_never_understood() {
        let speech = ScriptedSpeech::new(Vec::new());
        assert_eq!(listen(&speech).await, Err(SpeechError::UnrecognizedSpeech));
    }
}
