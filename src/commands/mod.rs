// commands/mod.rs
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    devices::{DeviceId, Registry},
    error::SpeechError,
    speech::SpeechService,
};

pub const LISTENING: &str = "Listening...";

/// Recognized phrases, tested in this order.
const PHRASES: [(&str, DeviceId, bool); 8] = [
    ("turn on light", DeviceId::Light, true),
    ("turn off light", DeviceId::Light, false),
    ("turn on fan", DeviceId::Fan, true),
    ("turn off fan", DeviceId::Fan, false),
    ("turn on ac", DeviceId::Ac, true),
    ("turn off ac", DeviceId::Ac, false),
    ("turn on led", DeviceId::Led, true),
    ("turn off led", DeviceId::Led, false),
];

/// One state change requested by a voice phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    pub device: DeviceId,
    pub power: bool,
}

/// Every phrase contained in `text`, not only the first.
pub fn interpret(text: &str) -> Vec<Action> {
    let text = text.to_lowercase();
    PHRASES
        .iter()
        .filter(|(phrase, _, _)| text.contains(phrase))
        .map(|&(_, device, power)| Action { device, power })
        .collect()
}

pub fn apply(registry: &mut Registry, text: &str) -> Vec<Action> {
    let actions = interpret(text);
    for action in &actions {
        registry.set(action.device, action.power);
    }
    debug!(%text, applied = actions.len(), "Interpreted voice command");
    actions
}

/// What one voice interaction did.
#[derive(Debug)]
pub struct VoiceReport {
    pub status_lines: Vec<String>,
    pub result: Result<(String, Vec<Action>), SpeechError>,
}

/// Capture, transcribe and apply a single utterance. Speech failures end the
/// interaction with their message as the last status line.
pub async fn handle_voice(speech: &dyn SpeechService, registry: &mut Registry) -> VoiceReport {
    let mut status_lines = vec![LISTENING.to_string()];

    let transcript = match speech.capture().await {
        Ok(audio) => speech.transcribe(&audio).await,
        Err(e) => Err(e),
    };

    let result = match transcript {
        Ok(text) => {
            status_lines.push(format!("You said: {text}"));
            let actions = apply(registry, &text);
            Ok((text, actions))
        }
        Err(e) => {
            info!(backend = speech.name(), error = %e, "Voice command failed");
            status_lines.push(e.to_string());
            Err(e)
        }
    };

    VoiceReport {
        status_lines,
        result,
    }
}
