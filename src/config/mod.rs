// config/mod.rs
use config::{Config, Environment, File};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_PATH: &str = "config/config";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub metrics: MetricsSettings,
    #[validate(nested)]
    pub speech: SpeechSettings,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = 1))]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MetricsSettings {
    pub enabled: bool,
    #[validate(range(min = 1))]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SpeechSettings {
    /// `http`, `scripted`, or anything else for a placeholder that always
    /// reports the service as unavailable.
    pub backend: String,
    /// Base URL of an OpenAI-compatible transcription server.
    pub endpoint: Option<String>,
    /// Recorder invocation whose stdout is one WAV utterance.
    pub capture_command: Vec<String>,
    #[validate(range(min = 1, max = 60))]
    pub capture_timeout_secs: u64,
    /// Utterances replayed in order by the `scripted` backend.
    #[serde(default)]
    pub script: Vec<String>,
}

impl Settings {
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(DEFAULT_PATH)
    }

    /// Defaults, then the file at `path` if it exists, then `APP__*` env vars.
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("server.address", "0.0.0.0:3000")?
            .set_default("server.max_connections", 64_i64)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000_i64)?
            .set_default("speech.backend", "http")?
            .set_default(
                "speech.capture_command",
                vec!["arecord", "-q", "-d", "4", "-f", "S16_LE", "-r", "16000", "-t", "wav", "-"],
            )?
            .set_default("speech.capture_timeout_secs", 10_i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
