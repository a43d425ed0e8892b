// error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::WsMessage;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown control: {0}")]
    UnknownControl(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Too many connections")]
    TooManyConnections,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownControl(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyConnections => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn to_message(&self) -> WsMessage {
        WsMessage::Error {
            message: self.to_string(),
            code: self.status().as_u16(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_message())).into_response()
    }
}

/// Failures reported by the speech collaborator. Each one ends the voice
/// interaction; the display string is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Sorry, I did not understand that.")]
    UnrecognizedSpeech,
    #[error("Could not request results from the speech recognition service.")]
    ServiceUnavailable,
    #[error("Could not capture audio: {0}")]
    Capture(String),
}

impl SpeechError {
    pub fn outcome(&self) -> &'static str {
        match self {
            SpeechError::UnrecognizedSpeech => "unrecognized",
            SpeechError::ServiceUnavailable => "unavailable",
            SpeechError::Capture(_) => "capture_failed",
        }
    }
}
