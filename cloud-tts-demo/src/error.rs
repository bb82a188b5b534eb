use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("A synthesis request is already in progress")]
    Busy,

    /// The synthesis API answered with a non-success status.
    #[error("status:{status}, body:{body}")]
    Remote { status: u16, body: String },

    /// The synthesis API answered 2xx but without a usable `audioContent`.
    #[error("Unexpected response from synthesis API: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Playback failed: {0}")]
    #[allow(dead_code)]
    Playback(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::VoiceNotFound(v) => (
                StatusCode::NOT_FOUND,
                "VOICE_NOT_FOUND",
                format!("Voice '{}' not found", v),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Busy => (StatusCode::CONFLICT, "BUSY", self.to_string()),
            AppError::Remote { .. } => (StatusCode::BAD_GATEWAY, "REMOTE_ERROR", self.to_string()),
            AppError::MalformedResponse(_) => (
                StatusCode::BAD_GATEWAY,
                "MALFORMED_RESPONSE",
                self.to_string(),
            ),
            AppError::Http(e) => (StatusCode::BAD_GATEWAY, "HTTP_ERROR", e.to_string()),
            AppError::Playback(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PLAYBACK_ERROR",
                msg.clone(),
            ),
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                msg.clone(),
            ),
            AppError::IoError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                e.to_string(),
            ),
            AppError::JsonError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JSON_ERROR",
                e.to_string(),
            ),
        };

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
