//! Shared error types for the services crate.

use thiserror::Error;

use hud_core::ParamsError;

/// Errors from reading `HudConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {key}: {raw}")]
    Invalid { key: &'static str, raw: String },
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Errors from delivering an outbound notification.
///
/// These are logged and dropped; the host channel is best-effort.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyError {
    #[error("notification rejected with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from decoding or applying an inbound message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommandError {
    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("start-pump requires a positive targetLitres")]
    MissingTarget,
    #[error("message has neither an `action` nor an `event` field")]
    Untagged,
}
