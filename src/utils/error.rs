//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Aggregation and profile building have no error type: both are total.

use thiserror::Error;

/// Errors raised by an event source while producing the event sequence
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Event {event} links to {link}, which is not a valid terminating event")]
    DanglingLink { event: usize, link: usize },
}

/// Errors that can occur while encoding, decoding or validating a profile
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Protobuf decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed profile: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to encode profile: {0}")]
    EncodingFailed(#[from] ProfileError),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
