//! Error types for the wire convention.

use thiserror::Error;

/// Errors raised while parsing or reassembling frames
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Announcement name is not one of the known message types
    #[error("Unknown announcement '{0}'")]
    UnknownAnnouncement(String),

    /// Payload frame arrived without a preceding announcement
    #[error("Frame received without a preceding announcement: {0}")]
    MissingAnnouncement(String),

    /// Binary frame arrived where a text frame was expected
    #[error("Unexpected binary frame ({0} bytes)")]
    UnexpectedBinary(usize),

    /// Text frame arrived where the binary payload was expected
    #[error("Expected binary payload, got text frame '{0}'")]
    ExpectedBinary(String),

    /// Settings value was not a boolean
    #[error("Invalid boolean '{value}' for setting '{name}'")]
    InvalidBoolean { name: &'static str, value: String },

    /// Byte length frame was not a decimal number
    #[error("Invalid byte length '{0}'")]
    InvalidLength(String),

    /// Binary payload size disagrees with the announced length
    #[error("Payload length mismatch: announced {expected} bytes, received {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// `script data` arrived without a preceding `script info`
    #[error("Script data received without script info")]
    MissingScriptInfo,

    /// Script convention name is not recognized
    #[error("Unknown script convention '{0}' (expected 'single' or 'split')")]
    UnknownConvention(String),
}
