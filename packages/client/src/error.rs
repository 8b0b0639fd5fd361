//! Error types for the Calypso client.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::ConnectionState;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Send attempted while the connection is not open
    #[error("Connection is not open (state: {0})")]
    NotOpen(ConnectionState),

    /// Writing a frame to the transport failed
    #[error("Failed to send frame: {0}")]
    SendError(String),

    /// Closing the transport failed
    #[error("Failed to close connection: {0}")]
    CloseError(String),

    /// Selected file could not be read
    #[error("Failed to read file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be loaded
    #[error("Invalid settings file '{}': {reason}", .path.display())]
    SettingsFile { path: PathBuf, reason: String },

    /// Input line is not a known command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
