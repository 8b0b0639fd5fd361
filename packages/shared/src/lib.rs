//! Shared library for the Calypso script client.
//!
//! Holds the frame-level wire convention spoken over the WebSocket, plus the
//! logging and clock utilities used by every binary in the workspace.

pub mod logger;
pub mod time;
pub mod wire;
