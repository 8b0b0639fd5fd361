//! WebSocket client for uploading TAS scripts and settings to a Calypso server.
//!
//! The [`session::SessionController`] owns one connection at a time, turns
//! user actions into ordered frame sequences and records server events in an
//! HTML log. The terminal front end lives in [`runner`] and [`ui`].

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod log;
pub mod runner;
pub mod session;
pub mod settings;
pub mod state;
pub mod transport;
pub mod ui;

pub use runner::run_client;
