//! Frame-level wire convention.
//!
//! A logical message is a `"type: <name>"` announcement frame followed by
//! the payload frames that belong to it. There is no length prefix or
//! sequence number on the wire, so every message must be written in order
//! without interleaving.

mod assembler;
mod error;
mod frame;
mod message;
mod settings;

pub use assembler::{FrameAssembler, InboundMessage};
pub use error::ProtocolError;
pub use frame::{ANNOUNCEMENT_PREFIX, Announcement, Frame};
pub use message::{GREETING, OutboundMessage, ScriptConvention};
pub use settings::{SETTING_NAMES, SettingsSnapshot};
