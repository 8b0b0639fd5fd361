//! Outbound logical messages and their frame sequences.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    error::ProtocolError,
    frame::{Announcement, Frame},
    settings::SettingsSnapshot,
};

/// Fixed payload sent after the `button` announcement
pub const GREETING: &str = "hi :3";

/// How a script upload is announced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptConvention {
    /// `type: script`, name, length and bytes, all after the file is read
    #[default]
    Single,
    /// `type: script info` + name at selection time, then
    /// `type: script data` + length and bytes once the file is read
    Split,
}

impl FromStr for ScriptConvention {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(ScriptConvention::Single),
            "split" => Ok(ScriptConvention::Split),
            _ => Err(ProtocolError::UnknownConvention(s.to_string())),
        }
    }
}

impl fmt::Display for ScriptConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptConvention::Single => write!(f, "single"),
            ScriptConvention::Split => write!(f, "split"),
        }
    }
}

/// One logical message: an announcement and its payload frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Close,
    Greeting,
    Settings(SettingsSnapshot),
    Script { name: String, data: Vec<u8> },
    ScriptInfo { name: String },
    ScriptData { data: Vec<u8> },
}

impl OutboundMessage {
    pub fn announcement(&self) -> Announcement {
        match self {
            OutboundMessage::Close => Announcement::Close,
            OutboundMessage::Greeting => Announcement::Button,
            OutboundMessage::Settings(_) => Announcement::Settings,
            OutboundMessage::Script { .. } => Announcement::Script,
            OutboundMessage::ScriptInfo { .. } => Announcement::ScriptInfo,
            OutboundMessage::ScriptData { .. } => Announcement::ScriptData,
        }
    }

    /// Frames in the order they must be written
    pub fn frames(&self) -> Vec<Frame> {
        let mut frames = vec![self.announcement().frame()];
        match self {
            OutboundMessage::Close => {}
            OutboundMessage::Greeting => frames.push(Frame::text(GREETING)),
            OutboundMessage::Settings(snapshot) => frames.extend(snapshot.frames()),
            OutboundMessage::Script { name, data } => {
                frames.push(Frame::text(name.as_str()));
                frames.push(Frame::Text(data.len().to_string()));
                frames.push(Frame::Binary(data.clone()));
            }
            OutboundMessage::ScriptInfo { name } => frames.push(Frame::text(name.as_str())),
            OutboundMessage::ScriptData { data } => {
                frames.push(Frame::Text(data.len().to_string()));
                frames.push(Frame::Binary(data.clone()));
            }
        }
        frames
    }
}
