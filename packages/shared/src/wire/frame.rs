//! Frames and announcements.

use std::fmt;

use tokio_tungstenite::tungstenite::protocol::Message;

use super::error::ProtocolError;

/// Prefix shared by every announcement frame
pub const ANNOUNCEMENT_PREFIX: &str = "type: ";

/// One discrete unit of data sent over the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text frame
    Text(String),
    /// Raw binary frame
    Binary(Vec<u8>),
}

impl Frame {
    /// Create a text frame
    pub fn text(text: impl Into<String>) -> Self {
        Frame::Text(text.into())
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
        }
    }
}

/// Label carried by an announcement frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Announcement {
    Close,
    Button,
    Settings,
    Script,
    ScriptInfo,
    ScriptData,
}

impl Announcement {
    pub const ALL: [Announcement; 6] = [
        Announcement::Close,
        Announcement::Button,
        Announcement::Settings,
        Announcement::Script,
        Announcement::ScriptInfo,
        Announcement::ScriptData,
    ];

    /// Name written after the `type: ` prefix
    pub fn name(self) -> &'static str {
        match self {
            Announcement::Close => "close",
            Announcement::Button => "button",
            Announcement::Settings => "settings",
            Announcement::Script => "script",
            Announcement::ScriptInfo => "script info",
            Announcement::ScriptData => "script data",
        }
    }

    /// Render as an announcement frame
    pub fn frame(self) -> Frame {
        Frame::Text(self.to_string())
    }

    /// Parse an announcement frame.
    ///
    /// Returns `Ok(None)` for text that does not start with the announcement
    /// prefix, and an error for a prefixed text with an unknown name.
    pub fn parse(text: &str) -> Result<Option<Self>, ProtocolError> {
        let Some(name) = text.strip_prefix(ANNOUNCEMENT_PREFIX) else {
            return Ok(None);
        };

        Self::ALL
            .into_iter()
            .find(|announcement| announcement.name() == name)
            .map(Some)
            .ok_or_else(|| ProtocolError::UnknownAnnouncement(name.to_string()))
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ANNOUNCEMENT_PREFIX, self.name())
    }
}
