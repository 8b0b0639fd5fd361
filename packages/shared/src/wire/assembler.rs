//! Receiver-side frame assembly.
//!
//! Rebuilds one logical message from an announcement frame and the payload
//! frames that follow it, and reports ordering, type and length mismatches
//! as `ProtocolError`.
//!
//! The wire has no message boundaries, so while an announcement is waiting
//! for payload, any text frame is payload even if it starts with `"type: "`.
//! A partial message is discarded when an error occurs.

use super::{
    error::ProtocolError,
    frame::{Announcement, Frame},
    settings::SettingsSnapshot,
};

/// A fully reassembled logical message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Close,
    Greeting(String),
    Settings(SettingsSnapshot),
    /// Complete upload, from either convention
    Script { name: String, data: Vec<u8> },
    /// First half of a split upload
    ScriptInfo { name: String },
}

#[derive(Debug)]
enum Pending {
    Button,
    Settings(Vec<bool>),
    Script {
        name: Option<String>,
        len: Option<usize>,
    },
    ScriptInfo,
    ScriptData {
        name: String,
        len: Option<usize>,
    },
}

/// Reassembles frames into logical messages
#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: Option<Pending>,
    last_script_name: Option<String>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an announcement is waiting for more payload frames
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed one frame.
    ///
    /// Returns `Ok(Some(message))` once the last payload frame of a message
    /// arrives and `Ok(None)` while more frames are needed.
    pub fn push(&mut self, frame: Frame) -> Result<Option<InboundMessage>, ProtocolError> {
        let result = match self.pending.take() {
            None => self.start(frame),
            Some(pending) => self.continue_with(pending, frame),
        };
        if let Err(e) = &result {
            tracing::debug!("Discarding partial message: {}", e);
            self.pending = None;
        }
        result
    }

    fn start(&mut self, frame: Frame) -> Result<Option<InboundMessage>, ProtocolError> {
        let text = match frame {
            Frame::Text(text) => text,
            Frame::Binary(data) => return Err(ProtocolError::UnexpectedBinary(data.len())),
        };
        let announcement = Announcement::parse(&text)?
            .ok_or_else(|| ProtocolError::MissingAnnouncement(text.clone()))?;

        match announcement {
            Announcement::Close => return Ok(Some(InboundMessage::Close)),
            Announcement::Button => self.pending = Some(Pending::Button),
            Announcement::Settings => self.pending = Some(Pending::Settings(Vec::with_capacity(7))),
            Announcement::Script => {
                self.pending = Some(Pending::Script {
                    name: None,
                    len: None,
                })
            }
            Announcement::ScriptInfo => self.pending = Some(Pending::ScriptInfo),
            Announcement::ScriptData => {
                let name = self
                    .last_script_name
                    .take()
                    .ok_or(ProtocolError::MissingScriptInfo)?;
                self.pending = Some(Pending::ScriptData { name, len: None });
            }
        }
        Ok(None)
    }

    fn continue_with(
        &mut self,
        pending: Pending,
        frame: Frame,
    ) -> Result<Option<InboundMessage>, ProtocolError> {
        match pending {
            Pending::Button => Ok(Some(InboundMessage::Greeting(expect_text(frame)?))),
            Pending::Settings(mut values) => {
                let text = expect_text(frame)?;
                values.push(SettingsSnapshot::parse_value(values.len(), &text)?);
                match <[bool; 7]>::try_from(values) {
                    Ok(values) => Ok(Some(InboundMessage::Settings(
                        SettingsSnapshot::from_array(values),
                    ))),
                    Err(values) => {
                        self.pending = Some(Pending::Settings(values));
                        Ok(None)
                    }
                }
            }
            Pending::Script { name: None, .. } => {
                self.pending = Some(Pending::Script {
                    name: Some(expect_text(frame)?),
                    len: None,
                });
                Ok(None)
            }
            Pending::Script {
                name: Some(name),
                len: None,
            } => {
                let len = parse_len(&expect_text(frame)?)?;
                self.pending = Some(Pending::Script {
                    name: Some(name),
                    len: Some(len),
                });
                Ok(None)
            }
            Pending::Script {
                name: Some(name),
                len: Some(len),
            } => {
                let data = expect_binary(frame, len)?;
                Ok(Some(InboundMessage::Script { name, data }))
            }
            Pending::ScriptInfo => {
                let name = expect_text(frame)?;
                self.last_script_name = Some(name.clone());
                Ok(Some(InboundMessage::ScriptInfo { name }))
            }
            Pending::ScriptData { name, len: None } => {
                let len = parse_len(&expect_text(frame)?)?;
                self.pending = Some(Pending::ScriptData {
                    name,
                    len: Some(len),
                });
                Ok(None)
            }
            Pending::ScriptData {
                name,
                len: Some(len),
            } => {
                let data = expect_binary(frame, len)?;
                Ok(Some(InboundMessage::Script { name, data }))
            }
        }
    }
}

fn expect_text(frame: Frame) -> Result<String, ProtocolError> {
    match frame {
        Frame::Text(text) => Ok(text),
        Frame::Binary(data) => Err(ProtocolError::UnexpectedBinary(data.len())),
    }
}

fn expect_binary(frame: Frame, expected: usize) -> Result<Vec<u8>, ProtocolError> {
    match frame {
        Frame::Binary(data) if data.len() == expected => Ok(data),
        Frame::Binary(data) => Err(ProtocolError::LengthMismatch {
            expected,
            actual: data.len(),
        }),
        Frame::Text(text) => Err(ProtocolError::ExpectedBinary(text)),
    }
}

fn parse_len(text: &str) -> Result<usize, ProtocolError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProtocolError::InvalidLength(text.to_string()));
    }
    text.parse()
        .map_err(|_| ProtocolError::InvalidLength(text.to_string()))
}
