//! Settings snapshot sent with the `settings` announcement.

use serde::{Deserialize, Serialize};

use super::{error::ProtocolError, frame::Frame};

/// Setting names in wire order
pub const SETTING_NAMES: [&str; 7] = [
    "moonrefresh",
    "cutscenes",
    "moonlock",
    "checkpoints",
    "autosave",
    "hud",
    "music",
];

/// Seven boolean flags read from the toggles at send time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsSnapshot {
    pub moon_refresh: bool,
    pub cutscenes: bool,
    pub moon_lock: bool,
    pub checkpoints: bool,
    pub autosave: bool,
    pub hud: bool,
    pub music: bool,
}

impl SettingsSnapshot {
    /// Flags in wire order
    pub fn to_array(self) -> [bool; 7] {
        [
            self.moon_refresh,
            self.cutscenes,
            self.moon_lock,
            self.checkpoints,
            self.autosave,
            self.hud,
            self.music,
        ]
    }

    /// Build a snapshot from flags in wire order
    pub fn from_array(values: [bool; 7]) -> Self {
        let [
            moon_refresh,
            cutscenes,
            moon_lock,
            checkpoints,
            autosave,
            hud,
            music,
        ] = values;
        Self {
            moon_refresh,
            cutscenes,
            moon_lock,
            checkpoints,
            autosave,
            hud,
            music,
        }
    }

    /// One text frame per flag, in wire order
    pub fn frames(self) -> impl Iterator<Item = Frame> {
        self.to_array()
            .into_iter()
            .map(|value| Frame::Text(value.to_string()))
    }

    /// Parse the payload frame at `index` (wire order)
    pub(crate) fn parse_value(index: usize, text: &str) -> Result<bool, ProtocolError> {
        text.parse::<bool>()
            .map_err(|_| ProtocolError::InvalidBoolean {
                name: SETTING_NAMES[index],
                value: text.to_string(),
            })
    }
}
