//! Settings toggles backing the `settings` message.

use std::{fmt, str::FromStr};

use calypso_shared::wire::SettingsSnapshot;

use crate::error::ClientError;

/// One of the seven settings toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    MoonRefresh,
    Cutscenes,
    MoonLock,
    Checkpoints,
    Autosave,
    Hud,
    Music,
}

impl Toggle {
    /// All toggles in wire order
    pub const ALL: [Toggle; 7] = [
        Toggle::MoonRefresh,
        Toggle::Cutscenes,
        Toggle::MoonLock,
        Toggle::Checkpoints,
        Toggle::Autosave,
        Toggle::Hud,
        Toggle::Music,
    ];

    /// Control id shown to the user
    pub fn id(self) -> &'static str {
        match self {
            Toggle::MoonRefresh => "MoonRefresh",
            Toggle::Cutscenes => "Cutscenes",
            Toggle::MoonLock => "MoonLock",
            Toggle::Checkpoints => "Checkpoints",
            Toggle::Autosave => "Autosave",
            Toggle::Hud => "HUD",
            Toggle::Music => "Music",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Toggle {
    type Err = ClientError;

    /// Accepts the control id case-insensitively, ignoring `-` and `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Toggle::ALL
            .into_iter()
            .find(|toggle| toggle.id().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ClientError::InvalidCommand(format!("unknown setting '{}'", s)))
    }
}

/// Current toggle state, read at send time
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    values: SettingsSnapshot,
}

impl SettingsPanel {
    pub fn new(initial: SettingsSnapshot) -> Self {
        Self { values: initial }
    }

    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::MoonRefresh => self.values.moon_refresh,
            Toggle::Cutscenes => self.values.cutscenes,
            Toggle::MoonLock => self.values.moon_lock,
            Toggle::Checkpoints => self.values.checkpoints,
            Toggle::Autosave => self.values.autosave,
            Toggle::Hud => self.values.hud,
            Toggle::Music => self.values.music,
        }
    }

    pub fn set(&mut self, toggle: Toggle, value: bool) {
        let slot = match toggle {
            Toggle::MoonRefresh => &mut self.values.moon_refresh,
            Toggle::Cutscenes => &mut self.values.cutscenes,
            Toggle::MoonLock => &mut self.values.moon_lock,
            Toggle::Checkpoints => &mut self.values.checkpoints,
            Toggle::Autosave => &mut self.values.autosave,
            Toggle::Hud => &mut self.values.hud,
            Toggle::Music => &mut self.values.music,
        };
        *slot = value;
    }

    /// Flip a toggle and return its new value
    pub fn flip(&mut self, toggle: Toggle) -> bool {
        let value = !self.get(toggle);
        self.set(toggle, value);
        value
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.values
    }
}
