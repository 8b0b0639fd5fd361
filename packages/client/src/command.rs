//! Commands typed at the prompt.

use std::path::PathBuf;

use crate::{error::ClientError, settings::Toggle};

/// Files chosen for upload; only the first one is sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<PathBuf>,
}

impl FileSelection {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// The chosen file, if any
    pub fn first(&self) -> Option<&PathBuf> {
        self.files.first()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// User action forwarded to the session controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-run `initialize()`
    Connect,
    /// `requestClose()`
    Close,
    /// `sendGreeting()`
    Greeting,
    /// `sendSettings()`
    Settings,
    /// Set a toggle
    Set(Toggle, bool),
    /// Flip a toggle
    Toggle(Toggle),
    /// Print the toggles
    Show,
    /// `sendFile()`
    File(Option<FileSelection>),
    /// Print the rendered log
    PrintLog,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ClientError::InvalidCommand("empty input".to_string()));
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "connect" | "init" => Command::Connect,
            "close" => Command::Close,
            "button" | "hi" => Command::Greeting,
            "settings" => Command::Settings,
            "set" => match args.as_slice() {
                [toggle, value] => Command::Set(toggle.parse()?, parse_switch(value)?),
                _ => return Err(usage("set <setting> <on|off>")),
            },
            "toggle" => match args.as_slice() {
                [toggle] => Command::Toggle(toggle.parse()?),
                _ => return Err(usage("toggle <setting>")),
            },
            "show" => Command::Show,
            "file" => Command::File(Some(FileSelection::new(
                file_argument(line).map(PathBuf::from).into_iter().collect(),
            ))),
            "log" => Command::PrintLog,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ClientError::InvalidCommand(format!(
                    "unknown command '{}' (type 'help')",
                    other
                )));
            }
        };
        Ok(command)
    }
}

/// Everything after the command name, so paths may contain spaces
fn file_argument(line: &str) -> Option<&str> {
    line.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}

fn parse_switch(value: &str) -> Result<bool, ClientError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        _ => Err(ClientError::InvalidCommand(format!(
            "expected on/off, got '{}'",
            value
        ))),
    }
}

fn usage(text: &str) -> ClientError {
    ClientError::InvalidCommand(format!("usage: {}", text))
}
