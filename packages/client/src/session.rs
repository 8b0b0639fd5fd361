//! Client session controller.
//!
//! Owns the current connection and relays user actions to the server as
//! ordered frame sequences, and server events to the log. All work happens
//! on one dispatch loop, so a logical message is always written completely
//! before the next event is handled.

use std::sync::Arc;

use calypso_shared::wire::{OutboundMessage, ScriptConvention, SettingsSnapshot};

use crate::{
    command::{Command, FileSelection},
    error::ClientError,
    event::{EventSender, SessionEvent, run_connection},
    log::{Log, LogView},
    settings::SettingsPanel,
    state::{ConnectionId, ConnectionState},
    transport::{Connector, FrameSink},
};

/// Session controller; at most one current connection
pub struct SessionController {
    url: String,
    convention: ScriptConvention,
    connector: Arc<dyn Connector>,
    events: EventSender,
    state: ConnectionState,
    current: Option<ConnectionId>,
    sink: Option<Box<dyn FrameSink>>,
    panel: SettingsPanel,
    log: Log,
    views: Vec<Box<dyn LogView>>,
}

impl SessionController {
    /// Create an uninitialized controller.
    ///
    /// `events` must feed the loop that calls [`SessionController::handle`].
    pub fn new(url: impl Into<String>, connector: Arc<dyn Connector>, events: EventSender) -> Self {
        Self {
            url: url.into(),
            convention: ScriptConvention::default(),
            connector,
            events,
            state: ConnectionState::Uninitialized,
            current: None,
            sink: None,
            panel: SettingsPanel::default(),
            log: Log::new(),
            views: Vec::new(),
        }
    }

    pub fn with_convention(mut self, convention: ScriptConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_settings(mut self, settings: SettingsSnapshot) -> Self {
        self.panel = SettingsPanel::new(settings);
        self
    }

    /// Register an observer for appended log lines
    pub fn add_view(&mut self, view: Box<dyn LogView>) {
        self.views.push(view);
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.current
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn settings(&self) -> &SettingsPanel {
        &self.panel
    }

    pub fn settings_mut(&mut self) -> &mut SettingsPanel {
        &mut self.panel
    }

    /// Start a new connection, replacing the current one.
    ///
    /// The previous connection is not closed; its events keep being logged
    /// but no longer affect the state.
    pub fn initialize(&mut self) -> ConnectionId {
        let id = ConnectionId::new();
        if let Some(previous) = self.current.replace(id) {
            tracing::debug!("Replacing connection {} without closing it", previous);
        }
        self.sink = None;
        self.state = ConnectionState::Connecting;

        tracing::info!("Connecting to {} (connection {})", self.url, id);
        tokio::spawn(run_connection(
            Arc::clone(&self.connector),
            self.url.clone(),
            id,
            self.events.clone(),
        ));

        id
    }

    /// Announce the close, then close the connection without waiting for an acknowledgement
    pub async fn request_close(&mut self) -> Result<(), ClientError> {
        self.send_message(&OutboundMessage::Close).await?;
        self.state = self.state.closed();

        match self.sink.take() {
            Some(mut sink) => sink.close().await,
            None => Ok(()),
        }
    }

    /// Send the fixed greeting
    pub async fn send_greeting(&mut self) -> Result<(), ClientError> {
        self.send_message(&OutboundMessage::Greeting).await?;
        Ok(())
    }

    /// Send the seven toggles as they are right now
    pub async fn send_settings(&mut self) -> Result<(), ClientError> {
        let snapshot = self.panel.snapshot();
        self.send_message(&OutboundMessage::Settings(snapshot)).await?;
        tracing::info!("Sent settings {:?}", snapshot.to_array());
        Ok(())
    }

    /// Upload the selected file.
    ///
    /// A missing or empty selection does nothing. Otherwise the file is read
    /// on a background task and the frames are sent once the read completes
    /// (see [`SessionEvent::FileLoaded`]).
    pub async fn send_file(&mut self, selection: Option<FileSelection>) -> Result<(), ClientError> {
        let Some(path) = selection.as_ref().and_then(FileSelection::first).cloned() else {
            tracing::debug!("No file selected");
            return Ok(());
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if self.convention == ScriptConvention::Split {
            self.send_message(&OutboundMessage::ScriptInfo { name: name.clone() })
                .await?;
        }

        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match tokio::fs::read(&path).await {
                Ok(data) => SessionEvent::FileLoaded { name, data },
                Err(source) => SessionEvent::FileFailed {
                    error: ClientError::FileRead { path, source },
                },
            };
            if events.send(event).is_err() {
                tracing::debug!("Session ended before the file was read");
            }
        });

        Ok(())
    }

    /// HTML-escape `text` and prepend it to the log
    pub fn append_log(&mut self, text: &str) {
        self.log.append(text);
        for view in &mut self.views {
            view.line_appended(text, self.log.render());
        }
    }

    /// Handle one event from the dispatch loop.
    ///
    /// Errors are terminal for the triggering action only.
    pub async fn handle(&mut self, event: SessionEvent) -> Result<(), ClientError> {
        match event {
            SessionEvent::Opened { id, sink } => {
                self.append_log("onopen");
                if self.is_current(id) {
                    self.state = self.state.opened();
                    if self.state.can_send() {
                        self.sink = Some(sink);
                    }
                    tracing::info!("Connected to {}", self.url);
                }
                Ok(())
            }
            SessionEvent::Message { text, .. } => {
                self.append_log(&format!("onmessage: {}", text));
                Ok(())
            }
            SessionEvent::BinaryMessage { len, .. } => {
                self.append_log(&format!("onmessage: <binary {} bytes>", len));
                Ok(())
            }
            SessionEvent::Error { id, detail } => {
                self.append_log("onerror");
                tracing::error!("Connection {} error: {}", id, detail);
                Ok(())
            }
            SessionEvent::Closed { id } => {
                self.append_log("onclose");
                if self.is_current(id) {
                    self.state = self.state.closed();
                    self.sink = None;
                }
                Ok(())
            }
            SessionEvent::Command(command) => self.execute(command).await,
            SessionEvent::FileLoaded { name, data } => self.finish_file(name, data).await,
            SessionEvent::FileFailed { error } => Err(error),
        }
    }

    async fn execute(&mut self, command: Command) -> Result<(), ClientError> {
        match command {
            Command::Connect => {
                self.initialize();
                Ok(())
            }
            Command::Close => self.request_close().await,
            Command::Greeting => self.send_greeting().await,
            Command::Settings => self.send_settings().await,
            Command::Set(toggle, value) => {
                self.panel.set(toggle, value);
                tracing::debug!("{} = {}", toggle, value);
                Ok(())
            }
            Command::Toggle(toggle) => {
                let value = self.panel.flip(toggle);
                tracing::debug!("{} = {}", toggle, value);
                Ok(())
            }
            Command::File(selection) => self.send_file(selection).await,
            // presentation-only commands are handled by the front end
            Command::Show | Command::PrintLog | Command::Help | Command::Quit => Ok(()),
        }
    }

    async fn finish_file(&mut self, name: String, data: Vec<u8>) -> Result<(), ClientError> {
        let len = data.len();
        let message = match self.convention {
            ScriptConvention::Single => OutboundMessage::Script {
                name: name.clone(),
                data,
            },
            ScriptConvention::Split => OutboundMessage::ScriptData { data },
        };
        self.send_message(&message).await?;
        tracing::info!("Sent script '{}' ({} bytes)", name, len);
        Ok(())
    }

    fn is_current(&self, id: ConnectionId) -> bool {
        self.current == Some(id)
    }

    /// Write every frame of `message` before returning
    async fn send_message(&mut self, message: &OutboundMessage) -> Result<usize, ClientError> {
        let sink = match self.sink.as_mut() {
            Some(sink) if self.state.can_send() => sink,
            _ => return Err(ClientError::NotOpen(self.state)),
        };

        let frames = message.frames();
        let count = frames.len();
        for frame in frames {
            sink.send_frame(frame).await?;
        }

        tracing::debug!("Sent '{}' ({} frames)", message.announcement(), count);
        Ok(count)
    }
}
