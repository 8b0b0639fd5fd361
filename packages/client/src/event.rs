//! Events consumed by the session dispatch loop.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::{
    command::Command,
    error::ClientError,
    state::ConnectionId,
    transport::{Connector, FrameSink, Inbound},
};

/// Everything the session reacts to, in arrival order
pub enum SessionEvent {
    /// Connection established; carries its sending half
    Opened {
        id: ConnectionId,
        sink: Box<dyn FrameSink>,
    },
    /// Text message from the server
    Message { id: ConnectionId, text: String },
    /// Binary message from the server
    BinaryMessage { id: ConnectionId, len: usize },
    /// Transport error
    Error { id: ConnectionId, detail: String },
    /// Connection closed (or never opened)
    Closed { id: ConnectionId },
    /// User action
    Command(Command),
    /// Selected file finished loading
    FileLoaded { name: String, data: Vec<u8> },
    /// Selected file could not be loaded
    FileFailed { error: ClientError },
}

/// Sender half of the session event channel
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Open one connection and forward its lifecycle into the event channel.
///
/// Emits `Opened`, then one event per inbound message, then `Closed`.
/// A failed connection attempt emits `Error` followed by `Closed`.
pub(crate) async fn run_connection(
    connector: Arc<dyn Connector>,
    url: String,
    id: ConnectionId,
    events: EventSender,
) {
    match connector.connect(&url).await {
        Ok((sink, mut inbound)) => {
            if events.send(SessionEvent::Opened { id, sink }).is_err() {
                return;
            }

            while let Some(message) = inbound.next().await {
                let (event, is_error) = match message {
                    Inbound::Text(text) => (SessionEvent::Message { id, text }, false),
                    Inbound::Binary(len) => (SessionEvent::BinaryMessage { id, len }, false),
                    Inbound::Error(detail) => (SessionEvent::Error { id, detail }, true),
                };
                if events.send(event).is_err() {
                    return;
                }
                if is_error {
                    break;
                }
            }
        }
        Err(e) => {
            if events
                .send(SessionEvent::Error {
                    id,
                    detail: e.to_string(),
                })
                .is_err()
            {
                return;
            }
        }
    }

    if events.send(SessionEvent::Closed { id }).is_err() {
        tracing::debug!("Session ended before connection {} closed", id);
    }
}
