//! Connection lifecycle state.

use std::fmt;

use uuid::Uuid;

/// Identifies one connection created by `initialize()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of the current connection.
///
/// `Uninitialized → Connecting → Open → Closed`. Error events do not change
/// the state; the transport's own close event does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Uninitialized,
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    /// Only an open connection accepts frames
    pub fn can_send(self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// State after an open event
    pub fn opened(self) -> Self {
        match self {
            ConnectionState::Connecting => ConnectionState::Open,
            other => other,
        }
    }

    /// State after a close event or an explicit close
    pub fn closed(self) -> Self {
        match self {
            ConnectionState::Uninitialized => ConnectionState::Uninitialized,
            _ => ConnectionState::Closed,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Uninitialized => "uninitialized",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        };
        write!(f, "{}", name)
    }
}
