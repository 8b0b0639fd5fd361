//! Transport seams and their WebSocket implementations.

use std::pin::Pin;

use async_trait::async_trait;
use calypso_shared::wire::Frame;
use futures_util::{SinkExt, Stream, StreamExt, future, stream::SplitSink};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::error::ClientError;

/// Event produced by the receiving half of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Text message payload
    Text(String),
    /// Binary message of the given size
    Binary(usize),
    /// Transport error detail
    Error(String),
}

/// Stream of inbound events; ends when the connection closes
pub type InboundStream = Pin<Box<dyn Stream<Item = Inbound> + Send>>;

/// Sending half of a connection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSink: Send {
    /// Write one frame
    async fn send_frame(&mut self, frame: Frame) -> Result<(), ClientError>;

    /// Start the closing handshake
    async fn close(&mut self) -> Result<(), ClientError>;
}

/// Opens connections to an endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `url`, yielding the sending half and the inbound events
    async fn connect(&self, url: &str) -> Result<(Box<dyn FrameSink>, InboundStream), ClientError>;
}

/// `FrameSink` over the write half of a tokio-tungstenite stream
pub struct WebSocketSink {
    inner: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
}

#[async_trait]
impl FrameSink for WebSocketSink {
    async fn send_frame(&mut self, frame: Frame) -> Result<(), ClientError> {
        self.inner
            .send(frame.into())
            .await
            .map_err(|e| ClientError::SendError(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.inner
            .close()
            .await
            .map_err(|e| ClientError::CloseError(e.to_string()))
    }
}

/// Connector backed by `tokio_tungstenite::connect_async`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, InboundStream), ClientError> {
        let (ws_stream, response) = connect_async(url)
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

        tracing::debug!(
            "WebSocket handshake with {} completed ({})",
            url,
            response.status()
        );

        let (write, read) = ws_stream.split();

        let inbound = read.filter_map(|message| {
            future::ready(match message {
                Ok(Message::Text(text)) => Some(Inbound::Text(text.to_string())),
                Ok(Message::Binary(data)) => Some(Inbound::Binary(data.len())),
                Ok(Message::Close(frame)) => {
                    tracing::debug!("Received close frame: {:?}", frame);
                    None
                }
                Ok(_) => None,
                Err(e) => Some(Inbound::Error(e.to_string())),
            })
        });

        Ok((Box::new(WebSocketSink { inner: write }), Box::pin(inbound)))
    }
}
