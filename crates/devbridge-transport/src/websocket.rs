//! `Transport` over WebSockets (`tokio-tungstenite`).

use crate::error::{TransportError, from_ws_error};
use crate::traits::Transport;
use crate::types::ConnectParams;
use async_trait::async_trait;
use devbridge_core::WebSocketConfig;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use log::{debug, info, trace, warn};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async_with_config,
    tungstenite::{
        Error as TungsteniteError,
        protocol::{Message as TungsteniteMessage, WebSocketConfig as TungsteniteConfig},
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, TungsteniteMessage>;
type WsSource = SplitStream<WsStream>;

pub struct WebSocketTransport {
    params: ConnectParams,
    sink: Option<WsSink>,
    source: Option<WsSource>,
}

impl WebSocketTransport {
    pub fn new(params: ConnectParams) -> Self {
        Self {
            params,
            sink: None,
            source: None,
        }
    }

    fn apply_options(options: &WebSocketConfig) -> TungsteniteConfig {
        let mut config = TungsteniteConfig::default();
        if options.max_message_size.is_some() {
            config.max_message_size = options.max_message_size;
        }
        if options.max_frame_size.is_some() {
            config.max_frame_size = options.max_frame_size;
        }
        config.accept_unmasked_frames = options.accept_unmasked_frames;
        config
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.sink.is_some() || self.source.is_some() {
            warn!("WebSocketTransport already connected.");
            return Err(TransportError::ConnectionFailed("Already connected".into()));
        }

        info!("Connecting WebSocket to {}", self.params.url);
        let ws_config = Self::apply_options(&self.params.ws_options);

        let (ws_stream, response) =
            connect_async_with_config(self.params.url.as_str(), Some(ws_config), false)
                .await
                .map_err(from_ws_error)?;
        debug!("WebSocket handshake status: {}", response.status());

        let (sink, source) = ws_stream.split();
        self.sink = Some(sink);
        self.source = Some(source);

        info!("WebSocket connection established.");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(mut sink) = self.sink.take() {
            match sink.send(TungsteniteMessage::Close(None)).await {
                Ok(()) => debug!("WebSocket Close frame sent."),
                Err(TungsteniteError::ConnectionClosed | TungsteniteError::AlreadyClosed) => {
                    debug!("WebSocket already closed while sending Close frame.")
                }
                Err(e) => warn!("Error sending WebSocket Close frame: {}. Closing anyway.", e),
            }
            if let Err(e) = sink.close().await {
                if !matches!(
                    e,
                    TungsteniteError::ConnectionClosed | TungsteniteError::AlreadyClosed
                ) {
                    warn!("Error closing WebSocket sink: {}", e);
                }
            }
        }
        self.source = None;
        info!("WebSocket disconnected.");
        Ok(())
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| TransportError::NotConnected("WebSocket sink unavailable".into()))?;

        trace!("Sending WebSocket message: {}", message);
        sink.send(TungsteniteMessage::Text(message.to_string()))
            .await
            .map_err(from_ws_error)
    }

    async fn receive(&mut self) -> Option<Result<String, TransportError>> {
        let source = self.source.as_mut()?;

        // Control frames are answered by tungstenite itself; skip them here.
        loop {
            match source.next().await? {
                Ok(TungsteniteMessage::Text(text)) => return Some(Ok(text)),
                Ok(TungsteniteMessage::Binary(bin)) => match String::from_utf8(bin) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => warn!("Ignoring non UTF-8 binary WebSocket message."),
                },
                Ok(TungsteniteMessage::Ping(_) | TungsteniteMessage::Pong(_)) => {
                    trace!("WebSocket control frame received.");
                }
                Ok(TungsteniteMessage::Close(frame)) => {
                    info!("Received WebSocket Close frame: {:?}", frame);
                    return None;
                }
                Ok(TungsteniteMessage::Frame(_)) => {
                    warn!("Ignoring unexpected raw WebSocket frame.");
                }
                Err(TungsteniteError::ConnectionClosed | TungsteniteError::AlreadyClosed) => {
                    info!("WebSocket connection closed while receiving.");
                    return None;
                }
                Err(e) => return Some(Err(from_ws_error(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_override_only_what_is_set() {
        let defaults = TungsteniteConfig::default();
        let options = WebSocketConfig {
            max_message_size: None,
            max_frame_size: Some(4096),
            accept_unmasked_frames: true,
        };

        let config = WebSocketTransport::apply_options(&options);
        assert_eq!(config.max_message_size, defaults.max_message_size);
        assert_eq!(config.max_frame_size, Some(4096));
        assert!(config.accept_unmasked_frames);
    }
}
