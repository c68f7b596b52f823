//! Picks a `Transport` implementation from the URL scheme of `ConnectParams`.

use crate::error::TransportError;
use crate::traits::Transport;
use crate::types::ConnectParams;

#[cfg(feature = "websocket")]
use crate::websocket::WebSocketTransport;

/// Creates a boxed `Transport` for `params.url`.
///
/// `ws://` and `wss://` are supported when the `websocket` feature is enabled.
pub fn create_transport(params: &ConnectParams) -> Result<Box<dyn Transport>, TransportError> {
    let url = &params.url;
    log::debug!("Creating transport for URL: {}", url);

    let Some((scheme, _)) = url.split_once("://") else {
        return Err(TransportError::InvalidUrl(url.clone()));
    };

    match scheme {
        "ws" | "wss" => {
            #[cfg(feature = "websocket")]
            {
                Ok(Box::new(WebSocketTransport::new(params.clone())))
            }
            #[cfg(not(feature = "websocket"))]
            {
                log::error!("WebSocket URL specified, but 'websocket' feature is not enabled.");
                Err(TransportError::UnsupportedScheme(
                    "WebSocket (ws/wss) requires the 'websocket' feature.".to_string(),
                ))
            }
        }
        other => {
            log::error!("Unsupported URL scheme '{}' in: {}", other, url);
            Err(TransportError::UnsupportedScheme(other.to_string()))
        }
    }
}
