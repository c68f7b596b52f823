//! Transport errors. The enum itself lives in `devbridge-core` so that the
//! internal error type can wrap it; this module adds the WebSocket mapping.

pub use devbridge_core::TransportError;

/// Maps a tungstenite error onto the transport taxonomy.
#[cfg(feature = "websocket")]
pub(crate) fn from_ws_error(err: tokio_tungstenite::tungstenite::Error) -> TransportError {
    use tokio_tungstenite::tungstenite::Error as WsError;

    match err {
        WsError::ConnectionClosed => TransportError::NotConnected("Connection closed".into()),
        WsError::AlreadyClosed => {
            TransportError::NotConnected("Connection already closed".into())
        }
        WsError::Io(io_err) => TransportError::Io(io_err.to_string()),
        WsError::Capacity(reason) => TransportError::SendFailed(format!("Capacity error: {}", reason)),
        WsError::Protocol(reason) => {
            TransportError::WebSocket(format!("Protocol violation: {}", reason))
        }
        WsError::Utf8 => TransportError::ReceiveFailed("Invalid UTF-8 received".into()),
        WsError::Url(parse_err) => TransportError::InvalidUrl(format!("URL error: {}", parse_err)),
        WsError::Http(resp) => TransportError::ConnectionFailed(format!(
            "HTTP error during handshake: status {}",
            resp.status()
        )),
        WsError::HttpFormat(http_err) => {
            TransportError::ConnectionFailed(format!("HTTP format error: {}", http_err))
        }
        other => TransportError::Other(other.to_string()),
    }
}
