use crate::error::TransportError;
use async_trait::async_trait;

/// An abstract transport for string (JSON) messages over a network connection.
///
/// Implementations handle the specifics of protocols like WebSockets.
#[async_trait]
pub trait Transport: Send + Unpin {
    /// Establishes the connection based on parameters provided during creation.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Closes the connection gracefully.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Sends a message over the established connection.
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Waits for the next text message.
    ///
    /// * `Some(Ok(text))` - a message arrived.
    /// * `Some(Err(e))` - receiving failed; the connection should be dropped.
    /// * `None` - the remote end closed the connection.
    ///
    /// Must be cancel-safe: it is raced against outgoing sends.
    async fn receive(&mut self) -> Option<Result<String, TransportError>>;
}
