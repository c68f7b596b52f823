use thiserror::Error;

/// Problems with what arrived on the wire, as opposed to failures of a
/// particular command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Message is neither a reply nor an event: {0}")]
    UnexpectedMessage(String),

    /// An `error` object with no `id` to attach it to.
    #[error("Unroutable protocol error {code}: {message}")]
    UnroutableError { code: i64, message: String },
}
