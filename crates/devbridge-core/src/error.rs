use serde_json::Value;
use thiserror::Error;

/// Errors raised by the transport layer (WebSocket connection handling).
///
/// Lives in the core crate so that `InternalError` can wrap it without the
/// core depending on the transport implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Send operation failed: {0}")]
    SendFailed(String),

    #[error("Receive operation failed: {0}")]
    ReceiveFailed(String),

    #[error("Connection timed out")]
    Timeout,

    #[error("Invalid URL or connection parameters: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Underlying I/O error: {0}")]
    Io(String),

    #[error("WebSocket protocol error: {0}")]
    WebSocket(String),

    #[error("Unknown transport error: {0}")]
    Other(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

/// Errors originating from the actor-level internals of a connection,
/// distinct from the `ClientError` exposed to users.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The browser answered a command with an `error` object.
    #[error("Protocol error: {message} (code: {code})")]
    Protocol {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// An actor mailbox was closed or full, or an actor stopped mid-request.
    #[error("Actor system error: {0}")]
    Actor(String),

    #[error("Command '{method}' timed out after {timeout_ms} ms")]
    Timeout { method: String, timeout_ms: u64 },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Core internal error: {0}")]
    Core(CoreError),
}

/// Errors from the core crate itself: configuration loading and logging setup.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration loading failed: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Logging setup failed: {0}")]
    LoggingSetup(String),
}

impl From<CoreError> for InternalError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigLoad(e) => InternalError::Configuration(e.to_string()),
            other => InternalError::Core(other),
        }
    }
}

impl From<serde_json::Error> for InternalError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            InternalError::Deserialization(err.to_string())
        } else {
            InternalError::Serialization(err.to_string())
        }
    }
}
