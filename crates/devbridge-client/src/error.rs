//! Errors surfaced to users of the client.

use actix::MailboxError;
use devbridge_core::error::{CoreError, InternalError, TransportError};
use serde_json::Value;
use thiserror::Error;

/// The browser's answer to a command it refused: the `error` object of the
/// reply.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (code {code})")]
pub struct ProtocolFailure {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration loading failed: {0}")]
    Config(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The command reached the browser and was rejected there.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolFailure),

    #[error("Command '{method}' timed out after {timeout_ms} ms")]
    Timeout { method: String, timeout_ms: u64 },

    #[error("Failed to serialize parameters of '{method}': {message}")]
    Serialization { method: String, message: String },

    /// A reply or event did not match its typed shape.
    #[error("Failed to decode reply of '{method}': {message}")]
    Deserialization { method: String, message: String },

    #[error("Endpoint discovery failed: {0}")]
    Endpoint(String),

    #[error("Actor system error: {0}")]
    Actor(String),
}

impl ClientError {
    /// `(code, message)` when the browser rejected the command.
    pub fn protocol_failure(&self) -> Option<(i64, &str)> {
        match self {
            ClientError::Protocol(failure) => Some((failure.code, failure.message.as_str())),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}

impl From<InternalError> for ClientError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Transport(e) => ClientError::Transport(e),
            InternalError::Protocol {
                code,
                message,
                data,
            } => ClientError::Protocol(ProtocolFailure {
                code,
                message,
                data,
            }),
            InternalError::Timeout { method, timeout_ms } => {
                ClientError::Timeout { method, timeout_ms }
            }
            InternalError::Serialization(message) => ClientError::Serialization {
                method: String::new(),
                message,
            },
            InternalError::Deserialization(message) => ClientError::Deserialization {
                method: String::new(),
                message,
            },
            InternalError::Configuration(message) => ClientError::Configuration(message),
            InternalError::Core(e) => ClientError::Config(e),
            InternalError::Actor(message) => ClientError::Actor(message),
        }
    }
}

impl From<MailboxError> for ClientError {
    fn from(err: MailboxError) -> Self {
        match err {
            // The actors stop together with the connection.
            MailboxError::Closed => ClientError::Transport(TransportError::NotConnected(
                "client is closed".to_string(),
            )),
            MailboxError::Timeout => ClientError::Actor(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_expose_code_and_message() {
        let err: ClientError = InternalError::Protocol {
            code: 1,
            message: "bad sql".into(),
            data: None,
        }
        .into();
        assert_eq!(err.protocol_failure(), Some((1, "bad sql")));
        assert_eq!(err.to_string(), "Protocol error: bad sql (code 1)");
    }

    #[test]
    fn non_protocol_errors_have_no_failure() {
        let err: ClientError = InternalError::Timeout {
            method: "Profiler.stop".into(),
            timeout_ms: 10,
        }
        .into();
        assert!(err.is_timeout());
        assert_eq!(err.protocol_failure(), None);

        let err: ClientError = MailboxError::Closed.into();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::NotConnected(_))
        ));
    }

    #[test]
    fn codec_errors_keep_their_message() {
        let err: ClientError = InternalError::Serialization("key must be a string".into()).into();
        assert!(matches!(
            err,
            ClientError::Serialization { ref message, .. } if message == "key must be a string"
        ));

        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err: ClientError = InternalError::from(json_err).into();
        assert!(matches!(err, ClientError::Deserialization { .. }));
    }
}
