//! Messages exchanged between the client layer and the protocol actors, plus
//! the JSON envelopes that travel over the wire.

use crate::error::ProtocolError;
use actix::prelude::*;
use actix_rt::ArbiterHandle;
use devbridge_core::error::InternalError;
use futures_channel::oneshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};

/// Request to `CommandActor` to execute a protocol command.
#[derive(Debug)]
pub struct SendCommand {
    /// Flattened target session; `None` for browser-level commands.
    pub session_id: Option<String>,
    /// The protocol method name (e.g., "Animation.setPaused").
    pub method: String,
    pub params: Value,
    /// Overrides the configured default timeout.
    pub timeout: Option<Duration>,
    /// Receives the reply, or the reason there will be none.
    pub result_tx: oneshot::Sender<CommandResult>,
}

impl Message for SendCommand {
    // Whether the command was accepted. The reply itself arrives on `result_tx`.
    type Result = Result<(), InternalError>;
}

/// Outcome of a protocol command: the raw `result` object or why it failed.
pub type CommandResult = Result<Value, InternalError>;

/// A protocol event received from the browser.
#[derive(Debug, Clone, PartialEq, Message)]
#[rtype(result = "()")]
pub struct ProtocolEvent {
    /// Session the event belongs to; `None` for browser-level events.
    pub session_id: Option<String>,
    /// The event method name (e.g., "Animation.animationStarted").
    pub method: String,
    pub params: Value,
}

/// Handle identifying one registration with the `EventActor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Which event names a registration matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventSelector {
    /// Exactly this method name.
    Method(String),
    /// Every event.
    All,
}

impl EventSelector {
    pub fn method(name: impl Into<String>) -> Self {
        EventSelector::Method(name.into())
    }

    pub fn matches(&self, method: &str) -> bool {
        match self {
            EventSelector::Method(name) => name == method,
            EventSelector::All => true,
        }
    }
}

pub type EventCallback = Arc<dyn Fn(ProtocolEvent) + Send + Sync>;

/// Where matching events are delivered.
#[derive(Clone)]
pub enum Listener {
    Actor(Recipient<ProtocolEvent>),
    /// Called on the router's own thread, or on `executor` when given.
    Callback {
        callback: EventCallback,
        executor: Option<ArbiterHandle>,
    },
}

impl Listener {
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(ProtocolEvent) + Send + Sync + 'static,
    {
        Listener::Callback {
            callback: Arc::new(callback),
            executor: None,
        }
    }

    pub fn callback_on<F>(executor: ArbiterHandle, callback: F) -> Self
    where
        F: Fn(ProtocolEvent) + Send + Sync + 'static,
    {
        Listener::Callback {
            callback: Arc::new(callback),
            executor: Some(executor),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Actor(recipient) => f.debug_tuple("Actor").field(recipient).finish(),
            Listener::Callback { executor, .. } => f
                .debug_struct("Callback")
                .field("has_executor", &executor.is_some())
                .finish(),
        }
    }
}

/// Registers a listener with the `EventActor`.
#[derive(Debug, Message)]
#[rtype(result = "SubscriptionId")]
pub struct Subscribe {
    pub selector: EventSelector,
    /// Only events of this session; `None` matches events of any session.
    pub session_id: Option<String>,
    pub listener: Listener,
}

/// Removes a registration. Answers whether it still existed.
#[derive(Debug, Clone, Copy, Message)]
#[rtype(result = "bool")]
pub struct Unsubscribe(pub SubscriptionId);

/// Stops a protocol actor. `CommandActor` fails its pending commands first.
#[derive(Debug, Clone, Copy, Message)]
#[rtype(result = "()")]
pub struct StopActor;

#[derive(Debug, Message)]
#[rtype(result = "()")]
pub(crate) struct CommandTimeout(pub u64);

#[derive(Debug)]
pub(crate) struct PendingRequestInfo {
    pub method: String,
    pub timeout: Duration,
    pub result_tx: oneshot::Sender<CommandResult>,
    pub timeout_handle: SpawnHandle,
}

/// A command as written to the wire.
#[derive(Serialize, Debug)]
pub(crate) struct JsonRpcRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: &'a Value,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// The `error` member of a failed reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Any JSON message the browser sends: a reply or an event.
#[derive(Deserialize, Debug)]
pub(crate) struct IncomingJson {
    pub id: Option<u64>,
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

/// An inbound message after classification.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    Reply {
        id: u64,
        outcome: Result<Value, JsonRpcError>,
    },
    Event(ProtocolEvent),
}

impl Inbound {
    /// Classifies one text frame.
    ///
    /// Anything carrying an `id` is a reply; a reply without `result` counts
    /// as an empty object. Anything else with a `method` is an event.
    pub fn parse(text: &str) -> Result<Inbound, ProtocolError> {
        let parsed: IncomingJson = serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;

        if let Some(id) = parsed.id {
            let outcome = match parsed.error {
                Some(error) => Err(error),
                None => Ok(match parsed.result {
                    None | Some(Value::Null) => Value::Object(Default::default()),
                    Some(result) => result,
                }),
            };
            return Ok(Inbound::Reply { id, outcome });
        }

        match (parsed.method, parsed.error) {
            (Some(method), _) => Ok(Inbound::Event(ProtocolEvent {
                session_id: parsed.session_id,
                method,
                params: parsed.params.unwrap_or_else(|| Value::Object(Default::default())),
            })),
            (None, Some(error)) => Err(ProtocolError::UnroutableError {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(ProtocolError::UnexpectedMessage(text.to_string())),
        }
    }
}
