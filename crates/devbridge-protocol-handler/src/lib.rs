//! # devbridge protocol handler
//!
//! Sits between the connection and the client API. `CommandActor` assigns ids
//! to outgoing commands, matches replies to them, and enforces timeouts.
//! `EventActor` is the per-connection event router: it owns every
//! subscription and hands each incoming event to the listeners that match it.

pub mod command_actor;
pub mod error;
pub mod event_actor;
pub mod messages;

pub use command_actor::CommandActor;
pub use error::ProtocolError;
pub use event_actor::EventActor;
pub use messages::{
    CommandResult, EventCallback, EventSelector, Inbound, JsonRpcError, Listener, ProtocolEvent,
    SendCommand, StopActor, Subscribe, SubscriptionId, Unsubscribe,
};
