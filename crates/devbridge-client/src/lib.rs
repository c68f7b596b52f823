//! # devbridge client
//!
//! Typed access to the Chrome DevTools Protocol. A [`Client`] owns one
//! WebSocket connection to a browser and runs it inside the caller's actix
//! system: commands are sent with [`Client::execute`] and resolve with their
//! typed returns, events are delivered to handlers registered with
//! [`Client::on`]. Flattened target sessions are reached through
//! [`Client::attach_to_target`].
//!
//! The protocol bindings of `devbridge-protocol` are re-exported at the crate
//! root, so `devbridge_client::animation::EnableParams` and friends are in
//! scope with a single dependency.

mod client;
mod endpoint;
mod error;
mod session;
mod subscription;
mod supervisor;

pub use client::Client;
pub use endpoint::{BrowserVersion, fetch_version, resolve_endpoint};
pub use error::{ClientError, ProtocolFailure};
pub use session::Session;
pub use subscription::Subscription;

pub use devbridge_core::logging::setup_logging;
pub use devbridge_core::{
    Config, EndpointConfig, TransportError, load_config, load_config_from,
};
pub use devbridge_protocol::{
    CdpEvent, Command, Domain, EmptyReturns, Event, animation, browser, database, debugger, dom,
    dom_snapshot, heap_profiler, indexed_db, layer_tree, page, profiler, runtime,
    service_worker, target,
};
pub use devbridge_protocol_handler::{ProtocolEvent, SubscriptionId};
pub use devbridge_transport::ConnectionState;

pub use serde_json::Value;
