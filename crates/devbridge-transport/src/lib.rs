//! # devbridge transport
//!
//! Establishes and manages the network connection to a browser's DevTools
//! endpoint. The `Transport` trait abstracts the wire (WebSocket today), and
//! `ConnectionActor` runs one connection inside the actor system: it owns the
//! read/write loop, forwards received text, accepts outgoing text, and reports
//! its lifecycle to a supervisor.

pub mod connection;
pub mod error;
pub mod factory;
pub mod traits;
pub mod types;
#[cfg(feature = "websocket")]
pub mod websocket;

pub use connection::{
    ConnectionActor, ConnectionState, ConnectionStatusUpdate, Disconnect, IncomingMessage,
    SendMessage,
};
pub use error::TransportError;
pub use factory::create_transport;
pub use traits::Transport;
pub use types::ConnectParams;
