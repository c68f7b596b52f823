//! # devbridge core
//!
//! Pieces shared by every layer of the client: the configuration model and
//! its loader, the internal error taxonomy, and the logging bootstrap.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    ActorSystemConfig, Config, EndpointConfig, GlobalConfig, TransportConfig, WebSocketConfig,
    load_config, load_config_from,
};
pub use error::{CoreError, InternalError, TransportError};
