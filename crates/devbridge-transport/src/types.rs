use devbridge_core::{Config, WebSocketConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters required to establish a connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectParams {
    /// Full endpoint URL, e.g. `ws://127.0.0.1:9222/devtools/browser/<id>`.
    /// The scheme selects the transport.
    pub url: String,

    /// Applied to the initial connection attempt.
    #[serde(
        with = "devbridge_core::config::duration_ms_serde",
        default = "default_connect_timeout"
    )]
    pub connection_timeout: Duration,

    #[serde(default)]
    pub ws_options: WebSocketConfig,

    /// Capacity of the channel feeding the write loop.
    #[serde(default = "default_outgoing_buffer")]
    pub outgoing_buffer: usize,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_outgoing_buffer() -> usize {
    100
}

impl ConnectParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection_timeout: default_connect_timeout(),
            ws_options: WebSocketConfig::default(),
            outgoing_buffer: default_outgoing_buffer(),
        }
    }

    /// Connection parameters for `url` using the transport section of `cfg`.
    pub fn from_config(url: impl Into<String>, cfg: &Config) -> Self {
        Self {
            url: url.into(),
            connection_timeout: cfg.transport.connect_timeout,
            ws_options: cfg.transport.websocket.clone(),
            outgoing_buffer: cfg.actor_system.outgoing_buffer.max(1),
        }
    }
}
