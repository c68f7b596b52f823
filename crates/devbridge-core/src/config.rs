use crate::error::CoreError;
use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Default base name of the configuration file (`devbridge.toml`, `.json`, ...).
pub const DEFAULT_CONFIG_NAME: &str = "devbridge";

/// Prefix of environment variable overrides, e.g. `DEVBRIDGE_GLOBAL__LOG_LEVEL=debug`.
pub const ENV_PREFIX: &str = "DEVBRIDGE";

// Helper for (de)serializing Duration as milliseconds
pub mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// Main configuration structure
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub transport: TransportConfig,
    pub actor_system: ActorSystemConfig,
    pub endpoint: EndpointConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
    /// Applied to every command that does not carry its own timeout.
    #[serde(rename = "default_command_timeout_ms", with = "duration_ms_serde")]
    pub default_command_timeout: Duration,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_command_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TransportConfig {
    #[serde(rename = "connect_timeout_ms", with = "duration_ms_serde")]
    pub connect_timeout: Duration,
    pub websocket: WebSocketConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(20),
            websocket: WebSocketConfig::default(),
        }
    }
}

/// WebSocket framing limits handed to the transport.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WebSocketConfig {
    pub max_message_size: Option<usize>,
    pub max_frame_size: Option<usize>,
    pub accept_unmasked_frames: bool,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            // Heap snapshots and DOM snapshots arrive as very large frames.
            max_message_size: Some(256 << 20),
            max_frame_size: None,
            accept_unmasked_frames: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ActorSystemConfig {
    pub default_mailbox_capacity: usize,
    /// Buffer between the connection actor and its write loop.
    pub outgoing_buffer: usize,
}

impl Default for ActorSystemConfig {
    fn default() -> Self {
        Self {
            default_mailbox_capacity: 100,
            outgoing_buffer: 100,
        }
    }
}

/// Where to find the browser's DevTools endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub remote_debugging_address: String,
    pub remote_debugging_port: u16,
    /// Full `ws://` URL; skips discovery when set.
    pub connection_url_override: Option<String>,
    /// Ask `/json/version` for the browser's `webSocketDebuggerUrl`.
    pub discover: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            remote_debugging_address: "127.0.0.1".to_string(),
            remote_debugging_port: 9222,
            connection_url_override: None,
            discover: true,
        }
    }
}

impl EndpointConfig {
    /// `http://host:port/json/version`, the discovery document of a Chromium browser.
    pub fn version_url(&self) -> String {
        format!(
            "http://{}:{}/json/version",
            self.remote_debugging_address, self.remote_debugging_port
        )
    }

    /// Bare `ws://host:port` URL used when discovery is disabled.
    pub fn fallback_ws_url(&self) -> String {
        format!(
            "ws://{}:{}",
            self.remote_debugging_address, self.remote_debugging_port
        )
    }
}

/// Loads configuration from `devbridge.*` in the current directory (optional)
/// and `DEVBRIDGE_` environment variables.
///
/// Nested keys use `__`, e.g. `DEVBRIDGE_TRANSPORT__CONNECT_TIMEOUT_MS=10000`.
pub fn load_config() -> Result<Config, CoreError> {
    build(None)
}

/// Like [`load_config`], but reads the given file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, CoreError> {
    build(Some(path))
}

fn build(path: Option<&Path>) -> Result<Config, CoreError> {
    let mut builder = ConfigLoader::builder()
        .set_default("global.log_level", GlobalConfig::default().log_level)?
        .set_default("global.default_command_timeout_ms", 30_000u64)?
        .set_default("transport.connect_timeout_ms", 20_000u64)?
        .set_default("actor_system.default_mailbox_capacity", 100u64)?;

    builder = match path {
        Some(path) => {
            log::debug!("Loading configuration from: {:?}", path);
            builder.add_source(File::from(path).required(true))
        }
        None => {
            log::debug!(
                "Loading configuration from default location ({}.toml)",
                DEFAULT_CONFIG_NAME
            );
            builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false))
        }
    };

    let cfg = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Config>()?;

    log::debug!("Loaded configuration: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write temp config");
        file
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.global.log_level, "info");
        assert_eq!(cfg.global.default_command_timeout, Duration::from_secs(30));
        assert_eq!(cfg.transport.connect_timeout, Duration::from_secs(20));
        assert_eq!(cfg.endpoint.remote_debugging_port, 9222);
        assert!(cfg.endpoint.discover);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_toml(
            r#"
            [global]
            log_level = "debug"
            default_command_timeout_ms = 1500

            [transport]
            connect_timeout_ms = 750

            [transport.websocket]
            max_frame_size = 65536

            [endpoint]
            remote_debugging_port = 9333
            discover = false
            "#,
        );

        let cfg = load_config_from(file.path()).expect("load config");
        assert_eq!(cfg.global.log_level, "debug");
        assert_eq!(cfg.global.default_command_timeout, Duration::from_millis(1500));
        assert_eq!(cfg.transport.connect_timeout, Duration::from_millis(750));
        assert_eq!(cfg.transport.websocket.max_frame_size, Some(65536));
        assert_eq!(cfg.endpoint.remote_debugging_port, 9333);
        assert_eq!(cfg.endpoint.remote_debugging_address, "127.0.0.1");
        assert!(!cfg.endpoint.discover);
        assert_eq!(cfg.actor_system.default_mailbox_capacity, 100);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_config_from(&missing),
            Err(CoreError::ConfigLoad(_))
        ));
    }

    #[test]
    fn endpoint_urls() {
        let endpoint = EndpointConfig {
            remote_debugging_address: "10.0.0.5".into(),
            remote_debugging_port: 9229,
            ..Default::default()
        };
        assert_eq!(endpoint.version_url(), "http://10.0.0.5:9229/json/version");
        assert_eq!(endpoint.fallback_ws_url(), "ws://10.0.0.5:9229");
    }
}
