//! `env_logger` bootstrap for binaries and tests built on devbridge.

use crate::error::CoreError;
use log::LevelFilter;

/// Dependencies that are chatty at debug level; never logged below `info`
/// unless `RUST_LOG` says otherwise.
const QUIET_MODULES: &[&str] = &[
    "tungstenite",
    "tokio_tungstenite",
    "hyper",
    "reqwest",
    "rustls",
];

/// Reads a level name such as `"debug"` or `"off"`, falling back to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or_else(|_| {
        log::debug!("Unknown log level '{}', using info.", level);
        LevelFilter::Info
    })
}

/// Installs `env_logger` at `level`. Directives from `RUST_LOG` take
/// precedence over both `level` and the quieted modules.
///
/// Fails if a global logger is already installed.
#[cfg(feature = "env_logger")]
pub fn setup_logging(level: &str) -> Result<(), CoreError> {
    builder(level, env_logger::Env::default())
        .try_init()
        .map_err(|e| CoreError::LoggingSetup(e.to_string()))
}

#[cfg(feature = "env_logger")]
fn builder(level: &str, env: env_logger::Env<'_>) -> env_logger::Builder {
    let level = parse_level(level);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, level.min(LevelFilter::Info));
    }
    // Applied last so environment directives replace the ones above.
    builder.parse_env(env);
    builder
}

#[cfg(not(feature = "env_logger"))]
pub fn setup_logging(level: &str) -> Result<(), CoreError> {
    log::debug!(
        "env_logger feature not enabled; leaving logger setup (level {}) to the application.",
        parse_level(level)
    );
    let _ = QUIET_MODULES;
    Ok(())
}
