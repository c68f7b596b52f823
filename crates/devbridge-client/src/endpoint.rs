//! Locating the browser's DevTools WebSocket endpoint.

use crate::error::ClientError;
use devbridge_core::EndpointConfig;
use log::{debug, info, warn};
use serde::Deserialize;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// The `/json/version` document a Chromium browser serves next to its
/// DevTools socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "User-Agent", default)]
    pub user_agent: String,
    #[serde(rename = "V8-Version", default)]
    pub v8_version: Option<String>,
    #[serde(rename = "WebKit-Version", default)]
    pub webkit_version: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Fetches and decodes the version document at `url`, retrying briefly while
/// the browser is still starting up.
pub async fn fetch_version(url: &str) -> Result<BrowserVersion, ClientError> {
    let client = reqwest::Client::new();
    let mut attempt = 1;
    loop {
        match fetch_once(&client, url).await {
            Ok(version) => return Ok(version),
            Err(e) if attempt < MAX_ATTEMPTS => {
                debug!("Attempt {} to read {} failed: {}", attempt, url, e);
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => {
                warn!("Giving up on {} after {} attempts.", url, attempt);
                return Err(e);
            }
        }
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<BrowserVersion, ClientError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClientError::Endpoint(format!("Failed to reach {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(ClientError::Endpoint(format!(
            "{} answered HTTP {}",
            url,
            response.status()
        )));
    }

    response
        .json::<BrowserVersion>()
        .await
        .map_err(|e| ClientError::Endpoint(format!("Malformed version document: {}", e)))
}

/// Works out the WebSocket URL to connect to.
///
/// An explicit `connection_url_override` wins. Otherwise the browser's
/// `/json/version` is asked for its `webSocketDebuggerUrl`, unless discovery
/// is disabled, in which case `ws://{address}:{port}` is used as is.
pub async fn resolve_endpoint(endpoint: &EndpointConfig) -> Result<String, ClientError> {
    if let Some(url) = &endpoint.connection_url_override {
        info!("Using configured DevTools URL {}", url);
        return Ok(url.clone());
    }

    if !endpoint.discover {
        let url = endpoint.fallback_ws_url();
        info!("Endpoint discovery disabled, using {}", url);
        return Ok(url);
    }

    let version = fetch_version(&endpoint.version_url()).await?;
    info!(
        "Discovered {} (protocol {}) at {}",
        version.browser, version.protocol_version, version.web_socket_debugger_url
    );
    Ok(version.web_socket_debugger_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const VERSION_BODY: &str = r#"{
        "Browser": "HeadlessChrome/124.0.6367.60",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0 HeadlessChrome/124.0.6367.60",
        "V8-Version": "12.4.254.12",
        "WebKit-Version": "537.36",
        "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/4a7b"
    }"#;

    /// Answers every request on an ephemeral port with `status` and `body`.
    async fn serve(status: &'static str, body: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        port
    }

    fn endpoint(port: u16) -> EndpointConfig {
        EndpointConfig {
            remote_debugging_port: port,
            ..Default::default()
        }
    }

    #[test]
    fn version_document_decodes() {
        let version: BrowserVersion = serde_json::from_str(VERSION_BODY).unwrap();
        assert_eq!(version.protocol_version, "1.3");
        assert_eq!(version.v8_version.as_deref(), Some("12.4.254.12"));
        assert_eq!(
            version.web_socket_debugger_url,
            "ws://127.0.0.1:9222/devtools/browser/4a7b"
        );
    }

    #[tokio::test]
    async fn override_skips_discovery() {
        let config = EndpointConfig {
            connection_url_override: Some("ws://example.invalid/devtools/page/1".into()),
            // Nothing listens here; discovery would fail.
            remote_debugging_port: 1,
            ..Default::default()
        };
        assert_eq!(
            resolve_endpoint(&config).await.unwrap(),
            "ws://example.invalid/devtools/page/1"
        );
    }

    #[tokio::test]
    async fn disabled_discovery_uses_host_and_port() {
        let config = EndpointConfig {
            discover: false,
            remote_debugging_port: 9333,
            ..Default::default()
        };
        assert_eq!(resolve_endpoint(&config).await.unwrap(), "ws://127.0.0.1:9333");
    }

    #[tokio::test]
    async fn discovery_reads_websocket_url() {
        let port = serve("200 OK", VERSION_BODY).await;
        assert_eq!(
            resolve_endpoint(&endpoint(port)).await.unwrap(),
            "ws://127.0.0.1:9222/devtools/browser/4a7b"
        );
    }

    #[tokio::test]
    async fn http_errors_are_endpoint_errors() {
        let port = serve("404 Not Found", "{}").await;
        let err = resolve_endpoint(&endpoint(port)).await.unwrap_err();
        assert!(matches!(err, ClientError::Endpoint(msg) if msg.contains("404")));
    }
}
