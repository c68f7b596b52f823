mod common;

use common::{MockBrowser, method_of, reply, serve_version};
use devbridge_client::{
    Client, ClientError, Config, ConnectionState, EndpointConfig, TransportError, profiler,
};
use serde_json::json;
use std::time::Duration;

fn silent_on_profiler_stop(request: &serde_json::Value) -> Vec<serde_json::Value> {
    match method_of(request) {
        "Profiler.stop" => vec![],
        _ => vec![reply(request, json!({}))],
    }
}

#[actix_rt::test]
async fn connecting_to_nothing_fails_with_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = Client::connect(url).await.err().expect("connect must fail");
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
}

#[actix_rt::test]
async fn unsupported_schemes_are_rejected() {
    let err = Client::connect("http://127.0.0.1:9222").await.err().expect("connect must fail");
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::UnsupportedScheme(_))
    ));
}

#[actix_rt::test]
async fn close_fails_in_flight_and_later_commands() {
    let browser = MockBrowser::start(silent_on_profiler_stop).await;
    let client = Client::connect(browser.url()).await.unwrap();
    assert_eq!(
        client.connection_state().await.unwrap(),
        ConnectionState::Connected
    );

    let pending_client = client.clone();
    let pending =
        actix_rt::spawn(async move { pending_client.execute(profiler::StopParams::new()).await });
    actix_rt::time::sleep(Duration::from_millis(50)).await;

    client.close().await;
    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);

    let err = client
        .execute(profiler::EnableParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
}

#[actix_rt::test]
async fn browser_hangup_fails_pending_commands() {
    let browser = MockBrowser::start(silent_on_profiler_stop).await;
    let client = Client::connect(browser.url()).await.unwrap();

    let pending_client = client.clone();
    let pending =
        actix_rt::spawn(async move { pending_client.execute(profiler::StopParams::new()).await });
    actix_rt::time::sleep(Duration::from_millis(50)).await;

    browser.disconnect();
    let err = tokio::time::timeout(Duration::from_secs(2), pending)
        .await
        .expect("pending command resolves")
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
    assert!(
        client
            .connection_state()
            .await
            .unwrap()
            .is_terminal()
    );
    client.close().await;
}

#[actix_rt::test]
async fn from_config_discovers_the_socket_url() {
    let browser = MockBrowser::acking().await;
    let port = serve_version(browser.url()).await;

    let config = Config {
        endpoint: EndpointConfig {
            remote_debugging_port: port,
            ..Default::default()
        },
        ..Default::default()
    };
    let client = Client::from_config(&config).await.unwrap();
    client.execute(profiler::EnableParams::new()).await.unwrap();
    assert_eq!(browser.received()[0]["method"], "Profiler.enable");
    client.close().await;
}

#[actix_rt::test]
async fn configured_default_timeout_applies() {
    let browser = MockBrowser::start(silent_on_profiler_stop).await;
    let mut config = Config::default();
    config.global.default_command_timeout = Duration::from_millis(80);
    let client = Client::connect_with_config(browser.url(), &config)
        .await
        .unwrap();

    let err = client.execute(profiler::StopParams::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { timeout_ms: 80, .. }));
    client.close().await;
}
