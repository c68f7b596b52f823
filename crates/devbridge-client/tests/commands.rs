mod common;

use common::{MockBrowser, error_reply, method_of, reply};
use devbridge_client::{Client, ClientError, animation, database, profiler, target};
use serde_json::json;
use std::time::Duration;

#[actix_rt::test]
async fn execute_sql_error_reply_becomes_protocol_failure() {
    let browser = MockBrowser::start(|request| match method_of(request) {
        "Database.executeSQL" => vec![error_reply(request, 1, "bad sql")],
        _ => vec![reply(request, json!({}))],
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let err = client
        .execute(database::ExecuteSqlParams::new("db-1", "SELEKT 1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Protocol(_)));
    assert_eq!(err.protocol_failure(), Some((1, "bad sql")));
    client.close().await;
}

#[actix_rt::test]
async fn execute_sends_wire_shape_and_decodes_returns() {
    let browser = MockBrowser::start(|request| {
        vec![reply(
            request,
            json!({ "columnNames": ["n"], "values": [1] }),
        )]
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let first = client
        .execute(database::ExecuteSqlParams::new("db-1", "SELECT 1 AS n"))
        .await
        .unwrap();
    assert_eq!(first.column_names, Some(vec!["n".to_string()]));
    assert_eq!(first.values, Some(vec![json!(1)]));
    assert_eq!(first.sql_error, None);

    client.execute(animation::EnableParams::new()).await.unwrap();

    let frames = browser.received();
    assert_eq!(
        frames[0],
        json!({
            "id": 1,
            "method": "Database.executeSQL",
            "params": { "databaseId": "db-1", "query": "SELECT 1 AS n" }
        })
    );
    assert_eq!(
        frames[1],
        json!({ "id": 2, "method": "Animation.enable", "params": {} })
    );
    client.close().await;
}

#[actix_rt::test]
async fn replies_missing_required_fields_fail_to_decode() {
    let browser = MockBrowser::acking().await;
    let client = Client::connect(browser.url()).await.unwrap();

    let err = client
        .execute(animation::GetPlaybackRateParams::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Deserialization { ref method, .. } if method == "Animation.getPlaybackRate"
    ));
    client.close().await;
}

#[actix_rt::test]
async fn execute_raw_returns_the_result_object() {
    let browser = MockBrowser::start(|request| match method_of(request) {
        "Browser.getVersion" => vec![reply(request, json!({ "product": "Chrome/124" }))],
        _ => vec![reply(request, json!({}))],
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let result = client
        .execute_raw("Browser.getVersion", json!({}))
        .await
        .unwrap();
    assert_eq!(result, json!({ "product": "Chrome/124" }));
    client.close().await;
}

#[actix_rt::test]
async fn unanswered_command_times_out() {
    let browser = MockBrowser::start(|request| match method_of(request) {
        "Profiler.stop" => vec![],
        _ => vec![reply(request, json!({}))],
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let err = client
        .execute_with_timeout(profiler::StopParams::new(), Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Timeout { ref method, timeout_ms: 100 } if method == "Profiler.stop")
    );

    // The connection stays usable.
    client.execute(profiler::EnableParams::new()).await.unwrap();
    client.close().await;
}

#[actix_rt::test]
async fn replies_are_matched_by_id_not_order() {
    // Holds the first command's reply back until the second arrives.
    let held = std::sync::Arc::new(std::sync::Mutex::new(None));
    let browser = MockBrowser::start(move |request| {
        let mut held = held.lock().unwrap();
        match held.take() {
            None => {
                *held = Some(request.clone());
                vec![]
            }
            Some(first) => vec![
                reply(request, json!({ "result": "second" })),
                reply(&first, json!({ "result": "first" })),
            ],
        }
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let a = client.clone();
    let first = actix_rt::spawn(async move { a.execute_raw("Test.first", json!({})).await });
    actix_rt::time::sleep(Duration::from_millis(50)).await;
    let second = client.execute_raw("Test.second", json!({})).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, json!({ "result": "first" }));
    assert_eq!(second, json!({ "result": "second" }));
    client.close().await;
}

#[actix_rt::test]
async fn session_commands_carry_the_session_id() {
    let browser = MockBrowser::start(|request| match method_of(request) {
        "Target.attachToTarget" => vec![reply(request, json!({ "sessionId": "S1" }))],
        _ => vec![reply(request, json!({}))],
    })
    .await;
    let client = Client::connect(browser.url()).await.unwrap();

    let session = client.attach_to_target("T1").await.unwrap();
    assert_eq!(session.session_id(), &target::SessionId::new("S1"));
    session.execute(animation::EnableParams::new()).await.unwrap();
    session.detach().await.unwrap();

    let frames = browser.received();
    assert_eq!(
        frames[0]["params"],
        json!({ "targetId": "T1", "flatten": true })
    );
    assert_eq!(frames[1]["method"], "Animation.enable");
    assert_eq!(frames[1]["sessionId"], "S1");
    assert_eq!(frames[2]["method"], "Target.detachFromTarget");
    assert_eq!(frames[2]["params"], json!({ "sessionId": "S1" }));
    assert!(frames[2].get("sessionId").is_none());
    client.close().await;
}
