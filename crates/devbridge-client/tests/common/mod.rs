//! An in-process stand-in for a browser's DevTools socket.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

enum Push {
    Frame(Value),
    Close,
}

/// Accepts one WebSocket client on an ephemeral port. Every command the
/// client sends is recorded and handed to a responder, whose returned frames
/// are sent back in order. Events can be pushed at any time.
pub struct MockBrowser {
    url: String,
    push_tx: mpsc::UnboundedSender<Push>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl MockBrowser {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (push_tx, mut push_rx) = mpsc::unbounded_channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let frames = received.clone();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws) = accept_async(stream).await else {
                return;
            };
            let (mut sink, mut source) = ws.split();

            loop {
                tokio::select! {
                    frame = source.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            let request: Value = serde_json::from_str(&text).unwrap();
                            frames.lock().unwrap().push(request.clone());
                            for reply in responder(&request) {
                                if sink.send(Message::Text(reply.to_string())).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                        Some(Ok(_)) => {}
                    },
                    pushed = push_rx.recv() => match pushed {
                        Some(Push::Frame(frame)) => {
                            if sink.send(Message::Text(frame.to_string())).await.is_err() {
                                return;
                            }
                        }
                        Some(Push::Close) | None => {
                            let _ = sink.close().await;
                            return;
                        }
                    },
                }
            }
        });

        MockBrowser {
            url,
            push_tx,
            received,
        }
    }

    /// A browser that acknowledges every command with an empty result.
    pub async fn acking() -> Self {
        Self::start(|request| vec![reply(request, json!({}))]).await
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn push_event(&self, method: &str, params: Value) {
        let _ = self
            .push_tx
            .send(Push::Frame(json!({ "method": method, "params": params })));
    }

    pub fn push_session_event(&self, session_id: &str, method: &str, params: Value) {
        let _ = self.push_tx.send(Push::Frame(
            json!({ "method": method, "params": params, "sessionId": session_id }),
        ));
    }

    pub fn push_raw(&self, frame: Value) {
        let _ = self.push_tx.send(Push::Frame(frame));
    }

    /// Closes the socket from the browser side.
    pub fn disconnect(&self) {
        let _ = self.push_tx.send(Push::Close);
    }

    /// Every command received so far.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

pub fn reply(request: &Value, result: Value) -> Value {
    json!({ "id": request["id"], "result": result })
}

pub fn error_reply(request: &Value, code: i64, message: &str) -> Value {
    json!({ "id": request["id"], "error": { "code": code, "message": message } })
}

pub fn method_of(request: &Value) -> &str {
    request["method"].as_str().unwrap_or_default()
}

/// Serves `/json/version` pointing at `ws_url` on an ephemeral port.
pub async fn serve_version(ws_url: String) -> u16 {
    let body = json!({
        "Browser": "HeadlessChrome/124.0.6367.60",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": ws_url,
    })
    .to_string();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    port
}
