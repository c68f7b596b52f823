//! The CommandActor sends commands, correlates replies by id, and enforces
//! timeouts.

use crate::messages::{
    CommandResult, CommandTimeout, Inbound, JsonRpcError, JsonRpcRequest, PendingRequestInfo,
    ProtocolEvent, SendCommand, StopActor,
};
use actix::prelude::*;
use devbridge_core::{Config, error::InternalError};
use devbridge_transport::{
    ConnectionState, ConnectionStatusUpdate, IncomingMessage, SendMessage, TransportError,
};
use log::{debug, error, info, trace, warn};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

pub struct CommandActor {
    default_timeout: Duration,
    connection: Recipient<SendMessage>,
    event_sink: Recipient<ProtocolEvent>,
    next_id: u64,
    pending_requests: HashMap<u64, PendingRequestInfo>,
    // Set once the connection is gone; later commands fail straight away.
    closed: Option<TransportError>,
}

impl CommandActor {
    pub fn new(
        config: &Config,
        connection: Recipient<SendMessage>,
        event_sink: Recipient<ProtocolEvent>,
    ) -> Self {
        Self {
            default_timeout: config.global.default_command_timeout,
            connection,
            event_sink,
            next_id: 1,
            pending_requests: HashMap::new(),
            closed: None,
        }
    }

    fn handle_reply(
        &mut self,
        id: u64,
        outcome: Result<Value, JsonRpcError>,
        ctx: &mut Context<Self>,
    ) {
        let Some(pending) = self.pending_requests.remove(&id) else {
            warn!("Received reply for unknown or already handled command id: {}", id);
            return;
        };
        ctx.cancel_future(pending.timeout_handle);

        let result: CommandResult = outcome.map_err(|error| {
            debug!(
                "Command {} ({}) failed: {} (code {})",
                id, pending.method, error.message, error.code
            );
            InternalError::Protocol {
                code: error.code,
                message: error.message,
                data: error.data,
            }
        });

        if pending.result_tx.send(result).is_err() {
            // The caller stopped waiting.
            debug!(
                "Requester for command id {} (method: {}) dropped the result channel.",
                id, pending.method
            );
        }
    }

    fn forward_event(&self, event: ProtocolEvent) {
        trace!("Forwarding event {} (session: {:?})", event.method, event.session_id);
        if !self.event_sink.connected() {
            error!("Event router is gone, dropping event {}", event.method);
            return;
        }
        self.event_sink.do_send(event);
    }

    fn fail_all_pending(&mut self, ctx: &mut Context<Self>, err: impl Fn() -> InternalError) {
        for (id, pending) in self.pending_requests.drain() {
            ctx.cancel_future(pending.timeout_handle);
            let _ = pending.result_tx.send(Err(err()));
            debug!("Failed pending command id {} ({})", id, pending.method);
        }
    }
}

impl Actor for CommandActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        info!("CommandActor started.");
    }

    fn stopping(&mut self, ctx: &mut Context<Self>) -> Running {
        info!("CommandActor stopping.");
        self.fail_all_pending(ctx, || InternalError::Actor("CommandActor shut down".to_string()));
        Running::Stop
    }
}

impl Handler<SendCommand> for CommandActor {
    type Result = Result<(), InternalError>;

    fn handle(&mut self, msg: SendCommand, ctx: &mut Context<Self>) -> Self::Result {
        if let Some(err) = &self.closed {
            debug!("Rejecting {}: connection is closed ({})", msg.method, err);
            let _ = msg.result_tx.send(Err(InternalError::Transport(err.clone())));
            return Err(InternalError::Transport(err.clone()));
        }

        let command_id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest {
            id: command_id,
            method: &msg.method,
            params: &msg.params,
            session_id: msg.session_id.as_deref(),
        };

        let json_request = match serde_json::to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize command {}: {}", command_id, e);
                let _ = msg
                    .result_tx
                    .send(Err(InternalError::Serialization(e.to_string())));
                return Err(InternalError::Serialization(e.to_string()));
            }
        };

        trace!("Sending command ({}): {}", command_id, json_request);

        let timeout = msg.timeout.unwrap_or(self.default_timeout);
        let timeout_handle = ctx.notify_later(CommandTimeout(command_id), timeout);
        self.pending_requests.insert(
            command_id,
            PendingRequestInfo {
                method: msg.method,
                timeout,
                result_tx: msg.result_tx,
                timeout_handle,
            },
        );

        let send_future = self.connection.send(SendMessage(json_request));
        let future = async move {
            match send_future.await {
                Ok(Ok(())) => {
                    trace!("Command {} handed to transport.", command_id);
                    None
                }
                Ok(Err(transport_err)) => {
                    error!("Transport error sending command {}: {}", command_id, transport_err);
                    Some(InternalError::Transport(transport_err))
                }
                Err(mailbox_err) => {
                    error!(
                        "Mailbox error sending command {} to ConnectionActor: {}",
                        command_id, mailbox_err
                    );
                    Some(InternalError::Actor(format!(
                        "ConnectionActor mailbox error: {}",
                        mailbox_err
                    )))
                }
            }
        }
        .into_actor(self)
        .map(move |send_error, actor, ctx| {
            if let Some(err) = send_error {
                if let Some(pending) = actor.pending_requests.remove(&command_id) {
                    ctx.cancel_future(pending.timeout_handle);
                    let _ = pending.result_tx.send(Err(err));
                }
            }
        });
        ctx.spawn(future);

        Ok(())
    }
}

impl Handler<IncomingMessage> for CommandActor {
    type Result = ();

    fn handle(&mut self, msg: IncomingMessage, ctx: &mut Context<Self>) {
        trace!("CommandActor received raw message: {}", msg.0);
        match Inbound::parse(&msg.0) {
            Ok(Inbound::Reply { id, outcome }) => self.handle_reply(id, outcome, ctx),
            Ok(Inbound::Event(event)) => self.forward_event(event),
            Err(e) => error!("Dropping inbound message: {}. Raw: {}", e, msg.0),
        }
    }
}

impl Handler<StopActor> for CommandActor {
    type Result = ();

    fn handle(&mut self, _msg: StopActor, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

impl Handler<CommandTimeout> for CommandActor {
    type Result = ();

    fn handle(&mut self, msg: CommandTimeout, _ctx: &mut Context<Self>) {
        let command_id = msg.0;
        if let Some(pending) = self.pending_requests.remove(&command_id) {
            warn!(
                "Command id {} (method: {}) timed out after {:?}.",
                command_id, pending.method, pending.timeout
            );
            let _ = pending.result_tx.send(Err(InternalError::Timeout {
                method: pending.method,
                timeout_ms: pending.timeout.as_millis() as u64,
            }));
        }
    }
}

impl Handler<ConnectionStatusUpdate> for CommandActor {
    type Result = ();

    fn handle(&mut self, msg: ConnectionStatusUpdate, ctx: &mut Context<Self>) {
        debug!("CommandActor received ConnectionStatusUpdate: {:?}", msg.0);
        let err = match msg.0 {
            ConnectionState::Disconnected(err) => {
                err.unwrap_or_else(|| TransportError::NotConnected("connection closed".into()))
            }
            ConnectionState::FailedToStart(err) => err,
            _ => return,
        };

        if !self.pending_requests.is_empty() {
            warn!(
                "Connection lost ({}); failing {} pending commands.",
                err,
                self.pending_requests.len()
            );
        }
        self.fail_all_pending(ctx, || InternalError::Transport(err.clone()));
        self.closed = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_channel::oneshot;
    use serde_json::json;
    use tokio::sync::mpsc;

    /// Stands in for the connection: hands every outgoing frame to the test.
    struct MockConnection {
        sent: mpsc::UnboundedSender<String>,
        fail_sends: bool,
    }

    impl Actor for MockConnection {
        type Context = Context<Self>;
    }

    impl Handler<SendMessage> for MockConnection {
        type Result = Result<(), TransportError>;

        fn handle(&mut self, msg: SendMessage, _ctx: &mut Context<Self>) -> Self::Result {
            if self.fail_sends {
                return Err(TransportError::SendFailed("socket closed".into()));
            }
            let _ = self.sent.send(msg.0);
            Ok(())
        }
    }

    struct EventSink(mpsc::UnboundedSender<ProtocolEvent>);

    impl Actor for EventSink {
        type Context = Context<Self>;
    }

    impl Handler<ProtocolEvent> for EventSink {
        type Result = ();

        fn handle(&mut self, msg: ProtocolEvent, _ctx: &mut Context<Self>) {
            let _ = self.0.send(msg);
        }
    }

    struct Harness {
        actor: Addr<CommandActor>,
        sent: mpsc::UnboundedReceiver<String>,
        events: mpsc::UnboundedReceiver<ProtocolEvent>,
    }

    fn start(fail_sends: bool, default_timeout: Duration) -> Harness {
        let (sent_tx, sent) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();
        let connection = MockConnection {
            sent: sent_tx,
            fail_sends,
        }
        .start();
        let sink = EventSink(event_tx).start();

        let mut config = Config::default();
        config.global.default_command_timeout = default_timeout;
        let actor = CommandActor::new(&config, connection.recipient(), sink.recipient()).start();
        Harness {
            actor,
            sent,
            events,
        }
    }

    async fn submit(
        actor: &Addr<CommandActor>,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> oneshot::Receiver<CommandResult> {
        let (result_tx, result_rx) = oneshot::channel();
        actor
            .send(SendCommand {
                session_id: None,
                method: method.to_string(),
                params,
                timeout,
                result_tx,
            })
            .await
            .expect("mailbox")
            .expect("accepted");
        result_rx
    }

    fn id_of(frame: &str) -> u64 {
        let value: Value = serde_json::from_str(frame).expect("frame is json");
        value["id"].as_u64().expect("frame has id")
    }

    #[actix_rt::test]
    async fn ids_increase_and_replies_resolve() {
        let mut h = start(false, Duration::from_secs(5));

        let first = submit(&h.actor, "Animation.getPlaybackRate", json!({}), None).await;
        let second = submit(&h.actor, "Animation.getCurrentTime", json!({ "id": "a" }), None).await;

        let frame1 = h.sent.recv().await.unwrap();
        let frame2 = h.sent.recv().await.unwrap();
        assert_eq!(id_of(&frame1), 1);
        assert_eq!(id_of(&frame2), 2);
        let sent: Value = serde_json::from_str(&frame2).unwrap();
        assert_eq!(
            sent,
            json!({ "id": 2, "method": "Animation.getCurrentTime", "params": { "id": "a" } })
        );

        // Out of order on purpose.
        h.actor.do_send(IncomingMessage(r#"{"id":2,"result":{"currentTime":4.0}}"#.into()));
        h.actor.do_send(IncomingMessage(r#"{"id":1,"result":{"playbackRate":0.5}}"#.into()));

        assert_eq!(second.await.unwrap().unwrap(), json!({ "currentTime": 4.0 }));
        assert_eq!(first.await.unwrap().unwrap(), json!({ "playbackRate": 0.5 }));
    }

    #[actix_rt::test]
    async fn error_reply_becomes_protocol_error() {
        let mut h = start(false, Duration::from_secs(5));
        let rx = submit(
            &h.actor,
            "Database.executeSQL",
            json!({ "databaseId": "1", "query": "SELEC" }),
            None,
        )
        .await;
        let id = id_of(&h.sent.recv().await.unwrap());
        h.actor.do_send(IncomingMessage(format!(
            r#"{{"id":{},"error":{{"code":1,"message":"bad sql"}}}}"#,
            id
        )));

        match rx.await.unwrap() {
            Err(InternalError::Protocol {
                code,
                message,
                data,
            }) => {
                assert_eq!(code, 1);
                assert_eq!(message, "bad sql");
                assert_eq!(data, None);
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn per_call_timeout_overrides_default() {
        let mut h = start(false, Duration::from_secs(60));
        let rx = submit(
            &h.actor,
            "HeapProfiler.collectGarbage",
            json!({}),
            Some(Duration::from_millis(20)),
        )
        .await;
        let _ = h.sent.recv().await;

        match rx.await.unwrap() {
            Err(InternalError::Timeout { method, timeout_ms }) => {
                assert_eq!(method, "HeapProfiler.collectGarbage");
                assert_eq!(timeout_ms, 20);
            }
            other => panic!("expected timeout, got {:?}", other),
        }

        // A late reply for the timed-out id is ignored.
        h.actor.do_send(IncomingMessage(r#"{"id":1,"result":{}}"#.into()));
        let pending = h.actor.send(PendingCount).await.unwrap();
        assert_eq!(pending, 0);
    }

    #[actix_rt::test]
    async fn transport_send_failure_fails_the_command() {
        let h = start(true, Duration::from_secs(5));
        let rx = submit(&h.actor, "Profiler.enable", json!({}), None).await;
        assert!(matches!(
            rx.await.unwrap(),
            Err(InternalError::Transport(TransportError::SendFailed(_)))
        ));
    }

    #[actix_rt::test]
    async fn disconnect_fails_pending_and_later_commands() {
        let mut h = start(false, Duration::from_secs(5));
        let rx = submit(&h.actor, "Profiler.stop", json!({}), None).await;
        let _ = h.sent.recv().await;

        h.actor.do_send(ConnectionStatusUpdate(ConnectionState::Disconnected(Some(
            TransportError::ReceiveFailed("reset".into()),
        ))));
        assert!(matches!(
            rx.await.unwrap(),
            Err(InternalError::Transport(TransportError::ReceiveFailed(_)))
        ));

        let (result_tx, result_rx) = oneshot::channel();
        let accepted = h
            .actor
            .send(SendCommand {
                session_id: None,
                method: "Profiler.start".into(),
                params: json!({}),
                timeout: None,
                result_tx,
            })
            .await
            .unwrap();
        assert!(accepted.is_err());
        assert!(result_rx.await.unwrap().is_err());
    }

    #[actix_rt::test]
    async fn events_go_to_the_router_and_junk_is_dropped() {
        let mut h = start(false, Duration::from_secs(5));
        h.actor.do_send(IncomingMessage("{ definitely not json".into()));
        h.actor.do_send(IncomingMessage(
            r#"{"method":"Database.addDatabase","params":{"database":{}},"sessionId":"S1"}"#.into(),
        ));

        let event = h.events.recv().await.unwrap();
        assert_eq!(event.method, "Database.addDatabase");
        assert_eq!(event.session_id.as_deref(), Some("S1"));
        assert_eq!(event.params, json!({ "database": {} }));
    }

    #[actix_rt::test]
    async fn session_id_is_sent_on_the_wire() {
        let mut h = start(false, Duration::from_secs(5));
        let (result_tx, _result_rx) = oneshot::channel();
        h.actor
            .send(SendCommand {
                session_id: Some("S7".into()),
                method: "LayerTree.enable".into(),
                params: json!({}),
                timeout: None,
                result_tx,
            })
            .await
            .unwrap()
            .unwrap();
        let frame: Value = serde_json::from_str(&h.sent.recv().await.unwrap()).unwrap();
        assert_eq!(frame["sessionId"], "S7");
    }

    #[derive(Message)]
    #[rtype(result = "usize")]
    struct PendingCount;

    impl Handler<PendingCount> for CommandActor {
        type Result = usize;

        fn handle(&mut self, _msg: PendingCount, _ctx: &mut Context<Self>) -> usize {
            self.pending_requests.len()
        }
    }
}
