use crate::error::TransportError;
use crate::factory::create_transport;
use crate::traits::Transport;
use crate::types::ConnectParams;
use actix::prelude::*;
use log::{error, info, trace, warn};
use tokio::sync::mpsc;

/// Actor owning a single transport connection.
///
/// It connects on start, runs one task that both drains outgoing messages and
/// reads incoming ones, forwards every received text message to its message
/// handler, and reports lifecycle changes to its supervisor. The actor stops
/// itself once the connection is gone.
pub struct ConnectionActor {
    params: ConnectParams,
    state: ConnectionState,
    message_handler: Recipient<IncomingMessage>,
    supervisor: Recipient<ConnectionStatusUpdate>,
    // Set only when a transport was handed in instead of built from the URL.
    preset_transport: Option<Box<dyn Transport>>,
    outgoing_tx: Option<mpsc::Sender<String>>,
    connection_task: Option<SpawnHandle>,
}

impl ConnectionActor {
    pub fn new(
        params: ConnectParams,
        message_handler: Recipient<IncomingMessage>,
        supervisor: Recipient<ConnectionStatusUpdate>,
    ) -> Self {
        ConnectionActor {
            params,
            state: ConnectionState::Idle,
            message_handler,
            supervisor,
            preset_transport: None,
            outgoing_tx: None,
            connection_task: None,
        }
    }

    /// Uses `transport` instead of creating one from `params.url`.
    pub fn with_transport(
        params: ConnectParams,
        transport: Box<dyn Transport>,
        message_handler: Recipient<IncomingMessage>,
        supervisor: Recipient<ConnectionStatusUpdate>,
    ) -> Self {
        let mut actor = Self::new(params, message_handler, supervisor);
        actor.preset_transport = Some(transport);
        actor
    }

    fn start_connection_task(&mut self, ctx: &mut Context<Self>) {
        if self.connection_task.is_some()
            || matches!(
                self.state,
                ConnectionState::Connecting | ConnectionState::Connected
            )
        {
            warn!(
                "Connection task already running ({:?}). Ignoring start request.",
                self.state
            );
            return;
        }

        self.state = ConnectionState::Connecting;
        info!("ConnectionActor state -> Connecting ({})", self.params.url);
        self.notify_supervisor(self.state.clone());

        let transport_result = match self.preset_transport.take() {
            Some(transport) => Ok(transport),
            None => create_transport(&self.params),
        };

        let addr = ctx.address();
        let message_handler = self.message_handler.clone();
        let connect_timeout = self.params.connection_timeout;

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<String>(self.params.outgoing_buffer);
        self.outgoing_tx = Some(outgoing_tx);

        let connection_fut = async move {
            let transport = match transport_result {
                Ok(transport) => transport,
                Err(e) => {
                    error!("Failed to create transport: {}", e);
                    addr.do_send(TransportEvent::FailedToStart(e));
                    return;
                }
            };

            let mut transport =
                match tokio::time::timeout(connect_timeout, Self::connect_internal(transport))
                    .await
                {
                    Ok(Ok(transport)) => transport,
                    Ok(Err(e)) => {
                        error!("Transport connect error: {}", e);
                        addr.do_send(TransportEvent::FailedToStart(e));
                        return;
                    }
                    Err(_) => {
                        error!("Transport connection timed out after {:?}", connect_timeout);
                        addr.do_send(TransportEvent::FailedToStart(TransportError::Timeout));
                        return;
                    }
                };

            info!("Transport connected.");
            addr.do_send(TransportEvent::Connected);

            loop {
                tokio::select! {
                    maybe_msg = outgoing_rx.recv() => {
                        let Some(msg) = maybe_msg else {
                            info!("Outgoing channel closed, ending connection loop.");
                            addr.do_send(TransportEvent::Disconnected(None));
                            break;
                        };
                        trace!("Sending message: {}", msg);
                        if let Err(e) = transport.send(&msg).await {
                            error!("Transport send error: {}. Disconnecting.", e);
                            addr.do_send(TransportEvent::Disconnected(Some(e)));
                            break;
                        }
                    },
                    received = transport.receive() => {
                        match received {
                            Some(Ok(msg)) => {
                                trace!("Received message: {}", msg);
                                if !message_handler.connected() {
                                    error!("Message handler is gone. Disconnecting.");
                                    addr.do_send(TransportEvent::Disconnected(Some(
                                        TransportError::Other("Message handler disconnected".into()),
                                    )));
                                    break;
                                }
                                message_handler.do_send(IncomingMessage(msg));
                            }
                            Some(Err(e)) => {
                                error!("Transport receive error: {}. Disconnecting.", e);
                                addr.do_send(TransportEvent::Disconnected(Some(e)));
                                break;
                            }
                            None => {
                                info!("Transport connection closed by remote.");
                                addr.do_send(TransportEvent::Disconnected(None));
                                break;
                            }
                        }
                    }
                }
            }

            if let Err(e) = transport.disconnect().await {
                warn!("Error during transport disconnect: {}", e);
            }
            info!("Connection task finished.");
        };

        self.connection_task = Some(ctx.spawn(connection_fut.into_actor(self)));
    }

    fn notify_supervisor(&self, state: ConnectionState) {
        if !self.supervisor.connected() {
            warn!("Supervisor is gone; dropping status update {:?}.", state);
            return;
        }
        self.supervisor.do_send(ConnectionStatusUpdate(state));
    }

    fn stop_connection_task(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.connection_task.take() {
            ctx.cancel_future(handle);
        }
        // Dropping the sender lets a still-running loop finish on its own.
        self.outgoing_tx.take();
    }

    async fn connect_internal(
        mut transport: Box<dyn Transport>,
    ) -> Result<Box<dyn Transport>, TransportError> {
        transport.connect().await?;
        Ok(transport)
    }
}

/// Lifecycle of the connection managed by `ConnectionActor`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Disconnecting,
    /// `Some(err)` after a failure, `None` after a graceful close.
    Disconnected(Option<TransportError>),
    /// The transport could not be created or never connected.
    FailedToStart(TransportError),
}

impl ConnectionState {
    /// True for the states after which the actor is gone for good.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectionState::Disconnected(_) | ConnectionState::FailedToStart(_)
        )
    }
}

// --- Actor Messages ---

/// Sends a text message out over the connection.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), TransportError>")]
pub struct SendMessage(pub String);

/// A text message received from the transport.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct IncomingMessage(pub String);

/// Asks the actor to close the connection and stop.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct Disconnect;

#[derive(Message)]
#[rtype(result = "()")]
enum TransportEvent {
    Connected,
    Disconnected(Option<TransportError>),
    FailedToStart(TransportError),
}

/// Sent to the supervisor on every state change.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ConnectionStatusUpdate(pub ConnectionState);

impl Actor for ConnectionActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("ConnectionActor starting for {}", self.params.url);
        self.start_connection_task(ctx);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        info!("ConnectionActor stopping.");
        self.stop_connection_task(ctx);

        if !self.state.is_terminal() {
            self.state = ConnectionState::Disconnected(None);
            self.notify_supervisor(self.state.clone());
        }
        Running::Stop
    }
}

impl Handler<TransportEvent> for ConnectionActor {
    type Result = ();

    fn handle(&mut self, msg: TransportEvent, ctx: &mut Context<Self>) {
        let new_state = match msg {
            TransportEvent::Connected => ConnectionState::Connected,
            TransportEvent::Disconnected(err) => ConnectionState::Disconnected(err),
            TransportEvent::FailedToStart(err) => ConnectionState::FailedToStart(err),
        };

        if self.state == new_state {
            trace!("Ignoring redundant state update: {:?}", new_state);
            return;
        }

        info!(
            "Connection state changing from {:?} -> {:?}",
            self.state, new_state
        );
        self.state = new_state.clone();
        self.notify_supervisor(new_state);

        if self.state.is_terminal() {
            self.connection_task = None;
            self.outgoing_tx = None;
            ctx.stop();
        }
    }
}

impl Handler<SendMessage> for ConnectionActor {
    type Result = ResponseFuture<Result<(), TransportError>>;

    fn handle(&mut self, msg: SendMessage, _ctx: &mut Context<Self>) -> Self::Result {
        let state = self.state.clone();
        let maybe_tx = self.outgoing_tx.clone();

        Box::pin(async move {
            match (state, maybe_tx) {
                (ConnectionState::Connected, Some(tx)) => tx.send(msg.0).await.map_err(|e| {
                    error!("Outgoing message channel send error: {}", e);
                    TransportError::SendFailed(format!("Message channel closed: {}", e))
                }),
                (state, _) => {
                    warn!("Attempted to send message while not connected ({:?})", state);
                    Err(TransportError::NotConnected(format!("Current state: {:?}", state)))
                }
            }
        })
    }
}

impl Handler<Disconnect> for ConnectionActor {
    type Result = ();

    fn handle(&mut self, _msg: Disconnect, ctx: &mut Context<Self>) {
        info!("Disconnect requested for {}", self.params.url);
        self.state = ConnectionState::Disconnecting;
        self.notify_supervisor(self.state.clone());
        ctx.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Transport backed by in-memory channels.
    struct ChannelTransport {
        inbound: mpsc::UnboundedReceiver<Option<String>>,
        sent: Arc<Mutex<Vec<String>>>,
        fail_connect: bool,
    }

    #[async_trait]
    impl Transport for ChannelTransport {
        async fn connect(&mut self) -> Result<(), TransportError> {
            if self.fail_connect {
                return Err(TransportError::ConnectionFailed("refused".into()));
            }
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send(&mut self, message: &str) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }

        async fn receive(&mut self) -> Option<Result<String, TransportError>> {
            match self.inbound.recv().await {
                Some(Some(text)) => Some(Ok(text)),
                // An explicit None or a dropped sender both mean "closed".
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        messages: Arc<Mutex<Vec<String>>>,
        states: Arc<Mutex<Vec<ConnectionState>>>,
    }

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl Handler<IncomingMessage> for Recorder {
        type Result = ();
        fn handle(&mut self, msg: IncomingMessage, _ctx: &mut Context<Self>) {
            self.messages.lock().unwrap().push(msg.0);
        }
    }

    impl Handler<ConnectionStatusUpdate> for Recorder {
        type Result = ();
        fn handle(&mut self, msg: ConnectionStatusUpdate, _ctx: &mut Context<Self>) {
            self.states.lock().unwrap().push(msg.0);
        }
    }

    struct Harness {
        inbound: mpsc::UnboundedSender<Option<String>>,
        sent: Arc<Mutex<Vec<String>>>,
        messages: Arc<Mutex<Vec<String>>>,
        states: Arc<Mutex<Vec<ConnectionState>>>,
        connection: Addr<ConnectionActor>,
    }

    fn start(fail_connect: bool) -> Harness {
        let (inbound, inbound_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder::default();
        let messages = recorder.messages.clone();
        let states = recorder.states.clone();
        let recorder = recorder.start();

        let transport = ChannelTransport {
            inbound: inbound_rx,
            sent: sent.clone(),
            fail_connect,
        };
        let connection = ConnectionActor::with_transport(
            ConnectParams::new("ws://test"),
            Box::new(transport),
            recorder.clone().recipient(),
            recorder.recipient(),
        )
        .start();

        Harness {
            inbound,
            sent,
            messages,
            states,
            connection,
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[actix_rt::test]
    async fn forwards_incoming_and_outgoing_messages() {
        let h = start(false);
        settle().await;

        h.inbound.send(Some(r#"{"method":"X.y"}"#.into())).unwrap();
        let sent = h
            .connection
            .send(SendMessage(r#"{"id":1}"#.into()))
            .await
            .expect("mailbox");
        assert!(sent.is_ok());
        settle().await;

        assert_eq!(*h.messages.lock().unwrap(), vec![r#"{"method":"X.y"}"#.to_string()]);
        assert_eq!(*h.sent.lock().unwrap(), vec![r#"{"id":1}"#.to_string()]);
        assert_eq!(
            h.states.lock().unwrap()[..2],
            [ConnectionState::Connecting, ConnectionState::Connected]
        );
    }

    #[actix_rt::test]
    async fn remote_close_reports_graceful_disconnect() {
        let h = start(false);
        settle().await;

        h.inbound.send(None).unwrap();
        settle().await;

        assert_eq!(
            h.states.lock().unwrap().last(),
            Some(&ConnectionState::Disconnected(None))
        );
        assert!(!h.connection.connected());
    }

    #[actix_rt::test]
    async fn failed_connect_reports_failed_to_start() {
        let h = start(true);
        settle().await;

        assert_eq!(
            h.states.lock().unwrap().last(),
            Some(&ConnectionState::FailedToStart(TransportError::ConnectionFailed(
                "refused".into()
            )))
        );
    }

    #[actix_rt::test]
    async fn send_before_connect_is_rejected() {
        let h = start(true);
        settle().await;

        let result = h.connection.send(SendMessage("{}".into())).await;
        // Either the actor already stopped or it refuses the message.
        match result {
            Ok(inner) => assert!(matches!(inner, Err(TransportError::NotConnected(_)))),
            Err(MailboxError::Closed) | Err(MailboxError::Timeout) => {}
        }
    }
}
