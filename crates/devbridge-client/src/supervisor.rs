//! The supervisor actor owning one client's connection, command and event actors.

use actix::prelude::*;
use devbridge_core::{Config, error::InternalError};
use devbridge_protocol_handler::{CommandActor, EventActor, StopActor};
use devbridge_transport::{
    ConnectParams, ConnectionActor, ConnectionState, ConnectionStatusUpdate, Disconnect,
    TransportError,
};
use futures_channel::oneshot;
use log::{debug, error, info, warn};

// --- Supervisor Messages ---

/// Starts the connection, command and event actors for one endpoint.
#[derive(Message)]
#[rtype(result = "Result<CoreActorsInfo, InternalError>")]
pub struct StartCoreActors(pub ConnectParams);

/// Addresses of the started core actors.
#[derive(Clone)]
pub struct CoreActorsInfo {
    pub connection_actor: Addr<ConnectionActor>,
    pub command_actor: Addr<CommandActor>,
    pub event_actor: Addr<EventActor>,
}

/// Resolves once the connection is up, or with its error once it failed.
#[derive(Message)]
#[rtype(result = "Result<(), InternalError>")]
pub struct WaitForConnection;

/// Current state of the supervised connection.
#[derive(Message)]
#[rtype(result = "ConnectionState")]
pub struct GetConnectionState;

/// Closes the connection and stops every supervised actor.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

type ConnectionWaiter = oneshot::Sender<Result<(), InternalError>>;

/// Top-level actor of a client: starts the core actors, relays connection
/// state to the `CommandActor`, and tears everything down when the
/// connection ends.
pub struct SupervisorActor {
    config: Config,
    core: Option<CoreActorsInfo>,
    state: ConnectionState,
    waiters: Vec<ConnectionWaiter>,
}

impl SupervisorActor {
    pub fn new(config: Config) -> Self {
        SupervisorActor {
            config,
            core: None,
            state: ConnectionState::Idle,
            waiters: Vec::new(),
        }
    }

    fn resolve_waiters(&mut self) {
        let outcome = connection_outcome(&self.state);
        for waiter in self.waiters.drain(..) {
            let result = match &outcome {
                Some(Ok(())) => Ok(()),
                Some(Err(e)) => Err(InternalError::Transport(e.clone())),
                None => Err(InternalError::Actor("connection still pending".to_string())),
            };
            let _ = waiter.send(result);
        }
    }

    /// Stops the protocol actors. The connection actor stops on its own.
    fn stop_core_actors(&mut self) {
        if let Some(core) = self.core.take() {
            core.command_actor.do_send(StopActor);
            core.event_actor.do_send(StopActor);
        }
    }
}

/// `Some` once the connection has either come up or ended for good.
fn connection_outcome(state: &ConnectionState) -> Option<Result<(), TransportError>> {
    match state {
        ConnectionState::Connected => Some(Ok(())),
        ConnectionState::Disconnected(Some(e)) | ConnectionState::FailedToStart(e) => {
            Some(Err(e.clone()))
        }
        ConnectionState::Disconnected(None) => Some(Err(TransportError::NotConnected(
            "connection closed".to_string(),
        ))),
        ConnectionState::Idle | ConnectionState::Connecting | ConnectionState::Disconnecting => {
            None
        }
    }
}

impl Actor for SupervisorActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("SupervisorActor started.");
    }

    fn stopping(&mut self, _ctx: &mut Context<Self>) -> Running {
        info!("SupervisorActor stopping.");
        if let Some(core) = &self.core {
            core.connection_actor.do_send(Disconnect);
        }
        self.stop_core_actors();
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(Err(InternalError::Actor(
                "supervisor stopped before the connection was established".to_string(),
            )));
        }
        Running::Stop
    }
}

// --- Message Handlers ---

impl Handler<StartCoreActors> for SupervisorActor {
    type Result = Result<CoreActorsInfo, InternalError>;

    fn handle(&mut self, msg: StartCoreActors, ctx: &mut Context<Self>) -> Self::Result {
        if let Some(core) = &self.core {
            warn!("Core actors already started. Ignoring request.");
            return Ok(core.clone());
        }

        let connect_params = msg.0;
        let mailbox_capacity = self.config.actor_system.default_mailbox_capacity.max(1);
        info!("Supervisor starting core actors for {}", connect_params.url);

        let event_actor = EventActor::create(move |ectx| {
            ectx.set_mailbox_capacity(mailbox_capacity);
            EventActor::default()
        });

        // The connection needs the command actor's address and the command
        // actor needs the connection's, so both are built inside `create`.
        let supervisor = ctx.address().recipient::<ConnectionStatusUpdate>();
        let event_sink = event_actor.clone().recipient();
        let config = &self.config;
        let mut connection_actor = None;
        let command_actor = CommandActor::create(|cctx| {
            cctx.set_mailbox_capacity(mailbox_capacity);
            let connection = ConnectionActor::new(
                connect_params,
                cctx.address().recipient(),
                supervisor,
            )
            .start();
            let outgoing = connection.clone().recipient();
            connection_actor = Some(connection);
            CommandActor::new(config, outgoing, event_sink)
        });

        let Some(connection_actor) = connection_actor else {
            error!("ConnectionActor was not created.");
            command_actor.do_send(StopActor);
            event_actor.do_send(StopActor);
            return Err(InternalError::Actor(
                "failed to start the connection actor".to_string(),
            ));
        };

        let core = CoreActorsInfo {
            connection_actor,
            command_actor,
            event_actor,
        };
        self.core = Some(core.clone());
        Ok(core)
    }
}

impl Handler<WaitForConnection> for SupervisorActor {
    type Result = ResponseFuture<Result<(), InternalError>>;

    fn handle(&mut self, _msg: WaitForConnection, _ctx: &mut Context<Self>) -> Self::Result {
        if let Some(outcome) = connection_outcome(&self.state) {
            return Box::pin(async move { outcome.map_err(InternalError::Transport) });
        }

        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        Box::pin(async move {
            rx.await.unwrap_or_else(|_| {
                Err(InternalError::Actor(
                    "supervisor dropped the connection waiter".to_string(),
                ))
            })
        })
    }
}

impl Handler<GetConnectionState> for SupervisorActor {
    type Result = MessageResult<GetConnectionState>;

    fn handle(&mut self, _msg: GetConnectionState, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.state.clone())
    }
}

impl Handler<ConnectionStatusUpdate> for SupervisorActor {
    type Result = ();

    fn handle(&mut self, msg: ConnectionStatusUpdate, _ctx: &mut Context<Self>) {
        info!("Supervisor received ConnectionStatusUpdate: {:?}", msg.0);
        if let Some(core) = &self.core {
            core.command_actor.do_send(msg.clone());
        }
        self.state = msg.0;

        match &self.state {
            ConnectionState::Connected => self.resolve_waiters(),
            ConnectionState::Disconnected(err) => {
                match err {
                    Some(e) => warn!("Supervised connection failed: {}", e),
                    None => info!("Supervised connection closed."),
                }
                self.resolve_waiters();
                self.stop_core_actors();
            }
            ConnectionState::FailedToStart(e) => {
                error!("Supervised connection failed to start: {}", e);
                self.resolve_waiters();
                self.stop_core_actors();
            }
            other => debug!("Supervisor noted state {:?}", other),
        }
    }
}

impl Handler<Shutdown> for SupervisorActor {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Context<Self>) {
        info!("Supervisor shutting down.");
        if let Some(core) = &self.core {
            // Pending commands fail with a transport error rather than the
            // generic one the command actor uses when it stops.
            core.command_actor
                .do_send(ConnectionStatusUpdate(ConnectionState::Disconnected(None)));
            core.connection_actor.do_send(Disconnect);
        }
        self.stop_core_actors();
        ctx.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn failed_start_resolves_waiters_with_the_transport_error() {
        let supervisor = SupervisorActor::new(Config::default()).start();
        let core = supervisor
            .send(StartCoreActors(ConnectParams::new("http://127.0.0.1:1")))
            .await
            .expect("mailbox")
            .expect("core actors");

        let outcome = supervisor.send(WaitForConnection).await.expect("mailbox");
        assert!(matches!(
            outcome,
            Err(InternalError::Transport(TransportError::UnsupportedScheme(_)))
        ));
        assert!(matches!(
            supervisor.send(GetConnectionState).await.expect("mailbox"),
            ConnectionState::FailedToStart(_)
        ));

        // The protocol actors are stopped once the connection is gone.
        actix_rt::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(core.command_actor.send(StopActor).await.is_err());
        assert!(core.event_actor.send(StopActor).await.is_err());
    }
}
