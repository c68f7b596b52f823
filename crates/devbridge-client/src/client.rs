//! The user-facing handle of one DevTools connection.

use crate::endpoint::resolve_endpoint;
use crate::error::ClientError;
use crate::session::Session;
use crate::subscription::Subscription;
use crate::supervisor::{
    GetConnectionState, Shutdown, StartCoreActors, SupervisorActor, WaitForConnection,
};
use actix::prelude::*;
use actix_rt::ArbiterHandle;
use devbridge_core::Config;
use devbridge_protocol::{CdpEvent, Command, Event, target};
use devbridge_protocol_handler::{
    CommandActor, EventActor, EventSelector, Listener, ProtocolEvent, SendCommand, Subscribe,
};
use devbridge_transport::{ConnectParams, ConnectionState};
use futures_channel::oneshot;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;

/// A connection to a browser's DevTools endpoint.
///
/// Cheap to clone; every clone drives the same connection. Must be used from
/// within a running actix system.
///
/// ```no_run
/// use devbridge_client::{Client, animation};
///
/// #[actix::main]
/// async fn main() -> Result<(), devbridge_client::ClientError> {
///     let client = Client::connect("ws://127.0.0.1:9222/devtools/browser/abc").await?;
///     let started = client
///         .on(|event: animation::EventAnimationStarted| {
///             println!("{} started", event.animation.name);
///         })
///         .await?;
///     client.execute(animation::EnableParams::new()).await?;
///     # drop(started);
///     client.close().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    supervisor: Addr<SupervisorActor>,
    command_actor: Addr<CommandActor>,
    event_actor: Addr<EventActor>,
}

impl Client {
    /// Connects to `url` with the default configuration.
    pub async fn connect(url: impl Into<String>) -> Result<Self, ClientError> {
        Self::connect_with_config(url, &Config::default()).await
    }

    /// Connects to `url`, taking timeouts and limits from `config`.
    pub async fn connect_with_config(
        url: impl Into<String>,
        config: &Config,
    ) -> Result<Self, ClientError> {
        let url = url.into();
        info!("Connecting to {}", url);

        let supervisor = SupervisorActor::new(config.clone()).start();
        let core = supervisor
            .send(StartCoreActors(ConnectParams::from_config(url, config)))
            .await??;

        if let Err(e) = supervisor.send(WaitForConnection).await? {
            supervisor.do_send(Shutdown);
            return Err(e.into());
        }
        info!("Connected.");

        Ok(Client {
            supervisor,
            command_actor: core.command_actor,
            event_actor: core.event_actor,
        })
    }

    /// Resolves the endpoint from `config.endpoint` and connects to it.
    pub async fn from_config(config: &Config) -> Result<Self, ClientError> {
        let url = resolve_endpoint(&config.endpoint).await?;
        Self::connect_with_config(url, config).await
    }

    /// Sends a command and waits for its typed reply.
    pub async fn execute<C: Command>(&self, command: C) -> Result<C::Response, ClientError> {
        self.dispatch(None, command, None).await
    }

    /// Like [`Client::execute`], overriding the configured command timeout.
    pub async fn execute_with_timeout<C: Command>(
        &self,
        command: C,
        timeout: Duration,
    ) -> Result<C::Response, ClientError> {
        self.dispatch(None, command, Some(timeout)).await
    }

    /// Sends a command without bindings and returns its raw `result`.
    pub async fn execute_raw(
        &self,
        method: impl Into<String>,
        params: Value,
    ) -> Result<Value, ClientError> {
        self.send_command(None, method.into(), params, None).await
    }

    pub(crate) async fn dispatch<C: Command>(
        &self,
        session_id: Option<String>,
        command: C,
        timeout: Option<Duration>,
    ) -> Result<C::Response, ClientError> {
        let params = serde_json::to_value(&command).map_err(|e| ClientError::Serialization {
            method: C::METHOD.to_string(),
            message: e.to_string(),
        })?;
        let result = self
            .send_command(session_id, C::METHOD.to_string(), params, timeout)
            .await?;
        serde_json::from_value(result).map_err(|e| ClientError::Deserialization {
            method: C::METHOD.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_command(
        &self,
        session_id: Option<String>,
        method: String,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        debug!("Executing {} (session: {:?})", method, session_id);
        let (result_tx, result_rx) = oneshot::channel();
        let command = SendCommand {
            session_id,
            method: method.clone(),
            params,
            timeout,
            result_tx,
        };

        // A rejected command has already been answered through `result_tx`.
        let _ = self.command_actor.send(command).await?;

        match result_rx.await {
            Ok(result) => result.map_err(ClientError::from),
            Err(_) => Err(ClientError::Actor(format!(
                "reply channel for {} closed without an answer",
                method
            ))),
        }
    }

    /// Calls `callback` with every `E` event of the connection, whatever
    /// session it belongs to.
    pub async fn on<E, F>(&self, callback: F) -> Result<Subscription, ClientError>
    where
        E: Event,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.subscribe(
            EventSelector::method(E::METHOD),
            None,
            Listener::callback(typed(callback)),
        )
        .await
    }

    /// Like [`Client::on`], running `callback` on `executor` instead of the
    /// event router's arbiter.
    pub async fn on_with_executor<E, F>(
        &self,
        executor: ArbiterHandle,
        callback: F,
    ) -> Result<Subscription, ClientError>
    where
        E: Event,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.subscribe(
            EventSelector::method(E::METHOD),
            None,
            Listener::callback_on(executor, typed(callback)),
        )
        .await
    }

    /// Calls `callback` with every event of the connection, bound or not.
    pub async fn on_any<F>(&self, callback: F) -> Result<Subscription, ClientError>
    where
        F: Fn(CdpEvent) + Send + Sync + 'static,
    {
        let listener = Listener::callback(move |event: ProtocolEvent| {
            match CdpEvent::parse(&event.method, event.params) {
                Ok(parsed) => callback(parsed),
                Err(e) => warn!("Dropping malformed {} event: {}", event.method, e),
            }
        });
        self.subscribe(EventSelector::All, None, listener).await
    }

    /// Delivers the raw `ProtocolEvent`s named `method` to an actor.
    pub async fn subscribe_actor(
        &self,
        method: impl Into<String>,
        recipient: Recipient<ProtocolEvent>,
    ) -> Result<Subscription, ClientError> {
        self.subscribe(
            EventSelector::method(method),
            None,
            Listener::Actor(recipient),
        )
        .await
    }

    pub(crate) async fn subscribe(
        &self,
        selector: EventSelector,
        session_id: Option<String>,
        listener: Listener,
    ) -> Result<Subscription, ClientError> {
        let id = self
            .event_actor
            .send(Subscribe {
                selector,
                session_id,
                listener,
            })
            .await?;
        Ok(Subscription::new(id, self.event_actor.clone()))
    }

    /// Attaches to a target in flattened mode; the returned session scopes
    /// commands and events to it.
    pub async fn attach_to_target(
        &self,
        target_id: impl Into<target::TargetId>,
    ) -> Result<Session, ClientError> {
        let target_id = target_id.into();
        let attached = self
            .execute(target::AttachToTargetParams::new(target_id.clone()).with_flatten(true))
            .await?;
        info!("Attached to {} as session {}", target_id, attached.session_id);
        Ok(Session::new(self.clone(), attached.session_id, target_id))
    }

    /// State of the underlying connection.
    pub async fn connection_state(&self) -> Result<ConnectionState, ClientError> {
        Ok(self.supervisor.send(GetConnectionState).await?)
    }

    /// Closes the connection. In-flight commands fail with a transport error
    /// and every clone of this client becomes unusable.
    pub async fn close(&self) {
        info!("Closing client.");
        if self.supervisor.send(Shutdown).await.is_err() {
            debug!("Supervisor already stopped.");
        }
    }
}

/// Wraps a typed callback into one taking raw events.
pub(crate) fn typed<E, F>(callback: F) -> impl Fn(ProtocolEvent) + Send + Sync + 'static
where
    E: Event,
    F: Fn(E) + Send + Sync + 'static,
{
    move |event: ProtocolEvent| match serde_json::from_value::<E>(event.params) {
        Ok(payload) => callback(payload),
        Err(e) => warn!("Dropping malformed {} event: {}", event.method, e),
    }
}
