use crate::client::{Client, typed};
use crate::error::ClientError;
use crate::subscription::Subscription;
use devbridge_protocol::{
    Command, Event,
    target::{DetachFromTargetParams, SessionId, TargetId},
};
use devbridge_protocol_handler::{EventSelector, Listener};
use log::info;
use std::time::Duration;

/// A flattened session on one target, multiplexed over the client's
/// connection. Commands carry its `sessionId`; [`Session::on`] only sees
/// events the browser tags with it.
#[derive(Clone)]
pub struct Session {
    client: Client,
    session_id: SessionId,
    target_id: TargetId,
}

impl Session {
    pub(crate) fn new(client: Client, session_id: SessionId, target_id: TargetId) -> Self {
        Self {
            client,
            session_id,
            target_id,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn target_id(&self) -> &TargetId {
        &self.target_id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn execute<C: Command>(&self, command: C) -> Result<C::Response, ClientError> {
        self.client
            .dispatch(Some(self.session_id.to_string()), command, None)
            .await
    }

    pub async fn execute_with_timeout<C: Command>(
        &self,
        command: C,
        timeout: Duration,
    ) -> Result<C::Response, ClientError> {
        self.client
            .dispatch(Some(self.session_id.to_string()), command, Some(timeout))
            .await
    }

    pub async fn on<E, F>(&self, callback: F) -> Result<Subscription, ClientError>
    where
        E: Event,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.client
            .subscribe(
                EventSelector::method(E::METHOD),
                Some(self.session_id.to_string()),
                Listener::callback(typed(callback)),
            )
            .await
    }

    /// Detaches from the target. The client stays connected.
    pub async fn detach(self) -> Result<(), ClientError> {
        self.client
            .execute(DetachFromTargetParams::new().with_session_id(self.session_id.clone()))
            .await?;
        info!("Detached session {} from {}", self.session_id, self.target_id);
        Ok(())
    }
}
