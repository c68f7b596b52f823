use actix::Addr;
use devbridge_protocol_handler::{EventActor, SubscriptionId, Unsubscribe};
use log::debug;

/// A registered event handler.
///
/// Dropping the handle removes the handler; call [`Subscription::detach`] to
/// keep it for the lifetime of the connection instead.
#[must_use = "the handler is removed as soon as the subscription is dropped"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    router: Addr<EventActor>,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, router: Addr<EventActor>) -> Self {
        Self {
            id,
            router,
            active: true,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the handler. Returns `false` if it was already gone, e.g.
    /// because the connection closed.
    pub async fn unsubscribe(mut self) -> bool {
        self.active = false;
        self.router.send(Unsubscribe(self.id)).await.unwrap_or(false)
    }

    /// Leaves the handler registered until the connection closes.
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.active && self.router.connected() {
            debug!("Dropping subscription {}", self.id);
            self.router.do_send(Unsubscribe(self.id));
        }
    }
}
