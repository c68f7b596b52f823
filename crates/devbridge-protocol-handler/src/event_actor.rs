//! The EventActor owns the subscriptions of one connection and dispatches
//! incoming events to them.

use crate::messages::{
    EventSelector, Listener, ProtocolEvent, StopActor, Subscribe, SubscriptionId, Unsubscribe,
};
use actix::prelude::*;
use log::{debug, info, trace, warn};
use std::collections::HashMap;

// Key: (selector, optional session). Value: registrations in subscription order.
type SubscriptionKey = (EventSelector, Option<String>);
type SubscriptionMap = HashMap<SubscriptionKey, Vec<(SubscriptionId, Listener)>>;

#[derive(Default)]
pub struct EventActor {
    subscriptions: SubscriptionMap,
    index: HashMap<SubscriptionId, SubscriptionKey>,
    next_id: u64,
}

impl EventActor {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(listeners) = self.subscriptions.get_mut(&key) {
            listeners.retain(|(existing, _)| *existing != id);
            if listeners.is_empty() {
                self.subscriptions.remove(&key);
            }
        }
        true
    }

    /// Keys an event can match, most specific first. Each registration lives
    /// under exactly one key, so no listener is reached twice.
    fn candidate_keys(event: &ProtocolEvent) -> Vec<SubscriptionKey> {
        let method = EventSelector::Method(event.method.clone());
        let mut keys = Vec::with_capacity(4);
        if event.session_id.is_some() {
            keys.push((method.clone(), event.session_id.clone()));
        }
        keys.push((method, None));
        if event.session_id.is_some() {
            keys.push((EventSelector::All, event.session_id.clone()));
        }
        keys.push((EventSelector::All, None));
        keys
    }

    /// Hands `event` to `listener`. Returns false if the listener is gone.
    fn deliver(listener: &Listener, event: &ProtocolEvent) -> bool {
        match listener {
            Listener::Actor(recipient) => {
                if !recipient.connected() {
                    return false;
                }
                recipient.do_send(event.clone());
                true
            }
            Listener::Callback {
                callback,
                executor: None,
            } => {
                callback(event.clone());
                true
            }
            Listener::Callback {
                callback,
                executor: Some(executor),
            } => {
                let callback = callback.clone();
                let event = event.clone();
                executor.spawn_fn(move || callback(event))
            }
        }
    }
}

impl Actor for EventActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        info!("EventActor started.");
    }

    fn stopping(&mut self, _ctx: &mut Context<Self>) -> Running {
        info!("EventActor stopping.");
        self.subscriptions.clear();
        self.index.clear();
        Running::Stop
    }
}

impl Handler<Subscribe> for EventActor {
    type Result = MessageResult<Subscribe>;

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Context<Self>) -> Self::Result {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let key = (msg.selector, msg.session_id);
        debug!("Adding subscription {} for {:?} ({:?})", id, key, msg.listener);

        self.index.insert(id, key.clone());
        self.subscriptions
            .entry(key)
            .or_default()
            .push((id, msg.listener));
        MessageResult(id)
    }
}

impl Handler<Unsubscribe> for EventActor {
    type Result = bool;

    fn handle(&mut self, msg: Unsubscribe, _ctx: &mut Context<Self>) -> bool {
        let removed = self.remove(msg.0);
        debug!("Removing subscription {}: {}", msg.0, if removed { "done" } else { "unknown" });
        removed
    }
}

impl Handler<StopActor> for EventActor {
    type Result = ();

    fn handle(&mut self, _msg: StopActor, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

impl Handler<ProtocolEvent> for EventActor {
    type Result = ();

    fn handle(&mut self, event: ProtocolEvent, _ctx: &mut Context<Self>) {
        trace!("EventActor received event: {:?}", event);

        let mut delivered = 0usize;
        let mut dead = Vec::new();
        for key in Self::candidate_keys(&event) {
            let Some(listeners) = self.subscriptions.get(&key) else {
                continue;
            };
            for (id, listener) in listeners {
                if Self::deliver(listener, &event) {
                    delivered += 1;
                } else {
                    dead.push(*id);
                }
            }
        }

        if delivered == 0 && dead.is_empty() {
            trace!("No subscribers for event: {}", event.method);
        } else {
            debug!(
                "Dispatched event '{}' (session: {:?}) to {} subscribers.",
                event.method, event.session_id, delivered
            );
        }

        for id in dead {
            warn!("Subscriber {} for {} is gone; removing it.", id, event.method);
            self.remove(id);
        }
    }
}
