//! In-process subscriber list.

use std::sync::{Arc, Mutex, Weak};

use taskpulse_core::NotificationEvent;

/// Something that wants to hear about notification events.
pub trait EventConsumer: Send + Sync {
    fn on_event(&self, event: &NotificationEvent);
}

impl<F> EventConsumer for F
where
    F: Fn(&NotificationEvent) + Send + Sync,
{
    fn on_event(&self, event: &NotificationEvent) {
        self(event)
    }
}

#[derive(Default)]
struct SubscriberList {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn EventConsumer>)>,
}

/// Ordered set of consumers. Cloning shares the same list.
#[derive(Clone, Default)]
pub struct Subscribers {
    inner: Arc<Mutex<SubscriberList>>,
}

/// Handle returned by [`Subscribers::subscribe`].
///
/// Dropping it keeps the consumer registered; call [`Subscription::unsubscribe`]
/// to remove it.
pub struct Subscription {
    id: u64,
    list: Weak<Mutex<SubscriberList>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer. Delivery order is registration order.
    pub fn subscribe<C>(&self, consumer: C) -> Subscription
    where
        C: EventConsumer + 'static,
    {
        let mut list = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Arc::new(consumer)));
        Subscription {
            id,
            list: Arc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every consumer registered when the call starts.
    ///
    /// The list lock is not held while consumers run, so a consumer may
    /// subscribe or unsubscribe; such changes apply from the next event on.
    /// Returns the number of consumers invoked.
    pub fn dispatch(&self, event: &NotificationEvent) -> usize {
        let snapshot: Vec<Arc<dyn EventConsumer>> = self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .iter()
            .map(|(_, consumer)| Arc::clone(consumer))
            .collect();

        for consumer in &snapshot {
            consumer.on_event(event);
        }
        snapshot.len()
    }
}

impl Subscription {
    /// Remove exactly this consumer. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(list) = self.list.upgrade() else {
            return false;
        };
        let mut list = list.lock().unwrap_or_else(|e| e.into_inner());
        let before = list.entries.len();
        list.entries.retain(|(id, _)| *id != self.id);
        list.entries.len() != before
    }
}
