//! Session-expired subscriber registry.

use std::sync::{Arc, Mutex, PoisonError, Weak};

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Ordered set of callbacks fired when a session refresh is refused.
///
/// Delivery works on a snapshot: unsubscribing from inside a handler (or from
/// another task mid-delivery) affects the next notification, never the one
/// in progress.
#[derive(Default)]
pub struct SessionEvents {
    registry: Mutex<Registry>,
}

impl SessionEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers `handler`. It stays registered until
    /// [`Subscription::unsubscribe`] is called; dropping the handle keeps it.
    pub fn subscribe<F>(self: &Arc<Self>, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.push((id, Arc::new(handler)));

        Subscription {
            id,
            events: Arc::downgrade(self),
        }
    }

    /// Invokes every handler once, in registration order. Returns how many ran.
    pub fn notify(&self) -> usize {
        let snapshot: Vec<Handler> = self
            .lock()
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        tracing::debug!(subscribers = snapshot.len(), "notifying session expiry");
        for handler in &snapshot {
            handler();
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.lock().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) -> bool {
        let mut registry = self.lock();
        let before = registry.handlers.len();
        registry.handlers.retain(|(h, _)| *h != id);
        registry.handlers.len() != before
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // Handlers never run under the lock, so a poisoned registry is still consistent.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEvents")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Handle for one registered handler.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    events: Weak<SessionEvents>,
}

impl Subscription {
    /// Removes exactly this handler. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.events.upgrade() {
            Some(events) => events.remove(self.id),
            None => false,
        }
    }
}
