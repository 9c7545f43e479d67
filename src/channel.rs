use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

type Handler = Rc<RefCell<dyn FnMut()>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    /// Keyed by registration order.
    handlers: BTreeMap<u64, Handler>,
}

/// Broadcasts a payload-free "history changed" signal to every subscriber.
///
/// Cloning yields another handle to the same set of listeners.
#[derive(Clone, Default)]
pub struct NotificationChannel {
    listeners: Rc<RefCell<Listeners>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every future [`announce`](Self::announce) until the
    /// returned subscription is unsubscribed or dropped.
    pub fn subscribe(&self, handler: impl FnMut() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.handlers.insert(id, Rc::new(RefCell::new(handler)));
        trace!(id, "history listener subscribed");

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Invokes all listeners in registration order.
    ///
    /// A listener removed while the dispatch is running is not called, and a listener
    /// that is already running (nested announce) is skipped.
    pub fn announce(&self) {
        let ids: Vec<u64> = self.listeners.borrow().handlers.keys().copied().collect();

        for id in ids {
            let handler = self.listeners.borrow().handlers.get(&id).cloned();
            let Some(handler) = handler else {
                continue;
            };

            match handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(),
                Err(_) => trace!(id, "skipping listener already in dispatch"),
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().handlers.len()
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration handle returned by [`NotificationChannel::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Stops further notifications. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            // Dropped after the borrow ends, the handler may own subscriptions itself
            let removed = listeners.borrow_mut().handlers.remove(&self.id);
            if removed.is_some() {
                trace!(id = self.id, "history listener unsubscribed");
            }
        }
        self.listeners = Weak::new();
    }

    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.borrow().handlers.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
