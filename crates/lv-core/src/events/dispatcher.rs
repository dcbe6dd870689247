//! Fan-out of table events to registered listeners

use std::sync::{Arc, Weak};
use parking_lot::RwLock;

use super::{DataTableListener, TableEvent};

/// Holds weak listener handles and forwards events to the live ones
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<Vec<Weak<dyn DataTableListener>>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the dispatcher does not keep it alive
    pub fn add_listener(&self, listener: &Arc<dyn DataTableListener>) {
        self.listeners.write().push(Arc::downgrade(listener));
    }

    /// Unregister a listener
    pub fn remove_listener(&self, listener: &Arc<dyn DataTableListener>) {
        let target = Arc::downgrade(listener);
        self.listeners.write().retain(|weak| !weak.ptr_eq(&target));
    }

    /// Number of listeners still alive
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Deliver events in order to every live listener
    pub fn publish(&self, events: &[TableEvent]) {
        if events.is_empty() {
            return;
        }

        let live: Vec<Arc<dyn DataTableListener>> = {
            let mut listeners = self.listeners.write();
            // Remove any dead weak references
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!("Publishing {} event(s) to {} listener(s)", events.len(), live.len());

        for event in events {
            for listener in &live {
                event.dispatch_to(listener.as_ref());
            }
        }
    }
}
