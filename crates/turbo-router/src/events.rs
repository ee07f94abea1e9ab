//! Synchronous pub/sub for router navigation events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Navigation events a host router emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouterEventKind {
    RouteChangeStart,
    RouteChangeComplete,
    RouteChangeError,
    BeforeHistoryChange,
    HashChangeStart,
    HashChangeComplete,
}

/// Handle returned by [`RouterEvents::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Event emitter keyed by [`RouterEventKind`].
///
/// Listeners run synchronously in registration order. A listener may
/// subscribe or unsubscribe others while running; changes apply from the
/// next emit.
#[derive(Default)]
pub struct RouterEvents {
    listeners: Mutex<Vec<(ListenerId, RouterEventKind, Listener)>>,
    next_id: AtomicU64,
}

impl RouterEvents {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event. The listener receives the URL.
    pub fn on(
        &self,
        kind: RouterEventKind,
        listener: impl Fn(&str) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, kind, Arc::new(listener)));
        id
    }

    /// Unsubscribe. Returns whether the listener was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    /// Call every listener subscribed to `kind`. Returns how many ran.
    pub fn emit(&self, kind: RouterEventKind, url: &str) -> usize {
        let matching: Vec<Listener> = self
            .lock()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();

        for listener in &matching {
            listener(url);
        }
        matching.len()
    }

    /// Number of listeners for `kind`.
    pub fn listener_count(&self, kind: RouterEventKind) -> usize {
        self.lock().iter().filter(|(_, k, _)| *k == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, RouterEventKind, Listener)>> {
        // Listeners never run under the lock; the Vec stays valid.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for RouterEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterEvents")
            .field("listeners", &self.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_matching_listeners_in_order() {
        let events = RouterEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        events.on(RouterEventKind::RouteChangeStart, move |url| {
            first.lock().unwrap().push(format!("first:{url}"));
        });
        let second = Arc::clone(&seen);
        events.on(RouterEventKind::RouteChangeStart, move |url| {
            second.lock().unwrap().push(format!("second:{url}"));
        });
        events.on(RouterEventKind::RouteChangeComplete, |_| {
            panic!("wrong event");
        });

        let ran = events.emit(RouterEventKind::RouteChangeStart, "/cart");

        assert_eq!(ran, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["first:/cart", "second:/cart"]);
    }

    #[test]
    fn test_off_removes_listener() {
        let events = RouterEvents::new();
        let id = events.on(RouterEventKind::HashChangeStart, |_| {});

        assert_eq!(events.listener_count(RouterEventKind::HashChangeStart), 1);
        assert!(events.off(id));
        assert!(!events.off(id));
        assert_eq!(events.emit(RouterEventKind::HashChangeStart, "/#a"), 0);
    }

    #[test]
    fn test_listener_can_subscribe_during_emit() {
        let events = Arc::new(RouterEvents::new());
        let inner = Arc::clone(&events);
        events.on(RouterEventKind::BeforeHistoryChange, move |_| {
            inner.on(RouterEventKind::BeforeHistoryChange, |_| {});
        });

        assert_eq!(events.emit(RouterEventKind::BeforeHistoryChange, "/"), 1);
        assert_eq!(events.listener_count(RouterEventKind::BeforeHistoryChange), 2);
    }
}
