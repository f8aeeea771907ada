//! Subscriber collection with snapshot-on-read iteration.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::observer::SimulationObserver;

/// Observers keyed by `Arc` identity.
///
/// Broadcasts iterate over a cloned list, so observers may subscribe or
/// unsubscribe (themselves included) from inside a callback without
/// disturbing the pass in progress. Changes show up on the next broadcast.
#[derive(Default)]
pub(crate) struct SubscriberList {
    observers: RwLock<Vec<Arc<dyn SimulationObserver>>>,
}

impl SubscriberList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `observer` unless the same `Arc` is already present.
    pub(crate) fn add(&self, observer: Arc<dyn SimulationObserver>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Removes `observer` if present.
    pub(crate) fn remove<O: SimulationObserver + ?Sized>(&self, observer: &Arc<O>) -> bool {
        let target = Arc::as_ptr(observer).cast::<()>();
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| Arc::as_ptr(o).cast::<()>() != target);
        observers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub(crate) fn clear(&self) {
        self.observers.write().clear();
    }

    /// Calls `notify` for every current observer.
    ///
    /// A panicking observer is logged and skipped; the rest still get the
    /// event.
    pub(crate) fn broadcast(&self, event: &'static str, notify: impl Fn(&dyn SimulationObserver)) {
        let observers = self.observers.read().clone();
        for (index, observer) in observers.iter().enumerate() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref())));
            if let Err(payload) = result {
                warn!(
                    event,
                    subscriber = index,
                    reason = panic_message(payload.as_ref()),
                    "Subscriber panicked, continuing with the rest"
                );
            }
        }
    }
}

fn same_observer(a: &Arc<dyn SimulationObserver>, b: &Arc<dyn SimulationObserver>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pendulum::{Simulation, SimulationParameters};

    #[derive(Default)]
    struct Counter {
        updates: Mutex<usize>,
    }

    impl SimulationObserver for Counter {
        fn on_state_update(&self, _state: pendulum::PhysicsState) {
            *self.updates.lock() += 1;
        }
    }

    struct Panicker;

    impl SimulationObserver for Panicker {
        fn on_state_update(&self, _state: pendulum::PhysicsState) {
            panic!("boom");
        }
    }

    fn snapshot() -> pendulum::PhysicsState {
        Simulation::new(SimulationParameters::default()).snapshot()
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let list = SubscriberList::new();
        let counter = Arc::new(Counter::default());
        assert!(list.add(counter.clone()));
        assert!(!list.add(counter.clone()));
        assert_eq!(list.len(), 1);

        // A distinct instance is a distinct subscriber
        assert!(list.add(Arc::new(Counter::default())));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_by_identity() {
        let list = SubscriberList::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        list.add(a.clone());
        list.add(b.clone());

        assert!(list.remove(&a));
        assert!(!list.remove(&a));
        assert_eq!(list.len(), 1);

        let unknown = Arc::new(Counter::default());
        assert!(!list.remove(&unknown));
        assert_eq!(list.len(), 1);

        list.clear();
        assert_eq!(list.len(), 0);
        assert!(!list.remove(&b));
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let list = SubscriberList::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        list.add(a.clone());
        list.add(b.clone());

        let state = snapshot();
        list.broadcast("state", |o| o.on_state_update(state));
        list.broadcast("state", |o| o.on_state_update(state));

        assert_eq!(*a.updates.lock(), 2);
        assert_eq!(*b.updates.lock(), 2);
    }

    #[test]
    fn test_broadcast_isolates_panics() {
        let list = SubscriberList::new();
        let before = Arc::new(Counter::default());
        let after = Arc::new(Counter::default());
        list.add(before.clone());
        list.add(Arc::new(Panicker));
        list.add(after.clone());

        let state = snapshot();
        list.broadcast("state", |o| o.on_state_update(state));

        assert_eq!(*before.updates.lock(), 1);
        assert_eq!(*after.updates.lock(), 1);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_panicking_subscriber_is_logged() {
        let list = SubscriberList::new();
        list.add(Arc::new(Counter::default()));
        list.add(Arc::new(Panicker));

        let state = snapshot();
        let logs = crate::testing::capture_warnings(|| {
            list.broadcast("state_update", |o| o.on_state_update(state));
        });

        assert!(logs.contains("Subscriber panicked"), "{logs}");
        assert!(logs.contains("boom"), "{logs}");
        assert!(logs.contains("state_update"), "{logs}");
        assert!(logs.contains("subscriber=1"), "{logs}");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
