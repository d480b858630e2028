use std::{
    cell::Cell,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use crate::{internal::Registry, monitoring::Monitor, monitoring::MonitorId};

/// Registry for managing monitors attached to a subject.
///
/// Access via [`Subject::monitors()`](crate::Subject::monitors).
///
/// # Example
///
/// ```ignore
/// let registry = subject.monitors();
///
/// // Add a monitor
/// let id = registry.add(MyMonitor);
///
/// // Pause all monitors
/// registry.pause();
///
/// // Resume all monitors
/// registry.resume();
/// ```
pub struct MonitorRegistry {
    monitors: Registry<Rc<dyn Monitor>>,
    paused: Cell<bool>,
}

impl MonitorRegistry {
    pub(crate) fn new() -> Self {
        Self {
            monitors: Registry::with_capacity(2),
            paused: Cell::new(false),
        }
    }

    /// Register a new monitor and return its id.
    ///
    /// The monitor is notified starting with the next event; a monitor added
    /// from inside a callback does not see the rest of the current publish.
    pub fn add<M: Monitor + 'static>(&self, monitor: M) -> MonitorId {
        self.monitors.push(Rc::new(monitor))
    }

    /// Remove a monitor by its id. Returns `false` if it was not registered.
    pub fn remove(&self, id: MonitorId) -> bool {
        self.monitors.remove_id(id).is_some()
    }

    /// Pause all registered monitors.
    ///
    /// Paused monitors do not receive callbacks. Messages continue to flow
    /// through the subject normally.
    pub fn pause(&self) {
        self.paused.set(true);
    }

    /// Resume all registered monitors.
    pub fn resume(&self) {
        self.paused.set(false);
    }

    /// Returns `true` while monitors are paused.
    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Number of registered monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if no monitor is registered.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        !self.paused.get() && !self.monitors.is_empty()
    }

    pub(crate) fn notify(&self, f: impl Fn(&dyn Monitor)) {
        if !self.is_active() {
            return;
        }

        let snapshot = self.monitors.snapshot();
        for entry in snapshot.iter() {
            let result = catch_unwind(AssertUnwindSafe(|| f(entry.value.as_ref())));
            if result.is_err() {
                tracing::error!(monitor_id = %entry.id, "Monitor panicked, removing");
                self.monitors.remove_id(entry.id);
            }
        }
    }
}

impl fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("monitors.len()", &self.monitors.len())
            .field("paused", &self.paused.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::SubscriptionId;

    #[derive(Clone, Default)]
    struct Counting {
        subscribed: Rc<RefCell<Vec<SubscriptionId>>>,
    }

    impl Monitor for Counting {
        fn on_subscribed(&self, id: SubscriptionId, _sink: &str) {
            self.subscribed.borrow_mut().push(id);
        }
    }

    struct Panicking;

    impl Monitor for Panicking {
        fn on_subscribed(&self, _id: SubscriptionId, _sink: &str) {
            panic!("monitor failure");
        }
    }

    #[test]
    fn add_and_remove() {
        let registry = MonitorRegistry::new();
        assert!(registry.is_empty());

        let id = registry.add(Counting::default());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(!registry.is_active());
    }

    #[test]
    fn paused_monitors_are_not_notified() {
        let registry = MonitorRegistry::new();
        let monitor = Counting::default();
        registry.add(monitor.clone());

        registry.pause();
        assert!(registry.is_paused());
        registry.notify(|m| m.on_subscribed(1.into(), "sink"));
        assert!(monitor.subscribed.borrow().is_empty());

        registry.resume();
        registry.notify(|m| m.on_subscribed(2.into(), "sink"));
        assert_eq!(*monitor.subscribed.borrow(), vec![SubscriptionId::from(2)]);
    }

    #[test]
    fn panicking_monitor_is_removed_and_others_still_run() {
        let registry = MonitorRegistry::new();
        registry.add(Panicking);
        let monitor = Counting::default();
        registry.add(monitor.clone());

        registry.notify(|m| m.on_subscribed(1.into(), "sink"));

        assert_eq!(registry.len(), 1);
        assert_eq!(monitor.subscribed.borrow().len(), 1);
    }
}
