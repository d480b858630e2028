use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    rc::Rc,
};

use crate::{Error, Message, Route, SubscriptionId, monitoring::Monitor};

/// Monitor that counts publishes, deliveries and failures per message type.
///
/// Register a clone with the subject and query the original at any time.
/// Counters are keyed by [`Message::type_id`], so two types sharing a type
/// name are still counted apart.
///
/// ```rust
/// use typebus::{SourceExt, Subject, monitors::DeliveryStats};
///
/// let subject = Subject::new();
/// let stats = DeliveryStats::new();
/// subject.monitors().add(stats.clone());
///
/// let _sub = subject.subscribe_fn(|_: &u32| Ok(()));
/// subject.publish(&1_u32)?;
/// subject.publish(&"unrouted")?;
///
/// assert_eq!(stats.published::<u32>(), 1);
/// assert_eq!(stats.delivered::<u32>(), 1);
/// assert_eq!(stats.delivered::<&str>(), 0);
/// assert_eq!(stats.active_subscriptions(), 1);
/// # Ok::<(), typebus::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct DeliveryStats {
    inner: Rc<RefCell<DeliveryStatsInner>>,
}

#[derive(Default)]
struct DeliveryStatsInner {
    counts: HashMap<TypeId, Counts>,
    active: HashSet<SubscriptionId>,
}

#[derive(Default)]
struct Counts {
    type_name: &'static str,
    published: usize,
    delivered: usize,
    via_any: usize,
    failed: usize,
}

impl DeliveryStatsInner {
    fn counts(&mut self, message: Message<'_>) -> &mut Counts {
        self.counts
            .entry(message.type_id())
            .or_insert_with(|| Counts {
                type_name: message.type_name(),
                ..Counts::default()
            })
    }
}

impl DeliveryStats {
    /// Create a new `DeliveryStats`.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T: Any>(&self, field: impl Fn(&Counts) -> usize) -> usize {
        self.inner
            .borrow()
            .counts
            .get(&TypeId::of::<T>())
            .map_or(0, field)
    }

    /// Number of publishes of `T`.
    pub fn published<T: Any>(&self) -> usize {
        self.read::<T>(|c| c.published)
    }

    /// Number of successful deliveries of `T`, all routes.
    pub fn delivered<T: Any>(&self) -> usize {
        self.read::<T>(|c| c.delivered)
    }

    /// Number of deliveries of `T` through the any-type capability.
    pub fn delivered_via_any<T: Any>(&self) -> usize {
        self.read::<T>(|c| c.via_any)
    }

    /// Number of failed deliveries of `T`.
    pub fn failed<T: Any>(&self) -> usize {
        self.read::<T>(|c| c.failed)
    }

    /// Names of every message type seen so far, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .inner
            .borrow()
            .counts
            .values()
            .map(|c| c.type_name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of subscriptions added and not yet removed since this monitor was registered.
    pub fn active_subscriptions(&self) -> usize {
        self.inner.borrow().active.len()
    }
}

impl Monitor for DeliveryStats {
    fn on_subscribed(&self, id: SubscriptionId, _sink: &str) {
        self.inner.borrow_mut().active.insert(id);
    }

    fn on_unsubscribed(&self, id: SubscriptionId, _sink: &str) {
        self.inner.borrow_mut().active.remove(&id);
    }

    fn on_published(&self, message: Message<'_>, _subscribers: usize) {
        self.inner.borrow_mut().counts(message).published += 1;
    }

    fn on_delivered(&self, message: Message<'_>, _id: SubscriptionId, route: Route) {
        let mut inner = self.inner.borrow_mut();
        let counts = inner.counts(message);
        counts.delivered += 1;
        if route == Route::Any {
            counts.via_any += 1;
        }
    }

    fn on_error(&self, message: Message<'_>, _id: SubscriptionId, _error: &Error) {
        self.inner.borrow_mut().counts(message).failed += 1;
    }
}

impl fmt::Debug for DeliveryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DeliveryStats")
            .field("types", &inner.counts.len())
            .field("active", &inner.active.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Router, Source, SourceExt, Subject};

    #[test]
    fn default_is_empty() {
        let stats = DeliveryStats::default();
        assert_eq!(stats.published::<u8>(), 0);
        assert_eq!(stats.active_subscriptions(), 0);
    }

    #[test]
    fn counts_routes_separately() {
        let subject = Subject::new();
        let stats = DeliveryStats::new();
        subject.monitors().add(stats.clone());

        let router = Router::new().on(|_: &u8| Ok(())).on_any(|_| Ok(()));
        let _router = subject.subscribe(std::rc::Rc::new(router));
        let _any = subject.subscribe_any_fn(|_| Ok(()));

        subject.publish(&1_u8).unwrap();
        subject.publish(&2_u16).unwrap();

        assert_eq!(stats.published::<u8>(), 1);
        assert_eq!(stats.delivered::<u8>(), 2);
        assert_eq!(stats.delivered_via_any::<u8>(), 1);
        assert_eq!(stats.delivered::<u16>(), 2);
        assert_eq!(stats.delivered_via_any::<u16>(), 2);
    }

    #[test]
    fn counts_failures_and_stops_counting_deliveries() {
        let subject = Subject::new();
        let stats = DeliveryStats::new();
        subject.monitors().add(stats.clone());

        let _failing = subject.subscribe_fn(|_: &i32| Err(Error::sink("nope")));
        let _after = subject.subscribe_fn(|_: &i32| Ok(()));

        assert!(subject.publish(&1).is_err());
        assert_eq!(stats.failed::<i32>(), 1);
        assert_eq!(stats.delivered::<i32>(), 0);
    }

    #[test]
    fn tracks_active_subscriptions() {
        let subject = Subject::new();
        let stats = DeliveryStats::new();
        subject.monitors().add(stats.clone());

        let a = subject.subscribe_any_fn(|_| Ok(()));
        let _b = subject.subscribe_any_fn(|_| Ok(()));
        assert_eq!(stats.active_subscriptions(), 2);

        a.dispose();
        assert_eq!(stats.active_subscriptions(), 1);
    }

    mod first {
        pub struct Event;
    }

    mod second {
        pub struct Event;
    }

    #[test]
    fn same_named_types_are_counted_apart() {
        let subject = Subject::new();
        let stats = DeliveryStats::new();
        subject.monitors().add(stats.clone());
        let _sub = subject.subscribe_any_fn(|_| Ok(()));

        subject.publish(&first::Event).unwrap();
        subject.publish(&first::Event).unwrap();
        subject.publish(&second::Event).unwrap();

        assert_eq!(stats.published::<first::Event>(), 2);
        assert_eq!(stats.published::<second::Event>(), 1);
        assert_eq!(stats.type_names().len(), 2);
    }
}
