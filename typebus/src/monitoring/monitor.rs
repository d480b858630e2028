use crate::{Error, Message, Route, SubscriptionId};

/// Trait for observing message flow through a [`Subject`](crate::Subject).
///
/// All methods have default no-op implementations, so you only need to
/// override the ones you care about.
///
/// # Message Lifecycle
///
/// For one `publish` call:
/// 1. **Published** - fires once, before any sink runs, with the number of
///    subscribers in the frozen view
/// 2. **Delivered** - fires after each sink accepted the message
/// 3. **Error** - fires instead of `Delivered` when a sink fails; the publish
///    stops there
///
/// Sinks without a matching capability are skipped silently.
pub trait Monitor {
    /// Called after a sink has been added to the registry.
    fn on_subscribed(&self, id: SubscriptionId, sink: &str) {
        let _i = id;
        let _s = sink;
    }

    /// Called after a sink has been removed from the registry.
    ///
    /// `id` is the id of the entry actually removed, which can differ from
    /// the disposing handle's id when one sink is subscribed several times.
    fn on_unsubscribed(&self, id: SubscriptionId, sink: &str) {
        let _i = id;
        let _s = sink;
    }

    /// Called when a publish starts.
    fn on_published(&self, message: Message<'_>, subscribers: usize) {
        let _m = message;
        let _s = subscribers;
    }

    /// Called after a sink successfully handled a message.
    fn on_delivered(&self, message: Message<'_>, id: SubscriptionId, route: Route) {
        let _m = message;
        let _i = id;
        let _r = route;
    }

    /// Called when a sink returned an error.
    fn on_error(&self, message: Message<'_>, id: SubscriptionId, error: &Error) {
        let _m = message;
        let _i = id;
        let _e = error;
    }
}
