use crate::{Error, Message, Route, SubscriptionId, monitoring::Monitor};

/// A monitor that logs message flow to the `tracing` crate.
///
/// Provides visibility into routing without custom code. Log levels:
/// - `trace` - message published/delivered (high volume)
/// - `debug` - subscription added/removed
/// - `warn` - sink errors
///
/// # Example
///
/// ```ignore
/// use typebus::monitors::Tracer;
///
/// subject.monitors().add(Tracer);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer;

impl Monitor for Tracer {
    fn on_subscribed(&self, id: SubscriptionId, sink: &str) {
        tracing::debug!(
            subscription = %id,
            sink = %sink,
            "sink subscribed"
        );
    }

    fn on_unsubscribed(&self, id: SubscriptionId, sink: &str) {
        tracing::debug!(
            subscription = %id,
            sink = %sink,
            "sink unsubscribed"
        );
    }

    fn on_published(&self, message: Message<'_>, subscribers: usize) {
        tracing::trace!(
            message = %message.type_name(),
            subscribers,
            "message published"
        );
    }

    fn on_delivered(&self, message: Message<'_>, id: SubscriptionId, route: Route) {
        tracing::trace!(
            message = %message.type_name(),
            subscription = %id,
            route = %route,
            "message delivered"
        );
    }

    fn on_error(&self, message: Message<'_>, id: SubscriptionId, error: &Error) {
        tracing::warn!(
            message = %message.type_name(),
            subscription = %id,
            error = %error,
            "sink error"
        );
    }
}
