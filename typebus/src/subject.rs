use std::{
    any::Any,
    borrow::Cow,
    cell::Cell,
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    Config, Error, Message, Result, Route, Sink, Source, Subscription, SubscriptionId,
    internal::{Detach, Registry, sink_addr},
};

#[cfg(feature = "monitoring")]
use crate::monitoring::MonitorRegistry;

/// The message bus: a registry of sinks and the typed `publish` that feeds them.
///
/// # Delivery
///
/// [`publish`](Self::publish) takes a frozen view of the subscriber list and
/// visits every sink in it, in subscription order. For each sink:
///
/// 1. if it accepts the message's type exactly, [`Sink::receive`] is called;
/// 2. otherwise, if it accepts any type, [`Sink::receive_any`] is called;
/// 3. otherwise it is skipped.
///
/// A sink receives a message at most once per publish.
///
/// # Reentrancy
///
/// Sinks may subscribe, dispose handles (including their own) and publish
/// from inside their callbacks. Registry changes made while a publish is
/// running only affect publishes that start later: a sink removed mid-publish
/// still gets the current message, a sink added mid-publish does not.
///
/// # Failure
///
/// The first sink that returns an error stops the publish. Remaining sinks
/// are not called and the error is returned unchanged. There is no isolation
/// between sinks; catch errors inside the sink if you need it.
///
/// # Threads
///
/// `Subject` is `!Send` and `!Sync`. It is built for synchronous use on one
/// thread; `Clone` produces another handle to the same bus.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use typebus::{SourceExt, Subject};
///
/// let subject = Subject::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = seen.clone();
/// let _numbers = subject.subscribe_fn(move |n: &i32| {
///     log.borrow_mut().push(format!("int {n}"));
///     Ok(())
/// });
/// let log = seen.clone();
/// let _everything = subject.subscribe_any_fn(move |m| {
///     log.borrow_mut().push(format!("any {}", m.type_name()));
///     Ok(())
/// });
///
/// subject.publish(&7)?;
/// subject.publish(&true)?;
///
/// assert_eq!(*seen.borrow(), vec!["int 7", "any i32", "any bool"]);
/// # Ok::<(), typebus::Error>(())
/// ```
#[derive(Clone)]
pub struct Subject {
    inner: Rc<Inner>,
}

struct Inner {
    config: Config,
    registry: Registry<Rc<dyn Sink>>,
    depth: Cell<usize>,

    #[cfg(feature = "monitoring")]
    monitoring: MonitorRegistry,
}

impl Subject {
    /// Create a subject with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a subject with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let registry = Registry::with_capacity(config.initial_capacity());
        Self {
            inner: Rc::new(Inner {
                config,
                registry,
                depth: Cell::new(0),
                #[cfg(feature = "monitoring")]
                monitoring: MonitorRegistry::new(),
            }),
        }
    }

    /// Publish `message` to every interested subscriber.
    ///
    /// Routing uses the static type `T`. Delivery happens synchronously,
    /// before this call returns.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a sink, or
    /// [`Error::PublishDepthExceeded`] when called from inside delivery
    /// callbacks nested deeper than [`Config::max_publish_depth`].
    pub fn publish<T: Any>(&self, message: &T) -> Result {
        self.publish_message(Message::new(message))
    }

    /// Publish an already type-erased message.
    ///
    /// Routes on [`Message::type_id`], exactly like [`publish`](Self::publish)
    /// would for the original value.
    pub fn publish_message(&self, message: Message<'_>) -> Result {
        let inner = &self.inner;
        let limit = inner.config.max_publish_depth();
        if inner.depth.get() >= limit {
            tracing::warn!(
                subject = %inner.config.name(),
                message = %message.type_name(),
                limit,
                "publish depth exceeded"
            );
            return Err(Error::PublishDepthExceeded(limit));
        }
        let _depth = DepthGuard::enter(&inner.depth);

        let snapshot = inner.registry.snapshot();

        #[cfg(feature = "monitoring")]
        inner
            .monitoring
            .notify(|m| m.on_published(message, snapshot.len()));

        for entry in snapshot.iter() {
            let sink = entry.value.as_ref();
            let Some(route) = Route::resolve(sink, message.type_id()) else {
                continue;
            };
            let id = SubscriptionId::from(entry.id);

            tracing::trace!(
                subject = %inner.config.name(),
                subscription = %id,
                sink = %sink.label(),
                message = %message.type_name(),
                %route,
                "delivering message"
            );

            if let Err(error) = route.deliver(sink, message) {
                tracing::debug!(
                    subject = %inner.config.name(),
                    subscription = %id,
                    sink = %sink.label(),
                    message = %message.type_name(),
                    %error,
                    "sink failed, aborting publish"
                );
                #[cfg(feature = "monitoring")]
                inner.monitoring.notify(|m| m.on_error(message, id, &error));
                return Err(error);
            }

            #[cfg(feature = "monitoring")]
            inner
                .monitoring
                .notify(|m| m.on_delivered(message, id, route));
        }

        Ok(())
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// The configuration this subject was created with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Non-owning handle to this subject.
    ///
    /// Sinks that subscribe, dispose or publish from their own callbacks
    /// should capture a [`WeakSubject`] rather than a `Subject` clone. The
    /// registry owns its sinks, so a sink holding a `Subject` keeps the
    /// whole bus alive forever.
    pub fn downgrade(&self) -> WeakSubject {
        WeakSubject {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Monitors observing this subject.
    #[cfg(feature = "monitoring")]
    #[cfg_attr(docsrs, doc(cfg(feature = "monitoring")))]
    pub fn monitors(&self) -> &MonitorRegistry {
        &self.inner.monitoring
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Subject {
    fn subscribe(&self, sink: Rc<dyn Sink>) -> Subscription {
        let weak_sink = Rc::downgrade(&sink);
        let label = sink.label();
        let id = SubscriptionId::from(self.inner.registry.push(sink));

        tracing::trace!(
            subject = %self.inner.config.name(),
            subscription = %id,
            sink = %label,
            "subscribed"
        );
        #[cfg(feature = "monitoring")]
        self.inner.monitoring.notify(|m| m.on_subscribed(id, &label));

        let owner: Weak<Inner> = Rc::downgrade(&self.inner);
        let owner: Weak<dyn Detach> = owner;
        Subscription::new(id, owner, weak_sink)
    }
}

/// Weak handle to a [`Subject`], created with [`Subject::downgrade`].
///
/// Works like the subject while it is alive. Once every `Subject` handle is
/// gone, publishing is a no-op and subscribing returns an already disposed
/// [`Subscription`].
#[derive(Clone)]
pub struct WeakSubject {
    inner: Weak<Inner>,
}

impl WeakSubject {
    /// The subject, if it still exists.
    pub fn upgrade(&self) -> Option<Subject> {
        self.inner.upgrade().map(|inner| Subject { inner })
    }

    /// Publish through the subject if it still exists, otherwise do nothing.
    pub fn publish<T: Any>(&self, message: &T) -> Result {
        match self.upgrade() {
            Some(subject) => subject.publish(message),
            None => Ok(()),
        }
    }
}

impl Source for WeakSubject {
    fn subscribe(&self, sink: Rc<dyn Sink>) -> Subscription {
        match self.upgrade() {
            Some(subject) => subject.subscribe(sink),
            None => {
                let owner: Weak<dyn Detach> = self.inner.clone();
                let subscription =
                    Subscription::new(SubscriptionId::from(0), owner, Rc::downgrade(&sink));
                subscription.dispose();
                subscription
            }
        }
    }
}

impl fmt::Debug for WeakSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSubject")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Detach for Inner {
    fn detach(&self, sink: &Weak<dyn Sink>, id: SubscriptionId) {
        let target = sink_addr(sink.as_ptr());
        let removed = self
            .registry
            .remove_first(|entry| sink_addr(Rc::as_ptr(&entry.value)) == target);

        let Some(removed) = removed else {
            tracing::trace!(
                subject = %self.config.name(),
                subscription = %id,
                "dispose found no matching sink"
            );
            return;
        };

        let removed_id = SubscriptionId::from(removed.id);
        let label = removed.value.label();
        tracing::trace!(
            subject = %self.config.name(),
            subscription = %removed_id,
            sink = %label,
            "unsubscribed"
        );
        #[cfg(feature = "monitoring")]
        self.monitoring
            .notify(|m| m.on_unsubscribed(removed_id, &label));
    }
}

/// A subject is itself a sink: subscribed to another subject, it republishes
/// every message it receives to its own subscribers.
impl Sink for Subject {
    fn accepts_any(&self) -> bool {
        true
    }

    fn receive_any(&self, message: Message<'_>) -> Result {
        self.publish_message(message)
    }

    fn label(&self) -> Cow<'static, str> {
        Cow::Owned(self.inner.config.name().to_string())
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("name", &self.inner.config.name())
            .field("subscribers", &self.inner.registry.len())
            .field("depth", &self.inner.depth.get())
            .finish()
    }
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        DepthGuard(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
