use std::{any::Any, rc::Rc};

use crate::{AnyFnSink, FnSink, Message, Result, Sink, Subscription};

/// Subscription side of a message bus.
///
/// Implemented by [`Subject`](crate::Subject). Anything that can hand out
/// [`Subscription`]s for sinks can implement it, which lets code that only
/// listens depend on `&impl Source` instead of a concrete bus.
pub trait Source {
    /// Register `sink` and return the handle that unregisters it.
    ///
    /// The sink is appended after every existing subscriber and sees every
    /// publish that starts after this call returns. Subscribing from inside
    /// a delivery callback does not add the sink to the publish that is
    /// currently running.
    ///
    /// The same sink may be subscribed several times; each subscription is
    /// an independent entry with its own handle and its own deliveries.
    fn subscribe(&self, sink: Rc<dyn Sink>) -> Subscription;
}

impl<S: Source + ?Sized> Source for &S {
    fn subscribe(&self, sink: Rc<dyn Sink>) -> Subscription {
        (**self).subscribe(sink)
    }
}

impl<S: Source + ?Sized> Source for Rc<S> {
    fn subscribe(&self, sink: Rc<dyn Sink>) -> Subscription {
        (**self).subscribe(sink)
    }
}

/// Closure shortcuts available on every [`Source`].
pub trait SourceExt: Source {
    /// Subscribe a closure for messages of exactly type `T`.
    ///
    /// ```rust
    /// use typebus::{SourceExt, Subject};
    ///
    /// let subject = Subject::new();
    /// let _sub = subject.subscribe_fn(|name: &String| {
    ///     println!("hello, {name}");
    ///     Ok(())
    /// });
    /// subject.publish(&"world".to_string())?;
    /// # Ok::<(), typebus::Error>(())
    /// ```
    fn subscribe_fn<T, F>(&self, handler: F) -> Subscription
    where
        T: Any,
        F: Fn(&T) -> Result + 'static,
    {
        self.subscribe(Rc::new(FnSink::new(handler)))
    }

    /// Subscribe a closure for messages of every type.
    fn subscribe_any_fn<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Message<'_>) -> Result + 'static,
    {
        self.subscribe(Rc::new(AnyFnSink::new(handler)))
    }
}

impl<S: Source + ?Sized> SourceExt for S {}
