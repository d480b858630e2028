use std::{any::TypeId, borrow::Cow, fmt, rc::Rc};

use crate::{Message, Result};

/// A receiver of published messages.
///
/// A sink presents up to two kinds of capability:
///
/// - **Exact-type**: [`accepts`](Self::accepts) returns `true` for every
///   type the sink has a dedicated handler for, and [`receive`](Self::receive)
///   is called with messages of those types.
/// - **Any-type**: [`accepts_any`](Self::accepts_any) returns `true` and
///   [`receive_any`](Self::receive_any) is called with messages of every
///   type the sink does *not* accept exactly.
///
/// A sink gets at most one call per publish: exact-type wins, any-type is
/// the fallback (see [`Route`]). All methods default to "no capability", so
/// implement only what you need. A sink with no capability can still be
/// subscribed; it is simply never called.
///
/// Most code does not implement `Sink` by hand. Use a [`Router`](crate::Router)
/// to collect several handlers behind one subscription, or the closure
/// helpers on [`SourceExt`](crate::SourceExt).
///
/// # Example
///
/// ```rust
/// use std::any::TypeId;
/// use typebus::{Message, Result, Sink};
///
/// struct Printer;
///
/// impl Sink for Printer {
///     fn accepts(&self, type_id: TypeId) -> bool {
///         type_id == TypeId::of::<String>()
///     }
///
///     fn receive(&self, message: Message<'_>) -> Result {
///         if let Some(text) = message.downcast::<String>() {
///             println!("text: {text}");
///         }
///         Ok(())
///     }
///
///     fn accepts_any(&self) -> bool {
///         true
///     }
///
///     fn receive_any(&self, message: Message<'_>) -> Result {
///         println!("something else: {}", message.type_name());
///         Ok(())
///     }
/// }
/// ```
pub trait Sink {
    /// Returns `true` if this sink has an exact-type capability for `type_id`.
    fn accepts(&self, type_id: TypeId) -> bool {
        let _t = type_id;
        false
    }

    /// Deliver a message through the exact-type capability.
    ///
    /// Only called when [`accepts`](Self::accepts) returned `true` for the
    /// message's type. An error aborts the publish and reaches the publisher.
    fn receive(&self, message: Message<'_>) -> Result {
        let _m = message;
        Ok(())
    }

    /// Returns `true` if this sink has the any-type capability.
    fn accepts_any(&self) -> bool {
        false
    }

    /// Deliver a message through the any-type capability.
    ///
    /// Only called for messages whose type [`accepts`](Self::accepts) rejected.
    fn receive_any(&self, message: Message<'_>) -> Result {
        let _m = message;
        Ok(())
    }

    /// Human-readable name for diagnostics. Defaults to the Rust type name.
    fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl<S: Sink + ?Sized> Sink for Rc<S> {
    fn accepts(&self, type_id: TypeId) -> bool {
        (**self).accepts(type_id)
    }

    fn receive(&self, message: Message<'_>) -> Result {
        (**self).receive(message)
    }

    fn accepts_any(&self) -> bool {
        (**self).accepts_any()
    }

    fn receive_any(&self, message: Message<'_>) -> Result {
        (**self).receive_any(message)
    }

    fn label(&self) -> Cow<'static, str> {
        (**self).label()
    }
}

/// Which capability a message is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The sink accepts the message's type exactly.
    Exact,
    /// The sink has no exact-type capability for the message but accepts any type.
    Any,
}

impl Route {
    /// Decide how `sink` should receive a message of type `type_id`.
    ///
    /// Exact-type capability takes precedence; the any-type capability is
    /// only consulted when there is no exact match. Returns `None` when the
    /// sink should be skipped.
    pub fn resolve(sink: &dyn Sink, type_id: TypeId) -> Option<Route> {
        if sink.accepts(type_id) {
            Some(Route::Exact)
        } else if sink.accepts_any() {
            Some(Route::Any)
        } else {
            None
        }
    }

    /// Invoke the capability this route names.
    pub fn deliver(self, sink: &dyn Sink, message: Message<'_>) -> Result {
        match self {
            Route::Exact => sink.receive(message),
            Route::Any => sink.receive_any(message),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Exact => write!(f, "exact"),
            Route::Any => write!(f, "any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Deaf;
    impl Sink for Deaf {}

    #[derive(Default)]
    struct Both {
        calls: RefCell<Vec<Route>>,
    }

    impl Sink for Both {
        fn accepts(&self, type_id: TypeId) -> bool {
            type_id == TypeId::of::<i32>()
        }

        fn receive(&self, _message: Message<'_>) -> Result {
            self.calls.borrow_mut().push(Route::Exact);
            Ok(())
        }

        fn accepts_any(&self) -> bool {
            true
        }

        fn receive_any(&self, _message: Message<'_>) -> Result {
            self.calls.borrow_mut().push(Route::Any);
            Ok(())
        }
    }

    #[test]
    fn sink_without_capabilities_is_skipped() {
        assert_eq!(Route::resolve(&Deaf, TypeId::of::<i32>()), None);
    }

    #[test]
    fn exact_capability_wins_over_any() {
        let sink = Both::default();
        assert_eq!(Route::resolve(&sink, TypeId::of::<i32>()), Some(Route::Exact));
        assert_eq!(Route::resolve(&sink, TypeId::of::<&str>()), Some(Route::Any));
    }

    #[test]
    fn deliver_calls_only_the_resolved_capability() {
        let sink = Both::default();
        Route::Exact.deliver(&sink, Message::new(&1_i32)).unwrap();
        Route::Any.deliver(&sink, Message::new(&"x")).unwrap();
        assert_eq!(*sink.calls.borrow(), vec![Route::Exact, Route::Any]);
    }

    #[test]
    fn default_label_is_type_name() {
        assert!(Deaf.label().ends_with("Deaf"));
        let shared: Rc<dyn Sink> = Rc::new(Deaf);
        assert!(shared.label().ends_with("Deaf"));
    }
}
