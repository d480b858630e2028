use std::{
    any::{Any, TypeId},
    borrow::Cow,
    collections::HashMap,
    fmt,
};

use crate::{Message, Result, Sink};

type Handler = Box<dyn Fn(Message<'_>) -> Result>;

/// Routing adapter: many handlers behind one subscription.
///
/// A `Router` keeps a table from message type to an ordered list of
/// handlers, plus an ordered list of catch-all handlers. Subscribed as a
/// [`Sink`], it presents:
///
/// - an exact-type capability for every type registered with [`on`](Self::on),
///   running all of that type's handlers in registration order;
/// - the any-type capability if at least one [`on_any`](Self::on_any) handler
///   exists, running all catch-all handlers in registration order.
///
/// Catch-all handlers never see a message that has a typed handler; the
/// subject delivers through the exact-type capability in that case.
/// Handlers stop at the first error, which is returned to the publisher.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use typebus::{Router, Source, Subject};
///
/// #[derive(Debug)]
/// struct Saved { path: String }
/// #[derive(Debug)]
/// struct Closed;
///
/// let router = Router::new()
///     .with_label("editor")
///     .on(|e: &Saved| { println!("saved {}", e.path); Ok(()) })
///     .on(|_: &Closed| { println!("closed"); Ok(()) })
///     .on_any(|m| { println!("ignored {}", m.type_name()); Ok(()) });
///
/// let subject = Subject::new();
/// let _sub = subject.subscribe(Rc::new(router));
///
/// subject.publish(&Saved { path: "a.txt".into() })?;
/// subject.publish(&Closed)?;
/// subject.publish(&42_u32)?; // reaches the catch-all handler
/// # Ok::<(), typebus::Error>(())
/// ```
#[derive(Default)]
pub struct Router {
    label: Option<Cow<'static, str>>,
    typed: HashMap<TypeId, Vec<Handler>>,
    fallback: Vec<Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name reported by [`Sink::label`].
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a handler for messages of exactly type `T`.
    ///
    /// Several handlers may be added for the same type; they run in the
    /// order they were added.
    pub fn on<T, F>(mut self, handler: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result + 'static,
    {
        let handler: Handler = Box::new(move |message: Message<'_>| match message.downcast::<T>() {
            Some(value) => handler(value),
            None => Ok(()),
        });
        self.typed.entry(TypeId::of::<T>()).or_default().push(handler);
        self
    }

    /// Add a handler for messages that no typed handler matches.
    pub fn on_any<F>(mut self, handler: F) -> Self
    where
        F: Fn(Message<'_>) -> Result + 'static,
    {
        self.fallback.push(Box::new(handler));
        self
    }

    /// Returns `true` if at least one typed handler exists for `T`.
    pub fn handles<T: Any>(&self) -> bool {
        self.typed.contains_key(&TypeId::of::<T>())
    }

    /// Total number of handlers, typed and catch-all.
    pub fn handler_count(&self) -> usize {
        self.typed.values().map(Vec::len).sum::<usize>() + self.fallback.len()
    }
}

impl Sink for Router {
    fn accepts(&self, type_id: TypeId) -> bool {
        self.typed.contains_key(&type_id)
    }

    fn receive(&self, message: Message<'_>) -> Result {
        if let Some(handlers) = self.typed.get(&message.type_id()) {
            for handler in handlers {
                handler(message)?;
            }
        }
        Ok(())
    }

    fn accepts_any(&self) -> bool {
        !self.fallback.is_empty()
    }

    fn receive_any(&self, message: Message<'_>) -> Result {
        for handler in &self.fallback {
            handler(message)?;
        }
        Ok(())
    }

    fn label(&self) -> Cow<'static, str> {
        self.label.clone().unwrap_or(Cow::Borrowed("router"))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("label", &self.label)
            .field("types", &self.typed.len())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{Error, Route};

    fn log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Rc<RefCell<Vec<String>>>, entry: impl Into<String>) -> Result {
        log.borrow_mut().push(entry.into());
        Ok(())
    }

    #[test]
    fn typed_handlers_run_in_declaration_order() {
        let calls = log();
        let (a, b) = (calls.clone(), calls.clone());
        let router = Router::new()
            .on(move |n: &i32| push(&a, format!("first {n}")))
            .on(move |n: &i32| push(&b, format!("second {n}")));

        assert!(router.accepts(TypeId::of::<i32>()));
        router.receive(Message::new(&3_i32)).unwrap();
        assert_eq!(*calls.borrow(), vec!["first 3", "second 3"]);
    }

    #[test]
    fn any_handlers_only_present_when_registered() {
        let typed_only = Router::new().on(|_: &u8| Ok(()));
        assert!(!typed_only.accepts_any());
        assert_eq!(Route::resolve(&typed_only, TypeId::of::<u16>()), None);

        let with_fallback = typed_only.on_any(|_| Ok(()));
        assert!(with_fallback.accepts_any());
        assert_eq!(
            Route::resolve(&with_fallback, TypeId::of::<u8>()),
            Some(Route::Exact)
        );
        assert_eq!(
            Route::resolve(&with_fallback, TypeId::of::<u16>()),
            Some(Route::Any)
        );
    }

    #[test]
    fn all_any_handlers_run_in_order() {
        let calls = log();
        let (a, b) = (calls.clone(), calls.clone());
        let router = Router::new()
            .on_any(move |m| push(&a, format!("a:{}", m.type_name())))
            .on_any(move |m| push(&b, format!("b:{}", m.type_name())));

        router.receive_any(Message::new(&true)).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:bool", "b:bool"]);
    }

    #[test]
    fn handler_error_stops_remaining_handlers() {
        let calls = log();
        let after = calls.clone();
        let router = Router::new()
            .on(|_: &i32| Err(Error::sink("rejected")))
            .on(move |_: &i32| push(&after, "unreachable"));

        let result = router.receive(Message::new(&1_i32));
        assert_eq!(result, Err(Error::sink("rejected")));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn introspection() {
        let router = Router::new()
            .with_label("ui")
            .on(|_: &i32| Ok(()))
            .on(|_: &i32| Ok(()))
            .on(|_: &String| Ok(()))
            .on_any(|_| Ok(()));

        assert!(router.handles::<i32>());
        assert!(router.handles::<String>());
        assert!(!router.handles::<u64>());
        assert_eq!(router.handler_count(), 4);
        assert_eq!(router.label(), "ui");
        assert_eq!(Router::new().label(), "router");
    }
}
