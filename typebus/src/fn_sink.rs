use std::{
    any::{Any, TypeId},
    borrow::Cow,
    fmt,
    marker::PhantomData,
};

use crate::{Message, Result, Sink};

/// Sink with a single exact-type capability, backed by a closure.
///
/// Usually created through [`SourceExt::subscribe_fn`](crate::SourceExt::subscribe_fn).
/// Construct it directly when you need the `Rc` yourself, e.g. to subscribe
/// the same instance twice or to compare handles.
pub struct FnSink<T, F> {
    handler: F,
    _message: PhantomData<fn(&T)>,
}

impl<T, F> FnSink<T, F>
where
    T: Any,
    F: Fn(&T) -> Result,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _message: PhantomData,
        }
    }
}

impl<T, F> Sink for FnSink<T, F>
where
    T: Any,
    F: Fn(&T) -> Result,
{
    fn accepts(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<T>()
    }

    fn receive(&self, message: Message<'_>) -> Result {
        match message.downcast::<T>() {
            Some(value) => (self.handler)(value),
            None => Ok(()),
        }
    }

    fn label(&self) -> Cow<'static, str> {
        Cow::Owned(format!("fn({})", std::any::type_name::<T>()))
    }
}

impl<T, F> fmt::Debug for FnSink<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink")
            .field("message", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// Sink with only the any-type capability, backed by a closure.
pub struct AnyFnSink<F> {
    handler: F,
}

impl<F> AnyFnSink<F>
where
    F: Fn(Message<'_>) -> Result,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> Sink for AnyFnSink<F>
where
    F: Fn(Message<'_>) -> Result,
{
    fn accepts_any(&self) -> bool {
        true
    }

    fn receive_any(&self, message: Message<'_>) -> Result {
        (self.handler)(message)
    }

    fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed("fn(any)")
    }
}

impl<F> fmt::Debug for AnyFnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyFnSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::Route;

    #[test]
    fn fn_sink_accepts_only_its_type() {
        let sum = Cell::new(0);
        let sink = FnSink::new(|n: &i32| {
            sum.set(sum.get() + n);
            Ok(())
        });

        assert_eq!(Route::resolve(&sink, TypeId::of::<i32>()), Some(Route::Exact));
        assert_eq!(Route::resolve(&sink, TypeId::of::<i64>()), None);

        sink.receive(Message::new(&5_i32)).unwrap();
        assert_eq!(sum.get(), 5);
        assert_eq!(sink.label(), "fn(i32)");
    }

    #[test]
    fn any_fn_sink_sees_every_type() {
        let seen = Cell::new(0);
        let sink = AnyFnSink::new(|_m: Message<'_>| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        assert_eq!(Route::resolve(&sink, TypeId::of::<u8>()), Some(Route::Any));
        sink.receive_any(Message::new(&1_u8)).unwrap();
        sink.receive_any(Message::new(&"two")).unwrap();
        assert_eq!(seen.get(), 2);
    }
}
