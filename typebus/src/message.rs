use std::{
    any::{Any, TypeId},
    fmt,
};

/// A published value, viewed without its concrete type.
///
/// `Message` is what sinks receive. It borrows the publisher's value for the
/// duration of one [`Subject::publish`](crate::Subject::publish) call and
/// remembers the *static* type the value was published as. Routing is done
/// on that type only: publishing a `u8` never reaches a sink that accepts
/// `u32`, and publishing a `Box<dyn Any>` is routed as `Box<dyn Any>`.
///
/// `Message` is `Copy`; the bus never clones or stores the value itself.
/// Sinks that want to keep it must clone it out via [`downcast`](Self::downcast).
///
/// # Example
///
/// ```rust
/// use typebus::Message;
///
/// let value = 42_i32;
/// let message = Message::new(&value);
///
/// assert!(message.is::<i32>());
/// assert_eq!(message.downcast::<i32>(), Some(&42));
/// assert_eq!(message.downcast::<i64>(), None);
/// ```
#[derive(Clone, Copy)]
pub struct Message<'a> {
    value: &'a dyn Any,
    type_id: TypeId,
    type_name: &'static str,
}

impl<'a> Message<'a> {
    /// Wrap a reference to a value of static type `T`.
    pub fn new<T: Any>(value: &'a T) -> Self {
        Self {
            value,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The [`TypeId`] of the type this message was published as.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the type this message was published as, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the message was published as a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the value as a `T`, if that is its published type.
    pub fn downcast<T: Any>(&self) -> Option<&'a T> {
        if self.is::<T>() {
            self.value.downcast_ref::<T>()
        } else {
            None
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_on_static_type() {
        let boxed: Box<dyn Any> = Box::new(7_u8);
        let message = Message::new(&boxed);

        assert!(message.is::<Box<dyn Any>>());
        assert!(!message.is::<u8>());
        assert_eq!(message.downcast::<u8>(), None);
    }

    #[test]
    fn downcast_borrows_original_value() {
        let text = String::from("hello");
        let message = Message::new(&text);

        let borrowed = message.downcast::<String>().unwrap();
        assert!(std::ptr::eq(borrowed, &text));
        assert!(message.type_name().ends_with("String"));
    }

    #[test]
    fn debug_shows_type_name() {
        let message = Message::new(&1_u16);
        assert_eq!(format!("{message:?}"), "Message { type: \"u16\", .. }");
    }
}
