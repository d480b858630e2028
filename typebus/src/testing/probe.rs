use std::{
    any::{Any, TypeId},
    borrow::Cow,
    cell::RefCell,
    fmt,
    rc::Rc,
};

use crate::{Message, Result, Sink};

/// Sink with an exact-type capability for `T` that records what it receives.
///
/// Every received message is cloned into the probe. Clones of a probe share
/// the same record, so keep one and subscribe another.
pub struct Probe<T> {
    received: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone + Any> Probe<T> {
    pub fn new() -> Self {
        Self {
            received: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Copies of every message received so far, in delivery order.
    pub fn received(&self) -> Vec<T> {
        self.received.borrow().clone()
    }

    /// Number of messages received so far.
    pub fn count(&self) -> usize {
        self.received.borrow().len()
    }

    /// The most recently received message.
    pub fn last(&self) -> Option<T> {
        self.received.borrow().last().cloned()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.received.borrow_mut().clear();
    }
}

impl<T: Clone + Any> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Probe<T> {
    fn clone(&self) -> Self {
        Self {
            received: self.received.clone(),
        }
    }
}

impl<T: Clone + Any> Sink for Probe<T> {
    fn accepts(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<T>()
    }

    fn receive(&self, message: Message<'_>) -> Result {
        if let Some(value) = message.downcast::<T>() {
            self.received.borrow_mut().push(value.clone());
        }
        Ok(())
    }

    fn label(&self) -> Cow<'static, str> {
        Cow::Owned(format!("probe({})", std::any::type_name::<T>()))
    }
}

impl<T> fmt::Debug for Probe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("message", &std::any::type_name::<T>())
            .field("received", &self.received.borrow().len())
            .finish()
    }
}
