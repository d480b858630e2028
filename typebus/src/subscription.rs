use std::{cell::Cell, fmt, rc::Weak};

use crate::{Sink, SubscriptionId, internal::Detach};

/// Handle to one active subscription.
///
/// Returned by [`Source::subscribe`](crate::Source::subscribe). Calling
/// [`dispose`](Self::dispose) removes the sink from the subject's registry.
/// Disposal only affects publishes that start afterwards: a publish that is
/// already running (for example the one whose callback is disposing) still
/// delivers to every sink it saw when it started.
///
/// Dropping a `Subscription` does **not** unsubscribe; convert it with
/// [`into_guard`](Self::into_guard) for drop-to-dispose behavior.
///
/// The handle holds only weak references to the subject and the sink, so a
/// sink may keep its own handle without creating a reference cycle.
///
/// # Example
///
/// ```rust
/// use typebus::{SourceExt, Subject};
///
/// let subject = Subject::new();
/// let subscription = subject.subscribe_fn(|n: &i32| {
///     println!("got {n}");
///     Ok(())
/// });
///
/// subject.publish(&1)?;
/// subscription.dispose();
/// subscription.dispose(); // second call is a no-op
/// subject.publish(&2)?; // nobody listening
/// # Ok::<(), typebus::Error>(())
/// ```
pub struct Subscription {
    id: SubscriptionId,
    owner: Weak<dyn Detach>,
    sink: Weak<dyn Sink>,
    disposed: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, owner: Weak<dyn Detach>, sink: Weak<dyn Sink>) -> Self {
        Self {
            id,
            owner,
            sink,
            disposed: Cell::new(false),
        }
    }

    /// Id of the registry entry this handle was created for.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the sink from the subject.
    ///
    /// Removes the first registry entry holding this exact sink instance.
    /// Only the first call has an effect; later calls never touch the
    /// registry, even if the same sink was subscribed again in between.
    /// If the subject no longer exists this does nothing.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(&self.sink, self.id);
        }
    }

    /// Returns `true` once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Turn this handle into a guard that disposes when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}

/// A [`Subscription`] that disposes itself when dropped.
#[derive(Debug)]
#[must_use = "dropping the guard disposes the subscription immediately"]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
    /// The guarded subscription.
    pub fn subscription(&self) -> &Subscription {
        &self.0
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    struct Noop;
    impl Sink for Noop {}

    #[derive(Default)]
    struct Owner {
        detached: RefCell<Vec<SubscriptionId>>,
    }

    impl Detach for Owner {
        fn detach(&self, _sink: &Weak<dyn Sink>, id: SubscriptionId) {
            self.detached.borrow_mut().push(id);
        }
    }

    fn handle(owner: &Rc<Owner>, sink: &Rc<Noop>, id: u64) -> Subscription {
        let owner: Rc<dyn Detach> = owner.clone();
        let sink: Rc<dyn Sink> = sink.clone();
        Subscription::new(id.into(), Rc::downgrade(&owner), Rc::downgrade(&sink))
    }

    #[test]
    fn dispose_detaches_once() {
        let owner = Rc::new(Owner::default());
        let sink = Rc::new(Noop);
        let subscription = handle(&owner, &sink, 7);

        subscription.dispose();
        subscription.dispose();

        assert!(subscription.is_disposed());
        assert_eq!(*owner.detached.borrow(), vec![SubscriptionId::from(7)]);
    }

    #[test]
    fn dispose_after_owner_dropped_is_noop() {
        let owner = Rc::new(Owner::default());
        let sink = Rc::new(Noop);
        let subscription = handle(&owner, &sink, 1);
        drop(owner);

        subscription.dispose();
        assert!(subscription.is_disposed());
    }

    #[test]
    fn guard_disposes_on_drop() {
        let owner = Rc::new(Owner::default());
        let sink = Rc::new(Noop);
        let guard = handle(&owner, &sink, 3).into_guard();
        assert!(!guard.subscription().is_disposed());

        drop(guard);
        assert_eq!(*owner.detached.borrow(), vec![SubscriptionId::from(3)]);
    }
}
