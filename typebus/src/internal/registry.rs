use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// Registered item together with the id it was registered under.
#[derive(Clone)]
pub(crate) struct Entry<T> {
    pub(crate) id: u64,
    pub(crate) value: T,
}

/// Ordered, copy-on-write list of registered items.
///
/// The current list lives behind an `Rc`. [`snapshot`](Self::snapshot) hands
/// out a clone of that `Rc`; mutations go through `Rc::make_mut`, which edits
/// in place only while no snapshot is alive and otherwise writes a fresh list.
/// A snapshot therefore never changes, whatever happens to the registry while
/// it is being iterated.
///
/// No `RefCell` borrow outlives a method call, so items may call back into
/// the registry while a caller iterates a snapshot.
pub(crate) struct Registry<T> {
    current: RefCell<Rc<Vec<Entry<T>>>>,
    last_id: Cell<u64>,
}

impl<T: Clone> Registry<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: RefCell::new(Rc::new(Vec::with_capacity(capacity))),
            last_id: Cell::new(0),
        }
    }

    /// Frozen view of the list as it is right now.
    pub fn snapshot(&self) -> Rc<Vec<Entry<T>>> {
        Rc::clone(&self.current.borrow())
    }

    /// Append `value` and return the id it was registered under.
    pub fn push(&self, value: T) -> u64 {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        let mut current = self.current.borrow_mut();
        Rc::make_mut(&mut *current).push(Entry { id, value });
        id
    }

    /// Remove the first entry matching `predicate`.
    ///
    /// The removed entry is returned rather than dropped here, so whatever
    /// its drop does runs after the registry borrow is released.
    pub fn remove_first(&self, predicate: impl FnMut(&Entry<T>) -> bool) -> Option<Entry<T>> {
        let mut current = self.current.borrow_mut();
        let index = current.iter().position(predicate)?;
        Some(Rc::make_mut(&mut *current).remove(index))
    }

    pub fn remove_id(&self, id: u64) -> Option<Entry<T>> {
        self.remove_first(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.current.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.borrow().is_empty()
    }
}
