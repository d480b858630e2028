mod registry;

pub(crate) use registry::Registry;

use std::rc::Weak;

use crate::{Sink, SubscriptionId};

/// Removal side of a [`Source`](crate::Source), called by
/// [`Subscription::dispose`](crate::Subscription::dispose).
pub(crate) trait Detach {
    /// Remove the first registered occurrence of `sink`.
    ///
    /// `id` is the entry the handle was created for; it is informational,
    /// removal matches on sink identity.
    fn detach(&self, sink: &Weak<dyn Sink>, id: SubscriptionId);
}

/// Address of a sink allocation, stripped of vtable metadata.
///
/// Two trait objects for the same allocation may carry different vtable
/// pointers, so identity compares the data address only.
#[inline]
pub(crate) fn sink_addr(sink: *const dyn Sink) -> *const () {
    sink as *const ()
}
