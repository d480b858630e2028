use std::{any::TypeId, borrow::Cow, cell::RefCell, fmt, rc::Rc};

use crate::{Error, Message, Result, Route, Sink};

/// One delivery recorded by a [`Journal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Name of the journal sink that received the message.
    pub sink: String,
    /// Type name of the delivered message.
    pub message: &'static str,
    /// Capability the message arrived through.
    pub route: Route,
}

/// Shared, ordered log of deliveries across many sinks.
///
/// Create sinks with [`sink`](Self::sink), [`typed_sink`](Self::typed_sink)
/// or [`failing_sink`](Self::failing_sink); all of them append to the same
/// journal, which makes cross-sink ordering easy to assert.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<JournalEntry>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink with only the any-type capability.
    pub fn sink(&self, name: impl Into<String>) -> Rc<JournalSink> {
        self.make_sink(name, None, true, None)
    }

    /// Sink with only an exact-type capability for `T`.
    pub fn typed_sink<T: 'static>(&self, name: impl Into<String>) -> Rc<JournalSink> {
        self.make_sink(name, Some(TypeId::of::<T>()), false, None)
    }

    /// Any-type sink that records the delivery, then fails with `error`.
    pub fn failing_sink(&self, name: impl Into<String>, error: Error) -> Rc<JournalSink> {
        self.make_sink(name, None, true, Some(error))
    }

    fn make_sink(
        &self,
        name: impl Into<String>,
        exact: Option<TypeId>,
        any: bool,
        error: Option<Error>,
    ) -> Rc<JournalSink> {
        Rc::new(JournalSink {
            name: name.into(),
            exact,
            any,
            error,
            journal: self.clone(),
        })
    }

    /// All deliveries so far, in order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    /// Names of the sinks that received something, in delivery order.
    pub fn sinks(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|e| e.sink.clone()).collect()
    }

    /// Number of deliveries recorded.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget every recorded delivery.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn record(&self, sink: &str, message: Message<'_>, route: Route) {
        self.entries.borrow_mut().push(JournalEntry {
            sink: sink.to_string(),
            message: message.type_name(),
            route,
        });
    }
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Journal")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}

/// Sink created by a [`Journal`].
pub struct JournalSink {
    name: String,
    exact: Option<TypeId>,
    any: bool,
    error: Option<Error>,
    journal: Journal,
}

impl JournalSink {
    fn finish(&self, message: Message<'_>, route: Route) -> Result {
        self.journal.record(&self.name, message, route);
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Sink for JournalSink {
    fn accepts(&self, type_id: TypeId) -> bool {
        self.exact == Some(type_id)
    }

    fn receive(&self, message: Message<'_>) -> Result {
        self.finish(message, Route::Exact)
    }

    fn accepts_any(&self) -> bool {
        self.any
    }

    fn receive_any(&self, message: Message<'_>) -> Result {
        self.finish(message, Route::Any)
    }

    fn label(&self) -> Cow<'static, str> {
        Cow::Owned(self.name.clone())
    }
}

impl fmt::Debug for JournalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JournalSink")
            .field("name", &self.name)
            .field("any", &self.any)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Source, Subject};

    #[test]
    fn records_sink_message_and_route() {
        let subject = Subject::new();
        let journal = Journal::new();
        subject.subscribe(journal.typed_sink::<u8>("bytes"));
        subject.subscribe(journal.sink("all"));

        subject.publish(&1_u8).unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                JournalEntry {
                    sink: "bytes".into(),
                    message: "u8",
                    route: Route::Exact,
                },
                JournalEntry {
                    sink: "all".into(),
                    message: "u8",
                    route: Route::Any,
                },
            ]
        );
    }

    #[test]
    fn failing_sink_records_then_fails() {
        let subject = Subject::new();
        let journal = Journal::new();
        subject.subscribe(journal.failing_sink("bad", Error::sink("x")));
        subject.subscribe(journal.sink("after"));

        assert_eq!(subject.publish(&()), Err(Error::sink("x")));
        assert_eq!(journal.sinks(), vec!["bad"]);
        assert_eq!(journal.len(), 1);

        journal.clear();
        assert!(journal.is_empty());
    }
}
