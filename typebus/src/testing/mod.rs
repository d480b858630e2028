//! Test helpers for observing and asserting on message flow.
//!
//! Enable with the `test-harness` feature:
//!
//! ```toml
//! [dev-dependencies]
//! typebus = { version = "0.1", features = ["test-harness"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use typebus::{Source, Subject};
//! use typebus::testing::{Journal, Probe};
//!
//! let subject = Subject::new();
//! let numbers = Probe::<i32>::new();
//! let journal = Journal::new();
//!
//! subject.subscribe(Rc::new(numbers.clone()));
//! subject.subscribe(journal.sink("audit"));
//!
//! subject.publish(&1)?;
//! subject.publish(&"hi")?;
//!
//! assert_eq!(numbers.received(), vec![1]);
//! assert_eq!(journal.sinks(), vec!["audit", "audit"]);
//! # Ok::<(), typebus::Error>(())
//! ```
//!
//! # Note
//!
//! Probes and journals use `Rc` internally and are `!Send`, like the subject
//! they observe.

mod journal;
mod probe;

pub use journal::{Journal, JournalEntry, JournalSink};
pub use probe::Probe;
