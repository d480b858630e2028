//! Ready-to-use monitor implementations.
//!
//! This module contains concrete [`Monitor`](crate::monitoring::Monitor) implementations
//! for common use cases like logging and delivery accounting.
//!
//! # Available Monitors
//!
//! - [`Tracer`] - Logs message flow via `tracing` crate
//! - [`DeliveryStats`] - Counts publishes, deliveries and failures per message type
//!
//! # Example
//!
//! ```rust
//! use typebus::{Subject, monitors::Tracer};
//!
//! let subject = Subject::new();
//! subject.monitors().add(Tracer);
//! ```

mod tracer;
pub use tracer::Tracer;

mod delivery_stats;
pub use delivery_stats::DeliveryStats;
