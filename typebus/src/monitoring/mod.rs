//! Monitoring API for observing message flow through a subject.
//!
//! Enabled by the `monitoring` feature (on by default):
//!
//! ```toml
//! [dependencies]
//! typebus = { version = "0.1", features = ["monitoring"] }
//! ```
//!
//! # Overview
//!
//! Monitors are notified synchronously, on the publisher's call stack, about:
//! - Subscriptions being added and removed
//! - Each publish, each delivery, and each failed delivery
//!
//! Monitors observe; they cannot change routing or stop a publish. A monitor
//! that panics is removed and the panic is logged, the publish continues.
//!
//! # Example
//!
//! ```rust
//! use typebus::{Message, Route, Subject, SubscriptionId};
//! use typebus::monitoring::Monitor;
//!
//! struct DeliveryLogger;
//!
//! impl Monitor for DeliveryLogger {
//!     fn on_delivered(&self, message: Message<'_>, id: SubscriptionId, route: Route) {
//!         println!("[delivered] {} to {id} via {route}", message.type_name());
//!     }
//! }
//!
//! let subject = Subject::new();
//! let monitor_id = subject.monitors().add(DeliveryLogger);
//! subject.monitors().remove(monitor_id);
//! ```

mod monitor;
mod registry;

/// Unique identifier for a registered monitor.
pub type MonitorId = u64;

pub use monitor::Monitor;
pub use registry::MonitorRegistry;
