#![cfg_attr(docsrs, feature(doc_cfg))]
//! # typebus
//!
//! A typed, in-process publish/subscribe bus.
//!
//! Publishers emit a value of any type; every subscribed sink that accepts
//! that exact type, or accepts any type, receives it synchronously, in
//! subscription order. Sinks may subscribe, unsubscribe and publish from
//! inside their own callbacks without disturbing the delivery in progress.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use typebus::*;
//!
//! #[derive(Debug)]
//! struct Greeting(String);
//!
//! let subject = Subject::new();
//!
//! // One closure, one message type
//! let hello = subject.subscribe_fn(|g: &Greeting| {
//!     println!("Hello, {}!", g.0);
//!     Ok(())
//! });
//!
//! // Many handlers behind one subscription
//! let router = Router::new()
//!     .on(|g: &Greeting| { println!("logged {:?}", g); Ok(()) })
//!     .on_any(|m| { println!("unhandled {}", m.type_name()); Ok(()) });
//! let _log = subject.subscribe(Rc::new(router));
//!
//! subject.publish(&Greeting("World".into()))?;
//! subject.publish(&42_u32)?;
//!
//! hello.dispose();
//! # Ok::<(), typebus::Error>(())
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | The bus: registry of sinks plus `publish` |
//! | [`WeakSubject`] | Non-owning handle for sinks that call back into their subject |
//! | [`Sink`] | Trait for receivers: exact-type and/or any-type capability |
//! | [`Source`] | Subscription side of a bus (`subscribe`) |
//! | [`Subscription`] | Handle that removes a sink on `dispose()` |
//! | [`Message`] | Type-erased view of a published value |
//! | [`Router`] | Table-driven sink aggregating many handlers |
//! | [`Route`] | Which capability a message is delivered through |
//! | [`Config`] | Subject name, registry capacity, publish depth limit |
//!
//! ## Type Routing
//!
//! Routing uses the *static* type a value is published as. For each sink in
//! subscription order the subject calls the exact-type capability if the
//! sink has one for that type, otherwise the any-type capability if the sink
//! has it, otherwise nothing. A sink is called at most once per publish.
//!
//! ## Reentrancy
//!
//! Each publish iterates a frozen view of the subscriber list. Subscribing or
//! disposing from inside a callback changes the live list only, so the
//! effect shows up on the next publish:
//!
//! ```rust
//! # use std::{cell::RefCell, rc::Rc};
//! # use typebus::*;
//! let subject = Subject::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let late: Rc<RefCell<Option<Subscription>>> = Rc::default();
//!
//! let (l, h) = (log.clone(), late.clone());
//! subject.subscribe_any_fn(move |_| {
//!     l.borrow_mut().push("a");
//!     if let Some(h) = h.borrow().as_ref() { h.dispose(); }
//!     Ok(())
//! });
//! let l = log.clone();
//! *late.borrow_mut() = Some(subject.subscribe_any_fn(move |_| {
//!     l.borrow_mut().push("b");
//!     Ok(())
//! }));
//!
//! subject.publish(&())?; // "b" was disposed during this publish, still delivered
//! subject.publish(&())?; // gone now
//! assert_eq!(*log.borrow(), vec!["a", "b", "a"]);
//! # Ok::<(), typebus::Error>(())
//! ```
//!
//! A sink that needs the subject itself (to subscribe or publish from its
//! callback) should capture [`Subject::downgrade`]. The subject owns its
//! sinks, so a captured `Subject` clone is a reference cycle.
//!
//! ## Errors
//!
//! Sink callbacks return [`Result`]. The first error stops the publish and is
//! returned to the publisher unchanged; sinks later in the list are not called.
//!
//! ## Features
//!
//! - **`monitoring`** (default) - Lifecycle hooks for debugging, metrics, and logging
//! - **`test-harness`** - Recording sinks for asserting on message flow (enables `monitoring`)
//! - **`serde`** - Serialization for [`Config`] and [`SubscriptionId`]
//!
//! ## Examples
//!
//! See the `examples/` directory:
//!
//! - `hello-world.rs` - Closure subscriptions
//! - `router.rs` - Routing many handlers through one subscription
//! - `reentrant.rs` - Subscribing and disposing from inside callbacks
//! - `monitoring.rs` - Observing message flow with monitors

mod config;
mod error;
mod fn_sink;
mod message;
mod router;
mod sink;
mod source;
mod subject;
mod subscription;
mod subscription_id;

mod internal;

#[cfg(feature = "test-harness")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-harness")))]
pub mod testing;

#[cfg(feature = "monitoring")]
#[cfg_attr(docsrs, doc(cfg(feature = "monitoring")))]
pub mod monitoring;

#[cfg(feature = "monitoring")]
#[cfg_attr(docsrs, doc(cfg(feature = "monitoring")))]
pub mod monitors;

pub use config::Config;
pub use error::Error;
pub use fn_sink::{AnyFnSink, FnSink};
pub use message::Message;
pub use router::Router;
pub use sink::{Route, Sink};
pub use source::{Source, SourceExt};
pub use subject::{Subject, WeakSubject};
pub use subscription::{Subscription, SubscriptionGuard};
pub use subscription_id::SubscriptionId;

/// Convenience alias for `Result<T, typebus::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
