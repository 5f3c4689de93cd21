//! Switchyard - priority-based event routing engine
//!
//! Events drain from a bounded queue through a pool of dispatch workers.
//! Each event is matched against a priority-ordered table of routes; the
//! first route whose condition accepts the event hands it to the route's
//! target processing environment, and at most one environment ever sees a
//! given event. The table survives restarts through a durable catalog and
//! is mutated at runtime through a transport-agnostic management API.
//!
//! # High-Level API
//!
//! ```ignore
//! use switchyard::config::RouterConfig;
//! use switchyard::router::Router;
//! use switchyard::store::FileStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(FileStore::new("var/store")?);
//! let mut router = Router::new(builder, store, RouterConfig::default())?;
//! router.start();
//!
//! router.add_route("alerts", "production", 10)?;
//! let producer = router.sender();
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod event;
pub mod logging;
pub mod queue;
pub mod router;
pub mod routing;
pub mod store;

/// Version of the switchyard library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
