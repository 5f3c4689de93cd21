//! Durable persistence of the route catalog.
//!
//! The catalog is a JSON array of `{name, priority, target}` records sorted
//! ascending by priority, kept under one fixed store key. Every successful
//! table mutation rewrites the whole catalog; start-up reads it back and
//! replays each record as an add.

use crate::routing::RouteEntry;
use crate::store::Store;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fixed store key of the routing catalog.
pub const ROUTES_TABLE_KEY: &str = "internal/router_table/0";

/// Reads and rewrites the routing catalog through the external store.
pub struct Catalog {
    store: Arc<dyn Store>,
}

impl Catalog {
    /// Creates a catalog over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Loads the persisted records, ascending by priority.
    ///
    /// An absent key creates an empty catalog. A corrupt payload is logged,
    /// replaced by an empty catalog, and load continues with no records;
    /// the process keeps running either way.
    pub fn load(&self) -> Vec<RouteEntry> {
        let bytes = match self.store.get(ROUTES_TABLE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("routing catalog not found in store, creating empty catalog");
                self.save(&[]);
                return Vec::new();
            }
            Err(e) => {
                error!("failed to read routing catalog, starting empty: {}", e);
                self.save(&[]);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<RouteEntry>>(&bytes) {
            Ok(entries) => {
                info!("loaded routing catalog ({} routes)", entries.len());
                entries
            }
            Err(e) => {
                error!("routing catalog is corrupt, starting empty: {}", e);
                self.save(&[]);
                Vec::new()
            }
        }
    }

    /// Rewrites the full catalog.
    ///
    /// A store write failure terminates the process after logging; the
    /// in-memory table has already advanced and must not diverge from
    /// durable state.
    pub fn save(&self, entries: &[RouteEntry]) {
        let payload = serde_json::to_vec(entries)
            .expect("route entries always serialize to JSON");

        if let Err(e) = self.store.put(ROUTES_TABLE_KEY, &payload) {
            error!("failed to persist routing catalog, terminating: {}", e);
            std::process::exit(1);
        }
    }
}
