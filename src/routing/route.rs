//! A named, priority-ordered binding to a target environment.

use crate::environment::Environment;
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The externally visible shape of a route.
///
/// Doubles as the catalog record persisted through the store and as one
/// element of the `get-routes` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route name (table identity).
    pub name: String,
    /// Selection order; lower is examined earlier.
    pub priority: u32,
    /// Target environment name.
    pub target: String,
}

/// A route held by the table.
///
/// Owns a handle onto its target environment's per-worker replicas; worker
/// `i` evaluates the condition and ingests events through replica `i` only.
/// Re-prioritizing a route moves it in the table without rebuilding the
/// replicas.
pub struct Route {
    name: String,
    target: String,
    priority: u32,
    environment: Arc<Vec<Environment>>,
}

impl Route {
    /// Creates a route over already-acquired environment replicas.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        priority: u32,
        environment: Arc<Vec<Environment>>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            priority,
            environment,
        }
    }

    /// Route name (identity).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target environment name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current priority.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    /// Evaluates this route's condition through worker `worker`'s replica.
    pub fn matches(&self, worker: usize, event: &Event) -> bool {
        self.environment[worker].matches(event)
    }

    /// Feeds the event into the target environment via worker `worker`'s
    /// replica.
    pub fn ingest(&self, worker: usize, event: &Event) {
        self.environment[worker].ingest(event);
    }

    /// Returns the externally visible record for this route.
    pub fn entry(&self) -> RouteEntry {
        RouteEntry {
            name: self.name.clone(),
            priority: self.priority,
            target: self.target.clone(),
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("priority", &self.priority)
            .field("replicas", &self.environment.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = RouteEntry {
            name: "alerts".to_string(),
            priority: 10,
            target: "prod".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: RouteEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_route_entry_reflects_route() {
        let route = Route::new("alerts", "prod", 7, Arc::new(Vec::new()));
        let entry = route.entry();
        assert_eq!(entry.name, "alerts");
        assert_eq!(entry.priority, 7);
        assert_eq!(entry.target, "prod");
    }
}
