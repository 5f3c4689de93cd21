//! The mutable in-memory route catalog.

use super::route::{Route, RouteEntry};
use crate::error::RouterError;
use std::collections::{BTreeMap, HashMap};

/// Priority-ordered catalog of routes.
///
/// Two coupled indexes: `by_name` maps a route name to its priority and
/// `by_priority` holds the routes ordered ascending. Between operations every
/// name maps to exactly one route, every priority holds exactly one route,
/// and the two indexes agree.
///
/// The table itself is not synchronized; the router wraps it (together with
/// the environment manager) in a reader/writer lock so each dispatch pass
/// sees a consistent snapshot.
#[derive(Default)]
pub struct RouteTable {
    by_name: HashMap<String, u32>,
    by_priority: BTreeMap<u32, Route>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a route named `name` exists.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns whether some route occupies `priority`.
    pub fn contains_priority(&self, priority: u32) -> bool {
        self.by_priority.contains_key(&priority)
    }

    /// Inserts a route.
    ///
    /// # Errors
    ///
    /// [`RouterError::DuplicateName`] or [`RouterError::DuplicatePriority`]
    /// when the route would collide; the table is unchanged on error.
    pub fn add(&mut self, route: Route) -> Result<(), RouterError> {
        if self.contains_name(route.name()) {
            return Err(RouterError::DuplicateName(route.name().to_string()));
        }
        if self.contains_priority(route.priority()) {
            return Err(RouterError::DuplicatePriority(route.priority()));
        }

        self.by_name
            .insert(route.name().to_string(), route.priority());
        self.by_priority.insert(route.priority(), route);
        Ok(())
    }

    /// Removes the route named `name`, returning it so the caller can
    /// release its environment acquisition.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] when no such route exists; repeating a
    /// removal yields this error and leaves the table unchanged.
    pub fn remove(&mut self, name: &str) -> Result<Route, RouterError> {
        let priority = self
            .by_name
            .remove(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;

        let route = self
            .by_priority
            .remove(&priority)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;
        Ok(route)
    }

    /// Moves the route named `name` to `new_priority`.
    ///
    /// Identity and environment replicas are preserved; only the position in
    /// the priority index changes.
    ///
    /// # Errors
    ///
    /// [`RouterError::RouteNotFound`] or [`RouterError::DuplicatePriority`];
    /// the table is unchanged on error.
    pub fn change_priority(&mut self, name: &str, new_priority: u32) -> Result<(), RouterError> {
        let current = *self
            .by_name
            .get(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;

        if current == new_priority {
            return Ok(());
        }
        if self.contains_priority(new_priority) {
            return Err(RouterError::DuplicatePriority(new_priority));
        }

        let mut route = self
            .by_priority
            .remove(&current)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;
        route.set_priority(new_priority);
        self.by_priority.insert(new_priority, route);
        self.by_name.insert(name.to_string(), new_priority);
        Ok(())
    }

    /// Returns `(name, priority, target)` records ascending by priority.
    pub fn entries(&self) -> Vec<RouteEntry> {
        self.by_priority.values().map(Route::entry).collect()
    }

    /// Iterates routes ascending by priority, for one dispatch pass.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.by_priority.values()
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.by_priority.len()
    }

    /// Returns whether the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.by_priority.is_empty()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.len())
            .finish()
    }
}
