//! Router facade wiring the table, environments, persistence, queue, and
//! dispatch workers together.

use crate::api::RouterApi;
use crate::catalog::Catalog;
use crate::config::RouterConfig;
use crate::dispatch::Dispatcher;
use crate::environment::{EnvironmentBuilder, EnvironmentManager};
use crate::error::RouterError;
use crate::event::Event;
use crate::queue::{event_channel, EventQueue, EventSender};
use crate::routing::{Route, RouteEntry, RouteTable};
use crate::store::Store;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

/// The shared mutable routing state.
///
/// Table and environment refcounts live under one reader/writer lock:
/// dispatch passes hold the read half for the duration of one event, route
/// mutations hold the write half, so environment lifetime stays tied to
/// route lifetime and every event sees a consistent table.
pub struct RouterState {
    /// Priority-ordered route catalog.
    pub table: RouteTable,
    /// Live environments, refcounted by name.
    pub environments: EnvironmentManager,
}

/// State shared between the router handle and its management API.
pub(crate) struct RouterInner {
    pub(crate) state: Arc<RwLock<RouterState>>,
    catalog: Catalog,
    sender: EventSender,
    /// Serializes mutations so catalog rewrites land in table order.
    mutate: Mutex<()>,
}

impl RouterInner {
    /// Inserts a route without persisting; used by mutations and by the
    /// catalog replay at start-up.
    fn insert_route(&self, name: &str, target: &str, priority: u32) -> Result<(), RouterError> {
        if name.is_empty() || target.is_empty() {
            return Err(RouterError::EmptyName);
        }

        let mut state = self.state.write().unwrap();
        if state.table.contains_name(name) {
            return Err(RouterError::DuplicateName(name.to_string()));
        }
        if state.table.contains_priority(priority) {
            return Err(RouterError::DuplicatePriority(priority));
        }

        let environment = state.environments.acquire(target)?;
        let route = Route::new(name, target, priority, environment);
        if let Err(e) = state.table.add(route) {
            state.environments.release(target);
            return Err(e);
        }
        Ok(())
    }

    pub(crate) fn add_route(
        &self,
        name: &str,
        target: &str,
        priority: u32,
    ) -> Result<(), RouterError> {
        let _guard = self.mutate.lock().unwrap();
        self.insert_route(name, target, priority)?;
        info!("route '{}' added (priority {}, target '{}')", name, priority, target);
        self.persist();
        Ok(())
    }

    pub(crate) fn remove_route(&self, name: &str) -> Result<(), RouterError> {
        let _guard = self.mutate.lock().unwrap();
        {
            let mut state = self.state.write().unwrap();
            let route = state.table.remove(name)?;
            state.environments.release(route.target());
        }
        info!("route '{}' removed", name);
        self.persist();
        Ok(())
    }

    pub(crate) fn change_route_priority(
        &self,
        name: &str,
        priority: u32,
    ) -> Result<(), RouterError> {
        let _guard = self.mutate.lock().unwrap();
        self.state
            .write()
            .unwrap()
            .table
            .change_priority(name, priority)?;
        info!("route '{}' moved to priority {}", name, priority);
        self.persist();
        Ok(())
    }

    pub(crate) fn routes(&self) -> Vec<RouteEntry> {
        self.state.read().unwrap().table.entries()
    }

    pub(crate) fn enqueue(&self, event: Event) -> Result<(), RouterError> {
        self.sender.send(event)
    }

    fn persist(&self) {
        let entries = self.routes();
        self.catalog.save(&entries);
    }
}

/// The event router.
///
/// Owns the route table, the environment manager, the bounded event queue,
/// and the dispatch worker pool. Construction loads the persisted catalog;
/// [`start`](Router::start) launches the workers and
/// [`stop`](Router::stop) joins them.
pub struct Router {
    inner: Arc<RouterInner>,
    queue: EventQueue,
    config: RouterConfig,
    dispatcher: Option<Dispatcher>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router over an environment builder and a catalog store.
    ///
    /// Replays the persisted catalog into the table; records whose target
    /// no longer builds are logged and skipped so a partial recovery still
    /// comes up.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidWorkerCount`] when the configured worker count
    /// is zero.
    pub fn new(
        builder: Arc<dyn EnvironmentBuilder>,
        store: Arc<dyn Store>,
        config: RouterConfig,
    ) -> Result<Self, RouterError> {
        if config.workers == 0 {
            return Err(RouterError::InvalidWorkerCount);
        }

        let (sender, queue) = event_channel(config.queue_capacity);
        let state = RouterState {
            table: RouteTable::new(),
            environments: EnvironmentManager::new(builder, config.workers),
        };
        let inner = Arc::new(RouterInner {
            state: Arc::new(RwLock::new(state)),
            catalog: Catalog::new(store),
            sender,
            mutate: Mutex::new(()),
        });

        for entry in inner.catalog.load() {
            if let Err(e) = inner.insert_route(&entry.name, &entry.target, entry.priority) {
                warn!("skipping catalog route '{}': {}", entry.name, e);
            }
        }
        if inner.state.read().unwrap().table.is_empty() {
            warn!("no routes loaded, events will not be dispatched until a route is added");
        }

        Ok(Self {
            inner,
            queue,
            config,
            dispatcher: None,
        })
    }

    /// Launches the dispatch workers. A second call is a no-op.
    pub fn start(&mut self) {
        if self.dispatcher.is_some() {
            warn!("router already started");
            return;
        }
        self.dispatcher = Some(Dispatcher::start(
            Arc::clone(&self.inner.state),
            self.queue.clone(),
            &self.config,
        ));
        info!("router started ({} workers)", self.config.workers);
    }

    /// Signals the workers to stop and joins them.
    ///
    /// Bounded by one dequeue timeout plus one in-flight event per worker.
    pub fn stop(&mut self) {
        if let Some(mut dispatcher) = self.dispatcher.take() {
            dispatcher.stop();
            info!("router stopped");
        }
    }

    /// Returns whether the dispatch workers are running.
    pub fn is_running(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Number of dispatch workers (and environment replicas per target).
    pub fn worker_count(&self) -> usize {
        self.config.workers
    }

    /// Adds a route and persists the catalog.
    pub fn add_route(&self, name: &str, target: &str, priority: u32) -> Result<(), RouterError> {
        self.inner.add_route(name, target, priority)
    }

    /// Removes a route, releases its environment, and persists the catalog.
    pub fn remove_route(&self, name: &str) -> Result<(), RouterError> {
        self.inner.remove_route(name)
    }

    /// Moves a route to a new priority and persists the catalog.
    pub fn change_route_priority(&self, name: &str, priority: u32) -> Result<(), RouterError> {
        self.inner.change_route_priority(name, priority)
    }

    /// Returns `(name, priority, target)` records ascending by priority.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.inner.routes()
    }

    /// Pushes an event onto the queue without blocking.
    pub fn enqueue(&self, event: Event) -> Result<(), RouterError> {
        self.inner.enqueue(event)
    }

    /// Returns a clonable producer handle onto the event queue.
    pub fn sender(&self) -> EventSender {
        self.inner.sender.clone()
    }

    /// Returns the management API surface for an external transport.
    pub fn api(&self) -> RouterApi {
        RouterApi::new(Arc::clone(&self.inner))
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.stop();
    }
}
