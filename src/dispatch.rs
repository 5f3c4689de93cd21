//! Dispatch worker pool.
//!
//! `W` OS threads drain the shared event queue. Each worker owns replica
//! index `i` and only ever evaluates predicates and evaluators through that
//! index. Per event a worker holds the routing state read lock for one full
//! pass: routes are walked in ascending priority and the first condition
//! that accepts the event receives exactly one ingest.

use crate::config::RouterConfig;
use crate::event::Event;
use crate::queue::EventQueue;
use crate::router::RouterState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Pool of dispatch worker threads.
///
/// Workers observe the stop flag after every bounded-timeout dequeue, so
/// [`stop`](Dispatcher::stop) completes within one timeout plus one
/// in-flight event per worker.
pub struct Dispatcher {
    running: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns one worker per configured replica index.
    pub fn start(
        state: Arc<RwLock<RouterState>>,
        queue: EventQueue,
        config: &RouterConfig,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let mut workers = Vec::with_capacity(config.workers);

        for index in 0..config.workers {
            let state = Arc::clone(&state);
            let queue = queue.clone();
            let running = Arc::clone(&running);
            let timeout = config.dequeue_timeout;

            let handle = thread::Builder::new()
                .name(format!("router-worker-{}", index))
                .spawn(move || {
                    worker_loop(index, state, queue, running, timeout);
                })
                .expect("failed to spawn router worker thread");
            workers.push(handle);
        }

        Self { running, workers }
    }

    /// Signals the workers to stop and joins them.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One worker's dequeue-and-match loop.
fn worker_loop(
    index: usize,
    state: Arc<RwLock<RouterState>>,
    queue: EventQueue,
    running: Arc<AtomicBool>,
    timeout: Duration,
) {
    debug!("router worker {} started", index);

    loop {
        if !running.load(Ordering::Relaxed) {
            break;
        }

        let event = match queue.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        dispatch_one(index, &state, &event);
    }

    debug!("router worker {} stopped", index);
}

/// Matches one event against the current table snapshot.
fn dispatch_one(index: usize, state: &RwLock<RouterState>, event: &Event) {
    let state = state.read().unwrap();

    for route in state.table.routes() {
        if route.matches(index, event) {
            route.ingest(index, event);
            return;
        }
    }

    debug!("worker {} dropped event: no route matched", index);
}
