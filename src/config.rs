//! Router configuration.

use std::time::Duration;

/// Default capacity of the bounded event queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Default bounded wait for one dequeue attempt, in milliseconds.
///
/// Workers re-check the stop flag after each timed-out dequeue, so this
/// bounds how long shutdown can lag behind `stop()`.
pub const DEFAULT_DEQUEUE_TIMEOUT_MS: u64 = 100;

/// Configuration for the router and its dispatch workers.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Number of dispatch worker threads.
    /// Default: number of CPU cores.
    pub workers: usize,

    /// Capacity of the bounded event queue.
    pub queue_capacity: usize,

    /// Bounded wait for one dequeue attempt.
    pub dequeue_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dequeue_timeout: Duration::from_millis(DEFAULT_DEQUEUE_TIMEOUT_MS),
        }
    }
}

impl RouterConfig {
    /// Sets the number of dispatch worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the event queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the bounded wait for one dequeue attempt.
    pub fn with_dequeue_timeout(mut self, timeout: Duration) -> Self {
        self.dequeue_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(
            config.dequeue_timeout,
            Duration::from_millis(DEFAULT_DEQUEUE_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = RouterConfig::default()
            .with_workers(2)
            .with_queue_capacity(16)
            .with_dequeue_timeout(Duration::from_millis(50));
        assert_eq!(config.workers, 2);
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.dequeue_timeout, Duration::from_millis(50));
    }
}
