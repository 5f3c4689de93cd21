//! Environment lifecycle: build, hold, tear down.

use super::instance::Environment;
use super::traits::{BuildError, EnvironmentBuilder};
use crate::error::RouterError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A live environment and the number of routes holding it.
struct EnvironmentEntry {
    replicas: Arc<Vec<Environment>>,
    refcount: usize,
}

/// Creates, indexes, and destroys environments by name.
///
/// Each distinct target is built once per worker (`replica_count` builds) on
/// first acquisition and refcounted across the routes that reference it. The
/// replicas are torn down when the last referencing route releases them.
///
/// The manager is mutated only under the router's writer lock, which keeps
/// environment lifetime tied to route lifetime.
pub struct EnvironmentManager {
    builder: Arc<dyn EnvironmentBuilder>,
    replica_count: usize,
    environments: HashMap<String, EnvironmentEntry>,
}

impl EnvironmentManager {
    /// Creates a manager that builds `replica_count` replicas per target.
    pub fn new(builder: Arc<dyn EnvironmentBuilder>, replica_count: usize) -> Self {
        Self {
            builder,
            replica_count,
            environments: HashMap::new(),
        }
    }

    /// Ensures replicas of `name` exist and returns per-worker handles.
    ///
    /// On first reference every replica is built through the external
    /// builder; a failure part-way drops the replicas already built, leaving
    /// the manager unchanged.
    pub fn acquire(&mut self, name: &str) -> Result<Arc<Vec<Environment>>, RouterError> {
        if let Some(entry) = self.environments.get_mut(name) {
            entry.refcount += 1;
            return Ok(Arc::clone(&entry.replicas));
        }

        let mut replicas = Vec::with_capacity(self.replica_count);
        for _ in 0..self.replica_count {
            match self.builder.build(name) {
                Ok(built) => replicas.push(Environment::new(built)),
                Err(BuildError::NotFound) => {
                    return Err(RouterError::TargetNotFound(name.to_string()));
                }
                Err(BuildError::Failed(message)) => {
                    return Err(RouterError::BuildFailure {
                        target: name.to_string(),
                        message,
                    });
                }
            }
        }

        debug!(
            "built environment '{}' ({} replicas)",
            name, self.replica_count
        );
        let replicas = Arc::new(replicas);
        self.environments.insert(
            name.to_string(),
            EnvironmentEntry {
                replicas: Arc::clone(&replicas),
                refcount: 1,
            },
        );
        Ok(replicas)
    }

    /// Drops one reference to `name`, tearing the replicas down at zero.
    pub fn release(&mut self, name: &str) {
        match self.environments.get_mut(name) {
            Some(entry) if entry.refcount > 1 => {
                entry.refcount -= 1;
            }
            Some(_) => {
                self.environments.remove(name);
                debug!("environment '{}' torn down", name);
            }
            None => {
                warn!("release of unknown environment '{}'", name);
            }
        }
    }

    /// Returns whether an environment named `name` is live.
    pub fn has(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Returns the number of live environments.
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Returns whether no environments are live.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::traits::{BuiltEnvironment, EvaluationError, Evaluator, Predicate};
    use crate::event::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PassPredicate;

    impl Predicate for PassPredicate {
        fn matches(&mut self, _event: &Event) -> Result<bool, EvaluationError> {
            Ok(true)
        }
    }

    struct NullEvaluator;

    impl Evaluator for NullEvaluator {
        fn ingest(&mut self, _event: &Event) -> Result<(), EvaluationError> {
            Ok(())
        }
    }

    /// Builder that fails the nth build, to exercise rollback.
    struct MockBuilder {
        builds: AtomicUsize,
        fail_on_build: Option<usize>,
        known: Vec<String>,
    }

    impl MockBuilder {
        fn new(known: &[&str]) -> Self {
            Self {
                builds: AtomicUsize::new(0),
                fail_on_build: None,
                known: known.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn failing_on(known: &[&str], nth: usize) -> Self {
            Self {
                fail_on_build: Some(nth),
                ..Self::new(known)
            }
        }
    }

    impl EnvironmentBuilder for MockBuilder {
        fn build(&self, target: &str) -> Result<BuiltEnvironment, BuildError> {
            if !self.known.iter().any(|k| k == target) {
                return Err(BuildError::NotFound);
            }
            let n = self.builds.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_build == Some(n) {
                return Err(BuildError::Failed("ruleset rejected".to_string()));
            }
            Ok(BuiltEnvironment {
                evaluator: Box::new(NullEvaluator),
                predicate: Box::new(PassPredicate),
            })
        }
    }

    #[test]
    fn test_acquire_builds_one_replica_per_worker() {
        let builder = Arc::new(MockBuilder::new(&["prod"]));
        let mut manager = EnvironmentManager::new(builder.clone(), 3);

        let replicas = manager.acquire("prod").unwrap();
        assert_eq!(replicas.len(), 3);
        assert_eq!(builder.builds.load(Ordering::SeqCst), 3);
        assert!(manager.has("prod"));
    }

    #[test]
    fn test_second_acquire_reuses_replicas() {
        let builder = Arc::new(MockBuilder::new(&["prod"]));
        let mut manager = EnvironmentManager::new(builder.clone(), 2);

        let first = manager.acquire("prod").unwrap();
        let second = manager.acquire("prod").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // Still only one round of builds.
        assert_eq!(builder.builds.load(Ordering::SeqCst), 2);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_release_tears_down_at_zero() {
        let builder = Arc::new(MockBuilder::new(&["prod"]));
        let mut manager = EnvironmentManager::new(builder, 1);

        manager.acquire("prod").unwrap();
        manager.acquire("prod").unwrap();

        manager.release("prod");
        assert!(manager.has("prod"));

        manager.release("prod");
        assert!(!manager.has("prod"));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let builder = Arc::new(MockBuilder::new(&[]));
        let mut manager = EnvironmentManager::new(builder, 1);

        let err = manager.acquire("ghost").unwrap_err();
        assert_eq!(err, RouterError::TargetNotFound("ghost".to_string()));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_partial_build_rolls_back() {
        // Fail on the third of four replicas.
        let builder = Arc::new(MockBuilder::failing_on(&["prod"], 2));
        let mut manager = EnvironmentManager::new(builder.clone(), 4);

        let err = manager.acquire("prod").unwrap_err();
        assert!(matches!(err, RouterError::BuildFailure { .. }));
        assert!(!manager.has("prod"));
        // Only the failed round ran; nothing was retained.
        assert_eq!(builder.builds.load(Ordering::SeqCst), 3);

        // A later acquire starts a fresh round and succeeds.
        assert!(manager.acquire("prod").is_ok());
    }
}
