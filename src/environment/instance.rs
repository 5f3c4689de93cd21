//! A single built environment replica.

use super::traits::{BuiltEnvironment, Evaluator, Predicate};
use crate::event::Event;
use std::sync::Mutex;
use tracing::{debug, warn};

/// One worker's replica of a built environment.
///
/// The predicate and evaluator sit behind their own mutexes so the replica
/// can live in shared routing state, but each replica is only ever driven by
/// the worker that owns its index, so the locks are uncontended.
///
/// Both operations are total: a failing predicate counts as "no match", a
/// failing evaluator still counts the event as handled. Neither failure
/// leaves the dispatch pass.
pub struct Environment {
    predicate: Mutex<Box<dyn Predicate>>,
    evaluator: Mutex<Box<dyn Evaluator>>,
}

impl Environment {
    /// Wraps a freshly built replica.
    pub fn new(built: BuiltEnvironment) -> Self {
        Self {
            predicate: Mutex::new(built.predicate),
            evaluator: Mutex::new(built.evaluator),
        }
    }

    /// Checks whether this environment's route condition accepts the event.
    ///
    /// Predicate errors are logged at debug level and reported as no-match.
    pub fn matches(&self, event: &Event) -> bool {
        let mut predicate = self.predicate.lock().unwrap();
        match predicate.matches(event) {
            Ok(matched) => matched,
            Err(e) => {
                debug!("predicate failed, treating as no match: {}", e);
                false
            }
        }
    }

    /// Feeds the event into this environment.
    ///
    /// Evaluator errors are logged; the event is considered handled either
    /// way.
    pub fn ingest(&self, event: &Event) {
        let mut evaluator = self.evaluator.lock().unwrap();
        if let Err(e) = evaluator.ingest(event) {
            warn!("environment dropped event with error: {}", e);
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::traits::EvaluationError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ConstPredicate(bool);

    impl Predicate for ConstPredicate {
        fn matches(&mut self, _event: &Event) -> Result<bool, EvaluationError> {
            Ok(self.0)
        }
    }

    struct FailingPredicate;

    impl Predicate for FailingPredicate {
        fn matches(&mut self, _event: &Event) -> Result<bool, EvaluationError> {
            Err(EvaluationError::new("schema mismatch"))
        }
    }

    struct CountingEvaluator(Arc<AtomicUsize>);

    impl Evaluator for CountingEvaluator {
        fn ingest(&mut self, _event: &Event) -> Result<(), EvaluationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingEvaluator;

    impl Evaluator for FailingEvaluator {
        fn ingest(&mut self, _event: &Event) -> Result<(), EvaluationError> {
            Err(EvaluationError::new("downstream unavailable"))
        }
    }

    fn environment(matched: bool, counter: Arc<AtomicUsize>) -> Environment {
        Environment::new(BuiltEnvironment {
            evaluator: Box::new(CountingEvaluator(counter)),
            predicate: Box::new(ConstPredicate(matched)),
        })
    }

    #[test]
    fn test_matches_delegates_to_predicate() {
        let counter = Arc::new(AtomicUsize::new(0));
        let event = Event::new(json!({}));

        assert!(environment(true, counter.clone()).matches(&event));
        assert!(!environment(false, counter).matches(&event));
    }

    #[test]
    fn test_predicate_error_is_no_match() {
        let env = Environment::new(BuiltEnvironment {
            evaluator: Box::new(FailingEvaluator),
            predicate: Box::new(FailingPredicate),
        });
        assert!(!env.matches(&Event::new(json!({}))));
    }

    #[test]
    fn test_ingest_counts_event() {
        let counter = Arc::new(AtomicUsize::new(0));
        let env = environment(true, counter.clone());

        env.ingest(&Event::new(json!({})));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ingest_error_is_absorbed() {
        let env = Environment::new(BuiltEnvironment {
            evaluator: Box::new(FailingEvaluator),
            predicate: Box::new(ConstPredicate(true)),
        });
        // Must not panic or propagate.
        env.ingest(&Event::new(json!({})));
    }
}
