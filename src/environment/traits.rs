//! Trait seams between the router and the external environment builder.
//!
//! The builder compiles a named environment definition into a callable
//! evaluator plus a condition predicate. The router calls it once per worker
//! replica, so implementations are free to carry per-replica scratch state
//! behind `&mut self`; the router guarantees each replica is only driven by
//! one worker.

use crate::event::Event;
use thiserror::Error;

/// Condition predicate deciding whether a route fires for an event.
///
/// Implementations must not panic; failures are reported through the
/// `Result` and treated as "no match" by the dispatch pass.
pub trait Predicate: Send {
    /// Checks the route condition against an event. Side-effect free.
    fn matches(&mut self, event: &Event) -> Result<bool, EvaluationError>;
}

/// Event handler run when a route matches.
///
/// Implementations must not panic; failures are reported through the
/// `Result`, logged, and the event is considered handled.
pub trait Evaluator: Send {
    /// Processes one event (metrics updates, downstream artifacts, etc.).
    fn ingest(&mut self, event: &Event) -> Result<(), EvaluationError>;
}

/// Error reported by a predicate or evaluator.
#[derive(Debug, Clone)]
pub struct EvaluationError {
    /// Human-readable error message.
    pub message: String,
}

impl EvaluationError {
    /// Creates a new evaluation error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvaluationError {}

/// One built replica of an environment definition.
pub struct BuiltEnvironment {
    /// Event handler for matched events.
    pub evaluator: Box<dyn Evaluator>,
    /// Route condition predicate.
    pub predicate: Box<dyn Predicate>,
}

/// Errors from the environment builder.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// The builder does not know this environment name
    #[error("unknown environment definition")]
    NotFound,

    /// The builder rejected the definition
    #[error("{0}")]
    Failed(String),
}

/// Compiles a named environment definition into a callable replica.
///
/// The router invokes `build` once per worker for each distinct target, so
/// implementations may return stateful replicas without internal locking.
pub trait EnvironmentBuilder: Send + Sync {
    /// Builds one replica of the named environment.
    fn build(&self, target: &str) -> Result<BuiltEnvironment, BuildError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_error_display() {
        let err = EvaluationError::new("field 'source' absent");
        assert_eq!(format!("{}", err), "field 'source' absent");
    }

    #[test]
    fn test_build_error_display() {
        assert_eq!(format!("{}", BuildError::NotFound), "unknown environment definition");
        assert_eq!(
            format!("{}", BuildError::Failed("parse error at line 3".to_string())),
            "parse error at line 3"
        );
    }
}
