//! Processing environments and their lifecycle.
//!
//! An environment is a built, stateful handler for events: a condition
//! predicate that decides whether a route fires, and an evaluator that
//! processes the event on a match. The manager keeps one independently-built
//! replica per dispatch worker so the hot path needs no cross-thread
//! synchronization, and refcounts each environment by name so its lifetime
//! is tied to the routes that reference it.

mod instance;
mod manager;
mod traits;

pub use instance::Environment;
pub use manager::EnvironmentManager;
pub use traits::{
    BuildError, BuiltEnvironment, EnvironmentBuilder, EvaluationError, Evaluator, Predicate,
};
