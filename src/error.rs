//! Error types for the routing engine.
//!
//! Errors are grouped by the layer that produces them (validation, table,
//! environment, queue, API). Each variant carries a stable textual code that
//! management API responses report alongside the human-readable message.

use thiserror::Error;

/// Errors surfaced by router operations.
///
/// Dispatch-path failures (predicate or ingest errors) never appear here;
/// they are logged and absorbed inside the dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Route or target name was empty
    #[error("route name must not be empty")]
    EmptyName,

    /// Priority was negative or not an integer
    #[error("priority must be a non-negative integer")]
    NegativePriority,

    /// A required request field was absent
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A route with this name already exists
    #[error("route '{0}' already exists")]
    DuplicateName(String),

    /// Another route already occupies this priority
    #[error("priority {0} is already in use")]
    DuplicatePriority(u32),

    /// No route with this name exists
    #[error("route '{0}' does not exist")]
    RouteNotFound(String),

    /// The builder rejected the environment definition
    #[error("failed to build environment '{target}': {message}")]
    BuildFailure { target: String, message: String },

    /// The builder does not know this environment name
    #[error("environment '{0}' is unknown to the builder")]
    TargetNotFound(String),

    /// The event queue is at capacity
    #[error("event queue is full")]
    QueueFull,

    /// The event queue has no consumers left
    #[error("event queue is closed")]
    QueueClosed,

    /// Worker count was zero
    #[error("worker count must be greater than zero")]
    InvalidWorkerCount,

    /// The management API does not recognize this endpoint
    #[error("unknown api endpoint '{0}'")]
    UnknownEndpoint(String),
}

impl RouterError {
    /// Returns the stable textual code reported in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::NegativePriority => "NEGATIVE_PRIORITY",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::DuplicateName(_) => "DUPLICATE_NAME",
            Self::DuplicatePriority(_) => "DUPLICATE_PRIORITY",
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::BuildFailure { .. } => "BUILD_FAILURE",
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::QueueFull => "QUEUE_FULL",
            Self::QueueClosed => "QUEUE_CLOSED",
            Self::InvalidWorkerCount => "INVALID_WORKER_COUNT",
            Self::UnknownEndpoint(_) => "UNKNOWN_ENDPOINT",
        }
    }
}
