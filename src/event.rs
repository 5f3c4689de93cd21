//! The opaque event record flowing through the router.

use serde_json::Value;
use std::sync::Arc;

/// An event produced by an external source.
///
/// Events are reference-counted so the queue, the dispatch pass, and the
/// target environment can share one allocation; cloning is a pointer copy.
/// The router never inspects the payload; only route predicates and
/// environment evaluators interpret it.
#[derive(Debug, Clone)]
pub struct Event(Arc<Value>);

impl Event {
    /// Wraps a structured payload into an event.
    pub fn new(payload: Value) -> Self {
        Self(Arc::new(payload))
    }

    /// Returns the structured payload.
    pub fn payload(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Event {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}
