//! Request handling for the management endpoints.

use super::response::ApiResponse;
use super::{PARAM_EVENT, PARAM_NAME, PARAM_PRIORITY, PARAM_TARGET};
use crate::error::RouterError;
use crate::event::Event;
use crate::router::RouterInner;
use serde_json::Value;
use std::sync::Arc;

/// The recognized management endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Create a route.
    SetRoute,
    /// List routes ascending by priority.
    GetRoutes,
    /// Delete a route.
    DeleteRoute,
    /// Move a route to a new priority.
    ChangeRoutePriority,
    /// Push one synthetic event onto the queue.
    EnqueueEvent,
}

impl Endpoint {
    /// Parses an endpoint name from the transport.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "set-route" => Some(Self::SetRoute),
            "get-routes" => Some(Self::GetRoutes),
            "delete-route" => Some(Self::DeleteRoute),
            "change-route-priority" => Some(Self::ChangeRoutePriority),
            "enqueue-event" => Some(Self::EnqueueEvent),
            _ => None,
        }
    }

    /// The wire name of this endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetRoute => "set-route",
            Self::GetRoutes => "get-routes",
            Self::DeleteRoute => "delete-route",
            Self::ChangeRoutePriority => "change-route-priority",
            Self::EnqueueEvent => "enqueue-event",
        }
    }
}

/// Management API bound to one router.
///
/// Obtained from [`Router::api`](crate::router::Router::api); clonable and
/// safe to drive from a transport thread while dispatch is running. Route
/// mutations only contend with dispatch for the brief table write window.
#[derive(Clone)]
pub struct RouterApi {
    inner: Arc<RouterInner>,
}

impl RouterApi {
    pub(crate) fn new(inner: Arc<RouterInner>) -> Self {
        Self { inner }
    }

    /// Handles one request round-trip.
    ///
    /// `params` is the request's JSON parameter document; unknown endpoints
    /// and validation failures come back as error responses, never panics.
    pub fn handle(&self, endpoint: &str, params: &Value) -> ApiResponse {
        let Some(endpoint) = Endpoint::parse(endpoint) else {
            return ApiResponse::error(&RouterError::UnknownEndpoint(endpoint.to_string()));
        };

        let result = match endpoint {
            Endpoint::SetRoute => self.set_route(params),
            Endpoint::GetRoutes => self.get_routes(),
            Endpoint::DeleteRoute => self.delete_route(params),
            Endpoint::ChangeRoutePriority => self.change_route_priority(params),
            Endpoint::EnqueueEvent => self.enqueue_event(params),
        };
        result.unwrap_or_else(|e| ApiResponse::error(&e))
    }

    fn set_route(&self, params: &Value) -> Result<ApiResponse, RouterError> {
        let name = require_string(params, PARAM_NAME)?;
        let priority = require_priority(params)?;
        let target = require_string(params, PARAM_TARGET)?;

        self.inner.add_route(name, target, priority)?;
        Ok(ApiResponse::ok(format!("route '{}' added", name)))
    }

    fn get_routes(&self) -> Result<ApiResponse, RouterError> {
        let entries = self.inner.routes();
        let data = serde_json::to_value(entries)
            .expect("route entries always serialize to JSON");
        Ok(ApiResponse::with_data("routes", data))
    }

    fn delete_route(&self, params: &Value) -> Result<ApiResponse, RouterError> {
        let name = require_string(params, PARAM_NAME)?;
        self.inner.remove_route(name)?;
        Ok(ApiResponse::ok(format!("route '{}' deleted", name)))
    }

    fn change_route_priority(&self, params: &Value) -> Result<ApiResponse, RouterError> {
        let name = require_string(params, PARAM_NAME)?;
        let priority = require_priority(params)?;
        self.inner.change_route_priority(name, priority)?;
        Ok(ApiResponse::ok(format!(
            "route '{}' moved to priority {}",
            name, priority
        )))
    }

    fn enqueue_event(&self, params: &Value) -> Result<ApiResponse, RouterError> {
        let payload = params
            .pointer(PARAM_EVENT)
            .ok_or_else(|| RouterError::MissingField(PARAM_EVENT.to_string()))?;

        self.inner.enqueue(Event::new(payload.clone()))?;
        Ok(ApiResponse::ok("event enqueued"))
    }
}

/// Extracts a non-empty string parameter.
fn require_string<'a>(params: &'a Value, path: &str) -> Result<&'a str, RouterError> {
    let value = params
        .pointer(path)
        .and_then(Value::as_str)
        .ok_or_else(|| RouterError::MissingField(path.to_string()))?;
    if value.is_empty() {
        return Err(RouterError::EmptyName);
    }
    Ok(value)
}

/// Extracts the priority parameter as a non-negative integer.
fn require_priority(params: &Value) -> Result<u32, RouterError> {
    let value = params
        .pointer(PARAM_PRIORITY)
        .ok_or_else(|| RouterError::MissingField(PARAM_PRIORITY.to_string()))?;

    value
        .as_u64()
        .and_then(|p| u32::try_from(p).ok())
        .ok_or(RouterError::NegativePriority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::environment::{
        BuildError, BuiltEnvironment, EnvironmentBuilder, EvaluationError, Evaluator, Predicate,
    };
    use crate::router::Router;
    use crate::store::MemoryStore;
    use serde_json::json;

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

    struct StaticBuilder;

    impl EnvironmentBuilder for StaticBuilder {
        fn build(&self, _target: &str) -> Result<BuiltEnvironment, BuildError> {
            Ok(BuiltEnvironment {
                evaluator: Box::new(NullEvaluator),
                predicate: Box::new(PassPredicate),
            })
        }
    }

    fn test_router() -> Router {
        Router::new(
            Arc::new(StaticBuilder),
            Arc::new(MemoryStore::new()),
            RouterConfig::default().with_workers(1),
        )
        .unwrap()
    }

    #[test]
    fn test_set_route_and_get_routes() {
        let router = test_router();
        let api = router.api();

        let response = api.handle(
            "set-route",
            &json!({"name": "alerts", "priority": 10, "target": "prod"}),
        );
        assert!(response.is_ok(), "{}", response.message);

        let response = api.handle("get-routes", &json!({}));
        let data = response.data.unwrap();
        assert_eq!(
            data,
            json!([{"name": "alerts", "priority": 10, "target": "prod"}])
        );
    }

    #[test]
    fn test_set_route_missing_field() {
        let router = test_router();
        let api = router.api();

        let response = api.handle("set-route", &json!({"name": "a", "priority": 1}));
        assert_eq!(response.code, Some("MISSING_FIELD"));
    }

    #[test]
    fn test_set_route_rejects_empty_name() {
        let router = test_router();
        let api = router.api();

        let response = api.handle(
            "set-route",
            &json!({"name": "", "priority": 1, "target": "prod"}),
        );
        assert_eq!(response.code, Some("EMPTY_NAME"));
    }

    #[test]
    fn test_set_route_rejects_negative_priority() {
        let router = test_router();
        let api = router.api();

        let response = api.handle(
            "set-route",
            &json!({"name": "a", "priority": -1, "target": "prod"}),
        );
        assert_eq!(response.code, Some("NEGATIVE_PRIORITY"));
    }

    #[test]
    fn test_delete_route() {
        let router = test_router();
        let api = router.api();
        api.handle(
            "set-route",
            &json!({"name": "a", "priority": 1, "target": "prod"}),
        );

        let response = api.handle("delete-route", &json!({"name": "a"}));
        assert!(response.is_ok());

        let response = api.handle("delete-route", &json!({"name": "a"}));
        assert_eq!(response.code, Some("ROUTE_NOT_FOUND"));
    }

    #[test]
    fn test_change_route_priority() {
        let router = test_router();
        let api = router.api();
        api.handle(
            "set-route",
            &json!({"name": "a", "priority": 1, "target": "prod"}),
        );

        let response = api.handle(
            "change-route-priority",
            &json!({"name": "a", "priority": 4}),
        );
        assert!(response.is_ok());
        assert_eq!(router.routes()[0].priority, 4);
    }

    #[test]
    fn test_enqueue_event() {
        let router = test_router();
        let api = router.api();

        let response = api.handle("enqueue-event", &json!({"event": {"module": "auth"}}));
        assert!(response.is_ok());

        let response = api.handle("enqueue-event", &json!({}));
        assert_eq!(response.code, Some("MISSING_FIELD"));
    }

    #[test]
    fn test_unknown_endpoint() {
        let router = test_router();
        let api = router.api();

        let response = api.handle("reload-everything", &json!({}));
        assert_eq!(response.code, Some("UNKNOWN_ENDPOINT"));
    }

    #[test]
    fn test_endpoint_parse_round_trip() {
        for name in [
            "set-route",
            "get-routes",
            "delete-route",
            "change-route-priority",
            "enqueue-event",
        ] {
            assert_eq!(Endpoint::parse(name).unwrap().as_str(), name);
        }
        assert!(Endpoint::parse("set_route").is_none());
    }
}
