//! Management API surface.
//!
//! Transport-agnostic request handling for the five management operations:
//! route creation, listing, deletion, priority changes, and synthetic event
//! injection. An external transport frames requests, names the endpoint,
//! and carries a JSON parameter document; responses serialize to
//! `{status, message, code?, data?}`.

mod response;
mod service;

pub use response::{ApiResponse, ApiStatus};
pub use service::{Endpoint, RouterApi};

/// JSON pointer to the route name parameter.
pub const PARAM_NAME: &str = "/name";
/// JSON pointer to the priority parameter.
pub const PARAM_PRIORITY: &str = "/priority";
/// JSON pointer to the target environment parameter.
pub const PARAM_TARGET: &str = "/target";
/// JSON pointer to the event payload parameter.
pub const PARAM_EVENT: &str = "/event";
