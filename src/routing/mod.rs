//! Routes and the priority-ordered route table.
//!
//! A route binds a name to a target environment, a strictly unique priority,
//! and the per-worker condition replicas of that environment. The table keeps
//! two coupled indexes (`name -> priority`, `priority -> route`) whose
//! unique-name and unique-priority invariants hold between every operation.

mod route;
mod table;

pub use route::{Route, RouteEntry};
pub use table::RouteTable;
