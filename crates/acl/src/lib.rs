//! ACL reconciliation engine: permission query, merge, repair procedures,
//! and the app-permission gate.

pub mod gate;
pub mod merge;
pub mod query;
pub mod reconcile;
pub mod report;

pub use reconcile::{acl_path, Outcome, Reconciler};
