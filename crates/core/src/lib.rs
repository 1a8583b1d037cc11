//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod error;
pub mod types;

pub use error::WaymarkError;
pub use types::{
    AgentSelector, CommentRef, MediaRef, Mode, ModeSet, PermissionEntry, Route, TrackPoint,
};
