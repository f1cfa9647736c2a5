//! Core value types for the coordination engine: event masks and identifiers.

/// Combinable "what changed" flag sets.
pub mod event;
/// Identifier types for actions, models and viewers.
pub mod ids;

pub use event::EventMask;
pub use ids::{ActionId, ModelId, ViewerId};
