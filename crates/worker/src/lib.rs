//! Worker runtime primitives for moving action bodies off the home context.
//!
//! The home context (whoever owns the orchestrator) dispatches blocking
//! bodies through a [`CompletionPort`] and later drains exactly one
//! [`Completion`] per dispatch back onto itself.

mod budget;
mod class;
mod completion;
mod failure;
mod spawn;

pub use budget::{DrainBudget, DrainReport};
pub use class::TaskClass;
pub use completion::{Completion, CompletionPort};
pub use failure::WorkerFailure;
pub use spawn::spawn_blocking;
