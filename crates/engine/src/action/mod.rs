//! The [`Action`] trait and the state the orchestrator tracks per action.
//!
//! An action goes through `before → run → after` each time it executes:
//!
//! * [`Action::before`] runs on the home context with `&mut Session`. Returning
//!   `false` cancels the execution without touching any model.
//! * [`Action::run`] is the body. It receives a [`BodyCx`] carrying the target
//!   model and may run on a worker thread for asynchronous actions, so it only
//!   sees what is `Send`.
//! * [`Action::after`] runs on the home context once the body returned and
//!   yields the [`EventMask`] describing what changed.
//!
//! Actions are shared between the home context and workers, so any state
//! handed from one hook to the next lives behind interior mutability.

mod spec;
mod state;

use std::sync::Arc;

use cranio_primitives::{EventMask, ModelId};

pub use spec::{ActionMeta, ActionSpec};
pub use state::{ActionPhase, ActionState};

use crate::model::Model;
use crate::session::Session;

/// What a body gets to work with.
#[derive(Debug, Clone)]
pub struct BodyCx {
	model: Option<Arc<Model>>,
	event: EventMask,
}

impl BodyCx {
	pub(crate) fn new(model: Option<Arc<Model>>, event: EventMask) -> Self {
		Self { model, event }
	}

	/// The model selected when the execution started.
	pub fn model(&self) -> Option<&Arc<Model>> {
		self.model.as_ref()
	}

	pub fn model_id(&self) -> Option<ModelId> {
		self.model.as_ref().map(|m| m.id())
	}

	pub fn event(&self) -> EventMask {
		self.event
	}
}

pub trait Action: Send + Sync + 'static {
	fn meta(&self) -> ActionMeta;

	/// Declared purge/trigger/refresh masks, read once at registration.
	fn spec(&self) -> ActionSpec {
		ActionSpec::new()
	}

	/// Whether the action makes sense right now. Must not mutate anything.
	///
	/// Only consulted for presentation and interactive invocation; cascade
	/// triggered executions run regardless.
	fn is_allowed(&self, _session: &Session, _event: EventMask) -> bool {
		true
	}

	/// Checked state for toggle-style actions; `None` for plain actions.
	fn checked(&self, _session: &Session) -> Option<bool> {
		None
	}

	/// Model fields to snapshot for undo before the body runs.
	fn undo_event(&self) -> EventMask {
		EventMask::none()
	}

	/// Drops cached state made stale by `event`.
	fn purge(&self, _session: &mut Session, _model: Option<ModelId>, _event: EventMask) {}

	/// Gate on the home context; `false` cancels without side effects.
	fn before(&self, _session: &mut Session, _event: EventMask) -> bool {
		true
	}

	/// The body. Returns whether it succeeded.
	fn run(&self, cx: &BodyCx) -> bool;

	/// Runs on the home context after the body; returns what changed.
	fn after(&self, _session: &mut Session, _event: EventMask, ok: bool) -> EventMask {
		if ok { EventMask::none() } else { EventMask::ERR_MSG }
	}
}

impl std::fmt::Debug for dyn Action {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Action").field("meta", &self.meta()).finish_non_exhaustive()
	}
}
