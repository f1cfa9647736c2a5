use cranio_primitives::EventMask;
use parking_lot::Mutex;

use crate::action::{Action, ActionMeta, ActionSpec, BodyCx};
use crate::session::Session;
use crate::undo::UndoState;

/// Every flag a recorded undo state can restore.
const RESTORABLE: EventMask = EventMask::MESH
	.union(EventMask::MASK)
	.union(EventMask::AFFINE)
	.union(EventMask::CAMERA)
	.union(EventMask::ANY_ASSESSMENT);

/// Reverts the most recent recorded change to the selected model.
///
/// The state is popped on the home context, restored by the body under the
/// model's write lock, and the restored mask is raised as the change.
#[derive(Debug, Default)]
pub struct UndoLast {
	pending: Mutex<Option<UndoState>>,
	restored: Mutex<EventMask>,
}

impl UndoLast {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Action for UndoLast {
	fn meta(&self) -> ActionMeta {
		ActionMeta::new("undo").tooltip("Revert the last change to the selected model")
	}

	fn spec(&self) -> ActionSpec {
		ActionSpec::new().refresh_on(
			RESTORABLE
				.union(EventMask::MODEL_SELECT)
				.union(EventMask::LOADED_MODEL)
				.union(EventMask::SAVED_MODEL)
				.union(EventMask::CLOSED_MODEL),
		)
	}

	fn is_allowed(&self, session: &Session, _event: EventMask) -> bool {
		session.selected_id().is_some_and(|id| session.undo_len(id) > 0)
	}

	fn before(&self, session: &mut Session, _event: EventMask) -> bool {
		let Some(state) = session.selected_id().and_then(|id| session.pop_undo(id)) else {
			session.status("Nothing to undo");
			return false;
		};
		*self.pending.lock() = Some(state);
		true
	}

	fn run(&self, cx: &BodyCx) -> bool {
		let Some(state) = self.pending.lock().take() else {
			return false;
		};
		let Some(model) = cx.model().filter(|m| m.id() == state.model()) else {
			tracing::warn!(model = %state.model(), "undo target is no longer selected");
			return false;
		};
		*self.restored.lock() = state.restore(model);
		true
	}

	fn after(&self, session: &mut Session, _event: EventMask, ok: bool) -> EventMask {
		let restored = std::mem::take(&mut *self.restored.lock());
		if !ok {
			return EventMask::ERR_MSG;
		}
		session.status(&format!("Undid {restored}"));
		restored
	}
}
