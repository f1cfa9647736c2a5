//! Minimal-snapshot undo.
//!
//! An [`UndoState`] copies exactly the model fields implicated by the event
//! mask of the operation about to run, plus the saved flags. Restoring writes
//! the same selection back, so fields the operation never touched are left
//! as they are at restore time.
//!
//! | mask intersects                              | captured                 |
//! |----------------------------------------------|--------------------------|
//! | `MESH`                                       | mesh + adjacency index   |
//! | `MASK`                                       | template mask            |
//! | `MESH` or `MASK`                             | bounding volumes         |
//! | `AFFINE`                                     | transform                |
//! | `CAMERA`                                     | per-viewer camera poses  |
//! | `LANDMARKS`/`PATHS`/`ASSESSMENT`/`METADATA`  | whole assessment set     |

mod stack;

use std::collections::BTreeMap;

use cranio_primitives::{EventMask, ModelId, ViewerId};

pub use stack::UndoStack;

use crate::model::{AssessmentSet, Bounds, CameraPose, Mesh, MeshIndex, Model, SavedFlags, Transform};

/// Which model fields a mask selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldSelection {
	mesh: bool,
	mask: bool,
	bounds: bool,
	transform: bool,
	cameras: bool,
	assessment: bool,
}

impl FieldSelection {
	pub(crate) fn for_event(event: EventMask) -> Self {
		Self {
			mesh: event.intersects(EventMask::MESH),
			mask: event.intersects(EventMask::MASK),
			bounds: event.intersects(EventMask::MESH | EventMask::MASK),
			transform: event.intersects(EventMask::AFFINE),
			cameras: event.intersects(EventMask::CAMERA),
			assessment: event.intersects(EventMask::ANY_ASSESSMENT),
		}
	}

	pub(crate) fn is_empty(self) -> bool {
		self == Self::default()
	}
}

/// Point-in-time copy of the fields of one model selected by an event mask.
#[derive(Debug)]
pub struct UndoState {
	model: ModelId,
	event: EventMask,
	saved: SavedFlags,
	mesh: Option<(Mesh, MeshIndex)>,
	mask: Option<Option<Mesh>>,
	bounds: Option<Vec<Bounds>>,
	transform: Option<Transform>,
	cameras: Option<BTreeMap<ViewerId, CameraPose>>,
	assessment: Option<AssessmentSet>,
}

impl UndoState {
	/// Returns true if `event` selects at least one model field.
	pub fn captures_anything(event: EventMask) -> bool {
		!FieldSelection::for_event(event).is_empty()
	}

	/// Deep-copies the fields of `model` selected by `event` under a read lock.
	pub fn capture(model: &Model, event: EventMask) -> Self {
		let sel = FieldSelection::for_event(event);
		let data = model.read();
		let state = Self {
			model: model.id(),
			event,
			saved: data.saved,
			mesh: sel.mesh.then(|| (data.mesh.clone(), data.index.clone())),
			mask: sel.mask.then(|| data.mask.clone()),
			bounds: sel.bounds.then(|| data.bounds.clone()),
			transform: sel.transform.then_some(data.transform),
			cameras: sel.cameras.then(|| data.cameras.clone()),
			assessment: sel.assessment.then(|| data.assessment.clone()),
		};
		tracing::trace!(model = %state.model, event = %event, "undo.capture");
		state
	}

	/// The model this state was captured from.
	pub fn model(&self) -> ModelId {
		self.model
	}

	/// The mask the state was captured with.
	pub fn event(&self) -> EventMask {
		self.event
	}

	/// Writes the captured fields back onto `model` under a write lock and
	/// resets its saved flags. Returns the capture mask.
	///
	/// The selection applied is the one used at capture time; there is no way
	/// to restore with a different mask.
	pub fn restore(self, model: &Model) -> EventMask {
		debug_assert_eq!(model.id(), self.model, "undo state restored onto a different model");
		let mut data = model.write();
		if let Some((mesh, index)) = self.mesh {
			data.mesh = mesh;
			data.index = index;
		}
		if let Some(mask) = self.mask {
			data.mask = mask;
		}
		if let Some(bounds) = self.bounds {
			data.bounds = bounds;
		}
		if let Some(transform) = self.transform {
			data.transform = transform;
		}
		if let Some(cameras) = self.cameras {
			data.cameras = cameras;
		}
		if let Some(assessment) = self.assessment {
			data.assessment = assessment;
		}
		data.saved = self.saved;
		tracing::trace!(model = %self.model, event = %self.event, "undo.restore");
		self.event
	}
}

#[cfg(test)]
mod tests;
