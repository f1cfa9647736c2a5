use std::sync::Arc;

use cranio_primitives::{ActionId, EventMask};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::Orchestrator;
use crate::session::Session;

impl Orchestrator {
	/// Propagates `event` through every registered action.
	///
	/// `sender` is the action whose completion produced the event, if any;
	/// it is never purged, triggered or refreshed by its own event.
	///
	/// 1. `CANCEL` is ignored.
	/// 2. Idle actions that purge on `event` drop stale caches.
	/// 3. Mesh changes rebuild the selected model's presentation; alignment
	///    changes only resync its transforms.
	/// 4. Interaction handlers refresh.
	/// 5. Every idle action not yet seen in this cascade is classified:
	///    triggered actions are queued to execute, otherwise refreshing
	///    actions are queued to refresh. Idle actions seen earlier
	///    accumulate `event` into their recorded mask instead.
	/// 6. Triggered actions execute in registration order; each may raise
	///    again, re-entering this method.
	/// 7. Queued actions refresh with their accumulated mask.
	/// 8. When the outermost call returns the cascade record is cleared and
	///    the presenter is flushed once.
	///
	/// An action is queued at most once per outermost cascade, so one call
	/// executes at most [`Orchestrator::len`] actions directly.
	pub fn raise(&mut self, session: &mut Session, event: EventMask, sender: Option<ActionId>) {
		if event.is_cancel() {
			trace!(sender = ?sender, "cascade.raise ignored: cancel");
			return;
		}
		self.depth += 1;
		debug!(depth = self.depth, %event, sender = ?sender, "cascade.raise");

		self.purge_pass(session, event, sender);
		maintain_presentation(session, event);
		session.interactions_mut().refresh_all();

		let (triggered, refreshed) = self.classify(event, sender);

		for id in triggered {
			if let Err(err) = self.execute(session, id, event) {
				warn!(%id, %err, "cascade trigger failed");
			}
		}

		for id in refreshed {
			let merged = self.acted.get(&id).copied().unwrap_or(event);
			self.refresh_slot(session, id.index(), merged);
		}

		self.depth -= 1;
		if self.depth == 0 {
			self.acted.clear();
			session.presenter_mut().flush();
			self.settled_total += 1;
			debug!(settled_total = self.settled_total, "cascade.settled");
		}
	}

	fn purge_pass(&self, session: &mut Session, event: EventMask, sender: Option<ActionId>) {
		let target = session.selected_id();
		for slot in &self.slots {
			if Some(slot.id) == sender || slot.state.is_working() || !slot.spec.purges(event) {
				continue;
			}
			trace!(action = slot.meta.name, %event, "action.purge");
			let action = Arc::clone(&slot.action);
			action.purge(session, target, event);
		}
	}

	pub(super) fn classify(&mut self, event: EventMask, sender: Option<ActionId>) -> (SmallVec<[ActionId; 8]>, SmallVec<[ActionId; 8]>) {
		if let Some(sender) = sender {
			merge(self.acted.entry(sender).or_insert(EventMask::none()), event);
		}

		let mut triggered = SmallVec::new();
		let mut refreshed = SmallVec::new();
		for slot in &self.slots {
			if Some(slot.id) == sender {
				continue;
			}
			// Working actions are left out entirely, recorded mask included.
			if slot.state.is_working() {
				continue;
			}
			if let Some(recorded) = self.acted.get_mut(&slot.id) {
				merge(recorded, event);
				continue;
			}
			if slot.spec.triggers(event) {
				triggered.push(slot.id);
				self.acted.insert(slot.id, event);
			} else if slot.spec.refreshes(event) {
				refreshed.push(slot.id);
				self.acted.insert(slot.id, event);
			}
		}
		trace!(triggered = triggered.len(), refreshed = refreshed.len(), "cascade.classify");
		(triggered, refreshed)
	}
}

fn merge(recorded: &mut EventMask, event: EventMask) {
	*recorded = EventMask::combine(*recorded, event);
}

fn maintain_presentation(session: &mut Session, event: EventMask) {
	let Some(model) = session.selected().cloned() else {
		return;
	};
	let all_views = EventMask::has(event, EventMask::ALL_VIEWS);
	if event.intersects(EventMask::MESH) {
		trace!(model = %model.id(), all_views, "presenter.rebuild");
		session.presenter_mut().rebuild(&model, all_views);
	} else if event.intersects(EventMask::AFFINE) {
		trace!(model = %model.id(), all_views, "presenter.sync_transform");
		session.presenter_mut().sync_transform(&model, all_views);
	}
}
