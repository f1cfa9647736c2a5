use std::collections::VecDeque;

use cranio_primitives::EventMask;
use tracing::trace;

use super::UndoState;

/// Per-model stack of undo states, bounded by a depth limit.
///
/// When the limit is reached the oldest state is dropped to make room.
#[derive(Debug)]
pub struct UndoStack {
	entries: VecDeque<UndoState>,
	limit: usize,
}

impl Default for UndoStack {
	fn default() -> Self {
		Self::new(crate::config::UndoConfig::default().limit)
	}
}

impl UndoStack {
	/// Creates an empty stack holding at most `limit` states (at least one).
	pub fn new(limit: usize) -> Self {
		Self {
			entries: VecDeque::new(),
			limit: limit.max(1),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn limit(&self) -> usize {
		self.limit
	}

	/// Capture mask of the most recent state.
	pub fn last_event(&self) -> Option<EventMask> {
		self.entries.back().map(UndoState::event)
	}

	/// Pushes a state recorded after a successful mutation.
	pub fn push(&mut self, state: UndoState) {
		if self.entries.len() == self.limit {
			let evicted = self.entries.pop_front();
			trace!(evicted = ?evicted.map(|s| s.event()), limit = self.limit, "undo.stack evicted oldest");
		}
		trace!(event = %state.event(), depth = self.entries.len() + 1, "undo.stack push");
		self.entries.push_back(state);
	}

	/// Removes and returns the most recent state.
	pub fn pop(&mut self) -> Option<UndoState> {
		self.entries.pop_back()
	}

	/// Drops the most recent state; used when the mutation turned out to be a no-op.
	pub fn discard_last(&mut self) -> bool {
		let discarded = self.entries.pop_back();
		if let Some(state) = &discarded {
			trace!(event = %state.event(), "undo.stack discard_last");
		}
		discarded.is_some()
	}

	/// Drops every state, e.g. after the model was saved.
	pub fn clear(&mut self) {
		if !self.entries.is_empty() {
			trace!(cleared = self.entries.len(), "undo.stack cleared");
		}
		self.entries.clear();
	}
}
