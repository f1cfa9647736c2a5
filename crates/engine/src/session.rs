//! Application context shared by every action.
//!
//! A [`Session`] is created once at startup and passed by `&mut` to the
//! orchestrator and every action hook. It owns the loaded models, which one
//! is selected, the [`SelectionLock`], the per-model undo stacks and the
//! external collaborators.

use std::collections::BTreeMap;
use std::sync::Arc;

use cranio_primitives::ModelId;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::SessionError;
use crate::model::{Model, ModelData};
use crate::present::{InteractionHandlers, LogStatus, NullInteractions, NullPresenter, Presenter, StatusSink};
use crate::selection::{SelectKey, SelectionLock};
use crate::undo::{UndoStack, UndoState};

pub struct Session {
	models: BTreeMap<ModelId, Arc<Model>>,
	selected: Option<ModelId>,
	select_lock: SelectionLock,
	undo: FxHashMap<ModelId, UndoStack>,
	undo_limit: usize,
	presenter: Box<dyn Presenter>,
	interactions: Box<dyn InteractionHandlers>,
	status: Box<dyn StatusSink>,
}

impl Default for Session {
	fn default() -> Self {
		Self::new(&EngineConfig::default())
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("models", &self.models.keys().collect::<Vec<_>>())
			.field("selected", &self.selected)
			.field("select_lock", &self.select_lock)
			.field("undo_limit", &self.undo_limit)
			.finish_non_exhaustive()
	}
}

impl Session {
	/// Creates an empty session with null collaborators.
	pub fn new(config: &EngineConfig) -> Self {
		Self {
			models: BTreeMap::new(),
			selected: None,
			select_lock: SelectionLock::new(),
			undo: FxHashMap::default(),
			undo_limit: config.undo.limit,
			presenter: Box::new(NullPresenter),
			interactions: Box::new(NullInteractions),
			status: Box::new(LogStatus),
		}
	}

	#[must_use]
	pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
		self.presenter = Box::new(presenter);
		self
	}

	#[must_use]
	pub fn with_interactions(mut self, interactions: impl InteractionHandlers + 'static) -> Self {
		self.interactions = Box::new(interactions);
		self
	}

	#[must_use]
	pub fn with_status(mut self, status: impl StatusSink + 'static) -> Self {
		self.status = Box::new(status);
		self
	}

	/// Adds a loaded model. The selection is left unchanged.
	pub fn add_model(&mut self, name: impl Into<String>, data: ModelData) -> ModelId {
		let model = Arc::new(Model::new(name, data));
		let id = model.id();
		debug!(model = %id, name = model.name(), "session.add_model");
		self.models.insert(id, model);
		id
	}

	pub fn model(&self, id: ModelId) -> Option<&Arc<Model>> {
		self.models.get(&id)
	}

	pub fn models(&self) -> impl Iterator<Item = &Arc<Model>> {
		self.models.values()
	}

	pub fn model_count(&self) -> usize {
		self.models.len()
	}

	pub fn selected_id(&self) -> Option<ModelId> {
		self.selected
	}

	pub fn selected(&self) -> Option<&Arc<Model>> {
		self.selected.and_then(|id| self.models.get(&id))
	}

	/// Whether the selected model may be changed right now.
	pub fn can_select(&self) -> bool {
		!self.select_lock.is_locked()
	}

	/// Changes the selected model. Returns whether the selection changed.
	pub fn select(&mut self, id: Option<ModelId>) -> Result<bool, SessionError> {
		if let Some(id) = id
			&& !self.models.contains_key(&id)
		{
			return Err(SessionError::UnknownModel(id));
		}
		if self.selected == id {
			return Ok(false);
		}
		if !self.can_select() {
			debug!(requested = ?id, current = ?self.selected, "session.select rejected: locked");
			return Err(SessionError::SelectionLocked);
		}
		self.selected = id;
		Ok(true)
	}

	/// Removes a model and its undo history.
	///
	/// Closing the selected model while the selection is locked forces the
	/// lock open: the work that held it can no longer complete meaningfully.
	pub fn close_model(&mut self, id: ModelId) -> Result<Arc<Model>, SessionError> {
		let model = self.models.remove(&id).ok_or(SessionError::UnknownModel(id))?;
		self.undo.remove(&id);
		if self.selected == Some(id) {
			if self.select_lock.is_locked() {
				warn!(model = %id, "closing selected model with selection locked");
				self.select_lock.force_unlock();
			}
			self.selected = None;
		}
		debug!(model = %id, "session.close_model");
		Ok(model)
	}

	pub fn lock_select(&mut self) -> SelectKey {
		self.select_lock.lock()
	}

	pub fn unlock_select(&mut self, key: SelectKey) -> bool {
		self.select_lock.unlock(key)
	}

	pub fn selection_lock(&self) -> &SelectionLock {
		&self.select_lock
	}

	pub fn undo_stack(&self, id: ModelId) -> Option<&UndoStack> {
		self.undo.get(&id)
	}

	/// Number of undo states recorded for `id`.
	pub fn undo_len(&self, id: ModelId) -> usize {
		self.undo.get(&id).map_or(0, UndoStack::len)
	}

	/// Pushes a state onto the stack of the model it was captured from.
	pub fn push_undo(&mut self, state: UndoState) {
		if !self.models.contains_key(&state.model()) {
			debug!(model = %state.model(), "undo state dropped: model closed");
			return;
		}
		let limit = self.undo_limit;
		self.undo.entry(state.model()).or_insert_with(|| UndoStack::new(limit)).push(state);
	}

	pub fn pop_undo(&mut self, id: ModelId) -> Option<UndoState> {
		self.undo.get_mut(&id)?.pop()
	}

	pub fn discard_last_undo(&mut self, id: ModelId) -> bool {
		self.undo.get_mut(&id).is_some_and(UndoStack::discard_last)
	}

	pub fn clear_undo(&mut self, id: ModelId) {
		if let Some(stack) = self.undo.get_mut(&id) {
			stack.clear();
		}
	}

	pub fn presenter_mut(&mut self) -> &mut dyn Presenter {
		self.presenter.as_mut()
	}

	pub fn interactions(&self) -> &dyn InteractionHandlers {
		self.interactions.as_ref()
	}

	pub fn interactions_mut(&mut self) -> &mut dyn InteractionHandlers {
		self.interactions.as_mut()
	}

	/// Shows a transient status message.
	pub fn status(&mut self, message: &str) {
		self.status.show(message);
	}

	/// Drops every model and releases the selection lock.
	pub fn teardown(&mut self) {
		self.select_lock.force_unlock();
		self.selected = None;
		self.undo.clear();
		self.models.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::Mesh;

	fn session_with_two() -> (Session, ModelId, ModelId) {
		let mut session = Session::default();
		let a = session.add_model("a", ModelData::new(Mesh::default()));
		let b = session.add_model("b", ModelData::new(Mesh::default()));
		(session, a, b)
	}

	#[test]
	fn select_is_rejected_while_locked() {
		let (mut session, a, b) = session_with_two();
		assert_eq!(session.select(Some(a)), Ok(true));
		let key = session.lock_select();
		assert!(!session.can_select());
		assert_eq!(session.select(Some(b)), Err(SessionError::SelectionLocked));
		assert_eq!(session.select(Some(a)), Ok(false), "reselecting the current model is not a change");

		assert!(session.unlock_select(key));
		assert_eq!(session.select(Some(b)), Ok(true));
		assert_eq!(session.selected_id(), Some(b));
	}

	#[test]
	fn select_unknown_model_fails() {
		let mut session = Session::default();
		let bogus = ModelId::next();
		assert_eq!(session.select(Some(bogus)), Err(SessionError::UnknownModel(bogus)));
	}

	#[test]
	fn closing_selected_model_forces_unlock() {
		let (mut session, a, _) = session_with_two();
		session.select(Some(a)).unwrap();
		let key = session.lock_select();
		session.close_model(a).unwrap();

		assert!(session.can_select());
		assert_eq!(session.selected_id(), None);
		assert!(!session.unlock_select(key));
		assert!(session.close_model(a).is_err());
	}

	#[test]
	fn undo_limit_comes_from_config() {
		let mut config = EngineConfig::default();
		config.undo.limit = 1;
		let mut session = Session::new(&config);
		let id = session.add_model("a", ModelData::default());
		let model = Arc::clone(session.model(id).unwrap());
		session.push_undo(UndoState::capture(&model, cranio_primitives::EventMask::AFFINE));
		session.push_undo(UndoState::capture(&model, cranio_primitives::EventMask::CAMERA));
		assert_eq!(session.undo_len(id), 1);
		assert_eq!(session.undo_stack(id).unwrap().last_event(), Some(cranio_primitives::EventMask::CAMERA));
	}
}
