//! Action registry and execution.
//!
//! The [`Orchestrator`] owns every registered action and is the only place
//! actions execute. It lives on the home context: all of its methods take
//! `&mut self` together with `&mut Session`, so two cascades can never
//! interleave. Asynchronous bodies report back through a [`CompletionPort`]
//! that the host drains with [`Orchestrator::pump`], [`Orchestrator::drain`]
//! or [`Orchestrator::settle`].
//!
//! See [`Orchestrator::raise`] for the cascade itself.

mod cascade;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use cranio_primitives::{ActionId, EventMask};
use cranio_worker::{Completion, CompletionPort, DrainBudget, DrainReport, TaskClass, WorkerFailure};
use rustc_hash::FxHashMap;
use tracing::{debug, error, trace, warn};

use crate::action::{Action, ActionMeta, ActionPhase, ActionSpec, ActionState, BodyCx};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::session::Session;
use crate::undo::UndoState;

/// Why an execution was refused before its before-hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
	/// The action is locked (disabled).
	Locked,
	/// A previous execution has not finished.
	Running,
	/// Interactive invocation of an action whose presentation is disabled.
	Disabled,
}

/// Result of one [`Orchestrator::execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Rejected(RejectReason),
	/// The before-hook declined.
	Cancelled,
	/// The body ran inline; carries the mask returned by the after-hook.
	Finished(EventMask),
	/// The body was handed to a worker; its completion is still pending.
	Dispatched,
}

impl Outcome {
	/// True when the body ran or is running.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Finished(_) | Self::Dispatched)
	}
}

struct ActionSlot {
	id: ActionId,
	action: Arc<dyn Action>,
	meta: ActionMeta,
	spec: ActionSpec,
	state: ActionState,
	/// Snapshot taken before the body, pushed once it succeeds.
	undo: Option<UndoState>,
}

pub struct Orchestrator {
	slots: Vec<ActionSlot>,
	/// Actions already classified during the current outermost cascade,
	/// with the union of every event raised since.
	acted: FxHashMap<ActionId, EventMask>,
	depth: usize,
	port: CompletionPort<ActionId, bool>,
	budget: DrainBudget,
	settled_total: u64,
}

impl Default for Orchestrator {
	fn default() -> Self {
		Self::new(&EngineConfig::default())
	}
}

impl std::fmt::Debug for Orchestrator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Orchestrator")
			.field("actions", &self.slots.len())
			.field("depth", &self.depth)
			.field("in_flight", &self.port.in_flight())
			.field("settled_total", &self.settled_total)
			.finish()
	}
}

impl Orchestrator {
	pub fn new(config: &EngineConfig) -> Self {
		Self {
			slots: Vec::new(),
			acted: FxHashMap::default(),
			depth: 0,
			port: CompletionPort::new(),
			budget: config.worker.budget(),
			settled_total: 0,
		}
	}

	/// Takes ownership of an action and fixes its declared masks.
	///
	/// Registration order is dispatch order for actions triggered by the
	/// same event.
	pub fn register(&mut self, action: impl Action) -> ActionId {
		self.register_shared(Arc::new(action))
	}

	pub fn register_shared(&mut self, action: Arc<dyn Action>) -> ActionId {
		let id = ActionId(self.slots.len() as u32);
		let meta = action.meta();
		let spec = action.spec();
		debug!(action = meta.name, %id, is_async = meta.is_async, "orchestrator.register");
		self.slots.push(ActionSlot {
			id,
			action,
			meta,
			spec,
			state: ActionState::default(),
			undo: None,
		});
		id
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Finds a registered action by name.
	pub fn find(&self, name: &str) -> Option<ActionId> {
		self.slots.iter().find(|s| s.meta.name == name).map(|s| s.id)
	}

	pub fn meta(&self, id: ActionId) -> Option<&ActionMeta> {
		self.slots.get(id.index()).map(|s| &s.meta)
	}

	pub fn spec(&self, id: ActionId) -> Option<&ActionSpec> {
		self.slots.get(id.index()).map(|s| &s.spec)
	}

	pub fn state(&self, id: ActionId) -> Option<&ActionState> {
		self.slots.get(id.index()).map(|s| &s.state)
	}

	/// Current cascade nesting; zero outside [`Self::raise`].
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Cascades that have run to completion.
	pub fn settled_total(&self) -> u64 {
		self.settled_total
	}

	/// Asynchronous bodies whose completion has not been delivered yet.
	pub fn in_flight(&self) -> usize {
		self.port.in_flight()
	}

	fn slot_index(&self, id: ActionId) -> Result<usize, EngineError> {
		if id.index() < self.slots.len() { Ok(id.index()) } else { Err(EngineError::UnknownAction(id)) }
	}

	/// Locks or unlocks an action. A locked action refuses every execution.
	pub fn set_locked(&mut self, id: ActionId, locked: bool) -> Result<(), EngineError> {
		let idx = self.slot_index(id)?;
		let state = &mut self.slots[idx].state;
		state.locked = locked;
		if locked {
			state.enabled = false;
		}
		Ok(())
	}

	/// Evaluates the action's `is_allowed` predicate without side effects.
	pub fn is_allowed(&self, session: &Session, id: ActionId, event: EventMask) -> Result<bool, EngineError> {
		let idx = self.slot_index(id)?;
		Ok(self.slots[idx].action.is_allowed(session, event))
	}

	/// Interactive entry point: refuses presentation-disabled actions and
	/// marks the execution as user-initiated.
	pub fn invoke(&mut self, session: &mut Session, id: ActionId) -> Result<Outcome, EngineError> {
		let idx = self.slot_index(id)?;
		if !self.slots[idx].state.enabled {
			debug!(action = self.slots[idx].meta.name, "action.invoke rejected: disabled");
			return Ok(Outcome::Rejected(RejectReason::Disabled));
		}
		self.execute(session, id, EventMask::USER)
	}

	/// Runs one action through `before → run → after`.
	///
	/// Refused when the action is locked or still working. `is_allowed` is
	/// not consulted: cascade triggers execute even when the action would be
	/// disabled interactively, and each before-hook must re-check its own
	/// preconditions.
	pub fn execute(&mut self, session: &mut Session, id: ActionId, event: EventMask) -> Result<Outcome, EngineError> {
		let idx = self.slot_index(id)?;
		let slot = &self.slots[idx];
		let name = slot.meta.name;
		if slot.state.locked {
			trace!(action = name, "action.execute rejected: locked");
			return Ok(Outcome::Rejected(RejectReason::Locked));
		}
		if slot.state.is_working() {
			debug!(action = name, phase = ?slot.state.phase(), "action.execute rejected: already working");
			return Ok(Outcome::Rejected(RejectReason::Running));
		}

		let action = Arc::clone(&slot.action);
		if !action.is_allowed(session, event) {
			debug!(action = name, %event, "action.execute while disallowed");
		}

		let target = session.selected_id();
		{
			let state = &mut self.slots[idx].state;
			state.enter(ActionPhase::Gating);
			state.event = event;
			state.target = target;
		}

		if !action.before(session, event) {
			let state = &mut self.slots[idx].state;
			state.enter(ActionPhase::Cancelled);
			state.enter(ActionPhase::Idle);
			debug!(action = name, %event, "action.cancelled");
			self.raise(session, EventMask::cancel(), Some(id));
			return Ok(Outcome::Cancelled);
		}

		let undo = capture_undo(session, name, action.undo_event());
		let body = BodyCx::new(session.selected().cloned(), event);
		let slot = &mut self.slots[idx];
		slot.state.enter(ActionPhase::Running);
		slot.state.runs += 1;

		if slot.meta.is_async {
			let user = event.contains(EventMask::USER);
			if user {
				slot.state.select_key = Some(session.lock_select());
			}
			slot.undo = undo;
			let class = if user { TaskClass::Interactive } else { TaskClass::Background };
			debug!(action = name, %event, "action.dispatch");
			self.port.dispatch(class, id, move || action.run(&body));
			return Ok(Outcome::Dispatched);
		}

		trace!(action = name, %event, "action.run inline");
		// A panicking body finishes like a failed one, as on the worker path.
		let ok = match std::panic::catch_unwind(AssertUnwindSafe(|| action.run(&body))) {
			Ok(ok) => ok,
			Err(payload) => {
				let failure = WorkerFailure::from_panic(payload);
				warn!(action = name, %failure, "action body failed");
				false
			}
		};
		let result = self.complete(session, idx, ok, undo);
		Ok(Outcome::Finished(result))
	}

	/// Finishes an execution on the home context: releases the selection
	/// key, records undo, runs the after-hook and re-raises its result.
	fn complete(&mut self, session: &mut Session, idx: usize, ok: bool, undo: Option<UndoState>) -> EventMask {
		let slot = &mut self.slots[idx];
		let id = slot.id;
		let name = slot.meta.name;
		let action = Arc::clone(&slot.action);
		let event = slot.state.event;
		let target = slot.state.target;
		slot.state.enter(ActionPhase::Finishing);

		if let Some(key) = slot.state.select_key.take() {
			session.unlock_select(key);
		}
		if let Some(state) = undo {
			if ok {
				session.push_undo(state);
			} else {
				trace!(action = name, "undo state dropped: body failed");
			}
		}

		let result = action.after(session, event, ok);
		self.slots[idx].state.enter(ActionPhase::Idle);

		if !result.is_cancel()
			&& result.contains(EventMask::SAVED_MODEL)
			&& let Some(model) = target
		{
			session.clear_undo(model);
		}

		debug!(action = name, ok, %result, "action.finished");
		self.raise(session, result, Some(id));
		result
	}

	fn finish(&mut self, session: &mut Session, completion: Completion<ActionId, bool>) {
		let Completion { tag: id, outcome } = completion;
		let Ok(idx) = self.slot_index(id) else {
			error!(%id, "completion for unknown action");
			return;
		};
		let ok = match outcome {
			Ok(ok) => ok,
			Err(failure) => {
				warn!(action = self.slots[idx].meta.name, %failure, "action body failed");
				false
			}
		};
		let undo = self.slots[idx].undo.take();
		self.complete(session, idx, ok, undo);
	}

	/// Delivers every completion that is ready, without waiting.
	pub fn pump(&mut self, session: &mut Session) -> usize {
		let mut delivered = 0;
		while let Some(completion) = self.port.try_next() {
			self.finish(session, completion);
			delivered += 1;
		}
		delivered
	}

	/// Waits until no asynchronous body is outstanding, delivering each
	/// completion (and any work it dispatches) as it arrives.
	pub async fn settle(&mut self, session: &mut Session) {
		while let Some(completion) = self.port.next().await {
			self.finish(session, completion);
		}
	}

	/// Delivers completions within the configured budget.
	pub async fn drain(&mut self, session: &mut Session) -> DrainReport {
		let budget = self.budget;
		self.drain_with(session, budget).await
	}

	/// Delivers completions until `budget` is spent or nothing is in flight.
	pub async fn drain_with(&mut self, session: &mut Session, budget: DrainBudget) -> DrainReport {
		let deadline = Instant::now() + budget.duration;
		let mut completed = 0u64;
		while (completed as usize) < budget.max_completions && self.port.in_flight() > 0 {
			let Some(completion) = self.port.next_before(deadline).await else {
				break;
			};
			self.finish(session, completion);
			completed += 1;
		}
		let pending = self.port.in_flight();
		DrainReport {
			completed,
			pending,
			budget_exhausted: pending > 0 && ((completed as usize) >= budget.max_completions || Instant::now() >= deadline),
		}
	}

	/// Recomputes presentation state of one action.
	pub fn refresh(&mut self, session: &Session, id: ActionId, event: EventMask) -> Result<(), EngineError> {
		let idx = self.slot_index(id)?;
		self.refresh_slot(session, idx, event);
		Ok(())
	}

	/// Recomputes presentation state of every action.
	pub fn refresh_all(&mut self, session: &Session, event: EventMask) {
		for idx in 0..self.slots.len() {
			self.refresh_slot(session, idx, event);
		}
	}

	fn refresh_slot(&mut self, session: &Session, idx: usize, event: EventMask) {
		let slot = &mut self.slots[idx];
		let allowed = !slot.state.locked && !slot.state.is_working() && slot.action.is_allowed(session, event);
		slot.state.enabled = allowed;
		slot.state.checked = slot.action.checked(session);
		slot.state.refreshes += 1;
		slot.state.last_refresh = event;
		trace!(action = slot.meta.name, %event, enabled = allowed, "action.refresh");
	}
}

/// Snapshots the selected model for an action that declares an undo mask.
fn capture_undo(session: &Session, action: &'static str, undo_event: EventMask) -> Option<UndoState> {
	if undo_event.is_none() {
		return None;
	}
	if !UndoState::captures_anything(undo_event) {
		error!(action, event = %undo_event, "undo mask selects no model fields; nothing will be captured");
		debug_assert!(false, "undo mask selects no model fields for action {action}");
		return None;
	}
	let model = session.selected()?;
	Some(UndoState::capture(model, undo_event))
}
