use cranio_primitives::{EventMask, ModelId};

use crate::selection::SelectKey;

/// Lifecycle phase of one action.
///
/// ```text
/// Idle ─► Gating ─┬─► Cancelled ─► Idle
///                 └─► Running ─► Finishing ─► Idle
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionPhase {
	#[default]
	Idle,
	/// The before-hook is deciding whether to run.
	Gating,
	/// The before-hook declined.
	Cancelled,
	/// The body is executing, inline or on a worker.
	Running,
	/// The after-hook is running on the home context.
	Finishing,
}

impl ActionPhase {
	fn can_enter(self, next: Self) -> bool {
		matches!(
			(self, next),
			(Self::Idle, Self::Gating)
				| (Self::Gating, Self::Cancelled | Self::Running)
				| (Self::Cancelled, Self::Idle)
				| (Self::Running, Self::Finishing)
				| (Self::Finishing, Self::Idle)
		)
	}
}

/// Mutable runtime state the orchestrator keeps for each action.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
	phase: ActionPhase,
	/// Explicitly disabled: every execution is refused.
	pub(crate) locked: bool,
	/// Presentation state from the last refresh.
	pub(crate) enabled: bool,
	pub(crate) checked: Option<bool>,
	/// Event of the current (or last) invocation.
	pub(crate) event: EventMask,
	/// Model selected when the current invocation started.
	pub(crate) target: Option<ModelId>,
	/// Held while a user-initiated asynchronous body runs.
	pub(crate) select_key: Option<SelectKey>,
	pub(crate) runs: u64,
	pub(crate) refreshes: u64,
	pub(crate) last_refresh: EventMask,
}

impl ActionState {
	pub fn phase(&self) -> ActionPhase {
		self.phase
	}

	/// True from the before-hook until the after-hook has returned.
	pub fn is_working(&self) -> bool {
		self.phase != ActionPhase::Idle
	}

	pub fn is_running(&self) -> bool {
		self.phase == ActionPhase::Running
	}

	pub fn is_locked(&self) -> bool {
		self.locked
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn checked(&self) -> Option<bool> {
		self.checked
	}

	pub fn event(&self) -> EventMask {
		self.event
	}

	/// Bodies started since registration.
	pub fn runs(&self) -> u64 {
		self.runs
	}

	/// Refreshes since registration.
	pub fn refreshes(&self) -> u64 {
		self.refreshes
	}

	/// Mask passed to the most recent refresh.
	pub fn last_refresh(&self) -> EventMask {
		self.last_refresh
	}

	pub(crate) fn enter(&mut self, next: ActionPhase) {
		debug_assert!(self.phase.can_enter(next), "illegal action transition {:?} -> {:?}", self.phase, next);
		tracing::trace!(from = ?self.phase, to = ?next, "action.phase");
		self.phase = next;
	}
}
