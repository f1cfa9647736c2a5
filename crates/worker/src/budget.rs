use std::time::Duration;

/// Limits for one drain of pending completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainBudget {
	/// Wall-clock time the drain may spend waiting.
	pub duration: Duration,
	/// Maximum number of completions delivered in one drain.
	pub max_completions: usize,
}

impl Default for DrainBudget {
	fn default() -> Self {
		Self {
			duration: Duration::from_millis(8),
			max_completions: 64,
		}
	}
}

/// Outcome of one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
	/// Completions delivered during this drain.
	pub completed: u64,
	/// Dispatches still in flight after the drain.
	pub pending: usize,
	/// True when the drain stopped because the budget ran out.
	pub budget_exhausted: bool,
}
