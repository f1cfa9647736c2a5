use cranio_primitives::EventMask;

/// Human-facing description of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMeta {
	pub name: &'static str,
	pub tooltip: &'static str,
	/// Run the body on the blocking pool instead of the home context.
	pub is_async: bool,
}

impl ActionMeta {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			tooltip: "",
			is_async: false,
		}
	}

	#[must_use]
	pub const fn tooltip(mut self, tooltip: &'static str) -> Self {
		self.tooltip = tooltip;
		self
	}

	#[must_use]
	pub const fn asynchronous(mut self) -> Self {
		self.is_async = true;
		self
	}
}

/// The event masks an action declares interest in.
///
/// Built by the action and read exactly once, when the orchestrator
/// registers it; from then on the masks cannot change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSpec {
	purge_on: EventMask,
	trigger_on: EventMask,
	refresh_on: EventMask,
}

impl ActionSpec {
	pub const fn new() -> Self {
		Self {
			purge_on: EventMask::empty(),
			trigger_on: EventMask::empty(),
			refresh_on: EventMask::empty(),
		}
	}

	/// Drop cached state when any of these flags are raised.
	#[must_use]
	pub const fn purge_on(mut self, events: EventMask) -> Self {
		self.purge_on = self.purge_on.union(events);
		self
	}

	/// Execute when any of these flags are raised.
	#[must_use]
	pub const fn trigger_on(mut self, events: EventMask) -> Self {
		self.trigger_on = self.trigger_on.union(events);
		self
	}

	/// Recompute presentation state when any of these flags are raised.
	#[must_use]
	pub const fn refresh_on(mut self, events: EventMask) -> Self {
		self.refresh_on = self.refresh_on.union(events);
		self
	}

	pub fn purges(&self, event: EventMask) -> bool {
		self.purge_on.intersects(event)
	}

	pub fn triggers(&self, event: EventMask) -> bool {
		self.trigger_on.intersects(event)
	}

	/// False when [`Self::triggers`] also matches: triggering takes precedence.
	pub fn refreshes(&self, event: EventMask) -> bool {
		!self.triggers(event) && self.refresh_on.intersects(event)
	}
}
