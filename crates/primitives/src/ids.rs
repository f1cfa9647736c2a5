use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique model IDs.
static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a registered action.
///
/// Assigned by the orchestrator at registration time; the raw value is the
/// action's position in registration (dispatch) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u32);

impl ActionId {
	/// Returns the registration index.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for ActionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "action#{}", self.0)
	}
}

/// Unique identifier for a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(pub u64);

impl ModelId {
	/// Generates a new unique model ID.
	pub fn next() -> Self {
		Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ModelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "model#{}", self.0)
	}
}

/// Identifier for a viewer (one 3D viewport) a model can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(pub u16);

impl ViewerId {
	/// The primary viewer every model is shown in.
	pub const PRIMARY: ViewerId = ViewerId(0);
}
