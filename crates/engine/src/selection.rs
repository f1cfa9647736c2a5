//! Keyed lock over which model is selected.
//!
//! While user-initiated asynchronous work is outstanding the selected model
//! must not change. Each [`SelectionLock::lock`] mints a fresh key; only the
//! holder of the most recent key can release the lock, and a key works once.

use std::fmt;
use std::num::NonZeroU64;

use tracing::{debug, trace, warn};

/// Single-use key returned by [`SelectionLock::lock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectKey(NonZeroU64);

impl SelectKey {
	pub fn get(self) -> u64 {
		self.0.get()
	}
}

impl fmt::Display for SelectKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug)]
pub struct SelectionLock {
	active: Option<SelectKey>,
	outstanding: usize,
	next: u64,
}

impl Default for SelectionLock {
	fn default() -> Self {
		Self::new()
	}
}

impl SelectionLock {
	pub fn new() -> Self {
		Self {
			active: None,
			outstanding: 0,
			next: 0,
		}
	}

	/// Engages the lock under a key that has never been issued before.
	///
	/// Locking while already locked replaces the active key; the earlier
	/// key can no longer release the lock.
	pub fn lock(&mut self) -> SelectKey {
		self.next += 1;
		let key = SelectKey(NonZeroU64::MIN.saturating_add(self.next - 1));
		self.active = Some(key);
		self.outstanding += 1;
		debug!(key = %key, outstanding = self.outstanding, "selection.lock");
		key
	}

	/// Releases the lock if `key` is the active key. Returns whether it did.
	pub fn unlock(&mut self, key: SelectKey) -> bool {
		if self.active != Some(key) {
			trace!(key = %key, active = ?self.active.map(SelectKey::get), "selection.unlock ignored: stale key");
			return false;
		}
		debug!(key = %key, released = self.outstanding, "selection.unlock");
		self.active = None;
		self.outstanding = 0;
		true
	}

	/// Releases the lock regardless of key, for tearing down a model while
	/// asynchronous work on it is still outstanding.
	pub fn force_unlock(&mut self) {
		if let Some(key) = self.active.take() {
			warn!(key = %key, outstanding = self.outstanding, "selection.force_unlock");
		}
		self.outstanding = 0;
	}

	pub fn is_locked(&self) -> bool {
		self.active.is_some()
	}

	/// Locks taken since the lock was last released.
	pub fn outstanding(&self) -> usize {
		self.outstanding
	}
}
