//! Engine configuration.
//!
//! Loaded from TOML; every field has a default so an empty document (or no
//! file at all) yields a working configuration.
//!
//! ```toml
//! [undo]
//! limit = 50
//!
//! [worker]
//! drain_budget_ms = 4
//! max_completions = 16
//!
//! [log]
//! verbose = true
//! ```

use std::path::Path;
use std::time::Duration;

use cranio_worker::DrainBudget;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	pub undo: UndoConfig,
	pub worker: WorkerConfig,
	pub log: LogConfig,
}

impl EngineConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UndoConfig {
	/// Undo states kept per model before the oldest is dropped.
	pub limit: usize,
}

impl Default for UndoConfig {
	fn default() -> Self {
		Self { limit: 32 }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
	/// Time one drain of completions may spend waiting.
	pub drain_budget_ms: u64,
	/// Completions delivered per drain.
	pub max_completions: usize,
}

impl WorkerConfig {
	pub fn budget(&self) -> DrainBudget {
		DrainBudget {
			duration: Duration::from_millis(self.drain_budget_ms),
			max_completions: self.max_completions,
		}
	}
}

impl Default for WorkerConfig {
	fn default() -> Self {
		let budget = DrainBudget::default();
		Self {
			drain_budget_ms: budget.duration.as_millis() as u64,
			max_completions: budget.max_completions,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// Log at DEBUG instead of INFO.
	pub verbose: bool,
}
