use std::path::PathBuf;

use cranio_primitives::{ActionId, ModelId};
use thiserror::Error;

/// Errors from selecting, adding or closing models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	#[error("unknown model: {0}")]
	UnknownModel(ModelId),
	#[error("selection is locked by outstanding work")]
	SelectionLocked,
}

/// Errors loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Top-level engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("unknown action: {0}")]
	UnknownAction(ActionId),
	#[error(transparent)]
	Session(#[from] SessionError),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("failed to install log subscriber: {0}")]
	Telemetry(String),
}
