//! Log subscriber installation for hosts embedding the engine.

use crate::config::LogConfig;
use crate::error::EngineError;

/// Installs a global `fmt` subscriber at INFO, or DEBUG when verbose.
pub fn init(config: &LogConfig) -> Result<(), EngineError> {
	let level = if config.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(true)
		.try_init()
		.map_err(|e| EngineError::Telemetry(e.to_string()))
}
