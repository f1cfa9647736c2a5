use std::any::Any;

use thiserror::Error;
use tokio::task::JoinError;

/// Why a dispatched body produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerFailure {
	#[error("worker body panicked: {0}")]
	Panicked(String),
	#[error("worker body was cancelled before completing")]
	Cancelled,
}

impl WorkerFailure {
	/// Wraps a payload caught by `catch_unwind` or carried by a [`JoinError`].
	pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
		let message = payload
			.downcast_ref::<&'static str>()
			.map(|s| (*s).to_owned())
			.or_else(|| payload.downcast_ref::<String>().cloned())
			.unwrap_or_else(|| "<non-string panic payload>".to_owned());
		Self::Panicked(message)
	}
}

impl From<JoinError> for WorkerFailure {
	fn from(err: JoinError) -> Self {
		if err.is_panic() { Self::from_panic(err.into_panic()) } else { Self::Cancelled }
	}
}
