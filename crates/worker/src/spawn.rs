//! Task placement: the runtime the host is already running on, or a small
//! shared runtime for hosts that drive the engine from plain threads.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

fn ambient_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK
		.get_or_init(|| {
			tracing::debug!("worker.fallback_runtime starting");
			Builder::new_multi_thread()
				.enable_all()
				.worker_threads(1)
				.thread_name("cranio-worker")
				.build()
				.expect("failed to build cranio-worker fallback runtime")
		})
		.handle()
		.clone()
}

/// Runs a blocking action body on the blocking pool inside a `worker.body` span.
pub fn spawn_blocking<F, R>(class: TaskClass, body: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	let span = tracing::debug_span!("worker.body", worker_class = class.as_str());
	ambient_handle().spawn_blocking(move || span.in_scope(body))
}

/// Spawns the async half of a dispatch (the task that forwards a body's result).
pub(crate) fn spawn_forwarder<F>(class: TaskClass, fut: F)
where
	F: Future<Output = ()> + Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_forwarder");
	drop(ambient_handle().spawn(fut));
}
