use std::time::Instant;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::spawn::{spawn_blocking, spawn_forwarder};
use crate::{TaskClass, WorkerFailure};

/// One finished dispatch, tagged with the value supplied at dispatch time.
#[derive(Debug)]
pub struct Completion<T, R> {
	pub tag: T,
	pub outcome: Result<R, WorkerFailure>,
}

/// Dispatches blocking bodies and collects exactly one completion per body.
///
/// The port is owned by the home context. Bodies run on the blocking pool;
/// a forwarding task waits on the body's join handle and posts the result
/// (or the panic) back through an unbounded channel, so every dispatch
/// yields one [`Completion`] whether the body returned or panicked.
#[derive(Debug)]
pub struct CompletionPort<T, R> {
	tx: UnboundedSender<Completion<T, R>>,
	rx: UnboundedReceiver<Completion<T, R>>,
	in_flight: usize,
	dispatched_total: u64,
}

impl<T, R> Default for CompletionPort<T, R>
where
	T: Send + 'static,
	R: Send + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T, R> CompletionPort<T, R>
where
	T: Send + 'static,
	R: Send + 'static,
{
	/// Creates an idle port.
	pub fn new() -> Self {
		let (tx, rx) = unbounded_channel();
		Self {
			tx,
			rx,
			in_flight: 0,
			dispatched_total: 0,
		}
	}

	/// Runs `body` on the blocking pool; its completion is delivered under `tag`.
	pub fn dispatch<F>(&mut self, class: TaskClass, tag: T, body: F)
	where
		F: FnOnce() -> R + Send + 'static,
	{
		self.in_flight += 1;
		self.dispatched_total += 1;
		tracing::trace!(worker_class = class.as_str(), in_flight = self.in_flight, "worker.dispatch");

		let tx = self.tx.clone();
		let handle = spawn_blocking(class, body);
		spawn_forwarder(class, async move {
			let outcome = handle.await.map_err(WorkerFailure::from);
			if tx.send(Completion { tag, outcome }).is_err() {
				tracing::debug!("worker.completion dropped: port closed");
			}
		});
	}

	/// Number of dispatches whose completion has not been taken yet.
	pub fn in_flight(&self) -> usize {
		self.in_flight
	}

	/// Total dispatches since creation.
	pub fn dispatched_total(&self) -> u64 {
		self.dispatched_total
	}

	/// Takes one ready completion without waiting.
	pub fn try_next(&mut self) -> Option<Completion<T, R>> {
		let completion = self.rx.try_recv().ok()?;
		self.in_flight = self.in_flight.saturating_sub(1);
		Some(completion)
	}

	/// Waits for the next completion. Returns `None` when nothing is in flight.
	pub async fn next(&mut self) -> Option<Completion<T, R>> {
		if self.in_flight == 0 {
			return None;
		}
		let completion = self.rx.recv().await?;
		self.in_flight = self.in_flight.saturating_sub(1);
		Some(completion)
	}

	/// Waits for the next completion until `deadline`.
	pub async fn next_before(&mut self, deadline: Instant) -> Option<Completion<T, R>> {
		let remaining = deadline.saturating_duration_since(Instant::now());
		tokio::time::timeout(remaining, self.next()).await.ok().flatten()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn delivers_one_completion_per_dispatch() {
		let mut port: CompletionPort<u32, u32> = CompletionPort::new();
		port.dispatch(TaskClass::Background, 1, || 10);
		port.dispatch(TaskClass::Background, 2, || 20);
		assert_eq!(port.in_flight(), 2);

		let mut seen = Vec::new();
		while let Some(done) = port.next().await {
			seen.push((done.tag, done.outcome.unwrap()));
		}
		seen.sort();
		assert_eq!(seen, vec![(1, 10), (2, 20)]);
		assert_eq!(port.in_flight(), 0);
		assert_eq!(port.dispatched_total(), 2);
	}

	#[tokio::test]
	async fn panicking_body_reports_failure() {
		let mut port: CompletionPort<&'static str, ()> = CompletionPort::new();
		port.dispatch(TaskClass::Interactive, "boom", || panic!("body exploded"));

		let done = port.next().await.expect("completion");
		assert_eq!(done.tag, "boom");
		match done.outcome {
			Err(WorkerFailure::Panicked(msg)) => assert!(msg.contains("body exploded")),
			other => panic!("unexpected outcome: {other:?}"),
		}
		assert!(port.next().await.is_none());
	}

	#[tokio::test]
	async fn next_before_times_out_on_slow_body() {
		let mut port: CompletionPort<(), ()> = CompletionPort::new();
		port.dispatch(TaskClass::Background, (), || std::thread::sleep(Duration::from_millis(200)));

		let early = port.next_before(Instant::now() + Duration::from_millis(5)).await;
		assert!(early.is_none());
		assert_eq!(port.in_flight(), 1);

		assert!(port.next().await.is_some());
	}

	#[test]
	fn try_next_is_empty_when_idle() {
		let mut port: CompletionPort<(), ()> = CompletionPort::new();
		assert!(port.try_next().is_none());
		assert!(tokio_test_block_on(port.next()).is_none());
	}

	fn tokio_test_block_on<F: std::future::Future>(fut: F) -> F::Output {
		tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(fut)
	}
}
