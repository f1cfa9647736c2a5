//! Shared fixtures for orchestrator integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cranio_engine::model::{Mesh, Model, ModelData};
use cranio_engine::{Action, ActionMeta, ActionSpec, BodyCx, EventMask, InteractionHandlers, ModelId, Presenter, Session, StatusSink};
use parking_lot::Mutex;

/// Ordered record of everything the fixtures observed.
#[derive(Debug, Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
	pub fn push(&self, entry: impl Into<String>) {
		self.0.lock().push(entry.into());
	}

	pub fn entries(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	pub fn count(&self, entry: &str) -> usize {
		self.0.lock().iter().filter(|e| *e == entry).count()
	}

	pub fn position(&self, entry: &str) -> Option<usize> {
		self.0.lock().iter().position(|e| e == entry)
	}
}

pub struct RecordingPresenter(pub Log);

impl Presenter for RecordingPresenter {
	fn rebuild(&mut self, _model: &Model, all_views: bool) {
		self.0.push(format!("rebuild all_views={all_views}"));
	}

	fn sync_transform(&mut self, _model: &Model, all_views: bool) {
		self.0.push(format!("sync_transform all_views={all_views}"));
	}

	fn flush(&mut self) {
		self.0.push("flush");
	}
}

pub struct RecordingInteractions(pub Log);

impl InteractionHandlers for RecordingInteractions {
	fn refresh_all(&mut self) {
		self.0.push("interactions");
	}
}

pub struct RecordingStatus(pub Log);

impl StatusSink for RecordingStatus {
	fn show(&mut self, message: &str) {
		self.0.push(format!("status: {message}"));
	}
}

/// Session with recording collaborators and one selected model.
pub fn session(log: &Log) -> (Session, ModelId) {
	let mut session = Session::default()
		.with_presenter(RecordingPresenter(log.clone()))
		.with_interactions(RecordingInteractions(log.clone()))
		.with_status(RecordingStatus(log.clone()));
	let id = session.add_model("subject", ModelData::new(tri()));
	session.select(Some(id)).unwrap();
	(session, id)
}

pub fn tri() -> Mesh {
	Mesh::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![[0, 1, 2]])
}

type Mutation = dyn Fn(&mut ModelData) + Send + Sync;

/// Configurable action that logs each hook as `<name>.<hook>`.
pub struct Probe {
	name: &'static str,
	spec: ActionSpec,
	emits: EventMask,
	is_async: bool,
	allowed: bool,
	before_ok: bool,
	body_ok: bool,
	panics: bool,
	delay: Option<Duration>,
	undo_event: EventMask,
	discards_undo: bool,
	mutation: Option<Box<Mutation>>,
	log: Log,
}

impl Probe {
	pub fn new(name: &'static str, log: &Log) -> Self {
		Self {
			name,
			spec: ActionSpec::new(),
			emits: EventMask::none(),
			is_async: false,
			allowed: true,
			before_ok: true,
			body_ok: true,
			panics: false,
			delay: None,
			undo_event: EventMask::none(),
			discards_undo: false,
			mutation: None,
			log: log.clone(),
		}
	}

	pub fn spec(mut self, spec: ActionSpec) -> Self {
		self.spec = spec;
		self
	}

	pub fn emits(mut self, emits: EventMask) -> Self {
		self.emits = emits;
		self
	}

	pub fn asynchronous(mut self) -> Self {
		self.is_async = true;
		self
	}

	pub fn disallowed(mut self) -> Self {
		self.allowed = false;
		self
	}

	pub fn declines(mut self) -> Self {
		self.before_ok = false;
		self
	}

	pub fn fails(mut self) -> Self {
		self.body_ok = false;
		self
	}

	pub fn panics(mut self) -> Self {
		self.panics = true;
		self
	}

	pub fn delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn undo(mut self, event: EventMask) -> Self {
		self.undo_event = event;
		self
	}

	/// Drops the undo state recorded for this run from the after-hook, as a
	/// body that turned out to change nothing would.
	pub fn discards_undo(mut self) -> Self {
		self.discards_undo = true;
		self
	}

	pub fn mutates(mut self, f: impl Fn(&mut ModelData) + Send + Sync + 'static) -> Self {
		self.mutation = Some(Box::new(f));
		self
	}
}

impl Action for Probe {
	fn meta(&self) -> ActionMeta {
		let meta = ActionMeta::new(self.name);
		if self.is_async { meta.asynchronous() } else { meta }
	}

	fn spec(&self) -> ActionSpec {
		self.spec
	}

	fn is_allowed(&self, _session: &Session, _event: EventMask) -> bool {
		self.allowed
	}

	fn undo_event(&self) -> EventMask {
		self.undo_event
	}

	fn purge(&self, _session: &mut Session, _model: Option<ModelId>, event: EventMask) {
		self.log.push(format!("{}.purge {event}", self.name));
	}

	fn before(&self, _session: &mut Session, _event: EventMask) -> bool {
		self.log.push(format!("{}.before", self.name));
		self.before_ok
	}

	fn run(&self, cx: &BodyCx) -> bool {
		self.log.push(format!("{}.run", self.name));
		if let Some(delay) = self.delay {
			std::thread::sleep(delay);
		}
		if self.panics {
			panic!("{} body panicked", self.name);
		}
		if let (Some(mutate), Some(model)) = (&self.mutation, cx.model()) {
			mutate(&mut model.write());
		}
		self.body_ok
	}

	fn after(&self, session: &mut Session, _event: EventMask, ok: bool) -> EventMask {
		self.log.push(format!("{}.after ok={ok}", self.name));
		if ok
			&& self.discards_undo
			&& let Some(model) = session.selected_id()
		{
			let discarded = session.discard_last_undo(model);
			self.log.push(format!("{}.discarded={discarded}", self.name));
			return EventMask::none();
		}
		if ok { self.emits } else { EventMask::ERR_MSG }
	}
}
