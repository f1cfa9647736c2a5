//! Boundaries to the presentation layer, interaction handlers and status line.
//!
//! The cascade calls into these collaborators but never depends on what they
//! do. The null implementations are used until the host installs real ones.

use crate::model::Model;

/// Render-side collaborator driven by the cascade's structural maintenance.
pub trait Presenter {
	/// Rebuilds the presentation of `model` after its mesh changed.
	/// `all_views` asks for every attached view to be rebuilt.
	fn rebuild(&mut self, model: &Model, all_views: bool);

	/// Resynchronises presentation transforms after an alignment change.
	fn sync_transform(&mut self, model: &Model, all_views: bool);

	/// Flushes pending updates once a cascade has settled.
	fn flush(&mut self);
}

/// Interactive handlers (pickers, draggers) layered over the viewers.
pub trait InteractionHandlers {
	/// Called once per raised event so handlers can track model changes.
	fn refresh_all(&mut self);

	/// Whether the named handler is currently available.
	fn supports(&self, _handler: &str) -> bool {
		false
	}
}

/// Fire-and-forget status messages for the user.
pub trait StatusSink {
	fn show(&mut self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
	fn rebuild(&mut self, _model: &Model, _all_views: bool) {}

	fn sync_transform(&mut self, _model: &Model, _all_views: bool) {}

	fn flush(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullInteractions;

impl InteractionHandlers for NullInteractions {
	fn refresh_all(&mut self) {}
}

/// Forwards status messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
	fn show(&mut self, message: &str) {
		tracing::info!(target: "cranio::status", "{message}");
	}
}
