//! Coordination core for the cranio model workbench.
//!
//! Every operation the user can perform on a loaded model is an [`Action`].
//! Actions declare which [`EventMask`]s make them purge cached state, run
//! again, or merely refresh their presentation. The [`Orchestrator`] owns
//! all registered actions and, whenever a change is raised, runs the
//! cascade that keeps them consistent.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator (home context)              Session
//! ┌──────────────────────────┐            ┌─────────────────────────────┐
//! │ slots: Vec<ActionSlot>   │  &mut      │ models: Arc<Model>          │
//! │ acted: ActionId → mask   │──────────► │ selected + SelectionLock    │
//! │ depth                    │            │ undo: ModelId → UndoStack   │
//! │ port: CompletionPort     │            │ presenter / interactions    │
//! └────────────┬─────────────┘            └─────────────────────────────┘
//!              │ dispatch / completion
//!              ▼
//!        blocking pool (action bodies)
//! ```
//!
//! [`EventMask`]: cranio_primitives::EventMask

pub mod action;
pub mod builtin;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod present;
pub mod selection;
pub mod session;
pub mod telemetry;
pub mod undo;

pub use action::{Action, ActionMeta, ActionPhase, ActionSpec, ActionState, BodyCx};
pub use config::{EngineConfig, LogConfig, UndoConfig, WorkerConfig};
pub use cranio_primitives::{ActionId, EventMask, ModelId, ViewerId};
pub use error::{ConfigError, EngineError, SessionError};
pub use model::{Model, ModelData, SavedFlags};
pub use orchestrator::{Orchestrator, Outcome, RejectReason};
pub use present::{InteractionHandlers, LogStatus, NullInteractions, NullPresenter, Presenter, StatusSink};
pub use selection::{SelectKey, SelectionLock};
pub use session::Session;
pub use undo::{UndoStack, UndoState};
