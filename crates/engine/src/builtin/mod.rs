//! Actions every host registers.

mod undo;

pub use undo::UndoLast;
