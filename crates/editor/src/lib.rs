//! Edit/cursor engine for linedit.
//!
//! [`Editor`] owns the wrapped document, the cursor, the selection state
//! machine and the undo history. Input handlers drive it either through
//! its methods or through [`EditorCommand::execute`].

mod command;
mod editing;
mod editor;
mod history;
mod repeat;
mod search;
mod selection;
mod viewport;

pub use command::{CommandOutput, EditorCommand};
pub use editor::Editor;
pub use history::{Action, History};
pub use repeat::{Movement, RepeatTracker};
pub use selection::{BoundSource, Selection};
pub use viewport::Viewport;
