//! Editing core for terminal text editors.
//!
//! linedit keeps a document as terminated lines, projects it onto a
//! fixed-width window with lazy soft wrapping, and drives a cursor,
//! selection and undo history over it. Rendering, key bindings and the
//! clipboard belong to the embedding program; this crate only consumes
//! and produces text.
//!
//! ```no_run
//! use linedit::{Config, EditorCommand};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load("linedit.toml".as_ref())?;
//! linedit::init_logging(&config.logging)?;
//!
//! let mut editor = linedit::open_file("notes.txt".as_ref(), &config.editor)?;
//! EditorCommand::InsertText("hello".to_string()).execute(&mut editor)?;
//! linedit::save_file(&mut editor, "notes.txt".as_ref())?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub use linedit_buffer as buffer;
pub use linedit_config as config;
pub use linedit_editor as editor;
pub use linedit_logger as logger;
pub use linedit_text_search as text_search;

pub use linedit_buffer::{
    IndentType, Point, Range, TextBuffer, WrapMap, WrapOptions, WrappedSegment,
};
pub use linedit_config::{Config, EditorSettings, LoggingSettings, RepeatSettings};
pub use linedit_editor::{
    CommandOutput, Editor, EditorCommand, Movement, Selection, Viewport,
};
pub use linedit_logger::LogLevel;
pub use linedit_text_search::{compile_pattern, SearchOptions};
pub use regex::Regex;

/// Install the log backend described by the logging settings
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let level: LogLevel = settings
        .min_level
        .parse()
        .map_err(|err: String| anyhow!(err))
        .context("Invalid logging.min_level")?;

    linedit_logger::init(
        settings.file_path.as_ref().map(PathBuf::from),
        settings.max_entries,
        level,
    );
    Ok(())
}

/// Open a file into a new editor
pub fn open_file(path: &Path, settings: &EditorSettings) -> Result<Editor> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let editor = Editor::from_reader(BufReader::new(file), settings)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    log::info!("Opened {}", path.display());
    Ok(editor)
}

/// Write the editor's document to a file, marking it saved
pub fn save_file(editor: &mut Editor, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    editor
        .write_to(file)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Saved {}", path.display());
    Ok(())
}
