//! Command dispatch for the editor.
//!
//! Input handlers translate their events into an `EditorCommand` and run it
//! against the editor, one command at a time. Key and mouse bindings live
//! with the handler, not here.

use anyhow::Result;

use linedit_buffer::{Point, Range};
use linedit_text_search::{compile_pattern, SearchOptions};

use crate::editor::Editor;
use crate::repeat::Movement;

/// Editor command representing a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // Navigation
    MoveCursorUp,
    MoveCursorDown,
    MoveCursorLeft,
    MoveCursorRight,
    MoveWordLeft,
    MoveWordRight,
    MoveToLineStart,
    MoveToLineEnd,
    MoveToDocumentStart,
    MoveToDocumentEnd,
    PageUp,
    PageDown,

    // Scrolling (cursor stays)
    ScrollUp(usize),
    ScrollDown(usize),

    // Selection
    MarkSelection,
    ResetSelection,
    SelectWord,
    SelectAll,

    // Mouse, in viewport coordinates
    MousePress(Point),
    MouseDrag(Point),
    MouseRelease(Point),

    // Text editing
    InsertChar(char),
    InsertText(String),
    InsertNewline,
    Backspace,
    Delete,
    IndentLines,
    UnindentLines,

    // Undo/Redo
    Undo,
    Redo,
    UndoAll,

    // Clipboard
    Copy,
    Cut,
    Paste(String),

    // Search
    Search {
        pattern: String,
        options: SearchOptions,
    },
    SearchNext,
    SearchPrev,

    /// Terminal size change
    Resize { width: usize, height: usize },

    // No operation (for unhandled input)
    None,
}

/// Result of executing a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandOutput {
    #[default]
    None,
    /// Copied or cut text, for the clipboard
    Text(String),
    /// Outcome of a search command
    Match(Option<Range>),
}

impl EditorCommand {
    /// Execute this command on the given editor.
    ///
    /// Only a search with an invalid pattern fails; in that case the editor
    /// is left unchanged.
    pub fn execute(self, editor: &mut Editor) -> Result<CommandOutput> {
        match self {
            Self::MoveCursorUp => editor.move_cursor(Movement::Up),
            Self::MoveCursorDown => editor.move_cursor(Movement::Down),
            Self::MoveCursorLeft => editor.move_cursor(Movement::Left),
            Self::MoveCursorRight => editor.move_cursor(Movement::Right),
            Self::MoveWordLeft => editor.move_cursor(Movement::WordLeft),
            Self::MoveWordRight => editor.move_cursor(Movement::WordRight),
            Self::MoveToLineStart => editor.move_to_line_start(),
            Self::MoveToLineEnd => editor.move_to_line_end(),
            Self::MoveToDocumentStart => editor.move_to_document_start(),
            Self::MoveToDocumentEnd => editor.move_to_document_end(),
            Self::PageUp => editor.page_up(),
            Self::PageDown => editor.page_down(),

            Self::ScrollUp(rows) => {
                editor.scroll_up(rows);
            }
            Self::ScrollDown(rows) => {
                editor.scroll_down(rows);
            }

            Self::MarkSelection => editor.mark_selection(),
            Self::ResetSelection => editor.reset_selection(),
            Self::SelectWord => {
                editor.select_word();
            }
            Self::SelectAll => editor.select_all(),

            Self::MousePress(position) => editor.mouse_press(position),
            Self::MouseDrag(position) => editor.mouse_drag(position),
            Self::MouseRelease(position) => editor.mouse_release(position),

            Self::InsertChar(ch) => editor.insert_char(ch),
            Self::InsertText(text) => editor.insert_text(&text),
            Self::InsertNewline => editor.insert_newline(),
            Self::Backspace => editor.backspace(),
            Self::Delete => editor.delete(),
            Self::IndentLines => editor.indent_lines(),
            Self::UnindentLines => editor.unindent_lines(),

            Self::Undo => {
                editor.undo();
            }
            Self::Redo => {
                editor.redo();
            }
            Self::UndoAll => {
                editor.undo_all();
            }

            Self::Copy => {
                if let Some(text) = editor.copy_selection() {
                    return Ok(CommandOutput::Text(text));
                }
            }
            Self::Cut => {
                if let Some(text) = editor.cut_selection() {
                    return Ok(CommandOutput::Text(text));
                }
            }
            Self::Paste(text) => editor.paste(&text),

            Self::Search { pattern, options } => {
                let regex = compile_pattern(&pattern, &options)?;
                let from_line = editor.text_cursor().line;
                return Ok(CommandOutput::Match(
                    editor.search_regexp(&regex, from_line, true),
                ));
            }
            Self::SearchNext => return Ok(CommandOutput::Match(editor.search_next())),
            Self::SearchPrev => return Ok(CommandOutput::Match(editor.search_prev())),

            Self::Resize { width, height } => editor.resize(width, height),

            Self::None => {}
        }

        Ok(CommandOutput::None)
    }

    /// Whether the command can change document text
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertText(_)
                | Self::InsertNewline
                | Self::Backspace
                | Self::Delete
                | Self::IndentLines
                | Self::UnindentLines
                | Self::Undo
                | Self::Redo
                | Self::UndoAll
                | Self::Cut
                | Self::Paste(_)
        )
    }
}
