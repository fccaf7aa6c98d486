//! Text editing operations for the editor.
//!
//! Each operation mutates the document through the mapper, records one
//! history action and re-derives the cursor from its new text point.

use linedit_buffer::{leading_whitespace, IndentType, Point, Range};

use crate::editor::{step_right, Editor};
use crate::history::Action;

impl Editor {
    /// Delete an active selection, returning its byte offset and its action
    fn take_selection(&mut self) -> Option<(usize, Action)> {
        let range = self.selection.active_range()?;
        let at = self.map.buffer().byte_offset_of(range.begin);
        let text = self.map.delete_range(range);
        self.selection.reset();
        Some((at, Action::Delete { at, text }))
    }

    /// Byte offset an edit applies at, taking an active selection out first
    fn edit_offset(&mut self) -> (usize, Option<Action>) {
        match self.take_selection() {
            Some((at, delete)) => (at, Some(delete)),
            None => {
                let cursor = self.text_cursor();
                (self.map.buffer().byte_offset_of(cursor), None)
            }
        }
    }

    /// Record an edit that may have replaced a selection
    fn record(&mut self, replaced: Option<Action>, action: Action) {
        match replaced {
            Some(delete) => self.history.push(Action::Group {
                actions: vec![delete, action],
            }),
            None => self.history.push(action),
        }
    }

    /// Common tail of every edit
    fn finish_edit(&mut self, cursor: Point) {
        self.selection.reset();
        self.repeat.reset();
        self.set_text_cursor(cursor);
        self.ensure_cursor_visible();
    }

    /// Insert text at the cursor, replacing an active selection
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() && !self.selection.is_active() {
            return;
        }

        let (at, replaced) = self.edit_offset();
        let after = self.map.insert_at_byte(at, text);
        self.record(
            replaced,
            Action::Insert {
                at,
                text: text.to_string(),
            },
        );
        self.finish_edit(after);
    }

    /// Insert a single character
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf));
    }

    /// Paste clipboard text at the cursor
    pub fn paste(&mut self, text: &str) {
        self.insert_text(text);
    }

    /// Split the line at the cursor, copying its indentation
    pub fn insert_newline(&mut self) {
        let (offset, replaced) = self.edit_offset();
        let at = self.map.buffer().point_at_byte(offset);
        let offset = self.map.buffer().byte_offset_of(at);

        let indent = if self.settings.auto_indent {
            let content = self.map.buffer().line_content(at.line).unwrap_or_default();
            let prefix = leading_whitespace(&content);
            // Whitespace is single-byte, so columns are bytes here
            prefix[..prefix.len().min(at.column)].to_string()
        } else {
            String::new()
        };

        let line_start = self.map.insert_line_break(at);
        let after = self.map.insert(line_start, &indent);
        let text = self.map.buffer().copy_range(Range::new(at, after));

        self.record(replaced, Action::Insert { at: offset, text });
        self.finish_edit(after);
    }

    /// Delete the selection, or one grapheme before the cursor
    pub fn backspace(&mut self) {
        if let Some((at, delete)) = self.take_selection() {
            self.history.push(delete);
            let cursor = self.map.buffer().point_at_byte(at);
            self.finish_edit(cursor);
            return;
        }

        let cursor = self.text_cursor();
        let end = self.map.buffer().byte_offset_of(cursor);
        if let Some(deletion) = self.map.delete_char(cursor) {
            let at = end - deletion.text.len();
            self.history.push(Action::Delete {
                at,
                text: deletion.text,
            });
            let cursor = self.map.buffer().point_at_byte(at);
            self.finish_edit(cursor);
        }
    }

    /// Delete the selection, or one grapheme after the cursor
    pub fn delete(&mut self) {
        if let Some((at, delete)) = self.take_selection() {
            self.history.push(delete);
            let cursor = self.map.buffer().point_at_byte(at);
            self.finish_edit(cursor);
            return;
        }

        let cursor = self.text_cursor();
        let end = step_right(self.map.buffer(), cursor);
        if end == cursor {
            return;
        }

        let at = self.map.buffer().byte_offset_of(cursor);
        let text = self.map.delete_range(Range::new(cursor, end));
        self.history.push(Action::Delete { at, text });
        let cursor = self.map.buffer().point_at_byte(at);
        self.finish_edit(cursor);
    }

    /// Text of the active selection
    pub fn copy_selection(&self) -> Option<String> {
        let range = self.selection.active_range()?;
        Some(self.map.buffer().copy_range(range))
    }

    /// Remove the active selection and return its text
    pub fn cut_selection(&mut self) -> Option<String> {
        let text = self.copy_selection()?;
        self.backspace();
        Some(text)
    }

    /// Lines touched by the selection, or the cursor line
    fn affected_lines(&mut self) -> (usize, usize) {
        match self.selection.active_range() {
            Some(range) => {
                // A selection ending at column 0 does not include that line
                let last = if range.end.column == 0 && range.end.line > range.begin.line {
                    range.end.line - 1
                } else {
                    range.end.line
                };
                (range.begin.line, last)
            }
            None => {
                let line = self.text_cursor().line;
                (line, line)
            }
        }
    }

    /// Apply per-line column shifts to the cursor and an active selection
    fn shift_columns(&mut self, cursor: Point, shift: impl Fn(Point) -> Point) {
        if let Some(range) = self.selection.active_range() {
            self.selection
                .select(Range::new(shift(range.begin), shift(range.end)));
        }
        self.set_text_cursor(shift(cursor));
        self.ensure_cursor_visible();
    }

    /// Indent the affected lines by one unit of the detected style
    pub fn indent_lines(&mut self) {
        let unit = self.map.buffer().indent_type().unit();
        let (first, last) = self.affected_lines();
        let cursor = self.text_cursor();

        let mut actions = Vec::new();
        for line in first..=last {
            let at = self.map.buffer().byte_offset_of(Point::at(line, 0));
            self.map.insert_at_byte(at, &unit);
            actions.push(Action::Insert {
                at,
                text: unit.clone(),
            });
        }
        self.history.push(Action::Group { actions });

        let width = unit.len();
        self.shift_columns(cursor, |point| {
            if (first..=last).contains(&point.line) {
                Point::at(point.line, point.column + width)
            } else {
                point
            }
        });
    }

    /// Remove up to one indent unit from the affected lines
    pub fn unindent_lines(&mut self) {
        let max_spaces = match self.map.buffer().indent_type() {
            IndentType::Spaces(width) => width,
            IndentType::Tabs => self.settings.tab_width,
        };
        let (first, last) = self.affected_lines();
        let cursor = self.text_cursor();

        let mut removed = vec![0; last - first + 1];
        let mut actions = Vec::new();
        for line in first..=last {
            let content = self.map.buffer().line_content(line).unwrap_or_default();
            let count = if content.starts_with('\t') {
                1
            } else {
                content
                    .bytes()
                    .take(max_spaces)
                    .take_while(|&b| b == b' ')
                    .count()
            };
            if count == 0 {
                continue;
            }

            let at = self.map.buffer().byte_offset_of(Point::at(line, 0));
            let text = self.map.delete_bytes(at, at + count);
            actions.push(Action::Delete { at, text });
            removed[line - first] = count;
        }

        if actions.is_empty() {
            return;
        }
        self.history.push(Action::Group { actions });

        self.shift_columns(cursor, |point| {
            if (first..=last).contains(&point.line) {
                let count = removed[point.line - first];
                Point::at(point.line, point.column.saturating_sub(count))
            } else {
                point
            }
        });
    }

    /// Replay an action against the document, returning the cursor after it
    fn apply(&mut self, action: &Action) -> Point {
        match action {
            Action::Insert { at, text } => self.map.insert_at_byte(*at, text),
            Action::Delete { at, text } => {
                self.map.delete_bytes(*at, *at + text.len());
                self.map.buffer().point_at_byte(*at)
            }
            Action::Group { actions } => {
                let mut cursor = self.text_cursor();
                for action in actions {
                    cursor = self.apply(action);
                }
                cursor
            }
        }
    }

    /// Reverse the latest edit; false if there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.undo() else {
            return false;
        };
        let cursor = self.apply(&action);
        self.finish_edit(cursor);
        true
    }

    /// Re-apply the latest undone edit; false if there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.redo() else {
            return false;
        };
        let cursor = self.apply(&action);
        self.finish_edit(cursor);
        true
    }

    /// Return to the last loaded/saved state; returns the steps reverted.
    ///
    /// Undoes back to the save point, or redoes forward to it when it was
    /// undone past.
    pub fn undo_all(&mut self) -> usize {
        if let Some(steps) = self.history.redo_steps_to_save_point() {
            let mut redone = 0;
            while redone < steps && self.redo() {
                redone += 1;
            }
            log::info!("Undo all: {} steps redone", redone);
            return redone;
        }

        let steps = match self.history.steps_to_save_point() {
            Some(steps) => steps,
            None => {
                log::warn!("Saved state is no longer in history, undoing all edits");
                usize::MAX
            }
        };

        let mut undone = 0;
        while undone < steps && self.undo() {
            undone += 1;
        }
        log::info!("Undo all: {} steps reverted", undone);
        undone
    }
}
