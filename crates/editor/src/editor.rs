//! Editor core: cursor, scroll and selection over a wrapped document.
//!
//! The cursor lives in window space. Every operation converts it to text
//! space, works there, and converts back through the mapper, so the cursor
//! always sits on a real grapheme boundary of the current wrap.

use std::io::{Read, Write};
use std::time::Instant;

use anyhow::Result;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use linedit_buffer::{
    display_width, narrow_glyph_width, unicode_glyph_width, GlyphWidth, Point, Range,
    TextBuffer, WrapMap, WrapOptions, WrappedSegment,
};
use linedit_config::EditorSettings;

use crate::history::History;
use crate::repeat::{Movement, RepeatTracker};
use crate::selection::Selection;
use crate::viewport::Viewport;

/// Viewport size before the first resize
const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 24;

/// Wrap options derived from editor settings
fn wrap_options(settings: &EditorSettings) -> WrapOptions {
    let glyph_width: GlyphWidth = if settings.wide_glyphs {
        unicode_glyph_width
    } else {
        narrow_glyph_width
    };
    WrapOptions::new(settings.wrap_width, settings.tab_width).with_glyph_width(glyph_width)
}

/// Edit/cursor engine: the single entry point for input handlers
#[derive(Debug)]
pub struct Editor {
    pub(crate) map: WrapMap,
    /// Cursor in window space
    pub(crate) cursor: Point,
    pub(crate) viewport: Viewport,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) repeat: RepeatTracker,
    pub(crate) settings: EditorSettings,
    /// Last pattern passed to a search, for search next/prev
    pub(crate) last_search: Option<Regex>,
}

impl Editor {
    /// Create editor with default settings
    pub fn new(buffer: TextBuffer) -> Self {
        Self::with_settings(buffer, &EditorSettings::default())
    }

    /// Create editor with explicit settings
    pub fn with_settings(buffer: TextBuffer, settings: &EditorSettings) -> Self {
        let view_width = if settings.wrap_width == 0 {
            DEFAULT_WIDTH
        } else {
            settings.wrap_width
        };

        Self {
            map: WrapMap::new(buffer, wrap_options(settings)),
            cursor: Point::new(),
            viewport: Viewport::new(view_width, DEFAULT_HEIGHT),
            selection: Selection::Idle,
            history: History::with_capacity(settings.history_limit),
            repeat: RepeatTracker::new(&settings.repeat),
            settings: settings.clone(),
            last_search: None,
        }
    }

    /// Create editor from a byte stream
    pub fn from_reader<R: Read>(reader: R, settings: &EditorSettings) -> Result<Self> {
        let buffer = TextBuffer::from_reader(reader)?;
        Ok(Self::with_settings(buffer, settings))
    }

    /// Reload the document; cursor, selection, history and scroll reset.
    ///
    /// On error the editor is left untouched.
    pub fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        self.map.read_from(reader)?;
        self.cursor = Point::new();
        self.selection.reset();
        self.history.clear();
        self.repeat.reset();
        self.viewport.scroll_to_top();
        self.last_search = None;
        Ok(())
    }

    /// Save the document; the current state becomes the undo-all target
    pub fn write_to<W: Write>(&mut self, writer: W) -> Result<()> {
        self.map.buffer().write_to(writer)?;
        self.history.mark_saved();
        Ok(())
    }

    pub fn buffer(&self) -> &TextBuffer {
        self.map.buffer()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Cursor in window space
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Cursor in text space
    pub fn text_cursor(&mut self) -> Point {
        self.map.window_to_text(self.cursor)
    }

    /// Place the cursor at a text point (clamped)
    pub fn set_text_cursor(&mut self, point: Point) {
        self.cursor = self.map.text_to_window(point);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Document differs from the last loaded/saved state
    pub fn is_modified(&self) -> bool {
        !self.history.is_at_save_point()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Wrapped rows `[begin, end)` for rendering
    pub fn rows(&mut self, begin: usize, end: usize) -> &[WrappedSegment] {
        self.map.lines(begin, end)
    }

    /// Rows currently on screen
    pub fn visible_rows(&mut self) -> &[WrappedSegment] {
        let top = self.viewport.top_row;
        self.map.lines(top, top + self.viewport.height)
    }

    /// Cursor in viewport cells, if on screen
    pub fn cursor_in_viewport(&mut self) -> Option<Point> {
        let cell = self.cursor_cell();
        self.viewport.window_to_viewport(&cell)
    }

    /// Window cursor with its column measured in display cells
    fn cursor_cell(&mut self) -> Point {
        let options = *self.map.options();
        let row = self.map.line(self.cursor.line);
        let prefix: String = row.text.graphemes(true).take(self.cursor.column).collect();
        Point::at(self.cursor.line, display_width(&prefix, &options))
    }

    /// Grapheme column of `row` covering display cell `cell`
    fn column_at_cell(&mut self, row: usize, cell: usize) -> usize {
        let options = *self.map.options();
        let text = &self.map.line(row).text;
        let mut width = 0;
        for (column, grapheme) in text.graphemes(true).enumerate() {
            width += options.cell_width_at(grapheme, width);
            if cell < width {
                return column;
            }
        }
        text.graphemes(true).count()
    }

    /// Rows known to exist up to `at_least` (wraps no further)
    fn known_rows(&mut self, at_least: usize) -> usize {
        self.map.lines(0, at_least).len()
    }

    fn wrapping(&self) -> bool {
        self.map.options().width > 0
    }

    /// Scroll so the cursor is on screen; true if the viewport moved
    pub fn ensure_cursor_visible(&mut self) -> bool {
        let total = self.known_rows(self.cursor.line + self.viewport.height);
        if self.wrapping() {
            // Wrapped rows always fit the width
            self.viewport.ensure_row_visible(self.cursor.line, total)
        } else {
            let cell = self.cursor_cell();
            self.viewport.ensure_cursor_visible(&cell, total)
        }
    }

    /// Put the cursor row in the middle of the viewport
    pub fn center_on_cursor(&mut self) -> bool {
        let total = self.known_rows(self.cursor.line + self.viewport.height);
        let centered = self.viewport.center_on_row(self.cursor.line, total);
        if !self.wrapping() {
            let cell = self.cursor_cell();
            self.viewport.ensure_column_visible(cell.column);
        }
        centered
    }

    /// Scroll up by N rows (cursor stays)
    pub fn scroll_up(&mut self, rows: usize) -> bool {
        self.viewport.scroll_up(rows)
    }

    /// Scroll down by N rows (cursor stays)
    pub fn scroll_down(&mut self, rows: usize) -> bool {
        let total = self.known_rows(self.viewport.bottom_row() + rows);
        self.viewport.scroll_down(rows, total)
    }

    /// Change the viewport size; the wrap width follows the window width
    pub fn resize(&mut self, width: usize, height: usize) {
        let text = self.text_cursor();
        self.viewport.resize(width, height);

        if self.settings.wrap_width > 0 {
            let wrap_width = width.min(self.settings.wrap_width).max(1);
            self.map.set_width(wrap_width);
        }

        self.set_text_cursor(text);
        self.ensure_cursor_visible();
    }

    /// Text point under a viewport cell (clamped)
    pub fn viewport_to_text(&mut self, position: Point) -> Point {
        let window = self.viewport.viewport_to_window(position);
        let column = self.column_at_cell(window.line, window.column);
        self.map.window_to_text(Point::at(window.line, column))
    }

    /// Move the cursor one movement, accelerated on fast repeats
    pub fn move_cursor(&mut self, movement: Movement) {
        self.move_cursor_at(movement, Instant::now());
    }

    /// Move the cursor as if invoked at `now`
    pub fn move_cursor_at(&mut self, movement: Movement, now: Instant) {
        let steps = self.repeat.record(movement, now);
        self.history.commit_pending();

        for _ in 0..steps {
            if !self.step(movement) {
                break;
            }
        }
        self.ensure_cursor_visible();
    }

    /// One text-space or row step; false if the cursor could not move
    fn step(&mut self, movement: Movement) -> bool {
        match movement {
            Movement::Up => self.move_rows_up(1),
            Movement::Down => self.move_rows_down(1),
            _ => {
                let from = self.text_cursor();
                let buffer = self.map.buffer();
                let to = match movement {
                    Movement::Left => step_left(buffer, from),
                    Movement::Right => step_right(buffer, from),
                    Movement::WordLeft => buffer.prev_word_boundary(from),
                    Movement::WordRight => buffer.next_word_boundary(from),
                    Movement::Up | Movement::Down => from,
                };
                if to == from {
                    return false;
                }
                self.set_text_cursor(to);
                true
            }
        }
    }

    /// Move up N rows keeping the column where the target row allows
    fn move_rows_up(&mut self, rows: usize) -> bool {
        if self.cursor.line == 0 {
            return false;
        }
        let target = Point::at(self.cursor.line.saturating_sub(rows), self.cursor.column);
        let text = self.map.window_to_text(target);
        self.set_text_cursor(text);
        true
    }

    /// Move down N rows keeping the column where the target row allows
    fn move_rows_down(&mut self, rows: usize) -> bool {
        let next = self.cursor.line + 1;
        if self.map.lines(next, next + 1).is_empty() {
            return false;
        }
        let target = Point::at(self.cursor.line + rows, self.cursor.column);
        let text = self.map.window_to_text(target);
        self.set_text_cursor(text);
        true
    }

    /// Cursor and viewport up by one screen
    pub fn page_up(&mut self) {
        self.history.commit_pending();
        let height = self.viewport.height.max(1);
        self.move_rows_up(height);
        self.viewport.scroll_up(height);
        self.ensure_cursor_visible();
    }

    /// Cursor and viewport down by one screen
    pub fn page_down(&mut self) {
        self.history.commit_pending();
        let height = self.viewport.height.max(1);
        self.move_rows_down(height);
        self.scroll_down(height);
        self.ensure_cursor_visible();
    }

    /// Jump to a text point (movement, not an edit)
    fn jump_to(&mut self, point: Point) {
        self.history.commit_pending();
        self.repeat.reset();
        self.set_text_cursor(point);
        self.ensure_cursor_visible();
    }

    pub fn move_to_line_start(&mut self) {
        let line = self.text_cursor().line;
        self.jump_to(Point::at(line, 0));
    }

    pub fn move_to_line_end(&mut self) {
        let line = self.text_cursor().line;
        let len = self.map.buffer().line_len_graphemes(line);
        self.jump_to(Point::at(line, len));
    }

    pub fn move_to_document_start(&mut self) {
        self.jump_to(Point::new());
    }

    pub fn move_to_document_end(&mut self) {
        let end = self.map.buffer().end_point();
        self.jump_to(end);
    }

    /// Keyboard selection mark at the cursor
    pub fn mark_selection(&mut self) {
        let point = self.text_cursor();
        self.selection.mark(point);
    }

    pub fn reset_selection(&mut self) {
        self.selection.reset();
    }

    /// Mouse press at a viewport position
    pub fn mouse_press(&mut self, position: Point) {
        let point = self.viewport_to_text(position);
        self.jump_to(point);
        self.selection.mouse_press(point);
    }

    /// Mouse drag: only the cursor follows
    pub fn mouse_drag(&mut self, position: Point) {
        let point = self.viewport_to_text(position);
        self.jump_to(point);
    }

    /// Mouse release at a viewport position
    pub fn mouse_release(&mut self, position: Point) {
        let point = self.viewport_to_text(position);
        self.jump_to(point);
        self.selection.mouse_release(point);
    }

    /// Select the word under the cursor
    pub fn select_word(&mut self) -> Option<Range> {
        let point = self.text_cursor();
        let range = self.map.buffer().word_bounds_at(point);
        if range.is_empty() {
            return None;
        }
        self.selection.select(range);
        self.jump_to(range.end);
        Some(range)
    }

    /// Select the whole document
    pub fn select_all(&mut self) {
        let end = self.map.buffer().end_point();
        self.selection.select(Range::new(Point::new(), end));
        self.jump_to(end);
    }
}

/// Previous grapheme boundary; wraps to the end of the previous line
pub(crate) fn step_left(buffer: &TextBuffer, point: Point) -> Point {
    if point.column > 0 {
        Point::at(point.line, point.column - 1)
    } else if point.line > 0 {
        let prev = point.line - 1;
        Point::at(prev, buffer.line_len_graphemes(prev))
    } else {
        point
    }
}

/// Next grapheme boundary; wraps to the start of the next line
pub(crate) fn step_right(buffer: &TextBuffer, point: Point) -> Point {
    if point.column < buffer.line_len_graphemes(point.line) {
        Point::at(point.line, point.column + 1)
    } else if point.line < buffer.last_line() {
        Point::at(point.line + 1, 0)
    } else {
        point
    }
}
