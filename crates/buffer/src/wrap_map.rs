//! Wrapped projection of a [`TextBuffer`] with a lazily filled row cache.
//!
//! Rows are computed one whole source line at a time, front to back, and
//! only as far as callers ask. Every mutation goes through this type so the
//! cache can be truncated at the first affected line in the same call.

use std::io::Read;

use anyhow::Result;

use crate::buffer::{Deletion, TextBuffer};
use crate::coords;
use crate::wrap::{wrap_line, WrapOptions, WrappedSegment};
use crate::{Point, Range};

/// Viewport mapper: text space to window space over a wrap cache
#[derive(Debug, Clone)]
pub struct WrapMap {
    buffer: TextBuffer,
    options: WrapOptions,
    /// Rows of source lines `[0, wrapped_lines)`, ordered by start point
    rows: Vec<WrappedSegment>,
    wrapped_lines: usize,
}

impl WrapMap {
    pub fn new(buffer: TextBuffer, options: WrapOptions) -> Self {
        Self {
            buffer,
            options,
            rows: Vec::new(),
            wrapped_lines: 0,
        }
    }

    /// Underlying line store (read-only; mutate through the mapper)
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn options(&self) -> &WrapOptions {
        &self.options
    }

    /// Number of rows currently cached
    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of source lines currently wrapped
    pub fn wrapped_lines(&self) -> usize {
        self.wrapped_lines
    }

    fn drop_cache(&mut self) {
        self.rows.clear();
        self.wrapped_lines = 0;
    }

    /// Drop cached rows starting at or after `line`
    pub fn invalidate_from(&mut self, line: usize) {
        let keep = self.rows.partition_point(|row| row.start.line < line);
        self.rows.truncate(keep);
        self.wrapped_lines = self.wrapped_lines.min(line);
    }

    /// Wrap the next unwrapped source line; false at document end
    fn wrap_next_line(&mut self) -> bool {
        let line = self.wrapped_lines;
        let Some(content) = self.buffer.line_content(line) else {
            return false;
        };
        self.rows.extend(wrap_line(line, &content, &self.options));
        self.wrapped_lines += 1;
        true
    }

    fn ensure_rows(&mut self, count: usize) {
        while self.rows.len() < count && self.wrap_next_line() {}
    }

    fn ensure_all(&mut self) {
        while self.wrap_next_line() {}
    }

    /// Rows `[begin, end)`; fewer at document end
    pub fn lines(&mut self, begin: usize, end: usize) -> &[WrappedSegment] {
        self.ensure_rows(end);
        let len = self.rows.len();
        let begin = begin.min(len);
        let end = end.clamp(begin, len);
        &self.rows[begin..end]
    }

    /// Single row, clamped to the last row of the document
    pub fn line(&mut self, row: usize) -> &WrappedSegment {
        self.ensure_rows(row.saturating_add(1).max(1));
        let last = self.rows.len().saturating_sub(1);
        &self.rows[row.min(last)]
    }

    /// Total number of rows (wraps the whole document)
    pub fn row_count(&mut self) -> usize {
        self.ensure_all();
        self.rows.len()
    }

    /// Row containing a text point.
    ///
    /// Probes rows 1, 2, 4, ... until one starts after `point`, wrapping
    /// more lines when a probe runs past the cache, then binary searches
    /// between the last two probes.
    pub fn window_row_for_text_point(&mut self, point: Point) -> usize {
        let point = self.buffer.clamp_point(point);

        let mut probe = 1;
        loop {
            if probe >= self.rows.len() {
                if self.wrap_next_line() {
                    continue;
                }
                break;
            }
            if self.rows[probe].start > point {
                break;
            }
            probe *= 2;
        }

        let low = probe / 2;
        let high = probe.min(self.rows.len());
        let window = &self.rows[low.min(high)..high];
        low + coords::row_containing(window, point).unwrap_or(0)
    }

    /// Text point to window point
    pub fn text_to_window(&mut self, point: Point) -> Point {
        let point = self.buffer.clamp_point(point);
        let row = self.window_row_for_text_point(point);
        let start = self.rows[row].start;
        Point::at(row, point.column.saturating_sub(start.column))
    }

    /// Window point to text point, clamping row and column
    pub fn window_to_text(&mut self, window: Point) -> Point {
        self.ensure_rows(window.line.saturating_add(1).max(1));
        coords::window_to_text(&self.rows, window).unwrap_or_default()
    }

    /// Largest cursor column on a row
    pub fn row_max_column(&mut self, row: usize) -> usize {
        self.ensure_rows(row.saturating_add(1));
        let row = row.min(self.rows.len().saturating_sub(1));
        coords::row_max_column(&self.rows, row).unwrap_or(0)
    }

    /// Swap the underlying document and drop the whole cache
    pub fn reset(&mut self, buffer: TextBuffer) {
        self.buffer = buffer;
        self.drop_cache();
    }

    /// Reload the document from a stream; unchanged on error
    pub fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        self.buffer.read_from(reader)?;
        self.drop_cache();
        Ok(())
    }

    /// Change the wrap width; returns true if the cache was dropped
    pub fn set_width(&mut self, width: usize) -> bool {
        if self.options.width == width {
            return false;
        }
        log::debug!("Wrap width {} -> {}, dropping row cache", self.options.width, width);
        self.options.width = width;
        self.drop_cache();
        true
    }

    /// Change the tab width; returns true if the cache was dropped
    pub fn set_tab_width(&mut self, tab_width: usize) -> bool {
        if self.options.tab_width == tab_width {
            return false;
        }
        self.options.tab_width = tab_width;
        self.drop_cache();
        true
    }

    /// Replace all wrap options and drop the cache
    pub fn set_options(&mut self, options: WrapOptions) {
        self.options = options;
        self.drop_cache();
    }

    pub fn insert(&mut self, at: Point, text: &str) -> Point {
        let at = self.buffer.clamp_point(at);
        let after = self.buffer.insert(at, text);
        self.invalidate_from(at.line);
        after
    }

    pub fn insert_line_break(&mut self, at: Point) -> Point {
        let at = self.buffer.clamp_point(at);
        let after = self.buffer.insert_line_break(at);
        self.invalidate_from(at.line);
        after
    }

    pub fn delete_char(&mut self, at: Point) -> Option<Deletion> {
        let deletion = self.buffer.delete_char(at)?;
        self.invalidate_from(deletion.at.line);
        Some(deletion)
    }

    pub fn delete_range(&mut self, range: Range) -> String {
        let range = range.normalized();
        let removed = self.buffer.delete_range(range);
        self.invalidate_from(self.buffer.clamp_point(range.begin).line);
        removed
    }

    pub fn insert_at_byte(&mut self, offset: usize, text: &str) -> Point {
        let line = self.buffer.point_at_byte(offset).line;
        let after = self.buffer.insert_at_byte(offset, text);
        self.invalidate_from(line);
        after
    }

    pub fn delete_bytes(&mut self, start: usize, end: usize) -> String {
        let line = self.buffer.point_at_byte(start).line;
        let removed = self.buffer.delete_bytes(start, end);
        self.invalidate_from(line);
        removed
    }

    pub fn replace_line(&mut self, line: usize, text: &str) -> String {
        let line = line.min(self.buffer.last_line());
        let old = self.buffer.replace_line(line, text);
        self.invalidate_from(line);
        old
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::display_width;

    fn map(text: &str, width: usize) -> WrapMap {
        WrapMap::new(TextBuffer::from_text(text), WrapOptions::new(width, 4))
    }

    fn long_document(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("line {} {}", i, "x".repeat(i % 13)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_wrap_two_rows() {
        let mut m = map("abcdef", 3);
        let rows = m.lines(0, 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "abc");
        assert_eq!(rows[0].start, Point::at(0, 0));
        assert_eq!(rows[1].text, "def");
        assert_eq!(rows[1].start, Point::at(0, 3));
    }

    #[test]
    fn test_lines_wraps_lazily() {
        let mut m = map(&long_document(1000), 8);
        assert_eq!(m.cached_rows(), 0);

        let rows = m.lines(0, 5).len();
        assert_eq!(rows, 5);
        assert!(m.wrapped_lines() < 10);
    }

    #[test]
    fn test_line_clamps_to_last_row() {
        let mut m = map("ab\ncd", 10);
        assert_eq!(m.line(99).text, "cd");
        assert_eq!(m.line(0).text, "ab");
        assert_eq!(m.row_count(), 2);
    }

    #[test]
    fn test_empty_document_has_one_row() {
        let mut m = map("", 10);
        assert_eq!(m.row_count(), 1);
        assert_eq!(m.line(3).text, "");
        assert_eq!(m.window_row_for_text_point(Point::at(5, 5)), 0);
    }

    #[test]
    fn test_window_row_probe_extends_lazily() {
        let mut m = map(&long_document(500), 6);
        let row = m.window_row_for_text_point(Point::at(300, 4));
        assert!(m.wrapped_lines() > 300);
        assert!(m.wrapped_lines() < 500);

        let segment = m.line(row).clone();
        assert_eq!(segment.start.line, 300);
        assert!(segment.start.column <= 4);
        assert!(4 < segment.start.column + segment.len_graphemes());
    }

    #[test]
    fn test_coordinate_inverse_for_every_point() {
        let text = "short\nПривет мир это тест\n\n\tindented\twith tabs\n中文字符中文字符\ne\u{301}e\u{301}e\u{301}e\u{301}";
        let mut m = map(text, 5);
        let buffer = m.buffer().clone();

        for line in 0..buffer.line_count() {
            for column in 0..=buffer.line_len_graphemes(line) {
                let point = Point::at(line, column);
                let row = m.window_row_for_text_point(point);
                let segment = m.line(row).clone();
                assert_eq!(segment.start.line, line);
                assert!(segment.start.column <= column);
                assert!(column <= segment.start.column + segment.len_graphemes());

                let window = m.text_to_window(point);
                assert_eq!(m.window_to_text(window), point);
            }
        }
    }

    #[test]
    fn test_rows_respect_width() {
        let text = "Привет мир, 中文 and tabs\there\nsecond line that is long";
        let mut m = map(text, 7);
        let options = *m.options();
        let count = m.row_count();
        for row in m.lines(0, count) {
            assert!(display_width(&row.text, &options) <= 7);
        }
    }

    #[test]
    fn test_insert_invalidates_from_line() {
        let mut m = map("aaaa\nbbbb\ncccc", 2);
        assert_eq!(m.row_count(), 6);

        m.insert(Point::at(1, 0), "XY");
        assert_eq!(m.cached_rows(), 2);
        let rows: Vec<String> = m.lines(0, 10).iter().map(|r| r.text.clone()).collect();
        assert_eq!(rows, vec!["aa", "aa", "XY", "bb", "bb", "cc", "cc"]);
    }

    #[test]
    fn test_delete_char_merge_invalidates_previous_line() {
        let mut m = map("ab\ncd", 10);
        assert_eq!(m.row_count(), 2);

        let deletion = m.delete_char(Point::at(1, 0)).unwrap();
        assert_eq!(deletion.at, Point::at(0, 2));
        assert_eq!(m.row_count(), 1);
        assert_eq!(m.line(0).text, "abcd");
    }

    #[test]
    fn test_delete_range_and_line_break() {
        let mut m = map("one\ntwo\nthree", 10);
        m.row_count();
        m.delete_range(Range::new(Point::at(0, 1), Point::at(2, 2)));
        assert_eq!(m.line(0).text, "oree");
        assert_eq!(m.row_count(), 1);

        let after = m.insert_line_break(Point::at(0, 2));
        assert_eq!(after, Point::at(1, 0));
        assert_eq!(m.line(1).text, "ee");
    }

    #[test]
    fn test_replace_line() {
        let mut m = map("one\ntwo", 10);
        m.row_count();
        assert_eq!(m.replace_line(1, "2"), "two");
        assert_eq!(m.line(1).text, "2");
        assert_eq!(m.line(0).text, "one");
    }

    #[test]
    fn test_set_width_drops_cache_only_on_change() {
        let mut m = map("abcdef", 3);
        m.row_count();
        assert!(!m.set_width(3));
        assert_eq!(m.cached_rows(), 2);

        assert!(m.set_width(6));
        assert_eq!(m.cached_rows(), 0);
        assert_eq!(m.row_count(), 1);
    }

    #[test]
    fn test_reset_and_read_from() {
        let mut m = map("old text", 4);
        m.row_count();
        m.reset(TextBuffer::from_text("new"));
        assert_eq!(m.cached_rows(), 0);
        assert_eq!(m.line(0).text, "new");

        m.read_from("fresh\ncontent".as_bytes()).unwrap();
        assert_eq!(m.line(1).text, "h");
        assert_eq!(m.line(2).text, "cont");
        assert_eq!(m.row_count(), 4);
    }
}
