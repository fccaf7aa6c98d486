use std::io::{Read, Write};

use anyhow::{Context, Result};
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

use crate::indent::{self, IndentType};
use crate::words;
use crate::{Point, Range};

/// Text removed by a single-character deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    /// Point where the removed text started (cursor position after deletion)
    pub at: Point,
    /// Removed text
    pub text: String,
}

/// Line store based on Rope.
///
/// Lines keep their terminators (`"\n"` or `"\r\n"`); only the final line
/// may lack one. There is always at least one line.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Rope structure for storing text
    rope: Rope,
}

/// Byte length of the line terminator at the end of `line`
fn terminator_len(line: &str) -> usize {
    if line.ends_with("\r\n") {
        2
    } else if line.ends_with('\n') {
        1
    } else {
        0
    }
}

/// Byte offset of grapheme `column` in `content`, clamped to its length
fn column_to_byte(content: &str, column: usize) -> usize {
    content
        .grapheme_indices(true)
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(content.len())
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create buffer holding `text`
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Create buffer from a byte stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.read_from(reader)?;
        Ok(buffer)
    }

    /// Replace all content with the stream's content.
    ///
    /// The stream must be valid UTF-8. On error the buffer is left unchanged.
    pub fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        let rope = Rope::from_reader(reader).context("Failed to read document stream")?;
        log::info!(
            "Document read: {} lines, {} bytes",
            rope.len_lines(),
            rope.len_bytes()
        );
        self.rope = rope;
        Ok(())
    }

    /// Write all lines to the stream, byte-exact
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        self.rope
            .write_to(writer)
            .context("Failed to write document stream")?;
        log::info!("Document written: {} bytes", self.rope.len_bytes());
        Ok(())
    }

    /// Get line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line
    pub fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    /// Total length in bytes
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get line by index, including its terminator
    pub fn line(&self, index: usize) -> Option<String> {
        if index < self.line_count() {
            Some(self.rope.line(index).to_string())
        } else {
            None
        }
    }

    /// Get line content by index, without its terminator
    pub fn line_content(&self, index: usize) -> Option<String> {
        self.line(index).map(|mut line| {
            let len = line.len() - terminator_len(&line);
            line.truncate(len);
            line
        })
    }

    /// Get line length in graphemes (without terminator)
    pub fn line_len_graphemes(&self, line_idx: usize) -> usize {
        self.line_content(line_idx)
            .map(|content| content.graphemes(true).count())
            .unwrap_or(0)
    }

    /// Raw text of lines `[begin, end)` including terminators, clamped
    pub fn line_range_text(&self, begin: usize, end: usize) -> String {
        let count = self.line_count();
        let begin = begin.min(count);
        let end = end.clamp(begin, count);
        let start_char = self.rope.line_to_char(begin);
        let end_char = self.rope.line_to_char(end);
        self.rope.slice(start_char..end_char).to_string()
    }

    /// Get all text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Point after the last grapheme of the document
    pub fn end_point(&self) -> Point {
        let last = self.last_line();
        Point::at(last, self.line_len_graphemes(last))
    }

    /// Clamp point to an existing line and column
    pub fn clamp_point(&self, point: Point) -> Point {
        let line = point.line.min(self.last_line());
        let column = point.column.min(self.line_len_graphemes(line));
        Point::at(line, column)
    }

    /// Absolute byte offset of a (clamped) point
    pub fn byte_offset_of(&self, point: Point) -> usize {
        let point = self.clamp_point(point);
        let content = self.line_content(point.line).unwrap_or_default();
        self.rope.line_to_byte(point.line) + column_to_byte(&content, point.column)
    }

    /// Point at an absolute byte offset (clamped to the document)
    pub fn point_at_byte(&self, offset: usize) -> Point {
        let offset = offset.min(self.len_bytes());
        let line = self.rope.byte_to_line(offset);
        let line_start = self.rope.line_to_byte(line);
        let content = self.line_content(line).unwrap_or_default();
        let within = (offset - line_start).min(content.len());
        let column = content
            .get(..within)
            .map(|prefix| prefix.graphemes(true).count())
            .unwrap_or(0);
        Point::at(line, column)
    }

    /// Remove a byte range from the rope, returning the removed text
    fn remove_bytes(&mut self, start: usize, end: usize) -> String {
        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        let removed = self.rope.slice(start_char..end_char).to_string();
        self.rope.remove(start_char..end_char);
        removed
    }

    /// Insert text at a point, returning the point after the inserted text
    pub fn insert(&mut self, at: Point, text: &str) -> Point {
        let at = self.clamp_point(at);
        let offset = self.byte_offset_of(at);
        let char_idx = self.rope.byte_to_char(offset);
        self.rope.insert(char_idx, text);
        self.point_at_byte(offset + text.len())
    }

    /// Insert text at an absolute byte offset, returning the point after it
    pub fn insert_at_byte(&mut self, offset: usize, text: &str) -> Point {
        let offset = offset.min(self.len_bytes());
        let char_idx = self.rope.byte_to_char(offset);
        self.rope.insert(char_idx, text);
        self.point_at_byte(self.rope.char_to_byte(char_idx) + text.len())
    }

    /// Delete the bytes in `start..end` (clamped to the document)
    pub fn delete_bytes(&mut self, start: usize, end: usize) -> String {
        let end = end.min(self.len_bytes());
        if start >= end {
            return String::new();
        }
        self.remove_bytes(start, end)
    }

    /// Line break used when splitting `line`
    fn line_break_for(&self, line: usize) -> &'static str {
        match self.line(line) {
            Some(text) if text.ends_with("\r\n") => "\r\n",
            _ => "\n",
        }
    }

    /// Split a line in two, returning the start of the new line
    pub fn insert_line_break(&mut self, at: Point) -> Point {
        let at = self.clamp_point(at);
        let line_break = self.line_break_for(at.line);
        self.insert(at, line_break)
    }

    /// Delete one grapheme before `at` (backspace).
    ///
    /// At column 0 the line is merged into the previous one; at (0, 0)
    /// nothing happens.
    pub fn delete_char(&mut self, at: Point) -> Option<Deletion> {
        let at = self.clamp_point(at);

        if at.column == 0 {
            if at.line == 0 {
                return None;
            }

            let prev = at.line - 1;
            let prev_len = self.line_len_graphemes(prev);
            let line_start = self.rope.line_to_byte(at.line);
            let term = self.line(prev).map(|l| terminator_len(&l)).unwrap_or(0);
            let text = self.remove_bytes(line_start - term, line_start);
            return Some(Deletion {
                at: Point::at(prev, prev_len),
                text,
            });
        }

        let new_point = Point::at(at.line, at.column - 1);
        let start = self.byte_offset_of(new_point);
        let end = self.byte_offset_of(at);
        let text = self.remove_bytes(start, end);
        Some(Deletion {
            at: new_point,
            text,
        })
    }

    /// Delete everything in the (normalized) range, returning the removed text
    pub fn delete_range(&mut self, range: Range) -> String {
        let range = range.normalized();
        let start = self.byte_offset_of(range.begin);
        let end = self.byte_offset_of(range.end);
        if start >= end {
            return String::new();
        }
        self.remove_bytes(start, end)
    }

    /// Exact text covered by the (normalized) range
    pub fn copy_range(&self, range: Range) -> String {
        let range = range.normalized();
        let start = self.rope.byte_to_char(self.byte_offset_of(range.begin));
        let end = self.rope.byte_to_char(self.byte_offset_of(range.end));
        self.rope.slice(start..end).to_string()
    }

    /// Replace a line's content, keeping its terminator; returns the old content
    pub fn replace_line(&mut self, line: usize, text: &str) -> String {
        let line = line.min(self.last_line());
        let content_len = self.line_content(line).map(|c| c.len()).unwrap_or(0);
        let start = self.rope.line_to_byte(line);
        let old = self.remove_bytes(start, start + content_len);
        let char_idx = self.rope.byte_to_char(start);
        self.rope.insert(char_idx, text);
        old
    }

    /// Word run covering `point`, or an empty range at `point`
    pub fn word_bounds_at(&self, point: Point) -> Range {
        let point = self.clamp_point(point);
        let content = self.line_content(point.line).unwrap_or_default();
        match words::word_span(&content, point.column) {
            Some((start, end)) => Range::new(
                Point::at(point.line, start),
                Point::at(point.line, end),
            ),
            None => Range::empty(point),
        }
    }

    /// Next word/non-word transition after `point`.
    ///
    /// Without a transition on the line this is the start of the next line,
    /// or the end of the document on the last line.
    pub fn next_word_boundary(&self, point: Point) -> Point {
        let point = self.clamp_point(point);
        let content = self.line_content(point.line).unwrap_or_default();

        if let Some(column) = words::next_transition(&content, point.column) {
            return Point::at(point.line, column);
        }

        if point.line < self.last_line() {
            Point::at(point.line + 1, 0)
        } else {
            self.end_point()
        }
    }

    /// Start of the class run before `point`.
    ///
    /// At column 0 this is the end of the previous line, or `point` itself
    /// at document start.
    pub fn prev_word_boundary(&self, point: Point) -> Point {
        let point = self.clamp_point(point);
        let content = self.line_content(point.line).unwrap_or_default();

        if let Some(column) = words::prev_transition(&content, point.column) {
            return Point::at(point.line, column);
        }

        if point.line > 0 {
            let prev = point.line - 1;
            Point::at(prev, self.line_len_graphemes(prev))
        } else {
            point
        }
    }

    /// Detect the document's indentation style
    pub fn indent_type(&self) -> IndentType {
        let lines: Vec<String> = self.rope.lines().map(|line| line.to_string()).collect();
        indent::detect(lines.iter().map(String::as_str))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
