use std::cmp::{max, min};

use unicode_segmentation::UnicodeSegmentation;

/// Position in the document (text space).
///
/// The same type is used for window space (`line` = wrapped row,
/// `column` = grapheme offset inside that row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Line number (0-based)
    pub line: usize,
    /// Position in line in graphemes (0-based)
    pub column: usize,
}

impl Point {
    /// Create a point at (0, 0)
    pub fn new() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Create point at specified position
    pub fn at(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Point reached after inserting `text` at this point
    pub fn advanced_by(&self, text: &str) -> Point {
        match text.rfind('\n') {
            None => Point::at(self.line, self.column + text.graphemes(true).count()),
            Some(last_break) => {
                let breaks = text.matches('\n').count();
                let tail = &text[last_break + 1..];
                Point::at(self.line + breaks, tail.graphemes(true).count())
            }
        }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

/// Half-open span between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub begin: Point,
    pub end: Point,
}

impl Range {
    /// Create a range as given (not normalized)
    pub fn new(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    /// Empty range at a point
    pub fn empty(at: Point) -> Self {
        Self { begin: at, end: at }
    }

    /// Range with begin not after end
    pub fn normalized(&self) -> Range {
        Range {
            begin: min(self.begin, self.end),
            end: max(self.begin, self.end),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.begin <= self.end
    }

    /// Range is empty (begin == end)
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Check if range contains given point (end excluded)
    pub fn contains(&self, point: &Point) -> bool {
        let range = self.normalized();
        *point >= range.begin && *point < range.end
    }
}
