//! Conversions between text space and window space.
//!
//! These are pure functions over a slice of wrapped rows ordered by start
//! point. They return `None` only for an empty slice; callers make sure
//! the rows cover the lines they ask about.

use crate::wrap::WrappedSegment;
use crate::Point;

/// Index of the row containing `point`: the last row starting at or before it
pub fn row_containing(rows: &[WrappedSegment], point: Point) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }
    Some(rows.partition_point(|row| row.start <= point).saturating_sub(1))
}

/// Largest cursor column on a row.
///
/// A row followed by a continuation of the same line stops before its
/// last grapheme boundary, since that boundary is column 0 of the next row.
pub fn row_max_column(rows: &[WrappedSegment], row: usize) -> Option<usize> {
    let segment = rows.get(row)?;
    let len = segment.len_graphemes();
    let continued = rows
        .get(row + 1)
        .is_some_and(|next| next.start.line == segment.start.line);
    Some(if continued { len.saturating_sub(1) } else { len })
}

/// Text point to window point (row, column within row)
pub fn text_to_window(rows: &[WrappedSegment], point: Point) -> Option<Point> {
    let row = row_containing(rows, point)?;
    let start = rows[row].start;
    let column = if point.line == start.line {
        point.column.saturating_sub(start.column)
    } else {
        0
    };
    Some(Point::at(row, column))
}

/// Window point to text point, clamping row and column
pub fn window_to_text(rows: &[WrappedSegment], window: Point) -> Option<Point> {
    let row = window.line.min(rows.len().checked_sub(1)?);
    let max_column = row_max_column(rows, row)?;
    let start = rows[row].start;
    Some(Point::at(
        start.line,
        start.column + window.column.min(max_column),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::{wrap_line, WrapOptions};

    fn rows_for(lines: &[&str], width: usize) -> Vec<WrappedSegment> {
        let options = WrapOptions::new(width, 4);
        lines
            .iter()
            .enumerate()
            .flat_map(|(idx, line)| wrap_line(idx, line, &options))
            .collect()
    }

    #[test]
    fn test_row_containing() {
        let rows = rows_for(&["abcdef", "gh"], 3);
        assert_eq!(row_containing(&rows, Point::at(0, 0)), Some(0));
        assert_eq!(row_containing(&rows, Point::at(0, 2)), Some(0));
        assert_eq!(row_containing(&rows, Point::at(0, 3)), Some(1));
        assert_eq!(row_containing(&rows, Point::at(0, 6)), Some(1));
        assert_eq!(row_containing(&rows, Point::at(1, 1)), Some(2));
        assert_eq!(row_containing(&[], Point::at(0, 0)), None);
    }

    #[test]
    fn test_row_max_column() {
        let rows = rows_for(&["abcdef", "gh"], 3);
        assert_eq!(row_max_column(&rows, 0), Some(2));
        assert_eq!(row_max_column(&rows, 1), Some(3));
        assert_eq!(row_max_column(&rows, 2), Some(2));
        assert_eq!(row_max_column(&rows, 3), None);
    }

    #[test]
    fn test_text_to_window() {
        let rows = rows_for(&["abcdef", "gh"], 3);
        assert_eq!(text_to_window(&rows, Point::at(0, 4)), Some(Point::at(1, 1)));
        assert_eq!(text_to_window(&rows, Point::at(1, 2)), Some(Point::at(2, 2)));
    }

    #[test]
    fn test_window_to_text_clamps() {
        let rows = rows_for(&["abcdef", "gh"], 3);
        assert_eq!(window_to_text(&rows, Point::at(0, 9)), Some(Point::at(0, 2)));
        assert_eq!(window_to_text(&rows, Point::at(1, 9)), Some(Point::at(0, 6)));
        assert_eq!(window_to_text(&rows, Point::at(7, 1)), Some(Point::at(1, 1)));
        assert_eq!(window_to_text(&[], Point::at(0, 0)), None);
    }
}
