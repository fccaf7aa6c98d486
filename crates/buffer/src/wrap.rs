//! Hard wrapping of a single line at grapheme-cluster boundaries.
//!
//! Rows are cut when the next cluster would overflow the configured width;
//! every row after a cut starts with zero carried width, so tab stops are
//! measured from the row start.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::Point;

/// Display width of one grapheme cluster (tabs are handled separately)
pub type GlyphWidth = fn(&str) -> usize;

/// Cell width following UAX #11 (wide glyphs take two cells)
pub fn unicode_glyph_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

/// Cell width treating every visible cluster as one cell
pub fn narrow_glyph_width(grapheme: &str) -> usize {
    usize::from(UnicodeWidthStr::width(grapheme) > 0)
}

/// Wrapping parameters, passed explicitly to the mapper
#[derive(Debug, Clone, Copy)]
pub struct WrapOptions {
    /// Maximum row width in cells (0 disables wrapping)
    pub width: usize,
    /// Tab stop distance in cells
    pub tab_width: usize,
    /// Width function for non-tab clusters
    pub glyph_width: GlyphWidth,
}

impl WrapOptions {
    pub fn new(width: usize, tab_width: usize) -> Self {
        Self {
            width,
            tab_width,
            glyph_width: unicode_glyph_width,
        }
    }

    /// Same options with a different width function
    pub fn with_glyph_width(mut self, glyph_width: GlyphWidth) -> Self {
        self.glyph_width = glyph_width;
        self
    }

    /// Width of `grapheme` when it starts at cell `offset` of a row
    pub fn cell_width_at(&self, grapheme: &str, offset: usize) -> usize {
        if grapheme == "\t" {
            let tab_width = self.tab_width.max(1);
            tab_width - offset % tab_width
        } else {
            (self.glyph_width)(grapheme)
        }
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80, 4)
    }
}

/// One wrapped row: a slice of a logical line that fits the width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSegment {
    /// Text point of the first grapheme in this row
    pub start: Point,
    /// Byte offset of the row within its line
    pub start_byte: usize,
    /// Row text (never includes the line terminator)
    pub text: String,
}

impl WrappedSegment {
    /// Number of graphemes in this row
    pub fn len_graphemes(&self) -> usize {
        self.text.graphemes(true).count()
    }
}

/// Rendered width of a row
pub fn display_width(text: &str, options: &WrapOptions) -> usize {
    text.graphemes(true)
        .fold(0, |width, g| width + options.cell_width_at(g, width))
}

/// Check whether a line can be emitted without walking its clusters.
///
/// UTF-8 storage is never narrower than the rendered width, except for tabs.
fn fits_without_walk(content: &str, options: &WrapOptions) -> bool {
    let tabs = content.bytes().filter(|&b| b == b'\t').count();
    let extra = tabs * options.tab_width.saturating_sub(1);
    content.len() + extra <= options.width
}

/// Wrap one line's content (terminator already stripped) into rows
pub fn wrap_line(line: usize, content: &str, options: &WrapOptions) -> Vec<WrappedSegment> {
    if options.width == 0 || fits_without_walk(content, options) {
        return vec![WrappedSegment {
            start: Point::at(line, 0),
            start_byte: 0,
            text: content.to_string(),
        }];
    }

    let mut rows = Vec::new();
    let mut row_start_byte = 0;
    let mut row_start_column = 0;
    let mut row_width = 0;

    for (column, (byte, grapheme)) in content.grapheme_indices(true).enumerate() {
        let width = options.cell_width_at(grapheme, row_width);
        // A row always holds at least one cluster, even an overwide one
        if row_width + width > options.width && byte > row_start_byte {
            rows.push(WrappedSegment {
                start: Point::at(line, row_start_column),
                start_byte: row_start_byte,
                text: content[row_start_byte..byte].to_string(),
            });
            row_start_byte = byte;
            row_start_column = column;
            row_width = options.cell_width_at(grapheme, 0);
        } else {
            row_width += width;
        }
    }

    rows.push(WrappedSegment {
        start: Point::at(line, row_start_column),
        start_byte: row_start_byte,
        text: content[row_start_byte..].to_string(),
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(rows: &[WrappedSegment]) -> Vec<&str> {
        rows.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_no_wrap_needed() {
        let rows = wrap_line(0, "Short line", &WrapOptions::new(80, 4));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Short line");
        assert_eq!(rows[0].start, Point::at(0, 0));
    }

    #[test]
    fn test_empty_line_is_one_row() {
        let rows = wrap_line(3, "", &WrapOptions::new(5, 4));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start, Point::at(3, 0));
        assert_eq!(rows[0].text, "");
    }

    #[test]
    fn test_hard_break_at_width() {
        let rows = wrap_line(0, "abcdef", &WrapOptions::new(3, 4));
        assert_eq!(texts(&rows), vec!["abc", "def"]);
        assert_eq!(rows[0].start, Point::at(0, 0));
        assert_eq!(rows[1].start, Point::at(0, 3));
        assert_eq!(rows[1].start_byte, 3);
    }

    #[test]
    fn test_width_zero_disables_wrapping() {
        let rows = wrap_line(0, "abcdef", &WrapOptions::new(0, 4));
        assert_eq!(texts(&rows), vec!["abcdef"]);
    }

    #[test]
    fn test_wide_glyphs() {
        // Each CJK glyph takes two cells
        let rows = wrap_line(0, "中文字符", &WrapOptions::new(5, 4));
        assert_eq!(texts(&rows), vec!["中文", "字符"]);
        assert_eq!(rows[1].start, Point::at(0, 2));
        assert_eq!(rows[1].start_byte, 6);

        let narrow = WrapOptions::new(5, 4).with_glyph_width(narrow_glyph_width);
        let rows = wrap_line(0, "中文字符中文", &narrow);
        assert_eq!(texts(&rows), vec!["中文字符中", "文"]);
    }

    #[test]
    fn test_combining_marks_stay_together() {
        let line = "e\u{301}e\u{301}e\u{301}e\u{301}";
        let rows = wrap_line(0, line, &WrapOptions::new(2, 4));
        assert_eq!(texts(&rows), vec!["e\u{301}e\u{301}", "e\u{301}e\u{301}"]);
        assert_eq!(rows[1].start, Point::at(0, 2));
    }

    #[test]
    fn test_tab_expansion() {
        let options = WrapOptions::new(6, 4);
        assert_eq!(display_width("\tab", &options), 6);
        assert_eq!(display_width("a\tb", &options), 5);

        let rows = wrap_line(0, "\tab\tc", &options);
        assert_eq!(texts(&rows), vec!["\tab", "\tc"]);
        for row in &rows {
            assert!(display_width(&row.text, &options) <= 6);
        }
    }

    #[test]
    fn test_overwide_cluster_gets_own_row() {
        let rows = wrap_line(0, "a中b", &WrapOptions::new(1, 4));
        assert_eq!(texts(&rows), vec!["a", "中", "b"]);
    }

    #[test]
    fn test_rows_concatenate_to_line() {
        let line = "Привет мир, 中文 and e\u{301}mojis 👍🏽 with\ttabs";
        let options = WrapOptions::new(7, 4);
        let rows = wrap_line(5, line, &options);
        let joined: String = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, line);
        for row in &rows {
            assert!(display_width(&row.text, &options) <= 7);
            assert_eq!(&line[row.start_byte..row.start_byte + row.text.len()], row.text);
            assert_eq!(row.start.line, 5);
        }
    }
}
