//! Regex search over the document.
//!
//! Patterns arrive already compiled (see `linedit_text_search::compile_pattern`);
//! matches are found per line content, so `^` and `$` anchor to lines.

use regex::Regex;

use linedit_buffer::{Point, Range, TextBuffer};
use linedit_text_search::{find_all, find_closest, find_in_line, Match, SearchDirection};

use crate::editor::Editor;

fn match_range(m: &Match) -> Range {
    Range::new(Point::at(m.line, m.col), Point::at(m.line, m.end_col()))
}

fn line_matches(buffer: &TextBuffer, line: usize, regex: &Regex) -> Vec<Match> {
    let content = buffer.line_content(line).unwrap_or_default();
    find_in_line(line, &content, regex)
}

/// First match at or after `from`, optionally wrapping to the document start.
///
/// With `skip_empty_at_from` an empty match exactly at `from` is ignored, so
/// repeating a search always makes progress.
pub(crate) fn find_forward(
    buffer: &TextBuffer,
    regex: &Regex,
    from: Point,
    skip_empty_at_from: bool,
    wrap: bool,
) -> Option<Range> {
    let from = buffer.clamp_point(from);

    let ahead = (from.line..buffer.line_count()).find_map(|line| {
        line_matches(buffer, line, regex).into_iter().find(|m| {
            if line != from.line {
                return true;
            }
            m.col > from.column || (m.col == from.column && !(skip_empty_at_from && m.len == 0))
        })
    });
    if let Some(m) = ahead {
        return Some(match_range(&m));
    }

    if !wrap {
        return None;
    }

    (0..=from.line)
        .find_map(|line| {
            line_matches(buffer, line, regex)
                .into_iter()
                .find(|m| line < from.line || m.col < from.column)
        })
        .map(|m| match_range(&m))
}

impl Editor {
    /// Search from the start of `from_line` and move to the first match
    pub fn search_regexp(&mut self, regex: &Regex, from_line: usize, wrap: bool) -> Option<Range> {
        self.last_search = Some(regex.clone());
        let found = find_forward(
            self.map.buffer(),
            regex,
            Point::at(from_line, 0),
            false,
            wrap,
        );
        self.show_match(regex, found)
    }

    /// Repeat the last search forward from the cursor
    pub fn search_next(&mut self) -> Option<Range> {
        let regex = self.last_search.clone()?;
        let from = self.text_cursor();
        let found = find_forward(self.map.buffer(), &regex, from, true, true);
        self.show_match(&regex, found)
    }

    /// Repeat the last search backward from the selection start or cursor
    pub fn search_prev(&mut self) -> Option<Range> {
        let regex = self.last_search.clone()?;
        let anchor = match self.selection.active_range() {
            Some(range) => range.begin,
            None => self.text_cursor(),
        };

        let matches = self.all_matches(&regex);
        let found = find_closest(&matches, anchor.line, anchor.column, SearchDirection::Backward)
            .map(|idx| match_range(&matches[idx]));
        self.show_match(&regex, found)
    }

    /// Every match in the document, for highlighting
    pub fn search_matches(&self, regex: &Regex) -> Vec<Range> {
        self.all_matches(regex).iter().map(match_range).collect()
    }

    fn all_matches(&self, regex: &Regex) -> Vec<Match> {
        let buffer = self.map.buffer();
        let lines = (0..buffer.line_count()).map(|line| buffer.line_content(line).unwrap_or_default());
        find_all(lines, regex)
    }

    /// Select a found match and bring it to the middle of the screen
    fn show_match(&mut self, regex: &Regex, found: Option<Range>) -> Option<Range> {
        let Some(range) = found else {
            log::debug!("Search: no match for /{}/", regex.as_str());
            return None;
        };

        self.history.commit_pending();
        self.repeat.reset();
        if range.is_empty() {
            self.selection.reset();
        } else {
            self.selection.select(range);
        }
        self.set_text_cursor(range.end);
        self.center_on_cursor();
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linedit_text_search::{compile_pattern, SearchOptions};

    fn regex(pattern: &str) -> Regex {
        compile_pattern(pattern, &SearchOptions::regex()).unwrap()
    }

    fn range(line: usize, begin: usize, end: usize) -> Range {
        Range::new(Point::at(line, begin), Point::at(line, end))
    }

    #[test]
    fn test_find_forward_from_point() {
        let buffer = TextBuffer::from_text("foo bar\nbar foo\nbaz");
        let re = regex("foo");

        assert_eq!(
            find_forward(&buffer, &re, Point::at(0, 0), false, false),
            Some(range(0, 0, 3))
        );
        assert_eq!(
            find_forward(&buffer, &re, Point::at(0, 1), false, false),
            Some(range(1, 4, 7))
        );
        assert_eq!(find_forward(&buffer, &re, Point::at(1, 5), false, false), None);
        assert_eq!(
            find_forward(&buffer, &re, Point::at(1, 5), false, true),
            Some(range(0, 0, 3))
        );
    }

    #[test]
    fn test_find_forward_skips_empty_match_at_start() {
        let buffer = TextBuffer::from_text("ab\ncd");
        let re = regex("^");
        assert_eq!(
            find_forward(&buffer, &re, Point::at(0, 0), false, false),
            Some(Range::empty(Point::at(0, 0)))
        );
        assert_eq!(
            find_forward(&buffer, &re, Point::at(0, 0), true, false),
            Some(Range::empty(Point::at(1, 0)))
        );
    }

    #[test]
    fn test_search_selects_and_centers() {
        let mut text: Vec<String> = (0..60).map(|i| format!("line {}", i)).collect();
        text[40] = "needle here".to_string();
        let mut ed = Editor::new(TextBuffer::from_text(&text.join("\n")));
        ed.resize(80, 10);

        let found = ed.search_regexp(&regex("needle"), 0, false);
        assert_eq!(found, Some(range(40, 0, 6)));
        assert_eq!(ed.selection().active_range(), Some(range(40, 0, 6)));
        assert_eq!(ed.text_cursor(), Point::at(40, 6));
        assert_eq!(ed.viewport().top_row, 35);
    }

    #[test]
    fn test_search_from_line_without_wrap_misses() {
        let mut ed = Editor::new(TextBuffer::from_text("target\nother\nmore"));
        assert_eq!(ed.search_regexp(&regex("target"), 1, false), None);
        assert_eq!(ed.text_cursor(), Point::at(0, 0));
        assert!(ed.selection().is_idle());

        assert_eq!(ed.search_regexp(&regex("target"), 1, true), Some(range(0, 0, 6)));
    }

    #[test]
    fn test_search_next_and_prev() {
        let mut ed = Editor::new(TextBuffer::from_text("x a x\nx b"));
        assert_eq!(ed.search_next(), None);

        assert_eq!(ed.search_regexp(&regex("x"), 0, true), Some(range(0, 0, 1)));
        assert_eq!(ed.search_next(), Some(range(0, 4, 5)));
        assert_eq!(ed.search_next(), Some(range(1, 0, 1)));
        // Wraps to the top
        assert_eq!(ed.search_next(), Some(range(0, 0, 1)));

        // Backward wraps to the last match
        assert_eq!(ed.search_prev(), Some(range(1, 0, 1)));
        assert_eq!(ed.search_prev(), Some(range(0, 4, 5)));
        assert_eq!(ed.search_prev(), Some(range(0, 0, 1)));
    }

    #[test]
    fn test_search_matches_grapheme_columns() {
        let ed = Editor::new(TextBuffer::from_text("é x é\nnone"));
        let matches = ed.search_matches(&regex("é"));
        assert_eq!(matches, vec![range(0, 0, 1), range(0, 4, 5)]);
    }

    #[test]
    fn test_search_commits_typing() {
        let mut ed = Editor::new(TextBuffer::from_text("abc"));
        ed.insert_char('x');
        assert_eq!(ed.search_regexp(&regex("x"), 0, false), Some(range(0, 0, 1)));
        ed.reset_selection();
        ed.insert_char('y');

        assert!(ed.undo());
        assert_eq!(ed.buffer().text(), "xabc");
    }
}
