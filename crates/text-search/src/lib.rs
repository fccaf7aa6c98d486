//! Text search for linedit.
//!
//! Patterns are validated once at the boundary ([`compile_pattern`]);
//! matching then runs line by line and reports grapheme columns.

use anyhow::{bail, Context, Result};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A match location in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Line number (0-indexed).
    pub line: usize,
    /// Column (grapheme offset, 0-indexed).
    pub col: usize,
    /// Match length in graphemes.
    pub len: usize,
}

impl Match {
    /// Column just past the match
    pub fn end_col(&self) -> usize {
        self.col + self.len
    }
}

/// Search options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Case-sensitive search.
    pub case_sensitive: bool,
    /// Use regex pattern.
    pub regex: bool,
    /// Whole word only.
    pub whole_word: bool,
}

impl SearchOptions {
    /// Options for a raw, case-sensitive regular expression
    pub fn regex() -> Self {
        Self {
            case_sensitive: true,
            regex: true,
            whole_word: false,
        }
    }
}

/// Build the final regex source for `pattern`
fn build_pattern(pattern: &str, options: &SearchOptions) -> String {
    let search_pattern = if options.regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };

    let search_pattern = if options.whole_word {
        format!(r"\b(?:{})\b", search_pattern)
    } else {
        search_pattern
    };

    if options.case_sensitive {
        search_pattern
    } else {
        format!("(?i){}", search_pattern)
    }
}

/// Validate and compile a search pattern.
///
/// Empty and malformed patterns are rejected here, so the editor only
/// ever receives a usable [`Regex`].
pub fn compile_pattern(pattern: &str, options: &SearchOptions) -> Result<Regex> {
    if pattern.is_empty() {
        bail!("Search pattern is empty");
    }
    Regex::new(&build_pattern(pattern, options))
        .with_context(|| format!("Invalid search pattern: {}", pattern))
}

/// Byte offsets where grapheme clusters start
fn cluster_starts(line: &str) -> Vec<usize> {
    line.grapheme_indices(true).map(|(byte, _)| byte).collect()
}

/// Column of the cluster containing byte `offset`
fn column_at_or_before(starts: &[usize], line_len: usize, offset: usize) -> usize {
    if offset >= line_len {
        return starts.len();
    }
    starts.partition_point(|&s| s <= offset).saturating_sub(1)
}

/// Column just past the cluster containing byte `offset - 1`
fn column_at_or_after(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&s| s < offset)
}

/// Matches of `regex` inside one line's content.
///
/// Columns are snapped outwards to whole grapheme clusters.
pub fn find_in_line(line_idx: usize, line: &str, regex: &Regex) -> Vec<Match> {
    let starts = cluster_starts(line);
    regex
        .find_iter(line)
        .map(|mat| {
            let col = column_at_or_before(&starts, line.len(), mat.start());
            let end = column_at_or_after(&starts, mat.end()).max(col);
            Match {
                line: line_idx,
                col,
                len: end - col,
            }
        })
        .collect()
}

/// First match on a line starting at or after grapheme column `from_col`
pub fn find_in_line_from(
    line_idx: usize,
    line: &str,
    regex: &Regex,
    from_col: usize,
) -> Option<Match> {
    find_in_line(line_idx, line, regex)
        .into_iter()
        .find(|m| m.col >= from_col)
}

/// Search every line and return all matches.
pub fn find_all<I, S>(lines: I, regex: &Regex) -> Vec<Match>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .flat_map(|(line_idx, line)| find_in_line(line_idx, line.as_ref(), regex))
        .collect()
}

/// Find closest match to given position.
pub fn find_closest(
    matches: &[Match],
    line: usize,
    col: usize,
    direction: SearchDirection,
) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }

    match direction {
        SearchDirection::Forward => {
            // Find first match at or after position
            matches
                .iter()
                .position(|m| m.line > line || (m.line == line && m.col >= col))
                .or(Some(0)) // Wrap to first match
        }
        SearchDirection::Backward => {
            // Find last match before position
            matches
                .iter()
                .rposition(|m| m.line < line || (m.line == line && m.col < col))
                .or(Some(matches.len() - 1)) // Wrap to last match
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> Regex {
        compile_pattern(pattern, &SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_find_all_simple() {
        let matches = find_all(["hello world", "hello there"], &compile("hello"));
        assert_eq!(matches.len(), 2);
        assert_eq!(
            matches[0],
            Match {
                line: 0,
                col: 0,
                len: 5
            }
        );
        assert_eq!(
            matches[1],
            Match {
                line: 1,
                col: 0,
                len: 5
            }
        );
    }

    #[test]
    fn test_find_all_case_insensitive() {
        let matches = find_all(["Hello HELLO hello"], &compile("hello"));
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_find_all_case_sensitive() {
        let opts = SearchOptions {
            case_sensitive: true,
            ..Default::default()
        };
        let regex = compile_pattern("hello", &opts).unwrap();
        assert_eq!(find_all(["Hello HELLO hello"], &regex).len(), 1);
    }

    #[test]
    fn test_literal_pattern_is_escaped() {
        let regex = compile("a.b");
        assert_eq!(find_all(["axb a.b"], &regex).len(), 1);
    }

    #[test]
    fn test_whole_word() {
        let opts = SearchOptions {
            whole_word: true,
            ..Default::default()
        };
        let regex = compile_pattern("cat", &opts).unwrap();
        let matches = find_all(["cat concat cat_s cat."], &regex);
        assert_eq!(matches.iter().map(|m| m.col).collect::<Vec<_>>(), vec![0, 17]);
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(compile_pattern("", &SearchOptions::regex()).is_err());
        let err = compile_pattern("(unclosed", &SearchOptions::regex()).unwrap_err();
        assert!(err.to_string().contains("Invalid search pattern"));
    }

    #[test]
    fn test_grapheme_columns() {
        let regex = compile_pattern("мир", &SearchOptions::regex()).unwrap();
        let matches = find_in_line(3, "Привет мир", &regex);
        assert_eq!(
            matches,
            vec![Match {
                line: 3,
                col: 7,
                len: 3
            }]
        );

        // Combining mark match snaps to its whole cluster
        let regex = compile_pattern("\u{301}", &SearchOptions::regex()).unwrap();
        let matches = find_in_line(0, "cafe\u{301}!", &regex);
        assert_eq!(matches[0].col, 3);
        assert_eq!(matches[0].end_col(), 4);
    }

    #[test]
    fn test_empty_matches() {
        let regex = compile_pattern("^", &SearchOptions::regex()).unwrap();
        let matches = find_in_line(0, "", &regex);
        assert_eq!(
            matches,
            vec![Match {
                line: 0,
                col: 0,
                len: 0
            }]
        );
    }

    #[test]
    fn test_find_in_line_from() {
        let regex = compile("ab");
        let found = find_in_line_from(0, "ab ab ab", &regex, 1).unwrap();
        assert_eq!(found.col, 3);
        assert!(find_in_line_from(0, "ab ab ab", &regex, 7).is_none());
    }

    #[test]
    fn test_find_closest() {
        let matches = vec![
            Match {
                line: 0,
                col: 5,
                len: 3,
            },
            Match {
                line: 2,
                col: 10,
                len: 3,
            },
            Match {
                line: 5,
                col: 0,
                len: 3,
            },
        ];

        assert_eq!(
            find_closest(&matches, 1, 0, SearchDirection::Forward),
            Some(1)
        );
        assert_eq!(
            find_closest(&matches, 3, 0, SearchDirection::Forward),
            Some(2)
        );
        assert_eq!(
            find_closest(&matches, 6, 0, SearchDirection::Forward),
            Some(0)
        );
        assert_eq!(
            find_closest(&matches, 2, 10, SearchDirection::Backward),
            Some(0)
        );
        assert_eq!(
            find_closest(&matches, 0, 0, SearchDirection::Backward),
            Some(2)
        );
        assert_eq!(find_closest(&[], 0, 0, SearchDirection::Forward), None);
    }
}
