//! Indentation style detection.

/// Smallest indent unit considered when tallying space runs
const MIN_INDENT_WIDTH: usize = 2;
/// Largest indent unit considered when tallying space runs
const MAX_INDENT_WIDTH: usize = 8;

/// Detected indentation style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentType {
    /// Indented with runs of N spaces
    Spaces(usize),
    /// Indented with tabs (also returned when there is no evidence)
    Tabs,
}

impl IndentType {
    /// Text of one indentation level
    pub fn unit(&self) -> String {
        match self {
            IndentType::Spaces(width) => " ".repeat(*width),
            IndentType::Tabs => "\t".to_string(),
        }
    }
}

/// Leading whitespace run (spaces and tabs) of a line
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Detect indentation over a set of lines.
///
/// Lines whose prefix mixes spaces and tabs are skipped. Every width in
/// `2..=8` that evenly divides a space run gets a vote; the width with
/// the most votes wins, larger widths winning ties.
pub fn detect<'a>(lines: impl IntoIterator<Item = &'a str>) -> IndentType {
    let mut tally = [0usize; MAX_INDENT_WIDTH + 1];
    let mut space_lines = 0;
    let mut tab_lines = 0;

    for line in lines {
        let prefix = leading_whitespace(line);
        // Whitespace-only lines carry no evidence
        let content = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if prefix.is_empty() || prefix.len() == content.len() {
            continue;
        }

        if prefix.bytes().all(|b| b == b'\t') {
            tab_lines += 1;
        } else if prefix.bytes().all(|b| b == b' ') {
            space_lines += 1;
            let run = prefix.len();
            for (width, votes) in tally.iter_mut().enumerate().skip(MIN_INDENT_WIDTH) {
                if run % width == 0 {
                    *votes += 1;
                }
            }
        }
    }

    if tab_lines >= space_lines {
        return IndentType::Tabs;
    }

    let mut best = None;
    for (width, &votes) in tally.iter().enumerate().skip(MIN_INDENT_WIDTH) {
        if votes > 0 && best.map_or(true, |(_, best_votes)| votes >= best_votes) {
            best = Some((width, votes));
        }
    }

    match best {
        Some((width, _)) => IndentType::Spaces(width),
        None => IndentType::Tabs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_space_indent() {
        let text = "fn main() {\n  let a = 1;\n  if a {\n    call();\n  }\n}\n";
        assert_eq!(detect(text.lines()), IndentType::Spaces(2));
    }

    #[test]
    fn test_four_space_indent() {
        let text = "class A:\n    def f(self):\n        return 1\n    x = 2\n";
        assert_eq!(detect(text.lines()), IndentType::Spaces(4));
    }

    #[test]
    fn test_tab_indent() {
        let text = "int main() {\n\treturn 0;\n\tif (x) {\n\t\ty();\n\t}\n}\n";
        assert_eq!(detect(text.lines()), IndentType::Tabs);
    }

    #[test]
    fn test_no_evidence_is_tabs() {
        assert_eq!(detect("a\nb\nc".lines()), IndentType::Tabs);
        assert_eq!(detect("".lines()), IndentType::Tabs);
    }

    #[test]
    fn test_mixed_prefix_lines_skipped() {
        let text = "a\n  b\n \tc\n\t d\n  e\n";
        assert_eq!(detect(text.lines()), IndentType::Spaces(2));
    }

    #[test]
    fn test_unit() {
        assert_eq!(IndentType::Spaces(3).unit(), "   ");
        assert_eq!(IndentType::Tabs.unit(), "\t");
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(leading_whitespace("  \tfoo "), "  \t");
        assert_eq!(leading_whitespace("foo"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }
}
