//! Word classification over grapheme clusters.
//!
//! A grapheme is a word grapheme when its base character is a Unicode
//! letter, digit or underscore. Combining marks belong to the cluster of
//! their base character, so they never split a word.

use unicode_segmentation::UnicodeSegmentation;

/// Character class used for word motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Word,
    Other,
}

/// Classify one grapheme cluster
pub fn classify(grapheme: &str) -> CharClass {
    match grapheme.chars().next() {
        Some(ch) if ch.is_alphanumeric() || ch == '_' => CharClass::Word,
        _ => CharClass::Other,
    }
}

/// Check if a grapheme cluster is part of a word
pub fn is_word_grapheme(grapheme: &str) -> bool {
    classify(grapheme) == CharClass::Word
}

/// Column span `[start, end)` of the word run covering `column`.
///
/// A column at end of line is treated as the last grapheme. Returns `None`
/// when the grapheme there is not a word grapheme.
pub fn word_span(line: &str, column: usize) -> Option<(usize, usize)> {
    let graphemes: Vec<&str> = line.graphemes(true).collect();
    if graphemes.is_empty() {
        return None;
    }

    let col = column.min(graphemes.len() - 1);
    if !is_word_grapheme(graphemes[col]) {
        return None;
    }

    let mut start = col;
    while start > 0 && is_word_grapheme(graphemes[start - 1]) {
        start -= 1;
    }

    let mut end = col;
    while end < graphemes.len() && is_word_grapheme(graphemes[end]) {
        end += 1;
    }

    Some((start, end))
}

/// First column after `column` where the class changes, if any on this line
pub fn next_transition(line: &str, column: usize) -> Option<usize> {
    let classes: Vec<CharClass> = line.graphemes(true).map(classify).collect();
    if column >= classes.len() {
        return None;
    }

    let current = classes[column];
    (column + 1..classes.len()).find(|&i| classes[i] != current)
}

/// Last column before `column` where a class run starts, if any on this line
pub fn prev_transition(line: &str, column: usize) -> Option<usize> {
    let classes: Vec<CharClass> = line.graphemes(true).map(classify).collect();
    let column = column.min(classes.len());
    if column == 0 {
        return None;
    }

    let current = classes[column - 1];
    let mut start = column - 1;
    while start > 0 && classes[start - 1] == current {
        start -= 1;
    }
    Some(start)
}
