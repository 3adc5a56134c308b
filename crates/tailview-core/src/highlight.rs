#![forbid(unsafe_code)]

//! Case-insensitive search-match splitting for presentation.
//!
//! `highlight` splits a line around every non-overlapping occurrence of the
//! active query so the rendering surface can style matches. The query is
//! always a literal; characters that are special in pattern syntaxes have
//! no effect here.
//!
//! Matching is Unicode-correct: byte offsets always come from the original
//! string, never from a case-folded copy (folding can change byte lengths,
//! e.g. `İ` lowercases to two code points).

use smallvec::SmallVec;

/// One piece of a split line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// The slice content.
    pub text: String,
    /// True when this slice is an occurrence of the query.
    pub matched: bool,
}

impl HighlightSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    fn hit(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

/// Spans for one line. Most lines split into a handful of pieces, so the
/// storage is inline up to four.
pub type HighlightSpans = SmallVec<[HighlightSpan; 4]>;

/// Split `text` around case-insensitive occurrences of `query`.
///
/// An empty query yields a single unmatched span holding the whole text.
/// Concatenating the returned spans' `text` always reproduces `text` exactly.
#[must_use]
pub fn highlight(text: &str, query: &str) -> HighlightSpans {
    let mut spans = HighlightSpans::new();
    if query.is_empty() {
        spans.push(HighlightSpan::plain(text));
        return spans;
    }

    let mut cursor = 0;
    while let Some((start, end)) = find_ignore_case(text, query, cursor) {
        if start > cursor {
            spans.push(HighlightSpan::plain(&text[cursor..start]));
        }
        spans.push(HighlightSpan::hit(&text[start..end]));
        cursor = end;
    }
    if cursor < text.len() || spans.is_empty() {
        spans.push(HighlightSpan::plain(&text[cursor..]));
    }
    spans
}

/// True when `haystack` contains `needle` case-insensitively.
///
/// This is the same predicate the highlighter marks, so a line passes the
/// text filter exactly when at least one of its spans would be matched.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle, 0).is_some()
}

/// Byte range `[start, end)` of the first case-insensitive occurrence of
/// `needle` at or after byte offset `from` (which must lie on a char
/// boundary). `None` for an empty needle.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let folded: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if folded.is_empty() {
        return None;
    }
    let tail = &haystack[from..];
    for (offset, _) in tail.char_indices() {
        let start = from + offset;
        if let Some(end) = match_at(haystack, start, &folded) {
            return Some((start, end));
        }
    }
    None
}

/// If the folded needle matches at byte offset `start`, return the byte
/// offset just past the matched text.
fn match_at(haystack: &str, start: usize, folded_needle: &[char]) -> Option<usize> {
    let mut want = folded_needle.iter();
    let mut next_want = want.next();
    for (offset, ch) in haystack[start..].char_indices() {
        for folded in ch.to_lowercase() {
            match next_want {
                Some(&w) if w == folded => next_want = want.next(),
                // Either a mismatch, or the needle ran out midway through
                // this character's folding; a match cannot end inside a
                // source character.
                _ => return None,
            }
        }
        if next_want.is_none() {
            return Some(start + offset + ch.len_utf8());
        }
    }
    None
}
