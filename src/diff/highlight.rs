//! Character-level highlighting of modified lines.

use super::{DiffLine, DiffLineKind, HighlightSpan};
use similar::{DiffTag, TextDiff};

/// Pair each delete line with an add line directly after it and mark the
/// characters that differ.
///
/// Callers pass one hunk at a time so pairs never straddle a hunk boundary.
pub fn highlight_pairs(lines: &mut [DiffLine]) {
    let mut i = 0;
    while i + 1 < lines.len() {
        if lines[i].kind() == DiffLineKind::Delete && lines[i + 1].kind() == DiffLineKind::Add {
            let (old_spans, new_spans) = char_spans(lines[i].content(), lines[i + 1].content());
            lines[i].set_highlight(old_spans);
            lines[i + 1].set_highlight(new_spans);
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// Changed byte ranges of `old` and `new` under a minimal character alignment.
///
/// Delete and replace opcodes mark `old`; insert and replace opcodes mark
/// `new`. Adjacent ranges are merged.
///
/// # Examples
///
/// ```
/// use cchist::diff::{char_spans, HighlightSpan};
///
/// let (old, new) = char_spans("foo bar", "foo baz");
/// assert_eq!(old, vec![HighlightSpan::new(6, 7)]);
/// assert_eq!(new, vec![HighlightSpan::new(6, 7)]);
/// ```
pub fn char_spans(old: &str, new: &str) -> (Vec<HighlightSpan>, Vec<HighlightSpan>) {
    let diff = TextDiff::configure().diff_chars(old, new);
    let old_offsets = byte_offsets(old);
    let new_offsets = byte_offsets(new);

    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();

    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if matches!(tag, DiffTag::Delete | DiffTag::Replace) {
            push_span(
                &mut old_spans,
                old_offsets[old_range.start],
                old_offsets[old_range.end],
            );
        }
        if matches!(tag, DiffTag::Insert | DiffTag::Replace) {
            push_span(
                &mut new_spans,
                new_offsets[new_range.start],
                new_offsets[new_range.end],
            );
        }
    }

    (old_spans, new_spans)
}

/// Byte offset of every char index, plus the end of the string.
fn byte_offsets(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(s.len()))
        .collect()
}

fn push_span(spans: &mut Vec<HighlightSpan>, start: usize, end: usize) {
    if start == end {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.end == start => last.end = end,
        _ => spans.push(HighlightSpan::new(start, end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked<'a>(content: &'a str, spans: &[HighlightSpan]) -> Vec<&'a str> {
        spans.iter().map(|s| &content[s.start..s.end]).collect()
    }

    #[test]
    fn common_prefix_is_unmarked() {
        let (old, new) = char_spans("foo bar", "foo baz");
        assert_eq!(marked("foo bar", &old), vec!["r"]);
        assert_eq!(marked("foo baz", &new), vec!["z"]);
        assert!(old.iter().all(|s| s.start >= 4));
    }

    #[test]
    fn pure_insertion_marks_only_new() {
        let (old, new) = char_spans("let x = 1;", "let mut x = 1;");
        assert!(old.is_empty());
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].len(), "mut ".len());
    }

    #[test]
    fn pure_deletion_marks_only_old() {
        let (old, new) = char_spans("a, b, c", "a, c");
        assert!(new.is_empty());
        assert_eq!(old.iter().map(HighlightSpan::len).sum::<usize>(), 3);
    }

    #[test]
    fn identical_lines_have_no_spans() {
        let (old, new) = char_spans("same", "same");
        assert!(old.is_empty() && new.is_empty());
    }

    #[test]
    fn multibyte_spans_fall_on_char_boundaries() {
        let old_text = "naïve café";
        let new_text = "naive cafe";
        let (old, new) = char_spans(old_text, new_text);

        for span in &old {
            assert!(old_text.is_char_boundary(span.start));
            assert!(old_text.is_char_boundary(span.end));
        }
        assert_eq!(marked(old_text, &old), vec!["ï", "é"]);
        assert_eq!(marked(new_text, &new), vec!["i", "e"]);
    }

    #[test]
    fn adjacent_spans_are_coalesced() {
        let mut spans = Vec::new();
        push_span(&mut spans, 0, 2);
        push_span(&mut spans, 2, 4);
        push_span(&mut spans, 5, 6);
        push_span(&mut spans, 6, 6);
        assert_eq!(spans, vec![HighlightSpan::new(0, 4), HighlightSpan::new(5, 6)]);
    }

    #[test]
    fn highlight_pairs_only_pairs_adjacent_delete_add() {
        let mut lines = vec![
            DiffLine::delete(1, "alpha"),
            DiffLine::delete(2, "beta"),
            DiffLine::add(1, "betta"),
            DiffLine::add(2, "gamma"),
        ];
        highlight_pairs(&mut lines);

        assert!(lines[0].is_fully_changed());
        assert!(lines[1].is_paired());
        assert!(lines[2].is_paired());
        assert!(lines[3].is_fully_changed());
        assert_eq!(marked("betta", lines[2].highlight_spans()), vec!["t"]);
    }

    #[test]
    fn highlight_pairs_ignores_add_before_delete() {
        let mut lines = vec![DiffLine::add(1, "x"), DiffLine::delete(1, "y")];
        highlight_pairs(&mut lines);
        assert!(lines.iter().all(DiffLine::is_fully_changed));
    }
}
