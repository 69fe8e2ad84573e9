//! Unified diff of two text blocks.

use super::highlight::highlight_pairs;
use super::patch::Counters;
use super::{DiffLine, DiffOptions};
use regex::Regex;
use similar::udiff::UnifiedHunkHeader;
use similar::{ChangeTag, TextDiff};
use std::sync::LazyLock;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("valid hunk header regex")
});

/// Line-level diff with one header line per hunk.
pub(super) fn diff_texts(old: &str, new: &str, options: &DiffOptions) -> Vec<DiffLine> {
    if old == new {
        return Vec::new();
    }

    let diff = TextDiff::configure()
        .algorithm(options.algorithm.to_similar())
        .diff_lines(old, new);

    let mut lines = Vec::new();
    for group in diff.grouped_ops(options.context_lines) {
        let header = UnifiedHunkHeader::new(&group).to_string();
        let (old_start, new_start) = parse_hunk_header(&header);
        let mut counters = Counters::new(old_start, new_start);

        lines.push(DiffLine::hunk_header(header));
        let body_start = lines.len();

        for op in &group {
            for change in diff.iter_changes(op) {
                let prefix = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                let raw = format!("{prefix}{}", change.value());
                lines.extend(counters.step(&raw));
            }
        }

        highlight_pairs(&mut lines[body_start..]);
    }
    lines
}

/// Old and new start lines of a `@@ -a,b +c,d @@` header.
///
/// Either number falls back to 1 when it cannot be read.
pub(super) fn parse_hunk_header(header: &str) -> (usize, usize) {
    let Some(caps) = HUNK_HEADER.captures(header) else {
        return (1, 1);
    };
    let start = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1)
    };
    (start(1), start(2))
}
