//! Structured patches recorded by the edit tools.

use super::highlight::highlight_pairs;
use super::{DiffLine, DiffStats};
use serde::{Deserialize, Serialize};

fn first_line() -> usize {
    1
}

/// One hunk of a `structuredPatch`.
///
/// `lines` hold the prefixed body lines (`" ctx"`, `"-old"`, `"+new"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchHunk {
    /// First line of the hunk in the old file
    #[serde(default = "first_line")]
    pub old_start: usize,
    /// Old line count, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_lines: Option<usize>,
    /// First line of the hunk in the new file
    #[serde(default = "first_line")]
    pub new_start: usize,
    /// New line count, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_lines: Option<usize>,
    /// Prefixed body lines
    #[serde(default)]
    pub lines: Vec<String>,
    /// Explicit addition count, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<usize>,
    /// Explicit deletion count, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletions: Option<usize>,
}

impl PatchHunk {
    /// Hunk starting at `old_start`/`new_start` with the given body.
    pub fn new<S: Into<String>>(
        old_start: usize,
        new_start: usize,
        lines: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            old_start,
            old_lines: None,
            new_start,
            new_lines: None,
            lines: lines.into_iter().map(Into::into).collect(),
            additions: None,
            deletions: None,
        }
    }

    /// Totals for this hunk.
    ///
    /// Explicit counts win when both are recorded; otherwise body lines are
    /// counted, ignoring `+++`/`---` file headers.
    pub fn stats(&self) -> DiffStats {
        if let (Some(additions), Some(deletions)) = (self.additions, self.deletions) {
            return DiffStats {
                additions,
                deletions,
            };
        }
        self.lines
            .iter()
            .fold(DiffStats::default(), |mut stats, line| {
                if line.starts_with('+') && !line.starts_with("+++") {
                    stats.additions += 1;
                } else if line.starts_with('-') && !line.starts_with("---") {
                    stats.deletions += 1;
                }
                stats
            })
    }
}

/// Old/new line counters for one hunk body.
#[derive(Debug, Clone, Copy)]
pub(super) struct Counters {
    old: usize,
    new: usize,
}

impl Counters {
    pub(super) fn new(old: usize, new: usize) -> Self {
        Self { old, new }
    }

    /// Turn one prefixed body line into a diff line.
    ///
    /// Returns `None` for `\ No newline at end of file` markers.
    pub(super) fn step(&mut self, raw: &str) -> Option<DiffLine> {
        let raw = raw.trim_end_matches(['\n', '\r']);
        if let Some(rest) = raw.strip_prefix('-') {
            let line = DiffLine::delete(self.old, rest);
            self.old += 1;
            Some(line)
        } else if let Some(rest) = raw.strip_prefix('+') {
            let line = DiffLine::add(self.new, rest);
            self.new += 1;
            Some(line)
        } else if raw.starts_with('\\') {
            None
        } else {
            let content = raw.strip_prefix(' ').unwrap_or(raw);
            let line = DiffLine::context(self.old, self.new, content);
            self.old += 1;
            self.new += 1;
            Some(line)
        }
    }
}

/// Walk every hunk body, highlighting pairs per hunk.
pub(super) fn walk_hunks(hunks: &[PatchHunk]) -> (Vec<DiffLine>, DiffStats) {
    let mut lines = Vec::new();
    let mut stats = DiffStats::default();

    for hunk in hunks {
        let mut counters = Counters::new(hunk.old_start, hunk.new_start);
        let start = lines.len();
        lines.extend(hunk.lines.iter().filter_map(|raw| counters.step(raw)));
        highlight_pairs(&mut lines[start..]);
        stats += hunk.stats();
    }

    (lines, stats)
}
