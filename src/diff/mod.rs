//! Line and character level diffs for file edits.
//!
//! Two entry points produce the same [`DiffLine`] sequence:
//! - [`diff_from_patch`] walks a structured patch recorded by the edit tool
//! - [`diff`] computes a unified diff between two text blocks
//!
//! Adjacent delete/add lines inside a hunk are then aligned character by
//! character so renderers can mark only the part of a line that changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod highlight;
mod patch;
mod unified;

pub use highlight::{char_spans, highlight_pairs};
pub use patch::PatchHunk;

/// Default number of unchanged lines around each change.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

// ===== DiffLine =====

/// Kind of one diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineKind {
    /// Unchanged line present on both sides
    Context,
    /// Line only in the new text
    Add,
    /// Line only in the old text
    Delete,
    /// `@@ -a,b +c,d @@` hunk boundary
    HunkHeader,
}

/// Byte range of `DiffLine::content` that changed.
///
/// Both ends lie on UTF-8 character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl HighlightSpan {
    /// Create a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One line of a rendered diff.
///
/// Line numbers are 1-based and only set where they are meaningful:
/// context lines carry both, deletes only the old number, adds only the new
/// number, hunk headers neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    kind: DiffLineKind,
    old_line_no: Option<usize>,
    new_line_no: Option<usize>,
    content: String,
    #[serde(default)]
    highlight_spans: Vec<HighlightSpan>,
    #[serde(default)]
    paired: bool,
}

impl DiffLine {
    fn new(
        kind: DiffLineKind,
        old_line_no: Option<usize>,
        new_line_no: Option<usize>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            old_line_no,
            new_line_no,
            content: content.into(),
            highlight_spans: Vec::new(),
            paired: false,
        }
    }

    /// Unchanged line at `old`/`new`.
    pub fn context(old: usize, new: usize, content: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Context, Some(old), Some(new), content)
    }

    /// Line added at `new`.
    pub fn add(new: usize, content: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Add, None, Some(new), content)
    }

    /// Line deleted from `old`.
    pub fn delete(old: usize, content: impl Into<String>) -> Self {
        Self::new(DiffLineKind::Delete, Some(old), None, content)
    }

    /// Hunk header line; `content` is the header text itself.
    pub fn hunk_header(content: impl Into<String>) -> Self {
        Self::new(DiffLineKind::HunkHeader, None, None, content)
    }

    /// Line kind.
    pub fn kind(&self) -> DiffLineKind {
        self.kind
    }

    /// Line number in the old text.
    pub fn old_line_no(&self) -> Option<usize> {
        self.old_line_no
    }

    /// Line number in the new text.
    pub fn new_line_no(&self) -> Option<usize> {
        self.new_line_no
    }

    /// Line text without prefix or terminator.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Changed byte ranges of `content`, ordered and non-overlapping.
    pub fn highlight_spans(&self) -> &[HighlightSpan] {
        &self.highlight_spans
    }

    /// Whether this line is half of a delete/add modification pair.
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Add or delete line with no counterpart; the whole line changed.
    pub fn is_fully_changed(&self) -> bool {
        matches!(self.kind, DiffLineKind::Add | DiffLineKind::Delete) && !self.paired
    }

    pub(crate) fn set_highlight(&mut self, spans: Vec<HighlightSpan>) {
        self.highlight_spans = spans;
        self.paired = true;
    }
}

// ===== DiffStats =====

/// Addition and deletion totals for one diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Number of added lines
    pub additions: usize,
    /// Number of deleted lines
    pub deletions: usize,
}

impl DiffStats {
    /// Count add and delete lines.
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut stats, line| {
            match line.kind() {
                DiffLineKind::Add => stats.additions += 1,
                DiffLineKind::Delete => stats.deletions += 1,
                DiffLineKind::Context | DiffLineKind::HunkHeader => {}
            }
            stats
        })
    }

    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

impl std::ops::AddAssign for DiffStats {
    fn add_assign(&mut self, other: Self) {
        self.additions += other.additions;
        self.deletions += other.deletions;
    }
}

// ===== Options =====

/// Line alignment algorithm for text diffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Myers' O(ND) algorithm
    #[default]
    Myers,
    /// Patience diff, anchored on unique lines
    Patience,
    /// Classic longest common subsequence
    Lcs,
}

impl DiffAlgorithm {
    /// Lowercase name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Myers => "myers",
            Self::Patience => "patience",
            Self::Lcs => "lcs",
        }
    }

    pub(crate) fn to_similar(self) -> similar::Algorithm {
        match self {
            Self::Myers => similar::Algorithm::Myers,
            Self::Patience => similar::Algorithm::Patience,
            Self::Lcs => similar::Algorithm::Lcs,
        }
    }
}

impl fmt::Display for DiffAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diff algorithm '{0}' (expected myers, patience or lcs)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for DiffAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "myers" => Ok(Self::Myers),
            "patience" => Ok(Self::Patience),
            "lcs" => Ok(Self::Lcs),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Options for text diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Unchanged lines kept around each change
    pub context_lines: usize,
    /// Line alignment algorithm
    pub algorithm: DiffAlgorithm,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            algorithm: DiffAlgorithm::default(),
        }
    }
}

// ===== FileDiff =====

/// Diff lines of one file change together with their totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Diff lines in display order
    pub lines: Vec<DiffLine>,
    /// Addition and deletion totals
    pub stats: DiffStats,
}

impl FileDiff {
    /// Diff from a structured patch.
    ///
    /// Totals honor explicit per-hunk `additions`/`deletions` counts.
    pub fn from_patch(hunks: &[PatchHunk]) -> Self {
        let (lines, stats) = patch::walk_hunks(hunks);
        Self { lines, stats }
    }

    /// Diff between two text blocks.
    pub fn from_texts(old: &str, new: &str, options: &DiffOptions) -> Self {
        let lines = unified::diff_texts(old, new, options);
        let stats = DiffStats::from_lines(&lines);
        Self { lines, stats }
    }

    /// Concatenated diffs of successive `(old, new)` replacements.
    pub fn from_edits<'a, I>(edits: I, options: &DiffOptions) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        edits
            .into_iter()
            .fold(Self::default(), |mut acc, (old, new)| {
                let next = Self::from_texts(old, new, options);
                acc.lines.extend(next.lines);
                acc.stats += next.stats;
                acc
            })
    }

    /// True when the diff has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ===== Core functions =====

/// Unified diff of two text blocks with default options.
///
/// Identical inputs yield an empty sequence.
///
/// # Examples
///
/// ```
/// use cchist::diff::{diff, DiffLineKind};
///
/// let lines = diff("", "a\nb\n");
/// assert_eq!(lines[0].kind(), DiffLineKind::HunkHeader);
/// assert_eq!(lines[1].new_line_no(), Some(1));
/// assert_eq!(lines[2].new_line_no(), Some(2));
/// ```
pub fn diff(old: &str, new: &str) -> Vec<DiffLine> {
    diff_with(old, new, &DiffOptions::default())
}

/// Unified diff of two text blocks.
pub fn diff_with(old: &str, new: &str, options: &DiffOptions) -> Vec<DiffLine> {
    unified::diff_texts(old, new, options)
}

/// Diff lines of a structured patch.
pub fn diff_from_patch(hunks: &[PatchHunk]) -> Vec<DiffLine> {
    patch::walk_hunks(hunks).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_line_constructors_set_line_numbers_by_kind() {
        let ctx = DiffLine::context(3, 4, "same");
        assert_eq!((ctx.old_line_no(), ctx.new_line_no()), (Some(3), Some(4)));

        let add = DiffLine::add(5, "new");
        assert_eq!((add.old_line_no(), add.new_line_no()), (None, Some(5)));
        assert!(add.is_fully_changed());

        let del = DiffLine::delete(6, "old");
        assert_eq!((del.old_line_no(), del.new_line_no()), (Some(6), None));

        let header = DiffLine::hunk_header("@@ -1 +1 @@");
        assert_eq!(header.kind(), DiffLineKind::HunkHeader);
        assert!(!header.is_fully_changed());
    }

    #[test]
    fn set_highlight_marks_line_paired() {
        let mut line = DiffLine::delete(1, "foo bar");
        line.set_highlight(vec![HighlightSpan::new(6, 7)]);
        assert!(line.is_paired());
        assert!(!line.is_fully_changed());
        assert_eq!(line.highlight_spans(), &[HighlightSpan::new(6, 7)]);
    }

    #[test]
    fn diff_stats_counts_adds_and_deletes_only() {
        let lines = vec![
            DiffLine::hunk_header("@@ -1,2 +1,2 @@"),
            DiffLine::context(1, 1, "a"),
            DiffLine::delete(2, "b"),
            DiffLine::add(2, "c"),
            DiffLine::add(3, "d"),
        ];
        assert_eq!(
            DiffStats::from_lines(&lines),
            DiffStats {
                additions: 2,
                deletions: 1
            }
        );
    }

    #[test]
    fn diff_algorithm_parses_case_insensitively() {
        assert_eq!("Patience".parse::<DiffAlgorithm>(), Ok(DiffAlgorithm::Patience));
        assert_eq!("lcs".parse::<DiffAlgorithm>(), Ok(DiffAlgorithm::Lcs));
        assert_eq!(
            "histogram".parse::<DiffAlgorithm>(),
            Err(UnknownAlgorithm("histogram".to_string()))
        );
    }

    #[test]
    fn diff_identical_inputs_is_empty() {
        assert!(diff("", "").is_empty());
        assert!(diff("a\nb\n", "a\nb\n").is_empty());
    }

    #[test]
    fn from_edits_concatenates_each_replacement() {
        let edits = [("alpha\n", "beta\n"), ("one\n", "one\ntwo\n")];
        let file_diff = FileDiff::from_edits(edits, &DiffOptions::default());

        let headers = file_diff
            .lines
            .iter()
            .filter(|l| l.kind() == DiffLineKind::HunkHeader)
            .count();
        assert_eq!(headers, 2);
        assert_eq!(
            file_diff.stats,
            DiffStats {
                additions: 2,
                deletions: 1
            }
        );
    }

    #[test]
    fn from_edits_with_no_changes_is_empty() {
        let file_diff = FileDiff::from_edits([("same", "same")], &DiffOptions::default());
        assert!(file_diff.is_empty());
        assert!(file_diff.stats.is_empty());
    }

    #[test]
    fn diff_line_round_trips_through_json() {
        let mut line = DiffLine::add(2, "foo baz");
        line.set_highlight(vec![HighlightSpan::new(6, 7)]);
        let json = serde_json::to_string(&line).expect("serialize");
        let back: DiffLine = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, line);
    }
}
