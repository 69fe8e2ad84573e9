//! Uncolored text rendering.

use super::{PairView, Renderer, ToolOutcome, ToolView, Transcript};
use crate::diff::{DiffLine, DiffLineKind, FileDiff};
use std::io::{self, Write};

/// Default number of shell output lines shown before abbreviating.
pub const DEFAULT_SHELL_PREVIEW_LINES: usize = 8;

const USER_PROMPT: &str = ">";
const BULLET: &str = "●";
const RESULT: &str = "  ⎿  ";
const CONTINUATION: &str = "     ";
const DIFF_INDENT: &str = "       ";
const TODO_COMPLETE: &str = "✓";
const TODO_PENDING: &str = "○";

/// Renders a transcript as plain text in the layout of the Claude Code
/// terminal, without colors.
///
/// Changed characters of paired diff lines are marked inline as `[-old-]`
/// and `{+new+}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainRenderer {
    shell_preview_lines: usize,
}

impl Default for PlainRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_PREVIEW_LINES)
    }
}

impl PlainRenderer {
    /// Renderer that abbreviates shell output longer than `shell_preview_lines`.
    pub fn new(shell_preview_lines: usize) -> Self {
        Self {
            shell_preview_lines,
        }
    }

    fn render_pair(&self, pair: &PairView, out: &mut dyn Write) -> io::Result<()> {
        if let Some(user) = &pair.user {
            for (i, line) in user.text.lines().enumerate() {
                let prefix = if i == 0 { USER_PROMPT } else { " " };
                writeln!(out, "{prefix} {line}")?;
            }
            writeln!(out)?;
        }

        if pair.cost_usd.is_some() || pair.duration_ms.is_some() {
            writeln!(
                out,
                "{}",
                cost_line(pair.cost_usd.unwrap_or(0.0), pair.duration_ms.unwrap_or(0.0))
            )?;
        }

        let mut wrote_block = false;
        if !pair.text.is_empty() {
            write_bulleted(&pair.text, out)?;
            wrote_block = true;
        }

        for tool in &pair.tools {
            if wrote_block {
                writeln!(out)?;
            }
            self.render_tool(tool, out)?;
            wrote_block = true;
        }
        writeln!(out)
    }

    fn render_tool(&self, tool: &ToolView, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{BULLET} {}", tool.label)?;
        if let Some(command) = &tool.command {
            writeln!(out, "    $ {command}")?;
        }

        match &tool.outcome {
            ToolOutcome::Shell { lines } => self.render_shell(lines, out),
            ToolOutcome::Created {
                file_name,
                line_count: Some(count),
            } => writeln!(out, "{RESULT}Created {file_name} ({count} lines)"),
            ToolOutcome::Created { file_name, .. } => writeln!(out, "{RESULT}Created {file_name}"),
            ToolOutcome::Modified {
                file_name,
                diff: Some(diff),
            } => render_file_diff(file_name, diff, out),
            ToolOutcome::Modified { file_name, .. } => {
                writeln!(out, "{RESULT}Modified {file_name}")
            }
            ToolOutcome::Read {
                file_name,
                line_count,
            } => writeln!(out, "{RESULT}Read {file_name} ({line_count} lines)"),
            ToolOutcome::Todos { updated, items } => {
                let heading = if *updated {
                    "Updated TODO list"
                } else {
                    "Current TODO list"
                };
                if items.is_empty() {
                    return writeln!(out, "{RESULT}{heading}: no items");
                }
                writeln!(out, "{RESULT}{heading}:")?;
                for item in items {
                    let mark = if item.is_completed() {
                        TODO_COMPLETE
                    } else {
                        TODO_PENDING
                    };
                    writeln!(out, "{DIFF_INDENT}{mark} {}", item.content)?;
                }
                Ok(())
            }
            ToolOutcome::Failed { message } => {
                let mut lines = message.lines();
                writeln!(out, "{RESULT}Error: {}", lines.next().unwrap_or_default())?;
                for line in lines {
                    writeln!(out, "{CONTINUATION}{line}")?;
                }
                Ok(())
            }
            ToolOutcome::Completed => writeln!(out, "{RESULT}Completed"),
        }
    }

    fn render_shell(&self, lines: &[String], out: &mut dyn Write) -> io::Result<()> {
        let Some((first, rest)) = lines.split_first() else {
            return writeln!(out, "{RESULT}(No output)");
        };

        // Head, elision marker, last line; tiny previews still keep one of each
        let head = self.shell_preview_lines.saturating_sub(2).max(1);
        let hidden = lines.len().saturating_sub(head + 1);
        if lines.len() <= self.shell_preview_lines || hidden == 0 {
            writeln!(out, "{RESULT}{first}")?;
            for line in rest {
                writeln!(out, "{CONTINUATION}{line}")?;
            }
            return Ok(());
        }

        for (i, line) in lines[..head].iter().enumerate() {
            let prefix = if i == 0 { RESULT } else { CONTINUATION };
            writeln!(out, "{prefix}{line}")?;
        }
        writeln!(out, "{CONTINUATION}... ({hidden} more lines)")?;
        writeln!(out, "{CONTINUATION}{}", lines[lines.len() - 1])
    }
}

impl Renderer for PlainRenderer {
    fn render(&self, transcript: &Transcript, out: &mut dyn Write) -> io::Result<()> {
        for pair in &transcript.pairs {
            self.render_pair(pair, out)?;
        }
        Ok(())
    }
}

fn cost_line(cost: f64, duration_ms: f64) -> String {
    let seconds = duration_ms / 1000.0;
    if cost >= 0.01 {
        format!("Cost: ${cost:.4} ({seconds:.1}s)")
    } else {
        format!("Cost: ${cost:.6} ({seconds:.1}s)")
    }
}

fn write_bulleted(text: &str, out: &mut dyn Write) -> io::Result<()> {
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            writeln!(out, "{BULLET} {line}")?;
        } else if line.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

fn render_file_diff(file_name: &str, diff: &FileDiff, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "{RESULT}Modified {file_name} (+{}/-{})",
        diff.stats.additions, diff.stats.deletions
    )?;
    for line in &diff.lines {
        writeln!(out, "{DIFF_INDENT}{}", format_diff_line(line))?;
    }
    Ok(())
}

/// One diff line with its number, sign and inline change marks.
pub(crate) fn format_diff_line(line: &DiffLine) -> String {
    let number = |n: Option<usize>| n.map_or_else(String::new, |n| n.to_string());
    match line.kind() {
        DiffLineKind::HunkHeader => line.content().to_string(),
        DiffLineKind::Context => format!("{:>5}  {}", number(line.new_line_no()), line.content()),
        DiffLineKind::Delete => format!(
            "{:>5} -{}",
            number(line.old_line_no()),
            mark_spans(line, "[-", "-]")
        ),
        DiffLineKind::Add => format!(
            "{:>5} +{}",
            number(line.new_line_no()),
            mark_spans(line, "{+", "+}")
        ),
    }
}

fn mark_spans(line: &DiffLine, open: &str, close: &str) -> String {
    let content = line.content();
    let mut marked = String::with_capacity(content.len());
    let mut cursor = 0;
    for span in line.highlight_spans() {
        marked.push_str(&content[cursor..span.start]);
        marked.push_str(open);
        marked.push_str(&content[span.start..span.end]);
        marked.push_str(close);
        cursor = span.end;
    }
    marked.push_str(&content[cursor..]);
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff, diff_from_patch, PatchHunk};

    fn render_shell(preview: usize, lines: &[&str]) -> String {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let mut out = Vec::new();
        PlainRenderer::new(preview)
            .render_shell(&lines, &mut out)
            .expect("write to vec");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn format_diff_line_marks_changed_characters() {
        let lines = diff("foo bar\n", "foo baz\n");
        let rendered: Vec<String> = lines.iter().map(format_diff_line).collect();
        assert_eq!(
            rendered,
            vec![
                "@@ -1 +1 @@".to_string(),
                "    1 -foo ba[-r-]".to_string(),
                "    1 +foo ba{+z+}".to_string(),
            ]
        );
    }

    #[test]
    fn format_diff_line_leaves_unpaired_lines_unmarked() {
        let lines = diff_from_patch(&[PatchHunk::new(4, 4, [" keep", "+added"])]);
        assert_eq!(format_diff_line(&lines[0]), "    4  keep");
        assert_eq!(format_diff_line(&lines[1]), "    5 +added");
    }

    #[test]
    fn short_shell_output_is_shown_in_full() {
        assert_eq!(render_shell(8, &["one", "two"]), "  ⎿  one\n     two\n");
    }

    #[test]
    fn empty_shell_output_is_marked() {
        assert_eq!(render_shell(8, &[]), "  ⎿  (No output)\n");
    }

    #[test]
    fn long_shell_output_is_abbreviated() {
        let lines: Vec<String> = (1..=12).map(|i| format!("l{i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let rendered = render_shell(8, &refs);

        let expected = "  ⎿  l1\n     l2\n     l3\n     l4\n     l5\n     l6\n     ... (5 more lines)\n     l12\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn tiny_previews_never_elide_nothing() {
        assert_eq!(render_shell(0, &["only"]), "  ⎿  only\n");
        assert_eq!(render_shell(1, &["a", "b"]), "  ⎿  a\n     b\n");
        assert_eq!(
            render_shell(0, &["a", "b", "c"]),
            "  ⎿  a\n     ... (1 more lines)\n     c\n"
        );
    }

    #[test]
    fn cost_line_switches_precision() {
        assert_eq!(cost_line(0.0213, 4120.0), "Cost: $0.0213 (4.1s)");
        assert_eq!(cost_line(0.004, 800.0), "Cost: $0.004000 (0.8s)");
    }
}
