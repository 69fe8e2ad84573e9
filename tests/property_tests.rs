//! Property-based tests for parser, assembler and diff invariants.
//!
//! Tests validate:
//! 1. Identifier constructors reject empty strings
//! 2. ToolName::parse round-trips correctly
//! 3. Diffing a text against itself yields nothing
//! 4. Diff line numbers are strictly increasing on each side
//! 5. Every assistant event after the first user event yields exactly one pair
//! 6. Tool results attach only as the carrier run right after a response

use cchist::assembler::assemble;
use cchist::diff::{
    diff, diff_from_patch, diff_with, DiffLineKind, DiffOptions, DiffStats, PatchHunk,
};
use cchist::model::{EntryUuid, SessionId, ToolName, ToolUseId};
use cchist::source::EventStore;
use proptest::prelude::*;

// ===== Property 1: Identifier Constructors =====

proptest! {
    #[test]
    fn identifiers_accept_exactly_non_empty_strings(s in any::<String>()) {
        prop_assert_eq!(EntryUuid::new(s.clone()).is_ok(), !s.is_empty());
        prop_assert_eq!(SessionId::new(s.clone()).is_ok(), !s.is_empty());
        prop_assert_eq!(ToolUseId::new(s.clone()).is_ok(), !s.is_empty());
    }
}

// ===== Property 2: ToolName Round-Trip =====

proptest! {
    #[test]
    fn tool_name_parse_round_trips(s in "[A-Za-z_]{1,20}") {
        let parsed = ToolName::parse(&s);
        prop_assert_eq!(parsed.as_str(), s.as_str());
    }
}

// ===== Property 3 & 4: Text Diffs =====

fn text() -> impl Strategy<Value = String> {
    "[ab\n]{0,40}"
}

proptest! {
    #[test]
    fn diff_of_identical_texts_is_empty(s in text()) {
        prop_assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn diff_balance_matches_line_counts(old in text(), new in text()) {
        let stats = DiffStats::from_lines(&diff(&old, &new));
        let grown = new.lines().count() as isize - old.lines().count() as isize;
        prop_assert_eq!(stats.additions as isize - stats.deletions as isize, grown);
    }

    #[test]
    fn diff_line_numbers_increase(
        old in text(),
        new in text(),
        context_lines in 0usize..4,
    ) {
        let options = DiffOptions { context_lines, ..DiffOptions::default() };
        let lines = diff_with(&old, &new, &options);

        let olds: Vec<usize> = lines.iter().filter_map(|l| l.old_line_no()).collect();
        let news: Vec<usize> = lines.iter().filter_map(|l| l.new_line_no()).collect();
        prop_assert!(olds.windows(2).all(|w| w[0] < w[1]), "old side: {:?}", olds);
        prop_assert!(news.windows(2).all(|w| w[0] < w[1]), "new side: {:?}", news);
    }
}

// ===== Patch Walks =====

fn patch_line() -> impl Strategy<Value = String> {
    (prop_oneof![Just(' '), Just('-'), Just('+')], "[a-z]{0,6}")
        .prop_map(|(sign, body)| format!("{sign}{body}"))
}

proptest! {
    #[test]
    fn patch_walk_numbers_from_hunk_starts(
        old_start in 1usize..500,
        new_start in 1usize..500,
        body in prop::collection::vec(patch_line(), 0..30),
    ) {
        let lines = diff_from_patch(&[PatchHunk::new(old_start, new_start, body.clone())]);
        prop_assert_eq!(lines.len(), body.len());

        let mut old = old_start;
        let mut new = new_start;
        for line in &lines {
            match line.kind() {
                DiffLineKind::Context => {
                    prop_assert_eq!(line.old_line_no(), Some(old));
                    prop_assert_eq!(line.new_line_no(), Some(new));
                    old += 1;
                    new += 1;
                }
                DiffLineKind::Delete => {
                    prop_assert_eq!(line.old_line_no(), Some(old));
                    old += 1;
                }
                DiffLineKind::Add => {
                    prop_assert_eq!(line.new_line_no(), Some(new));
                    new += 1;
                }
                DiffLineKind::HunkHeader => prop_assert!(false, "patch bodies have no headers"),
            }
        }
    }
}

// ===== Property 5 & 6: Assembly =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    User,
    Assistant,
    Carrier,
    System,
}

impl Record {
    fn jsonl(self) -> &'static str {
        match self {
            Self::User => r#"{"type":"user","message":{"role":"user","content":"hi"}}"#,
            Self::Assistant => {
                r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}}]}}"#
            }
            Self::Carrier => {
                r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"ok"}]},"toolUseResult":{"stdout":"ok"}}"#
            }
            Self::System => r#"{"type":"system","content":"compacted"}"#,
        }
    }
}

fn record() -> impl Strategy<Value = Record> {
    prop_oneof![
        Just(Record::User),
        Just(Record::Assistant),
        Just(Record::Carrier),
        Just(Record::System),
    ]
}

fn to_log(records: &[Record]) -> String {
    records.iter().map(|r| format!("{}\n", r.jsonl())).collect()
}

proptest! {
    #[test]
    fn one_pair_per_answered_response(records in prop::collection::vec(record(), 0..40)) {
        let log = EventStore::load_str(&to_log(&records));
        prop_assert_eq!(log.events.len(), records.len());

        let expected = records
            .iter()
            .skip_while(|r| **r != Record::User)
            .filter(|r| **r == Record::Assistant)
            .count();
        prop_assert_eq!(assemble(&log.events).len(), expected);
    }

    #[test]
    fn tool_results_are_the_run_after_the_response(
        records in prop::collection::vec(record(), 0..40),
    ) {
        let log = EventStore::load_str(&to_log(&records));

        for pair in assemble(&log.events) {
            prop_assert!(pair.user_message.is_user_turn());
            prop_assert!(pair.assistant_response.is_assistant());

            // Line numbers are 1-based positions since every line parses
            let start = pair.assistant_response.line_number();
            let run_len = records[start..]
                .iter()
                .take_while(|r| **r == Record::Carrier)
                .count();
            prop_assert_eq!(pair.tool_results.len(), run_len);
            for (offset, carrier) in pair.tool_results.iter().enumerate() {
                prop_assert_eq!(carrier.line_number(), start + 1 + offset);
                prop_assert!(carrier.is_tool_result_carrier());
            }
        }
    }

    #[test]
    fn turn_with_n_responses_yields_n_pairs(
        runs in prop::collection::vec(0usize..4, 1..8),
    ) {
        let mut records = vec![Record::User];
        for carriers in &runs {
            records.push(Record::Assistant);
            records.extend(std::iter::repeat(Record::Carrier).take(*carriers));
        }
        let log = EventStore::load_str(&to_log(&records));
        let pairs = assemble(&log.events);

        prop_assert_eq!(pairs.len(), runs.len());
        for (pair, carriers) in pairs.iter().zip(&runs) {
            prop_assert!(std::ptr::eq(pair.user_message, &log.events[0]));
            prop_assert_eq!(pair.tool_results.len(), *carriers);
        }
    }
}
