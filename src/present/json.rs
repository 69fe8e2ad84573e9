//! JSON rendering.

use super::{Renderer, Transcript};
use std::io::{self, Write};

/// Renders a transcript as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, transcript: &Transcript, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, transcript)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::present::RenderOptions;
    use crate::source::EventStore;

    #[test]
    fn renders_pairs_and_diagnostics() {
        let log = EventStore::load_str(concat!(
            r#"{"type":"user","message":{"role":"user","content":"Edit it"}}"#,
            "\n",
            "garbage\n",
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Edit","input":{"file_path":"/w/a.rs","old_string":"foo bar","new_string":"foo baz"}}]}}"#,
            "\n",
        ));
        let transcript = Transcript::build(&assemble(&log.events), &RenderOptions::default())
            .with_diagnostics(log.diagnostics);

        let mut out = Vec::new();
        JsonRenderer.render(&transcript, &mut out).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");

        assert_eq!(value["pairs"][0]["user"]["text"], "Edit it");
        let tool = &value["pairs"][0]["tools"][0];
        assert_eq!(tool["label"], "Edit(a.rs)");
        assert_eq!(tool["outcome"]["kind"], "modified");
        let lines = tool["outcome"]["diff"]["lines"].as_array().expect("lines");
        assert_eq!(lines[0]["kind"], "hunk_header");
        assert_eq!(lines[1]["kind"], "delete");
        assert_eq!(lines[1]["highlight_spans"][0]["start"], 6);
        assert_eq!(value["diagnostics"][0]["line_number"], 2);
    }

    #[test]
    fn empty_transcript_is_valid_json() {
        let mut out = Vec::new();
        JsonRenderer
            .render(&Transcript::default(), &mut out)
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "{\n  \"pairs\": []\n}\n");
    }
}
