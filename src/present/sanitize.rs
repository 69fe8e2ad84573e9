//! Terminal escape stripping for text copied out of the log.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1b\[[0-9;?]*[ -/]*[@-~]", // CSI sequences
        r"|\x1b\][^\x07\x1b]*\x07",   // OSC sequences ending with BEL
        r"|\x1b\][^\x1b]*\x1b\\",     // OSC sequences ending with ST
        r"|\x1b[()][A-Z0-9]",         // Character set selection
        r"|\x1b[=>MNOP78]",           // Other single-char escapes
        r"|\x1b",                     // Any remaining bare ESC
    ))
    .expect("valid ANSI regex")
});

/// Remove terminal escape sequences from untrusted text.
///
/// Borrows the input unchanged when it contains no escapes.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_REGEX.replace_all(text, "")
}
