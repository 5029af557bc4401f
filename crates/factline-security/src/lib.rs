//! Input sanitization for untrusted news text.
//!
//! [`sanitize`] is the only entry point. It removes, in order:
//!
//! 1. `<script ...> ... </script>` blocks (non-greedy, case-insensitive,
//!    spanning newlines)
//! 2. every remaining `<` and `>`
//! 3. every `javascript:` scheme marker (case-insensitive), repeated until
//!    none is left
//!
//! and then truncates to [`MAX_SANITIZED_CHARS`] characters. The function
//! is pure and idempotent.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Maximum length of sanitized text, in characters.
pub const MAX_SANITIZED_CHARS: usize = 10_000;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>").expect("script block pattern is valid")
});

static JS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("scheme pattern is valid"));

/// Text that has passed through [`sanitize`].
///
/// Contains no `<script>` block, no angle bracket, no `javascript:`
/// marker, and at most [`MAX_SANITIZED_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip unsafe markup from `input` and cap its length.
pub fn sanitize(input: &str) -> SanitizedText {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let mut text: String = without_scripts
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();

    // Removing one marker can splice another together
    // ("javajavascript:script:"), so repeat until stable.
    while JS_SCHEME.is_match(&text) {
        text = JS_SCHEME.replace_all(&text, "").into_owned();
    }

    let original_chars = text.chars().count();
    if original_chars > MAX_SANITIZED_CHARS {
        tracing::debug!(
            original_chars,
            max = MAX_SANITIZED_CHARS,
            "truncating sanitized text"
        );
        text = text.chars().take(MAX_SANITIZED_CHARS).collect();
    }

    SanitizedText(text)
}

/// Sanitize an arbitrary JSON value. Anything but a string yields empty
/// text.
pub fn sanitize_value(value: Option<&serde_json::Value>) -> SanitizedText {
    match value.and_then(serde_json::Value::as_str) {
        Some(s) => sanitize(s),
        None => SanitizedText::default(),
    }
}
