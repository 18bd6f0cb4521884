//! The `#document('...')` call the target pages embed.

use regex::Regex;
use std::sync::OnceLock;

static DOCUMENT_CALL_RE: OnceLock<Regex> = OnceLock::new();

fn document_call_re() -> &'static Regex {
    DOCUMENT_CALL_RE
        .get_or_init(|| Regex::new(r#"#document\(['"]([^'"]+)['"]\)"#).expect("document call regex"))
}

/// Returns the argument of the first `#document("...")` or
/// `#document('...')` in `text`. Quote styles may differ on either side.
pub fn find_document_call(text: &str) -> Option<&str> {
    document_call_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
