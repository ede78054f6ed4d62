use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// Matches the defect shape exactly: a trailing `,"visible": <anything>}`
// closing an object. One upstream producer emits a structurally-extra
// `visible` field that breaks strict parsers, so the fragment is rewritten
// to a bare `}` before parsing.
static TRAILING_VISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#",\s*"visible"\s*:\s*[^}]*\}"#).expect("static regex"));

/// Compatibility shim, not general JSON repair.
///
/// Applied to decoded topic-manifest text only, as a text-level global
/// replace: every occurrence in the document is rewritten, which also strips
/// well-formed trailing `visible` flags. Activities affected by that fall
/// back to the default visibility.
pub fn strip_trailing_visible(text: &str) -> Cow<'_, str> {
    TRAILING_VISIBLE.replace_all(text, "}")
}
