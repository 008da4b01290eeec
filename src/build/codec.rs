//! Text encoding for the emitted document.

use std::borrow::Cow;
use std::fmt::Write;

/// Escape `raw` for placement in element content or attribute values.
///
/// The five XML metacharacters become named entities; tab, CR, LF and the
/// printable ASCII range pass through unchanged; every other character
/// becomes a numeric character reference. Standard entity decoding recovers
/// the input exactly, so the encoding loses nothing.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(c),
            ' '..='~' => out.push(c),
            other => {
                let _ = write!(out, "&#{};", other as u32);
            }
        }
    }
    out
}

/// Prefix `raw` with a backslash when it starts with whitespace or a
/// backslash.
///
/// The model format truncates leading whitespace on decode; the marker makes
/// the loss recoverable. A compatible loader strips exactly one leading
/// backslash after decoding.
pub fn encode_leading_marker(raw: &str) -> Cow<'_, str> {
    match raw.chars().next() {
        Some(first) if first.is_whitespace() || first == '\\' => Cow::Owned(format!("\\{raw}")),
        _ => Cow::Borrowed(raw),
    }
}
