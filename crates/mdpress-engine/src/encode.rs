//! HTML escaping and URL encoding.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// ASCII characters percent-encoded in URLs, in addition to non-ASCII bytes.
const URL_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Percent-encode a URL for use in an `href` or `src` attribute.
///
/// Non-ASCII bytes and unsafe ASCII characters are percent-encoded.
/// Existing `%XX` escapes are preserved rather than double-encoded.
#[must_use]
pub fn encode_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(pos) = rest.find('%') {
        let (head, tail) = rest.split_at(pos);
        out.extend(utf8_percent_encode(head, URL_ESCAPE));
        let bytes = tail.as_bytes();
        if bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit() {
            out.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }
    out.extend(utf8_percent_encode(rest, URL_ESCAPE));
    out
}
