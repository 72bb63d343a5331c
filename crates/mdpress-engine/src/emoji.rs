//! Emoji shortcode substitution.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_+-]+):").unwrap());

/// Replace `:shortcode:` occurrences with their Unicode glyph.
///
/// Shortcodes come from the GitHub emoji catalog; unknown shortcodes are
/// left literal, colons included.
pub(crate) fn replace_shortcodes(text: &str) -> Cow<'_, str> {
    SHORTCODE_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_owned(),
            None => caps[0].to_owned(),
        }
    })
}
