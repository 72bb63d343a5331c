//! Event-loop HTML writer.
//!
//! Walks the pulldown-cmark event stream and emits XHTML-flavored output:
//! void elements are self-closed and every block-level element is followed
//! by a newline.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};
use regex::Regex;

use crate::emoji;
use crate::encode::{encode_url, escape_html};
use crate::engine::Engine;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState};
use crate::typeset;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s<]+").unwrap());

pub(crate) struct HtmlWriter<'e> {
    engine: &'e Engine,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    link_depth: usize,
}

impl<'e> HtmlWriter<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            link_depth: 0,
        }
    }

    pub(crate) fn run<'a, I>(mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br />\n"),
            Event::Rule => self.output.push_str("<hr />\n"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    /// Push inline content to the output or, inside a heading, to the
    /// heading buffer.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>\n"),
                Some(n) => {
                    let _ = writeln!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>\n"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead>\n<tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{cell}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let href = escape_html(&encode_url(&self.resolve_dest(&dest_url)));
                let link_tag = if title.is_empty() {
                    format!(r#"<a href="{href}">"#)
                } else {
                    format!(r#"<a href="{href}" title="{}">"#, escape_html(&title))
                };
                self.push_inline(&link_tag);
                self.link_depth += 1;
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Collect alt text; the tag is written in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.into_string(), title.into_string()));
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>\n");
                }
            }
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete(self.engine.heading_ids) {
                    match id {
                        Some(id) => {
                            let _ = write!(
                                self.output,
                                r#"<h{level} id="{id}">{}</h{level}>"#,
                                html.trim()
                            );
                        }
                        None => {
                            let _ =
                                write!(self.output, "<h{level}>{}</h{level}>", html.trim());
                        }
                    }
                    self.output.push('\n');
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => {
                        let _ = write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        );
                    }
                    None => {
                        let _ = write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&content)
                        );
                    }
                }
                self.output.push('\n');
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::Table => self.output.push_str("</tbody>\n</table>\n"),
            TagEnd::TableHead => {
                self.table.end_head();
                self.output.push_str("</tr>\n</thead>\n<tbody>\n");
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() { "</th>" } else { "</td>" });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Link => {
                self.push_inline("</a>");
                self.link_depth = self.link_depth.saturating_sub(1);
            }
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((dest, title)) = self.pending_image.take() {
                    let img = self.image_tag(&dest, &alt, &title);
                    self.push_inline(&img);
                }
            }
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }
        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }
        if self.heading.is_active() {
            // Raw text feeds id generation; the filtered form is displayed.
            self.heading.push_text(text);
        }
        let filtered = self.filter_text(text);
        let html = if self.engine.autolink && self.link_depth == 0 {
            linkify(&filtered)
        } else {
            escape_html(&filtered)
        };
        self.push_inline(&html);
    }

    /// Apply the enabled typesetting passes to a text run.
    fn filter_text(&self, text: &str) -> String {
        let mut text = if self.engine.emoji {
            emoji::replace_shortcodes(text).into_owned()
        } else {
            text.to_owned()
        };
        if self.engine.fix_term_typo {
            text = typeset::fix_term_typo(&text);
        }
        if self.engine.auto_space {
            text = typeset::auto_space(&text);
        }
        if self.engine.chinese_punct {
            text = typeset::chinese_punct(&text);
        }
        text
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.engine.hard_line_breaks {
            self.push_inline("<br />\n");
        } else {
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        // The marker immediately follows the opening <li>, which can still
        // be rewritten in place to carry the configured class.
        if self.output.ends_with("<li>") {
            self.output.truncate(self.output.len() - "<li>".len());
            let _ = write!(
                self.output,
                r#"<li class="{}">"#,
                escape_html(&self.engine.task_list_class)
            );
        }
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked="" disabled="" /> "#
        } else {
            r#"<input type="checkbox" disabled="" /> "#
        });
    }

    /// Build an `<img />` tag, honoring the lazy-load placeholder when set.
    fn image_tag(&self, dest: &str, alt: &str, title: &str) -> String {
        let src = escape_html(&encode_url(&self.resolve_dest(dest)));
        let mut img = String::with_capacity(src.len() + 32);
        let placeholder = &self.engine.image_placeholder;
        if placeholder.is_empty() {
            let _ = write!(img, r#"<img src="{src}""#);
        } else {
            let _ = write!(
                img,
                r#"<img src="{}" data-src="{src}""#,
                escape_html(placeholder)
            );
        }
        let _ = write!(img, r#" alt="{}""#, escape_html(alt));
        if !title.is_empty() {
            let _ = write!(img, r#" title="{}""#, escape_html(title));
        }
        img.push_str(" />");
        img
    }

    /// Prefix relative destinations with the configured link base, if any.
    fn resolve_dest(&self, dest: &str) -> String {
        let base = &self.engine.link_base;
        if base.is_empty() || !is_relative(dest) {
            return dest.to_owned();
        }
        if base.ends_with('/') {
            format!("{base}{dest}")
        } else {
            format!("{base}/{dest}")
        }
    }
}

/// A destination is relative when it has no scheme and is not absolute,
/// protocol-relative, or fragment-only.
fn is_relative(url: &str) -> bool {
    !(url.is_empty() || url.starts_with('/') || url.starts_with('#') || has_scheme(url))
}

fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Convert bare `http(s)://` URLs in a text run into links, escaping
/// everything else.
fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in URL_RE.find_iter(text) {
        let url = trim_url(m.as_str());
        out.push_str(&escape_html(&text[last..m.start()]));
        let _ = write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&encode_url(url)),
            escape_html(url)
        );
        out.push_str(&escape_html(&text[m.start() + url.len()..m.end()]));
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

/// Trailing sentence punctuation is not part of the link.
fn trim_url(url: &str) -> &str {
    url.trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | '\'' | '"'))
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_relative() {
        assert!(is_relative("about.html"));
        assert!(is_relative("./about.html"));
        assert!(is_relative("a/b.html"));
        assert!(!is_relative("/about.html"));
        assert!(!is_relative("//cdn.example.com/a.js"));
        assert!(!is_relative("#section"));
        assert!(!is_relative("https://example.com"));
        assert!(!is_relative("mailto:a@b.c"));
        assert!(!is_relative("tel:+123"));
    }

    #[test]
    fn test_linkify() {
        assert_eq!(
            linkify("see https://hexo.io now"),
            r#"see <a href="https://hexo.io">https://hexo.io</a> now"#
        );
        assert_eq!(linkify("no links here"), "no links here");
    }

    #[test]
    fn test_linkify_trailing_punctuation() {
        assert_eq!(
            linkify("go to https://hexo.io."),
            r#"go to <a href="https://hexo.io">https://hexo.io</a>."#
        );
    }

    #[test]
    fn test_linkify_escapes_surrounding_text() {
        assert_eq!(
            linkify("a<b https://x.io"),
            r#"a&lt;b <a href="https://x.io">https://x.io</a>"#
        );
    }
}
