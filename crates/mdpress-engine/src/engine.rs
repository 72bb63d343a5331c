//! The conversion engine: feature toggles plus the conversion entry point.

use pulldown_cmark::{Options, Parser};

use crate::writer::HtmlWriter;

/// Markdown to HTML conversion engine.
///
/// One instance is intended to live for the whole process; callers apply
/// toggle setters before each conversion (see `mdpress-renderer` for the
/// configuration mapping). Setters never fail, and conversion reads the
/// toggle state immutably, so an `Engine` can also be cloned cheaply when a
/// caller wants a private instance.
#[derive(Clone, Debug)]
pub struct Engine {
    pub(crate) table: bool,
    pub(crate) strikethrough: bool,
    pub(crate) task_list: bool,
    pub(crate) task_list_class: String,
    pub(crate) autolink: bool,
    pub(crate) hard_line_breaks: bool,
    pub(crate) heading_ids: bool,
    pub(crate) fix_term_typo: bool,
    pub(crate) auto_space: bool,
    pub(crate) chinese_punct: bool,
    pub(crate) emoji: bool,
    pub(crate) link_base: String,
    pub(crate) image_placeholder: String,
}

impl Engine {
    /// Create an engine with GFM-style defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: true,
            strikethrough: true,
            task_list: false,
            task_list_class: "task-list".to_owned(),
            autolink: true,
            hard_line_breaks: true,
            heading_ids: true,
            fix_term_typo: false,
            auto_space: false,
            chinese_punct: false,
            emoji: false,
            link_base: String::new(),
            image_placeholder: String::new(),
        }
    }

    /// Enable table support.
    pub fn set_table(&mut self, enabled: bool) {
        self.table = enabled;
    }

    /// Enable `~~text~~` strikethrough.
    pub fn set_strikethrough(&mut self, enabled: bool) {
        self.strikethrough = enabled;
    }

    /// Enable task-list checkbox rendering for `- [ ]` items.
    pub fn set_task_list(&mut self, enabled: bool) {
        self.task_list = enabled;
    }

    /// CSS class placed on task-list items.
    pub fn set_task_list_class(&mut self, class: &str) {
        class.clone_into(&mut self.task_list_class);
    }

    /// Turn bare URLs in text into links.
    pub fn set_autolink(&mut self, enabled: bool) {
        self.autolink = enabled;
    }

    /// Render soft line breaks as `<br />`.
    pub fn set_hard_line_breaks(&mut self, enabled: bool) {
        self.hard_line_breaks = enabled;
    }

    /// Generate `id` attributes on headings.
    pub fn set_heading_ids(&mut self, enabled: bool) {
        self.heading_ids = enabled;
    }

    /// Correct the casing of known technical terms in text.
    pub fn set_fix_term_typo(&mut self, enabled: bool) {
        self.fix_term_typo = enabled;
    }

    /// Insert spaces between CJK and Latin script runs.
    pub fn set_auto_space(&mut self, enabled: bool) {
        self.auto_space = enabled;
    }

    /// Normalize ASCII punctuation after CJK text to full-width forms.
    pub fn set_chinese_punct(&mut self, enabled: bool) {
        self.chinese_punct = enabled;
    }

    /// Replace `:shortcode:` emoji codes with their glyphs.
    pub fn set_emoji(&mut self, enabled: bool) {
        self.emoji = enabled;
    }

    /// Base path prefixed onto relative link and image destinations.
    /// An empty base leaves destinations untouched.
    pub fn set_link_base(&mut self, base: &str) {
        base.clone_into(&mut self.link_base);
    }

    /// Placeholder image installed as `src` while the real destination moves
    /// to `data-src`. An empty placeholder disables lazy loading.
    pub fn set_image_placeholder(&mut self, placeholder: &str) {
        placeholder.clone_into(&mut self.image_placeholder);
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.table {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_list {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }

    /// Convert Markdown to HTML.
    ///
    /// Output is fully determined by the current toggle state and the input
    /// text. Every block-level element is followed by a newline; an empty
    /// document yields an empty string.
    #[must_use]
    pub fn markdown(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.parser_options());
        HtmlWriter::new(self).run(parser)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
