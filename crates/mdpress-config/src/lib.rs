//! Configuration management for mdpress.
//!
//! Parses `mdpress.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Rendering options are deliberately lenient: every recognized key under
//! `[markdown]` has a documented default, and a value of the wrong type is
//! treated exactly like an absent one. A bad toggle never fails a render —
//! only file-level problems (unreadable file, invalid TOML) are errors, and
//! those surface at startup before any rendering happens.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpress.toml";

/// Rendering options with their documented defaults.
///
/// One field per recognized `[markdown]` key. `sanitize` is accepted for
/// configuration compatibility but is not wired to any engine behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Master switch for table and strikethrough extensions.
    pub gfm: bool,
    /// Render soft line breaks as hard breaks.
    pub breaks: bool,
    /// Generate `id` attributes on headings.
    pub header_id: bool,
    /// Turn bare URLs into links.
    pub autolink: bool,
    /// Replace `:shortcode:` with emoji glyphs.
    pub emoji: bool,
    /// Prefix relative links with the site root.
    pub prepend_root: bool,
    /// Recognized but inert.
    pub sanitize: bool,
    /// Move image destinations to `data-src` behind a placeholder.
    pub lazyload: bool,
    /// Placeholder image URL; empty means the built-in transparent GIF.
    pub lazyload_src: String,
    /// Render task-list checkboxes.
    pub github_todo_list: bool,
    /// CSS class for task-list items.
    pub github_todo_list_class: String,
    /// Correct the casing of known technical terms.
    pub fix_term_typo: bool,
    /// Insert spaces between CJK and Latin script runs.
    pub auto_space: bool,
    /// Normalize ASCII punctuation after CJK text to full-width forms.
    pub chinese_punct: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: true,
            header_id: true,
            autolink: true,
            emoji: false,
            prepend_root: false,
            sanitize: false,
            lazyload: false,
            lazyload_src: String::new(),
            github_todo_list: false,
            github_todo_list_class: "task-list".to_owned(),
            fix_term_typo: false,
            auto_space: false,
            chinese_punct: false,
        }
    }
}

/// Raw `[markdown]` section as parsed from TOML.
///
/// Fields are kept as permissive [`toml::Value`]s so a wrong-typed value
/// coerces to the default instead of failing the whole config.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MarkdownRaw {
    gfm: Option<toml::Value>,
    breaks: Option<toml::Value>,
    header_id: Option<toml::Value>,
    autolink: Option<toml::Value>,
    emoji: Option<toml::Value>,
    prepend_root: Option<toml::Value>,
    sanitize: Option<toml::Value>,
    lazyload: Option<toml::Value>,
    lazyload_src: Option<toml::Value>,
    github_todo_list: Option<toml::Value>,
    github_todo_list_class: Option<toml::Value>,
    fix_term_typo: Option<toml::Value>,
    auto_space: Option<toml::Value>,
    chinese_punct: Option<toml::Value>,
}

impl MarkdownRaw {
    /// Coerce raw values onto the documented defaults.
    fn resolve(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            gfm: bool_or(&self.gfm, defaults.gfm),
            breaks: bool_or(&self.breaks, defaults.breaks),
            header_id: bool_or(&self.header_id, defaults.header_id),
            autolink: bool_or(&self.autolink, defaults.autolink),
            emoji: bool_or(&self.emoji, defaults.emoji),
            prepend_root: bool_or(&self.prepend_root, defaults.prepend_root),
            sanitize: bool_or(&self.sanitize, defaults.sanitize),
            lazyload: bool_or(&self.lazyload, defaults.lazyload),
            lazyload_src: str_or(&self.lazyload_src, &defaults.lazyload_src),
            github_todo_list: bool_or(&self.github_todo_list, defaults.github_todo_list),
            github_todo_list_class: str_or(
                &self.github_todo_list_class,
                &defaults.github_todo_list_class,
            ),
            fix_term_typo: bool_or(&self.fix_term_typo, defaults.fix_term_typo),
            auto_space: bool_or(&self.auto_space, defaults.auto_space),
            chinese_punct: bool_or(&self.chinese_punct, defaults.chinese_punct),
        }
    }
}

fn bool_or(value: &Option<toml::Value>, default: bool) -> bool {
    value.as_ref().and_then(toml::Value::as_bool).unwrap_or(default)
}

fn str_or(value: &Option<toml::Value>, default: &str) -> String {
    value
        .as_ref()
        .and_then(toml::Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Site base path (raw; resolved into `site_root`).
    root: Option<toml::Value>,
    /// Markdown rendering options (raw; resolved into `options`).
    markdown: MarkdownRaw,

    /// Resolved rendering options (set after loading).
    #[serde(skip)]
    pub options: RenderOptions,
    /// Resolved site base path (set after loading).
    #[serde(skip)]
    pub site_root: Option<String>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise
    /// searches for `mdpress.toml` in the current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, or if
    /// reading or parsing the file fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default().resolved()),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is not valid TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config.resolved())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Coerce the raw sections into their resolved forms.
    fn resolved(mut self) -> Self {
        self.options = self.markdown.resolve();
        self.site_root = self
            .root
            .as_ref()
            .and_then(toml::Value::as_str)
            .map(ToOwned::to_owned);
        self
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}
