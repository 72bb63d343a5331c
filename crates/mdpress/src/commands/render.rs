//! The `render` command.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Args;
use mdpress_config::Config;
use mdpress_renderer::{RenderAdapter, RenderContext};

use crate::error::CliError;

/// Arguments for the `render` command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (stdin when omitted).
    pub input: Option<PathBuf>,

    /// Path to the configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Site base path, overriding the configured `root`.
    #[arg(long)]
    pub root: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable info-level logging.
    #[arg(long)]
    pub verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(&self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref())?;

        let text = match &self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let html = render_text(&config, self.root.as_deref(), &text);

        match &self.output {
            Some(path) => std::fs::write(path, html)?,
            None => std::io::stdout().write_all(html.as_bytes())?,
        }
        Ok(())
    }
}

/// Render markdown text under the loaded configuration.
fn render_text(config: &Config, root_override: Option<&str>, text: &str) -> String {
    let root = root_override.or(config.site_root.as_deref());
    let context = RenderContext {
        options: &config.options,
        root,
    };
    tracing::debug!(chars = text.len(), "rendering markdown");
    RenderAdapter::shared().render(&context, text)
}
