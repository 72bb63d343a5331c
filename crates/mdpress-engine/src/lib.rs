//! Markdown to HTML conversion engine.
//!
//! [`Engine`] holds a set of named feature toggles (tables, hard line
//! breaks, heading ids, emoji substitution, …) and converts Markdown text
//! to XHTML-flavored HTML in a single pass over the pulldown-cmark event
//! stream. Conversion is deterministic: output depends only on the toggle
//! state and the input text, and never touches the filesystem or network.
//!
//! # Example
//!
//! ```
//! use mdpress_engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine.set_emoji(true);
//!
//! let html = engine.markdown("# Hello world");
//! assert_eq!(html, "<h1 id=\"Hello-world\">Hello world</h1>\n");
//! ```

mod emoji;
mod encode;
mod engine;
mod state;
mod typeset;
mod writer;

pub use encode::{encode_url, escape_html};
pub use engine::Engine;
pub use state::slugify;
