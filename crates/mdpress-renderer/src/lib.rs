//! Render adapter binding site configuration to the conversion engine.
//!
//! [`RenderAdapter`] owns the process-wide [`Engine`] instance and performs
//! one render per call: it maps the current [`RenderOptions`] onto the
//! engine's toggle setters, then invokes the conversion entry point. The
//! engine is reconfigured from scratch on every call — configuration may
//! change between calls while the engine instance persists, so nothing is
//! assumed to carry over from a previous render.
//!
//! The toggle-then-convert sequence runs under the adapter's mutex, so
//! concurrent renders with different configurations cannot leak settings
//! into each other.
//!
//! # Example
//!
//! ```
//! use mdpress_config::RenderOptions;
//! use mdpress_renderer::{RenderAdapter, RenderContext};
//!
//! let adapter = RenderAdapter::new();
//! let options = RenderOptions::default();
//! let context = RenderContext { options: &options, root: None };
//!
//! let html = adapter.render(&context, "hello");
//! assert_eq!(html, "<p>hello</p>\n");
//! ```

use std::sync::{LazyLock, Mutex};

use mdpress_config::RenderOptions;
use mdpress_engine::Engine;

/// Built-in lazy-load placeholder: a base64 1x1 transparent GIF.
const TRANSPARENT_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

/// Per-call rendering context supplied by the host.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    /// Rendering options, read fresh on every call.
    pub options: &'a RenderOptions,
    /// Site base path, used when `prepend_root` is enabled.
    pub root: Option<&'a str>,
}

/// Owner of the shared engine instance.
///
/// Construct one at startup and pass it by reference, or use
/// [`RenderAdapter::shared`] for a single lazily-created instance per
/// process.
pub struct RenderAdapter {
    engine: Mutex<Engine>,
}

impl RenderAdapter {
    /// Create an adapter owning a fresh engine instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Mutex::new(Engine::new()),
        }
    }

    /// The process-wide adapter, created lazily on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<RenderAdapter> = LazyLock::new(RenderAdapter::new);
        &SHARED
    }

    /// Render Markdown text to HTML under the given context.
    ///
    /// Applies every toggle from the context's options, then converts.
    /// Output is newline-terminated and fully determined by the context and
    /// the input text.
    #[must_use]
    pub fn render(&self, context: &RenderContext<'_>, text: &str) -> String {
        // A poisoned lock is safe to recover: every toggle is reapplied
        // below before the engine converts anything.
        let mut engine = match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        apply_options(&mut engine, context.options, context.root);
        engine.markdown(text)
    }
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Map rendering options onto engine toggles.
///
/// Every recognized toggle is set on every call, including the conditional
/// ones, so no setting survives from a previous render's configuration.
fn apply_options(engine: &mut Engine, options: &RenderOptions, root: Option<&str>) {
    engine.set_table(options.gfm);
    engine.set_strikethrough(options.gfm);
    engine.set_task_list(options.github_todo_list);
    engine.set_task_list_class(&options.github_todo_list_class);
    engine.set_autolink(options.autolink);
    engine.set_hard_line_breaks(options.breaks);
    engine.set_heading_ids(options.header_id);
    engine.set_fix_term_typo(options.fix_term_typo);
    engine.set_auto_space(options.auto_space);
    engine.set_chinese_punct(options.chinese_punct);
    engine.set_emoji(options.emoji);
    // `sanitize` is accepted by the configuration but maps to no engine
    // call in this revision.
    if options.prepend_root {
        engine.set_link_base(root.unwrap_or(""));
    } else {
        engine.set_link_base("");
    }
    if options.lazyload {
        engine.set_image_placeholder(if options.lazyload_src.is_empty() {
            TRANSPARENT_GIF
        } else {
            &options.lazyload_src
        });
    } else {
        engine.set_image_placeholder("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(options: &RenderOptions, text: &str) -> String {
        let adapter = RenderAdapter::new();
        let context = RenderContext { options, root: None };
        adapter.render(&context, text)
    }

    fn render_with_root(options: &RenderOptions, root: &str, text: &str) -> String {
        let adapter = RenderAdapter::new();
        let context = RenderContext {
            options,
            root: Some(root),
        };
        adapter.render(&context, text)
    }

    #[test]
    fn test_default() {
        let code = "console.log(\"Hello world\");";
        let text = [
            "# Hello world",
            "",
            "```",
            code,
            "```",
            "",
            "## Hello world",
            "",
            "### Hello world",
            "",
            "hello",
        ]
        .join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<h1 id=\"Hello-world\">Hello world</h1>",
                "<pre><code>console.log(&quot;Hello world&quot;);",
                "</code></pre>",
                "<h2 id=\"Hello-world-\">Hello world</h2>",
                "<h3 id=\"Hello-world--\">Hello world</h3>",
                "<p>hello</p>",
            ]
            .join("\n")
                + "\n"
        );
    }

    #[test]
    fn test_headings_with_reference_links() {
        let text = [
            "## [hexo-server]",
            "",
            "[hexo-server]: https://github.com/hexojs/hexo-server",
        ]
        .join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            "<h2 id=\"hexo-server\"><a href=\"https://github.com/hexojs/hexo-server\">hexo-server</a></h2>\n"
        );
    }

    #[test]
    fn test_headings_with_inline_links() {
        let result = render(
            &RenderOptions::default(),
            "## [hexo-server](https://github.com/hexojs/hexo-server)",
        );

        assert_eq!(
            result,
            "<h2 id=\"hexo-server\"><a href=\"https://github.com/hexojs/hexo-server\">hexo-server</a></h2>\n"
        );
    }

    #[test]
    fn test_duplicate_headings() {
        let text = ["## foo", "## foo", "### bar", "#### bar", "## foo"].join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<h2 id=\"foo\">foo</h2>",
                "<h2 id=\"foo-\">foo</h2>",
                "<h3 id=\"bar\">bar</h3>",
                "<h4 id=\"bar-\">bar</h4>",
                "<h2 id=\"foo--\">foo</h2>",
            ]
            .join("\n")
                + "\n"
        );
    }

    #[test]
    fn test_chinese_headings() {
        let result = render(&RenderOptions::default(), "# 中文");
        assert_eq!(result, "<h1 id=\"中文\">中文</h1>\n");
    }

    #[test]
    fn test_header_id_disabled() {
        let text = ["## foo", "## foo", "### bar"].join("\n");
        let options = RenderOptions {
            header_id: false,
            ..RenderOptions::default()
        };

        let result = render(&options, &text);

        assert_eq!(
            result,
            ["<h2>foo</h2>", "<h2>foo</h2>", "<h3>bar</h3>"].join("\n") + "\n"
        );
    }

    #[test]
    fn test_url_encoding_in_links() {
        let text = ["[foo](/foo/bár.jpg)", "[bar](http://fóo.com/bar.jpg)"].join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<p><a href=\"/foo/b%C3%A1r.jpg\">foo</a><br />",
                "<a href=\"http://f%C3%B3o.com/bar.jpg\">bar</a></p>\n",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_link_titles() {
        let text = [
            "[text](http://link.com/ \"a-title\")",
            "[a<b](http://link.com/ \"b>a\")",
        ]
        .join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<p><a href=\"http://link.com/\" title=\"a-title\">text</a><br />",
                "<a href=\"http://link.com/\" title=\"b&gt;a\">a&lt;b</a></p>\n",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_url_encoding_in_images() {
        let text = ["![](/foo/bár.jpg)", "![](http://fóo.com/bar.jpg)"].join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<p><img src=\"/foo/b%C3%A1r.jpg\" alt=\"\" /><br />",
                "<img src=\"http://f%C3%B3o.com/bar.jpg\" alt=\"\" /></p>\n",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_image_caption_and_title() {
        let text = [
            "![caption](http://foo.com/a.jpg)",
            "![caption](http://bar.com/b.jpg \"a-title\")",
            "![a\"b](http://bar.com/b.jpg \"c>d\")",
        ]
        .join("\n");

        let result = render(&RenderOptions::default(), &text);

        assert_eq!(
            result,
            [
                "<p><img src=\"http://foo.com/a.jpg\" alt=\"caption\" /><br />",
                "<img src=\"http://bar.com/b.jpg\" alt=\"caption\" title=\"a-title\" /><br />",
                "<img src=\"http://bar.com/b.jpg\" alt=\"a&quot;b\" title=\"c&gt;d\" /></p>\n",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_autolink_enabled_by_default() {
        let result = render(&RenderOptions::default(), "Great website https://hexo.io");
        assert_eq!(
            result,
            "<p>Great website <a href=\"https://hexo.io\">https://hexo.io</a></p>\n"
        );
    }

    #[test]
    fn test_autolink_disabled() {
        let options = RenderOptions {
            autolink: false,
            ..RenderOptions::default()
        };
        let result = render(&options, "Great website https://hexo.io");
        assert_eq!(result, "<p>Great website https://hexo.io</p>\n");
    }

    #[test]
    fn test_emoji_disabled_by_default() {
        let result = render(&RenderOptions::default(), "Follow My Heart :heart:");
        assert_eq!(result, "<p>Follow My Heart :heart:</p>\n");
    }

    #[test]
    fn test_emoji_enabled() {
        let options = RenderOptions {
            emoji: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "Follow My Heart :heart:");
        assert_eq!(result, "<p>Follow My Heart ❤️</p>\n");
    }

    #[test]
    fn test_prepend_root_disabled_by_default() {
        let text = ["[Hexo](https://hexo.io)", "[About Me](/about.html)"].join("\n");

        let result = render_with_root(&RenderOptions::default(), "/blog/", &text);

        assert_eq!(
            result,
            "<p><a href=\"https://hexo.io\">Hexo</a><br />\n<a href=\"/about.html\">About Me</a></p>\n"
        );
    }

    #[test]
    fn test_prepend_root_enabled() {
        let text = ["[Hexo](https://hexo.io)", "[About Me](about.html)"].join("\n");
        let options = RenderOptions {
            prepend_root: true,
            ..RenderOptions::default()
        };

        let result = render_with_root(&options, "/blog/", &text);

        assert_eq!(
            result,
            "<p><a href=\"https://hexo.io\">Hexo</a><br />\n<a href=\"/blog/about.html\">About Me</a></p>\n"
        );
    }

    #[test]
    fn test_prepend_root_without_root_path() {
        let options = RenderOptions {
            prepend_root: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "[About Me](about.html)");
        assert_eq!(result, "<p><a href=\"about.html\">About Me</a></p>\n");
    }

    #[test]
    fn test_lazyload_disabled_by_default() {
        let result = render(&RenderOptions::default(), "![](https://example.com/image.png)");
        assert_eq!(
            result,
            "<p><img src=\"https://example.com/image.png\" alt=\"\" /></p>\n"
        );
    }

    #[test]
    fn test_lazyload_enabled() {
        let options = RenderOptions {
            lazyload: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "![](https://example.com/image.png)");
        assert_eq!(
            result,
            "<p><img src=\"data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==\" data-src=\"https://example.com/image.png\" alt=\"\" /></p>\n"
        );
    }

    #[test]
    fn test_lazyload_empty_src_uses_builtin_placeholder() {
        let options = RenderOptions {
            lazyload: true,
            lazyload_src: String::new(),
            ..RenderOptions::default()
        };
        let result = render(&options, "![](https://example.com/image.png)");
        assert!(result.contains("src=\"data:image/gif;base64,"));
        assert!(result.contains("data-src=\"https://example.com/image.png\""));
    }

    #[test]
    fn test_lazyload_custom_src_used_verbatim() {
        let options = RenderOptions {
            lazyload: true,
            lazyload_src: "https://placehold.it".to_owned(),
            ..RenderOptions::default()
        };
        let result = render(&options, "![](https://example.com/image.png)");
        assert_eq!(
            result,
            "<p><img src=\"https://placehold.it\" data-src=\"https://example.com/image.png\" alt=\"\" /></p>\n"
        );
    }

    #[test]
    fn test_fix_term_typo_disabled_by_default() {
        let result = render(&RenderOptions::default(), "## jquery");
        assert_eq!(result, "<h2 id=\"jquery\">jquery</h2>\n");
    }

    #[test]
    fn test_fix_term_typo_enabled() {
        let options = RenderOptions {
            fix_term_typo: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "## jquery");
        assert_eq!(result, "<h2 id=\"jquery\">jQuery</h2>\n");
    }

    #[test]
    fn test_auto_space_disabled_by_default() {
        let result = render(&RenderOptions::default(), "你好Hexo");
        assert_eq!(result, "<p>你好Hexo</p>\n");
    }

    #[test]
    fn test_auto_space_enabled() {
        let options = RenderOptions {
            auto_space: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "你好Hexo");
        assert_eq!(result, "<p>你好 Hexo</p>\n");
    }

    #[test]
    fn test_chinese_punct_disabled_by_default() {
        let text = ["Hello, world.", "你好,世界."].join("\n");
        let result = render(&RenderOptions::default(), &text);
        assert_eq!(result, "<p>Hello, world.<br />\n你好,世界.</p>\n");
    }

    #[test]
    fn test_chinese_punct_enabled() {
        let text = ["Hello, world.", "你好,世界."].join("\n");
        let options = RenderOptions {
            chinese_punct: true,
            ..RenderOptions::default()
        };
        let result = render(&options, &text);
        assert_eq!(result, "<p>Hello, world.<br />\n你好，世界。</p>\n");
    }

    #[test]
    fn test_breaks_disabled() {
        let options = RenderOptions {
            breaks: false,
            ..RenderOptions::default()
        };
        let result = render(&options, "one\ntwo");
        assert_eq!(result, "<p>one\ntwo</p>\n");
    }

    #[test]
    fn test_gfm_disabled_turns_off_tables_and_strikethrough() {
        let options = RenderOptions {
            gfm: false,
            ..RenderOptions::default()
        };
        let table = render(&options, "| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(!table.contains("<table>"));
        let strike = render(&options, "~~deleted~~");
        assert!(!strike.contains("<del>"));
    }

    #[test]
    fn test_todo_list_enabled() {
        let options = RenderOptions {
            github_todo_list: true,
            ..RenderOptions::default()
        };
        let result = render(&options, "- [x] done\n- [ ] todo");
        assert!(result.contains(
            "<li class=\"task-list\"><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>"
        ));
        assert!(result.contains(
            "<li class=\"task-list\"><input type=\"checkbox\" disabled=\"\" /> todo</li>"
        ));
    }

    #[test]
    fn test_todo_list_custom_class() {
        let options = RenderOptions {
            github_todo_list: true,
            github_todo_list_class: "my-todo".to_owned(),
            ..RenderOptions::default()
        };
        let result = render(&options, "- [ ] item");
        assert!(result.contains("<li class=\"my-todo\">"));
    }

    #[test]
    fn test_sanitize_is_inert() {
        let options = RenderOptions {
            sanitize: true,
            ..RenderOptions::default()
        };
        assert_eq!(
            render(&options, "hello"),
            render(&RenderOptions::default(), "hello")
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let adapter = RenderAdapter::new();
        let options = RenderOptions::default();
        let context = RenderContext {
            options: &options,
            root: None,
        };
        let text = "# A\n\nsome *text* with https://a.io\n\n# A";

        assert_eq!(adapter.render(&context, text), adapter.render(&context, text));
    }

    #[test]
    fn test_settings_do_not_leak_between_calls() {
        let adapter = RenderAdapter::new();
        let text = "![](https://example.com/image.png)\n\n[a](about.html)";

        let custom = RenderOptions {
            lazyload: true,
            prepend_root: true,
            emoji: true,
            ..RenderOptions::default()
        };
        let custom_context = RenderContext {
            options: &custom,
            root: Some("/blog/"),
        };
        adapter.render(&custom_context, text);

        // The next call with defaults must be untouched by the previous one.
        let defaults = RenderOptions::default();
        let default_context = RenderContext {
            options: &defaults,
            root: Some("/blog/"),
        };
        let result = adapter.render(&default_context, text);
        assert!(!result.contains("data-src"));
        assert!(result.contains("<a href=\"about.html\">"));
    }

    #[test]
    fn test_shared_adapter_is_stable() {
        assert!(std::ptr::eq(RenderAdapter::shared(), RenderAdapter::shared()));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(&RenderOptions::default(), ""), "");
    }
}
