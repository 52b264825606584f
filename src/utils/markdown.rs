//! Markdown rendering utilities.
//!
//! Provides safe markdown-to-HTML conversion with XSS protection.

use pulldown_cmark::{Options, Parser, html};

use crate::core::DocRenderer;
use crate::core::error::RenderError;

/// Convert markdown content to sanitized HTML.
///
/// Supports extended markdown syntax including:
/// - Strikethrough (`~~text~~`)
/// - Tables
/// - Footnotes
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    sanitize(&html_output)
}

/// Sanitize HTML to prevent XSS attacks.
///
/// Keeps `class` and `id` so `.aside` annotations and heading anchors
/// survive for the sidenote layout and in-page links.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_generic_attributes(["class", "id"])
        .clean(html)
        .to_string()
}

/// [`DocRenderer`] backed by pulldown-cmark and ammonia.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownRenderer;

impl DocRenderer for MarkdownRenderer {
    fn markdown(&self, source: &str) -> Result<String, RenderError> {
        let html = markdown_to_html(source);
        if html.trim().is_empty() && !source.trim().is_empty() {
            return Err(RenderError::Markdown(
                "document contained no renderable markup".to_string(),
            ));
        }
        Ok(html)
    }

    fn api_fragment(&self, fragment: &str) -> Result<String, RenderError> {
        let html = sanitize(fragment);
        if html.trim().is_empty() && !fragment.trim().is_empty() {
            return Err(RenderError::Fragment(
                "fragment contained no renderable markup".to_string(),
            ));
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_rendering() {
        let html = markdown_to_html("# Title\n\nSome *text* and ~~old~~.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_script_removed_and_asides_kept() {
        let html = markdown_to_html(
            "<div class=\"aside\">note</div>\n\n<script>alert(1)</script>\n\ntext",
        );
        assert!(html.contains("class=\"aside\""));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_api_fragment() {
        let renderer = MarkdownRenderer;
        let html = renderer
            .api_fragment("<div class=\"api\" onclick=\"x()\"><h2 id=\"open\">open()</h2></div>")
            .unwrap();
        assert!(html.contains("class=\"api\""));
        assert!(html.contains("id=\"open\""));
        assert!(!html.contains("onclick"));

        assert!(renderer.api_fragment("").is_ok());
        assert!(matches!(
            renderer.markdown("<script>only()</script>"),
            Err(RenderError::Markdown(_))
        ));
        assert!(matches!(
            renderer.api_fragment("<script>only()</script>"),
            Err(RenderError::Fragment(_))
        ));
    }
}
