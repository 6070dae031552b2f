//! Allow-list HTML sanitization for browser-bound text.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;

/// Sanitizer for form and section descriptions.
///
/// Inline formatting and links only. Anything outside the allow-list is
/// stripped, not escaped.
static DISPLAY_BUILDER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(HashSet::from(["b", "i", "em", "strong", "a", "p", "br"]))
        .tag_attributes(HashMap::from([("a", HashSet::from(["href"]))]))
        .url_schemes(HashSet::from(["http", "https", "mailto"]));
    builder
});

/// Sanitize text that will be rendered as HTML.
///
/// Allows `b`, `i`, `em`, `strong`, `a`, `p`, and `br`; only `href` on
/// `a`, restricted to http, https, and mailto URLs. Use this for
/// descriptions shown in the public render payload, never for submitted
/// values (see [`crate::sanitize::text::sanitize_for_plain_text_storage`]).
pub fn sanitize_for_html_display(input: &str) -> String {
    DISPLAY_BUILDER.clean(input).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_formatting() {
        let out = sanitize_for_html_display("<p>Hello <strong>there</strong></p>");
        assert!(out.contains("<p>"));
        assert!(out.contains("<strong>there</strong>"));
    }

    #[test]
    fn strips_script_entirely() {
        let out = sanitize_for_html_display("before<script>alert(1)</script>after");
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("before"));
        assert!(out.contains("after"));
    }

    #[test]
    fn drops_disallowed_tags_but_keeps_text() {
        let out = sanitize_for_html_display("<div class=\"x\"><em>kept</em></div>");
        assert!(!out.contains("div"));
        assert!(out.contains("<em>kept</em>"));
    }

    #[test]
    fn removes_javascript_hrefs() {
        let out = sanitize_for_html_display("<a href=\"javascript:alert(1)\">link</a>");
        assert!(!out.contains("javascript:"));
        assert!(out.contains("link"));
    }

    #[test]
    fn keeps_http_hrefs() {
        let out = sanitize_for_html_display("<a href=\"https://example.com/\">site</a>");
        assert!(out.contains("href=\"https://example.com/\""));
    }

    #[test]
    fn strips_event_handler_attributes() {
        let out = sanitize_for_html_display("<b onmouseover=\"steal()\">bold</b>");
        assert!(!out.contains("onmouseover"));
        assert!(out.contains("<b>bold</b>"));
    }
}
