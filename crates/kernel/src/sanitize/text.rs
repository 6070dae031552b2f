//! Markup stripping for values stored and re-rendered as plain text.

use std::sync::LazyLock;

use regex::Regex;

/// # Panics
///
/// Panics if a hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex literal"));

#[allow(clippy::expect_used)]
static JS_PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid regex literal"));

#[allow(clippy::expect_used)]
static EVENT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").expect("valid regex literal"));

#[allow(clippy::expect_used)]
static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex literal"));

#[allow(clippy::expect_used)]
static EVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)eval\(").expect("valid regex literal"));

#[allow(clippy::expect_used)]
static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expression\(").expect("valid regex literal"));

/// Sanitize a submitted value for plain-text storage.
///
/// Strips tags, decodes the five basic HTML entities, trims, then removes
/// script payloads that the decoding step can resurrect. `&amp;` must
/// decode last, and the script-block removal must run after decoding.
/// This is a destructive stripper; for browser-bound descriptions use
/// [`crate::sanitize::html::sanitize_for_html_display`] instead.
pub fn sanitize_for_plain_text_storage(input: &str) -> String {
    let text = TAG_RE.replace_all(input, "");

    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&");

    let text = text.trim();

    let text = JS_PROTOCOL_RE.replace_all(text, "");
    let text = EVENT_ATTR_RE.replace_all(&text, "");
    let text = SCRIPT_BLOCK_RE.replace_all(&text, "");
    let text = EVAL_RE.replace_all(&text, "");
    let text = EXPRESSION_RE.replace_all(&text, "");

    text.into_owned()
}
