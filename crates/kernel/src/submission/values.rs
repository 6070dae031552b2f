//! Per-type value sanitizers for submitted answers.
//!
//! Each sanitizer takes a raw JSON answer and produces the string that is
//! stored, or a [`ValueError`] whose message is shown to the submitter.
//! Dispatch happens on the stored field type string, which is wider than
//! the set the markdown compiler emits: forms defined through other
//! channels also carry `url`, `rating`, and `multiselect` fields.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::models::form::FieldValidation;
use crate::sanitize::text::sanitize_for_plain_text_storage;

/// Default numeric floor when a field declares none.
pub const DEFAULT_MIN: f64 = 0.0;

/// Default numeric ceiling: 2^53 - 1, the largest exact integer in a
/// JSON double.
pub const DEFAULT_MAX: f64 = 9_007_199_254_740_991.0;

/// Default character cap for free-text values.
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex literal")
});

/// Why a single submitted value was rejected.
///
/// The Display strings are user-facing; the pipeline wraps them as
/// `Invalid value for field {name}: {message}`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("Email must not contain line breaks")]
    EmailLineBreaks,

    #[error("Invalid email format")]
    EmailFormat,

    #[error("Invalid URL format")]
    UrlFormat,

    #[error("Invalid URL protocol")]
    UrlProtocol,

    #[error("Potentially malicious URL")]
    UrlMalicious,

    #[error("Invalid number format")]
    NumberFormat,

    #[error("Number must be at least {0}")]
    NumberTooSmall(f64),

    #[error("Number must be at most {0}")]
    NumberTooLarge(f64),
}

/// A sanitized value ready for transactional storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedValue {
    /// Field row this value answers.
    pub field_id: Uuid,

    /// Field machine name, kept for logging and payload assembly.
    pub name: String,

    /// Sanitized scalar, stringified number, or JSON-encoded array.
    pub value: String,
}

/// Sanitize one answer according to the stored field type.
///
/// Unknown types take the plain-text arm, mirroring the compiler's
/// text fallback. Select and radio also take it: their option lists are
/// deliberately not enforced at submission time.
pub fn sanitize_value(
    field_type: &str,
    value: &Value,
    validation: &FieldValidation,
) -> Result<String, ValueError> {
    match field_type {
        "email" => sanitize_email(&stringify(value)),
        "url" => sanitize_url(&stringify(value)),
        "number" | "rating" => sanitize_number(value, validation),
        "checkbox" | "multiselect" => Ok(sanitize_choices(value, validation)),
        _ => Ok(sanitize_text(value, validation)),
    }
}

/// Normalize and check an email address. Returns the lowercased address.
///
/// The header-injection check runs on the lowercased value, so `%0A` and
/// `%0D` are caught regardless of case, and it runs before the format
/// check so injection attempts are named as such.
pub fn sanitize_email(value: &str) -> Result<String, ValueError> {
    let email = value.trim().to_lowercase();

    if email.contains('\r')
        || email.contains('\n')
        || email.contains("%0a")
        || email.contains("%0d")
    {
        return Err(ValueError::EmailLineBreaks);
    }

    if !EMAIL_RE.is_match(&email) {
        return Err(ValueError::EmailFormat);
    }

    Ok(email)
}

/// Check a URL. Returns the trimmed input with its case preserved.
///
/// The scheme allow-list runs on the parsed URL; the malicious-substring
/// check runs on the raw text afterwards, catching payloads smuggled
/// into safe-scheme URLs.
pub fn sanitize_url(value: &str) -> Result<String, ValueError> {
    let trimmed = value.trim();

    let parsed = Url::parse(trimmed).map_err(|_| ValueError::UrlFormat)?;

    if !matches!(parsed.scheme(), "http" | "https" | "mailto") {
        return Err(ValueError::UrlProtocol);
    }

    let lowered = trimmed.to_lowercase();
    if lowered.contains("javascript:") || lowered.contains("data:") {
        return Err(ValueError::UrlMalicious);
    }

    Ok(trimmed.to_string())
}

/// Parse and range-check a numeric answer. Accepts a JSON number or a
/// numeric string. Returns the value rendered with `f64`'s Display, so
/// integral answers store without a fraction.
pub fn sanitize_number(value: &Value, validation: &FieldValidation) -> Result<String, ValueError> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or(ValueError::NumberFormat)?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValueError::NumberFormat)?,
        _ => return Err(ValueError::NumberFormat),
    };

    if number.is_nan() {
        return Err(ValueError::NumberFormat);
    }

    let min = validation.min.unwrap_or(DEFAULT_MIN);
    let max = validation.max.unwrap_or(DEFAULT_MAX);

    if number < min {
        return Err(ValueError::NumberTooSmall(min));
    }
    if number > max {
        return Err(ValueError::NumberTooLarge(max));
    }

    Ok(number.to_string())
}

/// Sanitize a multi-choice answer. Scalars are wrapped into a
/// single-element selection. When the field carries a non-empty
/// allow-list, selections outside it are dropped silently rather than
/// rejected. The stored value is the JSON-encoded array.
pub fn sanitize_choices(value: &Value, validation: &FieldValidation) -> String {
    let mut selected: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .map(|v| sanitize_for_plain_text_storage(&stringify(v)))
            .collect(),
        scalar => vec![sanitize_for_plain_text_storage(&stringify(scalar))],
    };

    if let Some(allowed) = &validation.options
        && !allowed.is_empty()
    {
        selected.retain(|choice| allowed.contains(choice));
    }

    serde_json::to_string(&selected).unwrap_or_default()
}

/// Sanitize a free-text answer and cap its length in characters.
pub fn sanitize_text(value: &Value, validation: &FieldValidation) -> String {
    let text = sanitize_for_plain_text_storage(&stringify(value));
    let max_length = validation.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

    if text.chars().count() > max_length {
        text.chars().take(max_length).collect()
    } else {
        text
    }
}

/// Render a JSON value as the string a user typed.
///
/// Strings pass through unquoted; everything else uses its JSON encoding.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
