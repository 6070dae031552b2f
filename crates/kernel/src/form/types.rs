//! Form definition types produced by the markdown compiler.

use serde::{Deserialize, Serialize};

/// A compiled form definition.
///
/// Produced by [`crate::form::markdown::parse_markdown`] and checked by
/// [`crate::form::validate::validate_form_structure`] before anything is
/// persisted. The compiler is best-effort, so every field here may be empty;
/// the validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Document title from the `#` heading. Empty when no title line matched.
    pub title: String,

    /// Free text between the title and the first section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sections in document order.
    pub sections: Vec<Section>,
}

/// A named group of fields within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title from the `##` heading (a leading `Section:` is stripped).
    pub title: String,

    /// Free text between the section heading and its first field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fields in document order. The compiler permits an empty list;
    /// structural validation rejects it.
    pub fields: Vec<Field>,
}

impl Section {
    /// Create an empty section with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }
}

/// A single input element definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Input type. Unknown tokens normalize to [`FieldType::Text`].
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Machine name; the answer map is keyed by this.
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Whether a submission must provide a value.
    #[serde(default)]
    pub required: bool,

    /// Placeholder text from the optional 4th segment of a field line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Option list. `Some` (possibly empty) exactly for choice types;
    /// `None` for everything else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Input types the markdown dialect can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    /// Parse a raw type token from a field line.
    ///
    /// A `*` anywhere in the token marks the field required and is removed
    /// before the name lookup. The required flag is computed independently
    /// of whether the remaining token is recognized.
    pub fn parse_token(token: &str) -> (Self, bool) {
        let required = token.contains('*');
        let cleaned = token.replace('*', "");
        (Self::from_name(cleaned.trim()), required)
    }

    /// Look up a type by its wire name.
    ///
    /// Unknown names fall back to [`FieldType::Text`] rather than failing.
    /// Existing form sources rely on this degradation, so it must not be
    /// tightened into a rejection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "email" => Self::Email,
            "number" => Self::Number,
            "date" => Self::Date,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            _ => Self::Text,
        }
    }

    /// Get the wire name as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// Whether fields of this type carry an option list.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}
