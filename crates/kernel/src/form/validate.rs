//! Structural validation for compiled form definitions.
//!
//! The compiler never fails; this is where structural defects surface.
//! Every check always runs, so callers with several problems see all of
//! them at once instead of fixing one per round trip.

use serde::Serialize;

use crate::form::types::FormDefinition;

/// Outcome of structural validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// True exactly when `errors` is empty.
    pub valid: bool,

    /// Every violation found, in document order.
    pub errors: Vec<String>,
}

/// Validate a compiled form definition.
///
/// Pure and total. Section and field indexes in the messages are
/// 1-based, matching how form authors count.
pub fn validate_form_structure(form: &FormDefinition) -> ValidationResult {
    let mut errors = Vec::new();

    if form.title.is_empty() {
        errors.push("Form must have a title".to_string());
    }

    if form.sections.is_empty() {
        errors.push("Form must have at least one section".to_string());
    }

    for (i, section) in form.sections.iter().enumerate() {
        if section.title.is_empty() {
            errors.push(format!("Section {} must have a title", i + 1));
        }

        if section.fields.is_empty() {
            errors.push(format!(
                "Section \"{}\" must have at least one field",
                section.title
            ));
        }

        for (j, field) in section.fields.iter().enumerate() {
            if field.name.is_empty() {
                errors.push(format!(
                    "Field {} in section \"{}\" must have a name",
                    j + 1,
                    section.title
                ));
            }

            if field.label.is_empty() {
                errors.push(format!(
                    "Field {} in section \"{}\" must have a label",
                    j + 1,
                    section.title
                ));
            }

            if field.field_type.is_choice() && field.options.as_ref().is_none_or(|o| o.is_empty())
            {
                errors.push(format!(
                    "Field \"{}\" must have at least one option",
                    field.label
                ));
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}
