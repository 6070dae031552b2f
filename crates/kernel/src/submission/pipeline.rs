//! All-or-nothing sanitization of a submitted answer map.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::form::StoredField;
use crate::submission::values::{SanitizedValue, sanitize_value};

/// Sanitize a raw answer map against a form's stored fields.
///
/// Walks the fields in stored order rather than the answer map, so a
/// required field whose key is absent is still reported. Missing, null,
/// and empty-string answers count as not provided: required fields error,
/// optional fields are skipped. Answer keys that match no field are
/// logged and ignored.
///
/// Returns every error at once; callers persist the values only on `Ok`.
pub fn sanitize_submission(
    fields: &[StoredField],
    answers: &Map<String, Value>,
) -> Result<Vec<SanitizedValue>, Vec<String>> {
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for field in fields {
        match answers.get(&field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    errors.push(format!("Required field {} is missing", field.name));
                }
            }
            Some(Value::String(s)) if s.is_empty() => {
                if field.required {
                    errors.push(format!("Required field {} is missing", field.name));
                }
            }
            Some(value) => match sanitize_value(&field.field_type, value, &field.validation) {
                Ok(sanitized) => values.push(SanitizedValue {
                    field_id: field.id,
                    name: field.name.clone(),
                    value: sanitized,
                }),
                Err(e) => errors.push(format!("Invalid value for field {}: {e}", field.name)),
            },
        }
    }

    for name in answers.keys() {
        if !fields.iter().any(|f| &f.name == name) {
            warn!(field = %name, "ignoring answer for unknown field");
        }
    }

    if errors.is_empty() { Ok(values) } else { Err(errors) }
}
