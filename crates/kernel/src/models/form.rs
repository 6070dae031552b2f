//! Stored form model: a compiled definition flattened into rows.
//!
//! A published form is one `form` row plus one `form_field` row per field,
//! with the owning section kept as a column and document order kept as a
//! weight. Persisting a definition is a single transaction, so a form row
//! without its fields can never be observed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::form::types::FormDefinition;

/// Form record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredForm {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Random 12-hex slug used in public URLs.
    pub url_id: String,

    /// Form title.
    pub title: String,

    /// Form description, markdown-sourced plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

/// Form field record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredField {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Owning form.
    pub form_id: Uuid,

    /// Title of the section this field was defined under.
    pub section: String,

    /// Machine name; submissions are keyed by this.
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Stored type string. Wider than the compiler's enum: fields created
    /// through other channels also use `url`, `rating`, and `multiselect`.
    pub field_type: String,

    /// Whether a submission must provide a value.
    pub required: bool,

    /// Placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Options for choice fields (JSONB).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Json<Vec<String>>>,

    /// Submission-time validation metadata (JSONB).
    pub validation: Json<FieldValidation>,

    /// Global document order.
    pub weight: i32,
}

/// Submission-time validation metadata for one field.
///
/// Every knob is optional; the sanitizers apply defaults at use, so `{}`
/// is a valid stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    /// Numeric floor for number and rating fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Numeric ceiling for number and rating fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Character cap for free-text fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Allow-list for checkbox and multiselect fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl StoredForm {
    /// Persist a compiled definition as a form row plus its field rows.
    ///
    /// Callers must validate the definition first; this flattens whatever
    /// it is given. Runs in one transaction: a failed field insert rolls
    /// back the form row as well.
    pub async fn create(
        pool: &PgPool,
        definition: &FormDefinition,
    ) -> Result<(Self, Vec<StoredField>)> {
        let now = chrono::Utc::now().timestamp();
        let form = Self {
            id: Uuid::now_v7(),
            url_id: generate_url_id(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            created: now,
            changed: now,
        };

        let mut tx = pool.begin().await.context("failed to start transaction")?;

        sqlx::query(
            r#"
            INSERT INTO form (id, url_id, title, description, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(form.id)
        .bind(&form.url_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.created)
        .bind(form.changed)
        .execute(&mut *tx)
        .await
        .context("failed to insert form")?;

        let mut fields = Vec::new();
        let mut weight = 0i32;

        for section in &definition.sections {
            for field in &section.fields {
                let stored = StoredField {
                    id: Uuid::now_v7(),
                    form_id: form.id,
                    section: section.title.clone(),
                    name: field.name.clone(),
                    label: field.label.clone(),
                    field_type: field.field_type.as_str().to_string(),
                    required: field.required,
                    placeholder: field.placeholder.clone(),
                    options: field.options.clone().map(Json),
                    validation: Json(FieldValidation {
                        options: field.options.clone().filter(|o| !o.is_empty()),
                        ..FieldValidation::default()
                    }),
                    weight,
                };

                sqlx::query(
                    r#"
                    INSERT INTO form_field
                        (id, form_id, section, name, label, field_type,
                         required, placeholder, options, validation, weight)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(stored.id)
                .bind(stored.form_id)
                .bind(&stored.section)
                .bind(&stored.name)
                .bind(&stored.label)
                .bind(&stored.field_type)
                .bind(stored.required)
                .bind(&stored.placeholder)
                .bind(&stored.options)
                .bind(&stored.validation)
                .bind(stored.weight)
                .execute(&mut *tx)
                .await
                .context("failed to insert form field")?;

                weight += 1;
                fields.push(stored);
            }
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok((form, fields))
    }

    /// Find a form by its public URL slug.
    pub async fn find_by_url_id(pool: &PgPool, url_id: &str) -> Result<Option<Self>> {
        let form = sqlx::query_as::<_, Self>(
            "SELECT id, url_id, title, description, created, changed FROM form WHERE url_id = $1",
        )
        .bind(url_id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch form by url_id")?;

        Ok(form)
    }
}

impl StoredField {
    /// Fetch a form's fields in document order.
    pub async fn for_form(pool: &PgPool, form_id: Uuid) -> Result<Vec<Self>> {
        let fields = sqlx::query_as::<_, Self>(
            "SELECT id, form_id, section, name, label, field_type, required, placeholder, options, validation, weight FROM form_field WHERE form_id = $1 ORDER BY weight",
        )
        .bind(form_id)
        .fetch_all(pool)
        .await
        .context("failed to fetch form fields")?;

        Ok(fields)
    }
}

/// Generate the 6-byte random hex slug used in public form URLs.
fn generate_url_id() -> String {
    let bytes: [u8; 6] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn url_id_is_twelve_hex_chars() {
        let id = generate_url_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn validation_defaults_to_empty_object() {
        let v = FieldValidation::default();
        assert_eq!(serde_json::to_string(&v).unwrap(), "{}");

        let parsed: FieldValidation = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, v);
    }
}
