//! Form response model: one submission and its sanitized values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::submission::values::SanitizedValue;

/// Response record. Carries no submitter identity; intake forms are
/// anonymous.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FormResponse {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Form this response answers.
    pub form_id: Uuid,

    /// Unix timestamp when submitted.
    pub created: i64,
}

/// A single stored value of a response.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResponseValue {
    /// Owning response.
    pub response_id: Uuid,

    /// Field this value answers.
    pub field_id: Uuid,

    /// Sanitized stored value.
    pub value: String,
}

/// A response value joined with its field's name and label, for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResponseValueRow {
    /// Owning response.
    pub response_id: Uuid,

    /// Field this value answers.
    pub field_id: Uuid,

    /// Field machine name.
    pub name: String,

    /// Field label at the time of the query.
    pub label: String,

    /// Sanitized stored value.
    pub value: String,
}

impl FormResponse {
    /// Persist a sanitized batch as a response row plus its value rows.
    ///
    /// The batch comes from the sanitization pipeline, which is
    /// all-or-nothing, so this only ever sees complete submissions. Runs
    /// in one transaction: if any value insert fails, the response row is
    /// rolled back with it and no partial response can be read back.
    pub async fn create(pool: &PgPool, form_id: Uuid, values: &[SanitizedValue]) -> Result<Self> {
        let response = Self {
            id: Uuid::now_v7(),
            form_id,
            created: chrono::Utc::now().timestamp(),
        };

        let mut tx = pool.begin().await.context("failed to start transaction")?;

        sqlx::query("INSERT INTO form_response (id, form_id, created) VALUES ($1, $2, $3)")
            .bind(response.id)
            .bind(response.form_id)
            .bind(response.created)
            .execute(&mut *tx)
            .await
            .context("failed to insert response")?;

        for value in values {
            let row = ResponseValue {
                response_id: response.id,
                field_id: value.field_id,
                value: value.value.clone(),
            };
            sqlx::query(
                "INSERT INTO form_response_value (response_id, field_id, value) VALUES ($1, $2, $3)",
            )
            .bind(row.response_id)
            .bind(row.field_id)
            .bind(&row.value)
            .execute(&mut *tx)
            .await
            .context("failed to insert response value")?;
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok(response)
    }

    /// List a form's responses, newest first.
    pub async fn list_for_form(pool: &PgPool, form_id: Uuid) -> Result<Vec<Self>> {
        let responses = sqlx::query_as::<_, Self>(
            "SELECT id, form_id, created FROM form_response WHERE form_id = $1 ORDER BY created DESC, id DESC",
        )
        .bind(form_id)
        .fetch_all(pool)
        .await
        .context("failed to list responses")?;

        Ok(responses)
    }
}

impl ResponseValueRow {
    /// Fetch every value of a form's responses, joined with field names.
    ///
    /// One query for the whole listing; callers group by `response_id`.
    pub async fn for_form(pool: &PgPool, form_id: Uuid) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            r#"
            SELECT rv.response_id, rv.field_id, ff.name, ff.label, rv.value
            FROM form_response_value rv
            JOIN form_field ff ON ff.id = rv.field_id
            JOIN form_response fr ON fr.id = rv.response_id
            WHERE fr.form_id = $1
            ORDER BY fr.created DESC, fr.id DESC, ff.weight
            "#,
        )
        .bind(form_id)
        .fetch_all(pool)
        .await
        .context("failed to fetch response values")?;

        Ok(rows)
    }
}
