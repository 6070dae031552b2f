//! Form definition routes.
//!
//! Compiles markdown into a form, validates it, persists it, and serves
//! the render payload that the portal frontend builds its UI from.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::form::{parse_markdown, validate_form_structure};
use crate::models::{StoredField, StoredForm};
use crate::sanitize::sanitize_for_html_display;
use crate::state::AppState;

/// Request body for creating a form.
#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    /// Markdown source in the portal form dialect.
    pub markdown: String,
}

/// Identifiers of a newly created form.
#[derive(Debug, Serialize)]
pub struct CreateFormResponse {
    pub id: Uuid,
    pub url_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public link to the form, built from the configured site URL.
    pub form_url: String,
}

/// Render payload: form metadata plus sections rebuilt from stored fields.
#[derive(Debug, Serialize)]
pub struct FormPayload {
    pub id: Uuid,
    pub url_id: String,
    pub title: String,
    /// Description sanitized for direct HTML embedding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    pub sections: Vec<SectionPayload>,
    pub created: i64,
    pub changed: i64,
}

#[derive(Debug, Serialize)]
pub struct SectionPayload {
    pub title: String,
    pub fields: Vec<FieldPayload>,
}

#[derive(Debug, Serialize)]
pub struct FieldPayload {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Create a form from markdown.
///
/// POST /api/forms
async fn create_form(
    State(state): State<AppState>,
    Json(payload): Json<CreateFormRequest>,
) -> AppResult<(StatusCode, Json<CreateFormResponse>)> {
    let definition = parse_markdown(&payload.markdown);

    let validation = validate_form_structure(&definition);
    if !validation.valid {
        return Err(AppError::validation(
            "Form definition is invalid",
            validation.errors,
        ));
    }

    let (form, fields) = StoredForm::create(state.db(), &definition).await?;

    info!(
        form_id = %form.id,
        url_id = %form.url_id,
        fields = fields.len(),
        "form created"
    );

    let form_url = format!("{}/forms/{}", state.config().site_url, form.url_id);

    Ok((
        StatusCode::CREATED,
        Json(CreateFormResponse {
            id: form.id,
            url_id: form.url_id,
            title: form.title,
            description: form.description,
            form_url,
        }),
    ))
}

/// Fetch a form's render payload.
///
/// GET /api/forms/{url_id}
async fn get_form(
    State(state): State<AppState>,
    Path(url_id): Path<String>,
) -> AppResult<Json<FormPayload>> {
    let form = StoredForm::find_by_url_id(state.db(), &url_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let fields = StoredField::for_form(state.db(), form.id).await?;

    Ok(Json(build_payload(form, &fields)))
}

/// Group stored fields back into sections.
///
/// Fields arrive in weight order, so sections reappear in document order
/// as runs of equal section titles.
fn build_payload(form: StoredForm, fields: &[StoredField]) -> FormPayload {
    let mut sections: Vec<SectionPayload> = Vec::new();

    for field in fields {
        if sections.last().is_none_or(|s| s.title != field.section) {
            sections.push(SectionPayload {
                title: field.section.clone(),
                fields: Vec::new(),
            });
        }
        if let Some(section) = sections.last_mut() {
            section.fields.push(FieldPayload {
                id: field.id,
                field_type: field.field_type.clone(),
                name: field.name.clone(),
                label: field.label.clone(),
                required: field.required,
                placeholder: field.placeholder.clone(),
                options: field.options.as_ref().map(|o| o.0.clone()),
            });
        }
    }

    FormPayload {
        id: form.id,
        url_id: form.url_id,
        title: form.title,
        description_html: form.description.as_deref().map(sanitize_for_html_display),
        sections,
        created: form.created,
        changed: form.changed,
    }
}

/// Create the form router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forms", post(create_form))
        .route("/api/forms/{url_id}", get(get_form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValidation;
    use sqlx::types::Json as SqlJson;

    fn stored_field(form_id: Uuid, section: &str, name: &str, weight: i32) -> StoredField {
        StoredField {
            id: Uuid::now_v7(),
            form_id,
            section: section.to_string(),
            name: name.to_string(),
            label: name.to_string(),
            field_type: "text".to_string(),
            required: false,
            placeholder: None,
            options: None,
            validation: SqlJson(FieldValidation::default()),
            weight,
        }
    }

    #[test]
    fn payload_groups_fields_into_section_runs() {
        let form = StoredForm {
            id: Uuid::now_v7(),
            url_id: "abc123def456".to_string(),
            title: "Intake".to_string(),
            description: Some("Hello <script>alert(1)</script>".to_string()),
            created: 0,
            changed: 0,
        };
        let fields = vec![
            stored_field(form.id, "Contact", "name", 0),
            stored_field(form.id, "Contact", "email", 1),
            stored_field(form.id, "Details", "notes", 2),
        ];

        let payload = build_payload(form, &fields);

        assert_eq!(payload.sections.len(), 2);
        assert_eq!(payload.sections[0].title, "Contact");
        assert_eq!(payload.sections[0].fields.len(), 2);
        assert_eq!(payload.sections[1].title, "Details");
        assert_eq!(payload.sections[1].fields[0].name, "notes");

        // The description is sanitized for embedding.
        let html = payload.description_html.unwrap_or_default();
        assert!(!html.contains("script"));
        assert!(html.contains("Hello"));
    }
}
