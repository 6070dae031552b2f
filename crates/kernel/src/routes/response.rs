//! Form response routes: submission intake and the portal listing view.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{FormResponse, ResponseValueRow, StoredField, StoredForm};
use crate::state::AppState;
use crate::submission::sanitize_submission;

/// Request body for submitting a response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    /// Raw answers keyed by field machine name.
    pub answers: serde_json::Map<String, serde_json::Value>,
}

/// One response with its values, for the portal submissions view.
#[derive(Debug, Serialize)]
pub struct ResponsePayload {
    pub id: Uuid,
    pub created: i64,
    pub values: Vec<ValuePayload>,
}

#[derive(Debug, Serialize)]
pub struct ValuePayload {
    pub field_id: Uuid,
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseListPayload {
    pub form_id: Uuid,
    pub responses: Vec<ResponsePayload>,
}

/// Submit a response to a form.
///
/// POST /api/forms/{url_id}/responses
///
/// The whole submission is sanitized before anything is written; a clean
/// batch is then stored in one transaction.
async fn submit_response(
    State(state): State<AppState>,
    Path(url_id): Path<String>,
    Json(payload): Json<SubmitResponseRequest>,
) -> AppResult<(StatusCode, Json<FormResponse>)> {
    let form = StoredForm::find_by_url_id(state.db(), &url_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let fields = StoredField::for_form(state.db(), form.id).await?;

    let values = sanitize_submission(&fields, &payload.answers)
        .map_err(|details| AppError::validation("Validation failed", details))?;

    let response = FormResponse::create(state.db(), form.id, &values).await?;

    info!(
        response_id = %response.id,
        form_id = %form.id,
        values = values.len(),
        "response recorded"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// List a form's responses with their values.
///
/// GET /api/forms/{url_id}/responses
async fn list_responses(
    State(state): State<AppState>,
    Path(url_id): Path<String>,
) -> AppResult<Json<ResponseListPayload>> {
    let form = StoredForm::find_by_url_id(state.db(), &url_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let responses = FormResponse::list_for_form(state.db(), form.id).await?;
    let rows = ResponseValueRow::for_form(state.db(), form.id).await?;

    let mut values_by_response: HashMap<Uuid, Vec<ValuePayload>> = HashMap::new();
    for row in rows {
        values_by_response
            .entry(row.response_id)
            .or_default()
            .push(ValuePayload {
                field_id: row.field_id,
                name: row.name,
                label: row.label,
                value: row.value,
            });
    }

    let responses = responses
        .into_iter()
        .map(|r| ResponsePayload {
            id: r.id,
            created: r.created,
            values: values_by_response.remove(&r.id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(ResponseListPayload {
        form_id: form.id,
        responses,
    }))
}

/// Create the response router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/forms/{url_id}/responses",
        post(submit_response).get(list_responses),
    )
}
