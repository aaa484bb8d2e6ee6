use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{SelectedFile, TopK};
use crate::services::UiStateView;

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct SetTopKRequest {
    pub top_k: f64,
}

/// Fields of the page's multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub top_k: Option<String>,
    pub file: Option<SelectedFile>,
}

/// Reads the `top_k` and `file` fields; anything else is skipped.
///
/// A file part with neither a filename nor content means the picker was left empty.
pub async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<UploadForm> {
    let mut multipart = multipart.map_err(|rej| AppError::InvalidInput(rej.body_text()))?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "top_k" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.body_text()))?;
                form.top_k = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.body_text()))?;

                if !file_name.is_empty() || !bytes.is_empty() {
                    form.file = Some(SelectedFile::new(file_name, bytes.to_vec()));
                }
            }
            other => {
                tracing::debug!(field = %other, "Skipping unknown form field");
            }
        }
    }

    Ok(form)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Current form state
pub async fn get_state(State(state): State<AppState>) -> Json<UiStateView> {
    Json(state.view().await)
}

/// Select a viewing-history file
pub async fn select_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UiStateView>> {
    let upload = read_upload_form(multipart).await?;
    let file = upload
        .file
        .ok_or_else(|| AppError::InvalidInput("Missing `file` field".to_string()))?;

    let mut form = state.form.write().await;
    form.select_file(file);
    Ok(Json(form.view()))
}

/// Change the number of recommendations to request
pub async fn set_top_k(
    State(state): State<AppState>,
    Json(request): Json<SetTopKRequest>,
) -> Json<UiStateView> {
    let mut form = state.form.write().await;
    form.set_top_k(i64::from(TopK::from_number(request.top_k).get()));
    Json(form.view())
}

/// Submit the selected file; failures are reported through the returned state
pub async fn submit(State(state): State<AppState>) -> Json<UiStateView> {
    state.submit().await;
    Json(state.view().await)
}
