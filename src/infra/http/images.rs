//! Image upload and retrieval handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::application::error::AppError;

use super::AppState;

const IMAGE_FIELD: &str = "image";

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::validation(format!("invalid multipart payload: {err}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or(IMAGE_FIELD).to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::validation(format!("invalid multipart payload: {err}")))?;

        let stored = state.images.store(&original_name, data).await?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(AppError::validation(format!(
        "multipart field `{IMAGE_FIELD}` is required"
    )))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.images.read(&key).await?;
    let mime = mime_guess::from_path(&key).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], data))
}
