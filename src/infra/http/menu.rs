//! Menu handlers: thin glue between the routing layer and the menu service.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::forms::{RawMenuSubmission, parse_menu_form};

use super::AppState;

pub async fn list_menu_items(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let items = state.menu.menu_items().await?;
    Ok(Json(items))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = state.menu.distinct_categories().await?;
    Ok(Json(categories))
}

pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.menu.menu_item_by_id(id).await?;
    Ok(Json(item))
}

pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<RawMenuSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let draft = parse_menu_form(payload)?;
    let record = state.menu.add_menu_item(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RawMenuSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let draft = parse_menu_form(payload)?;
    let record = state.menu.update_menu_item(id, draft).await?;
    Ok(Json(record))
}

pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.menu.delete_menu_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
