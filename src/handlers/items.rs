//! Item registration and lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{lock_engine, ApiError, ItemResponse};
use crate::domain::ReviewableItem;
use crate::state::AppState;

pub async fn list_items(
  State(state): State<AppState>,
  Path(catalog): Path<String>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
  let engine = lock_engine(&state, &catalog)?;
  let items = engine
    .all_items()?
    .into_iter()
    .map(|(id, review)| ItemResponse::new(id, review))
    .collect();
  Ok(Json(items))
}

/// 201 when the item is new, 200 when it was already registered
pub async fn add_item(
  State(state): State<AppState>,
  Path(catalog): Path<String>,
  Json(item): Json<ReviewableItem>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
  if item.id.trim().is_empty() {
    return Err(ApiError::BadRequest("Item id must not be empty".to_string()));
  }

  let mut engine = lock_engine(&state, &catalog)?;
  let created = engine.add_item(&item)?;
  let review = engine.state(&item.id)?;
  let status = if created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(ItemResponse::new(item.id, review))))
}

pub async fn get_item(
  State(state): State<AppState>,
  Path((catalog, id)): Path<(String, String)>,
) -> Result<Json<ItemResponse>, ApiError> {
  let engine = lock_engine(&state, &catalog)?;
  let review = engine.state(&id)?;
  Ok(Json(ItemResponse::new(id, review)))
}

pub async fn remove_item(
  State(state): State<AppState>,
  Path((catalog, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
  let mut engine = lock_engine(&state, &catalog)?;
  engine.remove_item(&id)?;
  Ok(StatusCode::NO_CONTENT)
}
