//! Review submission and due-set queries.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lock_engine, ApiError, ItemResponse};
use crate::domain::Grade;
use crate::state::AppState;
use crate::stats::CatalogStats;

/// Either a self grade (`quality`) or an exercise result (`correct`)
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub quality: Option<Grade>,
  pub correct: Option<bool>,
}

impl ReviewRequest {
  fn grade(&self) -> Result<Grade, ApiError> {
    match (self.quality, self.correct) {
      (Some(quality), None) => Ok(quality),
      (None, Some(correct)) => Ok(Grade::from_correct(correct)),
      _ => Err(ApiError::BadRequest(
        "Expected exactly one of 'quality' or 'correct'".to_string(),
      )),
    }
  }
}

pub async fn submit_review(
  State(state): State<AppState>,
  Path((catalog, id)): Path<(String, String)>,
  Json(request): Json<ReviewRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
  let grade = request.grade()?;
  let mut engine = lock_engine(&state, &catalog)?;
  let next = engine.submit_review(&id, grade)?;
  Ok(Json(ItemResponse::new(id, next)))
}

#[derive(Debug, Deserialize)]
pub struct DueQuery {
  /// Evaluate at this instant instead of the engine clock
  pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DueAmongRequest {
  pub ids: Vec<String>,
  pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct DueResponse {
  pub due: Vec<String>,
}

pub async fn due_items(
  State(state): State<AppState>,
  Path(catalog): Path<String>,
  Query(query): Query<DueQuery>,
) -> Result<Json<DueResponse>, ApiError> {
  let engine = lock_engine(&state, &catalog)?;
  let now = query.now.unwrap_or_else(|| engine.now());
  Ok(Json(DueResponse {
    due: engine.due_items(now)?,
  }))
}

/// Due subset of the caller's item list; never-registered ids count as due
pub async fn due_among(
  State(state): State<AppState>,
  Path(catalog): Path<String>,
  Json(request): Json<DueAmongRequest>,
) -> Result<Json<DueResponse>, ApiError> {
  let engine = lock_engine(&state, &catalog)?;
  let now = request.now.unwrap_or_else(|| engine.now());
  Ok(Json(DueResponse {
    due: engine.due_items_among(&request.ids, now)?,
  }))
}

pub async fn stats(
  State(state): State<AppState>,
  Path(catalog): Path<String>,
) -> Result<Json<CatalogStats>, ApiError> {
  let engine = lock_engine(&state, &catalog)?;
  let now = engine.now();
  Ok(Json(engine.stats(now)?))
}
