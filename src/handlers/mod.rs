//! JSON API over the catalog engines.

pub mod items;
pub mod review;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::Serialize;
use std::sync::MutexGuard;
use tower_http::trace::TraceLayer;

use crate::domain::ReviewState;
use crate::error::{SchedulerError, StorageError};
use crate::state::{AppState, CatalogEngine};

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/catalogs", get(list_catalogs))
    .route("/catalogs/{catalog}/items", get(items::list_items).post(items::add_item))
    .route(
      "/catalogs/{catalog}/items/{id}",
      get(items::get_item).delete(items::remove_item),
    )
    .route("/catalogs/{catalog}/items/{id}/review", post(review::submit_review))
    .route("/catalogs/{catalog}/due", get(review::due_items).post(review::due_among))
    .route("/catalogs/{catalog}/stats", get(review::stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Error body: `{ "error": "..." }`
#[derive(Debug)]
pub enum ApiError {
  UnknownCatalog(String),
  BadRequest(String),
  Scheduler(SchedulerError),
}

impl From<SchedulerError> for ApiError {
  fn from(e: SchedulerError) -> Self {
    Self::Scheduler(e)
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Self::UnknownCatalog(name) => (StatusCode::NOT_FOUND, format!("Catalog '{}' not found", name)),
      Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
      Self::Scheduler(e) => {
        let status = match &e {
          SchedulerError::NotFound(_) => StatusCode::NOT_FOUND,
          SchedulerError::InvalidState { .. } => StatusCode::UNPROCESSABLE_ENTITY,
          SchedulerError::StorageFailure(_) => {
            tracing::error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR
          }
        };
        (status, e.to_string())
      }
    };
    (status, Json(ErrorBody { error: message })).into_response()
  }
}

/// Lock the engine for `catalog`
pub(crate) fn lock_engine<'a>(
  state: &'a AppState,
  catalog: &str,
) -> Result<MutexGuard<'a, CatalogEngine>, ApiError> {
  let engine = state
    .engine(catalog)
    .ok_or_else(|| ApiError::UnknownCatalog(catalog.to_string()))?;
  engine.lock().map_err(|_| {
    tracing::error!("Engine mutex for '{}' poisoned", catalog);
    ApiError::Scheduler(StorageError::LockPoisoned.into())
  })
}

/// One item as returned by the API: its id plus the flattened review state
#[derive(Debug, Serialize)]
pub struct ItemResponse {
  pub id: String,
  #[serde(flatten)]
  pub state: ReviewState,
}

impl ItemResponse {
  pub fn new(id: impl Into<String>, state: ReviewState) -> Self {
    Self { id: id.into(), state }
  }
}

#[derive(Debug, Serialize)]
pub struct CatalogInfo {
  pub name: String,
  pub strategy: &'static str,
}

pub async fn list_catalogs(State(state): State<AppState>) -> Result<Json<Vec<CatalogInfo>>, ApiError> {
  let mut catalogs = Vec::new();
  for (name, _) in state.catalogs() {
    let engine = lock_engine(&state, name)?;
    catalogs.push(CatalogInfo {
      name: name.to_string(),
      strategy: engine.policy().as_str(),
    });
  }
  Ok(Json(catalogs))
}
