//! Handlers for `/dashboards` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/dashboards` | |
//! | `POST`   | `/dashboards` | Body: `{"user_id":"..."}`; 409 if one exists |
//! | `GET`    | `/dashboards/{id}` | Dashboard plus its boards |
//! | `DELETE` | `/dashboards/{id}` | 409 while boards are linked |
//! | `GET`    | `/dashboards/{id}/boards` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kpiboard_core::{board::Board, dashboard::Dashboard, store::BoardStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /dashboards`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Dashboard>>, ApiError> {
  let dashboards = store
    .list_dashboards()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(dashboards))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub user_id: Uuid,
}

/// `POST /dashboards`
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let dashboard = store
    .create_dashboard(body.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(dashboard)))
}

/// A dashboard together with the boards placed on it.
#[derive(Debug, Serialize)]
pub struct DashboardView {
  #[serde(flatten)]
  pub dashboard: Dashboard,
  pub boards:    Vec<Board>,
}

/// `GET /dashboards/{id}`
pub async fn get_one<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DashboardView>, ApiError> {
  let dashboard = store.get_dashboard(id).await.map_err(ApiError::from_store)?;
  let boards = store
    .list_dashboard_boards(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(DashboardView { dashboard, boards }))
}

/// `DELETE /dashboards/{id}`
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_dashboard(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /dashboards/{id}/boards`
pub async fn boards<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Board>>, ApiError> {
  let boards = store
    .list_dashboard_boards(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(boards))
}
