//! Handlers for `/boards` endpoints, including board membership.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/boards` | |
//! | `POST`   | `/boards` | Body: [`NewBoard`]; links every listed member |
//! | `GET`    | `/boards/{id}` | |
//! | `PATCH`  | `/boards/{id}` | Body: [`BoardPatch`] |
//! | `DELETE` | `/boards/{id}` | Cascades to links and the catalog tree |
//! | `GET`    | `/boards/{id}/users` | Members |
//! | `GET`    | `/boards/{id}/links` | Dashboard placements |
//! | `PUT`    | `/boards/{id}/users/{user_id}` | Share with one more member |
//! | `DELETE` | `/boards/{id}/users/{user_id}` | Idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kpiboard_core::{
  board::{Board, BoardPatch, DashboardBoard, NewBoard},
  store::BoardStore,
  user::User,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /boards`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Board>>, ApiError> {
  let boards = store.list_boards().await.map_err(ApiError::from_store)?;
  Ok(Json(boards))
}

/// `POST /boards`, body: `{"name":"Sales","user_ids":["..."]}`
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewBoard>,
) -> Result<impl IntoResponse, ApiError> {
  let board = store.create_board(body).await.map_err(ApiError::from_store)?;
  tracing::info!(board_id = %board.board_id, "created board");
  Ok((StatusCode::CREATED, Json(board)))
}

/// `GET /boards/{id}`
pub async fn get_one<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Board>, ApiError> {
  let board = store.get_board(id).await.map_err(ApiError::from_store)?;
  Ok(Json(board))
}

/// `PATCH /boards/{id}`
pub async fn update<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<BoardPatch>,
) -> Result<Json<Board>, ApiError> {
  let board = store
    .update_board(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(board))
}

/// `DELETE /boards/{id}`
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_board(id).await.map_err(ApiError::from_store)?;
  tracing::info!(board_id = %id, "deleted board");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Membership ──────────────────────────────────────────────────────────────

/// `GET /boards/{id}/users`
pub async fn users<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<User>>, ApiError> {
  let users = store
    .list_board_users(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(users))
}

/// `GET /boards/{id}/links`
pub async fn links<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<DashboardBoard>>, ApiError> {
  let links = store
    .list_board_links(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(links))
}

/// `PUT /boards/{id}/users/{user_id}`
pub async fn link_user<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DashboardBoard>, ApiError> {
  let link = store
    .link_board_user(id, user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(link))
}

/// `DELETE /boards/{id}/users/{user_id}`
pub async fn unlink_user<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  store
    .unlink_board_user(id, user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
