//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | |
//! | `POST`   | `/users` | Body: [`NewUser`]; 409 on a taken email |
//! | `GET`    | `/users/{id}` | |
//! | `PATCH`  | `/users/{id}` | Body: [`UserPatch`] |
//! | `DELETE` | `/users/{id}` | 409 while the user owns a dashboard |
//! | `GET`    | `/users/{id}/dashboard` | 404 if the user has none |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kpiboard_core::{
  dashboard::Dashboard,
  store::BoardStore,
  user::{NewUser, User, UserPatch},
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<User>>, ApiError> {
  let users = store.list_users().await.map_err(ApiError::from_store)?;
  Ok(Json(users))
}

/// `POST /users`
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
  let user = store.create_user(body).await.map_err(ApiError::from_store)?;
  tracing::info!(user_id = %user.user_id, "created user");
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
  let user = store.get_user(id).await.map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `PATCH /users/{id}`
pub async fn update<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .update_user(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_user(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{id}/dashboard`
pub async fn dashboard<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Dashboard>, ApiError> {
  let dashboard = store
    .get_dashboard_for_user(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(dashboard))
}
