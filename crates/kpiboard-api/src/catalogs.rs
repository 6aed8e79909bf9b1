//! Handlers for catalogs, nested under their board.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kpiboard_core::{
  kpi::{Catalog, CatalogPatch, NewCatalog},
  store::BoardStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /boards/{id}/catalogs`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<Catalog>>, ApiError> {
  let catalogs = store
    .list_catalogs(board_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(catalogs))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /boards/{id}/catalogs`, body: `{"name":"Q1"}`
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(board_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let catalog = store
    .create_catalog(NewCatalog { board_id, name: body.name })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(catalog)))
}

/// `GET /catalogs/{id}`
pub async fn get_one<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Catalog>, ApiError> {
  let catalog = store.get_catalog(id).await.map_err(ApiError::from_store)?;
  Ok(Json(catalog))
}

/// `PATCH /catalogs/{id}`
pub async fn update<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<CatalogPatch>,
) -> Result<Json<Catalog>, ApiError> {
  let catalog = store
    .update_catalog(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(catalog))
}

/// `DELETE /catalogs/{id}` removes the catalog's KPIs and records too.
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_catalog(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
