//! Handlers for `/styles/{kind}`, where `kind` is `color`, `chart` or `icon`
//! (plural forms are accepted too).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kpiboard_core::{
  store::BoardStore,
  style::{NewStyle, Style, StyleKind},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

fn parse_kind(kind: &str) -> Result<StyleKind, ApiError> {
  kind.parse().map_err(ApiError::from_store)
}

/// `GET /styles/{kind}`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(kind): Path<String>,
) -> Result<Json<Vec<Style>>, ApiError> {
  let kind = parse_kind(&kind)?;
  let styles = store.list_styles(kind).await.map_err(ApiError::from_store)?;
  Ok(Json(styles))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  pub abbrev:      String,
}

/// `POST /styles/{kind}`: 409 if the abbreviation is taken for this kind.
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(kind): Path<String>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewStyle {
    kind:        parse_kind(&kind)?,
    name:        body.name,
    description: body.description,
    abbrev:      body.abbrev,
  };
  let style = store.create_style(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(style)))
}

/// `DELETE /styles/{kind}/{id}`
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path((kind, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
  let kind = parse_kind(&kind)?;
  store
    .delete_style(kind, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
