//! Handlers for KPIs and their records.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/catalogs/{id}/kpis` | In display order |
//! | `POST`   | `/catalogs/{id}/kpis` | Body: [`CreateBody`] |
//! | `GET`    | `/kpis/{id}` | |
//! | `PATCH`  | `/kpis/{id}` | Body: [`KpiPatch`] |
//! | `DELETE` | `/kpis/{id}` | Cascades to records |
//! | `POST`   | `/kpis/{id}/move` | Body: `{"new_catalog_id":"..."}` |
//! | `PUT`    | `/kpis/{id}/position` | Body: `{"position_index":3}` |
//! | `GET`    | `/kpis/{id}/records` | Optional `?after=&before=&limit=` |
//! | `POST`   | `/kpis/{id}/records` | Body: `{"value":1.5}` |
//! | `GET`    | `/records/{id}` | |
//! | `DELETE` | `/records/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use kpiboard_core::{
  kpi::{Kpi, KpiPatch, NewKpi, NewRecord, Record, RecordQuery},
  store::BoardStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── KPIs ────────────────────────────────────────────────────────────────────

/// `GET /catalogs/{id}/kpis`
pub async fn list<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(catalog_id): Path<Uuid>,
) -> Result<Json<Vec<Kpi>>, ApiError> {
  let kpis = store
    .list_kpis(catalog_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(kpis))
}

/// A [`NewKpi`] without its catalog, which comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:           String,
  #[serde(default)]
  pub description:    Option<String>,
  #[serde(default)]
  pub formula:        Option<String>,
  #[serde(default)]
  pub color_id:       Option<Uuid>,
  #[serde(default)]
  pub chart_id:       Option<Uuid>,
  #[serde(default)]
  pub position_index: Option<i64>,
}

/// `POST /catalogs/{id}/kpis`
pub async fn create<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(catalog_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewKpi {
    catalog_id,
    name: body.name,
    description: body.description,
    formula: body.formula,
    color_id: body.color_id,
    chart_id: body.chart_id,
    position_index: body.position_index,
  };
  let kpi = store.create_kpi(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(kpi)))
}

/// `GET /kpis/{id}`
pub async fn get_one<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Kpi>, ApiError> {
  let kpi = store.get_kpi(id).await.map_err(ApiError::from_store)?;
  Ok(Json(kpi))
}

/// `PATCH /kpis/{id}`
pub async fn update<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<KpiPatch>,
) -> Result<Json<Kpi>, ApiError> {
  let kpi = store
    .update_kpi(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(kpi))
}

/// `DELETE /kpis/{id}`
pub async fn delete<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_kpi(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub new_catalog_id: Uuid,
}

/// `POST /kpis/{id}/move`
pub async fn move_to<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MoveBody>,
) -> Result<Json<Kpi>, ApiError> {
  let kpi = store
    .move_kpi(id, body.new_catalog_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(kpi))
}

#[derive(Debug, Deserialize)]
pub struct PositionBody {
  pub position_index: i64,
}

/// `PUT /kpis/{id}/position`
pub async fn position<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PositionBody>,
) -> Result<Json<Kpi>, ApiError> {
  let kpi = store
    .update_kpi_position(id, body.position_index)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(kpi))
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// `GET /kpis/{id}/records[?after=<ts>][&before=<ts>][&limit=<n>]`
pub async fn list_records<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(kpi_id): Path<Uuid>,
  Query(query): Query<RecordQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
  if matches!((query.after, query.before), (Some(a), Some(b)) if a > b) {
    return Err(ApiError::BadRequest(
      "`after` must not be later than `before`".into(),
    ));
  }
  let records = store
    .list_records(kpi_id, query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct RecordBody {
  pub value:      f64,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// `POST /kpis/{id}/records`
pub async fn create_record<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(kpi_id): Path<Uuid>,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewRecord { kpi_id, value: body.value, created_at: body.created_at };
  let record = store
    .create_record(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /records/{id}`
pub async fn get_record<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Record>, ApiError> {
  let record = store.get_record(id).await.map_err(ApiError::from_store)?;
  Ok(Json(record))
}

/// `DELETE /records/{id}`
pub async fn delete_record<S: BoardStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_record(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
