//! The catalog → KPI → record tree hanging off each board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::merge;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A named grouping of KPIs within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
  pub catalog_id: Uuid,
  pub board_id:   Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalog {
  pub board_id: Uuid,
  pub name:     String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPatch {
  pub name: Option<String>,
}

impl CatalogPatch {
  pub fn apply(self, catalog: &mut Catalog) {
    if let Some(v) = self.name {
      catalog.name = v;
    }
  }
}

// ─── Kpi ─────────────────────────────────────────────────────────────────────

/// A tracked metric definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
  pub kpi_id:         Uuid,
  pub catalog_id:     Uuid,
  pub name:           String,
  pub description:    Option<String>,
  pub formula:        Option<String>,
  /// A style of kind `color`.
  pub color_id:       Option<Uuid>,
  /// A style of kind `chart`.
  pub chart_id:       Option<Uuid>,
  /// Display order among sibling KPIs. Not unique; unset sorts last.
  pub position_index: Option<i64>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::BoardStore::create_kpi`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewKpi {
  pub catalog_id:     Uuid,
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

impl NewKpi {
  pub fn new(catalog_id: Uuid, name: impl Into<String>) -> Self {
    Self {
      catalog_id,
      name: name.into(),
      description: None,
      formula: None,
      color_id: None,
      chart_id: None,
      position_index: None,
    }
  }
}

/// Partial update for a [`Kpi`]. Ownership and ordering have their own
/// operations (`move_kpi`, `update_kpi_position`) and are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KpiPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub formula:     Option<String>,
  pub color_id:    Option<Uuid>,
  pub chart_id:    Option<Uuid>,
}

impl KpiPatch {
  pub fn apply(self, kpi: &mut Kpi) {
    if let Some(v) = self.name {
      kpi.name = v;
    }
    merge(&mut kpi.description, self.description);
    merge(&mut kpi.formula, self.formula);
    merge(&mut kpi.color_id, self.color_id);
    merge(&mut kpi.chart_id, self.chart_id);
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single timestamped value sample of a KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub record_id:  Uuid,
  pub kpi_id:     Uuid,
  pub value:      f64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord {
  pub kpi_id:     Uuid,
  pub value:      f64,
  /// Defaults to the time of insertion.
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// Filter for [`crate::store::BoardStore::list_records`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordQuery {
  /// Inclusive lower bound on `created_at`.
  pub after:  Option<DateTime<Utc>>,
  /// Exclusive upper bound on `created_at`.
  pub before: Option<DateTime<Utc>>,
  pub limit:  Option<usize>,
}
