//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision, so text order equals time order. UUIDs are stored as
//! hyphenated lowercase strings. Rows are read into `Raw*` structs and then
//! decoded into domain types.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use kpiboard_core::{
  board::{Board, DashboardBoard},
  dashboard::Dashboard,
  kpi::{Catalog, Kpi, Record},
  style::{Style, StyleKind},
  user::{User, UserProfile},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Drop sub-microsecond precision so a value survives a storage round trip
/// unchanged.
pub fn truncate_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── StyleKind ───────────────────────────────────────────────────────────────

pub fn decode_style_kind(s: &str) -> Result<StyleKind> {
  match s {
    "color" => Ok(StyleKind::Color),
    "chart" => Ok(StyleKind::Chart),
    "icon" => Ok(StyleKind::Icon),
    other => Err(Error::Decode(format!("unknown style kind: {other:?}"))),
  }
}

// ─── Constraint errors ───────────────────────────────────────────────────────

/// Whether `e` is a UNIQUE or PRIMARY KEY violation; `column` narrows the
/// match to a specific `table.column` as reported by SQLite.
pub fn is_unique_violation(e: &rusqlite::Error, column: Option<&str>) -> bool {
  match e {
    rusqlite::Error::SqliteFailure(f, msg) => {
      let unique = f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY;
      match (column, msg) {
        (Some(col), Some(m)) => unique && m.contains(col),
        (Some(_), None) => false,
        (None, _) => unique,
      }
    }
    _ => false,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, external_id, name, email, description,
  given_name, surname, job_title, business_phone, mobile_phone,
  office_location, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:         String,
  pub external_id:     Option<String>,
  pub name:            String,
  pub email:           Option<String>,
  pub description:     Option<String>,
  pub given_name:      Option<String>,
  pub surname:         Option<String>,
  pub job_title:       Option<String>,
  pub business_phone:  Option<String>,
  pub mobile_phone:    Option<String>,
  pub office_location: Option<String>,
  pub created_at:      String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:         row.get(0)?,
      external_id:     row.get(1)?,
      name:            row.get(2)?,
      email:           row.get(3)?,
      description:     row.get(4)?,
      given_name:      row.get(5)?,
      surname:         row.get(6)?,
      job_title:       row.get(7)?,
      business_phone:  row.get(8)?,
      mobile_phone:    row.get(9)?,
      office_location: row.get(10)?,
      created_at:      row.get(11)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:     decode_uuid(&self.user_id)?,
      external_id: self.external_id,
      profile:     UserProfile {
        name:            self.name,
        email:           self.email,
        description:     self.description,
        given_name:      self.given_name,
        surname:         self.surname,
        job_title:       self.job_title,
        business_phone:  self.business_phone,
        mobile_phone:    self.mobile_phone,
        office_location: self.office_location,
      },
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const DASHBOARD_COLUMNS: &str = "dashboard_id, user_id, created_at";

pub struct RawDashboard {
  pub dashboard_id: String,
  pub user_id:      String,
  pub created_at:   String,
}

impl RawDashboard {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      dashboard_id: row.get(0)?,
      user_id:      row.get(1)?,
      created_at:   row.get(2)?,
    })
  }

  pub fn into_dashboard(self) -> Result<Dashboard> {
    Ok(Dashboard {
      dashboard_id: decode_uuid(&self.dashboard_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const BOARD_COLUMNS: &str = "board_id, name, icon, created_at";

pub struct RawBoard {
  pub board_id:   String,
  pub name:       String,
  pub icon:       Option<String>,
  pub created_at: String,
}

impl RawBoard {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      board_id:   row.get(0)?,
      name:       row.get(1)?,
      icon:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_board(self) -> Result<Board> {
    Ok(Board {
      board_id:   decode_uuid(&self.board_id)?,
      name:       self.name,
      icon:       self.icon,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawLink {
  pub dashboard_id: String,
  pub board_id:     String,
  pub user_id:      String,
}

impl RawLink {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      dashboard_id: row.get(0)?,
      board_id:     row.get(1)?,
      user_id:      row.get(2)?,
    })
  }

  pub fn into_link(self) -> Result<DashboardBoard> {
    Ok(DashboardBoard {
      dashboard_id: decode_uuid(&self.dashboard_id)?,
      board_id:     decode_uuid(&self.board_id)?,
      user_id:      decode_uuid(&self.user_id)?,
    })
  }
}

pub const CATALOG_COLUMNS: &str = "catalog_id, board_id, name, created_at";

pub struct RawCatalog {
  pub catalog_id: String,
  pub board_id:   String,
  pub name:       String,
  pub created_at: String,
}

impl RawCatalog {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      catalog_id: row.get(0)?,
      board_id:   row.get(1)?,
      name:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_catalog(self) -> Result<Catalog> {
    Ok(Catalog {
      catalog_id: decode_uuid(&self.catalog_id)?,
      board_id:   decode_uuid(&self.board_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const KPI_COLUMNS: &str = "kpi_id, catalog_id, name, description, formula,
  color_id, chart_id, position_index, created_at";

pub struct RawKpi {
  pub kpi_id:         String,
  pub catalog_id:     String,
  pub name:           String,
  pub description:    Option<String>,
  pub formula:        Option<String>,
  pub color_id:       Option<String>,
  pub chart_id:       Option<String>,
  pub position_index: Option<i64>,
  pub created_at:     String,
}

impl RawKpi {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      kpi_id:         row.get(0)?,
      catalog_id:     row.get(1)?,
      name:           row.get(2)?,
      description:    row.get(3)?,
      formula:        row.get(4)?,
      color_id:       row.get(5)?,
      chart_id:       row.get(6)?,
      position_index: row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  pub fn into_kpi(self) -> Result<Kpi> {
    Ok(Kpi {
      kpi_id:         decode_uuid(&self.kpi_id)?,
      catalog_id:     decode_uuid(&self.catalog_id)?,
      name:           self.name,
      description:    self.description,
      formula:        self.formula,
      color_id:       decode_opt_uuid(self.color_id)?,
      chart_id:       decode_opt_uuid(self.chart_id)?,
      position_index: self.position_index,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const RECORD_COLUMNS: &str = "record_id, kpi_id, value, created_at";

pub struct RawRecord {
  pub record_id:  String,
  pub kpi_id:     String,
  pub value:      f64,
  pub created_at: String,
}

impl RawRecord {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:  row.get(0)?,
      kpi_id:     row.get(1)?,
      value:      row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      record_id:  decode_uuid(&self.record_id)?,
      kpi_id:     decode_uuid(&self.kpi_id)?,
      value:      self.value,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const STYLE_COLUMNS: &str = "style_id, kind, name, description, abbrev";

pub struct RawStyle {
  pub style_id:    String,
  pub kind:        String,
  pub name:        String,
  pub description: Option<String>,
  pub abbrev:      String,
}

impl RawStyle {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      style_id:    row.get(0)?,
      kind:        row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      abbrev:      row.get(4)?,
    })
  }

  pub fn into_style(self) -> Result<Style> {
    Ok(Style {
      style_id:    decode_uuid(&self.style_id)?,
      kind:        decode_style_kind(&self.kind)?,
      name:        self.name,
      description: self.description,
      abbrev:      self.abbrev,
    })
  }
}

/// Decode every raw row, failing on the first corrupt one.
pub fn decode_all<R, T>(raws: Vec<R>, f: fn(R) -> Result<T>) -> Result<Vec<T>> {
  raws.into_iter().map(f).collect()
}
