//! [`SqliteStore`], the SQLite implementation of [`BoardStore`].

use std::path::Path;

use chrono::Utc;
use kpiboard_core::{
  board::{Board, BoardPatch, DashboardBoard, NewBoard},
  dashboard::Dashboard,
  identity::ExternalIdentity,
  kpi::{
    Catalog, CatalogPatch, Kpi, KpiPatch, NewCatalog, NewKpi, NewRecord, Record,
    RecordQuery,
  },
  store::BoardStore,
  style::{NewStyle, Style, StyleKind},
  user::{NewUser, User, UserPatch},
};
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use crate::{Error, Result, encode::truncate_dt, ops, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A kpiboard store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection handle is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` on the connection thread and surface its domain result.
  async fn run<T, F>(&self, op: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(op(conn))).await?
  }
}

fn now() -> chrono::DateTime<Utc> { truncate_dt(Utc::now()) }

// ─── BoardStore impl ─────────────────────────────────────────────────────────

impl BoardStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:     Uuid::new_v4(),
      external_id: input.external_id,
      profile:     input.profile,
      created_at:  now(),
    };
    self.run(move |c| ops::create_user(c, user)).await
  }

  async fn get_user(&self, id: Uuid) -> Result<User> {
    self.run(move |c| ops::get_user(c, id)).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    self.run(|c| ops::list_users(c)).await
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User> {
    self.run(move |c| ops::update_user(c, id, patch)).await
  }

  async fn delete_user(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_user(c, id)).await
  }

  async fn find_or_create_user(&self, identity: ExternalIdentity) -> Result<User> {
    let fresh = User {
      user_id:     Uuid::new_v4(),
      external_id: None,
      profile:     Default::default(),
      created_at:  now(),
    };
    self
      .run(move |c| ops::find_or_create_user(c, identity, fresh))
      .await
  }

  // ── Dashboards ────────────────────────────────────────────────────────

  async fn create_dashboard(&self, user_id: Uuid) -> Result<Dashboard> {
    let dashboard = Dashboard {
      dashboard_id: Uuid::new_v4(),
      user_id,
      created_at: now(),
    };
    self.run(move |c| ops::create_dashboard(c, dashboard)).await
  }

  async fn get_dashboard(&self, id: Uuid) -> Result<Dashboard> {
    self.run(move |c| ops::get_dashboard(c, id)).await
  }

  async fn get_dashboard_for_user(&self, user_id: Uuid) -> Result<Dashboard> {
    self
      .run(move |c| ops::get_dashboard_for_user(c, user_id))
      .await
  }

  async fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
    self.run(|c| ops::list_dashboards(c)).await
  }

  async fn list_dashboard_boards(&self, id: Uuid) -> Result<Vec<Board>> {
    self.run(move |c| ops::list_dashboard_boards(c, id)).await
  }

  async fn delete_dashboard(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_dashboard(c, id)).await
  }

  // ── Boards ────────────────────────────────────────────────────────────

  async fn create_board(&self, input: NewBoard) -> Result<Board> {
    let members = input.distinct_user_ids();
    let board = Board {
      board_id:   Uuid::new_v4(),
      name:       input.name,
      icon:       input.icon,
      created_at: now(),
    };
    self
      .run(move |c| ops::create_board(c, board, members))
      .await
  }

  async fn get_board(&self, id: Uuid) -> Result<Board> {
    self.run(move |c| ops::get_board(c, id)).await
  }

  async fn list_boards(&self) -> Result<Vec<Board>> {
    self.run(|c| ops::list_boards(c)).await
  }

  async fn update_board(&self, id: Uuid, patch: BoardPatch) -> Result<Board> {
    self.run(move |c| ops::update_board(c, id, patch)).await
  }

  async fn delete_board(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_board(c, id)).await
  }

  async fn list_board_users(&self, id: Uuid) -> Result<Vec<User>> {
    self.run(move |c| ops::list_board_users(c, id)).await
  }

  // ── Association rows ──────────────────────────────────────────────────

  async fn list_board_links(&self, board_id: Uuid) -> Result<Vec<DashboardBoard>> {
    self.run(move |c| ops::list_board_links(c, board_id)).await
  }

  async fn link_board_user(
    &self,
    board_id: Uuid,
    user_id: Uuid,
  ) -> Result<DashboardBoard> {
    self
      .run(move |c| ops::link_board_user(c, board_id, user_id))
      .await
  }

  async fn unlink_board_user(&self, board_id: Uuid, user_id: Uuid) -> Result<()> {
    self
      .run(move |c| ops::unlink_board_user(c, board_id, user_id))
      .await
  }

  // ── Catalogs ──────────────────────────────────────────────────────────

  async fn create_catalog(&self, input: NewCatalog) -> Result<Catalog> {
    let catalog = Catalog {
      catalog_id: Uuid::new_v4(),
      board_id:   input.board_id,
      name:       input.name,
      created_at: now(),
    };
    self.run(move |c| ops::create_catalog(c, catalog)).await
  }

  async fn get_catalog(&self, id: Uuid) -> Result<Catalog> {
    self.run(move |c| ops::get_catalog(c, id)).await
  }

  async fn list_catalogs(&self, board_id: Uuid) -> Result<Vec<Catalog>> {
    self.run(move |c| ops::list_catalogs(c, board_id)).await
  }

  async fn update_catalog(&self, id: Uuid, patch: CatalogPatch) -> Result<Catalog> {
    self.run(move |c| ops::update_catalog(c, id, patch)).await
  }

  async fn delete_catalog(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_catalog(c, id)).await
  }

  // ── KPIs ──────────────────────────────────────────────────────────────

  async fn create_kpi(&self, input: NewKpi) -> Result<Kpi> {
    let kpi = Kpi {
      kpi_id:         Uuid::new_v4(),
      catalog_id:     input.catalog_id,
      name:           input.name,
      description:    input.description,
      formula:        input.formula,
      color_id:       input.color_id,
      chart_id:       input.chart_id,
      position_index: input.position_index,
      created_at:     now(),
    };
    self.run(move |c| ops::create_kpi(c, kpi)).await
  }

  async fn get_kpi(&self, id: Uuid) -> Result<Kpi> {
    self.run(move |c| ops::get_kpi(c, id)).await
  }

  async fn list_kpis(&self, catalog_id: Uuid) -> Result<Vec<Kpi>> {
    self.run(move |c| ops::list_kpis(c, catalog_id)).await
  }

  async fn update_kpi(&self, id: Uuid, patch: KpiPatch) -> Result<Kpi> {
    self.run(move |c| ops::update_kpi(c, id, patch)).await
  }

  async fn move_kpi(&self, id: Uuid, new_catalog_id: Uuid) -> Result<Kpi> {
    self
      .run(move |c| ops::move_kpi(c, id, new_catalog_id))
      .await
  }

  async fn update_kpi_position(&self, id: Uuid, position_index: i64) -> Result<Kpi> {
    self
      .run(move |c| ops::update_kpi_position(c, id, position_index))
      .await
  }

  async fn delete_kpi(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_kpi(c, id)).await
  }

  // ── Records ───────────────────────────────────────────────────────────

  async fn create_record(&self, input: NewRecord) -> Result<Record> {
    let record = Record {
      record_id:  Uuid::new_v4(),
      kpi_id:     input.kpi_id,
      value:      input.value,
      created_at: truncate_dt(input.created_at.unwrap_or_else(Utc::now)),
    };
    self.run(move |c| ops::create_record(c, record)).await
  }

  async fn get_record(&self, id: Uuid) -> Result<Record> {
    self.run(move |c| ops::get_record(c, id)).await
  }

  async fn list_records(&self, kpi_id: Uuid, query: RecordQuery) -> Result<Vec<Record>> {
    self.run(move |c| ops::list_records(c, kpi_id, query)).await
  }

  async fn delete_record(&self, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_record(c, id)).await
  }

  // ── Styles ────────────────────────────────────────────────────────────

  async fn create_style(&self, input: NewStyle) -> Result<Style> {
    let style = Style {
      style_id:    Uuid::new_v4(),
      kind:        input.kind,
      name:        input.name,
      description: input.description,
      abbrev:      input.abbrev,
    };
    self.run(move |c| ops::create_style(c, style)).await
  }

  async fn list_styles(&self, kind: StyleKind) -> Result<Vec<Style>> {
    self.run(move |c| ops::list_styles(c, kind)).await
  }

  async fn delete_style(&self, kind: StyleKind, id: Uuid) -> Result<()> {
    self.run(move |c| ops::delete_style(c, kind, id)).await
  }
}
