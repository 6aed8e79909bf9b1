//! The `BoardStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `kpiboard-store-sqlite`).
//! Higher layers (`kpiboard-api`, `kpiboard-server`) depend on this
//! abstraction, not on any concrete backend.
//!
//! # Referential rules
//!
//! - Every create checks that its parent exists and fails with
//!   [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) otherwise.
//! - Every operation touching more than one row is atomic.
//! - Deletes either cascade or are restricted, per relationship:
//!
//! | Parent | Children | Policy |
//! |--------|----------|--------|
//! | User | Dashboard | restrict |
//! | Dashboard | linked Boards | restrict |
//! | Board | link rows, Catalogs | cascade |
//! | Catalog | Kpis | cascade |
//! | Kpi | Records | cascade |
//! | Style | Kpi references, Board icons | set null |

use std::future::Future;

use uuid::Uuid;

use crate::{
  Classify,
  board::{Board, BoardPatch, DashboardBoard, NewBoard},
  dashboard::Dashboard,
  identity::ExternalIdentity,
  kpi::{
    Catalog, CatalogPatch, Kpi, KpiPatch, NewCatalog, NewKpi, NewRecord, Record,
    RecordQuery,
  },
  style::{NewStyle, Style, StyleKind},
  user::{NewUser, User, UserPatch},
};

/// Abstraction over a kpiboard storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BoardStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Fails with a conflict if the email or external id is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Restricted while the user still owns a dashboard.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Look a user up by provider subject id, creating it from the supplied
  /// profile on first sight.
  fn find_or_create_user(
    &self,
    identity: ExternalIdentity,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Dashboards ────────────────────────────────────────────────────────

  /// Fails with a conflict if the user already has a dashboard.
  fn create_dashboard(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_;

  fn get_dashboard(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_;

  /// Fails if either the user or its dashboard is absent.
  fn get_dashboard_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_;

  fn list_dashboards(
    &self,
  ) -> impl Future<Output = Result<Vec<Dashboard>, Self::Error>> + Send + '_;

  /// Boards placed on the dashboard.
  fn list_dashboard_boards(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Board>, Self::Error>> + Send + '_;

  /// Restricted while any board is linked to the dashboard.
  fn delete_dashboard(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Boards ────────────────────────────────────────────────────────────

  /// Create a board and link it to every listed member, all or nothing.
  fn create_board(
    &self,
    input: NewBoard,
  ) -> impl Future<Output = Result<Board, Self::Error>> + Send + '_;

  fn get_board(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Board, Self::Error>> + Send + '_;

  fn list_boards(
    &self,
  ) -> impl Future<Output = Result<Vec<Board>, Self::Error>> + Send + '_;

  fn update_board(
    &self,
    id: Uuid,
    patch: BoardPatch,
  ) -> impl Future<Output = Result<Board, Self::Error>> + Send + '_;

  /// Remove the board's link rows, its catalog subtree, then the board.
  fn delete_board(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_board_users(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Association rows ──────────────────────────────────────────────────

  fn list_board_links(
    &self,
    board_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DashboardBoard>, Self::Error>> + Send + '_;

  /// Share a board with one more member. Linking an existing member is a
  /// no-op that returns the existing row.
  fn link_board_user(
    &self,
    board_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<DashboardBoard, Self::Error>> + Send + '_;

  /// Idempotent: removing a link that does not exist succeeds.
  fn unlink_board_user(
    &self,
    board_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Catalogs ──────────────────────────────────────────────────────────

  fn create_catalog(
    &self,
    input: NewCatalog,
  ) -> impl Future<Output = Result<Catalog, Self::Error>> + Send + '_;

  fn get_catalog(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Catalog, Self::Error>> + Send + '_;

  fn list_catalogs(
    &self,
    board_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Catalog>, Self::Error>> + Send + '_;

  fn update_catalog(
    &self,
    id: Uuid,
    patch: CatalogPatch,
  ) -> impl Future<Output = Result<Catalog, Self::Error>> + Send + '_;

  /// Cascades to the catalog's KPIs and their records.
  fn delete_catalog(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── KPIs ──────────────────────────────────────────────────────────────

  fn create_kpi(
    &self,
    input: NewKpi,
  ) -> impl Future<Output = Result<Kpi, Self::Error>> + Send + '_;

  fn get_kpi(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Kpi, Self::Error>> + Send + '_;

  /// Sibling KPIs in display order: by `position_index` with unset last,
  /// ties broken by creation time.
  fn list_kpis(
    &self,
    catalog_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Kpi>, Self::Error>> + Send + '_;

  fn update_kpi(
    &self,
    id: Uuid,
    patch: KpiPatch,
  ) -> impl Future<Output = Result<Kpi, Self::Error>> + Send + '_;

  /// Reassign the KPI to another catalog. Records follow the KPI. Moving to
  /// the current catalog writes nothing.
  fn move_kpi(
    &self,
    id: Uuid,
    new_catalog_id: Uuid,
  ) -> impl Future<Output = Result<Kpi, Self::Error>> + Send + '_;

  fn update_kpi_position(
    &self,
    id: Uuid,
    position_index: i64,
  ) -> impl Future<Output = Result<Kpi, Self::Error>> + Send + '_;

  /// Cascades to the KPI's records.
  fn delete_kpi(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Records ───────────────────────────────────────────────────────────

  fn create_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  fn get_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Records of a KPI ordered by `created_at`.
  fn list_records(
    &self,
    kpi_id: Uuid,
    query: RecordQuery,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  fn delete_record(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Styles ────────────────────────────────────────────────────────────

  /// Fails with a conflict if the abbreviation is taken within the kind.
  fn create_style(
    &self,
    input: NewStyle,
  ) -> impl Future<Output = Result<Style, Self::Error>> + Send + '_;

  fn list_styles(
    &self,
    kind: StyleKind,
  ) -> impl Future<Output = Result<Vec<Style>, Self::Error>> + Send + '_;

  fn delete_style(
    &self,
    kind: StyleKind,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
