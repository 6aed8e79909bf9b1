//! Synchronous operations executed on the connection thread.
//!
//! Every function that touches more than one row opens a transaction and
//! commits only after all checks and writes succeed. Any early return drops
//! the [`rusqlite::Transaction`], which rolls it back, so callers never see a
//! partially applied mutation.

use kpiboard_core::{
  Entity,
  board::{Board, BoardPatch, DashboardBoard},
  dashboard::Dashboard,
  identity::ExternalIdentity,
  kpi::{Catalog, CatalogPatch, Kpi, KpiPatch, Record, RecordQuery},
  style::{Style, StyleKind},
  user::{User, UserPatch},
};
use rusqlite::{Connection, OptionalExtension as _, Params, Row, params};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    BOARD_COLUMNS, CATALOG_COLUMNS, DASHBOARD_COLUMNS, KPI_COLUMNS,
    RECORD_COLUMNS, RawBoard, RawCatalog, RawDashboard, RawKpi, RawLink,
    RawRecord, RawStyle, RawUser, STYLE_COLUMNS, USER_COLUMNS, decode_all,
    decode_uuid, encode_dt, encode_uuid, is_unique_violation,
  },
};

type CoreError = kpiboard_core::Error;
type Map<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

// ─── Query helpers ───────────────────────────────────────────────────────────

fn one<T>(conn: &Connection, sql: &str, p: impl Params, map: Map<T>) -> Result<Option<T>> {
  Ok(conn.query_row(sql, p, map).optional()?)
}

fn all<T>(conn: &Connection, sql: &str, p: impl Params, map: Map<T>) -> Result<Vec<T>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(p, map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// `table` and `key` are always static identifiers from this module.
fn exists(conn: &Connection, table: &str, key: &str, id: Uuid) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {table} WHERE {key} = ?1");
  Ok(
    conn
      .query_row(&sql, params![encode_uuid(id)], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn require(conn: &Connection, entity: Entity, id: Uuid) -> Result<()> {
  let (table, key) = match entity {
    Entity::User => ("users", "user_id"),
    Entity::Dashboard => ("dashboards", "dashboard_id"),
    Entity::Board => ("boards", "board_id"),
    Entity::Catalog => ("catalogs", "catalog_id"),
    Entity::Kpi => ("kpis", "kpi_id"),
    Entity::Record => ("records", "record_id"),
    Entity::Style => ("styles", "style_id"),
  };
  if exists(conn, table, key, id)? {
    Ok(())
  } else {
    Err(CoreError::NotFound(entity, id).into())
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn get_user(conn: &Connection, id: Uuid) -> Result<User> {
  one(
    conn,
    &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
    params![encode_uuid(id)],
    RawUser::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::User, id))?
  .into_user()
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
  let raws = all(
    conn,
    &format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"),
    [],
    RawUser::from_row,
  )?;
  decode_all(raws, RawUser::into_user)
}

/// Report the first uniqueness rule `user` would break, ignoring its own row.
fn user_conflict(conn: &Connection, user: &User) -> Result<Option<CoreError>> {
  let id = encode_uuid(user.user_id);
  if let Some(email) = &user.profile.email {
    let taken = conn
      .query_row(
        "SELECT 1 FROM users WHERE email = ?1 AND user_id != ?2",
        params![email, id],
        |_| Ok(()),
      )
      .optional()?
      .is_some();
    if taken {
      return Ok(Some(CoreError::DuplicateEmail(email.clone())));
    }
  }
  if let Some(ext) = &user.external_id {
    let taken = conn
      .query_row(
        "SELECT 1 FROM users WHERE external_id = ?1 AND user_id != ?2",
        params![ext, id],
        |_| Ok(()),
      )
      .optional()?
      .is_some();
    if taken {
      return Ok(Some(CoreError::DuplicateExternalId(ext.clone())));
    }
  }
  Ok(None)
}

/// Translate a UNIQUE violation on `users` into the matching domain error.
fn user_write_error(e: rusqlite::Error, user: &User) -> crate::Error {
  if is_unique_violation(&e, Some("users.email")) {
    CoreError::DuplicateEmail(user.profile.email.clone().unwrap_or_default()).into()
  } else if is_unique_violation(&e, Some("users.external_id")) {
    CoreError::DuplicateExternalId(user.external_id.clone().unwrap_or_default())
      .into()
  } else {
    e.into()
  }
}

fn insert_user(conn: &Connection, user: &User) -> Result<()> {
  let p = &user.profile;
  conn
    .execute(
      &format!(
        "INSERT INTO users ({USER_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
      ),
      params![
        encode_uuid(user.user_id),
        user.external_id,
        p.name,
        p.email,
        p.description,
        p.given_name,
        p.surname,
        p.job_title,
        p.business_phone,
        p.mobile_phone,
        p.office_location,
        encode_dt(user.created_at),
      ],
    )
    .map_err(|e| user_write_error(e, user))?;
  Ok(())
}

pub fn create_user(conn: &mut Connection, user: User) -> Result<User> {
  let tx = conn.transaction()?;
  if let Some(conflict) = user_conflict(&tx, &user)? {
    return Err(conflict.into());
  }
  insert_user(&tx, &user)?;
  tx.commit()?;
  Ok(user)
}

pub fn update_user(conn: &mut Connection, id: Uuid, patch: UserPatch) -> Result<User> {
  let tx = conn.transaction()?;
  let mut user = get_user(&tx, id)?;
  patch.apply(&mut user);
  if let Some(conflict) = user_conflict(&tx, &user)? {
    return Err(conflict.into());
  }

  let p = &user.profile;
  tx.execute(
    "UPDATE users SET
       name = ?2, email = ?3, description = ?4, given_name = ?5, surname = ?6,
       job_title = ?7, business_phone = ?8, mobile_phone = ?9,
       office_location = ?10
     WHERE user_id = ?1",
    params![
      encode_uuid(id),
      p.name,
      p.email,
      p.description,
      p.given_name,
      p.surname,
      p.job_title,
      p.business_phone,
      p.mobile_phone,
      p.office_location,
    ],
  )
  .map_err(|e| user_write_error(e, &user))?;

  tx.commit()?;
  Ok(user)
}

pub fn delete_user(conn: &mut Connection, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  require(&tx, Entity::User, id)?;
  if exists(&tx, "dashboards", "user_id", id)? {
    return Err(CoreError::UserOwnsDashboard(id).into());
  }

  let id_str = encode_uuid(id);
  let links = tx.execute("DELETE FROM board_users WHERE user_id = ?1", params![id_str])?;
  tx.execute("DELETE FROM users WHERE user_id = ?1", params![id_str])?;
  tx.commit()?;

  debug!(user_id = %id, links, "deleted user");
  Ok(())
}

/// `fresh` is the user to insert when no row carries the identity's
/// external id yet.
pub fn find_or_create_user(
  conn: &mut Connection,
  identity: ExternalIdentity,
  fresh: User,
) -> Result<User> {
  let tx = conn.transaction()?;
  let existing = one(
    &tx,
    &format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1"),
    params![identity.external_id],
    RawUser::from_row,
  )?;
  if let Some(raw) = existing {
    return raw.into_user();
  }

  let user = User {
    external_id: Some(identity.external_id),
    profile: identity.profile,
    ..fresh
  };
  if let Some(conflict) = user_conflict(&tx, &user)? {
    return Err(conflict.into());
  }
  insert_user(&tx, &user)?;
  tx.commit()?;

  debug!(user_id = %user.user_id, "created user from external identity");
  Ok(user)
}

// ─── Dashboards ──────────────────────────────────────────────────────────────

pub fn get_dashboard(conn: &Connection, id: Uuid) -> Result<Dashboard> {
  one(
    conn,
    &format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE dashboard_id = ?1"),
    params![encode_uuid(id)],
    RawDashboard::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::Dashboard, id))?
  .into_dashboard()
}

pub fn get_dashboard_for_user(conn: &Connection, user_id: Uuid) -> Result<Dashboard> {
  require(conn, Entity::User, user_id)?;
  one(
    conn,
    &format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE user_id = ?1"),
    params![encode_uuid(user_id)],
    RawDashboard::from_row,
  )?
  .ok_or(CoreError::DashboardNotFoundForUser(user_id))?
  .into_dashboard()
}

pub fn list_dashboards(conn: &Connection) -> Result<Vec<Dashboard>> {
  let raws = all(
    conn,
    &format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards ORDER BY created_at"),
    [],
    RawDashboard::from_row,
  )?;
  decode_all(raws, RawDashboard::into_dashboard)
}

fn insert_dashboard(conn: &Connection, dashboard: &Dashboard) -> Result<()> {
  conn.execute(
    &format!("INSERT INTO dashboards ({DASHBOARD_COLUMNS}) VALUES (?1, ?2, ?3)"),
    params![
      encode_uuid(dashboard.dashboard_id),
      encode_uuid(dashboard.user_id),
      encode_dt(dashboard.created_at),
    ],
  )
  .map_err(|e| -> crate::Error {
    if is_unique_violation(&e, Some("dashboards.user_id")) {
      CoreError::DashboardExists(dashboard.user_id).into()
    } else {
      e.into()
    }
  })?;
  Ok(())
}

pub fn create_dashboard(conn: &mut Connection, dashboard: Dashboard) -> Result<Dashboard> {
  let tx = conn.transaction()?;
  require(&tx, Entity::User, dashboard.user_id)?;
  if exists(&tx, "dashboards", "user_id", dashboard.user_id)? {
    return Err(CoreError::DashboardExists(dashboard.user_id).into());
  }
  insert_dashboard(&tx, &dashboard)?;
  tx.commit()?;
  Ok(dashboard)
}

pub fn list_dashboard_boards(conn: &Connection, id: Uuid) -> Result<Vec<Board>> {
  require(conn, Entity::Dashboard, id)?;
  let raws = all(
    conn,
    &format!(
      "SELECT {BOARD_COLUMNS} FROM boards
       WHERE board_id IN (SELECT board_id FROM dashboard_boards WHERE dashboard_id = ?1)
       ORDER BY created_at"
    ),
    params![encode_uuid(id)],
    RawBoard::from_row,
  )?;
  decode_all(raws, RawBoard::into_board)
}

pub fn delete_dashboard(conn: &mut Connection, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Dashboard, id)?;
  if exists(&tx, "dashboard_boards", "dashboard_id", id)? {
    return Err(CoreError::DashboardHasBoards(id).into());
  }
  tx.execute(
    "DELETE FROM dashboards WHERE dashboard_id = ?1",
    params![encode_uuid(id)],
  )?;
  tx.commit()?;
  Ok(())
}

// ─── Boards ──────────────────────────────────────────────────────────────────

pub fn get_board(conn: &Connection, id: Uuid) -> Result<Board> {
  one(
    conn,
    &format!("SELECT {BOARD_COLUMNS} FROM boards WHERE board_id = ?1"),
    params![encode_uuid(id)],
    RawBoard::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::Board, id))?
  .into_board()
}

pub fn list_boards(conn: &Connection) -> Result<Vec<Board>> {
  let raws = all(
    conn,
    &format!("SELECT {BOARD_COLUMNS} FROM boards ORDER BY created_at"),
    [],
    RawBoard::from_row,
  )?;
  decode_all(raws, RawBoard::into_board)
}

fn dashboard_id_of(conn: &Connection, user_id: Uuid) -> Result<Option<String>> {
  one(
    conn,
    "SELECT dashboard_id FROM dashboards WHERE user_id = ?1",
    params![encode_uuid(user_id)],
    |r| r.get(0),
  )
}

fn insert_link(conn: &Connection, board_id: &str, dashboard_id: &str, user_id: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO dashboard_boards (dashboard_id, board_id, user_id) VALUES (?1, ?2, ?3)",
    params![dashboard_id, board_id, user_id],
  )?;
  conn.execute(
    "INSERT OR IGNORE INTO board_users (board_id, user_id) VALUES (?1, ?2)",
    params![board_id, user_id],
  )?;
  Ok(())
}

/// Insert `board` and link it to every member. Either every row lands or
/// none does.
/// A board icon must name an existing icon style by abbreviation.
fn check_icon(conn: &Connection, icon: Option<&str>) -> Result<()> {
  let Some(abbrev) = icon else { return Ok(()) };
  let found = one(
    conn,
    "SELECT 1 FROM styles WHERE kind = ?1 AND abbrev = ?2",
    params![StyleKind::Icon.as_str(), abbrev],
    |_| Ok(()),
  )?;
  match found {
    Some(()) => Ok(()),
    None => Err(
      CoreError::UnknownAbbrev {
        kind:   StyleKind::Icon.as_str(),
        abbrev: abbrev.to_owned(),
      }
      .into(),
    ),
  }
}

pub fn create_board(conn: &mut Connection, board: Board, members: Vec<Uuid>) -> Result<Board> {
  if members.is_empty() {
    return Err(CoreError::EmptyMembers.into());
  }

  let tx = conn.transaction()?;

  let mut missing = Vec::new();
  for &user_id in &members {
    if !exists(&tx, "users", "user_id", user_id)? {
      missing.push(user_id);
    }
  }
  if !missing.is_empty() {
    return Err(CoreError::UsersNotFound(missing).into());
  }

  let mut dashboards = Vec::with_capacity(members.len());
  let mut without = Vec::new();
  for &user_id in &members {
    match dashboard_id_of(&tx, user_id)? {
      Some(d) => dashboards.push((encode_uuid(user_id), d)),
      None => without.push(user_id),
    }
  }
  if !without.is_empty() {
    return Err(CoreError::UsersWithoutDashboard(without).into());
  }
  check_icon(&tx, board.icon.as_deref())?;

  let board_id = encode_uuid(board.board_id);
  tx.execute(
    &format!("INSERT INTO boards ({BOARD_COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
    params![board_id, board.name, board.icon, encode_dt(board.created_at)],
  )?;
  for (user_id, dashboard_id) in &dashboards {
    insert_link(&tx, &board_id, dashboard_id, user_id)?;
  }

  tx.commit()?;
  debug!(board_id = %board.board_id, members = dashboards.len(), "created board");
  Ok(board)
}

pub fn update_board(conn: &mut Connection, id: Uuid, patch: BoardPatch) -> Result<Board> {
  let tx = conn.transaction()?;
  let mut board = get_board(&tx, id)?;
  if let Some(icon) = &patch.icon {
    check_icon(&tx, Some(icon))?;
  }
  patch.apply(&mut board);
  tx.execute(
    "UPDATE boards SET name = ?2, icon = ?3 WHERE board_id = ?1",
    params![encode_uuid(id), board.name, board.icon],
  )?;
  tx.commit()?;
  Ok(board)
}

/// Delete every catalog whose id is selected by `catalogs_sql` (a subquery
/// over `?1`), along with their KPIs and records.
fn delete_catalog_subtree(conn: &Connection, catalogs_sql: &str, key: &str) -> Result<(usize, usize, usize)> {
  let records = conn.execute(
    &format!(
      "DELETE FROM records WHERE kpi_id IN
         (SELECT kpi_id FROM kpis WHERE catalog_id IN ({catalogs_sql}))"
    ),
    params![key],
  )?;
  let kpis = conn.execute(
    &format!("DELETE FROM kpis WHERE catalog_id IN ({catalogs_sql})"),
    params![key],
  )?;
  let catalogs = conn.execute(
    &format!("DELETE FROM catalogs WHERE catalog_id IN ({catalogs_sql})"),
    params![key],
  )?;
  Ok((catalogs, kpis, records))
}

pub fn delete_board(conn: &mut Connection, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Board, id)?;

  let id_str = encode_uuid(id);
  let placed = tx.execute("DELETE FROM dashboard_boards WHERE board_id = ?1", params![id_str])?;
  let members = tx.execute("DELETE FROM board_users WHERE board_id = ?1", params![id_str])?;
  let (catalogs, kpis, records) = delete_catalog_subtree(
    &tx,
    "SELECT catalog_id FROM catalogs WHERE board_id = ?1",
    &id_str,
  )?;
  tx.execute("DELETE FROM boards WHERE board_id = ?1", params![id_str])?;
  tx.commit()?;

  debug!(board_id = %id, placed, members, catalogs, kpis, records, "deleted board");
  Ok(())
}

pub fn list_board_users(conn: &Connection, id: Uuid) -> Result<Vec<User>> {
  require(conn, Entity::Board, id)?;
  let raws = all(
    conn,
    &format!(
      "SELECT {USER_COLUMNS} FROM users
       WHERE user_id IN (SELECT user_id FROM board_users WHERE board_id = ?1)
       ORDER BY created_at"
    ),
    params![encode_uuid(id)],
    RawUser::from_row,
  )?;
  decode_all(raws, RawUser::into_user)
}

// ─── Association rows ────────────────────────────────────────────────────────

/// Pure association lookup; a board that no longer exists has no links.
pub fn list_board_links(conn: &Connection, board_id: Uuid) -> Result<Vec<DashboardBoard>> {
  let raws = all(
    conn,
    "SELECT dashboard_id, board_id, user_id FROM dashboard_boards
     WHERE board_id = ?1 ORDER BY user_id",
    params![encode_uuid(board_id)],
    RawLink::from_row,
  )?;
  decode_all(raws, RawLink::into_link)
}

pub fn link_board_user(conn: &mut Connection, board_id: Uuid, user_id: Uuid) -> Result<DashboardBoard> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Board, board_id)?;
  require(&tx, Entity::User, user_id)?;
  let dashboard_id = dashboard_id_of(&tx, user_id)?
    .ok_or(CoreError::DashboardNotFoundForUser(user_id))?;

  let board_str = encode_uuid(board_id);
  let user_str = encode_uuid(user_id);
  let linked = tx
    .query_row(
      "SELECT 1 FROM dashboard_boards WHERE dashboard_id = ?1 AND board_id = ?2",
      params![dashboard_id, board_str],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if !linked {
    insert_link(&tx, &board_str, &dashboard_id, &user_str)?;
    tx.commit()?;
  }

  Ok(DashboardBoard {
    dashboard_id: decode_uuid(&dashboard_id)?,
    board_id,
    user_id,
  })
}

pub fn unlink_board_user(conn: &mut Connection, board_id: Uuid, user_id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  let board_str = encode_uuid(board_id);
  let user_str = encode_uuid(user_id);
  tx.execute(
    "DELETE FROM dashboard_boards WHERE board_id = ?1 AND user_id = ?2",
    params![board_str, user_str],
  )?;
  tx.execute(
    "DELETE FROM board_users WHERE board_id = ?1 AND user_id = ?2",
    params![board_str, user_str],
  )?;
  tx.commit()?;
  Ok(())
}

// ─── Catalogs ────────────────────────────────────────────────────────────────

pub fn get_catalog(conn: &Connection, id: Uuid) -> Result<Catalog> {
  one(
    conn,
    &format!("SELECT {CATALOG_COLUMNS} FROM catalogs WHERE catalog_id = ?1"),
    params![encode_uuid(id)],
    RawCatalog::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::Catalog, id))?
  .into_catalog()
}

pub fn list_catalogs(conn: &Connection, board_id: Uuid) -> Result<Vec<Catalog>> {
  require(conn, Entity::Board, board_id)?;
  let raws = all(
    conn,
    &format!(
      "SELECT {CATALOG_COLUMNS} FROM catalogs WHERE board_id = ?1
       ORDER BY created_at, name"
    ),
    params![encode_uuid(board_id)],
    RawCatalog::from_row,
  )?;
  decode_all(raws, RawCatalog::into_catalog)
}

pub fn create_catalog(conn: &mut Connection, catalog: Catalog) -> Result<Catalog> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Board, catalog.board_id)?;
  tx.execute(
    &format!("INSERT INTO catalogs ({CATALOG_COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
    params![
      encode_uuid(catalog.catalog_id),
      encode_uuid(catalog.board_id),
      catalog.name,
      encode_dt(catalog.created_at),
    ],
  )?;
  tx.commit()?;
  Ok(catalog)
}

pub fn update_catalog(conn: &mut Connection, id: Uuid, patch: CatalogPatch) -> Result<Catalog> {
  let tx = conn.transaction()?;
  let mut catalog = get_catalog(&tx, id)?;
  patch.apply(&mut catalog);
  tx.execute(
    "UPDATE catalogs SET name = ?2 WHERE catalog_id = ?1",
    params![encode_uuid(id), catalog.name],
  )?;
  tx.commit()?;
  Ok(catalog)
}

pub fn delete_catalog(conn: &mut Connection, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Catalog, id)?;
  let (_, kpis, records) = delete_catalog_subtree(&tx, "?1", &encode_uuid(id))?;
  tx.commit()?;

  debug!(catalog_id = %id, kpis, records, "deleted catalog");
  Ok(())
}

// ─── KPIs ────────────────────────────────────────────────────────────────────

pub fn get_kpi(conn: &Connection, id: Uuid) -> Result<Kpi> {
  one(
    conn,
    &format!("SELECT {KPI_COLUMNS} FROM kpis WHERE kpi_id = ?1"),
    params![encode_uuid(id)],
    RawKpi::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::Kpi, id))?
  .into_kpi()
}

pub fn list_kpis(conn: &Connection, catalog_id: Uuid) -> Result<Vec<Kpi>> {
  require(conn, Entity::Catalog, catalog_id)?;
  let raws = all(
    conn,
    &format!(
      "SELECT {KPI_COLUMNS} FROM kpis WHERE catalog_id = ?1
       ORDER BY position_index IS NULL, position_index, created_at"
    ),
    params![encode_uuid(catalog_id)],
    RawKpi::from_row,
  )?;
  decode_all(raws, RawKpi::into_kpi)
}

/// A KPI's color and chart references must name styles of that kind.
fn check_style_ref(conn: &Connection, id: Option<Uuid>, expected: StyleKind) -> Result<()> {
  let Some(id) = id else { return Ok(()) };
  let kind: Option<String> = one(
    conn,
    "SELECT kind FROM styles WHERE style_id = ?1",
    params![encode_uuid(id)],
    |r| r.get(0),
  )?;
  match kind {
    None => Err(CoreError::NotFound(Entity::Style, id).into()),
    Some(k) if k == expected.as_str() => Ok(()),
    Some(_) => Err(
      CoreError::StyleKindMismatch { id, expected: expected.as_str() }.into(),
    ),
  }
}

fn insert_kpi(conn: &Connection, kpi: &Kpi) -> Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO kpis ({KPI_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
    ),
    params![
      encode_uuid(kpi.kpi_id),
      encode_uuid(kpi.catalog_id),
      kpi.name,
      kpi.description,
      kpi.formula,
      kpi.color_id.map(encode_uuid),
      kpi.chart_id.map(encode_uuid),
      kpi.position_index,
      encode_dt(kpi.created_at),
    ],
  )?;
  Ok(())
}

pub fn create_kpi(conn: &mut Connection, kpi: Kpi) -> Result<Kpi> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Catalog, kpi.catalog_id)?;
  check_style_ref(&tx, kpi.color_id, StyleKind::Color)?;
  check_style_ref(&tx, kpi.chart_id, StyleKind::Chart)?;
  insert_kpi(&tx, &kpi)?;
  tx.commit()?;
  Ok(kpi)
}

pub fn update_kpi(conn: &mut Connection, id: Uuid, patch: KpiPatch) -> Result<Kpi> {
  let tx = conn.transaction()?;
  let mut kpi = get_kpi(&tx, id)?;
  patch.apply(&mut kpi);
  check_style_ref(&tx, kpi.color_id, StyleKind::Color)?;
  check_style_ref(&tx, kpi.chart_id, StyleKind::Chart)?;
  tx.execute(
    "UPDATE kpis SET
       name = ?2, description = ?3, formula = ?4, color_id = ?5, chart_id = ?6
     WHERE kpi_id = ?1",
    params![
      encode_uuid(id),
      kpi.name,
      kpi.description,
      kpi.formula,
      kpi.color_id.map(encode_uuid),
      kpi.chart_id.map(encode_uuid),
    ],
  )?;
  tx.commit()?;
  Ok(kpi)
}

pub fn move_kpi(conn: &mut Connection, id: Uuid, new_catalog_id: Uuid) -> Result<Kpi> {
  let tx = conn.transaction()?;
  let mut kpi = get_kpi(&tx, id)?;
  if kpi.catalog_id == new_catalog_id {
    return Ok(kpi);
  }
  require(&tx, Entity::Catalog, new_catalog_id)?;

  tx.execute(
    "UPDATE kpis SET catalog_id = ?2 WHERE kpi_id = ?1",
    params![encode_uuid(id), encode_uuid(new_catalog_id)],
  )?;
  tx.commit()?;

  debug!(kpi_id = %id, from = %kpi.catalog_id, to = %new_catalog_id, "moved kpi");
  kpi.catalog_id = new_catalog_id;
  Ok(kpi)
}

pub fn update_kpi_position(conn: &mut Connection, id: Uuid, position_index: i64) -> Result<Kpi> {
  let tx = conn.transaction()?;
  let mut kpi = get_kpi(&tx, id)?;
  tx.execute(
    "UPDATE kpis SET position_index = ?2 WHERE kpi_id = ?1",
    params![encode_uuid(id), position_index],
  )?;
  tx.commit()?;
  kpi.position_index = Some(position_index);
  Ok(kpi)
}

pub fn delete_kpi(conn: &mut Connection, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Kpi, id)?;
  let id_str = encode_uuid(id);
  let records = tx.execute("DELETE FROM records WHERE kpi_id = ?1", params![id_str])?;
  tx.execute("DELETE FROM kpis WHERE kpi_id = ?1", params![id_str])?;
  tx.commit()?;

  debug!(kpi_id = %id, records, "deleted kpi");
  Ok(())
}

// ─── Records ─────────────────────────────────────────────────────────────────

pub fn get_record(conn: &Connection, id: Uuid) -> Result<Record> {
  one(
    conn,
    &format!("SELECT {RECORD_COLUMNS} FROM records WHERE record_id = ?1"),
    params![encode_uuid(id)],
    RawRecord::from_row,
  )?
  .ok_or(CoreError::NotFound(Entity::Record, id))?
  .into_record()
}

pub fn list_records(conn: &Connection, kpi_id: Uuid, query: RecordQuery) -> Result<Vec<Record>> {
  require(conn, Entity::Kpi, kpi_id)?;
  // SQLite treats a negative LIMIT as unbounded.
  let limit = query.limit.map_or(-1, |l| l as i64);
  let raws = all(
    conn,
    &format!(
      "SELECT {RECORD_COLUMNS} FROM records
       WHERE kpi_id = ?1
         AND (?2 IS NULL OR created_at >= ?2)
         AND (?3 IS NULL OR created_at < ?3)
       ORDER BY created_at
       LIMIT ?4"
    ),
    params![
      encode_uuid(kpi_id),
      query.after.map(encode_dt),
      query.before.map(encode_dt),
      limit,
    ],
    RawRecord::from_row,
  )?;
  decode_all(raws, RawRecord::into_record)
}

pub fn create_record(conn: &mut Connection, record: Record) -> Result<Record> {
  let tx = conn.transaction()?;
  require(&tx, Entity::Kpi, record.kpi_id)?;
  tx.execute(
    &format!("INSERT INTO records ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
    params![
      encode_uuid(record.record_id),
      encode_uuid(record.kpi_id),
      record.value,
      encode_dt(record.created_at),
    ],
  )?;
  tx.commit()?;
  Ok(record)
}

pub fn delete_record(conn: &Connection, id: Uuid) -> Result<()> {
  let deleted = conn.execute(
    "DELETE FROM records WHERE record_id = ?1",
    params![encode_uuid(id)],
  )?;
  if deleted == 0 {
    return Err(CoreError::NotFound(Entity::Record, id).into());
  }
  Ok(())
}

// ─── Styles ──────────────────────────────────────────────────────────────────

pub fn list_styles(conn: &Connection, kind: StyleKind) -> Result<Vec<Style>> {
  let raws = all(
    conn,
    &format!("SELECT {STYLE_COLUMNS} FROM styles WHERE kind = ?1 ORDER BY abbrev"),
    params![kind.as_str()],
    RawStyle::from_row,
  )?;
  decode_all(raws, RawStyle::into_style)
}

pub fn create_style(conn: &mut Connection, style: Style) -> Result<Style> {
  let duplicate = || CoreError::DuplicateAbbrev {
    kind:   style.kind.as_str(),
    abbrev: style.abbrev.clone(),
  };

  let tx = conn.transaction()?;
  let taken = tx
    .query_row(
      "SELECT 1 FROM styles WHERE kind = ?1 AND abbrev = ?2",
      params![style.kind.as_str(), style.abbrev],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if taken {
    return Err(duplicate().into());
  }

  tx.execute(
    &format!("INSERT INTO styles ({STYLE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    params![
      encode_uuid(style.style_id),
      style.kind.as_str(),
      style.name,
      style.description,
      style.abbrev,
    ],
  )
  .map_err(|e| -> crate::Error {
    if is_unique_violation(&e, Some("styles.")) {
      duplicate().into()
    } else {
      e.into()
    }
  })?;

  tx.commit()?;
  Ok(style)
}

pub fn delete_style(conn: &mut Connection, kind: StyleKind, id: Uuid) -> Result<()> {
  let tx = conn.transaction()?;
  let abbrev: String = one(
    &tx,
    "SELECT abbrev FROM styles WHERE style_id = ?1 AND kind = ?2",
    params![encode_uuid(id), kind.as_str()],
    |r| r.get(0),
  )?
  .ok_or(CoreError::NotFound(Entity::Style, id))?;

  // Boards name their icon by abbreviation, which the schema cannot null.
  let cleared = if kind == StyleKind::Icon {
    tx.execute(
      "UPDATE boards SET icon = NULL WHERE icon = ?1",
      params![abbrev],
    )?
  } else {
    0
  };
  tx.execute("DELETE FROM styles WHERE style_id = ?1", params![encode_uuid(id)])?;
  tx.commit()?;

  debug!(style_id = %id, kind = kind.as_str(), cleared, "deleted style");
  Ok(())
}
