//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use kpiboard_core::{
  Classify, ErrorKind,
  board::{BoardPatch, NewBoard},
  identity::ExternalIdentity,
  kpi::{CatalogPatch, KpiPatch, NewCatalog, NewKpi, NewRecord, RecordQuery},
  store::BoardStore,
  style::{NewStyle, StyleKind},
  user::{NewUser, User, UserPatch, UserProfile},
};
use uuid::Uuid;

use crate::{Result, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn kind<T: std::fmt::Debug>(result: Result<T>) -> ErrorKind {
  result.expect_err("expected an error").kind()
}

/// A user that already owns a dashboard.
async fn member(s: &SqliteStore, name: &str) -> User {
  let user = s.create_user(NewUser::new(name)).await.unwrap();
  s.create_dashboard(user.user_id).await.unwrap();
  user
}

fn style(kind: StyleKind, abbrev: &str) -> NewStyle {
  NewStyle {
    kind,
    name: abbrev.to_uppercase(),
    description: None,
    abbrev: abbrev.to_owned(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let user = s
    .create_user(NewUser::new("alice").with_email("alice@example.com"))
    .await
    .unwrap();

  let fetched = s.get_user(user.user_id).await.unwrap();
  assert_eq!(fetched, user);
  assert_eq!(fetched.profile.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
  let s = store().await;
  assert_eq!(kind(s.get_user(Uuid::new_v4()).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn duplicate_email_conflicts_case_insensitively() {
  let s = store().await;
  s.create_user(NewUser::new("alice").with_email("alice@example.com"))
    .await
    .unwrap();

  let err = s
    .create_user(NewUser::new("other").with_email("Alice@Example.com"))
    .await;
  assert_eq!(kind(err), ErrorKind::Conflict);
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_user_merges_patch() {
  let s = store().await;
  let user = s
    .create_user(NewUser::new("alice").with_email("alice@example.com"))
    .await
    .unwrap();

  let patch = UserPatch {
    job_title: Some("Analyst".into()),
    ..Default::default()
  };
  let updated = s.update_user(user.user_id, patch).await.unwrap();
  assert_eq!(updated.profile.job_title.as_deref(), Some("Analyst"));
  assert_eq!(updated.profile.email.as_deref(), Some("alice@example.com"));
  assert_eq!(s.get_user(user.user_id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_user_to_taken_email_conflicts() {
  let s = store().await;
  s.create_user(NewUser::new("alice").with_email("alice@example.com"))
    .await
    .unwrap();
  let bob = s
    .create_user(NewUser::new("bob").with_email("bob@example.com"))
    .await
    .unwrap();

  let patch = UserPatch {
    email: Some("alice@example.com".into()),
    ..Default::default()
  };
  assert_eq!(
    kind(s.update_user(bob.user_id, patch).await),
    ErrorKind::Conflict
  );
  let bob_now = s.get_user(bob.user_id).await.unwrap();
  assert_eq!(bob_now.profile.email.as_deref(), Some("bob@example.com"));
}

#[tokio::test]
async fn delete_user_restricted_by_dashboard() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  assert_eq!(kind(s.delete_user(alice.user_id).await), ErrorKind::Conflict);

  let dashboard = s.get_dashboard_for_user(alice.user_id).await.unwrap();
  s.delete_dashboard(dashboard.dashboard_id).await.unwrap();
  s.delete_user(alice.user_id).await.unwrap();
  assert_eq!(kind(s.get_user(alice.user_id).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn find_or_create_user_is_stable_per_subject() {
  let s = store().await;
  let identity = ExternalIdentity {
    external_id: "graph-123".into(),
    profile:     UserProfile {
      name: "Alice Example".into(),
      email: Some("alice@example.com".into()),
      ..Default::default()
    },
  };

  let first = s.find_or_create_user(identity.clone()).await.unwrap();
  let second = s.find_or_create_user(identity).await.unwrap();
  assert_eq!(first.user_id, second.user_id);
  assert_eq!(first.external_id.as_deref(), Some("graph-123"));
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

// ─── Dashboards ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_dashboard_per_user() {
  let s = store().await;
  let alice = s.create_user(NewUser::new("alice")).await.unwrap();

  let dashboard = s.create_dashboard(alice.user_id).await.unwrap();
  assert_eq!(dashboard.user_id, alice.user_id);
  assert_eq!(
    kind(s.create_dashboard(alice.user_id).await),
    ErrorKind::Conflict
  );
  assert_eq!(s.list_dashboards().await.unwrap().len(), 1);
  assert_eq!(s.get_dashboard(dashboard.dashboard_id).await.unwrap(), dashboard);
}

#[tokio::test]
async fn dashboard_for_missing_user_is_not_found() {
  let s = store().await;
  assert_eq!(
    kind(s.create_dashboard(Uuid::new_v4()).await),
    ErrorKind::NotFound
  );
  assert_eq!(
    kind(s.get_dashboard_for_user(Uuid::new_v4()).await),
    ErrorKind::NotFound
  );

  let bob = s.create_user(NewUser::new("bob")).await.unwrap();
  assert_eq!(
    kind(s.get_dashboard_for_user(bob.user_id).await),
    ErrorKind::NotFound
  );
}

#[tokio::test]
async fn delete_dashboard_restricted_by_boards() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();
  let dashboard = s.get_dashboard_for_user(alice.user_id).await.unwrap();

  assert_eq!(
    kind(s.delete_dashboard(dashboard.dashboard_id).await),
    ErrorKind::Conflict
  );

  s.unlink_board_user(board.board_id, alice.user_id)
    .await
    .unwrap();
  s.delete_dashboard(dashboard.dashboard_id).await.unwrap();
}

// ─── Boards ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_board_links_every_member() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let bob = member(&s, "bob").await;

  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id, bob.user_id]))
    .await
    .unwrap();
  assert_eq!(board.name, "Sales");

  let links = s.list_board_links(board.board_id).await.unwrap();
  assert_eq!(links.len(), 2);
  for user in [&alice, &bob] {
    let dashboard = s.get_dashboard_for_user(user.user_id).await.unwrap();
    assert!(links.iter().any(|l| {
      l.user_id == user.user_id && l.dashboard_id == dashboard.dashboard_id
    }));
    let boards = s
      .list_dashboard_boards(dashboard.dashboard_id)
      .await
      .unwrap();
    assert_eq!(boards, vec![board.clone()]);
  }

  let users = s.list_board_users(board.board_id).await.unwrap();
  assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn create_board_collapses_duplicate_members() {
  let s = store().await;
  let alice = member(&s, "alice").await;

  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id, alice.user_id]))
    .await
    .unwrap();
  assert_eq!(s.list_board_links(board.board_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_board_without_members_is_invalid() {
  let s = store().await;
  assert_eq!(
    kind(s.create_board(NewBoard::new("Empty", vec![])).await),
    ErrorKind::InvalidInput
  );
  assert!(s.list_boards().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_board_reports_every_missing_user() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let ghost_a = Uuid::new_v4();
  let ghost_b = Uuid::new_v4();

  let err = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id, ghost_a, ghost_b]))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  let message = err.to_string();
  assert!(message.contains(&ghost_a.to_string()));
  assert!(message.contains(&ghost_b.to_string()));

  assert!(s.list_boards().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_board_is_atomic_when_a_member_lacks_a_dashboard() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let bob = s.create_user(NewUser::new("bob")).await.unwrap();

  let err = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id, bob.user_id]))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
  assert!(err.to_string().contains(&bob.user_id.to_string()));

  assert!(s.list_boards().await.unwrap().is_empty());
  let dashboard = s.get_dashboard_for_user(alice.user_id).await.unwrap();
  assert!(
    s.list_dashboard_boards(dashboard.dashboard_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn update_board_changes_name_and_icon() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  s.create_style(style(StyleKind::Icon, "chart-line")).await.unwrap();
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();

  let patch = BoardPatch {
    name: Some("Revenue".into()),
    icon: Some("chart-line".into()),
  };
  let updated = s.update_board(board.board_id, patch).await.unwrap();
  assert_eq!(updated.name, "Revenue");
  assert_eq!(updated.icon.as_deref(), Some("chart-line"));
  assert_eq!(s.get_board(board.board_id).await.unwrap(), updated);
}

#[tokio::test]
async fn board_icon_must_name_an_icon_style() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  // Same abbreviation, wrong kind.
  s.create_style(style(StyleKind::Color, "star")).await.unwrap();

  let mut input = NewBoard::new("Sales", vec![alice.user_id]);
  input.icon = Some("star".into());
  assert_eq!(kind(s.create_board(input.clone()).await), ErrorKind::NotFound);
  assert!(s.list_boards().await.unwrap().is_empty());

  s.create_style(style(StyleKind::Icon, "star")).await.unwrap();
  let board = s.create_board(input).await.unwrap();
  assert_eq!(board.icon.as_deref(), Some("star"));

  let patch = BoardPatch { name: None, icon: Some("moon".into()) };
  assert_eq!(
    kind(s.update_board(board.board_id, patch).await),
    ErrorKind::NotFound
  );
  assert_eq!(s.get_board(board.board_id).await.unwrap(), board);
}

#[tokio::test]
async fn deleting_an_icon_style_clears_board_icons() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let star = s.create_style(style(StyleKind::Icon, "star")).await.unwrap();
  let mut input = NewBoard::new("Sales", vec![alice.user_id]);
  input.icon = Some("star".into());
  let board = s.create_board(input).await.unwrap();

  s.delete_style(StyleKind::Icon, star.style_id).await.unwrap();
  assert_eq!(s.get_board(board.board_id).await.unwrap().icon, None);
}

#[tokio::test]
async fn link_and_unlink_board_user() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let bob = member(&s, "bob").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();

  let link = s.link_board_user(board.board_id, bob.user_id).await.unwrap();
  let again = s.link_board_user(board.board_id, bob.user_id).await.unwrap();
  assert_eq!(link, again);
  assert_eq!(s.list_board_links(board.board_id).await.unwrap().len(), 2);

  s.unlink_board_user(board.board_id, bob.user_id).await.unwrap();
  s.unlink_board_user(board.board_id, bob.user_id).await.unwrap();
  let links = s.list_board_links(board.board_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].user_id, alice.user_id);
}

#[tokio::test]
async fn link_user_without_dashboard_is_not_found() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let bob = s.create_user(NewUser::new("bob")).await.unwrap();
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();

  assert_eq!(
    kind(s.link_board_user(board.board_id, bob.user_id).await),
    ErrorKind::NotFound
  );
}

/// Count rows in `table` that belong to `board_id`, read through a second
/// connection so nothing goes through the store's own queries.
fn board_rows(path: &std::path::Path, table: &str, board_id: Uuid) -> i64 {
  let conn = rusqlite::Connection::open(path).unwrap();
  conn
    .query_row(
      &format!("SELECT COUNT(*) FROM {table} WHERE board_id = ?1"),
      [board_id.hyphenated().to_string()],
      |r| r.get(0),
    )
    .unwrap()
}

#[tokio::test]
async fn delete_board_cascades_to_everything_below() {
  let path = std::env::temp_dir().join(format!("kpiboard-{}.db", Uuid::new_v4()));
  let s = SqliteStore::open(&path).await.unwrap();
  let alice = member(&s, "alice").await;
  let bob = member(&s, "bob").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id, bob.user_id]))
    .await
    .unwrap();
  assert_eq!(board_rows(&path, "board_users", board.board_id), 2);
  assert_eq!(board_rows(&path, "dashboard_boards", board.board_id), 2);
  let catalog = s
    .create_catalog(NewCatalog { board_id: board.board_id, name: "Q1".into() })
    .await
    .unwrap();
  let kpi = s
    .create_kpi(NewKpi::new(catalog.catalog_id, "Revenue"))
    .await
    .unwrap();
  let record = s
    .create_record(NewRecord { kpi_id: kpi.kpi_id, value: 10.0, created_at: None })
    .await
    .unwrap();

  s.delete_board(board.board_id).await.unwrap();

  assert_eq!(kind(s.get_board(board.board_id).await), ErrorKind::NotFound);
  assert_eq!(kind(s.get_catalog(catalog.catalog_id).await), ErrorKind::NotFound);
  assert_eq!(kind(s.get_kpi(kpi.kpi_id).await), ErrorKind::NotFound);
  assert_eq!(kind(s.get_record(record.record_id).await), ErrorKind::NotFound);
  assert!(s.list_board_links(board.board_id).await.unwrap().is_empty());
  assert_eq!(board_rows(&path, "board_users", board.board_id), 0);
  assert_eq!(board_rows(&path, "dashboard_boards", board.board_id), 0);

  // The members' dashboards are unaffected and can now be deleted.
  for user in [&alice, &bob] {
    let dashboard = s.get_dashboard_for_user(user.user_id).await.unwrap();
    s.delete_dashboard(dashboard.dashboard_id).await.unwrap();
  }

  drop(s);
  let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn delete_board_without_links() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();

  s.unlink_board_user(board.board_id, alice.user_id).await.unwrap();
  assert!(s.list_board_links(board.board_id).await.unwrap().is_empty());
  assert!(s.list_board_users(board.board_id).await.unwrap().is_empty());

  s.delete_board(board.board_id).await.unwrap();
  assert_eq!(kind(s.get_board(board.board_id).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_missing_board_is_not_found() {
  let s = store().await;
  assert_eq!(kind(s.delete_board(Uuid::new_v4()).await), ErrorKind::NotFound);
}

// ─── Catalogs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_under_missing_board_is_not_found() {
  let s = store().await;
  let input = NewCatalog { board_id: Uuid::new_v4(), name: "Q1".into() };
  assert_eq!(kind(s.create_catalog(input).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn catalogs_list_and_rename() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();

  let q1 = s
    .create_catalog(NewCatalog { board_id: board.board_id, name: "Q1".into() })
    .await
    .unwrap();
  s.create_catalog(NewCatalog { board_id: board.board_id, name: "Q2".into() })
    .await
    .unwrap();
  assert_eq!(s.list_catalogs(board.board_id).await.unwrap().len(), 2);

  let renamed = s
    .update_catalog(q1.catalog_id, CatalogPatch { name: Some("First".into()) })
    .await
    .unwrap();
  assert_eq!(renamed.name, "First");
  assert_eq!(renamed.board_id, board.board_id);
}

#[tokio::test]
async fn delete_catalog_cascades_to_kpis_and_records() {
  let s = store().await;
  let alice = member(&s, "alice").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();
  let catalog = s
    .create_catalog(NewCatalog { board_id: board.board_id, name: "Q1".into() })
    .await
    .unwrap();
  let kpi = s
    .create_kpi(NewKpi::new(catalog.catalog_id, "Revenue"))
    .await
    .unwrap();
  s.create_record(NewRecord { kpi_id: kpi.kpi_id, value: 1.5, created_at: None })
    .await
    .unwrap();

  s.delete_catalog(catalog.catalog_id).await.unwrap();
  assert_eq!(kind(s.get_kpi(kpi.kpi_id).await), ErrorKind::NotFound);
  assert!(s.list_catalogs(board.board_id).await.unwrap().is_empty());
  s.get_board(board.board_id).await.unwrap();
}

// ─── KPIs ────────────────────────────────────────────────────────────────────

async fn catalog_fixture(s: &SqliteStore) -> (Uuid, Uuid) {
  let alice = member(s, "alice").await;
  let board = s
    .create_board(NewBoard::new("Sales", vec![alice.user_id]))
    .await
    .unwrap();
  let q1 = s
    .create_catalog(NewCatalog { board_id: board.board_id, name: "Q1".into() })
    .await
    .unwrap();
  let q2 = s
    .create_catalog(NewCatalog { board_id: board.board_id, name: "Q2".into() })
    .await
    .unwrap();
  (q1.catalog_id, q2.catalog_id)
}

#[tokio::test]
async fn kpi_under_missing_catalog_is_not_found() {
  let s = store().await;
  assert_eq!(
    kind(s.create_kpi(NewKpi::new(Uuid::new_v4(), "Revenue")).await),
    ErrorKind::NotFound
  );
}

#[tokio::test]
async fn kpis_list_in_position_order() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;

  let unplaced = s.create_kpi(NewKpi::new(q1, "Unplaced")).await.unwrap();
  let second = s
    .create_kpi(NewKpi { position_index: Some(2), ..NewKpi::new(q1, "Second") })
    .await
    .unwrap();
  let first = s.create_kpi(NewKpi::new(q1, "First")).await.unwrap();
  let first = s.update_kpi_position(first.kpi_id, 1).await.unwrap();
  assert_eq!(first.position_index, Some(1));

  let ids: Vec<_> = s
    .list_kpis(q1)
    .await
    .unwrap()
    .into_iter()
    .map(|k| k.kpi_id)
    .collect();
  assert_eq!(ids, vec![first.kpi_id, second.kpi_id, unplaced.kpi_id]);
}

#[tokio::test]
async fn move_kpi_takes_records_along() {
  let s = store().await;
  let (q1, q2) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();
  let record = s
    .create_record(NewRecord { kpi_id: kpi.kpi_id, value: 3.0, created_at: None })
    .await
    .unwrap();

  let moved = s.move_kpi(kpi.kpi_id, q2).await.unwrap();
  assert_eq!(moved.catalog_id, q2);
  assert!(s.list_kpis(q1).await.unwrap().is_empty());
  assert_eq!(s.list_kpis(q2).await.unwrap().len(), 1);

  let records = s
    .list_records(kpi.kpi_id, RecordQuery::default())
    .await
    .unwrap();
  assert_eq!(records, vec![record]);
}

#[tokio::test]
async fn move_kpi_to_same_catalog_is_a_no_op() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();

  let moved = s.move_kpi(kpi.kpi_id, q1).await.unwrap();
  assert_eq!(moved, kpi);
}

#[tokio::test]
async fn move_kpi_to_missing_catalog_leaves_it_in_place() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();

  assert_eq!(
    kind(s.move_kpi(kpi.kpi_id, Uuid::new_v4()).await),
    ErrorKind::NotFound
  );
  assert_eq!(s.get_kpi(kpi.kpi_id).await.unwrap().catalog_id, q1);
}

#[tokio::test]
async fn kpi_style_references_are_checked() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let red = s.create_style(style(StyleKind::Color, "red")).await.unwrap();
  let bar = s.create_style(style(StyleKind::Chart, "bar")).await.unwrap();

  let kpi = s
    .create_kpi(NewKpi {
      color_id: Some(red.style_id),
      chart_id: Some(bar.style_id),
      ..NewKpi::new(q1, "Revenue")
    })
    .await
    .unwrap();
  assert_eq!(kpi.color_id, Some(red.style_id));

  let wrong_kind = KpiPatch { color_id: Some(bar.style_id), ..Default::default() };
  assert_eq!(
    kind(s.update_kpi(kpi.kpi_id, wrong_kind).await),
    ErrorKind::NotFound
  );
  let missing = NewKpi { chart_id: Some(Uuid::new_v4()), ..NewKpi::new(q1, "Cost") };
  assert_eq!(kind(s.create_kpi(missing).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_a_style_clears_kpi_references() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let red = s.create_style(style(StyleKind::Color, "red")).await.unwrap();
  let kpi = s
    .create_kpi(NewKpi { color_id: Some(red.style_id), ..NewKpi::new(q1, "Revenue") })
    .await
    .unwrap();

  s.delete_style(StyleKind::Color, red.style_id).await.unwrap();
  assert_eq!(s.get_kpi(kpi.kpi_id).await.unwrap().color_id, None);
}

#[tokio::test]
async fn update_kpi_keeps_catalog_and_position() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s
    .create_kpi(NewKpi { position_index: Some(4), ..NewKpi::new(q1, "Revenue") })
    .await
    .unwrap();

  let patch = KpiPatch {
    formula: Some("sum(sales)".into()),
    ..Default::default()
  };
  let updated = s.update_kpi(kpi.kpi_id, patch).await.unwrap();
  assert_eq!(updated.formula.as_deref(), Some("sum(sales)"));
  assert_eq!(updated.catalog_id, q1);
  assert_eq!(updated.position_index, Some(4));
  assert_eq!(s.get_kpi(kpi.kpi_id).await.unwrap(), updated);
}

#[tokio::test]
async fn delete_kpi_cascades_to_records() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();
  let record = s
    .create_record(NewRecord { kpi_id: kpi.kpi_id, value: 7.0, created_at: None })
    .await
    .unwrap();

  s.delete_kpi(kpi.kpi_id).await.unwrap();
  assert_eq!(kind(s.get_record(record.record_id).await), ErrorKind::NotFound);
  assert_eq!(kind(s.delete_kpi(kpi.kpi_id).await), ErrorKind::NotFound);
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_under_missing_kpi_is_not_found() {
  let s = store().await;
  let input = NewRecord { kpi_id: Uuid::new_v4(), value: 1.0, created_at: None };
  assert_eq!(kind(s.create_record(input).await), ErrorKind::NotFound);
}

#[tokio::test]
async fn records_filter_by_window_and_limit() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();

  let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  for (i, value) in [10.0, 20.0, 30.0].into_iter().enumerate() {
    s.create_record(NewRecord {
      kpi_id: kpi.kpi_id,
      value,
      created_at: Some(t0 + Duration::hours(i as i64)),
    })
    .await
    .unwrap();
  }

  let all = s
    .list_records(kpi.kpi_id, RecordQuery::default())
    .await
    .unwrap();
  let values: Vec<f64> = all.iter().map(|r| r.value).collect();
  assert_eq!(values, vec![10.0, 20.0, 30.0]);
  assert_eq!(all[0].created_at, t0);

  let window = RecordQuery {
    after: Some(t0 + Duration::hours(1)),
    before: Some(t0 + Duration::hours(2)),
    limit: None,
  };
  let middle = s.list_records(kpi.kpi_id, window).await.unwrap();
  assert_eq!(middle.len(), 1);
  assert_eq!(middle[0].value, 20.0);

  let limited = RecordQuery { limit: Some(2), ..Default::default() };
  assert_eq!(s.list_records(kpi.kpi_id, limited).await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_record_once() {
  let s = store().await;
  let (q1, _) = catalog_fixture(&s).await;
  let kpi = s.create_kpi(NewKpi::new(q1, "Revenue")).await.unwrap();
  let record = s
    .create_record(NewRecord { kpi_id: kpi.kpi_id, value: 1.0, created_at: None })
    .await
    .unwrap();

  s.delete_record(record.record_id).await.unwrap();
  assert_eq!(
    kind(s.delete_record(record.record_id).await),
    ErrorKind::NotFound
  );
}

// ─── Styles ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn style_abbrev_is_unique_within_kind() {
  let s = store().await;
  s.create_style(style(StyleKind::Color, "red")).await.unwrap();

  assert_eq!(
    kind(s.create_style(style(StyleKind::Color, "red")).await),
    ErrorKind::Conflict
  );
  s.create_style(style(StyleKind::Icon, "red")).await.unwrap();

  assert_eq!(s.list_styles(StyleKind::Color).await.unwrap().len(), 1);
  assert_eq!(s.list_styles(StyleKind::Icon).await.unwrap().len(), 1);
  assert!(s.list_styles(StyleKind::Chart).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_style_checks_kind() {
  let s = store().await;
  let red = s.create_style(style(StyleKind::Color, "red")).await.unwrap();

  assert_eq!(
    kind(s.delete_style(StyleKind::Chart, red.style_id).await),
    ErrorKind::NotFound
  );
  s.delete_style(StyleKind::Color, red.style_id).await.unwrap();
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_data() {
  let path = std::env::temp_dir().join(format!("kpiboard-{}.db", Uuid::new_v4()));

  let alice = {
    let s = SqliteStore::open(&path).await.unwrap();
    member(&s, "alice").await
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get_user(alice.user_id).await.unwrap(), alice);
  s.get_dashboard_for_user(alice.user_id).await.unwrap();

  drop(s);
  let _ = std::fs::remove_file(&path);
}
