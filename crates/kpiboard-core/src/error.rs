//! Error types for `kpiboard-core`.
//!
//! Every error type in the workspace reports an [`ErrorKind`] through the
//! [`Classify`] trait so that transport layers can map failures without
//! knowing which backend produced them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The caller-facing category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  /// A referenced entity is absent.
  NotFound,
  /// A uniqueness or restrict-on-delete rule was violated.
  Conflict,
  /// The request was malformed (bad identifier, empty member list, ...).
  InvalidInput,
  /// The identity provider rejected the token or could not be reached.
  UpstreamAuthFailure,
  /// Anything else: storage failures, corrupt rows.
  Internal,
}

/// Implemented by every error type that can cross a crate boundary.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

/// The entity tables of the store, used to label not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  User,
  Dashboard,
  Board,
  Catalog,
  Kpi,
  Record,
  Style,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::User => "user",
      Self::Dashboard => "dashboard",
      Self::Board => "board",
      Self::Catalog => "catalog",
      Self::Kpi => "kpi",
      Self::Record => "record",
      Self::Style => "style",
    })
  }
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} not found: {1}")]
  NotFound(Entity, Uuid),

  #[error("no dashboard for user {0}")]
  DashboardNotFoundForUser(Uuid),

  #[error("users not found: {}", join_ids(.0))]
  UsersNotFound(Vec<Uuid>),

  #[error("users without a dashboard: {}", join_ids(.0))]
  UsersWithoutDashboard(Vec<Uuid>),

  #[error("user {0} already has a dashboard")]
  DashboardExists(Uuid),

  #[error("dashboard {0} still has associated boards")]
  DashboardHasBoards(Uuid),

  #[error("user {0} still owns a dashboard")]
  UserOwnsDashboard(Uuid),

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("external identity already registered: {0}")]
  DuplicateExternalId(String),

  #[error("a {kind} with abbreviation {abbrev:?} already exists")]
  DuplicateAbbrev { kind: &'static str, abbrev: String },

  #[error("style {id} is not a {expected}")]
  StyleKindMismatch { id: Uuid, expected: &'static str },

  #[error("no {kind} with abbreviation {abbrev:?}")]
  UnknownAbbrev { kind: &'static str, abbrev: String },

  #[error("a board needs at least one member")]
  EmptyMembers,

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("authentication failed: {0}")]
  UpstreamAuth(String),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(..)
      | Self::DashboardNotFoundForUser(_)
      | Self::UsersNotFound(_)
      | Self::UsersWithoutDashboard(_)
      | Self::StyleKindMismatch { .. }
      | Self::UnknownAbbrev { .. } => ErrorKind::NotFound,
      Self::DashboardExists(_)
      | Self::DashboardHasBoards(_)
      | Self::UserOwnsDashboard(_)
      | Self::DuplicateEmail(_)
      | Self::DuplicateExternalId(_)
      | Self::DuplicateAbbrev { .. } => ErrorKind::Conflict,
      Self::EmptyMembers | Self::InvalidInput(_) => ErrorKind::InvalidInput,
      Self::UpstreamAuth(_) => ErrorKind::UpstreamAuthFailure,
    }
  }
}

fn join_ids(ids: &[Uuid]) -> String {
  ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
