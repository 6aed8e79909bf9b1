//! Boards and the association rows that share them.
//!
//! A board has no owner column. Membership is recorded in two link tables:
//! [`DashboardBoard`] places the board on a member's dashboard and a
//! `board_users` row grants the member access. Both are written together and
//! removed together; only the former is exposed as a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::merge;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
  pub board_id:   Uuid,
  pub name:       String,
  /// Abbreviation of an icon style, if one was chosen. Cleared when that
  /// style is deleted.
  pub icon:       Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::BoardStore::create_board`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewBoard {
  pub name:     String,
  #[serde(default)]
  pub icon:     Option<String>,
  /// Initial members. Each must exist and own a dashboard.
  pub user_ids: Vec<Uuid>,
}

impl NewBoard {
  pub fn new(name: impl Into<String>, user_ids: Vec<Uuid>) -> Self {
    Self { name: name.into(), icon: None, user_ids }
  }

  /// Member ids in first-seen order with duplicates removed.
  pub fn distinct_user_ids(&self) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(self.user_ids.len());
    for id in &self.user_ids {
      if !out.contains(id) {
        out.push(*id);
      }
    }
    out
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardPatch {
  pub name: Option<String>,
  pub icon: Option<String>,
}

impl BoardPatch {
  pub fn apply(self, board: &mut Board) {
    if let Some(v) = self.name {
      board.name = v;
    }
    merge(&mut board.icon, self.icon);
  }
}

// ─── Association rows ────────────────────────────────────────────────────────

/// A board placed on a member's dashboard (`dashboard_boards` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardBoard {
  pub dashboard_id: Uuid,
  pub board_id:     Uuid,
  pub user_id:      Uuid,
}
