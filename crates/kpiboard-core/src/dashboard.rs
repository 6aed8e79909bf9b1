//! Dashboard: a user's single container of boards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// At most one dashboard exists per user (enforced by a UNIQUE constraint on
/// `user_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
  pub dashboard_id: Uuid,
  pub user_id:      Uuid,
  pub created_at:   DateTime<Utc>,
}
