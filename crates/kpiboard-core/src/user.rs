//! User: the root of the ownership tree.
//!
//! Users authenticate against an external identity provider; the store only
//! keeps the provider's stable subject id and a copy of the profile it
//! returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptive profile fields. Only `name` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub name:            String,
  pub email:           Option<String>,
  pub description:     Option<String>,
  pub given_name:      Option<String>,
  pub surname:         Option<String>,
  pub job_title:       Option<String>,
  pub business_phone:  Option<String>,
  pub mobile_phone:    Option<String>,
  pub office_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     Uuid,
  /// Subject id issued by the identity provider, if the user signed in
  /// through one.
  pub external_id: Option<String>,
  #[serde(flatten)]
  pub profile:     UserProfile,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::BoardStore::create_user`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub external_id: Option<String>,
  #[serde(flatten)]
  pub profile:     UserProfile,
}

impl NewUser {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      external_id: None,
      profile:     UserProfile { name: name.into(), ..UserProfile::default() },
    }
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.profile.email = Some(email.into());
    self
  }
}

/// Partial update for a [`User`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name:            Option<String>,
  pub email:           Option<String>,
  pub description:     Option<String>,
  pub given_name:      Option<String>,
  pub surname:         Option<String>,
  pub job_title:       Option<String>,
  pub business_phone:  Option<String>,
  pub mobile_phone:    Option<String>,
  pub office_location: Option<String>,
}

impl UserPatch {
  pub fn apply(self, user: &mut User) {
    let p = &mut user.profile;
    if let Some(v) = self.name {
      p.name = v;
    }
    merge(&mut p.email, self.email);
    merge(&mut p.description, self.description);
    merge(&mut p.given_name, self.given_name);
    merge(&mut p.surname, self.surname);
    merge(&mut p.job_title, self.job_title);
    merge(&mut p.business_phone, self.business_phone);
    merge(&mut p.mobile_phone, self.mobile_phone);
    merge(&mut p.office_location, self.office_location);
  }
}

/// Overwrite an optional column only when the patch supplies a value.
pub(crate) fn merge<T>(slot: &mut Option<T>, value: Option<T>) {
  if value.is_some() {
    *slot = value;
  }
}
