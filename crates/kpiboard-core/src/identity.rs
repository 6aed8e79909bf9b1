//! The contract with the external identity provider.
//!
//! Authentication itself is delegated. The core only needs to turn an
//! opaque bearer token into a stable subject id plus profile, and then
//! find-or-create the matching [`User`](crate::user::User).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Result, user::UserProfile};

/// What an identity provider tells us about the bearer of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
  pub external_id: String,
  pub profile:     UserProfile,
}

/// Resolves bearer tokens against an external identity provider.
///
/// Implementations must fail with
/// [`Error::UpstreamAuth`](crate::Error::UpstreamAuth) when the token is
/// rejected or the provider cannot be reached in time.
pub trait IdentityProvider: Send + Sync {
  fn resolve<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<ExternalIdentity>> + Send + 'a;
}
