//! Bearer-token extractor resolving the caller to a stored [`User`].

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use kpiboard_core::{identity::IdentityProvider, store::BoardStore, user::User};

use crate::{AppState, error::Error};

/// The authenticated caller, created on first sight of their identity.
pub struct CurrentUser(pub User);

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::MissingToken)?;

  let (scheme, token) = value.split_once(' ').ok_or(Error::MissingToken)?;
  let token = token.trim();
  if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
    return Err(Error::MissingToken);
  }
  Ok(token)
}

impl<S, P> FromRequestParts<AppState<S, P>> for CurrentUser
where
  S: BoardStore + 'static,
  P: IdentityProvider + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, P>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let identity = state.identity.resolve(token).await?;
    let user = state
      .store
      .find_or_create_user(identity)
      .await
      .map_err(Error::from_store)?;
    Ok(CurrentUser(user))
  }
}
