//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use kpiboard_api::error::status_for;
use kpiboard_core::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing or malformed bearer token")]
  MissingToken,

  /// The identity provider rejected the token or was unreachable.
  #[error(transparent)]
  Identity(#[from] kpiboard_core::Error),

  #[error("store error: {message}")]
  Store { kind: ErrorKind, message: String },
}

impl Error {
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify,
  {
    Self::Store { kind: e.kind(), message: e.to_string() }
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingToken => ErrorKind::UpstreamAuthFailure,
      Self::Identity(e) => e.kind(),
      Self::Store { kind, .. } => *kind,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = status_for(self.kind());
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, "request rejected");
    }
    let mut res =
      (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"kpiboard\""),
      );
    }
    res
  }
}
