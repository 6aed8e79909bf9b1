//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kpiboard_core::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// A store or domain failure, already classified.
  #[error("{message}")]
  Store { kind: ErrorKind, message: String },
}

impl ApiError {
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify,
  {
    Self::Store { kind: e.kind(), message: e.to_string() }
  }
}

impl Classify for ApiError {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::BadRequest(_) => ErrorKind::InvalidInput,
      Self::Store { kind, .. } => *kind,
    }
  }
}

/// HTTP status for each error category.
pub fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
    ErrorKind::UpstreamAuthFailure => StatusCode::UNAUTHORIZED,
    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = status_for(self.kind());
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let message = match self {
      ApiError::BadRequest(m) => m,
      ApiError::Store { message, .. } => message,
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
