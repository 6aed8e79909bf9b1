//! HTTP server for kpiboard.
//!
//! Mounts the JSON API from [`kpiboard_api`] under `/api` and adds the
//! sign-in endpoint, which resolves a bearer token through an
//! [`IdentityProvider`] and returns the matching stored user.

pub mod auth;
pub mod error;
pub mod identity;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use kpiboard_core::{identity::IdentityProvider, store::BoardStore, user::User};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::CurrentUser;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `KPIBOARD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub identity:   IdentityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
  /// Endpoint returning the caller's profile for a bearer token.
  #[serde(default = "default_userinfo_url")]
  pub userinfo_url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for IdentityConfig {
  fn default() -> Self {
    Self {
      userinfo_url: default_userinfo_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/kpiboard/kpiboard.db") }

fn default_userinfo_url() -> String { "https://graph.microsoft.com/v1.0/me".to_owned() }

fn default_timeout_secs() -> u64 { 10 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers.
pub struct AppState<S, P> {
  pub store:    Arc<S>,
  pub identity: Arc<P>,
}

impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      identity: Arc::clone(&self.identity),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, P>(state: AppState<S, P>) -> Router
where
  S: BoardStore + 'static,
  P: IdentityProvider + 'static,
{
  Router::new()
    .route("/auth/me", get(me))
    .route("/healthz", get(healthz))
    .with_state(state.clone())
    .nest("/api", kpiboard_api::api_router(state.store))
    .layer(TraceLayer::new_for_http())
}

/// `GET /auth/me`: the caller's user record, created on first sign-in.
async fn me(CurrentUser(user): CurrentUser) -> Json<User> { Json(user) }

async fn healthz() -> &'static str { "ok" }
