//! JSON REST API for kpiboard.
//!
//! Exposes an axum [`Router`] backed by any [`kpiboard_core::store::BoardStore`].
//! Authentication, TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kpiboard_api::api_router(store.clone()))
//! ```

pub mod boards;
pub mod catalogs;
pub mod dashboards;
pub mod error;
pub mod kpis;
pub mod styles;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use kpiboard_core::store::BoardStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BoardStore + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .patch(users::update::<S>)
        .delete(users::delete::<S>),
    )
    .route("/users/{id}/dashboard", get(users::dashboard::<S>))
    // Dashboards
    .route(
      "/dashboards",
      get(dashboards::list::<S>).post(dashboards::create::<S>),
    )
    .route(
      "/dashboards/{id}",
      get(dashboards::get_one::<S>).delete(dashboards::delete::<S>),
    )
    .route("/dashboards/{id}/boards", get(dashboards::boards::<S>))
    // Boards
    .route("/boards", get(boards::list::<S>).post(boards::create::<S>))
    .route(
      "/boards/{id}",
      get(boards::get_one::<S>)
        .patch(boards::update::<S>)
        .delete(boards::delete::<S>),
    )
    .route("/boards/{id}/users", get(boards::users::<S>))
    .route("/boards/{id}/links", get(boards::links::<S>))
    .route(
      "/boards/{id}/users/{user_id}",
      put(boards::link_user::<S>).delete(boards::unlink_user::<S>),
    )
    // Catalogs
    .route(
      "/boards/{id}/catalogs",
      get(catalogs::list::<S>).post(catalogs::create::<S>),
    )
    .route(
      "/catalogs/{id}",
      get(catalogs::get_one::<S>)
        .patch(catalogs::update::<S>)
        .delete(catalogs::delete::<S>),
    )
    // KPIs
    .route(
      "/catalogs/{id}/kpis",
      get(kpis::list::<S>).post(kpis::create::<S>),
    )
    .route(
      "/kpis/{id}",
      get(kpis::get_one::<S>)
        .patch(kpis::update::<S>)
        .delete(kpis::delete::<S>),
    )
    .route("/kpis/{id}/move", post(kpis::move_to::<S>))
    .route("/kpis/{id}/position", put(kpis::position::<S>))
    // Records
    .route(
      "/kpis/{id}/records",
      get(kpis::list_records::<S>).post(kpis::create_record::<S>),
    )
    .route(
      "/records/{id}",
      get(kpis::get_record::<S>).delete(kpis::delete_record::<S>),
    )
    // Styles
    .route(
      "/styles/{kind}",
      get(styles::list::<S>).post(styles::create::<S>),
    )
    .route("/styles/{kind}/{id}", delete(styles::delete::<S>))
    .with_state(store)
}
