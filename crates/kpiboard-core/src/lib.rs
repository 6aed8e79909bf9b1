//! Core types and trait definitions for kpiboard.
//!
//! Users own a dashboard, dashboards aggregate shared boards, boards hold
//! catalogs, catalogs hold KPIs and KPIs accumulate records. This crate
//! defines those records, the transfer and patch structs used to create and
//! update them, and the [`store::BoardStore`] contract that backends fulfil.
//!
//! This crate has no HTTP or database dependencies.

// Trait methods spell out `+ Send` on their futures; impls use `async fn`.
#![allow(async_fn_in_trait)]

pub mod board;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod kpi;
pub mod store;
pub mod style;
pub mod user;

pub use error::{Classify, Entity, Error, ErrorKind, Result};
