//! Application provides REST API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod context;
pub mod error;

use std::sync::Arc;

use axum::{Extension, Router};
// Used in binary.
use axum_client_ip as _;
use refinery as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::Credentials,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
#[cfg(not(test))]
pub type Service = service::Service<service::infra::Postgres>;

/// [`Service`] backed by an in-memory database.
///
/// [`Service`]: service::Service
#[cfg(test)]
pub type Service = service::Service<service::infra::database::Memory>;

/// Builds the [`Router`] serving both the admin and the storefront routes of
/// the provided [`Service`].
#[must_use]
pub fn router(service: Service, credentials: Credentials) -> Router {
    Router::new()
        .merge(api::admin())
        .merge(api::store())
        .layer(Extension(service))
        .layer(Extension(Arc::new(credentials)))
}
