//! REST API definitions.

pub mod product;
pub mod quote_request;
pub mod rental_contract;
pub mod rental_pricing;
pub mod rental_return;

use std::{fmt, str::FromStr};

use axum::{
    routing::{get, post},
    Router,
};
use common::Patch;
use serde::{de, Deserialize as _, Deserializer, Serialize};

/// Response of a deleted entity.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Deleted<Id> {
    /// ID of the deleted entity.
    pub id: Id,

    /// Always `true`.
    pub deleted: bool,
}

impl<Id> Deleted<Id> {
    /// Creates a new [`Deleted`] response for the provided `id`.
    #[must_use]
    pub fn new(id: Id) -> Self {
        Self { id, deleted: true }
    }
}

/// Builds the routes of the admin panel.
///
/// Every handler requires the [`Admin`] authentication.
///
/// [`Admin`]: crate::context::Admin
#[must_use]
pub fn admin() -> Router {
    Router::new()
        .route(
            "/admin/rental-pricing",
            get(rental_pricing::list).post(rental_pricing::create),
        )
        .route(
            "/admin/rental-pricing/:id",
            get(rental_pricing::get)
                .post(rental_pricing::update)
                .delete(rental_pricing::delete),
        )
        .route(
            "/admin/rental-contracts",
            get(rental_contract::list).post(rental_contract::create),
        )
        .route(
            "/admin/rental-contracts/:id",
            get(rental_contract::get)
                .post(rental_contract::update)
                .delete(rental_contract::delete),
        )
        .route(
            "/admin/rental-contracts/:id/items",
            get(rental_contract::items).post(rental_contract::add_item),
        )
        .route(
            "/admin/rental-contracts/:id/items/:item_id",
            get(rental_contract::get_item)
                .post(rental_contract::update_item)
                .delete(rental_contract::remove_item),
        )
        .route(
            "/admin/rental-returns",
            get(rental_return::list).post(rental_return::create),
        )
        .route(
            "/admin/quote-requests",
            get(quote_request::list).post(quote_request::create),
        )
        .route(
            "/admin/quote-requests/:id",
            get(quote_request::get)
                .post(quote_request::update)
                .delete(quote_request::delete),
        )
        .route(
            "/admin/products/:id/attributes",
            get(product::get_attributes).post(product::set_attributes),
        )
}

/// Builds the routes of the storefront.
///
/// Every handler requires the [`Storefront`] authentication.
///
/// [`Storefront`]: crate::context::Storefront
#[must_use]
pub fn store() -> Router {
    Router::new()
        .route(
            "/store/products-with-attributes",
            get(product::list_with_attributes),
        )
        .route("/store/rental-pricing", get(rental_pricing::store_list))
        .route("/store/quote-requests", post(quote_request::submit))
}

/// Deserializes an optional value treating a blank string as an absent one.
///
/// Both the admin panel and the storefront forms submit untouched optional
/// inputs as empty strings.
pub(crate) fn blank_as_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(s) = Option::<String>::deserialize(d)? else {
        return Ok(None);
    };
    if s.trim().is_empty() {
        return Ok(None);
    }
    s.parse().map(Some).map_err(de::Error::custom)
}

/// Deserializes a nullable [`Patch`] treating a blank string as `null`, so
/// that clearing a form input clears the field.
///
/// Use together with `#[serde(default)]`, so that a missing key still
/// produces [`Patch::Keep`].
pub(crate) fn blank_as_cleared<'de, D, T>(
    d: D,
) -> Result<Patch<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    blank_as_none(d).map(Patch::Set)
}
