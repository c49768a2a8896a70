//! [`Query`] collection related to [`Product`]s.

use common::operations::By;

use crate::{
    domain::{product, Product},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Product`] by its [`product::Id`].
pub type ById = DatabaseQuery<By<Option<Product>, product::Id>>;

/// Queries [`product::Attributes`] of a [`Product`] by its [`product::Id`].
pub type Attributes =
    DatabaseQuery<By<Option<product::Attributes>, product::Id>>;

/// Queries a list of [`Product`]s joined with their [`product::Attributes`].
pub type WithAttributes = DatabaseQuery<
    By<Vec<read::product::WithAttributes>, read::product::list::Filter>,
>;
