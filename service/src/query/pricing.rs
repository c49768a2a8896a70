//! [`Query`] collection related to [`RentalPricing`]s.

use common::operations::By;

use crate::{
    domain::{pricing, product, RentalPricing},
    read,
};
#[cfg(doc)]
use crate::{domain::Product, Query};

use super::DatabaseQuery;

/// Queries a [`RentalPricing`] by its [`pricing::Id`].
pub type ById = DatabaseQuery<By<Option<RentalPricing>, pricing::Id>>;

/// Queries a list of [`RentalPricing`]s.
pub type List =
    DatabaseQuery<By<Vec<RentalPricing>, read::pricing::list::Filter>>;

/// Queries current [`RentalPricing`]s of the provided [`Product`]s.
pub type Current = DatabaseQuery<By<read::pricing::Current, Vec<product::Id>>>;
