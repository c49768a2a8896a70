//! [`Query`] collection related to [`Contract`]s.

use common::operations::By;

use crate::{
    domain::{contract, Contract},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;

/// Queries a list of [`Contract`]s.
pub type List = DatabaseQuery<By<Vec<Contract>, read::contract::list::Filter>>;

/// Queries [`contract::Item`]s of a [`Contract`] by its [`contract::Id`].
pub type Items = DatabaseQuery<By<Vec<contract::Item>, contract::Id>>;

/// Queries a [`contract::Item`] by its [`contract::item::Id`].
pub type ItemById =
    DatabaseQuery<By<Option<contract::Item>, contract::item::Id>>;
