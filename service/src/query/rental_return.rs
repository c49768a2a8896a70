//! [`Query`] collection related to [`RentalReturn`]s.

use common::operations::By;

use crate::{domain::RentalReturn, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`RentalReturn`]s.
pub type List = DatabaseQuery<
    By<Vec<RentalReturn>, read::rental_return::list::Filter>,
>;
