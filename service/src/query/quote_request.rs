//! [`Query`] collection related to [`QuoteRequest`]s.

use common::operations::By;

use crate::{
    domain::{quote_request, QuoteRequest},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`QuoteRequest`] by its [`quote_request::Id`].
pub type ById = DatabaseQuery<By<Option<QuoteRequest>, quote_request::Id>>;

/// Queries a list of [`QuoteRequest`]s.
pub type List =
    DatabaseQuery<By<Vec<QuoteRequest>, read::quote_request::list::Filter>>;
