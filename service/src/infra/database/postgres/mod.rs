//! [`Database`] stored in Postgres.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::Config;

/// [`Database`] backed by a Postgres connection [`Pool`].
///
/// [`Pool`]: connection::Pool
#[derive(Clone, Debug, Deref)]
pub struct Postgres<C = NonTx>(C);

impl Postgres {
    /// Creates a new [`Postgres`] database connecting lazily as the provided
    /// [`Config`] describes.
    ///
    /// # Errors
    ///
    /// If the [`Config`] doesn't describe a valid connection pool.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Error of a [`Postgres`] database.
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed to run.
    #[display("Statement failed: {_0}")]
    Statement(connection::Error),

    /// Connection pool couldn't be created.
    #[display("Invalid connection pool: {_0}")]
    PoolCreation(connection::PoolCreationError),

    /// No pooled connection could be obtained.
    #[display("No connection available: {_0}")]
    Pool(connection::PoolError),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of the unique
    /// `constraint`, or of any unique constraint if [`None`].
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        let Self::Statement(e) = self else {
            return false;
        };
        e.code() == Some(&SqlState::UNIQUE_VIOLATION)
            && constraint.map_or(true, |c| {
                e.as_db_error().and_then(|e| e.constraint()) == Some(c)
            })
    }
}

#[cfg(test)]
mod spec {
    use super::{connection::PoolError, Error};

    #[test]
    fn pool_errors_are_no_unique_violations() {
        let e = Error::from(PoolError::Closed);

        assert!(!e.is_unique_violation(None));
        assert!(!e.is_unique_violation(Some("rental_contract_number_unique")));
        assert_eq!(
            e.to_string(),
            "No connection available: Pool has been closed",
        );
    }
}
