//! Postgres clients [`Database`] operations are run with.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{self, postgres};
#[cfg(doc)]
use crate::infra::Database;

use super::connection::{Connection, Pool, Pooled};

/// Client running every statement on whatever pooled connection is free.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`Pool`] the connections are taken from.
    pub(crate) pool: Pool,
}

impl NonTx {
    /// Wraps the provided [`Pool`] into a [`NonTx`] client.
    #[must_use]
    pub const fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Takes a free connection from the [`Pool`].
    async fn pooled(&self) -> Result<Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for NonTx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.pooled().await.map_err(tracerr::wrap!())?;
        conn.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.pooled().await.map_err(tracerr::wrap!())?;
        conn.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.pooled().await.map_err(tracerr::wrap!())?;
        conn.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}

/// Client running all its statements inside a single transaction.
///
/// The transaction begins with the first statement. Clones share it.
///
/// Dropping the last clone without [`Tx::commit()`] discards the connection
/// instead of returning it to the [`Pool`], so the server rolls back.
#[derive(Clone, Debug)]
pub struct Tx(Arc<TxState>);

/// Shared state of a [`Tx`] client.
#[derive(Debug)]
struct TxState {
    /// [`Pool`] the transaction connection is taken from.
    pool: Pool,

    /// Connection with the open transaction, if it has begun.
    conn: Mutex<Option<Pooled>>,
}

impl Drop for TxState {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.get_mut().take() {
            drop(Pooled::take(conn));
        }
    }
}

impl Tx {
    /// Creates a new [`Tx`] taking its connection from the [`Pool`] of the
    /// provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self(Arc::new(TxState {
            pool: client.pool,
            conn: Mutex::new(None),
        }))
    }

    /// Returns the connection of the transaction, beginning it if needed.
    async fn conn(
        &self,
    ) -> Result<MappedMutexGuard<'_, Pooled>, Traced<database::Error>> {
        let mut conn = self.0.conn.lock().await;
        if conn.is_none() {
            let fresh = self
                .0
                .pool
                .get()
                .await
                .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                .map_err(tracerr::map_from)?;
            fresh
                .batch_execute("BEGIN")
                .await
                .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                .map_err(tracerr::map_from)?;
            *conn = Some(fresh);
        }
        Ok(MutexGuard::map(conn, |c| {
            c.as_mut().unwrap_or_else(|| unreachable!("transaction has begun"))
        }))
    }

    /// Commits this [`Tx`], if any statement has been run in it.
    ///
    /// Statements run afterwards begin a new transaction.
    ///
    /// # Errors
    ///
    /// If the transaction fails to commit. Its connection is discarded then.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(conn) = self.0.conn.lock().await.take() else {
            return Ok(());
        };
        let committed = conn.batch_execute("COMMIT").await;
        committed.map_err(|e| {
            drop(Pooled::take(conn));
            tracerr::map_from(tracerr::new!(postgres::Error::from(e)))
        })
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.conn().await.map_err(tracerr::wrap!())?;
        conn.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.conn().await.map_err(tracerr::wrap!())?;
        conn.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let conn = self.conn().await.map_err(tracerr::wrap!())?;
        conn.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use deadpool_postgres::{Config, Runtime};
    use tokio_postgres::NoTls;

    use crate::infra::postgres::Connection as _;

    use super::{NonTx, Tx};

    /// Pool pointing at a port nothing listens on.
    fn unreachable() -> NonTx {
        let mut conf = Config::new();
        conf.host = Some("127.0.0.1".into());
        conf.port = Some(1);
        conf.user = Some("rental".into());
        conf.dbname = Some("rental".into());
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .expect("pool is created lazily");
        NonTx::from_pool(pool)
    }

    #[tokio::test]
    async fn commits_untouched_transaction_without_connecting() {
        let tx = Tx::from_non_tx(unreachable());

        tx.commit().await.expect("nothing to commit");
        tx.clone().commit().await.expect("nothing to commit");
    }

    #[tokio::test]
    async fn reports_unavailable_connection() {
        let non_tx = unreachable();
        let tx = Tx::from_non_tx(non_tx.clone());

        let e = non_tx.exec("SELECT 1", &[]).await.unwrap_err();
        assert!(!e.as_ref().is_unique_violation(None), "{e}");

        let e = tx.query("SELECT 1", &[]).await.unwrap_err();
        assert!(!e.as_ref().is_unique_violation(None), "{e}");
        assert!(tx.0.conn.lock().await.is_none(), "transaction has not begun");
        tx.commit().await.expect("nothing to commit");
    }
}
