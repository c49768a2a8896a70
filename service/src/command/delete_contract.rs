//! [`Command`] for deleting a [`Contract`] along with its
//! [`contract::Item`]s.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for softly deleting a [`Contract`] along with its
/// [`contract::Item`]s in a single transaction.
///
/// Deleting an already deleted or missing [`Contract`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteContract {
    /// ID of the [`Contract`] to delete.
    pub id: contract::Id,
}

impl<Db> Command<DeleteContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<contract::Item>, contract::Id>>,
            Ok = Vec<contract::Item>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Update<contract::Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteContract,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteContract { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let Some(mut contract) = tx
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(());
        };

        let now = DateTime::now();

        let items = tx
            .execute(Select(By::<Vec<contract::Item>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?;
        for mut item in items {
            item.updated_at = now.coerce();
            item.deleted_at = Some(now.coerce());
            tx.execute(Update(item))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        contract.updated_at = now.coerce();
        contract.deleted_at = Some(now.coerce());
        tx.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Commit).await.map_err(tracerr::wrap!()).map(drop)
    }
}

/// Error of [`DeleteContract`] [`Command`] execution.
pub type ExecutionError = database::Error;
