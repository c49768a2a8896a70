//! [`Command`] for removing a [`contract::Item`] from a [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::contract,
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Contract;

use super::Command;

/// [`Command`] for softly deleting a [`contract::Item`] of a [`Contract`].
///
/// Removing an already removed or missing [`contract::Item`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RemoveContractItem {
    /// ID of the [`Contract`] owning the [`contract::Item`].
    pub contract_id: contract::Id,

    /// ID of the [`contract::Item`] to remove.
    pub item_id: contract::item::Id,
}

impl<Db> Command<RemoveContractItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<contract::Item>, contract::item::Id>>,
            Ok = Option<contract::Item>,
            Err = Traced<database::Error>,
        > + Database<Update<contract::Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveContractItem,
    ) -> Result<Self::Ok, Self::Err> {
        let RemoveContractItem {
            contract_id,
            item_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let Some(mut item) = tx
            .execute(Select(By::<Option<contract::Item>, _>::new(item_id)))
            .await
            .map_err(tracerr::wrap!())?
            .filter(|i| i.contract_id == contract_id)
        else {
            return Ok(());
        };

        let now = DateTime::now();
        item.updated_at = now.coerce();
        item.deleted_at = Some(now.coerce());

        tx.execute(Update(item))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit).await.map_err(tracerr::wrap!()).map(drop)
    }
}

/// Error of [`RemoveContractItem`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{create_contract, service},
            RemoveContractItem,
        },
        query, Command as _, Query as _,
    };

    #[tokio::test]
    async fn removes_item_once() {
        let service = service();
        let (created, items) =
            service.execute(create_contract("RC-1")).await.unwrap();
        let cmd = RemoveContractItem {
            contract_id: created.id,
            item_id: items[0].id,
        };

        service.execute(cmd).await.unwrap();
        service.execute(cmd).await.unwrap();

        assert!(service
            .execute(query::contract::Items::by(created.id))
            .await
            .unwrap()
            .is_empty());
    }
}
