//! [`Command`] for updating a [`contract::Item`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Patch,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::contract,
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Contract;

use super::Command;

/// [`Command`] for updating a [`contract::Item`] of a [`Contract`].
///
/// Only [`Patch::Set`] fields are changed. The rented [`Product`] is
/// immutable.
///
/// [`Product`]: crate::domain::Product
#[derive(Clone, Debug, Default)]
pub struct UpdateContractItem {
    /// ID of the [`Contract`] owning the [`contract::Item`].
    pub contract_id: contract::Id,

    /// ID of the [`contract::Item`] to update.
    pub item_id: contract::item::Id,

    /// New [`contract::item::Quantity`].
    pub quantity: Patch<contract::item::Quantity>,

    /// New serial number.
    pub serial_number: Patch<Option<contract::item::SerialNumber>>,

    /// New condition on delivery.
    pub condition_on_delivery: Patch<Option<contract::item::Condition>>,

    /// New condition on return.
    pub condition_on_return: Patch<Option<contract::item::Condition>>,
}

impl<Db> Command<UpdateContractItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<contract::Item>, contract::item::Id>>,
            Ok = Option<contract::Item>,
            Err = Traced<database::Error>,
        > + Database<Update<contract::Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = contract::Item;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateContractItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateContractItem {
            contract_id,
            item_id,
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut item = tx
            .execute(Select(By::<Option<contract::Item>, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|i| i.contract_id == contract_id)
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;

        _ = quantity.apply(&mut item.quantity);
        _ = serial_number.apply(&mut item.serial_number);
        _ = condition_on_delivery.apply(&mut item.condition_on_delivery);
        _ = condition_on_return.apply(&mut item.condition_on_return);
        item.updated_at = DateTime::now().coerce();

        tx.execute(Update(item.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`UpdateContractItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`contract::Item`] with the provided ID does not exist in the
    /// [`Contract`].
    #[display("`ContractItem(id: {_0})` does not exist")]
    ItemNotExists(#[error(not(source))] contract::item::Id),
}

#[cfg(test)]
mod spec {
    use common::Patch;

    use crate::{
        command::{
            fixture::{create_contract, service},
            UpdateContractItem,
        },
        domain::contract,
        Command as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn captures_return_condition() {
        let service = service();
        let (created, items) =
            service.execute(create_contract("RC-1")).await.unwrap();

        let updated = service
            .execute(UpdateContractItem {
                contract_id: created.id,
                item_id: items[0].id,
                condition_on_return: Patch::Set(Some(
                    contract::item::Condition::new("Kras op deksel").unwrap(),
                )),
                ..UpdateContractItem::default()
            })
            .await
            .unwrap();

        assert_eq!(
            updated.condition_on_return.as_ref().map(ToString::to_string),
            Some("Kras op deksel".to_owned()),
        );
        assert_eq!(updated.quantity, items[0].quantity);
        assert_eq!(updated.product_id, items[0].product_id);
    }

    #[tokio::test]
    async fn fails_on_foreign_item() {
        let service = service();
        let (_, items) =
            service.execute(create_contract("RC-1")).await.unwrap();
        let (other, _) =
            service.execute(create_contract("RC-2")).await.unwrap();

        let err = service
            .execute(UpdateContractItem {
                contract_id: other.id,
                item_id: items[0].id,
                ..UpdateContractItem::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ItemNotExists(_)));
    }
}
