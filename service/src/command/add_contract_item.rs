//! [`Command`] for adding a new [`contract::Item`] to a [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, product, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`contract::Item`] to an existing
/// [`Contract`].
#[derive(Clone, Debug)]
pub struct AddContractItem {
    /// ID of the [`Contract`] to add the [`contract::Item`] to.
    pub contract_id: contract::Id,

    /// ID of the rented [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Rented [`contract::item::Quantity`].
    pub quantity: contract::item::Quantity,

    /// Serial number of the rented unit.
    pub serial_number: Option<contract::item::SerialNumber>,

    /// Condition of the rented units on delivery.
    pub condition_on_delivery: Option<contract::item::Condition>,
}

impl<Db> Command<AddContractItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<contract::Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = contract::Item;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AddContractItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddContractItem {
            contract_id,
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Deleted `Contract`s are not selected.
        tx.execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let now = DateTime::now();
        let item = contract::Item {
            id: contract::item::Id::new(),
            contract_id,
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            deleted_at: None,
        };

        tx.execute(Insert(item.clone()))
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

/// Error of [`AddContractItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{create_contract, service},
            AddContractItem, DeleteContract,
        },
        domain::{contract, product},
        query, Command as _, Query as _,
    };

    use super::ExecutionError;

    fn add(contract_id: contract::Id) -> AddContractItem {
        AddContractItem {
            contract_id,
            product_id: product::Id::new("prod_2").unwrap(),
            quantity: contract::item::Quantity::new(2).unwrap(),
            serial_number: Some(
                contract::item::SerialNumber::new("ABC123").unwrap(),
            ),
            condition_on_delivery: None,
        }
    }

    #[tokio::test]
    async fn round_trips_quantity_and_serial_number() {
        let service = service();
        let (created, _) =
            service.execute(create_contract("RC-1")).await.unwrap();

        let item = service.execute(add(created.id)).await.unwrap();

        let items = service
            .execute(query::contract::Items::by(created.id))
            .await
            .unwrap();
        let stored = items.iter().find(|i| i.id == item.id).unwrap();
        assert_eq!(stored.quantity.get(), 2);
        assert_eq!(
            stored.serial_number.as_ref().map(ToString::to_string),
            Some("ABC123".to_owned()),
        );
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn fails_on_deleted_contract() {
        let service = service();
        let (created, _) =
            service.execute(create_contract("RC-1")).await.unwrap();
        service
            .execute(DeleteContract { id: created.id })
            .await
            .unwrap();

        let err = service.execute(add(created.id)).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ContractNotExists(id) if *id == created.id,
        ));
    }
}
