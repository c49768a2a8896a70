//! [`Command`] for registering a new [`RentalReturn`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, rental_return, Contract, RentalReturn},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`RentalReturn`] of a [`Contract`].
///
/// Neither the [`contract::Status`] nor the [`Contract`] deposit flags are
/// touched.
#[derive(Clone, Debug)]
pub struct RegisterReturn {
    /// ID of the returned [`Contract`].
    pub contract_id: contract::Id,

    /// Date when the units were returned.
    pub return_date: rental_return::ReturnDateTime,

    /// [`rental_return::Condition`] of the returned units.
    pub condition: rental_return::Condition,

    /// Description of the found damage.
    pub damage_description: Option<rental_return::DamageDescription>,

    /// Part of the deposit withheld.
    pub deposit_withheld: Money,

    /// Reason of withholding the deposit.
    pub withhold_reason: Option<rental_return::WithholdReason>,
}

impl<Db> Command<RegisterReturn> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<RentalReturn>, Err = Traced<database::Error>>,
{
    type Ok = RentalReturn;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterReturn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterReturn {
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let rental_return = RentalReturn {
            id: rental_return::Id::new(),
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(rental_return.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rental_return)
    }
}

/// Error of [`RegisterReturn`] [`Command`] execution.
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
    use common::Money;

    use crate::{
        command::{
            fixture::{create_contract, date, service},
            RegisterReturn,
        },
        domain::{contract, rental_return},
        query, read, Command as _, Query as _,
    };

    use super::ExecutionError;

    fn register(contract_id: contract::Id) -> RegisterReturn {
        RegisterReturn {
            contract_id,
            return_date: date("2026-05-01"),
            condition: rental_return::Condition::new("Goed").unwrap(),
            damage_description: None,
            deposit_withheld: Money::ZERO,
            withhold_reason: None,
        }
    }

    #[tokio::test]
    async fn keeps_contract_untouched() {
        let service = service();
        let (created, _) =
            service.execute(create_contract("RC-1")).await.unwrap();
        let (other, _) =
            service.execute(create_contract("RC-2")).await.unwrap();

        let registered = service
            .execute(RegisterReturn {
                deposit_withheld: "75".parse().unwrap(),
                withhold_reason: Some(
                    rental_return::WithholdReason::new("Kapotte lader")
                        .unwrap(),
                ),
                ..register(created.id)
            })
            .await
            .unwrap();
        _ = service.execute(register(other.id)).await.unwrap();

        let returns = service
            .execute(query::rental_return::List::by(
                read::rental_return::list::Filter {
                    contract_id: Some(created.id),
                },
            ))
            .await
            .unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].id, registered.id);
        assert_eq!(
            returns[0].deposit_withheld,
            "75".parse::<Money>().unwrap(),
        );

        let contract = service
            .execute(query::contract::ById::by(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(contract.status, created.status);
        assert!(!contract.deposit_refunded);
    }

    #[tokio::test]
    async fn fails_on_unknown_contract() {
        let err = service()
            .execute(register(contract::Id::new()))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ContractNotExists(_)));
    }
}
