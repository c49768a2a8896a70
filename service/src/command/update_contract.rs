//! [`Command`] for updating a [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Money, Patch,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Contract`].
///
/// Only [`Patch::Set`] fields are changed. [`contract::Number`], customer and
/// [`contract::Kind`] are immutable.
#[derive(Clone, Debug, Default)]
pub struct UpdateContract {
    /// ID of the [`Contract`] to update.
    pub id: contract::Id,

    /// New [`contract::Status`].
    ///
    /// Must be reachable from the current one.
    pub status: Patch<contract::Status>,

    /// New start of the [`Contract`].
    pub start_date: Patch<contract::StartDateTime>,

    /// New end of the [`Contract`].
    pub end_date: Patch<Option<contract::EndDateTime>>,

    /// New earliest end of the [`Contract`].
    pub earliest_end_date: Patch<contract::EarliestEndDateTime>,

    /// New monthly amount.
    pub monthly_amount: Patch<Money>,

    /// New deposit amount.
    pub deposit_amount: Patch<Money>,

    /// New indicator whether the deposit has been paid.
    pub deposit_paid: Patch<bool>,

    /// New indicator whether the deposit has been refunded.
    pub deposit_refunded: Patch<bool>,

    /// New [`contract::Notes`].
    pub notes: Patch<Option<contract::Notes>>,
}

impl<Db> Command<UpdateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateContract {
            id,
            status,
            start_date,
            end_date,
            earliest_end_date,
            monthly_amount,
            deposit_amount,
            deposit_paid,
            deposit_refunded,
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(id))
            .map_err(tracerr::wrap!())?;

        if let Some(to) = status.as_set() {
            contract.status = contract
                .status
                .transition(*to)
                .map_err(tracerr::from_and_wrap!(=> E))?;
        }
        _ = start_date.apply(&mut contract.start_date);
        _ = end_date.apply(&mut contract.end_date);
        _ = earliest_end_date.apply(&mut contract.earliest_end_date);
        _ = monthly_amount.apply(&mut contract.monthly_amount);
        _ = deposit_amount.apply(&mut contract.deposit_amount);
        _ = deposit_paid.apply(&mut contract.deposit_paid);
        _ = deposit_refunded.apply(&mut contract.deposit_refunded);
        _ = notes.apply(&mut contract.notes);
        contract.updated_at = DateTime::now().coerce();

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`UpdateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`contract::Status`] is not reachable.
    #[display("{_0}")]
    #[from]
    InvalidTransition(contract::InvalidTransition),
}
