//! [`Command`] for updating a [`RentalPricing`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Money, Patch,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{pricing, RentalPricing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`RentalPricing`].
///
/// Only [`Patch::Set`] fields are changed.
#[derive(Clone, Debug, Default)]
pub struct UpdateRentalPricing {
    /// ID of the [`RentalPricing`] to update.
    pub id: pricing::Id,

    /// New monthly price of the flex plan.
    pub flex_monthly_price: Patch<Option<Money>>,

    /// New monthly price of the year plan.
    pub year_monthly_price: Patch<Option<Money>>,

    /// New deposit amount.
    pub deposit_amount: Patch<Option<Money>>,

    /// New availability of the flex plan.
    pub flex_available: Patch<bool>,

    /// New availability of the year plan.
    pub year_available: Patch<bool>,
}

impl<Db> Command<UpdateRentalPricing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<RentalPricing>, pricing::Id>>,
            Ok = Option<RentalPricing>,
            Err = Traced<database::Error>,
        > + Database<Update<RentalPricing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RentalPricing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRentalPricing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRentalPricing {
            id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut pricing = tx
            .execute(Select(By::<Option<RentalPricing>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PricingNotExists(id))
            .map_err(tracerr::wrap!())?;

        _ = flex_monthly_price.apply(&mut pricing.flex_monthly_price);
        _ = year_monthly_price.apply(&mut pricing.year_monthly_price);
        _ = deposit_amount.apply(&mut pricing.deposit_amount);
        _ = flex_available.apply(&mut pricing.flex_available);
        _ = year_available.apply(&mut pricing.year_available);
        pricing.updated_at = DateTime::now().coerce();

        tx.execute(Update(pricing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(pricing)
    }
}

/// Error of [`UpdateRentalPricing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RentalPricing`] with the provided ID does not exist.
    #[display("`RentalPricing(id: {_0})` does not exist")]
    PricingNotExists(#[error(not(source))] pricing::Id),
}

#[cfg(test)]
mod spec {
    use common::{Money, Patch};

    use crate::{
        command::{
            fixture::service, CreateRentalPricing, UpdateRentalPricing,
        },
        domain::{pricing, product},
        Command as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn patches_only_provided_fields() {
        let service = service();
        let created = service
            .execute(CreateRentalPricing {
                product_id: product::Id::new("prod_1").unwrap(),
                flex_monthly_price: Some("89.99".parse().unwrap()),
                year_monthly_price: Some("69.99".parse().unwrap()),
                deposit_amount: Some("500".parse().unwrap()),
                flex_available: true,
                year_available: true,
            })
            .await
            .unwrap();

        let updated = service
            .execute(UpdateRentalPricing {
                id: created.id,
                flex_monthly_price: Patch::Set(None),
                year_available: Patch::Set(false),
                ..UpdateRentalPricing::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.flex_monthly_price, None);
        assert!(!updated.year_available);
        assert_eq!(
            updated.year_monthly_price,
            Some("69.99".parse::<Money>().unwrap()),
        );
        assert_eq!(updated.deposit_amount, created.deposit_amount);
        assert!(updated.flex_available);
    }

    #[tokio::test]
    async fn fails_on_unknown_pricing() {
        let id = pricing::Id::new();
        let err = service()
            .execute(UpdateRentalPricing {
                id,
                ..UpdateRentalPricing::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PricingNotExists(i) if *i == id,
        ));
    }
}
