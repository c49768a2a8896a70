//! [`Command`] for deleting a [`RentalPricing`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{pricing, RentalPricing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for softly deleting a [`RentalPricing`].
///
/// Deleting an already deleted or missing [`RentalPricing`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRentalPricing {
    /// ID of the [`RentalPricing`] to delete.
    pub id: pricing::Id,
}

impl<Db> Command<DeleteRentalPricing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<RentalPricing>, pricing::Id>>,
            Ok = Option<RentalPricing>,
            Err = Traced<database::Error>,
        > + Database<Update<RentalPricing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteRentalPricing,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteRentalPricing { id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let Some(mut pricing) = tx
            .execute(Select(By::<Option<RentalPricing>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(());
        };

        let now = DateTime::now();
        pricing.updated_at = now.coerce();
        pricing.deleted_at = Some(now.coerce());

        tx.execute(Update(pricing))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit).await.map_err(tracerr::wrap!()).map(drop)
    }
}

/// Error of [`DeleteRentalPricing`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::service, CreateRentalPricing, DeleteRentalPricing,
        },
        domain::product,
        query, read, Query as _,
    };

    #[tokio::test]
    async fn hides_deleted_pricing() {
        let service = service();
        let pricing = service
            .execute(CreateRentalPricing {
                product_id: product::Id::new("prod_1").unwrap(),
                flex_monthly_price: Some("89.99".parse().unwrap()),
                year_monthly_price: None,
                deposit_amount: None,
                flex_available: true,
                year_available: false,
            })
            .await
            .unwrap();

        service
            .execute(DeleteRentalPricing { id: pricing.id })
            .await
            .unwrap();
        service
            .execute(DeleteRentalPricing { id: pricing.id })
            .await
            .unwrap();

        assert!(service
            .execute(query::pricing::ById::by(pricing.id))
            .await
            .unwrap()
            .is_none());
        assert!(service
            .execute(query::pricing::List::by(
                read::pricing::list::Filter::default()
            ))
            .await
            .unwrap()
            .is_empty());
    }
}
