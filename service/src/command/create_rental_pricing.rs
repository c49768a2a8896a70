//! [`Command`] for creating a new [`RentalPricing`].

use common::{operations::Insert, DateTime, Money};
use tracerr::Traced;

use crate::{
    domain::{pricing, product, RentalPricing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`RentalPricing`].
#[derive(Clone, Debug)]
pub struct CreateRentalPricing {
    /// ID of the priced [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Monthly price of the flex plan.
    pub flex_monthly_price: Option<Money>,

    /// Monthly price of the year plan.
    pub year_monthly_price: Option<Money>,

    /// Deposit charged once per rented unit.
    pub deposit_amount: Option<Money>,

    /// Indicator whether the flex plan is offered.
    pub flex_available: bool,

    /// Indicator whether the year plan is offered.
    pub year_available: bool,
}

impl<Db> Command<CreateRentalPricing> for Service<Db>
where
    Db: Database<Insert<RentalPricing>, Err = Traced<database::Error>>,
{
    type Ok = RentalPricing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRentalPricing,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateRentalPricing {
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        } = cmd;

        let now = DateTime::now();
        let pricing = RentalPricing {
            id: pricing::Id::new(),
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            deleted_at: None,
        };

        self.database()
            .execute(Insert(pricing.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(pricing)
    }
}

/// Error of [`CreateRentalPricing`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        command::{fixture::service, CreateRentalPricing, DeleteRentalPricing},
        domain::product,
        query, read, Command as _,
    };

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn pricing(product_id: &str) -> CreateRentalPricing {
        CreateRentalPricing {
            product_id: product::Id::new(product_id).unwrap(),
            flex_monthly_price: Some(money("89.99")),
            year_monthly_price: Some(money("69.99")),
            deposit_amount: Some(money("500")),
            flex_available: true,
            year_available: true,
        }
    }

    fn by_product(product_id: &str) -> query::pricing::List {
        query::pricing::List::by(read::pricing::list::Filter {
            product_id: Some(product::Id::new(product_id).unwrap()),
        })
    }

    #[tokio::test]
    async fn lists_created_pricing_by_product() {
        let service = service();
        let created = service.execute(pricing("prod_1")).await.unwrap();
        _ = service.execute(pricing("prod_2")).await.unwrap();

        let listed = service.execute(by_product("prod_1")).await.unwrap();

        assert_eq!(listed.len(), 1);
        let listed = &listed[0];
        assert_eq!(listed.id, created.id);
        assert_eq!(listed.product_id.to_string(), "prod_1");
        assert_eq!(listed.flex_monthly_price, Some(money("89.99")));
        assert_eq!(listed.year_monthly_price, Some(money("69.99")));
        assert_eq!(listed.deposit_amount, Some(money("500")));
        assert!(listed.flex_available);
        assert!(listed.year_available);
        assert!(listed.deleted_at.is_none());
    }

    #[tokio::test]
    async fn hides_deleted_pricing() {
        let service = service();
        let created = service.execute(pricing("prod_1")).await.unwrap();
        service
            .execute(DeleteRentalPricing { id: created.id })
            .await
            .unwrap();

        assert!(service
            .execute(by_product("prod_1"))
            .await
            .unwrap()
            .is_empty());
        assert!(service
            .execute(query::pricing::ById::by(created.id))
            .await
            .unwrap()
            .is_none());
    }
}
