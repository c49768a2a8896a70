//! [`Command`] for creating a new [`Contract`] along with its
//! [`contract::Item`]s.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, customer, product, Contract},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`] along with its
/// [`contract::Item`]s.
///
/// Everything is created in a single transaction.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// [`contract::Number`] of a new [`Contract`].
    pub number: contract::Number,

    /// ID of the renting customer.
    pub customer_id: customer::Id,

    /// [`contract::Kind`] of a new [`Contract`].
    pub kind: contract::Kind,

    /// Initial [`contract::Status`] of a new [`Contract`].
    pub status: contract::Status,

    /// Start of a new [`Contract`].
    pub start_date: contract::StartDateTime,

    /// End of a new [`Contract`], if known.
    pub end_date: Option<contract::EndDateTime>,

    /// Earliest end of a new [`Contract`].
    ///
    /// Derived from the [`contract::Kind`] when omitted.
    pub earliest_end_date: Option<contract::EarliestEndDateTime>,

    /// Monthly amount of a new [`Contract`].
    ///
    /// Calculated from the current [`RentalPricing`]s of the [`Item`]s when
    /// omitted.
    ///
    /// [`RentalPricing`]: crate::domain::RentalPricing
    pub monthly_amount: Option<Money>,

    /// Deposit of a new [`Contract`].
    pub deposit_amount: Money,

    /// Indicator whether the deposit has been paid already.
    pub deposit_paid: bool,

    /// Indicator whether the deposit has been refunded already.
    pub deposit_refunded: bool,

    /// [`contract::Notes`] of a new [`Contract`].
    pub notes: Option<contract::Notes>,

    /// [`Item`]s of a new [`Contract`].
    pub items: Vec<Item>,
}

/// Initial [`contract::Item`] of a new [`Contract`].
#[derive(Clone, Debug)]
pub struct Item {
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

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'n> Database<
            Select<By<Option<Contract>, &'n contract::Number>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::pricing::Current, Vec<product::Id>>>,
            Ok = read::pricing::Current,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Insert<contract::Item>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = (Contract, Vec<contract::Item>);
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            number,
            customer_id,
            kind,
            status,
            start_date,
            end_date,
            earliest_end_date,
            monthly_amount,
            deposit_amount,
            deposit_paid,
            deposit_refunded,
            notes,
            items,
        } = cmd;

        let earliest_end_date = match earliest_end_date {
            Some(date) => date,
            None => kind
                .earliest_end_date(start_date)
                .ok_or(E::StartDateOutOfRange)
                .map_err(tracerr::wrap!())?,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::<Option<Contract>, _>::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NumberOccupied(number)));
        }

        let monthly_amount = if let Some(amount) = monthly_amount {
            amount
        } else {
            let current = tx
                .execute(Select(By::<read::pricing::Current, _>::new(
                    items.iter().map(|i| i.product_id.clone()).collect(),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            monthly_amount_of(kind, &items, &current)
                .map_err(tracerr::wrap!())?
        };

        let now = DateTime::now();
        let contract = Contract {
            id: contract::Id::new(),
            number,
            customer_id,
            kind,
            status,
            start_date,
            end_date,
            earliest_end_date,
            monthly_amount,
            deposit_amount,
            deposit_paid,
            deposit_refunded,
            notes,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            deleted_at: None,
        };

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(Some(
                    database::CONTRACT_NUMBER_CONSTRAINT,
                )) {
                    tracerr::new!(E::NumberOccupied(contract.number.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map(drop)?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let item = contract::Item {
                id: contract::item::Id::new(),
                contract_id: contract.id,
                product_id: item.product_id,
                quantity: item.quantity,
                serial_number: item.serial_number,
                condition_on_delivery: item.condition_on_delivery,
                condition_on_return: None,
                created_at: now.coerce(),
                updated_at: now.coerce(),
                deleted_at: None,
            };
            tx.execute(Insert(item.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            created.push(item);
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok((contract, created))
    }
}

/// Calculates the monthly amount of the provided [`Item`]s rented as the
/// provided [`contract::Kind`].
///
/// # Errors
///
/// If any [`Item`] has no available price, or on overflow.
fn monthly_amount_of(
    kind: contract::Kind,
    items: &[Item],
    current: &read::pricing::Current,
) -> Result<Money, ExecutionError> {
    use ExecutionError as E;

    items.iter().try_fold(Money::ZERO, |total, item| {
        let price = current
            .get(&item.product_id)
            .and_then(|p| p.monthly_price(kind))
            .ok_or_else(|| E::PricingUnavailable(item.product_id.clone()))?;
        price
            .checked_mul(item.quantity.get())
            .and_then(|amount| total.checked_add(amount))
            .ok_or(E::MonthlyAmountOverflow)
    })
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Calculated monthly amount doesn't fit into [`Money`].
    #[display("Monthly amount is out of range")]
    MonthlyAmountOverflow,

    /// [`contract::Number`] is occupied already.
    #[display("`Contract(number: {_0})` exists already")]
    NumberOccupied(#[error(not(source))] contract::Number),

    /// [`Product`] has no available price for the [`contract::Kind`].
    ///
    /// [`Product`]: crate::domain::Product
    #[display("`Product(id: {_0})` has no available price")]
    PricingUnavailable(#[error(not(source))] product::Id),

    /// Earliest end date is out of range.
    #[display("Earliest end date of the `Contract` is out of range")]
    StartDateOutOfRange,
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        command::{
            create_contract::Item,
            fixture::{create_contract, date, service},
            CreateContract, CreateRentalPricing,
        },
        domain::{contract, product},
        query, read, Command as _, Query as _,
    };

    use super::ExecutionError;

    fn item(product_id: &str, quantity: u32) -> Item {
        Item {
            product_id: product::Id::new(product_id).unwrap(),
            quantity: contract::item::Quantity::new(quantity).unwrap(),
            serial_number: None,
            condition_on_delivery: None,
        }
    }

    fn price(product_id: &str, flex: &str, year: &str) -> CreateRentalPricing {
        CreateRentalPricing {
            product_id: product::Id::new(product_id).unwrap(),
            flex_monthly_price: Some(flex.parse().unwrap()),
            year_monthly_price: Some(year.parse().unwrap()),
            deposit_amount: None,
            flex_available: true,
            year_available: true,
        }
    }

    #[tokio::test]
    async fn derives_earliest_end_date_from_kind() {
        let service = service();

        let (flex, _) = service
            .execute(CreateContract {
                start_date: date("2026-01-31"),
                ..create_contract("RC-1")
            })
            .await
            .unwrap();
        assert_eq!(flex.earliest_end_date, date("2026-04-30"));
        assert_eq!(flex.status, contract::Status::Pending);

        let (jaar, _) = service
            .execute(CreateContract {
                kind: contract::Kind::Jaar,
                start_date: date("2026-03-15"),
                ..create_contract("RC-2")
            })
            .await
            .unwrap();
        assert_eq!(jaar.earliest_end_date, date("2027-03-15"));

        let (explicit, _) = service
            .execute(CreateContract {
                earliest_end_date: Some(date("2026-02-28")),
                ..create_contract("RC-3")
            })
            .await
            .unwrap();
        assert_eq!(explicit.earliest_end_date, date("2026-02-28"));
    }

    #[tokio::test]
    async fn creates_every_item() {
        let service = service();

        let (contract, items) = service
            .execute(CreateContract {
                items: vec![item("prod_1", 1), item("prod_2", 2), {
                    let mut i = item("prod_3", 1);
                    i.serial_number = Some(
                        contract::item::SerialNumber::new("ABC123").unwrap(),
                    );
                    i
                }],
                ..create_contract("RC-1")
            })
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.contract_id == contract.id));

        let stored = service
            .execute(query::contract::Items::by(contract.id))
            .await
            .unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[1].quantity.get(), 2);
        assert_eq!(
            stored[2].serial_number.as_ref().map(ToString::to_string),
            Some("ABC123".to_owned()),
        );
    }

    #[tokio::test]
    async fn rejects_occupied_number() {
        let service = service();
        _ = service.execute(create_contract("RC-1")).await.unwrap();

        let err = service
            .execute(create_contract(" RC-1 "))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NumberOccupied(_)));
        assert_eq!(
            service
                .execute(query::contract::List::by(
                    read::contract::list::Filter::default()
                ))
                .await
                .unwrap()
                .len(),
            1,
        );
    }

    #[tokio::test]
    async fn calculates_monthly_amount_when_omitted() {
        let service = service();
        _ = service
            .execute(price("prod_1", "89.99", "69.99"))
            .await
            .unwrap();
        _ = service
            .execute(price("prod_2", "20", "15"))
            .await
            .unwrap();
        // Later duplicates don't replace the current pricing.
        _ = service
            .execute(price("prod_1", "1000", "1000"))
            .await
            .unwrap();

        let (contract, _) = service
            .execute(CreateContract {
                kind: contract::Kind::Jaar,
                monthly_amount: None,
                items: vec![item("prod_1", 2), item("prod_2", 1)],
                ..create_contract("RC-1")
            })
            .await
            .unwrap();

        assert_eq!(contract.monthly_amount, "154.98".parse::<Money>().unwrap());
    }

    #[tokio::test]
    async fn fails_without_available_pricing() {
        let service = service();
        let mut unavailable = price("prod_1", "89.99", "69.99");
        unavailable.flex_available = false;
        _ = service.execute(unavailable).await.unwrap();

        let err = service
            .execute(CreateContract {
                monthly_amount: None,
                ..create_contract("RC-1")
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PricingUnavailable(id)
                if id.to_string() == "prod_1",
        ));
        assert!(service
            .execute(query::contract::List::by(
                read::contract::list::Filter::default()
            ))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn trusts_provided_monthly_amount() {
        let service = service();

        let (contract, _) = service
            .execute(create_contract("RC-1"))
            .await
            .unwrap();

        assert_eq!(contract.monthly_amount, "89.99".parse::<Money>().unwrap());
        assert_eq!(contract.deposit_amount, "500".parse::<Money>().unwrap());
    }
}
