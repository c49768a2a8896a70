//! In-memory [`Database`] implementation.
//!
//! Honours the same soft-deletion, uniqueness and transaction semantics as
//! [`Postgres`] does, so is suitable for exercising [`Command`]s in tests.
//!
//! [`Command`]: crate::Command
//! [`Postgres`]: super::Postgres

use std::sync::Arc;

use common::operations::{By, Commit, Delete, Insert, Select, Transact, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, MutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        contract, pricing, product, quote_request, Contract, Product,
        QuoteRequest, RentalPricing, RentalReturn,
    },
    infra::{
        database::{self, CONTRACT_NUMBER_CONSTRAINT},
        Database,
    },
    read,
};

/// In-memory [`Database`].
///
/// Writes of a [`Transact`]ed [`Memory`] are staged on a snapshot and only
/// become visible to others on [`Commit`], which replaces the whole state
/// with the snapshot. Concurrent transactions are therefore last-write-wins.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Committed [`State`].
    committed: Arc<Mutex<State>>,

    /// [`State`] staged by a transaction, if any.
    staged: Option<Arc<Mutex<State>>>,
}

/// Stored rows, in creation order.
#[derive(Clone, Debug, Default)]
struct State {
    /// [`RentalPricing`] rows.
    pricings: Vec<RentalPricing>,

    /// [`Contract`] rows.
    contracts: Vec<Contract>,

    /// [`contract::Item`] rows.
    items: Vec<contract::Item>,

    /// [`RentalReturn`] rows.
    returns: Vec<RentalReturn>,

    /// [`QuoteRequest`] rows.
    quote_requests: Vec<QuoteRequest>,

    /// [`Product`] rows.
    products: Vec<Product>,

    /// [`product::Attributes`] rows.
    attributes: Vec<product::Attributes>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the provided [`Product`], replacing the one with the same ID.
    ///
    /// [`Product`]s are maintained by the commerce platform, so there is no
    /// [`Command`] for this.
    ///
    /// [`Command`]: crate::Command
    pub async fn put_product(&self, product: Product) {
        let mut state = self.state().await;
        upsert(&mut state.products, product, |p, n| p.id == n.id);
    }

    /// Locks the [`State`] this [`Memory`] operates on.
    async fn state(&self) -> MutexGuard<'_, State> {
        self.staged
            .as_ref()
            .unwrap_or(&self.committed)
            .lock()
            .await
    }
}

/// Replaces the row `same` as the provided one, or appends it.
fn upsert<T>(rows: &mut Vec<T>, row: T, same: impl Fn(&T, &T) -> bool) {
    if let Some(existing) = rows.iter_mut().find(|r| same(r, &row)) {
        *existing = row;
    } else {
        rows.push(row);
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Unique constraint is violated.
    #[display("Unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation(c) => constraint.map_or(true, |n| n == *c),
        }
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        if self.staged.is_some() {
            return Ok(self.clone());
        }
        let snapshot = self.committed.lock().await.clone();
        Ok(Self {
            committed: Arc::clone(&self.committed),
            staged: Some(Arc::new(Mutex::new(snapshot))),
        })
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(staged) = &self.staged {
            let snapshot = staged.lock().await.clone();
            *self.committed.lock().await = snapshot;
        }
        Ok(())
    }
}

impl Database<Select<By<Option<RentalPricing>, pricing::Id>>> for Memory {
    type Ok = Option<RentalPricing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentalPricing>, pricing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .pricings
            .iter()
            .find(|p| p.id == id && !p.is_deleted())
            .cloned())
    }
}

impl Database<Select<By<Vec<RentalPricing>, read::pricing::list::Filter>>>
    for Memory
{
    type Ok = Vec<RentalPricing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RentalPricing>, read::pricing::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .state()
            .await
            .pricings
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

impl Database<Select<By<read::pricing::Current, Vec<product::Id>>>>
    for Memory
{
    type Ok = read::pricing::Current;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::pricing::Current, Vec<product::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let mut current = read::pricing::Current::new();
        for p in &self.state().await.pricings {
            if !p.is_deleted()
                && ids.contains(&p.product_id)
                && !current.contains_key(&p.product_id)
            {
                drop(current.insert(p.product_id.clone(), p.clone()));
            }
        }
        Ok(current)
    }
}

impl Database<Insert<RentalPricing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(pricing): Insert<RentalPricing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(pricing)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Update<RentalPricing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(pricing): Update<RentalPricing>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        upsert(&mut state.pricings, pricing, |p, n| p.id == n.id);
        Ok(())
    }
}

impl Database<Select<By<Option<Contract>, contract::Id>>> for Memory {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .contracts
            .iter()
            .find(|c| c.id == id && !c.is_deleted())
            .cloned())
    }
}

impl<'n> Database<Select<By<Option<Contract>, &'n contract::Number>>>
    for Memory
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, &'n contract::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        Ok(self
            .state()
            .await
            .contracts
            .iter()
            .find(|c| c.number == *number && !c.is_deleted())
            .cloned())
    }
}

impl Database<Select<By<Vec<Contract>, read::contract::list::Filter>>>
    for Memory
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, read::contract::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .state()
            .await
            .contracts
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Contract>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Update<Contract>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        let occupied = !contract.is_deleted()
            && state.contracts.iter().any(|c| {
                c.id != contract.id
                    && !c.is_deleted()
                    && c.number == contract.number
            });
        if occupied {
            return Err(tracerr::new!(database::Error::from(
                Error::UniqueViolation(CONTRACT_NUMBER_CONSTRAINT)
            )));
        }
        upsert(&mut state.contracts, contract, |c, n| c.id == n.id);
        Ok(())
    }
}

impl Database<Select<By<Option<contract::Item>, contract::item::Id>>>
    for Memory
{
    type Ok = Option<contract::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<contract::Item>, contract::item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .items
            .iter()
            .find(|i| i.id == id && !i.is_deleted())
            .cloned())
    }
}

impl Database<Select<By<Vec<contract::Item>, contract::Id>>> for Memory {
    type Ok = Vec<contract::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<contract::Item>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract_id = by.into_inner();
        Ok(self
            .state()
            .await
            .items
            .iter()
            .filter(|i| i.contract_id == contract_id && !i.is_deleted())
            .cloned()
            .collect())
    }
}

impl Database<Insert<contract::Item>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<contract::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(item)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Update<contract::Item>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<contract::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        upsert(&mut state.items, item, |i, n| i.id == n.id);
        Ok(())
    }
}

impl Database<Select<By<Vec<RentalReturn>, read::rental_return::list::Filter>>>
    for Memory
{
    type Ok = Vec<RentalReturn>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<RentalReturn>, read::rental_return::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .state()
            .await
            .returns
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

impl Database<Insert<RentalReturn>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental_return): Insert<RentalReturn>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        upsert(&mut state.returns, rental_return, |r, n| r.id == n.id);
        Ok(())
    }
}

impl Database<Select<By<Option<QuoteRequest>, quote_request::Id>>>
    for Memory
{
    type Ok = Option<QuoteRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<QuoteRequest>, quote_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .quote_requests
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }
}

impl Database<Select<By<Vec<QuoteRequest>, read::quote_request::list::Filter>>>
    for Memory
{
    type Ok = Vec<QuoteRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<QuoteRequest>, read::quote_request::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .state()
            .await
            .quote_requests
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }
}

impl Database<Insert<QuoteRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<QuoteRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(request)).await.map_err(tracerr::wrap!())
    }
}

impl Database<Update<QuoteRequest>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<QuoteRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        upsert(&mut state.quote_requests, request, |q, n| q.id == n.id);
        Ok(())
    }
}

impl Database<Delete<By<QuoteRequest, quote_request::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<QuoteRequest, quote_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().await.quote_requests.retain(|q| q.id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<Product>, product::Id>>> for Memory {
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

impl Database<Select<By<Option<product::Attributes>, product::Id>>>
    for Memory
{
    type Ok = Option<product::Attributes>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<product::Attributes>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .await
            .attributes
            .iter()
            .find(|a| a.product_id == id)
            .cloned())
    }
}

impl
    Database<
        Select<
            By<Vec<read::product::WithAttributes>, read::product::list::Filter>,
        >,
    > for Memory
{
    type Ok = Vec<read::product::WithAttributes>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::product::WithAttributes>, read::product::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let state = self.state().await;
        Ok(state
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .map(|p| read::product::WithAttributes {
                product: p.clone(),
                attributes: state
                    .attributes
                    .iter()
                    .find(|a| a.product_id == p.id)
                    .cloned(),
            })
            .collect())
    }
}

impl Database<Update<product::Attributes>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(attributes): Update<product::Attributes>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state().await;
        upsert(&mut state.attributes, attributes, |a, n| {
            a.product_id == n.product_id
        });
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        DateTime, Money,
    };

    use crate::{
        domain::{contract, customer, Contract},
        infra::{database::CONTRACT_NUMBER_CONSTRAINT, Database as _},
        read,
    };

    use super::Memory;

    fn contract(number: &str) -> Contract {
        let start = DateTime::parse("2026-02-01").unwrap().coerce();
        Contract {
            id: contract::Id::new(),
            number: contract::Number::new(number).unwrap(),
            customer_id: customer::Id::new("cus_1").unwrap(),
            kind: contract::Kind::Flex,
            status: contract::Status::Pending,
            start_date: start,
            end_date: None,
            earliest_end_date: contract::Kind::Flex
                .earliest_end_date(start)
                .unwrap(),
            monthly_amount: Money::ZERO,
            deposit_amount: Money::ZERO,
            deposit_paid: false,
            deposit_refunded: false,
            notes: None,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    async fn list(db: &Memory) -> Vec<Contract> {
        db.execute(Select(By::new(read::contract::list::Filter::default())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn discards_uncommitted_writes() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(contract("RC-1"))).await.unwrap();
        assert_eq!(list(&tx).await.len(), 1);
        assert!(list(&db).await.is_empty());
        drop(tx);
        assert!(list(&db).await.is_empty());

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(contract("RC-1"))).await.unwrap();
        tx.execute(Commit).await.unwrap();
        assert_eq!(list(&db).await.len(), 1);
    }

    #[tokio::test]
    async fn keeps_numbers_unique_among_non_deleted() {
        let db = Memory::new();
        let mut first = contract("RC-1");
        db.execute(Insert(first.clone())).await.unwrap();

        let err = db.execute(Insert(contract("RC-1"))).await.unwrap_err();
        assert!(err
            .as_ref()
            .is_unique_violation(Some(CONTRACT_NUMBER_CONSTRAINT)));

        first.deleted_at = Some(DateTime::now().coerce());
        db.execute(Insert(first)).await.unwrap();
        db.execute(Insert(contract("RC-1"))).await.unwrap();
        assert_eq!(list(&db).await.len(), 1);
    }
}
