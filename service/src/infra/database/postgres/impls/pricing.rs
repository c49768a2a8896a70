//! [`RentalPricing`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{pricing, product, RentalPricing},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`RentalPricing`] out of the provided [`Row`].
fn from_row(row: &Row) -> RentalPricing {
    RentalPricing {
        id: row.get("id"),
        product_id: row.get("product_id"),
        flex_monthly_price: row.get("flex_monthly_price"),
        year_monthly_price: row.get("year_monthly_price"),
        deposit_amount: row.get("deposit_amount"),
        flex_available: row.get("flex_available"),
        year_available: row.get("year_available"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<RentalPricing>, pricing::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RentalPricing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentalPricing>, pricing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: pricing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, product_id, \
                   flex_monthly_price, year_monthly_price, deposit_amount, \
                   flex_available, year_available, \
                   created_at, updated_at, deleted_at \
            FROM rental_pricing \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<RentalPricing>, read::pricing::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RentalPricing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RentalPricing>, read::pricing::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::pricing::list::Filter { product_id } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let product_id_idx = product_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT id, product_id, \
                    flex_monthly_price, year_monthly_price, deposit_amount, \
                    flex_available, year_available, \
                    created_at, updated_at, deleted_at \
             FROM rental_pricing \
             WHERE deleted_at IS NULL \
                   {product_filtering} \
             ORDER BY created_at ASC, id ASC",
            product_filtering =
                product_id_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND product_id = ${idx}::VARCHAR"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::pricing::Current, Vec<product::Id>>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::pricing::Current;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::pricing::Current, Vec<product::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let product_ids = by.into_inner();
        if product_ids.is_empty() {
            return Ok(read::pricing::Current::new());
        }

        const SQL: &str = "\
            SELECT DISTINCT ON (product_id) \
                   id, product_id, \
                   flex_monthly_price, year_monthly_price, deposit_amount, \
                   flex_available, year_available, \
                   created_at, updated_at, deleted_at \
            FROM rental_pricing \
            WHERE product_id = ANY($1::VARCHAR[]) \
              AND deleted_at IS NULL \
            ORDER BY product_id, created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&product_ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let pricing = from_row(row);
                (pricing.product_id.clone(), pricing)
            })
            .collect())
    }
}

impl<C> Database<Insert<RentalPricing>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<RentalPricing>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(pricing): Insert<RentalPricing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(pricing))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<RentalPricing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(pricing): Update<RentalPricing>,
    ) -> Result<Self::Ok, Self::Err> {
        let RentalPricing {
            id,
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
            created_at,
            updated_at,
            deleted_at,
        } = pricing;

        const SQL: &str = "\
            INSERT INTO rental_pricing (\
                id, product_id, \
                flex_monthly_price, year_monthly_price, deposit_amount, \
                flex_available, year_available, \
                created_at, updated_at, deleted_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, \
                $3::NUMERIC, $4::NUMERIC, $5::NUMERIC, \
                $6::BOOLEAN, $7::BOOLEAN, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET flex_monthly_price = EXCLUDED.flex_monthly_price, \
                year_monthly_price = EXCLUDED.year_monthly_price, \
                deposit_amount = EXCLUDED.deposit_amount, \
                flex_available = EXCLUDED.flex_available, \
                year_available = EXCLUDED.year_available, \
                updated_at = EXCLUDED.updated_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &product_id,
                &flex_monthly_price,
                &year_monthly_price,
                &deposit_amount,
                &flex_available,
                &year_available,
                &created_at,
                &updated_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
