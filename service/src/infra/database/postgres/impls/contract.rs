//! [`Contract`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`Contract`] out of the provided [`Row`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        number: row.get("contract_number"),
        customer_id: row.get("customer_id"),
        kind: row.get("type"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        earliest_end_date: row.get("earliest_end_date"),
        monthly_amount: row.get("monthly_amount"),
        deposit_amount: row.get("deposit_amount"),
        deposit_paid: row.get("deposit_paid"),
        deposit_refunded: row.get("deposit_refunded"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, contract_number, customer_id, type, status, \
                   start_date, end_date, earliest_end_date, \
                   monthly_amount, deposit_amount, \
                   deposit_paid, deposit_refunded, \
                   notes, \
                   created_at, updated_at, deleted_at \
            FROM rental_contract \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'n, C> Database<Select<By<Option<Contract>, &'n contract::Number>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, &'n contract::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let number: &contract::Number = by.into_inner();

        const SQL: &str = "\
            SELECT id, contract_number, customer_id, type, status, \
                   start_date, end_date, earliest_end_date, \
                   monthly_amount, deposit_amount, \
                   deposit_paid, deposit_refunded, \
                   notes, \
                   created_at, updated_at, deleted_at \
            FROM rental_contract \
            WHERE contract_number = $1::VARCHAR \
              AND deleted_at IS NULL";
        self.query_opt(SQL, &[number])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Contract>, read::contract::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, read::contract::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::contract::list::Filter {
            customer_id,
            status,
            kind,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let customer_id_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });

        let sql = format!(
            "SELECT id, contract_number, customer_id, type, status, \
                    start_date, end_date, earliest_end_date, \
                    monthly_amount, deposit_amount, \
                    deposit_paid, deposit_refunded, \
                    notes, \
                    created_at, updated_at, deleted_at \
             FROM rental_contract \
             WHERE deleted_at IS NULL \
                   {customer_filtering} \
                   {status_filtering} \
                   {kind_filtering} \
             ORDER BY created_at ASC, id ASC",
            customer_filtering =
                customer_id_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::VARCHAR"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::VARCHAR"))
                }),
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND type = ${idx}::VARCHAR"))
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

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
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
            created_at,
            updated_at,
            deleted_at,
        } = contract;

        // `contract_number`, `customer_id` and `type` are immutable.
        const SQL: &str = "\
            INSERT INTO rental_contract (\
                id, contract_number, customer_id, type, status, \
                start_date, end_date, earliest_end_date, \
                monthly_amount, deposit_amount, \
                deposit_paid, deposit_refunded, \
                notes, \
                created_at, updated_at, deleted_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::TIMESTAMPTZ, $7::TIMESTAMPTZ, $8::TIMESTAMPTZ, \
                $9::NUMERIC, $10::NUMERIC, \
                $11::BOOLEAN, $12::BOOLEAN, \
                $13::TEXT, \
                $14::TIMESTAMPTZ, $15::TIMESTAMPTZ, $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                earliest_end_date = EXCLUDED.earliest_end_date, \
                monthly_amount = EXCLUDED.monthly_amount, \
                deposit_amount = EXCLUDED.deposit_amount, \
                deposit_paid = EXCLUDED.deposit_paid, \
                deposit_refunded = EXCLUDED.deposit_refunded, \
                notes = EXCLUDED.notes, \
                updated_at = EXCLUDED.updated_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &customer_id,
                &kind,
                &status,
                &start_date,
                &end_date,
                &earliest_end_date,
                &monthly_amount,
                &deposit_amount,
                &deposit_paid,
                &deposit_refunded,
                &notes,
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

/// Builds a [`contract::Item`] out of the provided [`Row`].
fn item_from_row(row: &Row) -> contract::Item {
    contract::Item {
        id: row.get("id"),
        contract_id: row.get("contract_id"),
        product_id: row.get("product_id"),
        quantity: row.get("quantity"),
        serial_number: row.get("serial_number"),
        condition_on_delivery: row.get("condition_on_delivery"),
        condition_on_return: row.get("condition_on_return"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

impl<C> Database<Select<By<Option<contract::Item>, contract::item::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<contract::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<contract::Item>, contract::item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::item::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, contract_id, product_id, quantity, \
                   serial_number, \
                   condition_on_delivery, condition_on_return, \
                   created_at, updated_at, deleted_at \
            FROM rental_contract_item \
            WHERE id = $1::UUID \
              AND deleted_at IS NULL";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(item_from_row))
    }
}

impl<C> Database<Select<By<Vec<contract::Item>, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<contract::Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<contract::Item>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let contract_id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, contract_id, product_id, quantity, \
                   serial_number, \
                   condition_on_delivery, condition_on_return, \
                   created_at, updated_at, deleted_at \
            FROM rental_contract_item \
            WHERE contract_id = $1::UUID \
              AND deleted_at IS NULL \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&contract_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(item_from_row)
            .collect())
    }
}

impl<C> Database<Insert<contract::Item>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<contract::Item>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<contract::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(item)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<contract::Item>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<contract::Item>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract::Item {
            id,
            contract_id,
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return,
            created_at,
            updated_at,
            deleted_at,
        } = item;

        // `contract_id` and `product_id` are immutable.
        const SQL: &str = "\
            INSERT INTO rental_contract_item (\
                id, contract_id, product_id, quantity, \
                serial_number, \
                condition_on_delivery, condition_on_return, \
                created_at, updated_at, deleted_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::INT4, \
                $5::VARCHAR, \
                $6::TEXT, $7::TEXT, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET quantity = EXCLUDED.quantity, \
                serial_number = EXCLUDED.serial_number, \
                condition_on_delivery = EXCLUDED.condition_on_delivery, \
                condition_on_return = EXCLUDED.condition_on_return, \
                updated_at = EXCLUDED.updated_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &contract_id,
                &product_id,
                &quantity,
                &serial_number,
                &condition_on_delivery,
                &condition_on_return,
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
