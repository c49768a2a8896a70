//! [`QuoteRequest`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::{Json, ToSql};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{quote_request, QuoteRequest},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`QuoteRequest`] out of the provided [`Row`].
fn from_row(row: &Row) -> QuoteRequest {
    let Json(requested_items) = row.get("requested_items");
    QuoteRequest {
        id: row.get("id"),
        company_name: row.get("company_name"),
        contact_person: row.get("contact_person"),
        email: row.get("email"),
        phone: row.get("phone"),
        desired_period_start: row.get("desired_period_start"),
        desired_period_end: row.get("desired_period_end"),
        requested_items,
        status: row.get("status"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<QuoteRequest>, quote_request::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<QuoteRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<QuoteRequest>, quote_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quote_request::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, company_name, contact_person, email, phone, \
                   desired_period_start, desired_period_end, \
                   requested_items, status, notes, \
                   created_at, updated_at \
            FROM quote_request \
            WHERE id = $1::UUID";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C>
    Database<Select<By<Vec<QuoteRequest>, read::quote_request::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<QuoteRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<QuoteRequest>, read::quote_request::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote_request::list::Filter { status } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id, company_name, contact_person, email, phone, \
                    desired_period_start, desired_period_end, \
                    requested_items, status, notes, \
                    created_at, updated_at \
             FROM quote_request \
             {status_filtering} \
             ORDER BY created_at ASC, id ASC",
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("WHERE status = ${idx}::VARCHAR"))
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

impl<C> Database<Insert<QuoteRequest>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<QuoteRequest>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<QuoteRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(request))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<QuoteRequest>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<QuoteRequest>,
    ) -> Result<Self::Ok, Self::Err> {
        let QuoteRequest {
            id,
            company_name,
            contact_person,
            email,
            phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status,
            notes,
            created_at,
            updated_at,
        } = request;
        let requested_items = Json(requested_items);

        // Requester details are immutable.
        const SQL: &str = "\
            INSERT INTO quote_request (\
                id, company_name, contact_person, email, phone, \
                desired_period_start, desired_period_end, \
                requested_items, status, notes, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                $6::TIMESTAMPTZ, $7::TIMESTAMPTZ, \
                $8::JSONB, $9::VARCHAR, $10::TEXT, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET requested_items = EXCLUDED.requested_items, \
                status = EXCLUDED.status, \
                notes = EXCLUDED.notes, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &company_name,
                &contact_person,
                &email,
                &phone,
                &desired_period_start,
                &desired_period_end,
                &requested_items,
                &status,
                &notes,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<QuoteRequest, quote_request::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<QuoteRequest, quote_request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quote_request::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM quote_request \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
