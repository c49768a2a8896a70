//! [`RentalReturn`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::RentalReturn,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`RentalReturn`] out of the provided [`Row`].
fn from_row(row: &Row) -> RentalReturn {
    RentalReturn {
        id: row.get("id"),
        contract_id: row.get("contract_id"),
        return_date: row.get("return_date"),
        condition: row.get("condition"),
        damage_description: row.get("damage_description"),
        deposit_withheld: row.get("deposit_withheld"),
        withhold_reason: row.get("withhold_reason"),
        created_at: row.get("created_at"),
    }
}

impl<C>
    Database<Select<By<Vec<RentalReturn>, read::rental_return::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RentalReturn>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<RentalReturn>, read::rental_return::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental_return::list::Filter { contract_id } =
            by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let contract_id_idx = contract_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT id, contract_id, return_date, \
                    condition, damage_description, \
                    deposit_withheld, withhold_reason, \
                    created_at \
             FROM rental_return \
             {contract_filtering} \
             ORDER BY created_at ASC, id ASC",
            contract_filtering =
                contract_id_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("WHERE contract_id = ${idx}::UUID"))
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

impl<C> Database<Insert<RentalReturn>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental_return): Insert<RentalReturn>,
    ) -> Result<Self::Ok, Self::Err> {
        let RentalReturn {
            id,
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
            created_at,
        } = rental_return;

        const SQL: &str = "\
            INSERT INTO rental_return (\
                id, contract_id, return_date, \
                condition, damage_description, \
                deposit_withheld, withhold_reason, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::TIMESTAMPTZ, \
                $4::TEXT, $5::TEXT, \
                $6::NUMERIC, $7::TEXT, \
                $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &contract_id,
                &return_date,
                &condition,
                &damage_description,
                &deposit_withheld,
                &withhold_reason,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
