//! [`Product`]-related [`Database`] implementations.

use common::operations::{By, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`Product`] out of the provided [`Row`].
fn from_row(row: &Row) -> Product {
    Product {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        handle: row.get("handle"),
        thumbnail: row.get("thumbnail"),
        status: row.get("status"),
    }
}

/// Builds [`product::Attributes`] out of the provided [`Row`].
///
/// Returns [`None`] if the [`Row`] has no joined [`product::Attributes`].
fn attributes_from_row(row: &Row) -> Option<product::Attributes> {
    Some(product::Attributes {
        product_id: row.get::<_, Option<_>>("attributes_product_id")?,
        specification: product::Specification {
            processor_type: row.get("processor_type"),
            processor_family: row.get("processor_family"),
            ram_size: row.get("ram_size"),
            storage_capacity: row.get("storage_capacity"),
            storage_type: row.get("storage_type"),
            screen_size: row.get("screen_size"),
            screen_resolution: row.get("screen_resolution"),
            graphics_type: row.get("graphics_type"),
            graphics_card: row.get("graphics_card"),
            condition: row.get("condition"),
            operating_system: row.get("operating_system"),
        },
        created_at: row.get("attributes_created_at"),
        updated_at: row.get("attributes_updated_at"),
    })
}

impl<C> Database<Select<By<Option<Product>, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, title, description, handle, thumbnail, status \
            FROM product \
            WHERE id = $1::VARCHAR";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Option<product::Attributes>, product::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<product::Attributes>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<product::Attributes>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            SELECT product_id AS attributes_product_id, \
                   processor_type, processor_family, \
                   ram_size, storage_capacity, storage_type, \
                   screen_size, screen_resolution, \
                   graphics_type, graphics_card, \
                   condition, operating_system, \
                   created_at AS attributes_created_at, \
                   updated_at AS attributes_updated_at \
            FROM product_attributes \
            WHERE product_id = $1::VARCHAR";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().and_then(attributes_from_row))
    }
}

impl<C>
    Database<
        Select<
            By<Vec<read::product::WithAttributes>, read::product::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::product::WithAttributes>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::product::WithAttributes>, read::product::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::product::list::Filter { status } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT p.id, p.title, p.description, p.handle, p.thumbnail, \
                    p.status, \
                    a.product_id AS attributes_product_id, \
                    a.processor_type, a.processor_family, \
                    a.ram_size, a.storage_capacity, a.storage_type, \
                    a.screen_size, a.screen_resolution, \
                    a.graphics_type, a.graphics_card, \
                    a.condition, a.operating_system, \
                    a.created_at AS attributes_created_at, \
                    a.updated_at AS attributes_updated_at \
             FROM product AS p \
             LEFT JOIN product_attributes AS a ON a.product_id = p.id \
             {status_filtering} \
             ORDER BY p.id ASC",
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("WHERE p.status = ${idx}::VARCHAR"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::product::WithAttributes {
                product: from_row(row),
                attributes: attributes_from_row(row),
            })
            .collect())
    }
}

impl<C> Database<Update<product::Attributes>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(attributes): Update<product::Attributes>,
    ) -> Result<Self::Ok, Self::Err> {
        let product::Attributes {
            product_id,
            specification:
                product::Specification {
                    processor_type,
                    processor_family,
                    ram_size,
                    storage_capacity,
                    storage_type,
                    screen_size,
                    screen_resolution,
                    graphics_type,
                    graphics_card,
                    condition,
                    operating_system,
                },
            created_at,
            updated_at,
        } = attributes;

        const SQL: &str = "\
            INSERT INTO product_attributes (\
                product_id, \
                processor_type, processor_family, \
                ram_size, storage_capacity, storage_type, \
                screen_size, screen_resolution, \
                graphics_type, graphics_card, \
                condition, operating_system, \
                created_at, updated_at\
            ) VALUES (\
                $1::VARCHAR, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::INT4, $5::INT4, $6::VARCHAR, \
                $7::NUMERIC, $8::VARCHAR, \
                $9::VARCHAR, $10::VARCHAR, \
                $11::VARCHAR, $12::VARCHAR, \
                $13::TIMESTAMPTZ, $14::TIMESTAMPTZ\
            ) \
            ON CONFLICT (product_id) DO UPDATE \
            SET processor_type = EXCLUDED.processor_type, \
                processor_family = EXCLUDED.processor_family, \
                ram_size = EXCLUDED.ram_size, \
                storage_capacity = EXCLUDED.storage_capacity, \
                storage_type = EXCLUDED.storage_type, \
                screen_size = EXCLUDED.screen_size, \
                screen_resolution = EXCLUDED.screen_resolution, \
                graphics_type = EXCLUDED.graphics_type, \
                graphics_card = EXCLUDED.graphics_card, \
                condition = EXCLUDED.condition, \
                operating_system = EXCLUDED.operating_system, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &product_id,
                &processor_type,
                &processor_family,
                &ram_size,
                &storage_capacity,
                &storage_type,
                &screen_size,
                &screen_resolution,
                &graphics_type,
                &graphics_card,
                &condition,
                &operating_system,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
