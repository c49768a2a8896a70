//! [`Command`] for setting [`product::Attributes`] of a [`Product`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting [`product::Attributes`] of a [`Product`],
/// replacing the previous ones entirely.
#[derive(Clone, Debug)]
pub struct SetProductAttributes {
    /// ID of the described [`Product`].
    pub product_id: product::Id,

    /// New [`product::Specification`].
    pub specification: product::Specification,
}

impl<Db> Command<SetProductAttributes> for Service<Db>
where
    Db: Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<product::Attributes>, product::Id>>,
            Ok = Option<product::Attributes>,
            Err = Traced<database::Error>,
        > + Database<
            Update<product::Attributes>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = product::Attributes;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetProductAttributes,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetProductAttributes {
            product_id,
            specification,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Product>, _>::new(product_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ProductNotExists(product_id.clone()))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = self
            .database()
            .execute(Select(By::<Option<product::Attributes>, _>::new(
                product_id.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let attributes = product::Attributes {
            product_id,
            specification,
            created_at: existing.map_or_else(|| now.coerce(), |a| a.created_at),
            updated_at: now.coerce(),
        };

        self.database()
            .execute(Update(attributes.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(attributes)
    }
}

/// Error of [`SetProductAttributes`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{published_product, service},
            SetProductAttributes,
        },
        domain::product::{self as p, Gigabytes, ProcessorFamily},
        query, read, Command as _, Query as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn joins_attributes_to_published_products() {
        let service = service();
        service
            .database()
            .put_product(published_product("prod_1"))
            .await;
        service
            .database()
            .put_product(published_product("prod_2"))
            .await;
        service
            .database()
            .put_product(p::Product {
                status: p::Status::Draft,
                ..published_product("prod_3")
            })
            .await;

        let first = service
            .execute(SetProductAttributes {
                product_id: p::Id::new("prod_1").unwrap(),
                specification: p::Specification {
                    ram_size: Gigabytes::new(8),
                    ..p::Specification::default()
                },
            })
            .await
            .unwrap();
        let second = service
            .execute(SetProductAttributes {
                product_id: p::Id::new("prod_1").unwrap(),
                specification: p::Specification {
                    processor_family: Some(ProcessorFamily::IntelCoreI7),
                    ram_size: Gigabytes::new(16),
                    ..p::Specification::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(second.created_at, first.created_at);

        let listed = service
            .execute(query::product::WithAttributes::by(
                read::product::list::Filter::PUBLISHED,
            ))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        let with = listed
            .iter()
            .find(|p| p.product.id.to_string() == "prod_1")
            .unwrap();
        let spec = &with.attributes.as_ref().unwrap().specification;
        assert_eq!(spec.ram_size.map(Gigabytes::get), Some(16));
        assert_eq!(spec.processor_family, Some(ProcessorFamily::IntelCoreI7));
        let without = listed
            .iter()
            .find(|p| p.product.id.to_string() == "prod_2")
            .unwrap();
        assert!(without.attributes.is_none());
    }

    #[tokio::test]
    async fn fails_on_unknown_product() {
        let err = service()
            .execute(SetProductAttributes {
                product_id: p::Id::new("prod_404").unwrap(),
                specification: p::Specification::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ProductNotExists(_)));
    }
}
