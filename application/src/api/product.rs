//! [`Product`] endpoints.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::Path,
    Extension, Json,
};
use serde::Serialize;
use service::{
    command,
    domain::{self, product},
    query, read, Command as _,
};

use crate::{
    context::{Admin, Storefront},
    define_error, AsError, Error, Service,
};

/// Filterable attributes of a [`Product`].
#[derive(Clone, Debug, Serialize)]
pub struct Attributes {
    /// ID of the described [`Product`].
    pub product_id: product::Id,

    /// Hardware specification of the [`Product`].
    #[serde(flatten)]
    pub specification: product::Specification,

    /// Creation time of these [`Attributes`].
    pub created_at: product::CreationDateTime,

    /// Last modification time of these [`Attributes`].
    pub updated_at: product::ModificationDateTime,
}

impl From<product::Attributes> for Attributes {
    fn from(attributes: product::Attributes) -> Self {
        let product::Attributes {
            product_id,
            specification,
            created_at,
            updated_at,
        } = attributes;
        Self {
            product_id,
            specification,
            created_at,
            updated_at,
        }
    }
}

/// Catalog product along with its [`Attributes`].
#[derive(Clone, Debug, Serialize)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: product::Id,

    /// Title of this [`Product`].
    pub title: product::Title,

    /// Description of this [`Product`].
    pub description: Option<String>,

    /// URL handle of this [`Product`].
    pub handle: product::Handle,

    /// Thumbnail URL of this [`Product`].
    pub thumbnail: Option<String>,

    /// Publication status of this [`Product`].
    pub status: product::Status,

    /// [`Attributes`] of this [`Product`], if set already.
    pub attributes: Option<Attributes>,
}

impl From<read::product::WithAttributes> for Product {
    fn from(row: read::product::WithAttributes) -> Self {
        let read::product::WithAttributes {
            product:
                domain::Product {
                    id,
                    title,
                    description,
                    handle,
                    thumbnail,
                    status,
                },
            attributes,
        } = row;
        Self {
            id,
            title,
            description,
            handle,
            thumbnail,
            status,
            attributes: attributes.map(Into::into),
        }
    }
}

/// Response carrying [`Attributes`] of a [`Product`].
#[derive(Clone, Debug, Serialize)]
pub struct SingleAttributes {
    /// The [`Attributes`], if set already.
    pub attributes: Option<Attributes>,
}

/// Response carrying a list of [`Product`]s.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// The [`Product`]s.
    pub products: Vec<Product>,

    /// Number of the listed [`Product`]s.
    pub count: usize,
}

/// Creates or replaces [`Attributes`] of a [`Product`].
#[tracing::instrument(skip_all)]
pub async fn set_attributes(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<product::Id>, PathRejection>,
    body: Result<Json<product::Specification>, JsonRejection>,
) -> Result<Json<SingleAttributes>, Error> {
    let Path(product_id) = id.map_err(AsError::into_error)?;
    let Json(specification) = body.map_err(AsError::into_error)?;

    let attributes = service
        .execute(command::SetProductAttributes {
            product_id,
            specification,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SingleAttributes {
        attributes: Some(attributes.into()),
    }))
}

/// Fetches [`Attributes`] of a [`Product`].
#[tracing::instrument(skip_all)]
pub async fn get_attributes(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<product::Id>, PathRejection>,
) -> Result<Json<SingleAttributes>, Error> {
    let Path(product_id) = id.map_err(AsError::into_error)?;

    drop(
        service
            .execute(query::product::ById::by(product_id.clone()))
            .await
            .map_err(AsError::into_error)?
            .ok_or(ProductError::NotExists)?,
    );
    let attributes = service
        .execute(query::product::Attributes::by(product_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SingleAttributes {
        attributes: attributes.map(Into::into),
    }))
}

/// Lists published [`Product`]s along with their [`Attributes`].
#[tracing::instrument(skip_all)]
pub async fn list_with_attributes(
    _: Storefront,
    Extension(service): Extension<Service>,
) -> Result<Json<List>, Error> {
    let products: Vec<Product> = service
        .execute(query::product::WithAttributes::by(
            read::product::list::Filter::PUBLISHED,
        ))
        .await
        .map_err(AsError::into_error)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(List {
        count: products.len(),
        products,
    }))
}

define_error! {
    enum ProductError {
        #[code = "PRODUCT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Product` does not exist"]
        NotExists,
    }
}

impl AsError for command::set_product_attributes::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductNotExists(_) => Some(ProductError::NotExists.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use service::{
        command,
        domain::{self, product},
        read,
    };

    use super::Product;
    use crate::AsError as _;

    fn laptop() -> domain::Product {
        domain::Product {
            id: product::Id::new("prod_1").unwrap(),
            title: product::Title::new("Dell Latitude 5440").unwrap(),
            description: None,
            handle: product::Handle::new("dell-latitude-5440").unwrap(),
            thumbnail: None,
            status: product::Status::Published,
        }
    }

    #[test]
    fn flattens_attributes() {
        let now = DateTime::now();
        let specification: product::Specification =
            serde_json::from_value(serde_json::json!({
                "processor_family": "intel-core-i7",
                "ram_size": 16,
                "storage_type": "NVMe",
                "screen_size": 14.0,
            }))
            .unwrap();

        let product = Product::from(read::product::WithAttributes {
            product: laptop(),
            attributes: Some(product::Attributes {
                product_id: product::Id::new("prod_1").unwrap(),
                specification,
                created_at: now.coerce(),
                updated_at: now.coerce(),
            }),
        });

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["handle"], "dell-latitude-5440");
        assert_eq!(json["attributes"]["product_id"], "prod_1");
        assert_eq!(json["attributes"]["ram_size"], 16);
        assert_eq!(json["attributes"]["storage_type"], "NVMe");
        assert!(json["attributes"]["graphics_card"].is_null());
        assert!(json["attributes"].get("specification").is_none());
    }

    #[test]
    fn renders_missing_attributes_as_null() {
        let product = Product::from(read::product::WithAttributes {
            product: laptop(),
            attributes: None,
        });

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["status"], "published");
        assert!(json["attributes"].is_null());
    }

    #[test]
    fn reports_missing_product() {
        use command::set_product_attributes::ExecutionError as E;

        let id = product::Id::new("prod_404").unwrap();
        let err = E::ProductNotExists(id).as_error();

        assert_eq!(err.code, "PRODUCT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
