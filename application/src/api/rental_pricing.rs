//! [`RentalPricing`] endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use common::{Money, Patch};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, pricing, product},
    query, read, Command as _,
};

use crate::{
    api::Deleted,
    context::{Admin, Storefront},
    define_error, AsError, Error, Service,
};

/// Rental prices of a product.
#[derive(Clone, Debug, Serialize)]
pub struct RentalPricing {
    /// ID of this [`RentalPricing`].
    pub id: pricing::Id,

    /// ID of the priced product.
    pub product_id: product::Id,

    /// Monthly price of the flex plan.
    pub flex_monthly_price: Option<Money>,

    /// Monthly price of the year plan.
    pub year_monthly_price: Option<Money>,

    /// Deposit to be paid.
    pub deposit_amount: Option<Money>,

    /// Indicator whether the flex plan is offered.
    pub flex_available: bool,

    /// Indicator whether the year plan is offered.
    pub year_available: bool,

    /// Creation time of this [`RentalPricing`].
    pub created_at: pricing::CreationDateTime,

    /// Last modification time of this [`RentalPricing`].
    pub updated_at: pricing::ModificationDateTime,
}

impl From<domain::RentalPricing> for RentalPricing {
    fn from(pricing: domain::RentalPricing) -> Self {
        let domain::RentalPricing {
            id,
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
            created_at,
            updated_at,
            deleted_at: _,
        } = pricing;
        Self {
            id,
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
            created_at,
            updated_at,
        }
    }
}

/// Response carrying a single [`RentalPricing`].
#[derive(Clone, Debug, Serialize)]
pub struct Single {
    /// The [`RentalPricing`].
    pub rental_pricing: RentalPricing,
}

/// Response carrying a list of [`RentalPricing`]s.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// The [`RentalPricing`]s.
    pub rental_pricings: Vec<RentalPricing>,
}

/// Query parameters of the [`RentalPricing`]s lists.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Filter {
    /// ID of the product to list [`RentalPricing`]s of.
    pub product_id: Option<product::Id>,
}

/// Body of the [`RentalPricing`] creation request.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateBody {
    /// ID of the priced product.
    pub product_id: product::Id,

    /// Monthly price of the flex plan.
    #[serde(default)]
    pub flex_monthly_price: Option<Money>,

    /// Monthly price of the year plan.
    #[serde(default)]
    pub year_monthly_price: Option<Money>,

    /// Deposit to be paid.
    #[serde(default)]
    pub deposit_amount: Option<Money>,

    /// Indicator whether the flex plan is offered.
    #[serde(default)]
    pub flex_available: bool,

    /// Indicator whether the year plan is offered.
    #[serde(default)]
    pub year_available: bool,
}

impl From<CreateBody> for command::CreateRentalPricing {
    fn from(body: CreateBody) -> Self {
        let CreateBody {
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        } = body;
        Self {
            product_id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        }
    }
}

/// Body of the [`RentalPricing`] sparse update request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBody {
    /// New monthly price of the flex plan, `null` clears it.
    pub flex_monthly_price: Patch<Option<Money>>,

    /// New monthly price of the year plan, `null` clears it.
    pub year_monthly_price: Patch<Option<Money>>,

    /// New deposit, `null` clears it.
    pub deposit_amount: Patch<Option<Money>>,

    /// New flex plan availability.
    pub flex_available: Patch<bool>,

    /// New year plan availability.
    pub year_available: Patch<bool>,
}

impl UpdateBody {
    /// Converts this [`UpdateBody`] into a [`command::UpdateRentalPricing`] of
    /// the [`RentalPricing`] with the provided `id`.
    #[must_use]
    pub fn into_command(self, id: pricing::Id) -> command::UpdateRentalPricing {
        let Self {
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        } = self;
        command::UpdateRentalPricing {
            id,
            flex_monthly_price,
            year_monthly_price,
            deposit_amount,
            flex_available,
            year_available,
        }
    }
}

/// Lists non-deleted [`RentalPricing`]s for the admin panel.
#[tracing::instrument(skip_all)]
pub async fn list(
    _: Admin,
    Extension(service): Extension<Service>,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<List>, Error> {
    let Query(filter) = filter.map_err(AsError::into_error)?;
    select_list(&service, filter).await.map(Json)
}

/// Looks up non-deleted [`RentalPricing`]s for the storefront.
#[tracing::instrument(skip_all)]
pub async fn store_list(
    _: Storefront,
    Extension(service): Extension<Service>,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<List>, Error> {
    let Query(filter) = filter.map_err(AsError::into_error)?;
    select_list(&service, filter).await.map(Json)
}

/// Selects the [`List`] of [`RentalPricing`]s matching the [`Filter`].
async fn select_list(service: &Service, filter: Filter) -> Result<List, Error> {
    let Filter { product_id } = filter;
    let rental_pricings = service
        .execute(query::pricing::List::by(read::pricing::list::Filter {
            product_id,
        }))
        .await
        .map_err(AsError::into_error)?;
    Ok(List {
        rental_pricings: rental_pricings.into_iter().map(Into::into).collect(),
    })
}

/// Creates a new [`RentalPricing`].
#[tracing::instrument(skip_all)]
pub async fn create(
    _: Admin,
    Extension(service): Extension<Service>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;

    let pricing = service
        .execute(command::CreateRentalPricing::from(body))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Single {
        rental_pricing: pricing.into(),
    }))
}

/// Fetches a single non-deleted [`RentalPricing`].
#[tracing::instrument(skip_all)]
pub async fn get(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<pricing::Id>, PathRejection>,
) -> Result<Json<Single>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    let pricing = service
        .execute(query::pricing::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(PricingError::NotExists)?;

    Ok(Json(Single {
        rental_pricing: pricing.into(),
    }))
}

/// Applies a sparse update to a [`RentalPricing`].
#[tracing::instrument(skip_all)]
pub async fn update(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<pricing::Id>, PathRejection>,
    body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(body) = body.map_err(AsError::into_error)?;

    let pricing = service
        .execute(body.into_command(id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Single {
        rental_pricing: pricing.into(),
    }))
}

/// Soft-deletes a [`RentalPricing`].
#[tracing::instrument(skip_all)]
pub async fn delete(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<pricing::Id>, PathRejection>,
) -> Result<Json<Deleted<pricing::Id>>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(command::DeleteRentalPricing { id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Deleted::new(id)))
}

define_error! {
    enum PricingError {
        #[code = "RENTAL_PRICING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RentalPricing` does not exist"]
        NotExists,
    }
}

impl AsError for command::update_rental_pricing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PricingNotExists(_) => Some(PricingError::NotExists.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Patch};
    use service::domain::{self, pricing, product};

    use super::{CreateBody, RentalPricing, UpdateBody};

    #[test]
    fn creates_unavailable_plans_by_default() {
        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "product_id": "prod_1",
            "flex_monthly_price": 89.99,
            "deposit_amount": "500",
        }))
        .unwrap();

        assert!(!body.flex_available);
        assert!(!body.year_available);
        assert_eq!(body.flex_monthly_price, Some("89.99".parse().unwrap()));
        assert_eq!(body.year_monthly_price, None);
        assert_eq!(body.deposit_amount, Some("500".parse().unwrap()));
    }

    #[test]
    fn rejects_invalid_creation() {
        for body in [
            serde_json::json!({"flex_monthly_price": 89.99}),
            serde_json::json!({"product_id": "", "flex_available": true}),
            serde_json::json!({"product_id": "prod_1", "deposit_amount": -5}),
        ] {
            assert!(serde_json::from_value::<CreateBody>(body).is_err());
        }
    }

    #[test]
    fn distinguishes_absent_and_null_prices() {
        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "year_monthly_price": null,
            "flex_available": true,
        }))
        .unwrap();

        let cmd = body.into_command(pricing::Id::new());
        assert_eq!(cmd.flex_monthly_price, Patch::Keep);
        assert_eq!(cmd.year_monthly_price, Patch::Set(None));
        assert_eq!(cmd.deposit_amount, Patch::Keep);
        assert_eq!(cmd.flex_available, Patch::Set(true));
        assert_eq!(cmd.year_available, Patch::Keep);
    }

    #[test]
    fn serializes_prices_as_numbers() {
        let now = DateTime::now();
        let pricing = RentalPricing::from(domain::RentalPricing {
            id: pricing::Id::new(),
            product_id: product::Id::new("prod_1").unwrap(),
            flex_monthly_price: Some("89.99".parse().unwrap()),
            year_monthly_price: Some("69.99".parse().unwrap()),
            deposit_amount: None,
            flex_available: true,
            year_available: false,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            deleted_at: None,
        });

        let json = serde_json::to_value(&pricing).unwrap();
        assert_eq!(json["product_id"], "prod_1");
        let amount = |key: &str| json[key].as_f64().unwrap();
        assert!((amount("flex_monthly_price") - 89.99).abs() < 1e-9);
        assert!((amount("year_monthly_price") - 69.99).abs() < 1e-9);
        assert!(json["deposit_amount"].is_null());
        assert_eq!(json["year_available"], false);
        assert_eq!(json["created_at"], now.to_rfc3339());
        assert!(json.get("deleted_at").is_none());
    }
}
