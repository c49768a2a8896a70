//! [`RentalContract`] and [`ContractItem`] endpoints.

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
    command::{self, create_contract},
    domain::{contract, customer, product, Contract},
    query, read, Command as _,
};

use crate::{
    api::{blank_as_cleared, blank_as_none, Deleted},
    context::Admin,
    define_error, AsError, Error, Service,
};

/// Rental agreement between a customer and the shop.
#[derive(Clone, Debug, Serialize)]
pub struct RentalContract {
    /// ID of this [`RentalContract`].
    pub id: contract::Id,

    /// Human-assigned number of this [`RentalContract`].
    pub contract_number: contract::Number,

    /// ID of the renting customer.
    pub customer_id: customer::Id,

    /// Plan of this [`RentalContract`].
    #[serde(rename = "type")]
    pub kind: contract::Kind,

    /// Lifecycle status of this [`RentalContract`].
    pub status: contract::Status,

    /// Date the rental starts at.
    pub start_date: contract::StartDateTime,

    /// Date the rental ends at, if known.
    pub end_date: Option<contract::EndDateTime>,

    /// Earliest date the rental may end at.
    pub earliest_end_date: contract::EarliestEndDateTime,

    /// Amount charged monthly.
    pub monthly_amount: Money,

    /// Deposit to be paid.
    pub deposit_amount: Money,

    /// Indicator whether the deposit has been paid.
    pub deposit_paid: bool,

    /// Indicator whether the deposit has been refunded.
    pub deposit_refunded: bool,

    /// Free-form notes.
    pub notes: Option<contract::Notes>,

    /// Creation time of this [`RentalContract`].
    pub created_at: contract::CreationDateTime,

    /// Last modification time of this [`RentalContract`].
    pub updated_at: contract::ModificationDateTime,
}

impl From<Contract> for RentalContract {
    fn from(contract: Contract) -> Self {
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
            deleted_at: _,
        } = contract;
        Self {
            id,
            contract_number: number,
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
        }
    }
}

/// Line item of a [`RentalContract`].
#[derive(Clone, Debug, Serialize)]
pub struct ContractItem {
    /// ID of this [`ContractItem`].
    pub id: contract::item::Id,

    /// ID of the [`RentalContract`] owning this [`ContractItem`].
    pub contract_id: contract::Id,

    /// ID of the rented product.
    pub product_id: product::Id,

    /// Number of rented units.
    pub quantity: contract::item::Quantity,

    /// Serial number of the rented unit.
    pub serial_number: Option<contract::item::SerialNumber>,

    /// Condition of the unit when delivered.
    pub condition_on_delivery: Option<contract::item::Condition>,

    /// Condition of the unit when returned.
    pub condition_on_return: Option<contract::item::Condition>,

    /// Creation time of this [`ContractItem`].
    pub created_at: contract::item::CreationDateTime,

    /// Last modification time of this [`ContractItem`].
    pub updated_at: contract::item::ModificationDateTime,
}

impl From<contract::Item> for ContractItem {
    fn from(item: contract::Item) -> Self {
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
            deleted_at: _,
        } = item;
        Self {
            id,
            contract_id,
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return,
            created_at,
            updated_at,
        }
    }
}

/// Response carrying a [`RentalContract`] along with its [`ContractItem`]s.
#[derive(Clone, Debug, Serialize)]
pub struct Detailed {
    /// The [`RentalContract`].
    pub rental_contract: RentalContract,

    /// [`ContractItem`]s of the [`RentalContract`].
    pub contract_items: Vec<ContractItem>,
}

impl From<(Contract, Vec<contract::Item>)> for Detailed {
    fn from((contract, items): (Contract, Vec<contract::Item>)) -> Self {
        Self {
            rental_contract: contract.into(),
            contract_items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response carrying a single [`RentalContract`].
#[derive(Clone, Debug, Serialize)]
pub struct Single {
    /// The [`RentalContract`].
    pub rental_contract: RentalContract,
}

/// Response carrying a list of [`RentalContract`]s.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// The [`RentalContract`]s.
    pub rental_contracts: Vec<RentalContract>,
}

/// Response carrying a single [`ContractItem`].
#[derive(Clone, Debug, Serialize)]
pub struct SingleItem {
    /// The [`ContractItem`].
    pub contract_item: ContractItem,
}

/// Response carrying a list of [`ContractItem`]s.
#[derive(Clone, Debug, Serialize)]
pub struct ItemList {
    /// The [`ContractItem`]s.
    pub contract_items: Vec<ContractItem>,
}

/// Query parameters of the [`RentalContract`]s list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Filter {
    /// ID of the renting customer.
    pub customer_id: Option<customer::Id>,

    /// Lifecycle status to match.
    pub status: Option<contract::Status>,

    /// Plan to match.
    #[serde(rename = "type")]
    pub kind: Option<contract::Kind>,
}

impl From<Filter> for read::contract::list::Filter {
    fn from(filter: Filter) -> Self {
        let Filter {
            customer_id,
            status,
            kind,
        } = filter;
        Self {
            customer_id,
            status,
            kind,
        }
    }
}

/// [`ContractItem`] of a [`RentalContract`] creation request.
#[derive(Clone, Debug, Deserialize)]
pub struct ItemBody {
    /// ID of the rented product.
    pub product_id: product::Id,

    /// Number of rented units, `1` by default.
    #[serde(default)]
    pub quantity: contract::item::Quantity,

    /// Serial number of the rented unit.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub serial_number: Option<contract::item::SerialNumber>,

    /// Condition of the unit when delivered.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub condition_on_delivery: Option<contract::item::Condition>,
}

impl From<ItemBody> for create_contract::Item {
    fn from(body: ItemBody) -> Self {
        let ItemBody {
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
        } = body;
        Self {
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
        }
    }
}

/// Body of the [`RentalContract`] creation request.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateBody {
    /// Human-assigned number of the [`RentalContract`].
    pub contract_number: contract::Number,

    /// ID of the renting customer.
    pub customer_id: customer::Id,

    /// Plan of the [`RentalContract`].
    #[serde(rename = "type")]
    pub kind: contract::Kind,

    /// Initial status, `in_afwachting` by default.
    #[serde(default)]
    pub status: contract::Status,

    /// Date the rental starts at.
    pub start_date: contract::StartDateTime,

    /// Date the rental ends at.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<contract::EndDateTime>,

    /// Earliest date the rental may end at, derived from the plan if absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub earliest_end_date: Option<contract::EarliestEndDateTime>,

    /// Amount charged monthly, computed from the catalog if absent.
    #[serde(default)]
    pub monthly_amount: Option<Money>,

    /// Deposit to be paid.
    #[serde(default)]
    pub deposit_amount: Money,

    /// Indicator whether the deposit has been paid.
    #[serde(default)]
    pub deposit_paid: bool,

    /// Indicator whether the deposit has been refunded.
    #[serde(default)]
    pub deposit_refunded: bool,

    /// Free-form notes.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<contract::Notes>,

    /// Initial [`ContractItem`]s.
    #[serde(default)]
    pub items: Vec<ItemBody>,
}

impl From<CreateBody> for command::CreateContract {
    fn from(body: CreateBody) -> Self {
        let CreateBody {
            contract_number,
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
        } = body;
        Self {
            number: contract_number,
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
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of the [`RentalContract`] sparse update request.
///
/// The contract number cannot be changed, so it is ignored if present.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBody {
    /// New lifecycle status.
    pub status: Patch<contract::Status>,

    /// New start date.
    pub start_date: Patch<contract::StartDateTime>,

    /// New end date, `null` or a blank string clears it.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub end_date: Patch<Option<contract::EndDateTime>>,

    /// New earliest end date.
    pub earliest_end_date: Patch<contract::EarliestEndDateTime>,

    /// New monthly amount.
    pub monthly_amount: Patch<Money>,

    /// New deposit.
    pub deposit_amount: Patch<Money>,

    /// New deposit payment indicator.
    pub deposit_paid: Patch<bool>,

    /// New deposit refund indicator.
    pub deposit_refunded: Patch<bool>,

    /// New notes, `null` or a blank string clears them.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub notes: Patch<Option<contract::Notes>>,
}

impl UpdateBody {
    /// Converts this [`UpdateBody`] into a [`command::UpdateContract`] of the
    /// [`RentalContract`] with the provided `id`.
    #[must_use]
    pub fn into_command(self, id: contract::Id) -> command::UpdateContract {
        let Self {
            status,
            start_date,
            end_date,
            earliest_end_date,
            monthly_amount,
            deposit_amount,
            deposit_paid,
            deposit_refunded,
            notes,
        } = self;
        command::UpdateContract {
            id,
            status,
            start_date,
            end_date,
            earliest_end_date,
            monthly_amount,
            deposit_amount,
            deposit_paid,
            deposit_refunded,
            notes,
        }
    }
}

/// Body of the [`ContractItem`] sparse update request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateItemBody {
    /// New number of rented units.
    pub quantity: Patch<contract::item::Quantity>,

    /// New serial number, `null` or a blank string clears it.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub serial_number: Patch<Option<contract::item::SerialNumber>>,

    /// New delivery condition, `null` or a blank string clears it.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub condition_on_delivery: Patch<Option<contract::item::Condition>>,

    /// New return condition, `null` or a blank string clears it.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub condition_on_return: Patch<Option<contract::item::Condition>>,
}

impl UpdateItemBody {
    /// Converts this [`UpdateItemBody`] into a
    /// [`command::UpdateContractItem`] of the provided [`ContractItem`].
    #[must_use]
    pub fn into_command(
        self,
        contract_id: contract::Id,
        item_id: contract::item::Id,
    ) -> command::UpdateContractItem {
        let Self {
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return,
        } = self;
        command::UpdateContractItem {
            contract_id,
            item_id,
            quantity,
            serial_number,
            condition_on_delivery,
            condition_on_return,
        }
    }
}

/// Lists non-deleted [`RentalContract`]s.
#[tracing::instrument(skip_all)]
pub async fn list(
    _: Admin,
    Extension(service): Extension<Service>,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<List>, Error> {
    let Query(filter) = filter.map_err(AsError::into_error)?;

    let contracts = service
        .execute(query::contract::List::by(filter.into()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(List {
        rental_contracts: contracts.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a new [`RentalContract`] along with its [`ContractItem`]s.
#[tracing::instrument(skip_all)]
pub async fn create(
    _: Admin,
    Extension(service): Extension<Service>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Detailed>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;

    service
        .execute(command::CreateContract::from(body))
        .await
        .map_err(AsError::into_error)
        .map(|created| Json(created.into()))
}

/// Fetches a non-deleted [`RentalContract`] along with its
/// [`ContractItem`]s.
#[tracing::instrument(skip_all)]
pub async fn get(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<contract::Id>, PathRejection>,
) -> Result<Json<Detailed>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    let contract = select_contract(&service, id).await?;
    let items = service
        .execute(query::contract::Items::by(id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json((contract, items).into()))
}

/// Applies a sparse update to a [`RentalContract`].
#[tracing::instrument(skip_all)]
pub async fn update(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<contract::Id>, PathRejection>,
    body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(body) = body.map_err(AsError::into_error)?;

    let contract = service
        .execute(body.into_command(id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Single {
        rental_contract: contract.into(),
    }))
}

/// Soft-deletes a [`RentalContract`] along with its [`ContractItem`]s.
#[tracing::instrument(skip_all)]
pub async fn delete(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<contract::Id>, PathRejection>,
) -> Result<Json<Deleted<contract::Id>>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(command::DeleteContract { id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Deleted::new(id)))
}

/// Lists non-deleted [`ContractItem`]s of a [`RentalContract`].
#[tracing::instrument(skip_all)]
pub async fn items(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<contract::Id>, PathRejection>,
) -> Result<Json<ItemList>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    drop(select_contract(&service, id).await?);
    let items = service
        .execute(query::contract::Items::by(id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ItemList {
        contract_items: items.into_iter().map(Into::into).collect(),
    }))
}

/// Adds a new [`ContractItem`] to a [`RentalContract`].
#[tracing::instrument(skip_all)]
pub async fn add_item(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<contract::Id>, PathRejection>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> Result<Json<SingleItem>, Error> {
    let Path(contract_id) = id.map_err(AsError::into_error)?;
    let Json(ItemBody {
        product_id,
        quantity,
        serial_number,
        condition_on_delivery,
    }) = body.map_err(AsError::into_error)?;

    let item = service
        .execute(command::AddContractItem {
            contract_id,
            product_id,
            quantity,
            serial_number,
            condition_on_delivery,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SingleItem {
        contract_item: item.into(),
    }))
}

/// Fetches a single non-deleted [`ContractItem`] of a [`RentalContract`].
#[tracing::instrument(skip_all)]
pub async fn get_item(
    _: Admin,
    Extension(service): Extension<Service>,
    ids: Result<Path<(contract::Id, contract::item::Id)>, PathRejection>,
) -> Result<Json<SingleItem>, Error> {
    let Path((contract_id, item_id)) = ids.map_err(AsError::into_error)?;

    let item = service
        .execute(query::contract::ItemById::by(item_id))
        .await
        .map_err(AsError::into_error)?
        .filter(|i| i.contract_id == contract_id)
        .ok_or(ContractError::ItemNotExists)?;

    Ok(Json(SingleItem {
        contract_item: item.into(),
    }))
}

/// Applies a sparse update to a [`ContractItem`].
#[tracing::instrument(skip_all)]
pub async fn update_item(
    _: Admin,
    Extension(service): Extension<Service>,
    ids: Result<Path<(contract::Id, contract::item::Id)>, PathRejection>,
    body: Result<Json<UpdateItemBody>, JsonRejection>,
) -> Result<Json<SingleItem>, Error> {
    let Path((contract_id, item_id)) = ids.map_err(AsError::into_error)?;
    let Json(body) = body.map_err(AsError::into_error)?;

    let item = service
        .execute(body.into_command(contract_id, item_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SingleItem {
        contract_item: item.into(),
    }))
}

/// Soft-deletes a [`ContractItem`].
#[tracing::instrument(skip_all)]
pub async fn remove_item(
    _: Admin,
    Extension(service): Extension<Service>,
    ids: Result<Path<(contract::Id, contract::item::Id)>, PathRejection>,
) -> Result<Json<Deleted<contract::item::Id>>, Error> {
    let Path((contract_id, item_id)) = ids.map_err(AsError::into_error)?;

    service
        .execute(command::RemoveContractItem {
            contract_id,
            item_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Deleted::new(item_id)))
}

/// Selects a non-deleted [`Contract`] by its ID.
async fn select_contract(
    service: &Service,
    id: contract::Id,
) -> Result<Contract, Error> {
    Ok(service
        .execute(query::contract::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(ContractError::NotExists)?)
}

define_error! {
    enum ContractError {
        #[code = "RENTAL_CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RentalContract` does not exist"]
        NotExists,

        #[code = "CONTRACT_ITEM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`ContractItem` does not exist"]
        ItemNotExists,
    }
}

impl AsError for create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CONTRACT_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`contract_number` is used by another \
                             `RentalContract`"]
                NumberOccupied,

                #[code = "PRICING_UNAVAILABLE"]
                #[status = BAD_REQUEST]
                #[message = "A product has no available price for the plan, \
                             so `monthly_amount` must be provided"]
                PricingUnavailable,

                #[code = "INVALID_MONTHLY_AMOUNT"]
                #[status = BAD_REQUEST]
                #[message = "Computed `monthly_amount` is out of range"]
                MonthlyAmountOverflow,

                #[code = "INVALID_START_DATE"]
                #[status = BAD_REQUEST]
                #[message = "`earliest_end_date` cannot be derived from \
                             `start_date`"]
                StartDateOutOfRange,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MonthlyAmountOverflow => {
                Some(Error::MonthlyAmountOverflow.into())
            }
            Self::NumberOccupied(_) => Some(Error::NumberOccupied.into()),
            Self::PricingUnavailable(_) => {
                Some(Error::PricingUnavailable.into())
            }
            Self::StartDateOutOfRange => {
                Some(Error::StartDateOutOfRange.into())
            }
        }
    }
}

impl AsError for command::update_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
            Self::InvalidTransition(e) => Some(Error {
                code: "INVALID_STATUS_TRANSITION",
                status_code: http::StatusCode::CONFLICT,
                message: e.to_string(),
                backtrace: None,
            }),
        }
    }
}

impl AsError for command::add_contract_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_contract_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ItemNotExists(_) => Some(ContractError::ItemNotExists.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Patch};
    use service::{
        command,
        domain::{contract, customer, Contract},
    };

    use super::{
        CreateBody, Filter, RentalContract, UpdateBody, UpdateItemBody,
    };
    use crate::AsError as _;

    #[test]
    fn reads_creation_request() {
        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "contract_number": "RC-2026-001",
            "customer_id": "cus_01",
            "type": "jaar",
            "start_date": "2026-03-15",
            "deposit_amount": 250,
            "items": [
                {
                    "product_id": "prod_1",
                    "quantity": 2,
                    "serial_number": "ABC123",
                },
                {"product_id": "prod_2"},
            ],
        }))
        .unwrap();

        let cmd = command::CreateContract::from(body);
        assert_eq!(cmd.number.to_string(), "RC-2026-001");
        assert_eq!(cmd.kind, contract::Kind::Jaar);
        assert_eq!(cmd.status, contract::Status::Pending);
        assert_eq!(
            cmd.start_date,
            DateTime::parse("2026-03-15").unwrap().coerce(),
        );
        assert!(cmd.earliest_end_date.is_none());
        assert!(cmd.monthly_amount.is_none());
        assert!(!cmd.deposit_paid);
        assert_eq!(cmd.items.len(), 2);
        assert_eq!(cmd.items[0].quantity.get(), 2);
        assert_eq!(
            cmd.items[0].serial_number.as_ref().map(ToString::to_string),
            Some("ABC123".to_owned()),
        );
        assert_eq!(cmd.items[1].quantity, contract::item::Quantity::ONE);
    }

    #[test]
    fn reads_blank_form_inputs_as_absent() {
        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "contract_number": "CONT-1767225600000",
            "customer_id": "cus_01",
            "type": "flex",
            "start_date": "2026-03-15",
            "end_date": "",
            "earliest_end_date": "2026-06-15",
            "monthly_amount": 159.98,
            "deposit_amount": 0,
            "deposit_paid": false,
            "notes": "",
            "items": [
                {"product_id": "prod_1", "quantity": 2, "serial_number": null},
                {"product_id": "prod_2", "serial_number": ""},
            ],
        }))
        .unwrap();

        let cmd = command::CreateContract::from(body);
        assert!(cmd.end_date.is_none());
        assert!(cmd.notes.is_none());
        assert_eq!(
            cmd.earliest_end_date,
            Some(DateTime::parse("2026-06-15").unwrap().coerce()),
        );
        assert!(cmd.items.iter().all(|i| i.serial_number.is_none()));

        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "contract_number": "CONT-2",
            "customer_id": "cus_01",
            "type": "jaar",
            "start_date": "2026-03-15",
            "earliest_end_date": " ",
        }))
        .unwrap();
        assert!(body.earliest_end_date.is_none());
    }

    #[test]
    fn rejects_invalid_creation() {
        for body in [
            // Unknown plan.
            serde_json::json!({
                "contract_number": "RC-1",
                "customer_id": "cus_01",
                "type": "week",
                "start_date": "2026-03-15",
            }),
            // Blank number.
            serde_json::json!({
                "contract_number": "  ",
                "customer_id": "cus_01",
                "type": "flex",
                "start_date": "2026-03-15",
            }),
            // Zero quantity.
            serde_json::json!({
                "contract_number": "RC-1",
                "customer_id": "cus_01",
                "type": "flex",
                "start_date": "2026-03-15",
                "items": [{"product_id": "prod_1", "quantity": 0}],
            }),
            // Malformed date.
            serde_json::json!({
                "contract_number": "RC-1",
                "customer_id": "cus_01",
                "type": "flex",
                "start_date": "15-03-2026",
            }),
        ] {
            assert!(serde_json::from_value::<CreateBody>(body).is_err());
        }
    }

    #[test]
    fn reads_sparse_update() {
        let body: UpdateBody =
            serde_json::from_value(serde_json::json!({"status": "actief"}))
                .unwrap();

        let cmd = body.into_command(contract::Id::new());
        assert_eq!(cmd.status, Patch::Set(contract::Status::Active));
        assert!(cmd.start_date.is_keep());
        assert!(cmd.end_date.is_keep());
        assert!(cmd.monthly_amount.is_keep());
        assert!(cmd.deposit_paid.is_keep());
        assert!(cmd.notes.is_keep());

        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "end_date": null,
            "notes": null,
            "contract_number": "RC-OTHER",
        }))
        .unwrap();
        let cmd = body.into_command(contract::Id::new());
        assert_eq!(cmd.end_date, Patch::Set(None));
        assert!(matches!(cmd.notes, Patch::Set(None)));
    }

    #[test]
    fn clears_fields_with_blank_strings() {
        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "end_date": "",
            "notes": "",
        }))
        .unwrap();

        let cmd = body.into_command(contract::Id::new());
        assert_eq!(cmd.end_date, Patch::Set(None));
        assert!(matches!(cmd.notes, Patch::Set(None)));
        assert!(cmd.status.is_keep());

        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "end_date": "2027-03-15",
        }))
        .unwrap();
        assert_eq!(
            body.end_date,
            Patch::Set(Some(DateTime::parse("2027-03-15").unwrap().coerce())),
        );
        assert!(body.notes.is_keep());

        let body: UpdateItemBody = serde_json::from_value(serde_json::json!({
            "serial_number": "",
            "condition_on_return": " ",
        }))
        .unwrap();
        assert!(matches!(body.serial_number, Patch::Set(None)));
        assert!(matches!(body.condition_on_return, Patch::Set(None)));
        assert!(body.condition_on_delivery.is_keep());
    }

    #[test]
    fn reads_item_update() {
        let body: UpdateItemBody = serde_json::from_value(serde_json::json!({
            "condition_on_return": "Kras op behuizing",
        }))
        .unwrap();

        let cmd =
            body.into_command(contract::Id::new(), contract::item::Id::new());
        assert!(cmd.quantity.is_keep());
        assert!(cmd.serial_number.is_keep());
        assert_eq!(
            cmd.condition_on_return
                .as_set()
                .and_then(Option::as_ref)
                .map(ToString::to_string),
            Some("Kras op behuizing".to_owned()),
        );
    }

    #[test]
    fn reads_list_filter() {
        let filter: Filter = serde_json::from_value(serde_json::json!({
            "status": "beëindigd",
            "type": "offerte",
        }))
        .unwrap();

        assert!(filter.customer_id.is_none());
        assert_eq!(filter.status, Some(contract::Status::Terminated));
        assert_eq!(filter.kind, Some(contract::Kind::Offerte));
    }

    #[test]
    fn names_kind_as_type() {
        let now = DateTime::now();
        let start = DateTime::parse("2026-01-31").unwrap();
        let contract = RentalContract::from(Contract {
            id: contract::Id::new(),
            number: contract::Number::new("RC-1").unwrap(),
            customer_id: customer::Id::new("cus_01").unwrap(),
            kind: contract::Kind::Flex,
            status: contract::Status::Pending,
            start_date: start.coerce(),
            end_date: None,
            earliest_end_date: contract::Kind::Flex
                .earliest_end_date(start.coerce())
                .unwrap(),
            monthly_amount: "89.99".parse().unwrap(),
            deposit_amount: "500".parse().unwrap(),
            deposit_paid: false,
            deposit_refunded: false,
            notes: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            deleted_at: None,
        });

        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["type"], "flex");
        assert_eq!(json["status"], "in_afwachting");
        assert_eq!(json["contract_number"], "RC-1");
        assert_eq!(json["earliest_end_date"], "2026-04-30T00:00:00Z");
        assert_eq!(json["deposit_amount"], 500.0);
        assert!(json["end_date"].is_null());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn maps_command_errors() {
        use command::{create_contract, update_contract};

        let err = create_contract::ExecutionError::NumberOccupied(
            contract::Number::new("RC-1").unwrap(),
        )
        .as_error();
        assert_eq!(err.code, "CONTRACT_NUMBER_OCCUPIED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = update_contract::ExecutionError::InvalidTransition(
            contract::Status::Cancelled
                .transition(contract::Status::Active)
                .unwrap_err(),
        )
        .as_error();
        assert_eq!(err.code, "INVALID_STATUS_TRANSITION");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = update_contract::ExecutionError::ContractNotExists(
            contract::Id::new(),
        )
        .as_error();
        assert_eq!(err.code, "RENTAL_CONTRACT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
