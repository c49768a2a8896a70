//! [`RentalReturn`] endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Extension, Json,
};
use common::Money;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, contract, rental_return},
    query, read, Command as _,
};

use crate::{
    api::{blank_as_none, rental_contract::ContractError},
    context::Admin,
    AsError, Error, Service,
};

/// Record of rented units being returned.
#[derive(Clone, Debug, Serialize)]
pub struct RentalReturn {
    /// ID of this [`RentalReturn`].
    pub id: rental_return::Id,

    /// ID of the returned contract.
    pub contract_id: contract::Id,

    /// Date the units were returned at.
    pub return_date: rental_return::ReturnDateTime,

    /// Condition of the returned units.
    pub condition: rental_return::Condition,

    /// Description of a found damage.
    pub damage_description: Option<rental_return::DamageDescription>,

    /// Part of the deposit withheld.
    pub deposit_withheld: Money,

    /// Reason of withholding the deposit.
    pub withhold_reason: Option<rental_return::WithholdReason>,

    /// Creation time of this [`RentalReturn`].
    pub created_at: rental_return::CreationDateTime,
}

impl From<domain::RentalReturn> for RentalReturn {
    fn from(rental_return: domain::RentalReturn) -> Self {
        let domain::RentalReturn {
            id,
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
            created_at,
        } = rental_return;
        Self {
            id,
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
            created_at,
        }
    }
}

/// Response carrying a single [`RentalReturn`].
#[derive(Clone, Debug, Serialize)]
pub struct Single {
    /// The [`RentalReturn`].
    pub rental_return: RentalReturn,
}

/// Response carrying a list of [`RentalReturn`]s.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// The [`RentalReturn`]s.
    pub rental_returns: Vec<RentalReturn>,
}

/// Query parameters of the [`RentalReturn`]s list.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Filter {
    /// ID of the contract to list [`RentalReturn`]s of.
    pub contract_id: Option<contract::Id>,
}

/// Body of the [`RentalReturn`] registration request.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateBody {
    /// ID of the returned contract.
    pub contract_id: contract::Id,

    /// Date the units were returned at.
    pub return_date: rental_return::ReturnDateTime,

    /// Condition of the returned units.
    pub condition: rental_return::Condition,

    /// Description of a found damage.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub damage_description: Option<rental_return::DamageDescription>,

    /// Part of the deposit withheld, nothing by default.
    #[serde(default)]
    pub deposit_withheld: Money,

    /// Reason of withholding the deposit.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub withhold_reason: Option<rental_return::WithholdReason>,
}

impl From<CreateBody> for command::RegisterReturn {
    fn from(body: CreateBody) -> Self {
        let CreateBody {
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
        } = body;
        Self {
            contract_id,
            return_date,
            condition,
            damage_description,
            deposit_withheld,
            withhold_reason,
        }
    }
}

/// Lists [`RentalReturn`]s in order of registration.
#[tracing::instrument(skip_all)]
pub async fn list(
    _: Admin,
    Extension(service): Extension<Service>,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<List>, Error> {
    let Query(Filter { contract_id }) = filter.map_err(AsError::into_error)?;

    let returns = service
        .execute(query::rental_return::List::by(
            read::rental_return::list::Filter { contract_id },
        ))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(List {
        rental_returns: returns.into_iter().map(Into::into).collect(),
    }))
}

/// Registers a new [`RentalReturn`].
#[tracing::instrument(skip_all)]
pub async fn create(
    _: Admin,
    Extension(service): Extension<Service>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;

    let rental_return = service
        .execute(command::RegisterReturn::from(body))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Single {
        rental_return: rental_return.into(),
    }))
}

impl AsError for command::register_return::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Money;
    use service::{command, domain::contract};

    use super::{CreateBody, Filter};
    use crate::AsError as _;

    #[test]
    fn withholds_nothing_by_default() {
        let id = contract::Id::new();
        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "contract_id": id.to_string(),
            "return_date": "2026-06-01",
            "condition": "Goed",
        }))
        .unwrap();

        let cmd = command::RegisterReturn::from(body);
        assert_eq!(cmd.contract_id, id);
        assert_eq!(cmd.deposit_withheld, Money::ZERO);
        assert!(cmd.damage_description.is_none());
        assert!(cmd.withhold_reason.is_none());

        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "contract_id": id.to_string(),
            "return_date": "2026-06-01",
            "condition": "Goed",
            "damage_description": "",
            "withhold_reason": " ",
        }))
        .unwrap();
        assert!(body.damage_description.is_none());
        assert!(body.withhold_reason.is_none());
    }

    #[test]
    fn rejects_invalid_registration() {
        let id = contract::Id::new().to_string();
        for body in [
            serde_json::json!({"contract_id": id, "condition": "Goed"}),
            serde_json::json!({"contract_id": id, "return_date": "2026-06-01"}),
            serde_json::json!({
                "contract_id": id,
                "return_date": "2026-06-01",
                "condition": "",
            }),
            serde_json::json!({
                "contract_id": id,
                "return_date": "2026-06-01",
                "condition": "Kapot scherm",
                "deposit_withheld": -10,
            }),
            serde_json::json!({
                "contract_id": "not-a-uuid",
                "return_date": "2026-06-01",
                "condition": "Goed",
            }),
        ] {
            assert!(serde_json::from_value::<CreateBody>(body).is_err());
        }
    }

    #[test]
    fn filters_by_contract() {
        let id = contract::Id::new();
        let filter: Filter = serde_json::from_value(serde_json::json!({
            "contract_id": id.to_string(),
        }))
        .unwrap();
        assert_eq!(filter.contract_id, Some(id));

        let filter: Filter =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(filter.contract_id.is_none());
    }

    #[test]
    fn reports_missing_contract() {
        let err = command::register_return::ExecutionError::ContractNotExists(
            contract::Id::new(),
        )
        .as_error();

        assert_eq!(err.code, "RENTAL_CONTRACT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
