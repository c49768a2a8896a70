//! [`QuoteRequest`] endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use common::Patch;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, quote_request},
    query, read, Command as _,
};
use tracing as log;

use crate::{
    api::{blank_as_cleared, blank_as_none, Deleted},
    context::{Admin, Storefront},
    define_error, AsError, Error, Service,
};

/// Prospective rental request awaiting a manual quote.
#[derive(Clone, Debug, Serialize)]
pub struct QuoteRequest {
    /// ID of this [`QuoteRequest`].
    pub id: quote_request::Id,

    /// Company name of the requester.
    pub company_name: quote_request::CompanyName,

    /// Contact person of the requester.
    pub contact_person: quote_request::ContactPerson,

    /// Email address of the requester.
    pub email: quote_request::Email,

    /// Phone number of the requester.
    pub phone: Option<quote_request::Phone>,

    /// Desired start of the rental period.
    pub desired_period_start: quote_request::PeriodStartDateTime,

    /// Desired end of the rental period.
    pub desired_period_end: quote_request::PeriodEndDateTime,

    /// Requested product lines.
    pub requested_items: Vec<quote_request::RequestedItem>,

    /// Workflow status of this [`QuoteRequest`].
    pub status: quote_request::Status,

    /// Free-form notes.
    pub notes: Option<quote_request::Notes>,

    /// Creation time of this [`QuoteRequest`].
    pub created_at: quote_request::CreationDateTime,

    /// Last modification time of this [`QuoteRequest`].
    pub updated_at: quote_request::ModificationDateTime,
}

impl From<domain::QuoteRequest> for QuoteRequest {
    fn from(request: domain::QuoteRequest) -> Self {
        let domain::QuoteRequest {
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
        Self {
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
        }
    }
}

/// Response carrying a single [`QuoteRequest`].
#[derive(Clone, Debug, Serialize)]
pub struct Single {
    /// The [`QuoteRequest`].
    pub quote_request: QuoteRequest,
}

impl From<domain::QuoteRequest> for Single {
    fn from(request: domain::QuoteRequest) -> Self {
        Self {
            quote_request: request.into(),
        }
    }
}

/// Response carrying a list of [`QuoteRequest`]s.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// The [`QuoteRequest`]s.
    pub quote_requests: Vec<QuoteRequest>,
}

/// Query parameters of the [`QuoteRequest`]s list.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Filter {
    /// Workflow status to match.
    pub status: Option<quote_request::Status>,
}

/// Body of the [`QuoteRequest`] creation request of the admin panel.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateBody {
    /// Company name of the requester.
    pub company_name: quote_request::CompanyName,

    /// Contact person of the requester.
    pub contact_person: quote_request::ContactPerson,

    /// Email address of the requester.
    pub email: quote_request::Email,

    /// Phone number of the requester.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<quote_request::Phone>,

    /// Desired start of the rental period.
    pub desired_period_start: quote_request::PeriodStartDateTime,

    /// Desired end of the rental period.
    pub desired_period_end: quote_request::PeriodEndDateTime,

    /// Requested product lines.
    #[serde(default)]
    pub requested_items: Vec<quote_request::RequestedItem>,

    /// Initial workflow status, `nieuw` by default.
    #[serde(default)]
    pub status: quote_request::Status,

    /// Free-form notes.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<quote_request::Notes>,
}

impl From<CreateBody> for command::CreateQuoteRequest {
    fn from(body: CreateBody) -> Self {
        let CreateBody {
            company_name,
            contact_person,
            email,
            phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status,
            notes,
        } = body;
        Self {
            company_name,
            contact_person,
            email,
            phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status,
            notes,
        }
    }
}

/// Body of the [`QuoteRequest`] submission from the storefront.
///
/// Blank optional inputs are treated as absent ones.
#[derive(Clone, Debug, Deserialize)]
pub struct SubmitBody {
    /// Name of the requesting customer.
    pub customer_name: quote_request::ContactPerson,

    /// Email address of the requesting customer.
    pub customer_email: quote_request::Email,

    /// Phone number of the requesting customer.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer_phone: Option<quote_request::Phone>,

    /// Company name of the requesting customer.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_name: Option<quote_request::CompanyName>,

    /// Desired start of the rental period.
    pub desired_period_start: quote_request::PeriodStartDateTime,

    /// Desired end of the rental period.
    pub desired_period_end: quote_request::PeriodEndDateTime,

    /// Message of the requesting customer.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub message: Option<quote_request::Notes>,

    /// Requested product lines, at least one.
    pub requested_items: Vec<quote_request::RequestedItem>,
}

impl From<SubmitBody> for command::SubmitQuoteRequest {
    fn from(body: SubmitBody) -> Self {
        let SubmitBody {
            customer_name,
            customer_email,
            customer_phone,
            company_name,
            desired_period_start,
            desired_period_end,
            message,
            requested_items,
        } = body;
        Self {
            customer_name,
            customer_email,
            customer_phone,
            company_name,
            desired_period_start,
            desired_period_end,
            message,
            requested_items,
        }
    }
}

/// Body of the [`QuoteRequest`] sparse update request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBody {
    /// New workflow status.
    pub status: Patch<quote_request::Status>,

    /// New notes, `null` or a blank string clears them.
    #[serde(deserialize_with = "blank_as_cleared")]
    pub notes: Patch<Option<quote_request::Notes>>,

    /// New requested product lines.
    pub requested_items: Patch<Vec<quote_request::RequestedItem>>,
}

impl UpdateBody {
    /// Converts this [`UpdateBody`] into a [`command::UpdateQuoteRequest`] of
    /// the [`QuoteRequest`] with the provided `id`.
    #[must_use]
    pub fn into_command(
        self,
        id: quote_request::Id,
    ) -> command::UpdateQuoteRequest {
        let Self {
            status,
            notes,
            requested_items,
        } = self;
        command::UpdateQuoteRequest {
            id,
            status,
            notes,
            requested_items,
        }
    }
}

/// Lists [`QuoteRequest`]s.
#[tracing::instrument(skip_all)]
pub async fn list(
    _: Admin,
    Extension(service): Extension<Service>,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<List>, Error> {
    let Query(Filter { status }) = filter.map_err(AsError::into_error)?;

    let requests = service
        .execute(query::quote_request::List::by(
            read::quote_request::list::Filter { status },
        ))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(List {
        quote_requests: requests.into_iter().map(Into::into).collect(),
    }))
}

/// Creates a new [`QuoteRequest`] on behalf of a customer.
#[tracing::instrument(skip_all)]
pub async fn create(
    _: Admin,
    Extension(service): Extension<Service>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;

    service
        .execute(command::CreateQuoteRequest::from(body))
        .await
        .map_err(AsError::into_error)
        .map(|r| Json(r.into()))
}

/// Fetches a single [`QuoteRequest`].
#[tracing::instrument(skip_all)]
pub async fn get(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<quote_request::Id>, PathRejection>,
) -> Result<Json<Single>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    let request = service
        .execute(query::quote_request::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(QuoteError::NotExists)?;

    Ok(Json(request.into()))
}

/// Applies a sparse update to a [`QuoteRequest`].
#[tracing::instrument(skip_all)]
pub async fn update(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<quote_request::Id>, PathRejection>,
    body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(body) = body.map_err(AsError::into_error)?;

    service
        .execute(body.into_command(id))
        .await
        .map_err(AsError::into_error)
        .map(|r| Json(r.into()))
}

/// Deletes a [`QuoteRequest`] permanently.
#[tracing::instrument(skip_all)]
pub async fn delete(
    _: Admin,
    Extension(service): Extension<Service>,
    id: Result<Path<quote_request::Id>, PathRejection>,
) -> Result<Json<Deleted<quote_request::Id>>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;

    service
        .execute(command::DeleteQuoteRequest { id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Deleted::new(id)))
}

/// Accepts a [`QuoteRequest`] submitted from the storefront.
#[tracing::instrument(skip_all)]
pub async fn submit(
    _: Storefront,
    Extension(service): Extension<Service>,
    body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<Json<Single>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;

    let request = service
        .execute(command::SubmitQuoteRequest::from(body))
        .await
        .map_err(AsError::into_error)?;

    log::info!("quote request `{}` submitted", request.id);

    Ok(Json(request.into()))
}

define_error! {
    enum QuoteError {
        #[code = "QUOTE_REQUEST_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`QuoteRequest` does not exist"]
        NotExists,

        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`desired_period_end` cannot precede \
                     `desired_period_start`"]
        InvalidPeriod,

        #[code = "NO_REQUESTED_ITEMS"]
        #[status = BAD_REQUEST]
        #[message = "At least one of `requested_items` is required"]
        NoRequestedItems,
    }
}

impl AsError for command::create_quote_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidPeriod => Some(QuoteError::InvalidPeriod.into()),
        }
    }
}

impl AsError for command::submit_quote_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidPeriod => Some(QuoteError::InvalidPeriod.into()),
            Self::NoRequestedItems => Some(QuoteError::NoRequestedItems.into()),
        }
    }
}

impl AsError for command::update_quote_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::QuoteRequestNotExists(_) => {
                Some(QuoteError::NotExists.into())
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Patch;
    use service::{command, domain::quote_request};

    use super::{CreateBody, Filter, SubmitBody, UpdateBody};
    use crate::AsError as _;

    fn submission() -> serde_json::Value {
        serde_json::json!({
            "customer_name": "Jan de Vries",
            "customer_email": "jan@example.nl",
            "customer_phone": "",
            "company_name": "  ",
            "desired_period_start": "2026-04-01",
            "desired_period_end": "2026-04-14",
            "message": "",
            "requested_items": [{
                "product_id": "prod_1",
                "product_title": "Dell Latitude 5440",
                "rental_type": "korte_termijn",
                "quantity": 3,
            }],
        })
    }

    #[test]
    fn treats_blank_storefront_inputs_as_absent() {
        let body: SubmitBody = serde_json::from_value(submission()).unwrap();

        let cmd = command::SubmitQuoteRequest::from(body);
        assert!(cmd.customer_phone.is_none());
        assert!(cmd.company_name.is_none());
        assert!(cmd.message.is_none());
        assert_eq!(cmd.requested_items.len(), 1);
        assert_eq!(
            cmd.requested_items[0].rental_type,
            quote_request::RentalType::KorteTermijn,
        );
        assert_eq!(cmd.requested_items[0].quantity.get(), 3);
    }

    #[test]
    fn keeps_provided_storefront_inputs() {
        let mut json = submission();
        json["customer_phone"] = "+31 6 12345678".into();
        json["company_name"] = "Acme B.V.".into();
        let body: SubmitBody = serde_json::from_value(json).unwrap();

        assert_eq!(
            body.company_name.as_ref().map(ToString::to_string),
            Some("Acme B.V.".to_owned()),
        );
        assert!(body.customer_phone.is_some());
    }

    #[test]
    fn rejects_invalid_submission() {
        for (key, value) in [
            ("customer_email", serde_json::json!("not-an-email")),
            ("customer_name", serde_json::json!("")),
            ("desired_period_start", serde_json::Value::Null),
            ("requested_items", serde_json::Value::Null),
            ("customer_phone", serde_json::json!("call me")),
        ] {
            let mut json = submission();
            json[key] = value;
            assert!(
                serde_json::from_value::<SubmitBody>(json).is_err(),
                "`{key}` must be validated",
            );
        }
    }

    #[test]
    fn creates_new_requests_by_default() {
        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "company_name": "Acme B.V.",
            "contact_person": "Jan de Vries",
            "email": "jan@example.nl",
            "desired_period_start": "2026-04-01",
            "desired_period_end": "2026-04-14T17:00:00Z",
        }))
        .unwrap();

        let cmd = command::CreateQuoteRequest::from(body);
        assert_eq!(cmd.status, quote_request::Status::New);
        assert!(cmd.requested_items.is_empty());
        assert!(cmd.phone.is_none());

        let body: CreateBody = serde_json::from_value(serde_json::json!({
            "company_name": "Acme B.V.",
            "contact_person": "Jan de Vries",
            "email": "jan@example.nl",
            "phone": "",
            "desired_period_start": "2026-04-01",
            "desired_period_end": "2026-04-14",
            "notes": "",
        }))
        .unwrap();
        assert!(body.phone.is_none());
        assert!(body.notes.is_none());
    }

    #[test]
    fn reads_sparse_update() {
        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "status": "geaccepteerd",
        }))
        .unwrap();

        let cmd = body.into_command(quote_request::Id::new());
        assert_eq!(cmd.status, Patch::Set(quote_request::Status::Accepted));
        assert!(cmd.notes.is_keep());
        assert!(cmd.requested_items.is_keep());

        assert!(serde_json::from_value::<UpdateBody>(
            serde_json::json!({"status": "accepted"}),
        )
        .is_err());
    }

    #[test]
    fn clears_notes_with_blank_string() {
        for notes in [serde_json::json!(""), serde_json::Value::Null] {
            let body: UpdateBody =
                serde_json::from_value(serde_json::json!({"notes": notes}))
                    .unwrap();

            let cmd = body.into_command(quote_request::Id::new());
            assert_eq!(cmd.notes, Patch::Set(None));
            assert!(cmd.status.is_keep());
        }

        let body: UpdateBody = serde_json::from_value(serde_json::json!({
            "notes": " Klant belt terug ",
        }))
        .unwrap();
        assert_eq!(
            body.notes
                .as_set()
                .and_then(Option::as_ref)
                .map(AsRef::<str>::as_ref),
            Some("Klant belt terug"),
        );
    }

    #[test]
    fn filters_by_status() {
        let filter: Filter = serde_json::from_value(serde_json::json!({
            "status": "in_behandeling",
        }))
        .unwrap();

        assert_eq!(filter.status, Some(quote_request::Status::InProgress));
    }

    #[test]
    fn maps_command_errors() {
        use command::{
            submit_quote_request::ExecutionError as E,
            update_quote_request::ExecutionError as UpdateError,
        };

        let err = E::NoRequestedItems.as_error();
        assert_eq!(err.code, "NO_REQUESTED_ITEMS");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err = E::InvalidPeriod.as_error();
        assert_eq!(err.code, "INVALID_PERIOD");

        let err = UpdateError::QuoteRequestNotExists(quote_request::Id::new())
            .as_error();
        assert_eq!(err.code, "QUOTE_REQUEST_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }
}
