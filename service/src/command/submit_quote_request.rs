//! [`Command`] for submitting a new [`QuoteRequest`] from the storefront.

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{quote_request, QuoteRequest},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::Config;

use super::Command;

/// [`Command`] for submitting a new [`QuoteRequest`] from the storefront.
///
/// Submitted [`QuoteRequest`]s always start as [`quote_request::Status::New`].
#[derive(Clone, Debug)]
pub struct SubmitQuoteRequest {
    /// Name of the requesting customer.
    pub customer_name: quote_request::ContactPerson,

    /// [`quote_request::Email`] of the requesting customer.
    pub customer_email: quote_request::Email,

    /// [`quote_request::Phone`] of the requesting customer.
    pub customer_phone: Option<quote_request::Phone>,

    /// Company of the requesting customer.
    ///
    /// [`Config::anonymous_company_name`] is used when omitted.
    pub company_name: Option<quote_request::CompanyName>,

    /// Desired start of the rental.
    pub desired_period_start: quote_request::PeriodStartDateTime,

    /// Desired end of the rental.
    pub desired_period_end: quote_request::PeriodEndDateTime,

    /// Message of the requesting customer, stored as
    /// [`quote_request::Notes`].
    pub message: Option<quote_request::Notes>,

    /// Requested [`quote_request::RequestedItem`]s, at least one.
    pub requested_items: Vec<quote_request::RequestedItem>,
}

impl<Db> Command<SubmitQuoteRequest> for Service<Db>
where
    Db: Database<Insert<QuoteRequest>, Err = Traced<database::Error>>,
{
    type Ok = QuoteRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitQuoteRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitQuoteRequest {
            customer_name,
            customer_email,
            customer_phone,
            company_name,
            desired_period_start,
            desired_period_end,
            message,
            requested_items,
        } = cmd;

        if requested_items.is_empty() {
            return Err(tracerr::new!(E::NoRequestedItems));
        }
        if desired_period_end < desired_period_start.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod));
        }

        let now = DateTime::now();
        let request = QuoteRequest {
            id: quote_request::Id::new(),
            company_name: company_name.unwrap_or_else(|| {
                self.config().anonymous_company_name.clone()
            }),
            contact_person: customer_name,
            email: customer_email,
            phone: customer_phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status: quote_request::Status::New,
            notes: message,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        self.database()
            .execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(request)
    }
}

/// Error of [`SubmitQuoteRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Desired period ends before it starts.
    #[display("Desired period ends before it starts")]
    InvalidPeriod,

    /// No [`quote_request::RequestedItem`]s provided.
    #[display("At least one item must be requested")]
    NoRequestedItems,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{date, service},
            SubmitQuoteRequest,
        },
        domain::{contract, product, quote_request},
        query, Command as _, Query as _,
    };

    use super::ExecutionError;

    fn submit() -> SubmitQuoteRequest {
        SubmitQuoteRequest {
            customer_name: quote_request::ContactPerson::new("Piet de Vries")
                .unwrap(),
            customer_email: quote_request::Email::new("piet@example.nl")
                .unwrap(),
            customer_phone: Some(
                quote_request::Phone::new("+31 6 12345678").unwrap(),
            ),
            company_name: None,
            desired_period_start: date("2026-07-01"),
            desired_period_end: date("2026-07-10"),
            message: None,
            requested_items: vec![quote_request::RequestedItem {
                product_id: product::Id::new("prod_1").unwrap(),
                product_title: product::Title::new("ThinkPad T14").unwrap(),
                rental_type: quote_request::RentalType::KorteTermijn,
                quantity: contract::item::Quantity::new(3).unwrap(),
            }],
        }
    }

    #[tokio::test]
    async fn falls_back_to_anonymous_company() {
        let service = service();

        let request = service.execute(submit()).await.unwrap();

        assert_eq!(request.company_name.to_string(), "Particulier");
        assert_eq!(request.status, quote_request::Status::New);
        let stored = service
            .execute(query::quote_request::ById::by(request.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.requested_items, request.requested_items);
        assert_eq!(stored.contact_person.to_string(), "Piet de Vries");
    }

    #[tokio::test]
    async fn requires_requested_items() {
        let err = service()
            .execute(SubmitQuoteRequest {
                requested_items: vec![],
                ..submit()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoRequestedItems));
    }
}
