//! [`Command`] for creating a new [`QuoteRequest`] by the staff.

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{quote_request, QuoteRequest},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`QuoteRequest`] by the staff.
#[derive(Clone, Debug)]
pub struct CreateQuoteRequest {
    /// [`quote_request::CompanyName`] of the requester.
    pub company_name: quote_request::CompanyName,

    /// [`quote_request::ContactPerson`] of the requester.
    pub contact_person: quote_request::ContactPerson,

    /// [`quote_request::Email`] of the requester.
    pub email: quote_request::Email,

    /// [`quote_request::Phone`] of the requester.
    pub phone: Option<quote_request::Phone>,

    /// Desired start of the rental.
    pub desired_period_start: quote_request::PeriodStartDateTime,

    /// Desired end of the rental.
    pub desired_period_end: quote_request::PeriodEndDateTime,

    /// Requested [`quote_request::RequestedItem`]s.
    pub requested_items: Vec<quote_request::RequestedItem>,

    /// Initial [`quote_request::Status`].
    pub status: quote_request::Status,

    /// [`quote_request::Notes`] of a new [`QuoteRequest`].
    pub notes: Option<quote_request::Notes>,
}

impl<Db> Command<CreateQuoteRequest> for Service<Db>
where
    Db: Database<Insert<QuoteRequest>, Err = Traced<database::Error>>,
{
    type Ok = QuoteRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateQuoteRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateQuoteRequest {
            company_name,
            contact_person,
            email,
            phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status,
            notes,
        } = cmd;

        if desired_period_end < desired_period_start.coerce() {
            return Err(tracerr::new!(E::InvalidPeriod));
        }

        let now = DateTime::now();
        let request = QuoteRequest {
            id: quote_request::Id::new(),
            company_name,
            contact_person,
            email,
            phone,
            desired_period_start,
            desired_period_end,
            requested_items,
            status,
            notes,
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

/// Error of [`CreateQuoteRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Desired period ends before it starts.
    #[display("Desired period ends before it starts")]
    InvalidPeriod,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{date, service},
            CreateQuoteRequest,
        },
        domain::quote_request,
        Command as _,
    };

    use super::ExecutionError;

    fn create() -> CreateQuoteRequest {
        CreateQuoteRequest {
            company_name: quote_request::CompanyName::new("Acme BV").unwrap(),
            contact_person: quote_request::ContactPerson::new("Jan Jansen")
                .unwrap(),
            email: quote_request::Email::new("jan@acme.nl").unwrap(),
            phone: None,
            desired_period_start: date("2026-06-01"),
            desired_period_end: date("2026-06-14"),
            requested_items: vec![],
            status: quote_request::Status::default(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn defaults_to_new_status() {
        let request = service().execute(create()).await.unwrap();

        assert_eq!(request.status, quote_request::Status::New);
        assert_eq!(request.status.to_string(), "nieuw");
    }

    #[tokio::test]
    async fn accepts_single_day_period() {
        let request = service()
            .execute(CreateQuoteRequest {
                desired_period_end: date("2026-06-01"),
                ..create()
            })
            .await
            .unwrap();

        assert_eq!(
            request.desired_period_end,
            request.desired_period_start.coerce(),
        );
    }

    #[tokio::test]
    async fn rejects_inverted_period() {
        let err = service()
            .execute(CreateQuoteRequest {
                desired_period_end: date("2026-05-31"),
                ..create()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidPeriod));
    }
}
