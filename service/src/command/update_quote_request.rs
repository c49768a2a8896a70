//! [`Command`] for updating a [`QuoteRequest`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime, Patch,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{quote_request, QuoteRequest},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`QuoteRequest`].
///
/// Only [`Patch::Set`] fields are changed. Any [`quote_request::Status`] may
/// be set regardless of the current one.
#[derive(Clone, Debug, Default)]
pub struct UpdateQuoteRequest {
    /// ID of the [`QuoteRequest`] to update.
    pub id: quote_request::Id,

    /// New [`quote_request::Status`].
    pub status: Patch<quote_request::Status>,

    /// New [`quote_request::Notes`].
    pub notes: Patch<Option<quote_request::Notes>>,

    /// New [`quote_request::RequestedItem`]s.
    pub requested_items: Patch<Vec<quote_request::RequestedItem>>,
}

impl<Db> Command<UpdateQuoteRequest> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<QuoteRequest>, quote_request::Id>>,
            Ok = Option<QuoteRequest>,
            Err = Traced<database::Error>,
        > + Database<Update<QuoteRequest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = QuoteRequest;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateQuoteRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateQuoteRequest {
            id,
            status,
            notes,
            requested_items,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut request = tx
            .execute(Select(By::<Option<QuoteRequest>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::QuoteRequestNotExists(id))
            .map_err(tracerr::wrap!())?;

        _ = status.apply(&mut request.status);
        _ = notes.apply(&mut request.notes);
        _ = requested_items.apply(&mut request.requested_items);
        request.updated_at = DateTime::now().coerce();

        tx.execute(Update(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(request)
    }
}

/// Error of [`UpdateQuoteRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`QuoteRequest`] with the provided ID does not exist.
    #[display("`QuoteRequest(id: {_0})` does not exist")]
    QuoteRequestNotExists(#[error(not(source))] quote_request::Id),
}

#[cfg(test)]
mod spec {
    use common::Patch;

    use crate::{
        command::{
            fixture::{date, service},
            CreateQuoteRequest, UpdateQuoteRequest,
        },
        domain::quote_request,
        query, read, Command as _, Query as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn updates_status_and_keeps_the_rest() {
        let service = service();
        let created = service
            .execute(CreateQuoteRequest {
                company_name: quote_request::CompanyName::new("Acme BV")
                    .unwrap(),
                contact_person: quote_request::ContactPerson::new("Jan")
                    .unwrap(),
                email: quote_request::Email::new("jan@acme.nl").unwrap(),
                phone: None,
                desired_period_start: date("2026-06-01"),
                desired_period_end: date("2026-06-14"),
                requested_items: vec![],
                status: quote_request::Status::default(),
                notes: Some(quote_request::Notes::new("Graag snel").unwrap()),
            })
            .await
            .unwrap();

        _ = service
            .execute(UpdateQuoteRequest {
                id: created.id,
                status: Patch::Set(quote_request::Status::Accepted),
                ..UpdateQuoteRequest::default()
            })
            .await
            .unwrap();

        let stored = service
            .execute(query::quote_request::ById::by(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, quote_request::Status::Accepted);
        assert_eq!(stored.status.to_string(), "geaccepteerd");
        assert_eq!(stored.company_name, created.company_name);
        assert_eq!(stored.email, created.email);
        assert_eq!(stored.notes, created.notes);
        assert_eq!(stored.desired_period_start, created.desired_period_start);
        assert_eq!(stored.desired_period_end, created.desired_period_end);

        // Closed requests may be reopened.
        let reopened = service
            .execute(UpdateQuoteRequest {
                id: created.id,
                status: Patch::Set(quote_request::Status::New),
                ..UpdateQuoteRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(reopened.status, quote_request::Status::New);

        let accepted = service
            .execute(query::quote_request::List::by(
                read::quote_request::list::Filter {
                    status: Some(quote_request::Status::Accepted),
                },
            ))
            .await
            .unwrap();
        assert!(accepted.is_empty());
    }

    #[tokio::test]
    async fn fails_on_unknown_request() {
        let err = service()
            .execute(UpdateQuoteRequest {
                id: quote_request::Id::new(),
                ..UpdateQuoteRequest::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::QuoteRequestNotExists(_),
        ));
    }
}
