//! [`Command`] for deleting a [`QuoteRequest`].

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{quote_request, QuoteRequest},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for permanently deleting a [`QuoteRequest`].
///
/// Deleting a missing [`QuoteRequest`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct DeleteQuoteRequest {
    /// ID of the [`QuoteRequest`] to delete.
    pub id: quote_request::Id,
}

impl<Db> Command<DeleteQuoteRequest> for Service<Db>
where
    Db: Database<
        Delete<By<QuoteRequest, quote_request::Id>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteQuoteRequest,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteQuoteRequest { id } = cmd;

        self.database()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Error of [`DeleteQuoteRequest`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            fixture::{date, service},
            DeleteQuoteRequest, SubmitQuoteRequest,
        },
        domain::{contract, product, quote_request},
        query, Command as _, Query as _,
    };

    #[tokio::test]
    async fn deletes_permanently() {
        let service = service();
        let request = service
            .execute(SubmitQuoteRequest {
                customer_name: quote_request::ContactPerson::new("Piet")
                    .unwrap(),
                customer_email: quote_request::Email::new("piet@example.nl")
                    .unwrap(),
                customer_phone: None,
                company_name: None,
                desired_period_start: date("2026-07-01"),
                desired_period_end: date("2026-07-02"),
                message: None,
                requested_items: vec![quote_request::RequestedItem {
                    product_id: product::Id::new("prod_1").unwrap(),
                    product_title: product::Title::new("Laptop").unwrap(),
                    rental_type: quote_request::RentalType::Offerte,
                    quantity: contract::item::Quantity::ONE,
                }],
            })
            .await
            .unwrap();

        service
            .execute(DeleteQuoteRequest { id: request.id })
            .await
            .unwrap();
        service
            .execute(DeleteQuoteRequest { id: request.id })
            .await
            .unwrap();

        assert!(service
            .execute(query::quote_request::ById::by(request.id))
            .await
            .unwrap()
            .is_none());
    }
}
