//! [`Command`] definition.

pub mod add_contract_item;
pub mod create_contract;
pub mod create_quote_request;
pub mod create_rental_pricing;
pub mod delete_contract;
pub mod delete_quote_request;
pub mod delete_rental_pricing;
pub mod register_return;
pub mod remove_contract_item;
pub mod set_product_attributes;
pub mod submit_quote_request;
pub mod update_contract;
pub mod update_contract_item;
pub mod update_quote_request;
pub mod update_rental_pricing;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_contract_item::AddContractItem, create_contract::CreateContract,
    create_quote_request::CreateQuoteRequest,
    create_rental_pricing::CreateRentalPricing,
    delete_contract::DeleteContract,
    delete_quote_request::DeleteQuoteRequest,
    delete_rental_pricing::DeleteRentalPricing,
    register_return::RegisterReturn,
    remove_contract_item::RemoveContractItem,
    set_product_attributes::SetProductAttributes,
    submit_quote_request::SubmitQuoteRequest,
    update_contract::UpdateContract,
    update_contract_item::UpdateContractItem,
    update_quote_request::UpdateQuoteRequest,
    update_rental_pricing::UpdateRentalPricing,
};

#[cfg(test)]
pub(crate) mod fixture {
    //! Helpers for [`Command`] tests.

    use common::DateTime;

    use crate::{
        domain::{contract, customer, product, quote_request, Product},
        infra::database::Memory,
        Config, Service,
    };

    use super::{create_contract, CreateContract};

    /// Creates a new [`Service`] backed by an empty [`Memory`] database.
    pub(crate) fn service() -> Service<Memory> {
        Service::new(
            Config {
                anonymous_company_name: quote_request::CompanyName::new(
                    "Particulier",
                )
                .unwrap(),
            },
            Memory::new(),
        )
    }

    /// Creates a published [`Product`] with the provided ID.
    pub(crate) fn published_product(id: &str) -> Product {
        Product {
            id: product::Id::new(id).unwrap(),
            title: product::Title::new(format!("Laptop {id}")).unwrap(),
            description: None,
            handle: product::Handle::new(id).unwrap(),
            thumbnail: None,
            status: product::Status::Published,
        }
    }

    /// Parses the provided `YYYY-MM-DD` date.
    pub(crate) fn date<Of: ?Sized>(s: &str) -> common::DateTimeOf<Of> {
        DateTime::parse(s).unwrap().coerce()
    }

    /// Creates a [`CreateContract`] with a single item and an explicit
    /// monthly amount.
    pub(crate) fn create_contract(number: &str) -> CreateContract {
        CreateContract {
            number: contract::Number::new(number).unwrap(),
            customer_id: customer::Id::new("cus_1").unwrap(),
            kind: contract::Kind::Flex,
            status: contract::Status::Pending,
            start_date: date("2026-01-31"),
            end_date: None,
            earliest_end_date: None,
            monthly_amount: Some("89.99".parse().unwrap()),
            deposit_amount: "500".parse().unwrap(),
            deposit_paid: false,
            deposit_refunded: false,
            notes: Some(contract::Notes::new("Levering op kantoor").unwrap()),
            items: vec![create_contract::Item {
                product_id: product::Id::new("prod_1").unwrap(),
                quantity: contract::item::Quantity::ONE,
                serial_number: None,
                condition_on_delivery: None,
            }],
        }
    }
}
