//! Read entities definitions.

pub mod contract;
pub mod pricing;
pub mod product;
pub mod quote_request;
pub mod rental_return;
