//! Customer definitions.
//!
//! Customers are managed by the commerce platform, so only their IDs are
//! referenced here.

define_text! {
    #[doc = "ID of a customer of the commerce platform."]
    Id(max = 128)
}
