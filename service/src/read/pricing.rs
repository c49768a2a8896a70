//! [`RentalPricing`] read model definition.

use std::collections::HashMap;

use crate::domain::{product, RentalPricing};

/// Current [`RentalPricing`]s of [`Product`]s.
///
/// The current [`RentalPricing`] of a [`Product`] is its earliest created
/// non-deleted one.
///
/// [`Product`]: crate::domain::Product
pub type Current = HashMap<product::Id, RentalPricing>;

pub mod list {
    //! [`RentalPricing`]s list definitions.

    use crate::domain::{product, RentalPricing};

    /// Filter of non-deleted [`RentalPricing`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the priced [`Product`].
        ///
        /// [`Product`]: crate::domain::Product
        pub product_id: Option<product::Id>,
    }

    impl Filter {
        /// Checks whether the provided [`RentalPricing`] matches this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, pricing: &RentalPricing) -> bool {
            !pricing.is_deleted()
                && self
                    .product_id
                    .as_ref()
                    .map_or(true, |id| *id == pricing.product_id)
        }
    }
}
