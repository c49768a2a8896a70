//! [`RentalReturn`] read model definition.

#[cfg(doc)]
use crate::domain::RentalReturn;

pub mod list {
    //! [`RentalReturn`]s list definitions.

    use crate::domain::{contract, RentalReturn};

    /// Filter of [`RentalReturn`]s.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the returned [`Contract`].
        ///
        /// [`Contract`]: crate::domain::Contract
        pub contract_id: Option<contract::Id>,
    }

    impl Filter {
        /// Checks whether the provided [`RentalReturn`] matches this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, rental_return: &RentalReturn) -> bool {
            self.contract_id
                .map_or(true, |id| id == rental_return.contract_id)
        }
    }
}
