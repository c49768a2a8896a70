//! [`Contract`] read model definition.

#[cfg(doc)]
use crate::domain::Contract;

pub mod list {
    //! [`Contract`]s list definitions.

    use crate::domain::{contract, customer, Contract};

    /// Filter of non-deleted [`Contract`]s.
    ///
    /// Unset fields match any [`Contract`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the customer renting.
        pub customer_id: Option<customer::Id>,

        /// [`contract::Status`] to match.
        pub status: Option<contract::Status>,

        /// [`contract::Kind`] to match.
        pub kind: Option<contract::Kind>,
    }

    impl Filter {
        /// Checks whether the provided [`Contract`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, contract: &Contract) -> bool {
            !contract.is_deleted()
                && self
                    .customer_id
                    .as_ref()
                    .map_or(true, |id| *id == contract.customer_id)
                && self.status.map_or(true, |s| s == contract.status)
                && self.kind.map_or(true, |k| k == contract.kind)
        }
    }
}
