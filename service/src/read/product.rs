//! [`Product`] read model definition.

use crate::domain::{product, Product};

/// [`Product`] joined with its [`product::Attributes`], if any.
#[derive(Clone, Debug)]
pub struct WithAttributes {
    /// Catalog [`Product`].
    pub product: Product,

    /// [`product::Attributes`] of the [`Product`].
    pub attributes: Option<product::Attributes>,
}

pub mod list {
    //! [`WithAttributes`] list definitions.

    use crate::domain::{product, Product};
    #[cfg(doc)]
    use super::WithAttributes;

    /// Filter of [`WithAttributes`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`product::Status`] to match.
        pub status: Option<product::Status>,
    }

    impl Filter {
        /// [`Filter`] of the [`Product`]s visible in the storefront.
        pub const PUBLISHED: Self = Self {
            status: Some(product::Status::Published),
        };

        /// Checks whether the provided [`Product`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, product: &Product) -> bool {
            self.status.map_or(true, |s| s == product.status)
        }
    }
}
