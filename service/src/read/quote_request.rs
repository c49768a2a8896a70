//! [`QuoteRequest`] read model definition.

#[cfg(doc)]
use crate::domain::QuoteRequest;

pub mod list {
    //! [`QuoteRequest`]s list definitions.

    use crate::domain::{quote_request, QuoteRequest};

    /// Filter of [`QuoteRequest`]s.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`quote_request::Status`] to match.
        pub status: Option<quote_request::Status>,
    }

    impl Filter {
        /// Checks whether the provided [`QuoteRequest`] matches this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, request: &QuoteRequest) -> bool {
            self.status.map_or(true, |s| s == request.status)
        }
    }
}
