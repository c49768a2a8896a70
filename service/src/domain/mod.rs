//! Domain definitions.

/// Defines a trimmed, non-empty and length-limited text newtype.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
            ::serde::Serialize,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum length of this value in characters.
            pub const MAX_LEN: usize = $max;

            #[doc = concat!("Creates a new [`", stringify!($name), "`].")]
            ///
            /// Surrounding whitespace is trimmed. [`None`] is returned if the
            /// trimmed value is empty or too long.
            #[must_use]
            pub fn new(value: impl AsRef<str>) -> Option<Self> {
                let value = value.as_ref().trim();
                Self::check(value).then(|| Self(value.to_owned()))
            }

            /// Checks whether the provided `value` is valid.
            fn check(value: &str) -> bool {
                !value.is_empty() && value.chars().count() <= Self::MAX_LEN
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(d: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <String as ::serde::Deserialize>::deserialize(d)?;
                Self::new(&s).ok_or_else(|| {
                    ::serde::de::Error::custom(concat!(
                        "invalid `",
                        stringify!($name),
                        "`: empty or longer than ",
                        stringify!($max),
                        " characters",
                    ))
                })
            }
        }
    };
}

pub mod contract;
pub mod customer;
pub mod pricing;
pub mod product;
pub mod quote_request;
pub mod rental_return;

pub use self::{
    contract::Contract, pricing::RentalPricing, product::Product,
    quote_request::QuoteRequest, rental_return::RentalReturn,
};
