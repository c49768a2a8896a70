//! [`Money`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Non-negative amount of money in euros.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] if the provided `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Multiplies this [`Money`] by the provided `quantity`.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Adds the `other` [`Money`] to this one.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Sums up the provided [`Money`] amounts.
    ///
    /// [`None`] is returned on overflow.
    pub fn checked_sum(
        amounts: impl IntoIterator<Item = Self>,
    ) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, m| acc.checked_add(m))
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map_err(|_| "invalid amount")
            .and_then(|d| Self::new(d).ok_or("negative amount"))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`Money`] is serialized as a JSON number and deserialized from either
    //! a number or a string.

    use rust_decimal::{prelude::ToPrimitive as _, Decimal};
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    impl Serialize for Money {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            let amount = self.0.to_f64().ok_or_else(|| {
                ser::Error::custom(format!("`Money` out of range: {}", self.0))
            })?;
            s.serialize_f64(amount)
        }
    }

    impl<'de> Deserialize<'de> for Money {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let amount = <Decimal as Deserialize>::deserialize(d)?;
            Self::new(amount).ok_or_else(|| {
                de::Error::custom(format!("negative amount: {amount}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(money("89.99").amount(), Decimal::new(8999, 2));
        assert_eq!(money("500").amount(), Decimal::from(500));
        assert_eq!(money(" 0 "), Money::ZERO);

        assert!(Money::from_str("-1").is_err());
        assert!(Money::from_str("12,50").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn rejects_negative() {
        assert!(Money::new(Decimal::new(-1, 2)).is_none());
        assert!(Money::new(Decimal::ZERO).is_some());
    }

    #[test]
    fn sums_line_amounts() {
        let lines = [
            money("69.99").checked_mul(2).unwrap(),
            money("89.99").checked_mul(1).unwrap(),
        ];

        assert_eq!(Money::checked_sum(lines), Some(money("229.97")));
        assert_eq!(Money::checked_sum([]), Some(Money::ZERO));
    }

    #[test]
    fn detects_overflow() {
        let max = Money::new(Decimal::MAX).unwrap();

        assert!(max.checked_mul(2).is_none());
        assert!(max.checked_add(money("1")).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json() {
        assert_eq!(serde_json::to_string(&money("89.99")).unwrap(), "89.99");
        assert_eq!(
            serde_json::from_str::<Money>("69.99").unwrap(),
            money("69.99"),
        );
        assert_eq!(
            serde_json::from_str::<Money>("\"500\"").unwrap(),
            money("500"),
        );
        assert!(serde_json::from_str::<Money>("-5").is_err());
    }
}
