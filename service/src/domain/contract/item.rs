//! [`Item`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product;
#[cfg(doc)]
use crate::domain::Contract;

use super::Id as ContractId;

/// Line item of a [`Contract`].
///
/// Both [`Contract`] and [`Product`] associations are immutable.
///
/// [`Product`]: crate::domain::Product
#[derive(Clone, Debug)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// ID of the [`Contract`] this [`Item`] belongs to.
    pub contract_id: ContractId,

    /// ID of the rented [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Rented [`Quantity`].
    pub quantity: Quantity,

    /// [`SerialNumber`] of the delivered unit.
    pub serial_number: Option<SerialNumber>,

    /// [`Condition`] of the unit when delivered.
    pub condition_on_delivery: Option<Condition>,

    /// [`Condition`] of the unit when returned.
    pub condition_on_return: Option<Condition>,

    /// [`DateTime`] when this [`Item`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Item`] was updated last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] when this [`Item`] was deleted.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Item {
    /// Indicates whether this [`Item`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of an [`Item`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Rented quantity of an [`Item`], at least one.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    /// Single unit.
    pub const ONE: Self = Self(1);

    /// Creates a new [`Quantity`] if the provided `amount` is at least one.
    #[must_use]
    pub fn new(amount: u32) -> Option<Self> {
        i32::try_from(amount)
            .ok()
            .filter(|a| *a >= 1)
            .map(Self)
    }

    /// Returns the amount of this [`Quantity`].
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = u32::deserialize(d)?;
        Self::new(amount).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "quantity must be at least 1, got {amount}",
            ))
        })
    }
}

define_text! {
    #[doc = "Serial number of a rented unit."]
    SerialNumber(max = 128)
}

define_text! {
    #[doc = "Free-text description of a unit condition."]
    Condition(max = 2048)
}

/// [`DateTime`] when an [`Item`] was created.
pub type CreationDateTime = DateTimeOf<(Item, unit::Creation)>;

/// [`DateTime`] when an [`Item`] was updated last time.
pub type ModificationDateTime = DateTimeOf<(Item, unit::Modification)>;

/// [`DateTime`] when an [`Item`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Item, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::Quantity;

    #[test]
    fn quantity_is_at_least_one() {
        assert_eq!(Quantity::default().get(), 1);
        assert_eq!(Quantity::new(2).map(Quantity::get), Some(2));
        assert!(Quantity::new(0).is_none());
        assert!(Quantity::new(u32::MAX).is_none());
    }

    #[test]
    fn deserializes_quantity() {
        assert_eq!(
            serde_json::from_str::<Quantity>("3").unwrap(),
            Quantity::new(3).unwrap(),
        );
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
    }
}
