//! [`RentalReturn`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contract;
#[cfg(doc)]
use crate::domain::Contract;

/// Record of rented units being physically returned.
///
/// A [`RentalReturn`] neither changes the [`contract::Status`] nor settles the
/// [`Contract`] deposit, both remain manual actions.
#[derive(Clone, Debug)]
pub struct RentalReturn {
    /// ID of this [`RentalReturn`].
    pub id: Id,

    /// ID of the returned [`Contract`].
    pub contract_id: contract::Id,

    /// [`DateTime`] when the units were returned.
    pub return_date: ReturnDateTime,

    /// [`Condition`] of the returned units.
    pub condition: Condition,

    /// Description of the found damage, if any.
    pub damage_description: Option<DamageDescription>,

    /// Part of the deposit withheld.
    pub deposit_withheld: Money,

    /// Reason of withholding the deposit.
    pub withhold_reason: Option<WithholdReason>,

    /// [`DateTime`] when this [`RentalReturn`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`RentalReturn`].
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

define_text! {
    #[doc = "Condition of returned units."]
    Condition(max = 2048)
}

define_text! {
    #[doc = "Description of a damage found on return."]
    DamageDescription(max = 4096)
}

define_text! {
    #[doc = "Reason of withholding a deposit."]
    WithholdReason(max = 2048)
}

/// [`DateTime`] when rented units were returned.
pub type ReturnDateTime = DateTimeOf<(RentalReturn, Returned)>;

/// [`DateTime`] when a [`RentalReturn`] was created.
pub type CreationDateTime = DateTimeOf<(RentalReturn, unit::Creation)>;

/// Marker of a [`ReturnDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct Returned;
