//! [`Contract`] definitions.

pub mod item;

use common::{define_kind, unit, DateTimeOf, Money};
#[cfg(doc)]
use common::DateTime;
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer;

pub use self::item::Item;

/// Rental agreement between a customer and the shop.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// Human-assigned [`Number`] of this [`Contract`].
    pub number: Number,

    /// ID of the customer renting the [`Item`]s.
    pub customer_id: customer::Id,

    /// [`Kind`] of this [`Contract`].
    pub kind: Kind,

    /// Lifecycle [`Status`] of this [`Contract`].
    pub status: Status,

    /// [`DateTime`] when this [`Contract`] starts.
    pub start_date: StartDateTime,

    /// [`DateTime`] when this [`Contract`] ends, if agreed already.
    pub end_date: Option<EndDateTime>,

    /// Earliest [`DateTime`] this [`Contract`] may be ended at.
    pub earliest_end_date: EarliestEndDateTime,

    /// Amount charged monthly for all the [`Item`]s.
    pub monthly_amount: Money,

    /// Deposit charged for all the [`Item`]s.
    pub deposit_amount: Money,

    /// Indicator whether the deposit has been paid.
    pub deposit_paid: bool,

    /// Indicator whether the deposit has been refunded.
    pub deposit_refunded: bool,

    /// Free-form [`Notes`] of this [`Contract`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was updated last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] when this [`Contract`] was deleted.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Contract {
    /// Indicates whether this [`Contract`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of a [`Contract`].
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
    #[doc = "Human-assigned number of a [`Contract`], unique among the \
             non-deleted ones."]
    Number(max = 64)
}

define_text! {
    #[doc = "Free-form notes of a [`Contract`]."]
    Notes(max = 4096)
}

define_kind! {
    #[doc = "Kind of a [`Contract`]."]
    enum Kind {
        #[doc = "Monthly cancellable subscription after a 3 months minimum."]
        Flex = "flex",

        #[doc = "Fixed 12 months subscription."]
        Jaar = "jaar",

        #[doc = "Short-term rental negotiated via a quote."]
        Offerte = "offerte",
    }
}

impl Kind {
    /// Returns the minimum term of this [`Kind`] in months.
    #[must_use]
    pub const fn minimum_term(self) -> u32 {
        match self {
            Self::Jaar => 12,
            Self::Flex | Self::Offerte => 3,
        }
    }

    /// Calculates the [`EarliestEndDateTime`] of a [`Contract`] of this
    /// [`Kind`] starting at the provided `start` [`DateTime`].
    ///
    /// [`None`] is returned if the result is out of range.
    #[must_use]
    pub fn earliest_end_date(
        self,
        start: StartDateTime,
    ) -> Option<EarliestEndDateTime> {
        start.add_months(self.minimum_term()).map(DateTimeOf::coerce)
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Contract`]."]
    enum Status {
        #[doc = "Awaiting activation."]
        Pending = "in_afwachting",

        #[doc = "Rented [`Item`]s are with the customer."]
        Active = "actief",

        #[doc = "About to end."]
        EndingSoon = "eindigt_binnenkort",

        #[doc = "Ended regularly."]
        Terminated = "beëindigd",

        #[doc = "Cancelled before ending regularly."]
        Cancelled = "geannuleerd",
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Pending
    }
}

impl Status {
    /// Indicates whether this [`Status`] ends the lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Cancelled)
    }

    /// Transitions this [`Status`] into the provided one.
    ///
    /// Staying in the same [`Status`] is always allowed, as is resetting any
    /// [`Status`] to [`Status::Pending`].
    ///
    /// # Errors
    ///
    /// With [`InvalidTransition`] if the transition is not allowed.
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        let allowed = match (self, to) {
            (from, to) if from == to => true,
            (_, Self::Pending) => true,
            (Self::Pending | Self::EndingSoon, Self::Active)
            | (Self::Pending | Self::Active, Self::EndingSoon) => true,
            (from, Self::Terminated | Self::Cancelled) => !from.is_terminal(),
            (Self::Active | Self::Terminated | Self::Cancelled, Self::Active)
            | (
                Self::EndingSoon | Self::Terminated | Self::Cancelled,
                Self::EndingSoon,
            ) => false,
        };
        if allowed {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

/// Error of a disallowed [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`Contract` cannot move from `{from}` to `{to}`")]
pub struct InvalidTransition {
    /// [`Status`] the transition was requested from.
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// [`DateTime`] when a [`Contract`] starts.
pub type StartDateTime = DateTimeOf<(Contract, Start)>;

/// [`DateTime`] when a [`Contract`] ends.
pub type EndDateTime = DateTimeOf<(Contract, End)>;

/// Earliest [`DateTime`] a [`Contract`] may be ended at.
pub type EarliestEndDateTime = DateTimeOf<(Contract, EarliestEnd)>;

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was updated last time.
pub type ModificationDateTime = DateTimeOf<(Contract, unit::Modification)>;

/// [`DateTime`] when a [`Contract`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Contract, unit::Deletion)>;

/// Marker of a [`StartDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker of an [`EndDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Marker of an [`EarliestEndDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct EarliestEnd;
