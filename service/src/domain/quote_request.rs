//! [`QuoteRequest`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract::item::Quantity, product};
#[cfg(doc)]
use crate::domain::Contract;

/// Prospective rental request awaiting a manual quote.
///
/// Accepting a [`QuoteRequest`] doesn't create any [`Contract`].
#[derive(Clone, Debug)]
pub struct QuoteRequest {
    /// ID of this [`QuoteRequest`].
    pub id: Id,

    /// [`CompanyName`] of the requester.
    pub company_name: CompanyName,

    /// [`ContactPerson`] of the requester.
    pub contact_person: ContactPerson,

    /// [`Email`] of the requester.
    pub email: Email,

    /// [`Phone`] of the requester.
    pub phone: Option<Phone>,

    /// [`DateTime`] when the requested rental should start.
    pub desired_period_start: PeriodStartDateTime,

    /// [`DateTime`] when the requested rental should end.
    ///
    /// Never earlier than the [`QuoteRequest::desired_period_start`].
    pub desired_period_end: PeriodEndDateTime,

    /// [`RequestedItem`]s of this [`QuoteRequest`].
    pub requested_items: Vec<RequestedItem>,

    /// Workflow [`Status`] of this [`QuoteRequest`].
    pub status: Status,

    /// Free-form [`Notes`] of this [`QuoteRequest`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`QuoteRequest`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`QuoteRequest`] was updated last time.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`QuoteRequest`].
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

/// Product line of a [`QuoteRequest`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RequestedItem {
    /// ID of the requested [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Title of the requested [`Product`] at the time of request.
    ///
    /// [`Product`]: crate::domain::Product
    pub product_title: product::Title,

    /// Requested [`RentalType`].
    pub rental_type: RentalType,

    /// Requested [`Quantity`].
    #[serde(default)]
    pub quantity: Quantity,
}

define_kind! {
    #[doc = "Rental type of a [`RequestedItem`]."]
    enum RentalType {
        #[doc = "Flex subscription."]
        Flex = "flex",

        #[doc = "Year subscription."]
        Jaar = "jaar",

        #[doc = "Short-term rental of 1 day up to 4 weeks."]
        KorteTermijn = "korte_termijn",

        #[doc = "Manually negotiated offer."]
        Offerte = "offerte",
    }
}

define_kind! {
    #[doc = "Workflow status of a [`QuoteRequest`]."]
    enum Status {
        #[doc = "Just received."]
        New = "nieuw",

        #[doc = "Being processed by the staff."]
        InProgress = "in_behandeling",

        #[doc = "Quote has been sent to the requester."]
        QuoteSent = "offerte_verstuurd",

        #[doc = "Quote has been accepted by the requester."]
        Accepted = "geaccepteerd",

        #[doc = "Quote has been rejected."]
        Rejected = "afgewezen",
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::New
    }
}

impl Status {
    /// Indicates whether this [`Status`] usually closes the workflow.
    ///
    /// Closed [`QuoteRequest`]s may still be reopened.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

define_text! {
    #[doc = "Company name of a [`QuoteRequest`] requester."]
    CompanyName(max = 255)
}

define_text! {
    #[doc = "Contact person of a [`QuoteRequest`] requester."]
    ContactPerson(max = 255)
}

define_text! {
    #[doc = "Free-form notes of a [`QuoteRequest`]."]
    Notes(max = 4096)
}

/// Email address of a [`QuoteRequest`] requester.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim();
        Self::check(address).then(|| Self(address.to_owned()))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: &str) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("valid regex")
        });

        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        Self::new(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid email address `{s}`"))
        })
    }
}

/// Phone number of a [`QuoteRequest`] requester.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        Self::check(number).then(|| Self(number.to_owned()))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: &str) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9][0-9\s()\-]{5,30}$").expect("valid regex")
        });

        REGEX.is_match(number)
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

impl<'de> Deserialize<'de> for Phone {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        Self::new(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid phone number `{s}`"))
        })
    }
}

/// [`DateTime`] when the requested rental period starts.
pub type PeriodStartDateTime = DateTimeOf<(QuoteRequest, PeriodStart)>;

/// [`DateTime`] when the requested rental period ends.
pub type PeriodEndDateTime = DateTimeOf<(QuoteRequest, PeriodEnd)>;

/// [`DateTime`] when a [`QuoteRequest`] was created.
pub type CreationDateTime = DateTimeOf<(QuoteRequest, unit::Creation)>;

/// [`DateTime`] when a [`QuoteRequest`] was updated last time.
pub type ModificationDateTime =
    DateTimeOf<(QuoteRequest, unit::Modification)>;

/// Marker of a [`PeriodStartDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct PeriodStart;

/// Marker of a [`PeriodEndDateTime`].
#[derive(Clone, Copy, Debug)]
pub struct PeriodEnd;
