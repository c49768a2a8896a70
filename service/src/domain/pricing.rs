//! [`RentalPricing`] definitions.

use common::{unit, DateTimeOf, Money};
#[cfg(doc)]
use common::DateTime;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{contract, product};

/// Monthly rental rates of a [`Product`].
///
/// A plan price may be retained while the plan itself is unavailable, so
/// neither price presence nor availability implies the other.
///
/// [`Product`]: crate::domain::Product
#[derive(Clone, Debug)]
pub struct RentalPricing {
    /// ID of this [`RentalPricing`].
    pub id: Id,

    /// ID of the priced [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// Monthly price of the flex plan.
    pub flex_monthly_price: Option<Money>,

    /// Monthly price of the year plan.
    pub year_monthly_price: Option<Money>,

    /// Deposit charged once per rented unit.
    pub deposit_amount: Option<Money>,

    /// Indicator whether the flex plan is offered.
    pub flex_available: bool,

    /// Indicator whether the year plan is offered.
    pub year_available: bool,

    /// [`DateTime`] when this [`RentalPricing`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`RentalPricing`] was updated last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] when this [`RentalPricing`] was deleted.
    pub deleted_at: Option<DeletionDateTime>,
}

impl RentalPricing {
    /// Returns the monthly price of the provided [`contract::Kind`], if the
    /// plan is both offered and priced.
    ///
    /// [`contract::Kind::Offerte`] is negotiated manually, so never has a
    /// catalog price.
    #[must_use]
    pub fn monthly_price(&self, plan: contract::Kind) -> Option<Money> {
        match plan {
            contract::Kind::Flex => {
                self.flex_monthly_price.filter(|_| self.flex_available)
            }
            contract::Kind::Jaar => {
                self.year_monthly_price.filter(|_| self.year_available)
            }
            contract::Kind::Offerte => None,
        }
    }

    /// Indicates whether this [`RentalPricing`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of a [`RentalPricing`].
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

/// [`DateTime`] when a [`RentalPricing`] was created.
pub type CreationDateTime = DateTimeOf<(RentalPricing, unit::Creation)>;

/// [`DateTime`] when a [`RentalPricing`] was updated last time.
pub type ModificationDateTime = DateTimeOf<(RentalPricing, unit::Modification)>;

/// [`DateTime`] when a [`RentalPricing`] was deleted.
pub type DeletionDateTime = DateTimeOf<(RentalPricing, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::domain::{contract, product};

    use super::{Id, RentalPricing};

    fn pricing(flex_available: bool, year_available: bool) -> RentalPricing {
        RentalPricing {
            id: Id::new(),
            product_id: product::Id::new("prod_1").unwrap(),
            flex_monthly_price: Some("89.99".parse().unwrap()),
            year_monthly_price: Some("69.99".parse().unwrap()),
            deposit_amount: Some("500".parse().unwrap()),
            flex_available,
            year_available,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    #[test]
    fn prices_available_plans() {
        let p = pricing(true, true);

        assert_eq!(
            p.monthly_price(contract::Kind::Flex),
            Some("89.99".parse::<Money>().unwrap()),
        );
        assert_eq!(
            p.monthly_price(contract::Kind::Jaar),
            Some("69.99".parse::<Money>().unwrap()),
        );
        assert_eq!(p.monthly_price(contract::Kind::Offerte), None);
    }

    #[test]
    fn hides_unavailable_plans() {
        let p = pricing(false, true);

        assert_eq!(p.monthly_price(contract::Kind::Flex), None);
        assert!(p.flex_monthly_price.is_some());
        assert!(p.monthly_price(contract::Kind::Jaar).is_some());
    }
}
