//! Date and time utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{
    cmp::Ordering, marker::PhantomData, ops, str::FromStr, time::Duration,
};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
    Month, UtcOffset,
};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Parses a [`DateTime`] from either an [RFC 3339] string or a bare
    /// `YYYY-MM-DD` date, the latter meaning midnight UTC of that date.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither of the supported formats.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::from_rfc3339(input).or_else(|e| {
            let format = format_description!("[year]-[month]-[day]");
            time::Date::parse(input, format)
                .map(|date| Self {
                    inner: date.midnight().assume_utc(),
                    _of: PhantomData,
                })
                .map_err(|_| e)
        })
    }

    /// Adds the provided number of calendar `months` to this [`DateTime`].
    ///
    /// A day missing in the resulting month is clamped to the last day of
    /// that month (31 January plus one month is 28 or 29 February). The time
    /// of day is preserved.
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn add_months(self, months: u32) -> Option<Self> {
        let date = self.inner.date();
        let months = i32::try_from(months).ok()?;
        let index = i32::from(u8::from(date.month()) - 1).checked_add(months)?;
        let year = date.year().checked_add(index.div_euclid(12))?;
        let month =
            Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?)
                .ok()?;
        let day = date.day().min(month.length(year));
        let date = time::Date::from_calendar_date(year, month, day).ok()?;
        Some(Self {
            inner: self.inner.replace_date(date),
            _of: PhantomData,
        })
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner + rhs,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> FromStr for DateTimeOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)?
            .try_into()
            .map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`DateTimeOf`] is serialized as an [RFC 3339] string and deserialized
    //! by [`DateTimeOf::parse()`].
    //!
    //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::DateTimeOf;

    impl<Of: ?Sized> Serialize for DateTimeOf<Of> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_str(&self.to_rfc3339())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateTimeOf<Of> {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = String::deserialize(d)?;
            Self::parse(&s).map_err(|e| {
                de::Error::custom(format!("invalid date `{s}`: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    fn dt(s: &str) -> DateTime {
        DateTime::parse(s).unwrap()
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        assert_eq!(dt("2026-02-04"), dt("2026-02-04T00:00:00Z"));
        assert_eq!(
            dt("2026-02-04T10:30:00+01:00"),
            dt("2026-02-04T09:30:00Z"),
        );

        assert!(DateTime::parse("04-02-2026").is_err());
        assert_eq!(
            "2026-02-04".parse::<DateTime>().ok(),
            Some(dt("2026-02-04")),
        );
        assert!(DateTime::parse("2026-02-30").is_err());
        assert!(DateTime::parse("").is_err());
    }

    #[test]
    fn adds_months() {
        assert_eq!(dt("2026-02-04").add_months(3), Some(dt("2026-05-04")));
        assert_eq!(dt("2026-11-15").add_months(3), Some(dt("2027-02-15")));
        assert_eq!(dt("2026-02-04").add_months(12), Some(dt("2027-02-04")));
        assert_eq!(
            dt("2026-03-01T12:45:00Z").add_months(0),
            Some(dt("2026-03-01T12:45:00Z")),
        );
    }

    #[test]
    fn clamps_missing_days() {
        assert_eq!(dt("2026-01-31").add_months(3), Some(dt("2026-04-30")));
        assert_eq!(dt("2027-11-30").add_months(3), Some(dt("2028-02-29")));
        assert_eq!(dt("2028-02-29").add_months(12), Some(dt("2029-02-28")));
    }

    #[test]
    fn formats_rfc3339() {
        assert_eq!(dt("2026-02-04").to_rfc3339(), "2026-02-04T00:00:00Z");
    }
}
