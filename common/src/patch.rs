//! [`Patch`]-related definitions.

/// Sparse update of a single field.
///
/// An absent field is [`Patch::Keep`] and leaves the target untouched, while a
/// present one is [`Patch::Set`] and replaces the target entirely. Nullable
/// fields are expressed as `Patch<Option<T>>`, so an explicit `null` clears
/// the target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Patch<T> {
    /// Leave the target value unchanged.
    Keep,

    /// Replace the target value.
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    /// Applies this [`Patch`] to the provided `target`.
    ///
    /// Returns whether the `target` has been replaced.
    pub fn apply(self, target: &mut T) -> bool {
        match self {
            Self::Keep => false,
            Self::Set(v) => {
                *target = v;
                true
            }
        }
    }

    /// Indicates whether this [`Patch`] leaves the target unchanged.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns a reference to the value being set, if any.
    #[must_use]
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(v) => Some(v),
        }
    }

    /// Maps the value being set with the provided function.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Keep => Patch::Keep,
            Self::Set(v) => Patch::Set(f(v)),
        }
    }

    /// Maps the value being set with the provided fallible function.
    ///
    /// # Errors
    ///
    /// If the provided function fails.
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<Patch<U>, E> {
        match self {
            Self::Keep => Ok(Patch::Keep),
            Self::Set(v) => f(v).map(Patch::Set),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! Use together with `#[serde(default)]`, so that a missing key produces
    //! [`Patch::Keep`].

    use serde::{Deserialize, Deserializer};

    use super::Patch;

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            T::deserialize(d).map(Self::Set)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Patch;

    #[test]
    fn keeps_absent_values() {
        let mut notes = Some("keep me".to_owned());

        assert!(!Patch::Keep.apply(&mut notes));
        assert_eq!(notes.as_deref(), Some("keep me"));
    }

    #[test]
    fn sets_and_clears_values() {
        let mut notes = Some("old".to_owned());

        assert!(Patch::Set(Some("new".to_owned())).apply(&mut notes));
        assert_eq!(notes.as_deref(), Some("new"));

        assert!(Patch::Set(None).apply(&mut notes));
        assert_eq!(notes, None);
    }

    #[test]
    fn maps_values() {
        assert_eq!(Patch::Set(2).map(|v| v * 2), Patch::Set(4));
        assert_eq!(Patch::<i32>::Keep.map(|v| v * 2), Patch::Keep);
        assert_eq!(
            Patch::Set(-1).try_map(|v| u8::try_from(v).map_err(drop)),
            Err(()),
        );
        assert_eq!(Patch::from(None::<u8>), Patch::Keep);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_sparse_objects() {
        #[derive(serde::Deserialize)]
        struct Body {
            #[serde(default)]
            status: Patch<String>,
            #[serde(default)]
            notes: Patch<Option<String>>,
        }

        let body: Body = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(body.status, Patch::Keep);
        assert_eq!(body.notes, Patch::Set(None));

        let body: Body =
            serde_json::from_str(r#"{"status": "actief"}"#).unwrap();
        assert_eq!(body.status, Patch::Set("actief".to_owned()));
        assert_eq!(body.notes, Patch::Keep);
    }
}
