//! Positive-integer identifiers
//!
//! Each id type parses raw form input with the same rule: an empty value is
//! absent (valid for optional references), anything that is not an integer in
//! `1..=u32::MAX` is a range violation.

use crate::enumeration::{EnumCode, Gender};
use crate::violation::{ConstraintViolation, Validation};
use fbr_store::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a record is stored
pub trait DocKey: Copy + Eq + Ord + fmt::Debug + Send + Sync + 'static {
    /// Store document id
    fn doc_id(&self) -> String;

    /// Value stored in reference fields
    fn to_value(&self) -> FieldValue;
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $range_message:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Message of the range violation
            pub const RANGE_MESSAGE: &'static str = $range_message;

            /// Wrap a positive integer
            #[must_use]
            pub fn new(value: u32) -> Option<Self> {
                (value > 0).then_some(Self(value))
            }

            /// Inner value
            #[inline]
            #[must_use]
            pub fn get(self) -> u32 {
                self.0
            }

            /// Parse raw input; empty input is `Ok(None)`
            ///
            /// # Errors
            /// Range violation for anything but an integer in `1..=u32::MAX`
            pub fn parse(raw: &str) -> Validation<Option<Self>> {
                parse_positive(raw, Self::RANGE_MESSAGE).map(|v| v.map(Self))
            }

            /// Convert a stored integer
            #[must_use]
            pub fn from_stored(value: i64) -> Option<Self> {
                u32::try_from(value).ok().and_then(Self::new)
            }
        }

        impl DocKey for $name {
            fn doc_id(&self) -> String {
                self.0.to_string()
            }

            fn to_value(&self) -> FieldValue {
                FieldValue::from(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Id of a person and of its role records
    PersonId,
    "The Person ID must be a positive integer!"
);

entity_id!(
    /// Id of a football club
    ClubId,
    "The Club ID must be a positive integer!"
);

entity_id!(
    /// Id of a football association
    AssoId,
    "The association ID must be a positive integer!"
);

/// National teams are keyed by their gender code
impl DocKey for Gender {
    fn doc_id(&self) -> String {
        self.code().to_string()
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::from(self.code())
    }
}

fn parse_positive(raw: &str, message: &str) -> Validation<Option<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n)
            .map(Some)
            .map_err(|_| ConstraintViolation::range(message)),
        _ => Err(ConstraintViolation::range(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use proptest::prelude::*;

    #[test]
    fn empty_is_absent() {
        assert_eq!(PersonId::parse(""), Ok(None));
        assert_eq!(ClubId::parse("  "), Ok(None));
    }

    #[test]
    fn rejects_non_integers_and_zero() {
        for raw in ["abc", "1.5", "0", "-3", "4294967296"] {
            let err = AssoId::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ViolationKind::Range, "{raw}");
            assert_eq!(err.message(), AssoId::RANGE_MESSAGE);
        }
    }

    #[test]
    fn doc_ids() {
        assert_eq!(ClubId::parse(" 7 ").unwrap().unwrap().doc_id(), "7");
        assert_eq!(Gender::Female.doc_id(), "2");
        assert_eq!(PersonId::new(0), None);
        assert_eq!(PersonId::from_stored(-1), None);
    }

    proptest! {
        #[test]
        fn sign_decides_validity(k in 1u32..=u32::MAX) {
            let positive = PersonId::parse(&k.to_string());
            let negative = PersonId::parse(&format!("-{k}"));
            prop_assert_eq!(positive, Ok(PersonId::new(k)));
            prop_assert_eq!(negative.unwrap_err().kind(), ViolationKind::Range);
        }
    }
}
