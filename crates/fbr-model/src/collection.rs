//! Store collections and their key vocabulary

use crate::enumeration::{EnumCode, Gender};
use crate::ids::{AssoId, ClubId, DocKey, PersonId};
use crate::violation::{ConstraintViolation, Validation};
use std::fmt;

/// Collections holding football records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    /// Base person records
    Persons,
    /// Member role records
    Members,
    /// Player role records
    Players,
    /// Coach role records
    Coaches,
    /// President role records
    Presidents,
    /// Football clubs
    Clubs,
    /// Football associations
    Associations,
    /// National teams keyed by gender
    NationalTeams,
}

impl Collection {
    /// Every collection
    pub const ALL: [Collection; 8] = [
        Collection::Persons,
        Collection::Members,
        Collection::Players,
        Collection::Coaches,
        Collection::Presidents,
        Collection::Clubs,
        Collection::Associations,
        Collection::NationalTeams,
    ];

    /// Store collection name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Persons => "persons",
            Self::Members => "members",
            Self::Players => "players",
            Self::Coaches => "coaches",
            Self::Presidents => "presidents",
            Self::Clubs => "clubs",
            Self::Associations => "associations",
            Self::NationalTeams => "nationalTeams",
        }
    }

    /// What one record is called in messages
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Persons => "person",
            Self::Members => "member",
            Self::Players => "player",
            Self::Coaches => "coach",
            Self::Presidents => "president",
            Self::Clubs => "football club",
            Self::Associations => "football association",
            Self::NationalTeams => "national team",
        }
    }

    /// Document field holding the key
    #[must_use]
    pub fn key_field(self) -> &'static str {
        match self {
            Self::Clubs => "clubId",
            Self::Associations => "assoId",
            Self::NationalTeams => "gender",
            _ => "personId",
        }
    }

    fn key_label(self) -> &'static str {
        match self {
            Self::Clubs => "Club ID",
            Self::Associations => "Association ID",
            Self::NationalTeams => "gender",
            _ => "Person ID",
        }
    }

    /// Parse a raw key into a document id; empty input is `Ok(None)`
    ///
    /// # Errors
    /// Range violation when the key is malformed
    pub fn parse_key(self, raw: &str) -> Validation<Option<String>> {
        match self {
            Self::Clubs => Ok(ClubId::parse(raw)?.map(|id| id.doc_id())),
            Self::Associations => Ok(AssoId::parse(raw)?.map(|id| id.doc_id())),
            Self::NationalTeams => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                raw.parse::<i64>()
                    .ok()
                    .and_then(Gender::from_code)
                    .map(|g| Some(g.doc_id()))
                    .ok_or_else(|| {
                        ConstraintViolation::range(format!("Invalid value for gender: {raw}"))
                    })
            }
            _ => Ok(PersonId::parse(raw)?.map(|id| id.doc_id())),
        }
    }

    /// Violation for an absent key
    #[must_use]
    pub fn missing_key(self) -> ConstraintViolation {
        ConstraintViolation::mandatory(format!(
            "A value for the {} must be provided!",
            self.key_label()
        ))
    }

    /// Require a parsed key to be present
    ///
    /// # Errors
    /// The parse violation, or [`Self::missing_key`] when absent
    pub fn require_key<K>(self, parsed: Validation<Option<K>>) -> Validation<K> {
        parsed?.ok_or_else(|| self.missing_key())
    }

    /// Violation for a key already in use
    #[must_use]
    pub fn duplicate_key(self) -> ConstraintViolation {
        ConstraintViolation::uniqueness(format!(
            "There is already a {} record with this {}!",
            self.noun(),
            self.key_label()
        ))
    }

    /// Violation for a reference to a missing record
    #[must_use]
    pub fn dangling_reference(self, doc_id: &str) -> ConstraintViolation {
        ConstraintViolation::referential_integrity(format!(
            "There is no {} record with this {} ({doc_id})!",
            self.noun(),
            self.key_label()
        ))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;

    #[test]
    fn names_are_distinct() {
        let mut names: Vec<_> = Collection::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }

    #[test]
    fn keys_parse_per_collection() {
        assert_eq!(Collection::Clubs.parse_key("7"), Ok(Some("7".to_string())));
        assert_eq!(Collection::NationalTeams.parse_key("2"), Ok(Some("2".to_string())));
        assert_eq!(
            Collection::NationalTeams.parse_key("3").unwrap_err().kind(),
            ViolationKind::Range
        );
        assert_eq!(Collection::Players.parse_key(""), Ok(None));
    }

    #[test]
    fn messages() {
        assert_eq!(
            Collection::Associations.duplicate_key().message(),
            "There is already a football association record with this Association ID!"
        );
        assert_eq!(
            Collection::Clubs.dangling_reference("7").message(),
            "There is no football club record with this Club ID (7)!"
        );
        assert_eq!(
            Collection::Persons.missing_key().kind(),
            ViolationKind::MandatoryValue
        );
    }
}
