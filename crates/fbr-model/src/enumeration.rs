//! Closed enumerations with integer codes
//!
//! An [`Enumeration`] maps the codes `1..=MAX` to names and display labels.
//! [`Gender`] and [`PersonType`] are the typed views the entities use.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered set of named values coded `1..=max()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    names: Vec<String>,
    labels: Vec<String>,
}

impl Enumeration {
    /// Build from ordered labels; names are the upper-cased labels
    #[must_use]
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            names: labels
                .iter()
                .map(|l| l.as_ref().to_uppercase().replace(' ', "_"))
                .collect(),
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
        }
    }

    /// Build from ordered `(name, label)` pairs
    #[must_use]
    pub fn from_map<S: AsRef<str>>(pairs: &[(S, S)]) -> Self {
        Self {
            names: pairs.iter().map(|(n, _)| n.as_ref().to_string()).collect(),
            labels: pairs.iter().map(|(_, l)| l.as_ref().to_string()).collect(),
        }
    }

    /// Largest valid code
    #[inline]
    #[must_use]
    pub fn max(&self) -> u32 {
        u32::try_from(self.labels.len()).unwrap_or(u32::MAX)
    }

    /// Whether `code` names a value
    #[inline]
    #[must_use]
    pub fn contains(&self, code: i64) -> bool {
        code >= 1 && code <= i64::from(self.max())
    }

    /// Label for a code
    #[must_use]
    pub fn label(&self, code: i64) -> Option<&str> {
        let idx = usize::try_from(code.checked_sub(1)?).ok()?;
        self.labels.get(idx).map(String::as_str)
    }

    /// Code for a name
    #[must_use]
    pub fn code(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|idx| u32::try_from(idx + 1).ok())
    }

    /// `(code, label)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| u32::try_from(i + 1).ok().map(|c| (c, l.as_str())))
    }
}

static GENDER_EL: Lazy<Enumeration> =
    Lazy::new(|| Enumeration::from_map(&[("M", "Male"), ("F", "Female")]));

static PERSON_TYPE_EL: Lazy<Enumeration> =
    Lazy::new(|| Enumeration::from_labels(&["Member", "Player", "Coach", "President"]));

/// Typed view over an [`Enumeration`]
pub trait EnumCode: Sized + Copy {
    /// Backing enumeration
    fn enumeration() -> &'static Enumeration;

    /// Value for a code
    fn from_code(code: i64) -> Option<Self>;

    /// Integer code
    fn code(self) -> u32;

    /// Display label
    fn label(self) -> &'static str {
        Self::enumeration()
            .label(i64::from(self.code()))
            .unwrap_or_default()
    }
}

/// Gender of a person, club or national team
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Code 1
    Male,
    /// Code 2
    Female,
}

impl EnumCode for Gender {
    fn enumeration() -> &'static Enumeration {
        &GENDER_EL
    }

    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
        }
    }
}

/// Role a person may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonType {
    /// Club or association member
    Member,
    /// Club player
    Player,
    /// Club coach
    Coach,
    /// Association president
    President,
}

impl EnumCode for PersonType {
    fn enumeration() -> &'static Enumeration {
        &PERSON_TYPE_EL
    }

    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Member),
            2 => Some(Self::Player),
            3 => Some(Self::Coach),
            4 => Some(Self::President),
            _ => None,
        }
    }

    fn code(self) -> u32 {
        match self {
            Self::Member => 1,
            Self::Player => 2,
            Self::Coach => 3,
            Self::President => 4,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_enumeration() {
        let el = Enumeration::from_labels(&["Member", "Player", "Coach", "President"]);
        assert_eq!(el.max(), 4);
        assert_eq!(el.code("COACH"), Some(3));
        assert_eq!(el.label(4), Some("President"));
        assert_eq!(el.label(0), None);
        assert_eq!(el.label(5), None);
        assert!(el.contains(1));
        assert!(!el.contains(-1));
    }

    #[test]
    fn map_enumeration() {
        let el = Enumeration::from_map(&[("M", "Male"), ("F", "Female")]);
        assert_eq!(el.max(), 2);
        assert_eq!(el.code("F"), Some(2));
        assert_eq!(el.iter().collect::<Vec<_>>(), vec![(1, "Male"), (2, "Female")]);
    }

    #[test]
    fn typed_views_agree_with_enumerations() {
        for (code, label) in Gender::enumeration().iter() {
            let g = Gender::from_code(i64::from(code)).unwrap();
            assert_eq!(g.code(), code);
            assert_eq!(g.label(), label);
        }
        for (code, label) in PersonType::enumeration().iter() {
            let t = PersonType::from_code(i64::from(code)).unwrap();
            assert_eq!(t.to_string(), label);
        }
        assert_eq!(PersonType::from_code(5), None);
    }
}
