//! Synchronous per-field checks
//!
//! Pure functions over raw form input. Checks that need the store live in the
//! registry crate.

use crate::enumeration::{EnumCode, Gender, PersonType};
use crate::violation::{ConstraintViolation, Validation};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Earliest accepted date of birth
pub const BIRTH_DATE_MIN: NaiveDate = match NaiveDate::from_ymd_opt(1890, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Name: present and not blank
///
/// # Errors
/// Mandatory when empty, range when only whitespace
pub fn check_name(raw: &str) -> Validation<String> {
    if raw.is_empty() {
        Err(ConstraintViolation::mandatory("A name must be provided!"))
    } else if raw.trim().is_empty() {
        Err(ConstraintViolation::range("The name must be a non-empty string!"))
    } else {
        Ok(raw.trim().to_string())
    }
}

/// Date of birth as ISO `YYYY-MM-DD`, not before [`BIRTH_DATE_MIN`]
///
/// # Errors
/// Mandatory when empty, interval when unparseable or too early
pub fn check_date_of_birth(raw: &str) -> Validation<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConstraintViolation::mandatory(
            "A value for the date of birth must be provided!",
        ));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if date >= BIRTH_DATE_MIN => Ok(date),
        _ => Err(ConstraintViolation::interval(format!(
            "The value of date of birth must be greater than or equal to {BIRTH_DATE_MIN}!"
        ))),
    }
}

/// Integer code of an enumeration value
///
/// # Errors
/// Mandatory when empty, range when not an integer in `1..=MAX`
pub fn check_enum_code<E: EnumCode>(raw: &str, what: &str) -> Validation<E> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConstraintViolation::mandatory(format!(
            "A value for the {what} must be provided!"
        )));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(E::from_code)
        .ok_or_else(|| ConstraintViolation::range(format!("Invalid value for {what}: {raw}")))
}

/// Gender code
///
/// # Errors
/// See [`check_enum_code`]
pub fn check_gender(raw: &str) -> Validation<Gender> {
    check_enum_code(raw, "gender")
}

/// Non-empty set of person-type codes
///
/// # Errors
/// Mandatory when empty, range on the first invalid code
pub fn check_types<S: AsRef<str>>(raw: &[S]) -> Validation<BTreeSet<PersonType>> {
    if raw.is_empty() {
        return Err(ConstraintViolation::mandatory("Type must be provided!"));
    }
    raw.iter()
        .map(|code| {
            let code = code.as_ref().trim();
            code.parse::<i64>()
                .ok()
                .and_then(PersonType::from_code)
                .ok_or_else(|| {
                    ConstraintViolation::range(format!("Invalid value for type: {code}"))
                })
        })
        .collect()
}

/// Turn an absent value into a mandatory violation
///
/// # Errors
/// Mandatory when `value` is `None`
pub fn require<T>(value: Option<T>, message: &str) -> Validation<T> {
    value.ok_or_else(|| ConstraintViolation::mandatory(message))
}

/// Parse every entry of an id list, skipping empty entries
///
/// # Errors
/// The first range violation
pub fn parse_id_set<K: Ord, S: AsRef<str>>(
    raw: &[S],
    parse: impl Fn(&str) -> Validation<Option<K>>,
) -> Validation<BTreeSet<K>> {
    let mut ids = BTreeSet::new();
    for entry in raw {
        if let Some(id) = parse(entry.as_ref())? {
            ids.insert(id);
        }
    }
    Ok(ids)
}

/// `(current ∪ to_add) \ to_remove`
#[must_use]
pub fn apply_delta<K: Ord + Copy>(
    current: &BTreeSet<K>,
    to_add: &BTreeSet<K>,
    to_remove: &BTreeSet<K>,
) -> BTreeSet<K> {
    current
        .union(to_add)
        .filter(|id| !to_remove.contains(id))
        .copied()
        .collect()
}
