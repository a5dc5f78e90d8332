//! Base person record

use crate::check::{check_date_of_birth, check_gender, check_name, check_types};
use crate::collection::Collection;
use crate::enumeration::{EnumCode, Gender, PersonType};
use crate::ids::PersonId;
use crate::record::{date_to_timestamp, Changes, ConversionError, DocReader, Record, Updatable};
use crate::violation::{Validation, ViolationReport};
use chrono::NaiveDate;
use fbr_store::{Document, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw person input, as submitted by a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonSlots {
    /// Person id
    pub person_id: String,
    /// Full name
    pub name: String,
    /// ISO date
    pub date_of_birth: String,
    /// Gender code
    pub gender: String,
    /// Person-type codes
    #[serde(rename = "type")]
    pub types: Vec<String>,
}

/// A person, independent of the roles it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    person_id: PersonId,
    name: String,
    date_of_birth: NaiveDate,
    gender: Gender,
    types: BTreeSet<PersonType>,
}

impl Person {
    /// Id
    #[must_use]
    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    /// Name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date of birth
    #[must_use]
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Gender
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Roles
    #[must_use]
    pub fn types(&self) -> &BTreeSet<PersonType> {
        &self.types
    }

    /// Whether the person holds `role`
    #[must_use]
    pub fn has_role(&self, role: PersonType) -> bool {
        self.types.contains(&role)
    }

    /// Replace the name
    ///
    /// # Errors
    /// The name check fails; the record is left unchanged
    pub fn set_name(&mut self, raw: &str) -> Validation {
        self.name = check_name(raw)?;
        Ok(())
    }

    /// Replace the date of birth
    ///
    /// # Errors
    /// The date check fails; the record is left unchanged
    pub fn set_date_of_birth(&mut self, raw: &str) -> Validation {
        self.date_of_birth = check_date_of_birth(raw)?;
        Ok(())
    }

    /// Replace the gender
    ///
    /// # Errors
    /// The gender check fails; the record is left unchanged
    pub fn set_gender(&mut self, raw: &str) -> Validation {
        self.gender = check_gender(raw)?;
        Ok(())
    }

    /// Replace the roles
    ///
    /// # Errors
    /// The type check fails; the record is left unchanged
    pub fn set_types<S: AsRef<str>>(&mut self, raw: &[S]) -> Validation {
        self.types = check_types(raw)?;
        Ok(())
    }

    /// Raw form of this record
    #[must_use]
    pub fn to_slots(&self) -> PersonSlots {
        PersonSlots {
            person_id: self.person_id.to_string(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.to_string(),
            gender: self.gender.code().to_string(),
            types: self.types.iter().map(|t| t.code().to_string()).collect(),
        }
    }

    fn types_value(types: &BTreeSet<PersonType>) -> FieldValue {
        FieldValue::Array(types.iter().map(|t| FieldValue::from(t.code())).collect())
    }
}

impl Record for Person {
    type Key = PersonId;
    type Slots = PersonSlots;
    const COLLECTION: Collection = Collection::Persons;

    fn from_slots(slots: &PersonSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let person_id = report.check(
            "personId",
            Collection::Persons.require_key(PersonId::parse(&slots.person_id)),
        );
        let name = report.check("name", check_name(&slots.name));
        let date_of_birth = report.check("dateOfBirth", check_date_of_birth(&slots.date_of_birth));
        let gender = report.check("gender", check_gender(&slots.gender));
        let types = report.check("type", check_types(&slots.types));

        match (person_id, name, date_of_birth, gender, types) {
            (Some(person_id), Some(name), Some(date_of_birth), Some(gender), Some(types)) => {
                Ok(Self {
                    person_id,
                    name,
                    date_of_birth,
                    gender,
                    types,
                })
            }
            _ => Err(report),
        }
    }

    fn key(&self) -> PersonId {
        self.person_id
    }

    fn to_document(&self) -> Document {
        Document::new()
            .with("personId", self.person_id.get())
            .with("name", self.name.as_str())
            .with("dateOfBirth", date_to_timestamp(self.date_of_birth))
            .with("gender", self.gender.code())
            .with("type", Self::types_value(&self.types))
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::Persons);
        let types = r
            .integers("type")?
            .into_iter()
            .map(|code| PersonType::from_code(code).ok_or_else(|| r.invalid("type", code)))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if types.is_empty() {
            return Err(r.invalid("type", "[]"));
        }
        Ok(Self {
            person_id: r.key("personId", PersonId::from_stored)?,
            name: r.string("name")?,
            date_of_birth: r.date("dateOfBirth")?,
            gender: r.code("gender")?,
            types,
        })
    }
}

impl Updatable for Person {
    type Update = PersonSlots;

    fn update_key(update: &PersonSlots) -> Result<PersonId, ViolationReport> {
        Collection::Persons
            .require_key(PersonId::parse(&update.person_id))
            .map_err(|v| ViolationReport::single("personId", v))
    }

    fn changes(&self, update: &PersonSlots) -> Result<Changes<Self>, ViolationReport> {
        let mut report = ViolationReport::new();
        let mut changes = Changes::new(self.clone());

        if let Some(name) = report.check("name", check_name(&update.name)) {
            if name != self.name {
                changes.set("name", name.as_str());
                changes.record.name = name;
            }
        }
        if let Some(dob) = report.check("dateOfBirth", check_date_of_birth(&update.date_of_birth)) {
            if dob != self.date_of_birth {
                changes.set("dateOfBirth", date_to_timestamp(dob));
                changes.record.date_of_birth = dob;
            }
        }
        if let Some(gender) = report.check("gender", check_gender(&update.gender)) {
            if gender != self.gender {
                changes.set("gender", gender.code());
                changes.record.gender = gender;
            }
        }
        if let Some(types) = report.check("type", check_types(&update.types)) {
            if types != self.types {
                changes.set("type", Self::types_value(&types));
                changes.record.types = types;
            }
        }

        report.into_result(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use pretty_assertions::assert_eq;

    fn slots() -> PersonSlots {
        PersonSlots {
            person_id: "12".into(),
            name: "Joachim Löw".into(),
            date_of_birth: "1960-02-03".into(),
            gender: "1".into(),
            types: vec!["3".into()],
        }
    }

    #[test]
    fn builds_from_valid_slots() {
        let person = Person::from_slots(&slots()).unwrap();
        assert_eq!(person.person_id().get(), 12);
        assert!(person.has_role(PersonType::Coach));
        assert!(!person.has_role(PersonType::Player));
        assert_eq!(person.to_slots(), slots());
    }

    #[test]
    fn reports_every_invalid_field() {
        let bad = PersonSlots {
            person_id: "-1".into(),
            name: String::new(),
            date_of_birth: "1850-01-01".into(),
            gender: "7".into(),
            types: vec![],
        };
        let report = Person::from_slots(&bad).unwrap_err();
        assert_eq!(report.len(), 5);
        assert_eq!(report.for_field("personId").unwrap().kind(), ViolationKind::Range);
        assert_eq!(report.for_field("name").unwrap().kind(), ViolationKind::MandatoryValue);
        assert_eq!(report.for_field("dateOfBirth").unwrap().kind(), ViolationKind::Interval);
        assert_eq!(report.for_field("gender").unwrap().kind(), ViolationKind::Range);
        assert_eq!(report.for_field("type").unwrap().kind(), ViolationKind::MandatoryValue);
    }

    #[test]
    fn missing_id_is_mandatory() {
        let report = Person::from_slots(&PersonSlots {
            person_id: String::new(),
            ..slots()
        })
        .unwrap_err();
        assert_eq!(report.for_field("personId").unwrap().kind(), ViolationKind::MandatoryValue);
    }

    #[test]
    fn document_round_trip() {
        let person = Person::from_slots(&slots()).unwrap();
        let doc = person.to_document();
        assert_eq!(doc.get("type"), Some(&FieldValue::Array(vec![FieldValue::Integer(3)])));
        assert_eq!(Person::from_document(&doc).unwrap(), person);
    }

    #[test]
    fn setters_reject_without_mutating() {
        let mut person = Person::from_slots(&slots()).unwrap();
        assert!(person.set_name("  ").is_err());
        assert_eq!(person.name(), "Joachim Löw");
        person.set_date_of_birth("1961-02-03").unwrap();
        assert_eq!(person.date_of_birth().to_string(), "1961-02-03");
        assert!(person.set_types(&["9"]).is_err());
        assert!(person.has_role(PersonType::Coach));
    }

    #[test]
    fn identical_update_is_empty() {
        let person = Person::from_slots(&slots()).unwrap();
        let changes = person.changes(&person.to_slots()).unwrap();
        assert!(changes.is_empty());
        assert_eq!(changes.record, person);
    }

    #[test]
    fn update_patches_changed_fields_only() {
        let person = Person::from_slots(&slots()).unwrap();
        let update = PersonSlots {
            name: "Jogi Löw".into(),
            types: vec!["3".into(), "1".into()],
            ..slots()
        };
        let changes = person.changes(&update).unwrap();
        let mut fields: Vec<_> = changes.patch.field_names().collect();
        fields.sort_unstable();
        assert_eq!(fields, vec!["name", "type"]);
        assert!(changes.record.has_role(PersonType::Member));
    }

    #[test]
    fn update_reports_all_violations() {
        let person = Person::from_slots(&slots()).unwrap();
        let update = PersonSlots {
            name: " ".into(),
            gender: String::new(),
            ..slots()
        };
        let report = person.changes(&update).unwrap_err();
        assert_eq!(report.len(), 2);
    }
}
