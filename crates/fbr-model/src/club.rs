//! Football club record

use crate::check::{check_gender, check_name, require};
use crate::collection::Collection;
use crate::enumeration::{EnumCode, Gender};
use crate::ids::{AssoId, ClubId};
use crate::record::{Changes, ConversionError, DocReader, Record, Reference, Updatable};
use crate::violation::{Validation, ViolationReport};
use fbr_store::Document;
use serde::{Deserialize, Serialize};

/// Raw club input, used for both add and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClubSlots {
    /// Club id
    pub club_id: String,
    /// Name
    pub name: String,
    /// Gender code
    pub gender: String,
    /// Association id
    #[serde(rename = "association_id")]
    pub association: String,
}

/// A football club belonging to an association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootballClub {
    club_id: ClubId,
    name: String,
    gender: Gender,
    association: Option<AssoId>,
}

fn association_ref(raw: &str) -> Validation<AssoId> {
    require(
        AssoId::parse(raw)?,
        "A value for the association must be provided!",
    )
}

impl FootballClub {
    /// Id
    #[must_use]
    pub fn club_id(&self) -> ClubId {
        self.club_id
    }

    /// Name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gender of the club's teams
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Owning association; `None` only after it was deleted
    #[must_use]
    pub fn association(&self) -> Option<AssoId> {
        self.association
    }

    /// Raw form of this record
    #[must_use]
    pub fn to_slots(&self) -> ClubSlots {
        ClubSlots {
            club_id: self.club_id.to_string(),
            name: self.name.clone(),
            gender: self.gender.code().to_string(),
            association: self.association.map(|a| a.to_string()).unwrap_or_default(),
        }
    }
}

impl Record for FootballClub {
    type Key = ClubId;
    type Slots = ClubSlots;
    const COLLECTION: Collection = Collection::Clubs;

    fn from_slots(slots: &ClubSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let club_id = report.check(
            "clubId",
            Collection::Clubs.require_key(ClubId::parse(&slots.club_id)),
        );
        let name = report.check("name", check_name(&slots.name));
        let gender = report.check("gender", check_gender(&slots.gender));
        let association = report.check("association", association_ref(&slots.association));

        match (club_id, name, gender, association) {
            (Some(club_id), Some(name), Some(gender), Some(association)) => Ok(Self {
                club_id,
                name,
                gender,
                association: Some(association),
            }),
            _ => Err(report),
        }
    }

    fn key(&self) -> ClubId {
        self.club_id
    }

    fn references(&self) -> Vec<Reference> {
        Reference::to_all("association", Collection::Associations, &self.association)
    }

    fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .with("clubId", self.club_id.get())
            .with("name", self.name.as_str())
            .with("gender", self.gender.code());
        if let Some(association) = self.association {
            doc.insert("association_id", association.get());
        }
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::Clubs);
        Ok(Self {
            club_id: r.key("clubId", ClubId::from_stored)?,
            name: r.string("name")?,
            gender: r.code("gender")?,
            association: r.opt_key("association_id", AssoId::from_stored)?,
        })
    }
}

impl Updatable for FootballClub {
    type Update = ClubSlots;

    fn update_key(update: &ClubSlots) -> Result<ClubId, ViolationReport> {
        Collection::Clubs
            .require_key(ClubId::parse(&update.club_id))
            .map_err(|v| ViolationReport::single("clubId", v))
    }

    fn changes(&self, update: &ClubSlots) -> Result<Changes<Self>, ViolationReport> {
        let mut report = ViolationReport::new();
        let mut changes = Changes::new(self.clone());

        if let Some(name) = report.check("name", check_name(&update.name)) {
            if name != self.name {
                changes.set("name", name.as_str());
                changes.record.name = name;
            }
        }
        if let Some(gender) = report.check("gender", check_gender(&update.gender)) {
            if gender != self.gender {
                changes.set("gender", gender.code());
                changes.record.gender = gender;
            }
        }
        if let Some(association) = report.check("association", association_ref(&update.association))
        {
            if Some(association) != self.association {
                changes.references.push(Reference::to(
                    "association",
                    Collection::Associations,
                    &association,
                ));
                changes.set("association_id", association.get());
                changes.record.association = Some(association);
            }
        }

        report.into_result(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use fbr_store::FieldValue;
    use pretty_assertions::assert_eq;

    fn slots() -> ClubSlots {
        ClubSlots {
            club_id: "1".into(),
            name: "FC Bayern München".into(),
            gender: "1".into(),
            association: "3".into(),
        }
    }

    #[test]
    fn round_trip() {
        let club = FootballClub::from_slots(&slots()).unwrap();
        assert_eq!(FootballClub::from_document(&club.to_document()).unwrap(), club);
        assert_eq!(club.to_slots(), slots());
    }

    #[test]
    fn association_is_mandatory() {
        let report = FootballClub::from_slots(&ClubSlots {
            association: String::new(),
            ..slots()
        })
        .unwrap_err();
        assert_eq!(
            report.for_field("association").unwrap().kind(),
            ViolationKind::MandatoryValue
        );
    }

    #[test]
    fn back_reference_fields_are_ignored() {
        let doc = FootballClub::from_slots(&slots())
            .unwrap()
            .to_document()
            .with("coach_id", 12i64)
            .with("memberIdRefs", vec![25i64]);
        assert!(FootballClub::from_document(&doc).is_ok());
    }

    #[test]
    fn update_switches_association() {
        let club = FootballClub::from_slots(&slots()).unwrap();
        let changes = club
            .changes(&ClubSlots {
                association: "2".into(),
                ..slots()
            })
            .unwrap();
        assert_eq!(changes.patch.len(), 1);
        assert_eq!(changes.references[0].doc_id, "2");
        assert_eq!(
            changes.record.to_document().get("association_id"),
            Some(&FieldValue::Integer(2))
        );
    }
}
