//! Role records
//!
//! Each role is stored in its own collection under the person's id and holds
//! only the role's own associations. Agreement with the base person's type set
//! is a convention the registry checks but does not enforce.

use crate::check::{apply_delta, parse_id_set, require};
use crate::collection::Collection;
use crate::ids::{AssoId, ClubId, PersonId};
use crate::record::{key_array, Changes, ConversionError, DocReader, Record, Reference, Updatable};
use crate::violation::{Validation, ViolationReport};
use fbr_store::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn role_key(collection: Collection, raw: &str) -> Result<PersonId, ViolationReport> {
    collection
        .require_key(PersonId::parse(raw))
        .map_err(|v| ViolationReport::single("personId", v))
}

/// Raw member input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSlots {
    /// Person id
    #[serde(rename = "personId")]
    pub person_id: String,
    /// Club ids
    #[serde(rename = "assoClubIdRefs")]
    pub asso_clubs: Vec<String>,
    /// Association ids
    #[serde(rename = "assoAssociationIdRefs")]
    pub asso_associations: Vec<String>,
}

/// Member changes as add and remove lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberUpdate {
    /// Person id
    #[serde(rename = "personId")]
    pub person_id: String,
    /// Club ids to add
    #[serde(rename = "assoClubIdRefsToAdd")]
    pub asso_clubs_to_add: Vec<String>,
    /// Club ids to remove
    #[serde(rename = "assoClubIdRefsToRemove")]
    pub asso_clubs_to_remove: Vec<String>,
    /// Association ids to add
    #[serde(rename = "assoAssociationIdRefsToAdd")]
    pub asso_associations_to_add: Vec<String>,
    /// Association ids to remove
    #[serde(rename = "assoAssociationIdRefsToRemove")]
    pub asso_associations_to_remove: Vec<String>,
}

/// Club and association memberships of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    person_id: PersonId,
    asso_clubs: BTreeSet<ClubId>,
    asso_associations: BTreeSet<AssoId>,
}

impl Member {
    /// Person id
    #[must_use]
    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    /// Clubs
    #[must_use]
    pub fn asso_clubs(&self) -> &BTreeSet<ClubId> {
        &self.asso_clubs
    }

    /// Associations
    #[must_use]
    pub fn asso_associations(&self) -> &BTreeSet<AssoId> {
        &self.asso_associations
    }
}

impl Record for Member {
    type Key = PersonId;
    type Slots = MemberSlots;
    const COLLECTION: Collection = Collection::Members;

    fn from_slots(slots: &MemberSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let person_id = report.check(
            "personId",
            Collection::Members.require_key(PersonId::parse(&slots.person_id)),
        );
        let asso_clubs = report.check("assoClubs", parse_id_set(&slots.asso_clubs, ClubId::parse));
        let asso_associations = report.check(
            "assoAssociations",
            parse_id_set(&slots.asso_associations, AssoId::parse),
        );
        match (person_id, asso_clubs, asso_associations) {
            (Some(person_id), Some(asso_clubs), Some(asso_associations)) => Ok(Self {
                person_id,
                asso_clubs,
                asso_associations,
            }),
            _ => Err(report),
        }
    }

    fn key(&self) -> PersonId {
        self.person_id
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Reference::to_all("assoClubs", Collection::Clubs, &self.asso_clubs);
        refs.extend(Reference::to_all(
            "assoAssociations",
            Collection::Associations,
            &self.asso_associations,
        ));
        refs
    }

    fn to_document(&self) -> Document {
        Document::new()
            .with("personId", self.person_id.get())
            .with("assoClubIdRefs", key_array(&self.asso_clubs))
            .with("assoAssociationIdRefs", key_array(&self.asso_associations))
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::Members);
        Ok(Self {
            person_id: r.key("personId", PersonId::from_stored)?,
            asso_clubs: r.key_set("assoClubIdRefs", ClubId::from_stored)?,
            asso_associations: r.key_set("assoAssociationIdRefs", AssoId::from_stored)?,
        })
    }
}

impl Updatable for Member {
    type Update = MemberUpdate;

    fn update_key(update: &MemberUpdate) -> Result<PersonId, ViolationReport> {
        role_key(Collection::Members, &update.person_id)
    }

    fn changes(&self, update: &MemberUpdate) -> Result<Changes<Self>, ViolationReport> {
        let mut report = ViolationReport::new();
        let mut changes = Changes::new(self.clone());

        let clubs_add = report.check(
            "assoClubs",
            parse_id_set(&update.asso_clubs_to_add, ClubId::parse),
        );
        let clubs_remove = report.check(
            "assoClubs",
            parse_id_set(&update.asso_clubs_to_remove, ClubId::parse),
        );
        if let (Some(add), Some(remove)) = (clubs_add, clubs_remove) {
            let clubs = apply_delta(&self.asso_clubs, &add, &remove);
            if clubs != self.asso_clubs {
                changes.references.extend(Reference::to_all(
                    "assoClubs",
                    Collection::Clubs,
                    add.difference(&remove),
                ));
                changes.set("assoClubIdRefs", key_array(&clubs));
                changes.record.asso_clubs = clubs;
            }
        }

        let assos_add = report.check(
            "assoAssociations",
            parse_id_set(&update.asso_associations_to_add, AssoId::parse),
        );
        let assos_remove = report.check(
            "assoAssociations",
            parse_id_set(&update.asso_associations_to_remove, AssoId::parse),
        );
        if let (Some(add), Some(remove)) = (assos_add, assos_remove) {
            let assos = apply_delta(&self.asso_associations, &add, &remove);
            if assos != self.asso_associations {
                changes.references.extend(Reference::to_all(
                    "assoAssociations",
                    Collection::Associations,
                    add.difference(&remove),
                ));
                changes.set("assoAssociationIdRefs", key_array(&assos));
                changes.record.asso_associations = assos;
            }
        }

        report.into_result(changes)
    }
}

macro_rules! club_role {
    ($(#[$doc:meta])* $name:ident, $slots:ident, $collection:expr) => {
        #[doc = concat!("Raw ", stringify!($name), " input, used for both add and update")]
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $slots {
            /// Person id
            #[serde(rename = "personId")]
            pub person_id: String,
            /// Club id
            #[serde(rename = "assoClub_id")]
            pub asso_club: String,
        }

        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            person_id: PersonId,
            asso_club: Option<ClubId>,
        }

        impl $name {
            /// Person id
            #[must_use]
            pub fn person_id(&self) -> PersonId {
                self.person_id
            }

            /// Club; `None` only after the club was deleted
            #[must_use]
            pub fn asso_club(&self) -> Option<ClubId> {
                self.asso_club
            }
        }

        impl Record for $name {
            type Key = PersonId;
            type Slots = $slots;
            const COLLECTION: Collection = $collection;

            fn from_slots(slots: &$slots) -> Result<Self, ViolationReport> {
                let mut report = ViolationReport::new();
                let person_id = report.check(
                    "personId",
                    $collection.require_key(PersonId::parse(&slots.person_id)),
                );
                let asso_club = report.check("assoClub", club_ref(&slots.asso_club));
                match (person_id, asso_club) {
                    (Some(person_id), Some(club)) => Ok(Self {
                        person_id,
                        asso_club: Some(club),
                    }),
                    _ => Err(report),
                }
            }

            fn key(&self) -> PersonId {
                self.person_id
            }

            fn references(&self) -> Vec<Reference> {
                Reference::to_all("assoClub", Collection::Clubs, &self.asso_club)
            }

            fn to_document(&self) -> Document {
                let mut doc = Document::new().with("personId", self.person_id.get());
                if let Some(club) = self.asso_club {
                    doc.insert("assoClub_id", club.get());
                }
                doc
            }

            fn from_document(doc: &Document) -> Result<Self, ConversionError> {
                let r = DocReader::new(doc, $collection);
                Ok(Self {
                    person_id: r.key("personId", PersonId::from_stored)?,
                    asso_club: r.opt_key("assoClub_id", ClubId::from_stored)?,
                })
            }
        }

        impl Updatable for $name {
            type Update = $slots;

            fn update_key(update: &$slots) -> Result<PersonId, ViolationReport> {
                role_key($collection, &update.person_id)
            }

            fn changes(&self, update: &$slots) -> Result<Changes<Self>, ViolationReport> {
                let club = club_ref(&update.asso_club)
                    .map_err(|v| ViolationReport::single("assoClub", v))?;
                let mut changes = Changes::new(self.clone());
                if Some(club) != self.asso_club {
                    changes
                        .references
                        .push(Reference::to("assoClub", Collection::Clubs, &club));
                    changes.set("assoClub_id", club.get());
                    changes.record.asso_club = Some(club);
                }
                Ok(changes)
            }
        }
    };
}

fn club_ref(raw: &str) -> Validation<ClubId> {
    require(
        ClubId::parse(raw)?,
        "A value for the associated club must be provided!",
    )
}

club_role!(
    /// A person playing for a club
    Player,
    PlayerSlots,
    Collection::Players
);

club_role!(
    /// A person coaching a club
    Coach,
    CoachSlots,
    Collection::Coaches
);

/// Raw president input, used for both add and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresidentSlots {
    /// Person id
    #[serde(rename = "personId")]
    pub person_id: String,
    /// Association id
    #[serde(rename = "assoAssociation_id")]
    pub asso_association: String,
}

/// A person presiding over an association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct President {
    person_id: PersonId,
    asso_association: Option<AssoId>,
}

impl President {
    /// Person id
    #[must_use]
    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    /// Association; `None` only after the association was deleted
    #[must_use]
    pub fn asso_association(&self) -> Option<AssoId> {
        self.asso_association
    }
}

fn association_ref(raw: &str) -> Validation<AssoId> {
    require(
        AssoId::parse(raw)?,
        "A value for the associated association must be provided!",
    )
}

impl Record for President {
    type Key = PersonId;
    type Slots = PresidentSlots;
    const COLLECTION: Collection = Collection::Presidents;

    fn from_slots(slots: &PresidentSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let person_id = report.check(
            "personId",
            Collection::Presidents.require_key(PersonId::parse(&slots.person_id)),
        );
        let association = report.check(
            "assoAssociation",
            association_ref(&slots.asso_association),
        );
        match (person_id, association) {
            (Some(person_id), Some(association)) => Ok(Self {
                person_id,
                asso_association: Some(association),
            }),
            _ => Err(report),
        }
    }

    fn key(&self) -> PersonId {
        self.person_id
    }

    fn references(&self) -> Vec<Reference> {
        Reference::to_all(
            "assoAssociation",
            Collection::Associations,
            &self.asso_association,
        )
    }

    fn to_document(&self) -> Document {
        let mut doc = Document::new().with("personId", self.person_id.get());
        if let Some(association) = self.asso_association {
            doc.insert("assoAssociation_id", association.get());
        }
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::Presidents);
        Ok(Self {
            person_id: r.key("personId", PersonId::from_stored)?,
            asso_association: r.opt_key("assoAssociation_id", AssoId::from_stored)?,
        })
    }
}

impl Updatable for President {
    type Update = PresidentSlots;

    fn update_key(update: &PresidentSlots) -> Result<PersonId, ViolationReport> {
        role_key(Collection::Presidents, &update.person_id)
    }

    fn changes(&self, update: &PresidentSlots) -> Result<Changes<Self>, ViolationReport> {
        let association = association_ref(&update.asso_association)
            .map_err(|v| ViolationReport::single("assoAssociation", v))?;
        let mut changes = Changes::new(self.clone());
        if Some(association) != self.asso_association {
            changes.references.push(Reference::to(
                "assoAssociation",
                Collection::Associations,
                &association,
            ));
            changes.set("assoAssociation_id", association.get());
            changes.record.asso_association = Some(association);
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use fbr_store::FieldValue;
    use pretty_assertions::assert_eq;

    fn member() -> Member {
        Member::from_slots(&MemberSlots {
            person_id: "25".into(),
            asso_clubs: vec!["1".into(), "2".into()],
            asso_associations: vec!["3".into()],
        })
        .unwrap()
    }

    #[test]
    fn member_references_every_set_element() {
        let refs = member().references();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].target, Collection::Clubs);
        assert_eq!(refs[2], Reference {
            field: "assoAssociations",
            target: Collection::Associations,
            doc_id: "3".into(),
        });
    }

    #[test]
    fn member_without_sets_is_valid() {
        let m = Member::from_slots(&MemberSlots {
            person_id: "4".into(),
            ..MemberSlots::default()
        })
        .unwrap();
        assert!(m.references().is_empty());
        assert_eq!(Member::from_document(&m.to_document()).unwrap(), m);
    }

    #[test]
    fn member_delta_update() {
        let m = member();
        let update = MemberUpdate {
            person_id: "25".into(),
            asso_clubs_to_add: vec!["5".into(), "6".into()],
            asso_clubs_to_remove: vec!["1".into(), "6".into()],
            ..MemberUpdate::default()
        };
        let changes = m.changes(&update).unwrap();
        assert_eq!(
            changes.record.asso_clubs().iter().map(|c| c.get()).collect::<Vec<_>>(),
            vec![2, 5]
        );
        assert_eq!(
            changes.references,
            vec![Reference {
                field: "assoClubs",
                target: Collection::Clubs,
                doc_id: "5".into(),
            }]
        );
        assert!(changes.patch.get("assoAssociationIdRefs").is_none());
    }

    #[test]
    fn member_empty_delta_is_noop() {
        let changes = member()
            .changes(&MemberUpdate {
                person_id: "25".into(),
                asso_clubs_to_add: vec!["1".into()],
                ..MemberUpdate::default()
            })
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn player_requires_club() {
        let report = Player::from_slots(&PlayerSlots {
            person_id: "1".into(),
            asso_club: String::new(),
        })
        .unwrap_err();
        assert_eq!(
            report.for_field("assoClub").unwrap().kind(),
            ViolationKind::MandatoryValue
        );
    }

    #[test]
    fn cleared_club_reads_back_as_none() {
        let doc = Document::new().with("personId", 3i64);
        let coach = Coach::from_document(&doc).unwrap();
        assert_eq!(coach.asso_club(), None);
        assert!(coach.references().is_empty());
    }

    #[test]
    fn coach_update_changes_club() {
        let coach = Coach::from_slots(&CoachSlots {
            person_id: "12".into(),
            asso_club: "1".into(),
        })
        .unwrap();
        let same = coach.to_document();
        assert_eq!(same.get("assoClub_id"), Some(&FieldValue::Integer(1)));

        let changes = coach
            .changes(&CoachSlots {
                person_id: "12".into(),
                asso_club: "2".into(),
            })
            .unwrap();
        assert_eq!(changes.record.asso_club(), ClubId::new(2));
        assert_eq!(changes.references.len(), 1);
    }

    #[test]
    fn president_round_trip() {
        let president = President::from_slots(&PresidentSlots {
            person_id: "26".into(),
            asso_association: "1".into(),
        })
        .unwrap();
        assert_eq!(
            President::from_document(&president.to_document()).unwrap(),
            president
        );
        assert!(president
            .changes(&PresidentSlots {
                person_id: "26".into(),
                asso_association: "1".into(),
            })
            .unwrap()
            .is_empty());
    }
}
