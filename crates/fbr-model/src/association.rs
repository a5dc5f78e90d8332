//! Football association record
//!
//! Associations form a hierarchy through `supAssociations`. Cycles are not
//! checked.

use crate::check::{apply_delta, check_name, parse_id_set};
use crate::collection::Collection;
use crate::ids::AssoId;
use crate::record::{key_array, Changes, ConversionError, DocReader, Record, Reference, Updatable};
use crate::violation::ViolationReport;
use fbr_store::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw association input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssociationSlots {
    /// Association id
    pub asso_id: String,
    /// Name
    pub name: String,
    /// Parent association ids
    #[serde(rename = "supAssociationIdRefs")]
    pub sup_associations: Vec<String>,
}

/// Association changes; parents as add and remove lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssociationUpdate {
    /// Association id
    pub asso_id: String,
    /// Name
    pub name: String,
    /// Parent ids to add
    #[serde(rename = "supAssociationIdRefsToAdd")]
    pub sup_associations_to_add: Vec<String>,
    /// Parent ids to remove
    #[serde(rename = "supAssociationIdRefsToRemove")]
    pub sup_associations_to_remove: Vec<String>,
}

/// A football association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootballAssociation {
    asso_id: AssoId,
    name: String,
    sup_associations: BTreeSet<AssoId>,
}

impl FootballAssociation {
    /// Id
    #[must_use]
    pub fn asso_id(&self) -> AssoId {
        self.asso_id
    }

    /// Name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent associations
    #[must_use]
    pub fn sup_associations(&self) -> &BTreeSet<AssoId> {
        &self.sup_associations
    }
}

impl Record for FootballAssociation {
    type Key = AssoId;
    type Slots = AssociationSlots;
    const COLLECTION: Collection = Collection::Associations;

    fn from_slots(slots: &AssociationSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let asso_id = report.check(
            "assoId",
            Collection::Associations.require_key(AssoId::parse(&slots.asso_id)),
        );
        let name = report.check("name", check_name(&slots.name));
        let sup_associations = report.check(
            "supAssociations",
            parse_id_set(&slots.sup_associations, AssoId::parse),
        );
        match (asso_id, name, sup_associations) {
            (Some(asso_id), Some(name), Some(sup_associations)) => Ok(Self {
                asso_id,
                name,
                sup_associations,
            }),
            _ => Err(report),
        }
    }

    fn key(&self) -> AssoId {
        self.asso_id
    }

    fn references(&self) -> Vec<Reference> {
        Reference::to_all(
            "supAssociations",
            Collection::Associations,
            &self.sup_associations,
        )
    }

    fn to_document(&self) -> Document {
        Document::new()
            .with("assoId", self.asso_id.get())
            .with("name", self.name.as_str())
            .with("supAssociationIdRefs", key_array(&self.sup_associations))
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::Associations);
        Ok(Self {
            asso_id: r.key("assoId", AssoId::from_stored)?,
            name: r.string("name")?,
            sup_associations: r.key_set("supAssociationIdRefs", AssoId::from_stored)?,
        })
    }
}

impl Updatable for FootballAssociation {
    type Update = AssociationUpdate;

    fn update_key(update: &AssociationUpdate) -> Result<AssoId, ViolationReport> {
        Collection::Associations
            .require_key(AssoId::parse(&update.asso_id))
            .map_err(|v| ViolationReport::single("assoId", v))
    }

    fn changes(&self, update: &AssociationUpdate) -> Result<Changes<Self>, ViolationReport> {
        let mut report = ViolationReport::new();
        let mut changes = Changes::new(self.clone());

        if let Some(name) = report.check("name", check_name(&update.name)) {
            if name != self.name {
                changes.set("name", name.as_str());
                changes.record.name = name;
            }
        }

        let add = report.check(
            "supAssociations",
            parse_id_set(&update.sup_associations_to_add, AssoId::parse),
        );
        let remove = report.check(
            "supAssociations",
            parse_id_set(&update.sup_associations_to_remove, AssoId::parse),
        );
        if let (Some(add), Some(remove)) = (add, remove) {
            let sups = apply_delta(&self.sup_associations, &add, &remove);
            if sups != self.sup_associations {
                changes.references.extend(Reference::to_all(
                    "supAssociations",
                    Collection::Associations,
                    add.difference(&remove),
                ));
                changes.set("supAssociationIdRefs", key_array(&sups));
                changes.record.sup_associations = sups;
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

    fn dfb() -> FootballAssociation {
        FootballAssociation::from_slots(&AssociationSlots {
            asso_id: "3".into(),
            name: "Bayerischer Fußball-Verband".into(),
            sup_associations: vec!["2".into()],
        })
        .unwrap()
    }

    #[test]
    fn round_trip_and_references() {
        let asso = dfb();
        assert_eq!(FootballAssociation::from_document(&asso.to_document()).unwrap(), asso);
        assert_eq!(asso.references().len(), 1);
    }

    #[test]
    fn invalid_parent_is_range_violation() {
        let report = FootballAssociation::from_slots(&AssociationSlots {
            asso_id: "5".into(),
            name: "X".into(),
            sup_associations: vec!["zero".into()],
        })
        .unwrap_err();
        assert_eq!(
            report.for_field("supAssociations").unwrap().kind(),
            ViolationKind::Range
        );
    }

    #[test]
    fn update_with_same_name_and_no_delta_is_empty() {
        let asso = dfb();
        let changes = asso
            .changes(&AssociationUpdate {
                asso_id: "3".into(),
                name: asso.name().to_string(),
                ..AssociationUpdate::default()
            })
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_removes_parent() {
        let changes = dfb()
            .changes(&AssociationUpdate {
                asso_id: "3".into(),
                name: "BFV".into(),
                sup_associations_to_remove: vec!["2".into()],
                ..AssociationUpdate::default()
            })
            .unwrap();
        assert!(changes.record.sup_associations().is_empty());
        assert!(changes.references.is_empty());
        assert_eq!(changes.patch.len(), 2);
    }
}
