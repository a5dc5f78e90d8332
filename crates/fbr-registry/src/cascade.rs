//! Cascade planning for deletes
//!
//! Every field that can hold a reference to a record is listed in
//! [`reverse_refs`]. Deleting a record queries each of those fields, stages a
//! patch per referencing document and stages the delete itself, all in one
//! [`WriteBatch`] that the caller commits once.

use fbr_model::Collection;
use fbr_store::{DocumentStore, FieldValue, Filter, Patch, Query, StoreError, WriteBatch};
use tracing::debug;

/// How a referencing field holds the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefShape {
    /// Single id; the field is deleted
    Scalar,
    /// Id set; the element is removed
    Array,
}

/// A field in `source` documents that references another collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseRef {
    /// Collection holding the reference
    pub source: Collection,
    /// Document field
    pub field: &'static str,
    /// Field shape
    pub shape: RefShape,
}

const fn scalar(source: Collection, field: &'static str) -> ReverseRef {
    ReverseRef {
        source,
        field,
        shape: RefShape::Scalar,
    }
}

const fn array(source: Collection, field: &'static str) -> ReverseRef {
    ReverseRef {
        source,
        field,
        shape: RefShape::Array,
    }
}

const ASSOCIATION_REFS: &[ReverseRef] = &[
    array(Collection::Members, "assoAssociationIdRefs"),
    scalar(Collection::Presidents, "assoAssociation_id"),
    scalar(Collection::Clubs, "association_id"),
    array(Collection::Associations, "supAssociationIdRefs"),
];

const CLUB_REFS: &[ReverseRef] = &[
    array(Collection::Members, "assoClubIdRefs"),
    scalar(Collection::Players, "assoClub_id"),
    scalar(Collection::Coaches, "assoClub_id"),
];

const COACH_REFS: &[ReverseRef] = &[
    scalar(Collection::Clubs, "coach_id"),
    scalar(Collection::NationalTeams, "coach_id"),
];

const PLAYER_REFS: &[ReverseRef] = &[
    scalar(Collection::Clubs, "player_id"),
    array(Collection::NationalTeams, "playerIdRefs"),
];

const MEMBER_REFS: &[ReverseRef] = &[
    array(Collection::Clubs, "memberIdRefs"),
    array(Collection::Associations, "memberIdRefs"),
];

const PRESIDENT_REFS: &[ReverseRef] = &[scalar(Collection::Associations, "president_id")];

/// Fields referencing records of `target`
#[must_use]
pub fn reverse_refs(target: Collection) -> &'static [ReverseRef] {
    match target {
        Collection::Associations => ASSOCIATION_REFS,
        Collection::Clubs => CLUB_REFS,
        Collection::Coaches => COACH_REFS,
        Collection::Players => PLAYER_REFS,
        Collection::Members => MEMBER_REFS,
        Collection::Presidents => PRESIDENT_REFS,
        Collection::Persons | Collection::NationalTeams => &[],
    }
}

/// Staged cascade for one delete
#[derive(Debug)]
pub struct CascadePlan {
    batch: WriteBatch,
    patched: Vec<(Collection, String)>,
}

impl CascadePlan {
    /// Documents whose references will be removed
    #[must_use]
    pub fn patched(&self) -> &[(Collection, String)] {
        &self.patched
    }

    /// Batch to commit
    #[must_use]
    pub fn into_batch(self) -> WriteBatch {
        self.batch
    }
}

/// Stage reference cleanup and the delete of `target/doc_id`
///
/// # Errors
/// Store failure while querying referencing documents
pub async fn plan(
    store: &dyn DocumentStore,
    target: Collection,
    doc_id: &str,
    key: FieldValue,
) -> Result<CascadePlan, StoreError> {
    let mut batch = store.batch();
    let mut patched = Vec::new();

    for rref in reverse_refs(target) {
        let filter = match rref.shape {
            RefShape::Scalar => Filter::equals(rref.field, key.clone()),
            RefShape::Array => Filter::array_contains(rref.field, key.clone()),
        };
        let hits = store
            .query(&Query::collection(rref.source.name()).filter(filter))
            .await?;
        for (id, _) in hits {
            if rref.source == target && id == doc_id {
                continue;
            }
            let patch = match rref.shape {
                RefShape::Scalar => Patch::new().delete_field(rref.field),
                RefShape::Array => Patch::new().array_remove(rref.field, key.clone()),
            };
            debug!(
                collection = %rref.source,
                id = %id,
                field = rref.field,
                "staging reference cleanup"
            );
            batch.update(rref.source.name(), id.clone(), patch);
            patched.push((rref.source, id));
        }
    }
    batch.delete(target.name(), doc_id);

    Ok(CascadePlan { batch, patched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbr_store::{BatchOp, Document, MemoryStore};

    #[test]
    fn unreferenced_collections_have_no_reverse_refs() {
        assert!(reverse_refs(Collection::Persons).is_empty());
        assert!(reverse_refs(Collection::NationalTeams).is_empty());
        assert_eq!(reverse_refs(Collection::Clubs).len(), 3);
    }

    #[test]
    fn every_reverse_ref_source_is_distinct_per_target() {
        for target in Collection::ALL {
            let refs = reverse_refs(target);
            for (i, a) in refs.iter().enumerate() {
                for b in &refs[i + 1..] {
                    assert!(a.source != b.source || a.field != b.field);
                }
            }
        }
    }

    #[tokio::test]
    async fn stages_patches_before_delete() {
        let store = MemoryStore::new();
        store
            .set("players", "3", Document::new().with("assoClub_id", 1i64))
            .await
            .unwrap();
        store
            .set("members", "25", Document::new().with("assoClubIdRefs", vec![1i64, 2]))
            .await
            .unwrap();
        store
            .set("players", "4", Document::new().with("assoClub_id", 2i64))
            .await
            .unwrap();

        let plan = plan(&store, Collection::Clubs, "1", FieldValue::Integer(1))
            .await
            .unwrap();
        assert_eq!(plan.patched().len(), 2);

        let ops = plan.into_batch().into_ops();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops.last(), Some(BatchOp::Delete { .. })));
    }

    #[tokio::test]
    async fn self_reference_is_not_patched() {
        let store = MemoryStore::new();
        store
            .set(
                "associations",
                "2",
                Document::new().with("supAssociationIdRefs", vec![2i64]),
            )
            .await
            .unwrap();
        let plan = plan(&store, Collection::Associations, "2", FieldValue::Integer(2))
            .await
            .unwrap();
        assert!(plan.patched().is_empty());
    }
}
