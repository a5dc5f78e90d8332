//! Merge patches and atomic write batches

use crate::value::{Document, FieldValue};
use std::collections::BTreeMap;

/// Change applied to a single field by an update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    /// Overwrite the field
    Set(FieldValue),
    /// Remove the field (no-op when absent)
    Delete,
    /// Append each value not already present in the array field
    ArrayUnion(Vec<FieldValue>),
    /// Remove every occurrence of each value from the array field
    ArrayRemove(Vec<FieldValue>),
}

impl FieldPatch {
    fn apply(&self, field: &str, doc: &mut Document) {
        match self {
            Self::Set(value) => {
                doc.insert(field, value.clone());
            }
            Self::Delete => {
                doc.remove(field);
            }
            Self::ArrayUnion(values) => {
                let mut items = doc
                    .get(field)
                    .and_then(FieldValue::as_array)
                    .map(<[FieldValue]>::to_vec)
                    .unwrap_or_default();
                for value in values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                doc.insert(field, FieldValue::Array(items));
            }
            Self::ArrayRemove(values) => {
                if let Some(FieldValue::Array(items)) = doc.get_mut(field) {
                    items.retain(|item| !values.contains(item));
                }
            }
        }
    }
}

/// Merge patch for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: BTreeMap<String, FieldPatch>,
}

impl Patch {
    /// Create empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a field
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), FieldPatch::Set(value.into()));
        self
    }

    /// Remove a field
    #[must_use]
    pub fn delete_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldPatch::Delete);
        self
    }

    /// Remove a value from an array field
    #[must_use]
    pub fn array_remove(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .insert(field.into(), FieldPatch::ArrayRemove(vec![value.into()]));
        self
    }

    /// Add a value to an array field unless already present
    #[must_use]
    pub fn array_union(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .insert(field.into(), FieldPatch::ArrayUnion(vec![value.into()]));
        self
    }

    /// Stage an arbitrary field change
    pub fn push(&mut self, field: impl Into<String>, change: FieldPatch) {
        self.fields.insert(field.into(), change);
    }

    /// Whether nothing is staged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of staged fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Staged field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Staged change for a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldPatch> {
        self.fields.get(field)
    }

    /// Apply with merge semantics
    pub fn apply_to(&self, doc: &mut Document) {
        for (field, change) in &self.fields {
            change.apply(field, doc);
        }
    }
}

/// One staged batch operation
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Create or overwrite a document
    Set {
        /// Target collection
        collection: String,
        /// Document id
        id: String,
        /// Full document
        document: Document,
    },
    /// Merge-patch an existing document
    Update {
        /// Target collection
        collection: String,
        /// Document id
        id: String,
        /// Field changes
        patch: Patch,
    },
    /// Delete a document (no-op when absent)
    Delete {
        /// Target collection
        collection: String,
        /// Document id
        id: String,
    },
}

impl BatchOp {
    /// Collection this op targets
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Set { collection, .. }
            | Self::Update { collection, .. }
            | Self::Delete { collection, .. } => collection,
        }
    }

    /// Document id this op targets
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Set { id, .. } | Self::Update { id, .. } | Self::Delete { id, .. } => id,
        }
    }
}

/// Operations staged for a single atomic commit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a full write
    pub fn set(&mut self, collection: impl Into<String>, id: impl Into<String>, document: Document) {
        self.ops.push(BatchOp::Set {
            collection: collection.into(),
            id: id.into(),
            document,
        });
    }

    /// Stage a merge patch
    pub fn update(&mut self, collection: impl Into<String>, id: impl Into<String>, patch: Patch) {
        self.ops.push(BatchOp::Update {
            collection: collection.into(),
            id: id.into(),
            patch,
        });
    }

    /// Stage a delete
    pub fn delete(&mut self, collection: impl Into<String>, id: impl Into<String>) {
        self.ops.push(BatchOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
    }

    /// Staged operations in order
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Consume into operations
    #[inline]
    #[must_use]
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }

    /// Number of staged operations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is staged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Document {
        Document::new()
            .with("personId", 27_i64)
            .with("assoClubIdRefs", vec![1_i64, 2, 1])
    }

    #[test]
    fn delete_sentinel_removes_field() {
        let mut doc = Document::new().with("assoClub_id", 3_i64).with("personId", 1_i64);
        Patch::new().delete_field("assoClub_id").apply_to(&mut doc);
        assert!(!doc.contains("assoClub_id"));
        assert!(doc.contains("personId"));
    }

    #[test]
    fn array_remove_drops_every_occurrence() {
        let mut doc = member();
        Patch::new().array_remove("assoClubIdRefs", 1_i64).apply_to(&mut doc);
        assert_eq!(doc.get("assoClubIdRefs"), Some(&FieldValue::from(vec![2_i64])));
    }

    #[test]
    fn array_sentinels_on_missing_field() {
        let mut doc = Document::new();
        Patch::new().array_remove("refs", 1_i64).apply_to(&mut doc);
        assert!(!doc.contains("refs"));

        Patch::new().array_union("refs", 1_i64).apply_to(&mut doc);
        Patch::new().array_union("refs", 1_i64).apply_to(&mut doc);
        assert_eq!(doc.get("refs"), Some(&FieldValue::from(vec![1_i64])));
    }

    #[test]
    fn batch_keeps_order() {
        let mut batch = WriteBatch::new();
        batch.update("players", "1", Patch::new().delete_field("assoClub_id"));
        batch.delete("clubs", "4");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.ops()[1].collection(), "clubs");
        assert_eq!(batch.ops()[1].id(), "4");
    }
}
