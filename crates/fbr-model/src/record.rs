//! Record trait and document conversion
//!
//! A [`Record`] is an entity that has passed every synchronous check. It owns
//! the translation between its in-memory shape and the store document:
//! association names on the entity, `<role>_id` and `<role>IdRefs` fields in
//! the document, dates as timestamps.

use crate::collection::Collection;
use crate::enumeration::EnumCode;
use crate::ids::DocKey;
use crate::violation::ViolationReport;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fbr_store::{Document, FieldPatch, FieldValue, Patch};
use std::collections::BTreeSet;
use std::fmt;

/// A stored document does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Required field absent
    #[error("{collection} document lacks field {field}")]
    MissingField {
        /// Collection of the document
        collection: Collection,
        /// Field name
        field: &'static str,
    },

    /// Field holds a value of another type
    #[error("{collection} field {field} has the wrong type")]
    WrongType {
        /// Collection of the document
        collection: Collection,
        /// Field name
        field: &'static str,
    },

    /// Field holds a value outside its domain
    #[error("{collection} field {field} holds an invalid value: {value}")]
    InvalidValue {
        /// Collection of the document
        collection: Collection,
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// Typed field access for converters
#[derive(Debug, Clone, Copy)]
pub struct DocReader<'a> {
    doc: &'a Document,
    collection: Collection,
}

impl<'a> DocReader<'a> {
    /// Read fields of a document in `collection`
    #[must_use]
    pub fn new(doc: &'a Document, collection: Collection) -> Self {
        Self { doc, collection }
    }

    fn missing(&self, field: &'static str) -> ConversionError {
        ConversionError::MissingField {
            collection: self.collection,
            field,
        }
    }

    fn wrong_type(&self, field: &'static str) -> ConversionError {
        ConversionError::WrongType {
            collection: self.collection,
            field,
        }
    }

    /// Invalid-value error for `field`
    #[must_use]
    pub fn invalid(&self, field: &'static str, value: impl fmt::Display) -> ConversionError {
        ConversionError::InvalidValue {
            collection: self.collection,
            field,
            value: value.to_string(),
        }
    }

    fn present(&self, field: &'static str) -> Option<&'a FieldValue> {
        self.doc.get(field).filter(|v| !matches!(v, FieldValue::Null))
    }

    /// Mandatory integer
    ///
    /// # Errors
    /// Missing or non-integer field
    pub fn integer(&self, field: &'static str) -> Result<i64, ConversionError> {
        self.opt_integer(field)?.ok_or_else(|| self.missing(field))
    }

    /// Optional integer
    ///
    /// # Errors
    /// Non-integer field
    pub fn opt_integer(&self, field: &'static str) -> Result<Option<i64>, ConversionError> {
        self.present(field)
            .map(|v| v.as_integer().ok_or_else(|| self.wrong_type(field)))
            .transpose()
    }

    /// Mandatory string
    ///
    /// # Errors
    /// Missing or non-string field
    pub fn string(&self, field: &'static str) -> Result<String, ConversionError> {
        let value = self.present(field).ok_or_else(|| self.missing(field))?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.wrong_type(field))
    }

    /// Mandatory timestamp read as a calendar date
    ///
    /// # Errors
    /// Missing or non-timestamp field
    pub fn date(&self, field: &'static str) -> Result<NaiveDate, ConversionError> {
        let value = self.present(field).ok_or_else(|| self.missing(field))?;
        value
            .as_timestamp()
            .map(|ts| ts.date_naive())
            .ok_or_else(|| self.wrong_type(field))
    }

    /// Integer array; an absent field is empty
    ///
    /// # Errors
    /// Non-array field or non-integer element
    pub fn integers(&self, field: &'static str) -> Result<Vec<i64>, ConversionError> {
        let Some(value) = self.present(field) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| self.wrong_type(field))?;
        items
            .iter()
            .map(|v| v.as_integer().ok_or_else(|| self.wrong_type(field)))
            .collect()
    }

    /// Mandatory key
    ///
    /// # Errors
    /// Missing field or value outside the key domain
    pub fn key<K>(
        &self,
        field: &'static str,
        convert: impl Fn(i64) -> Option<K>,
    ) -> Result<K, ConversionError> {
        let raw = self.integer(field)?;
        convert(raw).ok_or_else(|| self.invalid(field, raw))
    }

    /// Optional key
    ///
    /// # Errors
    /// Value outside the key domain
    pub fn opt_key<K>(
        &self,
        field: &'static str,
        convert: impl Fn(i64) -> Option<K>,
    ) -> Result<Option<K>, ConversionError> {
        self.opt_integer(field)?
            .map(|raw| convert(raw).ok_or_else(|| self.invalid(field, raw)))
            .transpose()
    }

    /// Set of keys
    ///
    /// # Errors
    /// Element outside the key domain
    pub fn key_set<K: Ord>(
        &self,
        field: &'static str,
        convert: impl Fn(i64) -> Option<K>,
    ) -> Result<BTreeSet<K>, ConversionError> {
        self.integers(field)?
            .into_iter()
            .map(|raw| convert(raw).ok_or_else(|| self.invalid(field, raw)))
            .collect()
    }

    /// Enumeration code
    ///
    /// # Errors
    /// Missing field or unknown code
    pub fn code<E: EnumCode>(&self, field: &'static str) -> Result<E, ConversionError> {
        self.key(field, E::from_code)
    }
}

/// Midnight UTC of a calendar date
#[must_use]
pub fn date_to_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Array value of a key set
#[must_use]
pub fn key_array<K: DocKey>(keys: &BTreeSet<K>) -> FieldValue {
    FieldValue::Array(keys.iter().map(DocKey::to_value).collect())
}

/// Reference from a record field to another record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Field of the referencing record
    pub field: &'static str,
    /// Collection of the referenced record
    pub target: Collection,
    /// Document id of the referenced record
    pub doc_id: String,
}

impl Reference {
    /// Reference from `field` to the record keyed `key` in `target`
    pub fn to<K: DocKey>(field: &'static str, target: Collection, key: &K) -> Self {
        Self {
            field,
            target,
            doc_id: key.doc_id(),
        }
    }

    /// One reference per key
    pub fn to_all<'k, K: DocKey>(
        field: &'static str,
        target: Collection,
        keys: impl IntoIterator<Item = &'k K>,
    ) -> Vec<Self> {
        keys.into_iter()
            .map(|key| Self::to(field, target, key))
            .collect()
    }
}

/// Outcome of diffing an update against the stored record
#[derive(Debug, Clone, PartialEq)]
pub struct Changes<R> {
    /// Record as it will be after the write
    pub record: R,
    /// Changed fields only
    pub patch: Patch,
    /// References introduced by the update that must resolve
    pub references: Vec<Reference>,
}

impl<R> Changes<R> {
    /// Start from the stored record
    pub fn new(record: R) -> Self {
        Self {
            record,
            patch: Patch::new(),
            references: Vec::new(),
        }
    }

    /// Stage a new field value
    pub fn set(&mut self, field: &'static str, value: impl Into<FieldValue>) {
        self.patch.push(field, FieldPatch::Set(value.into()));
    }

    /// Stage removal of a field
    pub fn clear(&mut self, field: &'static str) {
        self.patch.push(field, FieldPatch::Delete);
    }

    /// Whether nothing changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }
}

/// A validated entity stored in one collection
pub trait Record: Sized + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Primary key
    type Key: DocKey + fmt::Display;

    /// Raw creation input
    type Slots: fmt::Debug + Send + Sync;

    /// Collection holding these records
    const COLLECTION: Collection;

    /// Build from raw input, checking every field
    ///
    /// # Errors
    /// Every violated field
    fn from_slots(slots: &Self::Slots) -> Result<Self, ViolationReport>;

    /// Primary key
    fn key(&self) -> Self::Key;

    /// References that must resolve when the record is written
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Store representation
    fn to_document(&self) -> Document;

    /// Parse a store document
    ///
    /// # Errors
    /// The document does not have the record's shape
    fn from_document(doc: &Document) -> Result<Self, ConversionError>;
}

/// A record that supports diff-based updates
pub trait Updatable: Record {
    /// Raw update input
    type Update: fmt::Debug + Send + Sync;

    /// Key of the record an update targets
    ///
    /// # Errors
    /// The key is absent or malformed
    fn update_key(update: &Self::Update) -> Result<Self::Key, ViolationReport>;

    /// Diff the update against `self`, checking every submitted field
    ///
    /// # Errors
    /// Every violated field
    fn changes(&self, update: &Self::Update) -> Result<Changes<Self>, ViolationReport>;
}
