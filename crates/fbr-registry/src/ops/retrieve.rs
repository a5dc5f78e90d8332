use chrono::NaiveDate;
use crate::entity::Managed;
use crate::error::{RegistryError, Result};
use crate::registry::Records;
use fbr_model::record::date_to_timestamp;
use fbr_model::{ConstraintViolation, DocKey, Record, ViolationReport};
use fbr_store::{Direction, Document, FieldValue, Query};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One page of ordered records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Stored field to order by; the key field when absent
    pub order: Option<String>,
    /// First value of the page, inclusive
    pub cursor: Option<String>,
    /// Page size; the configured page size when absent
    pub limit: Option<usize>,
}

impl PageRequest {
    /// First page ordered by `field`
    #[must_use]
    pub fn ordered_by(field: impl Into<String>) -> Self {
        Self {
            order: Some(field.into()),
            ..Self::default()
        }
    }

    /// With cursor
    #[must_use]
    pub fn starting_at(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// With page size
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Cursor value in the stored type of `order`
fn cursor_value(order: &str, raw: &str) -> Result<FieldValue> {
    match order {
        "dateOfBirth" => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(|d| FieldValue::from(date_to_timestamp(d)))
            .map_err(|_| {
                RegistryError::Validation(ViolationReport::single(
                    "cursor",
                    ConstraintViolation::range(format!("Invalid date cursor: {raw}")),
                ))
            }),
        "name" => Ok(FieldValue::from(raw)),
        _ => Ok(raw
            .trim()
            .parse::<i64>()
            .map_or_else(|_| FieldValue::from(raw), FieldValue::from)),
    }
}

impl<R: Managed> Records<'_, R> {
    /// Load one record
    ///
    /// # Errors
    /// `Store` on store failure, `Conversion` when the document is malformed
    pub async fn retrieve(&self, key: R::Key) -> Result<Option<R>> {
        self.retrieve_doc(&key.doc_id()).await
    }

    pub(crate) async fn retrieve_doc(&self, doc_id: &str) -> Result<Option<R>> {
        let record = self
            .store()
            .get(self.collection(), doc_id)
            .await?
            .map(|doc| R::from_document(&doc))
            .transpose()?;
        debug!(
            collection = self.collection(),
            id = %doc_id,
            found = record.is_some(),
            "record retrieved"
        );
        Ok(record)
    }

    /// Load every record, optionally ordered by a stored field
    ///
    /// # Errors
    /// `Store` on store failure, `Conversion` when a document is malformed
    pub async fn retrieve_all(&self, order: Option<&str>) -> Result<Vec<R>> {
        let mut query = Query::collection(self.collection());
        if let Some(field) = order {
            query = query.order_by(field, Direction::Ascending);
        }
        let records = Self::convert(self.store().query(&query).await?)?;
        info!(
            collection = self.collection(),
            count = records.len(),
            order = order.unwrap_or(""),
            "records retrieved"
        );
        Ok(records)
    }

    /// Load one page of records
    ///
    /// # Errors
    /// `Validation` for a malformed date cursor, `Store` on store failure,
    /// `Conversion` when a document is malformed
    pub async fn retrieve_block(&self, page: &PageRequest) -> Result<Vec<R>> {
        let order = page
            .order
            .as_deref()
            .unwrap_or_else(|| R::COLLECTION.key_field());
        let mut query = Query::collection(self.collection())
            .order_by(order, Direction::Ascending)
            .limit(page.limit.unwrap_or(self.config().page_size));
        if let Some(cursor) = &page.cursor {
            query = query.start_at(cursor_value(order, cursor)?);
        }
        let records = Self::convert(self.store().query(&query).await?)?;
        debug!(
            collection = self.collection(),
            order,
            cursor = page.cursor.as_deref().unwrap_or(""),
            count = records.len(),
            "block retrieved"
        );
        Ok(records)
    }

    fn convert(docs: Vec<(String, Document)>) -> Result<Vec<R>> {
        docs.iter()
            .map(|(_, doc)| R::from_document(doc).map_err(RegistryError::from))
            .collect()
    }
}
