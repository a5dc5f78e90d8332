use crate::checks::{check_id_as_id_ref, check_references};
use crate::entity::Managed;
use crate::error::{RegistryError, Result};
use crate::registry::Records;
use fbr_model::{DocKey, Record, ViolationReport};
use tracing::{debug, error, info, warn};

/// Result of an update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome<R> {
    /// Record as stored after the call
    pub record: R,
    /// Document fields written, sorted
    pub fields: Vec<String>,
}

impl<R> UpdateOutcome<R> {
    /// Whether nothing changed and nothing was written
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R: Managed> Records<'_, R> {
    /// Write the fields of `update` that differ from the stored record
    ///
    /// Every submitted field is checked; any violation aborts the write. An
    /// update that changes nothing performs no write.
    ///
    /// # Errors
    /// `Validation` with every violation found, including a
    /// referential-integrity violation on the key when the record does not
    /// exist; `NotFound` when it disappears between that check and the read;
    /// `TooFewPlayers` for short national teams; `Store` when the store fails
    pub async fn update(&self, update: &R::Update) -> Result<UpdateOutcome<R>> {
        let key = R::update_key(update)?;
        let doc_id = key.doc_id();
        if let Err(violation) = check_id_as_id_ref(self.store(), R::COLLECTION, &doc_id).await? {
            warn!(collection = self.collection(), id = %doc_id, "update of unknown record");
            return Err(RegistryError::Validation(ViolationReport::single(
                R::COLLECTION.key_field(),
                violation,
            )));
        }
        let current = self
            .retrieve_doc(&doc_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                collection: R::COLLECTION,
                id: doc_id.clone(),
            })?;

        let changes = current.changes(update).map_err(|report| {
            warn!(collection = self.collection(), id = %doc_id, %report, "rejected update");
            RegistryError::Validation(report)
        })?;
        if changes.is_empty() {
            debug!(collection = self.collection(), id = %doc_id, "no field changed");
            return Ok(UpdateOutcome {
                record: current,
                fields: Vec::new(),
            });
        }
        changes.record.admit(self.config())?;

        let mut report = ViolationReport::new();
        check_references(self.store(), &changes.references, &mut report).await?;
        if !report.is_empty() {
            warn!(collection = self.collection(), id = %doc_id, %report, "rejected update");
            return Err(RegistryError::Validation(report));
        }

        let fields: Vec<String> = changes.patch.field_names().map(str::to_string).collect();
        self.store()
            .update(self.collection(), &doc_id, changes.patch)
            .await
            .map_err(|e| {
                error!(collection = self.collection(), id = %doc_id, error = %e, "update failed");
                e
            })?;
        info!(
            collection = self.collection(),
            id = %doc_id,
            fields = ?fields,
            "record updated"
        );
        Ok(UpdateOutcome {
            record: changes.record,
            fields,
        })
    }
}
