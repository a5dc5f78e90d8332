use crate::cascade;
use crate::entity::Managed;
use crate::error::Result;
use crate::registry::Records;
use fbr_model::{Collection, DocKey};
use fbr_store::FieldValue;
use tracing::{error, info};

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyOutcome {
    /// Whether the record existed
    pub existed: bool,
    /// Documents whose references to it were removed
    pub patched: Vec<(Collection, String)>,
}

impl<R: Managed> Records<'_, R> {
    /// Delete a record and every reference to it, atomically
    ///
    /// Deleting a missing record succeeds.
    ///
    /// # Errors
    /// `Store` when querying or committing fails; nothing is then changed
    pub async fn destroy(&self, key: R::Key) -> Result<DestroyOutcome> {
        self.destroy_doc(&key.doc_id(), key.to_value()).await
    }

    /// Destroy every record of this type, cascades included
    ///
    /// # Errors
    /// The first failing read or destroy; records destroyed before it stay
    /// destroyed
    pub async fn clear_all(&self) -> Result<usize> {
        let mut removed = 0;
        for record in self.retrieve_all(None).await? {
            let key = record.key();
            if self.destroy_doc(&key.doc_id(), key.to_value()).await?.existed {
                removed += 1;
            }
        }
        info!(collection = self.collection(), removed, "collection cleared");
        Ok(removed)
    }

    async fn destroy_doc(&self, doc_id: &str, key: FieldValue) -> Result<DestroyOutcome> {
        let existed = self.store().exists(self.collection(), doc_id).await?;
        let plan = cascade::plan(self.store(), R::COLLECTION, doc_id, key).await?;
        let patched = plan.patched().to_vec();

        self.store()
            .commit(plan.into_batch())
            .await
            .map_err(|e| {
                error!(collection = self.collection(), id = %doc_id, error = %e, "delete failed");
                e
            })?;
        info!(
            collection = self.collection(),
            id = %doc_id,
            patched = patched.len(),
            "record deleted"
        );
        Ok(DestroyOutcome { existed, patched })
    }
}
