use crate::checks::{check_id_as_id, check_references};
use crate::entity::Managed;
use crate::error::{RegistryError, Result};
use crate::registry::Records;
use fbr_model::{Collection, DocKey, PersonType, Record, ViolationReport};
use tracing::{error, info, warn};

impl<R: Managed> Records<'_, R> {
    /// Validate and store a new record
    ///
    /// Nothing is written unless every field is valid, the key is unused and
    /// every reference resolves.
    ///
    /// # Errors
    /// `Validation` with every violation found, `TooFewPlayers` for short
    /// national teams, `Store` when the store fails
    pub async fn add(&self, slots: &R::Slots) -> Result<R> {
        let record = R::from_slots(slots).map_err(|report| {
            warn!(collection = self.collection(), %report, "rejected invalid record");
            RegistryError::Validation(report)
        })?;
        record.admit(self.config())?;

        let doc_id = record.key().doc_id();
        let mut report = ViolationReport::new();
        if let Err(violation) = check_id_as_id(self.store(), R::COLLECTION, &doc_id).await? {
            report.push(R::COLLECTION.key_field(), violation);
        }
        check_references(self.store(), &record.references(), &mut report).await?;
        if !report.is_empty() {
            warn!(collection = self.collection(), id = %doc_id, %report, "rejected record");
            return Err(RegistryError::Validation(report));
        }

        if let Some(role) = R::ROLE {
            if self.config().warn_on_role_mismatch {
                self.check_role_agreement(&doc_id, role).await;
            }
        }

        self.store()
            .set(self.collection(), &doc_id, record.to_document())
            .await
            .map_err(|e| {
                error!(collection = self.collection(), id = %doc_id, error = %e, "create failed");
                e
            })?;
        info!(collection = self.collection(), id = %doc_id, "record created");
        Ok(record)
    }

    async fn check_role_agreement(&self, doc_id: &str, role: PersonType) {
        let person = match self.registry.persons().retrieve_doc(doc_id).await {
            Ok(person) => person,
            Err(e) => {
                warn!(id = %doc_id, error = %e, "could not read base person");
                return;
            }
        };
        match person {
            None => warn!(
                collection = self.collection(),
                id = %doc_id,
                "role record has no base person in {}",
                Collection::Persons
            ),
            Some(p) if !p.has_role(role) => warn!(
                collection = self.collection(),
                id = %doc_id,
                role = %role,
                "base person lacks the role tag"
            ),
            Some(_) => {}
        }
    }
}
