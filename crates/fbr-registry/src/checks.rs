//! Checks that consult the store
//!
//! Each check returns `Ok(Ok(..))` when the constraint holds, `Ok(Err(..))`
//! with the violation when it does not, and `Err(..)` only when the store
//! itself failed. The operations run every key and reference through these.

use fbr_model::{Collection, Reference, Validation, ViolationReport};
use fbr_store::{DocumentStore, StoreError};

/// Outcome of a store-backed check
pub type CheckResult<T = ()> = Result<Validation<T>, StoreError>;

/// Key for a new record: well formed, present and not yet taken
///
/// Returns the document id on success.
///
/// # Errors
/// Store failure during the existence probe
pub async fn check_id_as_id(
    store: &dyn DocumentStore,
    collection: Collection,
    raw: &str,
) -> CheckResult<String> {
    let doc_id = match collection.require_key(collection.parse_key(raw)) {
        Ok(id) => id,
        Err(violation) => return Ok(Err(violation)),
    };
    if store.exists(collection.name(), &doc_id).await? {
        Ok(Err(collection.duplicate_key()))
    } else {
        Ok(Ok(doc_id))
    }
}

/// Reference to an existing record: well formed, present and resolvable
///
/// Returns the document id on success.
///
/// # Errors
/// Store failure during the existence probe
pub async fn check_id_as_id_ref(
    store: &dyn DocumentStore,
    collection: Collection,
    raw: &str,
) -> CheckResult<String> {
    let doc_id = match collection.require_key(collection.parse_key(raw)) {
        Ok(id) => id,
        Err(violation) => return Ok(Err(violation)),
    };
    if store.exists(collection.name(), &doc_id).await? {
        Ok(Ok(doc_id))
    } else {
        Ok(Err(collection.dangling_reference(&doc_id)))
    }
}

/// Resolve every reference, one id-ref check each
pub(crate) async fn check_references(
    store: &dyn DocumentStore,
    references: &[Reference],
    report: &mut ViolationReport,
) -> Result<(), StoreError> {
    for reference in references {
        let resolved = check_id_as_id_ref(store, reference.target, &reference.doc_id).await?;
        if let Err(violation) = resolved {
            report.push(reference.field, violation);
        }
    }
    Ok(())
}
