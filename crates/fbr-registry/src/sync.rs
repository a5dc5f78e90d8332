//! Change-notification bridge
//!
//! [`Records::sync_with`] captures a record and turns the store's per-document
//! change stream into [`ChangeEvent`]s. Writes still pending from this client
//! are local echoes and are dropped. A remote snapshot is reported when its
//! stored document differs from the last one seen, so a change to a field
//! the record does not decode, such as a back-reference, still surfaces as
//! [`ChangeEvent::Modified`].

use crate::entity::Managed;
use crate::error::{RegistryError, Result};
use crate::registry::Records;
use fbr_model::{Collection, DocKey, Record};
use fbr_store::{Document, DocumentChange, ListenerRegistration};
use futures::Stream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Remote change to a synced record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<R> {
    /// The record now has this content
    Modified(R),
    /// The record was deleted; carries the last known content
    Removed(R),
}

impl<R> ChangeEvent<R> {
    /// Record carried by the event
    #[must_use]
    pub fn record(&self) -> &R {
        match self {
            Self::Modified(r) | Self::Removed(r) => r,
        }
    }

    /// Whether the record was deleted
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

/// Live subscription to one record
///
/// Cancelling or dropping the subscription removes the store listener.
#[derive(Debug)]
pub struct SyncSubscription<R> {
    collection: Collection,
    doc_id: String,
    changes: mpsc::UnboundedReceiver<DocumentChange>,
    registration: Option<ListenerRegistration>,
    last: Option<R>,
    last_doc: Option<Document>,
}

impl<R: Record> SyncSubscription<R> {
    /// Document id being watched
    #[must_use]
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Last snapshot reported, `None` after removal
    #[must_use]
    pub fn snapshot(&self) -> Option<&R> {
        self.last.as_ref()
    }

    /// Next remote change
    ///
    /// Returns `None` once the listener is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent<R>> {
        loop {
            let change = self.changes.recv().await?;
            if change.has_pending_writes {
                debug!(collection = %self.collection, id = %self.doc_id, "local echo ignored");
                continue;
            }
            let Some(doc) = change.document else {
                self.last_doc = None;
                if let Some(last) = self.last.take() {
                    info!(collection = %self.collection, id = %self.doc_id, "record removed remotely");
                    return Some(ChangeEvent::Removed(last));
                }
                continue;
            };
            if self.last_doc.as_ref() == Some(&doc) {
                debug!(collection = %self.collection, id = %self.doc_id, "snapshot unchanged");
                continue;
            }
            match R::from_document(&doc) {
                Ok(record) => {
                    info!(collection = %self.collection, id = %self.doc_id, "record modified remotely");
                    self.last = Some(record.clone());
                    self.last_doc = Some(doc);
                    return Some(ChangeEvent::Modified(record));
                }
                Err(e) => {
                    warn!(collection = %self.collection, id = %self.doc_id, error = %e, "unreadable snapshot skipped");
                }
            }
        }
    }

    /// Events as a stream
    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent<R>> + Send {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|event| (event, sub))
        })
    }

    /// Stop the subscription
    pub fn cancel(mut self) {
        self.release();
    }
}

impl<R> SyncSubscription<R> {
    fn release(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.remove();
            debug!(collection = %self.collection, id = %self.doc_id, "sync cancelled");
        }
    }
}

impl<R> Drop for SyncSubscription<R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: Managed> Records<'_, R> {
    /// Watch a record for remote changes
    ///
    /// # Errors
    /// `NotFound` when the record does not exist, `Store` when reading or
    /// subscribing fails
    pub async fn sync_with(&self, key: R::Key) -> Result<SyncSubscription<R>> {
        let doc_id = key.doc_id();
        let doc = self
            .store()
            .get(self.collection(), &doc_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                collection: R::COLLECTION,
                id: doc_id.clone(),
            })?;
        let current = R::from_document(&doc)?;
        let listener = self.store().listen(self.collection(), &doc_id).await?;
        debug!(collection = self.collection(), id = %doc_id, "sync started");
        Ok(SyncSubscription {
            collection: R::COLLECTION,
            doc_id,
            changes: listener.changes,
            registration: Some(listener.registration),
            last: Some(current),
            last_doc: Some(doc),
        })
    }
}
