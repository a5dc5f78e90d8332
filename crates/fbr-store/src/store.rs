//! The document-store capability
//!
//! [`DocumentStore`] is the only seam between the registry core and a backing
//! database. Implementations must provide merge-patch updates with delete and
//! array-remove sentinels, atomic batches, and per-document change listeners
//! that flag locally originated pending writes.

use crate::error::StoreError;
use crate::patch::{Patch, WriteBatch};
use crate::query::Query;
use crate::value::Document;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

/// Notification delivered to a document listener
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    /// Current document, `None` when deleted
    pub document: Option<Document>,
    /// Change originated from this client and is not yet acknowledged
    pub has_pending_writes: bool,
}

/// Cancellation handle for a listener
///
/// Removing consumes the handle, so a listener is cancelled at most once.
pub struct ListenerRegistration {
    unsubscribe: Box<dyn FnOnce() + Send + Sync>,
}

impl ListenerRegistration {
    /// Wrap an unsubscribe action
    #[must_use]
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Box::new(unsubscribe),
        }
    }

    /// Stop delivering notifications
    pub fn remove(self) {
        (self.unsubscribe)();
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration").finish_non_exhaustive()
    }
}

/// Live subscription to one document
#[derive(Debug)]
pub struct DocumentListener {
    /// Change notifications, in commit order
    pub changes: mpsc::UnboundedReceiver<DocumentChange>,
    /// Cancellation handle
    pub registration: ListenerRegistration,
}

/// Abstract document database
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Read one document
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or overwrite a document
    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError>;

    /// Merge-patch an existing document
    ///
    /// # Errors
    /// `StoreError::NotFound` when the document does not exist
    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<(), StoreError>;

    /// Delete a document; deleting a missing document succeeds
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Run a query
    async fn query(&self, query: &Query) -> Result<Vec<(String, Document)>, StoreError>;

    /// Apply every staged operation or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Subscribe to changes of one document
    async fn listen(&self, collection: &str, id: &str) -> Result<DocumentListener, StoreError>;

    /// Whether a document exists
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(collection, id).await?.is_some())
    }

    /// Start an empty batch
    fn batch(&self) -> WriteBatch {
        WriteBatch::new()
    }
}
