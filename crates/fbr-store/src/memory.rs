//! In-memory document store
//!
//! Shared state lives behind an `Arc`; every [`MemoryStore`] handle belongs to
//! a session. Writes made through a handle reach that handle's own listeners
//! flagged as pending local writes and every other session's listeners as
//! acknowledged remote changes.

use crate::error::StoreError;
use crate::patch::{BatchOp, Patch, WriteBatch};
use crate::query::Query;
use crate::store::{DocumentChange, DocumentListener, DocumentStore, ListenerRegistration};
use crate::value::Document;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

type Collection = BTreeMap<String, Document>;
type DocKey = (String, String);

/// Registered listener
#[derive(Debug)]
struct ListenerSlot {
    id: u64,
    session: u64,
    sender: mpsc::UnboundedSender<DocumentChange>,
}

/// Injected failures
#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    fail_next_write: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    collections: RwLock<HashMap<String, Collection>>,
    listeners: DashMap<DocKey, Vec<ListenerSlot>>,
    next_listener: AtomicU64,
    next_session: AtomicU64,
    faults: Mutex<Faults>,
}

/// Session-aware in-memory [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    session: u64,
}

impl MemoryStore {
    /// Create empty store with a fresh session
    #[must_use]
    pub fn new() -> Self {
        let shared = Arc::new(Shared::default());
        shared.next_session.store(1, Ordering::Relaxed);
        Self { shared, session: 0 }
    }

    /// Another client over the same data
    #[must_use]
    pub fn session(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            session: self.shared.next_session.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Session identifier of this handle
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session
    }

    /// Make every call fail with `StoreError::Unavailable` until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.faults.lock().unavailable = unavailable;
    }

    /// Abort the next write (set, update, delete or commit) without applying it
    pub fn fail_next_write(&self, reason: impl Into<String>) {
        self.shared.faults.lock().fail_next_write = Some(reason.into());
    }

    /// Number of documents in a collection
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        self.shared
            .collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Whether a document exists, bypassing fault injection
    #[must_use]
    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.peek(collection, id).is_some()
    }

    /// Read a document, bypassing fault injection
    #[must_use]
    pub fn peek(&self, collection: &str, id: &str) -> Option<Document> {
        self.shared
            .collections
            .read()
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
    }

    /// Active listeners on a document
    #[must_use]
    pub fn listener_count(&self, collection: &str, id: &str) -> usize {
        self.shared
            .listeners
            .get(&(collection.to_string(), id.to_string()))
            .map_or(0, |slots| slots.len())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.shared.faults.lock().unavailable {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(reason) = self.shared.faults.lock().fail_next_write.take() {
            return Err(StoreError::Aborted(reason));
        }
        Ok(())
    }

    /// Apply operations atomically, then notify listeners of final states
    fn apply(&self, ops: Vec<BatchOp>) -> Result<(), StoreError> {
        self.check_write()?;

        let changed = {
            let mut guard = self.shared.collections.write();
            let mut staged: HashMap<String, Collection> = HashMap::new();
            let mut touched: BTreeSet<DocKey> = BTreeSet::new();

            for op in ops {
                let base = &*guard;
                let stage = |staged: &mut HashMap<String, Collection>, name: &str| {
                    if !staged.contains_key(name) {
                        staged.insert(
                            name.to_string(),
                            base.get(name).cloned().unwrap_or_default(),
                        );
                    }
                };
                match op {
                    BatchOp::Set {
                        collection,
                        id,
                        document,
                    } => {
                        stage(&mut staged, &collection);
                        if let Some(coll) = staged.get_mut(&collection) {
                            coll.insert(id.clone(), document);
                        }
                        touched.insert((collection, id));
                    }
                    BatchOp::Update {
                        collection,
                        id,
                        patch,
                    } => {
                        stage(&mut staged, &collection);
                        let doc = staged
                            .get_mut(&collection)
                            .and_then(|coll| coll.get_mut(&id))
                            .ok_or_else(|| StoreError::not_found(&collection, &id))?;
                        patch.apply_to(doc);
                        touched.insert((collection, id));
                    }
                    BatchOp::Delete { collection, id } => {
                        stage(&mut staged, &collection);
                        if let Some(coll) = staged.get_mut(&collection) {
                            coll.remove(&id);
                        }
                        touched.insert((collection, id));
                    }
                }
            }

            for (name, coll) in staged {
                guard.insert(name, coll);
            }

            touched
                .into_iter()
                .map(|(collection, id)| {
                    let doc = guard.get(&collection).and_then(|c| c.get(&id)).cloned();
                    ((collection, id), doc)
                })
                .collect::<Vec<_>>()
        };

        self.notify(changed);
        Ok(())
    }

    fn notify(&self, changed: Vec<(DocKey, Option<Document>)>) {
        for (key, document) in changed {
            if let Some(mut slots) = self.shared.listeners.get_mut(&key) {
                slots.retain(|slot| {
                    slot.sender
                        .send(DocumentChange {
                            document: document.clone(),
                            has_pending_writes: slot.session == self.session,
                        })
                        .is_ok()
                });
            }
        }
    }

    fn unsubscribe(shared: &Weak<Shared>, key: &DocKey, listener: u64) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let now_empty = match shared.listeners.get_mut(key) {
            Some(mut slots) => {
                slots.retain(|slot| slot.id != listener);
                slots.is_empty()
            }
            None => false,
        };
        if now_empty {
            shared.listeners.remove_if(key, |_, slots| slots.is_empty());
        }
        tracing::trace!(collection = %key.0, id = %key.1, listener, "listener removed");
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        Ok(self.peek(collection, id))
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        self.apply(vec![BatchOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            document,
        }])
    }

    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<(), StoreError> {
        self.apply(vec![BatchOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            patch,
        }])
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.apply(vec![BatchOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        }])
    }

    async fn query(&self, query: &Query) -> Result<Vec<(String, Document)>, StoreError> {
        self.check_available()?;
        let guard = self.shared.collections.read();
        Ok(guard
            .get(query.collection_name())
            .map(|coll| query.evaluate(coll.iter()))
            .unwrap_or_default())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.apply(batch.into_ops())
    }

    async fn listen(&self, collection: &str, id: &str) -> Result<DocumentListener, StoreError> {
        self.check_available()?;
        let (sender, changes) = mpsc::unbounded_channel();
        let listener = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        let key: DocKey = (collection.to_string(), id.to_string());

        self.shared
            .listeners
            .entry(key.clone())
            .or_default()
            .push(ListenerSlot {
                id: listener,
                session: self.session,
                sender,
            });

        let shared = Arc::downgrade(&self.shared);
        let registration =
            ListenerRegistration::new(move || Self::unsubscribe(&shared, &key, listener));

        Ok(DocumentListener {
            changes,
            registration,
        })
    }
}
