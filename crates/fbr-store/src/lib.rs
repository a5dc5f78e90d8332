//! FBR Store
//!
//! The document-store capability the registry core is written against.
//!
//! # Overview
//!
//! - **FieldValue / Document**: schemaless documents with totally ordered values
//! - **Patch**: merge patches with delete and array-remove sentinels
//! - **WriteBatch**: staged writes committed atomically
//! - **DocumentStore**: async get/set/update/delete/query/commit/listen
//! - **MemoryStore**: session-aware in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use fbr_store::{Document, DocumentStore, MemoryStore, Patch};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.set("clubs", "1", Document::new().with("name", "HSV")).await.unwrap();
//! store.update("clubs", "1", Patch::new().set("name", "Hamburger SV")).await.unwrap();
//!
//! let doc = store.get("clubs", "1").await.unwrap().unwrap();
//! assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("Hamburger SV"));
//! # });
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod patch;
pub mod query;
pub mod store;
pub mod value;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
pub use patch::{BatchOp, FieldPatch, Patch, WriteBatch};
pub use query::{Direction, Filter, Query};
pub use store::{DocumentChange, DocumentListener, DocumentStore, ListenerRegistration};
pub use value::{Document, FieldValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
