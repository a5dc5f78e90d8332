//! FBR Registry
//!
//! Storage orchestration for football records: uniqueness and referential
//! integrity checks before writes, atomic cascade deletes, paged reads and a
//! change-notification bridge.
//!
//! # Overview
//!
//! - **Registry**: store handle plus [`RegistryConfig`], passed explicitly
//! - **Records**: per-entity `add`, `update`, `destroy`, `retrieve`,
//!   `retrieve_all`, `retrieve_block`, `clear_all` and `sync_with`
//! - **cascade**: reverse-reference table and single-batch delete planning
//! - **checks**: the asynchronous id and id-ref checks
//!
//! # Example
//!
//! ```rust
//! use fbr_model::prelude::*;
//! use fbr_registry::Registry;
//! use fbr_store::MemoryStore;
//!
//! # tokio_test::block_on(async {
//! let registry = Registry::with_defaults(MemoryStore::new());
//! registry
//!     .associations()
//!     .add(&AssociationSlots {
//!         asso_id: "1".into(),
//!         name: "DFB".into(),
//!         sup_associations: vec![],
//!     })
//!     .await
//!     .unwrap();
//!
//! // club 2 points at a missing association
//! let err = registry
//!     .clubs()
//!     .add(&ClubSlots {
//!         club_id: "2".into(),
//!         name: "Hamburger SV".into(),
//!         gender: "1".into(),
//!         association: "7".into(),
//!     })
//!     .await
//!     .unwrap_err();
//! assert!(err.has_violation(ViolationKind::ReferentialIntegrity));
//! # });
//! ```

#![warn(missing_docs)]

pub mod cascade;
pub mod checks;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod ops;
pub mod registry;
pub mod sync;

// Re-exports
pub use config::RegistryConfig;
pub use entity::Managed;
pub use error::{RegistryError, Result};
pub use ops::{DestroyOutcome, PageRequest, UpdateOutcome};
pub use registry::{Records, Registry};
pub use sync::{ChangeEvent, SyncSubscription};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ChangeEvent, DestroyOutcome, Managed, PageRequest, Records, Registry, RegistryConfig,
        RegistryError, SyncSubscription, UpdateOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
