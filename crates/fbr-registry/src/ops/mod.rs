//! Storage operations on [`Records`](crate::Records)
//!
//! - `add`: validate, probe key and references, write one document
//! - `update`: diff against the stored record, write changed fields only
//! - `destroy`: stage reference cleanup and delete in one batch
//! - `retrieve`, `retrieve_all`, `retrieve_block`: typed reads
//! - `clear_all`: destroy every record of a type

mod add;
mod destroy;
mod retrieve;
mod update;

pub use destroy::DestroyOutcome;
pub use retrieve::PageRequest;
pub use update::UpdateOutcome;
