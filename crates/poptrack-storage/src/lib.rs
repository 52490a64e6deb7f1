//! Persistence for the blind-box collection tracker.
//!
//! Provides the [`CollectionStore`] trait defining the gateway contract that
//! all backends implement, the [`InMemoryStore`] and [`SqliteStore`]
//! backends, and the reconciliation that keeps an in-memory
//! [`poptrack_core::Collection`] in step with a backend.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: SetRecord, FigureRecord row types and SaveReport
//! - [`traits`]: CollectionStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema and migration setup
//! - [`sqlite`]: SqliteStore implementation
//! - [`sync`]: load_all / save_all reconciliation
//! - [`tracker`]: Tracker session pairing a collection with a store

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod sync;
pub mod tracker;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use sync::{load_all, save_all};
pub use tracker::Tracker;
pub use traits::CollectionStore;
pub use types::{FigureRecord, SaveReport, SetRecord};
