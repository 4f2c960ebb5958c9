//! In-memory item storage for the items API.
//!
//! The store is an ordered collection of [`Item`](items_types::Item)
//! records shared by every request. It is created once at startup,
//! optionally filled with [`seed_items`], and lives for the whole process.
//!
//! # Storage Backends
//!
//! All backends implement the [`ItemStore`] trait:
//!
//! - [`InMemoryItemStore`] -- `Vec`-backed store behind a single `RwLock`
//!
//! # Design Rules
//!
//! 1. Ordering is insertion order. Lookups scan by id; position is never an index.
//! 2. Ids are unique at all times. `append` does not check; callers use `create`.
//! 3. Removal preserves the relative order of the remaining items.
//! 4. Every operation runs under one lock, so a mutation is never observed half-done.

pub mod error;
pub mod memory;
pub mod seed;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryItemStore;
pub use seed::seed_items;
pub use traits::ItemStore;
