//! Storage layer for docmigrate
//!
//! The `DocumentStore` trait is the contract a target store must satisfy:
//! create collections and single-field unique indexes inside an explicitly
//! named database context. An in-memory backend is always available; the
//! MongoDB backend is behind the `mongodb` feature.

mod backend;
pub mod error;
mod memory;
#[cfg(feature = "mongodb")]
mod mongo;
pub mod traits;
mod types;

pub use backend::StoreBackend;
pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
pub use traits::DocumentStore;
pub use types::{IndexInfo, namespace};
