//! 内存存储

pub mod catalog_store;
pub mod memory_store;

pub use catalog_store::{CatalogSnapshot, CatalogStore};
pub use memory_store::MemoryStore;
