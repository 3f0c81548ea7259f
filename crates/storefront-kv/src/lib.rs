//! Type-safe key-value persistence for the storefront cart.
//!
//! Plays the role browser local storage plays for a web storefront: a small
//! synchronous key-value store that survives restarts, with values stored as
//! JSON.
//!
//! # Example
//!
//! ```rust
//! use storefront_kv::{cache_key, Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! let key = cache_key!("storefront", "coupon");
//!
//! cache.set(&key, "SAVE10").unwrap();
//! let code: Option<String> = cache.get(&key).unwrap();
//! assert_eq!(code.as_deref(), Some("SAVE10"));
//!
//! cache.delete(&key).unwrap();
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
