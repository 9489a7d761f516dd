//! # Cacheset
//!
//! A generic, thread-safe set of elements with per-element expiration,
//! swept by a background task.
//!
//! Intended as a building block for "remember X for N duration" semantics
//! (dedup windows, rate-limit markers) without external storage. Only
//! presence and expiry are tracked; there is no associated payload and no
//! eviction policy beyond time.
//!
//! ## Features
//!
//! - Generic over any equality-comparable element type
//! - Per-element TTL, with zero meaning "never expires"
//! - Read-write locking: concurrent reads, exclusive writes
//! - One background sweeper task per cache, stopped on close or drop
//! - Lazy expiry: membership checks never pay for a time comparison
//!
//! ## Example
//!
//! ```rust,no_run
//! use cacheset::Cache;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cacheset::CacheError> {
//!     // Create a cache that sweeps every 5 minutes
//!     let cache: Cache<String> = Cache::new(Duration::from_secs(300));
//!
//!     // Add an element with a 1 minute expiration time
//!     cache.add("foo".to_string(), Duration::from_secs(60))?;
//!
//!     // Check if an element is in the cache
//!     if cache.contains(&"foo".to_string())? {
//!         // ...
//!     }
//!
//!     // Delete an element from the cache
//!     cache.delete(&"foo".to_string())?;
//!
//!     // Get a copy of the cache's element → expiry mapping
//!     let snapshot = cache.copy_set()?;
//!
//!     // Stop the sweeper and release the set
//!     cache.close();
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod set;

pub use cache::{Cache, CacheError};
pub use config::CacheConfig;
