use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::CacheConfig;
use crate::set::ExpiringSet;

/// Error type for cache operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache has been closed; no further operations are possible
    #[error("cache is closed")]
    Closed,
}

/// Internal shared state for the cache
struct CacheInner<T> {
    /// The set, behind the lock that linearizes all access.
    /// `None` once the cache has been closed.
    set: RwLock<Option<ExpiringSet<T>>>,
    /// Sender to signal shutdown to the sweeper task
    shutdown_tx: watch::Sender<bool>,
}

/// A thread-safe set of elements with per-element expiration
///
/// Every operation forwards to an internal expiring set after taking the
/// appropriate side of a read-write lock: reads (`contains`, `exists`,
/// `expired`, `len`, `is_empty`, `to_vec`, `copy_set`) share the lock,
/// mutations (`add`, `delete`, `clear`, `expire`, `expire_all`, `close`)
/// take it exclusively. Operations are linearized by the lock; reads never
/// observe a partially-applied mutation.
///
/// Each cache spawns one background sweeper task that wakes on a fixed
/// interval, takes the exclusive lock, and purges expired elements, with no
/// special priority over caller-invoked operations. The sweeper stops when
/// [`close`](Self::close) is called or the last handle is dropped.
///
/// `Cache` is cheap to clone; clones share the same underlying set.
///
/// # Lazy expiry
///
/// [`contains`](Self::contains) is a pure membership check: an element whose
/// expiry has passed but which no sweep has removed yet still reports as
/// contained. This keeps reads to a single hash lookup instead of a time
/// check per call. Use [`expired`](Self::expired) to ask about logical
/// expiry, or [`expire`](Self::expire) / [`expire_all`](Self::expire_all) to
/// purge eagerly.
///
/// # Example
///
/// ```rust,no_run
/// use cacheset::Cache;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), cacheset::CacheError> {
///     // Sweep expired elements every 5 minutes
///     let cache: Cache<String> = Cache::new(Duration::from_secs(300));
///
///     // Remember "foo" for one minute
///     cache.add("foo".to_string(), Duration::from_secs(60))?;
///
///     if cache.contains(&"foo".to_string())? {
///         // ...
///     }
///
///     cache.delete(&"foo".to_string())?;
///
///     // Stop the sweeper and release the set
///     cache.close();
///     Ok(())
/// }
/// ```
pub struct Cache<T> {
    inner: Arc<CacheInner<T>>,
}

impl<T> Clone for Cache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Cache<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// Creates a new cache whose sweeper runs every `clean_interval`
    ///
    /// A zero `clean_interval` disables background sweeping; expired elements
    /// are then only removed by explicit [`expire`](Self::expire) /
    /// [`expire_all`](Self::expire_all) calls.
    ///
    /// # Panics
    ///
    /// Panics if `clean_interval` is non-zero and no Tokio runtime is
    /// available. The cache requires a runtime to spawn its sweeper task.
    pub fn new(clean_interval: Duration) -> Self {
        Self::with_config(CacheConfig::default().with_clean_interval(clean_interval))
    }

    /// Creates a new cache with custom configuration
    ///
    /// # Panics
    ///
    /// Panics if the configured interval is non-zero and no Tokio runtime is
    /// available (see [`new`](Self::new)).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use cacheset::{Cache, CacheConfig};
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let config = CacheConfig::default()
    ///         .with_clean_interval(Duration::from_secs(30));
    ///     let cache: Cache<u64> = Cache::with_config(config);
    /// }
    /// ```
    pub fn with_config(config: CacheConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = Arc::new(CacheInner {
            set: RwLock::new(Some(ExpiringSet::new())),
            shutdown_tx,
        });

        if !config.clean_interval.is_zero() {
            // Verify that a Tokio runtime is available before proceeding.
            // This gives a clear message instead of a cryptic panic from tokio::spawn.
            if tokio::runtime::Handle::try_current().is_err() {
                panic!(
                    "cacheset::Cache requires a Tokio runtime. \
                     Ensure you are calling Cache::new() or Cache::with_config() \
                     from within a #[tokio::main] or #[tokio::test] context, \
                     or from code running on a Tokio runtime."
                );
            }

            // The sweeper holds only a weak reference: the cache handles own
            // the set, the task borrows it on each tick.
            let sweep_inner = Arc::downgrade(&inner);
            tokio::spawn(Self::sweeper_task(
                sweep_inner,
                config.clean_interval,
                shutdown_rx,
            ));
        }

        Self { inner }
    }

    /// Background task that periodically sweeps expired elements
    async fn sweeper_task(
        inner: Weak<CacheInner<T>>,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick - we want to wait for the interval first
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else { break };
                    let removed = {
                        let mut guard = inner.set.write();
                        match guard.as_mut() {
                            Some(set) => set.expire_all(),
                            // Cache was closed between ticks
                            None => break,
                        }
                    };
                    if removed > 0 {
                        tracing::debug!(removed, "swept expired elements");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A closed channel means every handle is gone; either way, stop.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    }

    /// Adds the element with the given time-to-live, resetting the expiry if
    /// it is already present
    ///
    /// A zero `ttl` means the element never expires and stays until
    /// explicitly deleted.
    pub fn add(&self, elem: T, ttl: Duration) -> Result<(), CacheError> {
        let mut guard = self.inner.set.write();
        let set = guard.as_mut().ok_or(CacheError::Closed)?;
        set.add(elem, ttl);
        Ok(())
    }

    /// Returns true if the element is in the cache
    ///
    /// This is a pure membership check and may report `true` for an element
    /// whose expiry has passed but which has not been swept yet (see the
    /// type-level docs on lazy expiry).
    pub fn contains(&self, elem: &T) -> Result<bool, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.contains(elem))
    }

    /// Returns true if the element exists in the cache
    ///
    /// Alias of [`contains`](Self::contains).
    pub fn exists(&self, elem: &T) -> Result<bool, CacheError> {
        self.contains(elem)
    }

    /// Returns true if the element is present and its expiry is in the past
    ///
    /// Absent elements report not-expired; use
    /// [`contains`](Self::contains) to distinguish presence.
    pub fn expired(&self, elem: &T) -> Result<bool, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.expired(elem))
    }

    /// Removes the element if it has expired, otherwise does nothing
    pub fn expire(&self, elem: &T) -> Result<(), CacheError> {
        let mut guard = self.inner.set.write();
        let set = guard.as_mut().ok_or(CacheError::Closed)?;
        set.expire(elem);
        Ok(())
    }

    /// Removes all expired elements, returning how many were removed
    ///
    /// This is also done automatically by the background sweeper.
    pub fn expire_all(&self) -> Result<usize, CacheError> {
        let mut guard = self.inner.set.write();
        let set = guard.as_mut().ok_or(CacheError::Closed)?;
        Ok(set.expire_all())
    }

    /// Removes the element regardless of expiry, reporting whether it was
    /// present
    pub fn delete(&self, elem: &T) -> Result<bool, CacheError> {
        let mut guard = self.inner.set.write();
        let set = guard.as_mut().ok_or(CacheError::Closed)?;
        Ok(set.delete(elem))
    }

    /// Removes all elements
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut guard = self.inner.set.write();
        let set = guard.as_mut().ok_or(CacheError::Closed)?;
        set.clear();
        Ok(())
    }

    /// Returns the number of elements, including expired-but-unswept ones
    pub fn len(&self) -> Result<usize, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.len())
    }

    /// Returns true if the cache holds no elements
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.is_empty())
    }

    /// Returns an unordered snapshot of all elements in the cache
    pub fn to_vec(&self) -> Result<Vec<T>, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.to_vec())
    }

    /// Returns an independent copy of the element → expiry mapping
    ///
    /// Expiry timestamps are nanoseconds since the Unix epoch, with `0`
    /// meaning the element never expires. The returned map is decoupled from
    /// the live set and safe to iterate without holding any lock.
    pub fn copy_set(&self) -> Result<HashMap<T, i64>, CacheError> {
        let guard = self.inner.set.read();
        let set = guard.as_ref().ok_or(CacheError::Closed)?;
        Ok(set.copy())
    }

    /// Stops the sweeper task and releases the underlying set
    ///
    /// After `close`, every data operation fails with
    /// [`CacheError::Closed`]. Closing an already-closed cache is a no-op;
    /// the call never blocks on an exited sweeper. An in-flight sweep is not
    /// interrupted: `close` waits for the exclusive lock like any other
    /// writer.
    pub fn close(&self) {
        // Signal first so the sweeper exits at its current wait rather than
        // taking another tick. Send errors just mean it is already gone.
        let _ = self.inner.shutdown_tx.send(true);
        let _ = self.inner.set.write().take();
    }
}

impl<T> Drop for CacheInner<T> {
    fn drop(&mut self) {
        // Stop the sweeper when the last handle is dropped
        let _ = self.shutdown_tx.send(true);
    }
}
