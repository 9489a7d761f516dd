use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Expiry timestamp meaning "never expires"
pub(crate) const NEVER_EXPIRES: i64 = 0;

/// TTLs are capped so `now + ttl` stays inside `i64` nanoseconds
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Current wall-clock time as nanoseconds since the Unix epoch.
///
/// A clock set before the epoch degrades to 0, which only delays expiry.
fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

/// An unsynchronized mapping from element to expiry timestamp.
///
/// The timestamp is nanoseconds since the Unix epoch, with [`NEVER_EXPIRES`]
/// meaning the element stays until explicitly deleted. Expiry is checked
/// lazily on read and purged eagerly only by [`expire`](Self::expire) or
/// [`expire_all`](Self::expire_all). No locking happens at this layer; all
/// concurrent access goes through [`Cache`](crate::Cache).
#[derive(Debug)]
pub(crate) struct ExpiringSet<T> {
    entries: HashMap<T, i64>,
}

impl<T: Eq + Hash + Clone> ExpiringSet<T> {
    /// Creates an empty set
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts the element with the given time-to-live, overwriting any
    /// previous expiry.
    ///
    /// A zero `ttl` means the element never expires. Non-zero TTLs are capped
    /// at roughly 100 years so the expiry arithmetic cannot overflow.
    pub(crate) fn add(&mut self, elem: T, ttl: Duration) {
        let expires_at = if ttl.is_zero() {
            NEVER_EXPIRES
        } else {
            now_nanos().saturating_add(ttl.min(MAX_TTL).as_nanos() as i64)
        };
        self.entries.insert(elem, expires_at);
    }

    /// Pure membership check: true while the key is present, even if its
    /// expiry has passed but no sweep has removed it yet.
    pub(crate) fn contains(&self, elem: &T) -> bool {
        self.entries.contains_key(elem)
    }

    /// Returns true iff the element is present, has a real expiry, and that
    /// expiry is strictly in the past. Absent elements are not expired.
    pub(crate) fn expired(&self, elem: &T) -> bool {
        match self.entries.get(elem) {
            Some(&expires_at) => expires_at != NEVER_EXPIRES && expires_at < now_nanos(),
            None => false,
        }
    }

    /// Deletes the element if it has expired, otherwise does nothing
    pub(crate) fn expire(&mut self, elem: &T) {
        if self.expired(elem) {
            self.entries.remove(elem);
        }
    }

    /// Sweeps every expired element, returning how many were removed
    pub(crate) fn expire_all(&mut self) -> usize {
        let now = now_nanos();
        let before = self.entries.len();
        self.entries
            .retain(|_, &mut expires_at| expires_at == NEVER_EXPIRES || expires_at >= now);
        before - self.entries.len()
    }

    /// Unconditionally removes the element, reporting whether it was present
    pub(crate) fn delete(&mut self, elem: &T) -> bool {
        self.entries.remove(elem).is_some()
    }

    /// Removes all elements
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of elements, including expired-but-unswept ones
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unordered snapshot of all present elements
    pub(crate) fn to_vec(&self) -> Vec<T> {
        self.entries.keys().cloned().collect()
    }

    /// Detached copy of the element → expiry mapping
    pub(crate) fn copy(&self) -> HashMap<T, i64> {
        self.entries.clone()
    }

    /// Inserts an element whose expiry is already in the past (for testing)
    #[cfg(test)]
    pub(crate) fn add_expired(&mut self, elem: T) {
        let expires_at = now_nanos() - Duration::from_secs(1).as_nanos() as i64;
        self.entries.insert(elem, expires_at);
    }
}
