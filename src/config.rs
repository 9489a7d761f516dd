use std::time::Duration;

/// Configuration for a cache's background sweeper
///
/// # Example
///
/// ```rust
/// use cacheset::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_clean_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Interval between sweeps of expired elements (default: 60 seconds).
    /// A zero interval disables background sweeping entirely.
    pub clean_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            clean_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval
    ///
    /// This determines how often the background task runs to remove expired
    /// elements. A zero interval disables the background sweeper; expired
    /// elements are then only removed by explicit
    /// [`expire`](crate::Cache::expire) / [`expire_all`](crate::Cache::expire_all)
    /// calls.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cacheset::CacheConfig;
    /// use std::time::Duration;
    ///
    /// // Sweep every 30 seconds
    /// let config = CacheConfig::default()
    ///     .with_clean_interval(Duration::from_secs(30));
    /// ```
    pub fn with_clean_interval(mut self, interval: Duration) -> Self {
        self.clean_interval = interval;
        self
    }
}
