//! Construction parameters for the hashed containers.

use crate::error::Error;
use crate::error::Precondition;
use crate::error::Result;

/// Configuration for a [`HashTable`](crate::HashTable) and the map and set
/// built on it.
///
/// The bucket hint is rounded up to the next prime (minimum
/// [`TableConfig::MIN_BUCKETS`]) when the table is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    bucket_hint: usize,
    max_load_factor: f32,
}

impl TableConfig {
    /// Smallest bucket count a table ever has.
    pub const MIN_BUCKETS: usize = 2;

    /// Default ratio of entries to buckets that triggers a rehash.
    pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 2.0;

    /// Smallest accepted maximum load factor: at most 100 buckets per entry.
    pub const MIN_MAX_LOAD_FACTOR: f32 = 0.01;

    /// A configuration with the minimum bucket count and the default load
    /// factor.
    pub const fn new() -> Self {
        Self {
            bucket_hint: Self::MIN_BUCKETS,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Sets the initial bucket-count hint.
    pub const fn with_bucket_hint(mut self, bucket_hint: usize) -> Self {
        self.bucket_hint = bucket_hint;
        self
    }

    /// Sets the maximum load factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolation`] if `max_load_factor` is not
    /// finite or is below [`TableConfig::MIN_MAX_LOAD_FACTOR`].
    ///
    /// ```rust
    /// use sparse_hash::TableConfig;
    ///
    /// assert!(TableConfig::new().with_max_load_factor(1.0).is_ok());
    /// assert!(TableConfig::new().with_max_load_factor(0.0).is_err());
    /// assert!(TableConfig::new().with_max_load_factor(f32::NAN).is_err());
    /// assert!(TableConfig::new().with_max_load_factor(1e-30).is_err());
    /// ```
    pub fn with_max_load_factor(mut self, max_load_factor: f32) -> Result<Self> {
        if !max_load_factor.is_finite() || max_load_factor < Self::MIN_MAX_LOAD_FACTOR {
            return Err(Error::PreconditionViolation(
                Precondition::InvalidLoadFactor,
            ));
        }
        self.max_load_factor = max_load_factor;
        Ok(self)
    }

    /// The initial bucket-count hint, before prime rounding.
    pub const fn bucket_hint(&self) -> usize {
        self.bucket_hint
    }

    /// The maximum load factor.
    pub const fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
