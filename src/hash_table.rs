#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Precondition;
use crate::error::Result;
use crate::growable_array::GrowableArray;
use crate::hash_index::HashIndex;
use crate::hash_index::next_prime;

/// Bucket-chain statistics for analysing hash quality.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of live entries.
    pub len: usize,
    /// Number of buckets.
    pub bucket_count: usize,
    /// Number of buckets with an empty chain.
    pub empty_buckets: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Entries per bucket.
    pub load_factor: f32,
    /// `histogram[n]` is the number of buckets whose chain holds `n` entries.
    pub histogram: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Chain Statistics ===");
        println!(
            "Entries: {} in {} buckets ({:.2} load factor)",
            self.len, self.bucket_count, self.load_factor
        );
        println!(
            "Empty buckets: {} ({:.2}%)",
            self.empty_buckets,
            if self.bucket_count == 0 {
                0.0
            } else {
                self.empty_buckets as f64 / self.bucket_count as f64 * 100.0
            }
        );
        println!("Longest chain: {}", self.longest_chain);
        for (len, &count) in self.histogram.iter().enumerate() {
            println!("{len:>3} | {count}");
        }
    }
}

/// A hash table that stores its values in one dense array and indexes them
/// with chained buckets of dense positions.
///
/// `HashTable<V>` is the engine behind [`HashMap`](crate::HashMap) and
/// [`HashSet`](crate::HashSet). Like those it never hashes anything itself:
/// every lookup takes the precomputed `u64` hash and an equality predicate,
/// and every operation that may rebuild the bucket index takes a `hasher`
/// closure that recomputes the hash of a stored value.
///
/// Values are kept in insertion order until an erase moves the last value
/// into the erased slot ("swap and pop"). A dense *position* (`usize`) takes
/// the place of an iterator; it remains meaningful only until the next
/// mutating call.
///
/// After every insertion `len() <= bucket_count() * max_load_factor()`.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use sparse_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_buckets(16);
///
/// match table.entry(hash_id(123), |p: &Person| p.id == 123) {
///     sparse_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(
///             Person {
///                 id: 123,
///                 name: "Alice".to_string(),
///             },
///             |p| hash_id(p.id),
///         );
///     }
///     sparse_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.find_index(hash_id(123), |p| p.id == 123), Some(0));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    dense: GrowableArray<V>,
    index: HashIndex,
    max_load_factor: f32,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("dense", &self.dense)
            .field("bucket_count", &self.index.bucket_count())
            .field("max_load_factor", &self.max_load_factor)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the minimum bucket count.
    pub fn new() -> Self {
        Self::with_config(TableConfig::new())
    }

    /// Creates an empty table whose bucket count is the next prime at or
    /// above `bucket_hint` (at least 2).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_buckets(100);
    /// assert_eq!(table.bucket_count(), 101);
    /// ```
    pub fn with_buckets(bucket_hint: usize) -> Self {
        Self::with_config(TableConfig::new().with_bucket_hint(bucket_hint))
    }

    /// Creates an empty table from a validated configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            dense: GrowableArray::new(),
            index: HashIndex::with_buckets(config.bucket_hint()),
            max_load_factor: config.max_load_factor(),
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the number of values the dense array holds without growing.
    pub fn capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// Returns the number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    /// Returns `len / bucket_count`.
    pub fn load_factor(&self) -> f32 {
        self.dense.len() as f32 / self.index.bucket_count() as f32
    }

    /// Returns the load factor above which an insertion triggers a rehash.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Returns the values in dense order.
    pub fn as_slice(&self) -> &[V] {
        self.dense.as_slice()
    }

    /// Iterates the values in dense order.
    pub fn iter(&self) -> core::slice::Iter<'_, V> {
        self.dense.iter()
    }

    /// Iterates the values mutably in dense order.
    ///
    /// Mutating the part of a value that feeds its hash or equality leaves
    /// the table unable to find it.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, V> {
        self.dense.iter_mut()
    }

    /// Returns the dense position of the value matching `hash` and `eq`.
    ///
    /// `None` plays the part of the past-the-end position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert_unique(7, 7u64, |&v| v);
    /// table.insert_unique(9, 9u64, |&v| v);
    /// assert_eq!(table.find_index(9, |&v| v == 9), Some(1));
    /// assert_eq!(table.find_index(8, |&v| v == 8), None);
    /// ```
    pub fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        let bucket = self.index.bucket_for(hash);
        self.index
            .positions(bucket)
            .find(|&d| eq(&self.dense[d]))
    }

    /// Returns a reference to the value matching `hash` and `eq`.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.find_index(hash, eq).map(|d| &self.dense[d])
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.find_index(hash, eq).map(|d| &mut self.dense[d])
    }

    /// Returns the value at a dense position.
    pub fn get_index(&self, index: usize) -> Option<&V> {
        self.dense.get(index)
    }

    /// Returns the value at a dense position mutably.
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut V> {
        self.dense.get_mut(index)
    }

    /// Looks up the value matching `hash` and `eq` for in-place insertion or
    /// modification.
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_index(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Appends `value` without checking for an equal value already present.
    ///
    /// The value is pushed onto the dense array, its position is linked at
    /// the front of the bucket for `hash`, and the table rehashes if the load
    /// factor reached its maximum. Returns the new value's dense position.
    ///
    /// Inserting a value equal to one already present breaks the one-value-
    /// per-key invariant that the map and set rely on; go through
    /// [`entry`](Self::entry) unless the caller has already checked.
    pub fn insert_unique(&mut self, hash: u64, value: V, hasher: impl Fn(&V) -> u64) -> usize {
        self.dense.push(value);
        let position = self.dense.len() - 1;
        let bucket = self.index.bucket_for(hash);
        self.index.push_front(bucket, position);
        self.grow_if_needed(&hasher);
        position
    }

    /// Removes and returns the value matching `hash` and `eq`.
    ///
    /// The last value of the dense array moves into the freed position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for v in 0u64..4 {
    ///     table.insert_unique(v, v, |&v| v);
    /// }
    /// assert_eq!(table.remove(0, |&v| v == 0, |&v| v), Some(0));
    /// assert_eq!(table.as_slice(), &[3, 1, 2]);
    /// assert_eq!(table.remove(0, |&v| v == 0, |&v| v), None);
    /// ```
    pub fn remove(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        Some(self.remove_at(index, hash, &hasher))
    }

    /// Removes and returns the value at a dense position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolation`] if `index` is the
    /// past-the-end position or beyond.
    pub fn remove_index(&mut self, index: usize, hasher: impl Fn(&V) -> u64) -> Result<V> {
        let Some(value) = self.dense.get(index) else {
            return Err(Error::PreconditionViolation(Precondition::EraseEnd));
        };
        let hash = hasher(value);
        Ok(self.remove_at(index, hash, &hasher))
    }

    /// Removes the values at the dense positions in `range`.
    ///
    /// Values after the range are moved into the vacated positions, so the
    /// dense order of the survivors may change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if the range is reversed or extends
    /// past `len()`.
    pub fn remove_range(&mut self, range: Range<usize>, hasher: impl Fn(&V) -> u64) -> Result<()> {
        if range.start > range.end {
            return Err(Error::out_of_range(range.start, self.dense.len()));
        }
        if range.end > self.dense.len() {
            return Err(Error::out_of_range(range.end, self.dense.len()));
        }
        // Highest first: a value moved into the range always comes from past
        // its end and is never visited again.
        for index in range.rev() {
            let hash = hasher(&self.dense[index]);
            self.remove_at(index, hash, &hasher);
        }
        Ok(())
    }

    /// Keeps only the values for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool, hasher: impl Fn(&V) -> u64) {
        let mut index = 0;
        while index < self.dense.len() {
            if f(&mut self.dense[index]) {
                index += 1;
            } else {
                let hash = hasher(&self.dense[index]);
                self.remove_at(index, hash, &hasher);
            }
        }
    }

    /// Rebuilds the bucket index with `next_prime(max(bucket_count, 2))`
    /// buckets.
    ///
    /// Every value stays findable. The count is taken as given even if it
    /// puts the load factor above its maximum; the next insertion restores
    /// the bound.
    pub fn rehash(&mut self, bucket_count: usize, hasher: impl Fn(&V) -> u64) {
        self.rehash_to(next_prime(bucket_count), &hasher);
    }

    /// Reserves room for `additional` more values in both the dense array and
    /// the bucket index, so that many insertions neither grow nor rehash.
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) {
        let required = self.dense.len().saturating_add(additional);
        self.dense.reserve(required);

        let buckets = self.buckets_for(required);
        if buckets > self.index.bucket_count() {
            self.rehash_to(next_prime(buckets), &hasher);
        }
    }

    /// Fallible version of the dense-array half of
    /// [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the allocator cannot provide
    /// the storage.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.dense
            .try_reserve(self.dense.len().saturating_add(additional))
    }

    /// Removes every value, keeping the bucket count and dense capacity.
    pub fn clear(&mut self) {
        self.index.clear();
        self.dense.clear();
    }

    /// Removes every value, yielding them in dense order.
    pub fn drain(&mut self) -> alloc::vec::Drain<'_, V> {
        self.index.clear();
        self.dense.drain()
    }

    /// Returns bucket-chain statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_stats(&self) -> ChainStats {
        let mut histogram = alloc::vec![0usize; 1];
        let mut empty_buckets = 0;
        let mut longest_chain = 0;
        for len in self.index.chain_lengths() {
            if len >= histogram.len() {
                histogram.resize(len + 1, 0);
            }
            histogram[len] += 1;
            if len == 0 {
                empty_buckets += 1;
            }
            longest_chain = longest_chain.max(len);
        }

        ChainStats {
            len: self.len(),
            bucket_count: self.bucket_count(),
            empty_buckets,
            longest_chain,
            load_factor: self.load_factor(),
            histogram,
        }
    }

    /// Swap-and-pop erase of the value at `index`, whose hash is `hash`.
    fn remove_at(&mut self, index: usize, hash: u64, hasher: &impl Fn(&V) -> u64) -> V {
        let bucket = self.index.bucket_for(hash);
        let unlinked = self.index.unlink(bucket, index);
        debug_assert!(unlinked, "dense position {index} missing from bucket {bucket}");

        // The moved value's chain must be found from its key while it still
        // sits at `last`.
        let last = self.dense.len() - 1;
        if index != last {
            let last_bucket = self.index.bucket_for(hasher(&self.dense[last]));
            let relinked = self.index.relink(last_bucket, last, index);
            debug_assert!(relinked, "dense position {last} missing from bucket {last_bucket}");
        }

        self.dense
            .swap_remove(index)
            .expect("erased position is within the dense array")
    }

    fn grow_if_needed(&mut self, hasher: &impl Fn(&V) -> u64) {
        let len = self.dense.len();
        let bucket_count = self.index.bucket_count();
        if len as f64 >= bucket_count as f64 * f64::from(self.max_load_factor) {
            let target = bucket_count.saturating_mul(2).max(self.buckets_for(len));
            self.rehash_to(next_prime(target), hasher);
        }
    }

    /// Smallest bucket count that keeps `len` values strictly under the
    /// maximum load factor.
    fn buckets_for(&self, len: usize) -> usize {
        ((len as f64 / f64::from(self.max_load_factor)) as usize).saturating_add(1)
    }

    fn rehash_to(&mut self, bucket_count: usize, hasher: &impl Fn(&V) -> u64) {
        log::debug!(
            "rehash: {} -> {} buckets for {} values",
            self.index.bucket_count(),
            bucket_count,
            self.dense.len()
        );
        self.index.resize_and_clear(bucket_count);
        for (position, value) in self.dense.iter().enumerate() {
            let bucket = self.index.bucket_for(hasher(value));
            self.index.push_front(bucket, position);
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self, hasher: impl Fn(&V) -> u64) {
        assert_eq!(self.index.linked_positions(), self.dense.len());
        for (position, value) in self.dense.iter().enumerate() {
            let bucket = self.index.bucket_for(hasher(value));
            assert_eq!(
                self.index.positions(bucket).filter(|&d| d == position).count(),
                1,
                "position {position} not linked exactly once in bucket {bucket}"
            );
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = alloc::vec::IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        self.dense.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = core::slice::Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single position of a [`HashTable`], which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// No value matched.
    Vacant(VacantEntry<'a, V>),
    /// A value matched.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Returns the existing value, or inserts `default` and returns it.
    pub fn or_insert(self, default: V, hasher: impl Fn(&V) -> u64) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default, hasher),
        }
    }

    /// Returns the existing value, or inserts the result of `default`.
    pub fn or_insert_with(
        self,
        default: impl FnOnce() -> V,
        hasher: impl Fn(&V) -> u64,
    ) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default(), hasher),
        }
    }

    /// Applies `f` to an occupied value; returns it if there was one.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// The hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts `value` and returns a mutable reference to it.
    ///
    /// `hasher` is used only if the insertion triggers a rehash.
    pub fn insert(self, value: V, hasher: impl Fn(&V) -> u64) -> &'a mut V {
        let table = self.table;
        let position = table.insert_unique(self.hash, value, hasher);
        &mut table.dense[position]
    }

    /// Inserts `value` and returns its dense position.
    pub fn insert_index(self, value: V, hasher: impl Fn(&V) -> u64) -> usize {
        self.table.insert_unique(self.hash, value, hasher)
    }
}

/// An occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// The dense position of the value.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a reference to the value.
    pub fn get(&self) -> &V {
        &self.table.dense[self.index]
    }

    /// Returns a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.dense[self.index]
    }

    /// Converts the entry into a mutable reference tied to the table.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.dense[self.index]
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self, hasher: impl Fn(&V) -> u64) -> V {
        let hash = hasher(&self.table.dense[self.index]);
        self.table.remove_at(self.index, hash, &hasher)
    }
}
