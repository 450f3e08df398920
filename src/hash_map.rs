use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Range;

use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::policy::DefaultEq;
use crate::policy::DefaultHashBuilder;
use crate::policy::KeyEq;

fn make_hasher<K: Hash, V, S: BuildHasher>(hash_builder: &S) -> impl Fn(&(K, V)) -> u64 {
    move |(k, _): &(K, V)| hash_builder.hash_one(k)
}

/// A hash map storing its entries densely, indexed by chained buckets.
///
/// `HashMap<K, V, S, E>` keeps every `(K, V)` pair in one contiguous array
/// and uses a separate bucket index of array positions for lookup. Keys are
/// hashed with the builder `S` and compared with the [`KeyEq`] policy `E`.
///
/// Iteration walks the dense array: entries come out in insertion order until
/// an erase moves the last entry into the erased slot. Lookups that return a
/// position (`usize`) hand out indices into that order, valid until the next
/// mutation.
///
/// # Performance Characteristics
///
/// - **Memory**: the `(K, V)` pairs, plus one chain node (a position and a
///   link) per entry and one head link per bucket.
/// - **Erase**: constant time apart from the two chain walks; no tombstones.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder, E = DefaultEq> {
    table: HashTable<(K, V)>,
    hash_builder: S,
    key_eq: E,
}

impl<K, V, S, E> Debug for HashMap<K, V, S, E>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V, DefaultHashBuilder, DefaultEq> {
    /// Creates an empty map with the default hasher and two buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.bucket_count(), 2);
    /// ```
    pub fn new() -> Self {
        Self::with_buckets(0)
    }

    /// Creates an empty map with at least `bucket_hint` buckets, rounded up
    /// to a prime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::with_buckets(20);
    /// assert_eq!(map.bucket_count(), 23);
    /// ```
    pub fn with_buckets(bucket_hint: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_hint, DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashMap<K, V, S, DefaultEq> {
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use sparse_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_buckets_and_hasher(0, hash_builder)
    }

    /// Creates an empty map with the given bucket hint and hasher builder.
    pub fn with_buckets_and_hasher(bucket_hint: usize, hash_builder: S) -> Self {
        Self::with_policies(bucket_hint, hash_builder, DefaultEq)
    }
}

impl<K, V, S, E> HashMap<K, V, S, E> {
    /// Creates an empty map with explicit hashing and equality policies.
    pub fn with_policies(bucket_hint: usize, hash_builder: S, key_eq: E) -> Self {
        Self::with_config(
            TableConfig::new().with_bucket_hint(bucket_hint),
            hash_builder,
            key_eq,
        )
    }

    /// Creates an empty map from a [`TableConfig`] and explicit policies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// # use sparse_hash::TableConfig;
    /// # use sparse_hash::policy::DefaultEq;
    /// # use sparse_hash::policy::DefaultHashBuilder;
    /// #
    /// let config = TableConfig::new()
    ///     .with_bucket_hint(8)
    ///     .with_max_load_factor(0.5)?;
    /// let map: HashMap<u32, u32> =
    ///     HashMap::with_config(config, DefaultHashBuilder::default(), DefaultEq);
    /// assert_eq!(map.bucket_count(), 11);
    /// assert_eq!(map.max_load_factor(), 0.5);
    /// # Ok::<(), sparse_hash::Error>(())
    /// ```
    pub fn with_config(config: TableConfig, hash_builder: S, key_eq: E) -> Self {
        Self {
            table: HashTable::with_config(config),
            hash_builder,
            key_eq,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the dense array holds without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets in the index.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the average number of entries per bucket.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load factor at which an insertion triggers a rehash.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns a reference to the map's key equality policy.
    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    /// Removes all entries, keeping the bucket count and capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns the entry at a dense position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// let (pos, _) = map.insert("x", 10);
    /// assert_eq!(map.get_index(pos), Some((&"x", &10)));
    /// assert_eq!(map.get_index(pos + 1), None);
    /// ```
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.table.get_index(index).map(|(k, v)| (k, v))
    }

    /// Returns the entry at a dense position with a mutable value.
    pub fn get_index_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        self.table.get_index_mut(index).map(|(k, v)| (&*k, v))
    }

    /// An iterator visiting all key-value pairs in dense order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, [(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// An iterator visiting all keys in dense order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in dense order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// An iterator visiting all values mutably in dense order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// for v in map.values_mut() {
    ///     *v *= 10;
    /// }
    /// assert_eq!(map.at(&"b"), Ok(&20));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// The bucket count and capacity are kept.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns bucket-chain statistics.
    #[cfg(feature = "stats")]
    pub fn chain_stats(&self) -> crate::hash_table::ChainStats {
        self.table.chain_stats()
    }
}

impl<K, V, S, E> HashMap<K, V, S, E>
where
    K: Hash,
    S: BuildHasher,
    E: KeyEq<K>,
{
    /// Returns the dense position of `key`, or `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert('a', 1);
    /// map.insert('b', 2);
    /// assert_eq!(map.find(&'b'), Some(1));
    /// assert_eq!(map.find(&'z'), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<usize> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_index(hash, |(k, _)| self.key_eq.eq(k, key))
    }

    /// Inserts a key-value pair if `key` is absent.
    ///
    /// Returns the dense position of the entry for `key` and whether the
    /// pair was inserted. An existing entry is left untouched; use
    /// [`insert_or_assign`](Self::insert_or_assign) to overwrite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), (0, true));
    /// assert_eq!(map.insert(37, "b"), (0, false));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (usize, bool) {
        self.insert_with(key, || value)
    }

    /// Inserts every pair from `iter` with [`insert`](Self::insert)
    /// semantics: the first pair for a key wins and later ones are dropped.
    ///
    /// Space is reserved from the iterator's lower size bound up front.
    /// Unlike [`Extend`], existing values are never overwritten.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert_iter([(1, "a"), (2, "b"), (1, "c")]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn insert_iter<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }

    /// Like [`insert`](Self::insert), but builds the value only if `key` is
    /// absent.
    pub fn insert_with(&mut self, key: K, value: impl FnOnce() -> V) -> (usize, bool) {
        let hash = self.hash_builder.hash_one(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.eq(k, &key)) {
            TableEntry::Occupied(entry) => (entry.index(), false),
            TableEntry::Vacant(entry) => {
                let hasher = make_hasher::<K, V, S>(&self.hash_builder);
                let index = entry.insert_index((key, value()), hasher);
                (index, true)
            }
        }
    }

    /// Inserts a key-value pair, assigning `value` over the existing value if
    /// `key` is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert_or_assign("k", 1), (0, true));
    /// assert_eq!(map.insert_or_assign("k", 2), (0, false));
    /// assert_eq!(map.get(&"k"), Some(&2));
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (usize, bool) {
        let hash = self.hash_builder.hash_one(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.eq(k, &key)) {
            TableEntry::Occupied(mut entry) => {
                entry.get_mut().1 = value;
                (entry.index(), false)
            }
            TableEntry::Vacant(entry) => {
                let hasher = make_hasher::<K, V, S>(&self.hash_builder);
                let index = entry.insert_index((key, value), hasher);
                (index, true)
            }
        }
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key
    /// is absent.
    ///
    /// Unlike [`at`](Self::at), a miss is never an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// *map.get_or_insert_default("hits") += 1;
    /// *map.get_or_insert_default("hits") += 1;
    /// assert_eq!(map.at(&"hits"), Ok(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut letters = HashMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    /// assert_eq!(letters.get(&'s'), Some(&2));
    /// assert_eq!(letters.get(&'t'), Some(&3));
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, S> {
        let hash = self.hash_builder.hash_one(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.eq(k, &key)) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry {
                entry,
                hash_builder: &self.hash_builder,
            }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry {
                entry,
                key,
                hash_builder: &self.hash_builder,
            }),
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| self.key_eq.eq(k, key))
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        let key_eq = &self.key_eq;
        self.table
            .find_mut(hash, |(k, _)| key_eq.eq(k, key))
            .map(|(_, v)| v)
    }

    /// Returns the value for `key`, without ever inserting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::Error;
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.at(&"a"), Ok(&1));
    /// assert_eq!(map.at(&"b"), Err(Error::KeyNotFound));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Mutable version of [`at`](Self::at).
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Alias of [`contains_key`](Self::contains_key).
    pub fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    /// Returns the number of entries with `key`: 0 or 1.
    pub fn count(&self, key: &K) -> usize {
        usize::from(self.contains_key(key))
    }

    /// Removes `key`, returning the number of entries removed (0 or 1).
    ///
    /// The last entry in dense order moves into the erased position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// map.insert("c", 3);
    /// assert_eq!(map.erase(&"a"), 1);
    /// assert_eq!(map.erase(&"a"), 0);
    /// assert_eq!(map.get_index(0), Some((&"c", &3)));
    /// ```
    pub fn erase(&mut self, key: &K) -> usize {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        let key_eq = &self.key_eq;
        self.table.remove(
            hash,
            |(k, _)| key_eq.eq(k, key),
            make_hasher::<K, V, S>(&self.hash_builder),
        )
    }

    /// Alias of [`remove_entry`](Self::remove_entry).
    pub fn extract(&mut self, key: &K) -> Option<(K, V)> {
        self.remove_entry(key)
    }

    /// Removes the entry at a dense position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolation`] if `index >= len()`.
    pub fn erase_index(&mut self, index: usize) -> Result<(K, V)> {
        self.table
            .remove_index(index, make_hasher::<K, V, S>(&self.hash_builder))
    }

    /// Removes the entries at the dense positions in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if the range does not lie within
    /// `0..len()`.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<()> {
        self.table
            .remove_range(range, make_hasher::<K, V, S>(&self.hash_builder))
    }

    /// Retains only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table
            .retain(|(k, v)| f(k, v), make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Rebuilds the index with `next_prime(max(bucket_count, 2))` buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sparse_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, 1);
    /// map.rehash(50);
    /// assert_eq!(map.bucket_count(), 53);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn rehash(&mut self, bucket_count: usize) {
        self.table
            .rehash(bucket_count, make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Reserves room for at least `additional` more entries without
    /// reallocating or rehashing.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, make_hasher::<K, V, S>(&self.hash_builder));
    }

    /// Tries to reserve dense capacity for `additional` more entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the allocation fails.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.table.try_reserve(additional)
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> Default for HashMap<K, V, DefaultHashBuilder, DefaultEq> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, E> PartialEq for HashMap<K, V, S, E>
where
    K: Hash,
    V: PartialEq,
    S: BuildHasher,
    E: KeyEq<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S, E> Eq for HashMap<K, V, S, E>
where
    K: Hash,
    V: Eq,
    S: BuildHasher,
    E: KeyEq<K>,
{
}

/// Later pairs overwrite earlier values for equal keys, as
/// [`insert_or_assign`](HashMap::insert_or_assign) does. This matches
/// `std::collections::HashMap` and differs from
/// [`insert_iter`](HashMap::insert_iter), which keeps the first value.
impl<K, V, S, E> Extend<(K, V)> for HashMap<K, V, S, E>
where
    K: Hash,
    S: BuildHasher,
    E: KeyEq<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert_or_assign(k, v);
        }
    }
}

impl<K, V, S, E> FromIterator<(K, V)> for HashMap<K, V, S, E>
where
    K: Hash,
    S: BuildHasher + Default,
    E: KeyEq<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_policies(0, S::default(), E::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S, E> IntoIterator for HashMap<K, V, S, E> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S, E> IntoIterator for &'a HashMap<K, V, S, E> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, E> IntoIterator for &'a mut HashMap<K, V, S, E> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V, S> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, S>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, S>),
}

impl<'a, K, V, S> Entry<'a, K, V, S>
where
    K: Hash,
    S: BuildHasher,
{
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

impl<'a, K, V, S> Entry<'a, K, V, S> {
    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V, S> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
    hash_builder: &'a S,
}

impl<'a, K, V, S> VacantEntry<'a, K, V, S> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<'a, K, V, S> VacantEntry<'a, K, V, S>
where
    K: Hash,
    S: BuildHasher,
{
    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self
            .entry
            .insert((self.key, value), make_hasher::<K, V, S>(self.hash_builder))
            .1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V, S> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
    hash_builder: &'a S,
}

impl<'a, K, V, S> OccupiedEntry<'a, K, V, S> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// The dense position of the entry.
    pub fn index(&self) -> usize {
        self.entry.index()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }
}

impl<K, V, S> OccupiedEntry<'_, K, V, S>
where
    K: Hash,
    S: BuildHasher,
{
    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove(make_hasher::<K, V, S>(self.hash_builder))
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: core::slice::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: alloc::vec::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
