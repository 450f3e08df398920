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

fn make_hasher<T: Hash, S: BuildHasher>(hash_builder: &S) -> impl Fn(&T) -> u64 {
    move |value: &T| hash_builder.hash_one(value)
}

/// A hash set storing its values densely, indexed by chained buckets.
///
/// `HashSet<T, S, E>` is a [`HashTable<T>`] plus a hasher builder `S` and an
/// equality policy `E`. Iteration is in dense order; erasing a value moves the
/// last value into its position.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder, E = DefaultEq> {
    table: HashTable<T>,
    hash_builder: S,
    key_eq: E,
}

impl<T, S, E> PartialEq for HashSet<T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T, S, E> Eq for HashSet<T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
}

impl<T, S, E> Debug for HashSet<T, S, E>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> HashSet<T, DefaultHashBuilder, DefaultEq> {
    /// Creates an empty set with the default hasher and two buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_buckets(0)
    }

    /// Creates an empty set with at least `bucket_hint` buckets, rounded up
    /// to a prime.
    pub fn with_buckets(bucket_hint: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_hint, DefaultHashBuilder::default())
    }
}

impl<T, S> HashSet<T, S, DefaultEq> {
    /// Creates an empty set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use sparse_hash::HashSet;
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
    /// let mut set = HashSet::with_hasher(SimpleHasher);
    /// set.insert("a");
    /// assert!(set.contains(&"a"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_buckets_and_hasher(0, hash_builder)
    }

    /// Creates an empty set with the given bucket hint and hasher builder.
    pub fn with_buckets_and_hasher(bucket_hint: usize, hash_builder: S) -> Self {
        Self::with_policies(bucket_hint, hash_builder, DefaultEq)
    }
}

impl<T, S, E> HashSet<T, S, E> {
    /// Creates an empty set with explicit hashing and equality policies.
    pub fn with_policies(bucket_hint: usize, hash_builder: S, key_eq: E) -> Self {
        Self::with_config(
            TableConfig::new().with_bucket_hint(bucket_hint),
            hash_builder,
            key_eq,
        )
    }

    /// Creates an empty set from a [`TableConfig`] and explicit policies.
    pub fn with_config(config: TableConfig, hash_builder: S, key_eq: E) -> Self {
        Self {
            table: HashTable::with_config(config),
            hash_builder,
            key_eq,
        }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the dense array holds without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets in the index.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the average number of values per bucket.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load factor at which an insertion triggers a rehash.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns a reference to the set's equality policy.
    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    /// Removes all values, keeping the bucket count and capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns the value at a dense position.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.table.get_index(index)
    }

    /// An iterator visiting all values in dense order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.insert(3);
    /// set.remove(&1);
    ///
    /// let values: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(values, [3, 2]);
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all values as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
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

impl<T, S, E> HashSet<T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    /// Returns the dense position of `value`, or `None` if it is absent.
    pub fn find(&self, value: &T) -> Option<usize> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find_index(hash, |v| self.key_eq.eq(v, value))
    }

    /// Adds a value to the set.
    ///
    /// Returns the dense position of the value and whether it was newly
    /// inserted. An equal value already present is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert(2), (0, true));
    /// assert_eq!(set.insert(2), (0, false));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> (usize, bool) {
        let hash = self.hash_builder.hash_one(&value);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |v| key_eq.eq(v, &value)) {
            TableEntry::Occupied(entry) => (entry.index(), false),
            TableEntry::Vacant(entry) => {
                let hasher = make_hasher::<T, S>(&self.hash_builder);
                (entry.insert_index(value, hasher), true)
            }
        }
    }

    /// Inserts every value from `iter`, keeping the first of any equal
    /// values. Space is reserved from the iterator's lower size bound.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }

    /// Returns the stored value equal to `value`, inserting `value` first if
    /// none is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.get_or_insert(4), &4);
    /// assert_eq!(set.get_or_insert(4), &4);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn get_or_insert(&mut self, value: T) -> &T {
        let hash = self.hash_builder.hash_one(&value);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |v| key_eq.eq(v, &value)) {
            TableEntry::Occupied(entry) => entry.into_mut(),
            TableEntry::Vacant(entry) => {
                entry.insert(value, make_hasher::<T, S>(&self.hash_builder))
            }
        }
    }

    /// Adds a value, replacing and returning an equal value already present.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash_builder.hash_one(&value);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |v| key_eq.eq(v, &value)) {
            TableEntry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value, make_hasher::<T, S>(&self.hash_builder));
                None
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the number of values equal to `value`: 0 or 1.
    pub fn count(&self, value: &T) -> usize {
        usize::from(self.contains(value))
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| self.key_eq.eq(v, value))
    }

    /// Returns the stored value equal to `value`, without ever inserting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no equal value is present.
    pub fn at(&self, value: &T) -> Result<&T> {
        self.get(value).ok_or(Error::KeyNotFound)
    }

    /// Removes `value`, returning the number of values removed (0 or 1).
    pub fn erase(&mut self, value: &T) -> usize {
        usize::from(self.take(value).is_some())
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = ["a".to_string()].into_iter().collect();
    /// assert_eq!(set.take(&"a".to_string()), Some("a".to_string()));
    /// assert_eq!(set.take(&"a".to_string()), None);
    /// # }
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        let key_eq = &self.key_eq;
        self.table.remove(
            hash,
            |v| key_eq.eq(v, value),
            make_hasher::<T, S>(&self.hash_builder),
        )
    }

    /// Alias of [`take`](Self::take).
    pub fn extract(&mut self, value: &T) -> Option<T> {
        self.take(value)
    }

    /// Removes the value at a dense position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolation`] if `index >= len()`.
    pub fn erase_index(&mut self, index: usize) -> Result<T> {
        self.table
            .remove_index(index, make_hasher::<T, S>(&self.hash_builder))
    }

    /// Removes the values at the dense positions in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if the range does not lie within
    /// `0..len()`.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<()> {
        self.table
            .remove_range(range, make_hasher::<T, S>(&self.hash_builder))
    }

    /// Retains only the values for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table
            .retain(|v| f(v), make_hasher::<T, S>(&self.hash_builder));
    }

    /// Rebuilds the index with `next_prime(max(bucket_count, 2))` buckets.
    pub fn rehash(&mut self, bucket_count: usize) {
        self.table
            .rehash(bucket_count, make_hasher::<T, S>(&self.hash_builder));
    }

    /// Reserves room for at least `additional` more values without
    /// reallocating or rehashing.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, make_hasher::<T, S>(&self.hash_builder));
    }

    /// Tries to reserve dense capacity for `additional` more values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the allocation fails.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.table.try_reserve(additional)
    }

    /// Returns `true` if `self` has no values in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// # }
    /// ```
    pub fn is_disjoint(&self, other: &Self) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if every value of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Visits the values of `self`, then the values of `other` not in
    /// `self`.
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T, S, E> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            first: self,
        }
    }

    /// Visits the values in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T, S, E> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Intersection {
            iter: small.iter(),
            other: large,
        }
    }

    /// Visits the values in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Difference<'a, T, S, E> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Visits the values in exactly one of `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use sparse_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3, 4].into_iter().collect();
    /// let mut only_one: Vec<_> = a.symmetric_difference(&b).copied().collect();
    /// only_one.sort();
    /// assert_eq!(only_one, [1, 4]);
    /// # }
    /// ```
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a Self,
    ) -> SymmetricDifference<'a, T, S, E> {
        SymmetricDifference {
            first: self.difference(other),
            second: other.difference(self),
        }
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> Default for HashSet<T, DefaultHashBuilder, DefaultEq> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, E> IntoIterator for HashSet<T, S, E> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S, E> IntoIterator for &'a HashSet<T, S, E> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S, E> FromIterator<T> for HashSet<T, S, E>
where
    T: Hash,
    S: BuildHasher + Default,
    E: KeyEq<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_policies(0, S::default(), E::default());
        set.extend(iter);
        set
    }
}

impl<T, S, E> Extend<T> for HashSet<T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: core::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: alloc::vec::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, T, S, E> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    first: &'a HashSet<T, S, E>,
}

impl<'a, T, S, E> Iterator for Union<'a, T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.first.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, T, S, E> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S, E>,
}

impl<'a, T, S, E> Iterator for Intersection<'a, T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.by_ref().find(|v| other.contains(v))
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, T, S, E> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S, E>,
}

impl<'a, T, S, E> Iterator for Difference<'a, T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.by_ref().find(|v| !other.contains(v))
    }
}

/// An iterator over the symmetric difference of two sets.
pub struct SymmetricDifference<'a, T, S, E> {
    first: Difference<'a, T, S, E>,
    second: Difference<'a, T, S, E>,
}

impl<'a, T, S, E> Iterator for SymmetricDifference<'a, T, S, E>
where
    T: Hash,
    S: BuildHasher,
    E: KeyEq<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.first.next().or_else(|| self.second.next())
    }
}
