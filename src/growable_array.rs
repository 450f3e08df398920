use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ops::Range;

use crate::error::Error;
use crate::error::Precondition;
use crate::error::Result;

/// A contiguous, growable buffer with an explicit doubling growth policy.
///
/// Elements live in `[0, len)`; spare capacity is never observable. When the
/// buffer is full, growth reallocates to `max(capacity * 2, required)` and
/// moves every element, so no reference into the array survives a mutating
/// call. The borrow checker enforces this.
///
/// Indexing through `array[i]` panics on an out-of-range index; the checked
/// accessors [`at`](Self::at) and [`at_mut`](Self::at_mut) return
/// [`Error::IndexOutOfRange`] instead.
///
/// # Examples
///
/// ```rust
/// use sparse_hash::GrowableArray;
///
/// let mut array = GrowableArray::new();
/// array.push(1);
/// array.push(3);
/// array.insert(1, 2).unwrap();
/// assert_eq!(array.as_slice(), &[1, 2, 3]);
/// assert_eq!(array.pop(), Ok(3));
/// assert!(array.at(5).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GrowableArray<T> {
    buf: Vec<T>,
}

impl<T: Debug> Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.buf.iter()).finish()
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableArray<T> {
    /// Creates an empty array without allocating.
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an empty array with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Creates an array of `len` elements, each produced by `f`.
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> T) -> Self {
        let mut buf = Vec::with_capacity(len);
        for i in 0..len {
            buf.push(f(i));
        }
        Self { buf }
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the number of elements the array can hold without growing.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Ensures the capacity is at least `capacity` elements in total.
    ///
    /// Does nothing if the array can already hold that many. Allocation
    /// failure aborts the same way [`Vec::reserve`] does; use
    /// [`try_reserve`](Self::try_reserve) to observe it.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.buf.capacity() {
            self.log_growth(self.buf.capacity(), capacity);
            self.buf.reserve_exact(capacity - self.buf.len());
        }
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the allocator cannot provide
    /// the storage. The array is unchanged in that case.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity > self.buf.capacity() {
            let from = self.buf.capacity();
            self.buf.try_reserve_exact(capacity - self.buf.len())?;
            self.log_growth(from, capacity);
        }
        Ok(())
    }

    /// Appends an element, growing by doubling if the array is full.
    pub fn push(&mut self, value: T) {
        self.grow_for(1);
        self.buf.push(value);
    }

    /// Appends the element produced by `f` and returns a reference to it.
    ///
    /// `f` runs after any growth has happened.
    pub fn push_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        self.grow_for(1);
        self.buf.push(f());
        let last = self.buf.len() - 1;
        &mut self.buf[last]
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolation`] if the array is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.buf
            .pop()
            .ok_or(Error::PreconditionViolation(Precondition::PopEmpty))
    }

    /// Inserts `value` at `index`, shifting the tail up by one.
    ///
    /// Returns the index of the inserted element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize> {
        self.check_insert_position(index)?;
        self.grow_for(1);
        self.buf.insert(index, value);
        Ok(index)
    }

    /// Inserts every element of `iter` starting at `index`, preserving their
    /// order.
    ///
    /// Returns the index of the first inserted element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        self.check_insert_position(index)?;
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);
        self.buf.splice(index..index, iter);
        Ok(index)
    }

    /// Removes and returns the element at `index`, shifting the tail down.
    ///
    /// Capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.buf.remove(index))
    }

    /// Removes the elements in `range`, shifting the tail down to close the
    /// gap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if the range is reversed or extends
    /// past `len`.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<()> {
        self.check_range(&range)?;
        self.buf.drain(range);
        Ok(())
    }

    /// Removes the element at `index` by moving the last element into its
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.buf.swap_remove(index))
    }

    /// Bounds-checked shared access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.buf
            .get(index)
            .ok_or(Error::out_of_range(index, self.buf.len()))
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.buf.len();
        self.buf
            .get_mut(index)
            .ok_or(Error::out_of_range(index, len))
    }

    /// Drops every element and keeps the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Shortens the array to `len` elements, dropping the rest.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Resizes to `len`, filling new slots with values produced by `f`.
    pub fn resize_with(&mut self, len: usize, f: impl FnMut() -> T) {
        if len > self.buf.len() {
            self.grow_for(len - self.buf.len());
        }
        self.buf.resize_with(len, f);
    }

    /// Returns the live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    /// Returns the live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    /// Removes every element, yielding them in order.
    pub fn drain(&mut self) -> alloc::vec::Drain<'_, T> {
        self.buf.drain(..)
    }

    /// Makes room for `additional` more elements using the doubling policy.
    fn grow_for(&mut self, additional: usize) {
        let required = self.buf.len().saturating_add(additional);
        if required > self.buf.capacity() {
            let target = self.buf.capacity().saturating_mul(2).max(required);
            self.log_growth(self.buf.capacity(), target);
            self.buf.reserve_exact(target - self.buf.len());
        }
    }

    fn log_growth(&self, from: usize, target: usize) {
        log::trace!(
            "growable array: capacity {} -> {} ({} live, {} bytes each)",
            from,
            target,
            self.buf.len(),
            core::mem::size_of::<T>()
        );
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.buf.len() {
            Ok(())
        } else {
            Err(Error::out_of_range(index, self.buf.len()))
        }
    }

    fn check_insert_position(&self, index: usize) -> Result<()> {
        if index <= self.buf.len() {
            Ok(())
        } else {
            Err(Error::out_of_range(index, self.buf.len()))
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end {
            return Err(Error::out_of_range(range.start, self.buf.len()));
        }
        if range.end > self.buf.len() {
            return Err(Error::out_of_range(range.end, self.buf.len()));
        }
        Ok(())
    }
}

impl<T: Clone> GrowableArray<T> {
    /// Creates an array holding `len` clones of `value`.
    pub fn from_elem(len: usize, value: T) -> Self {
        let mut array = Self::with_capacity(len);
        array.buf.resize(len, value);
        array
    }

    /// Inserts `count` clones of `value` at `index`.
    ///
    /// Returns the index of the first inserted element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> Result<usize> {
        self.check_insert_position(index)?;
        self.grow_for(count);
        self.buf
            .splice(index..index, core::iter::repeat_n(value, count));
        Ok(index)
    }

    /// Resizes to `len`, cloning `value` into any new slots.
    pub fn resize_with_value(&mut self, len: usize, value: T) {
        if len > self.buf.len() {
            self.grow_for(len - self.buf.len());
        }
        self.buf.resize(len, value);
    }
}

impl<T: Default> GrowableArray<T> {
    /// Resizes to `len`, default-constructing any new slots.
    pub fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

impl<T> Deref for GrowableArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T> DerefMut for GrowableArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T> From<Vec<T>> for GrowableArray<T> {
    fn from(buf: Vec<T>) -> Self {
        Self { buf }
    }
}

impl<T> From<GrowableArray<T>> for Vec<T> {
    fn from(array: GrowableArray<T>) -> Self {
        array.buf
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type IntoIter = alloc::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type IntoIter = core::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableArray<T> {
    type IntoIter = core::slice::IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter_mut()
    }
}
