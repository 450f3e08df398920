//! Hashing and equality policies.
//!
//! A container is parameterized by a [`BuildHasher`](core::hash::BuildHasher)
//! that turns keys into `u64` hashes and a [`KeyEq`] that decides whether two
//! keys are the same. Both are held by value.

use core::fmt::Debug;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder hasher builder for builds without `std` or `foldhash`.
        ///
        /// It cannot be constructed, so containers must be created with an
        /// explicit hasher builder, e.g. through `with_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// Decides whether two keys are equal.
///
/// Must be consistent with the hasher: keys that compare equal must hash
/// equally, otherwise lookups may miss.
pub trait KeyEq<K: ?Sized> {
    /// Returns `true` if `a` and `b` are the same key.
    fn eq(&self, a: &K, b: &K) -> bool;
}

/// Equality through the key's own [`PartialEq`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultEq;

impl<K: PartialEq + ?Sized> KeyEq<K> for DefaultEq {
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Adapts a closure into a [`KeyEq`].
///
/// ```rust
/// use sparse_hash::HashSet;
/// use sparse_hash::policy::DefaultHashBuilder;
/// use sparse_hash::policy::FnEq;
///
/// let eq = FnEq(|a: &u8, b: &u8| a == b);
/// let mut set: HashSet<u8, _, _> = HashSet::with_policies(4, DefaultHashBuilder::default(), eq);
/// assert!(set.insert(1).1);
/// assert!(!set.insert(1).1);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnEq<F>(pub F);

impl<F> Debug for FnEq<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("FnEq").finish_non_exhaustive()
    }
}

impl<K: ?Sized, F> KeyEq<K> for FnEq<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}
