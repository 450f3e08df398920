#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bucket_chain;

pub mod config;

pub mod error;

/// A contiguous, growable array with checked positional operations.
pub mod growable_array;

mod hash_index;

/// A hash map over the dense-array hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with configurable hashing and equality.
pub mod hash_map;

/// The policy-free hash table that the map and set wrap.
pub mod hash_table;

/// A hash set over the dense-array hash table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a set interface with configurable hashing and equality.
pub mod hash_set;

pub mod policy;

pub use config::TableConfig;
pub use error::Error;
pub use error::Precondition;
pub use error::Result;
pub use growable_array::GrowableArray;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
#[cfg(feature = "stats")]
pub use hash_table::ChainStats;
pub use hash_table::HashTable;
pub use policy::DefaultEq;
pub use policy::DefaultHashBuilder;
pub use policy::FnEq;
pub use policy::KeyEq;
