use std::hash::BuildHasher;
use std::hash::Hash;
use std::hash::Hasher;

use sparse_hash::Error;
use sparse_hash::GrowableArray;
use sparse_hash::HashMap;
use sparse_hash::HashSet;
use sparse_hash::Precondition;
use sparse_hash::TableConfig;
use sparse_hash::bucket_chain::BucketChain;
use sparse_hash::bucket_chain::NodePool;
use sparse_hash::policy::DefaultEq;
use sparse_hash::policy::FnEq;

#[derive(Clone, Default)]
struct IdentityHashBuilder;

#[derive(Default)]
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    fn write_u32(&mut self, n: u32) {
        self.0 = u64::from(n);
    }
}

impl BuildHasher for IdentityHashBuilder {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}

#[test]
fn set_with_small_hint_grows_and_erases() {
    let mut set = HashSet::with_buckets(2);
    assert_eq!(set.bucket_count(), 2);
    for i in 1..=5 {
        assert!(set.insert(i).1);
    }
    assert_eq!(set.len(), 5);
    assert!(set.bucket_count() > 2);
    assert!(set.load_factor() <= set.max_load_factor());

    assert_eq!(set.erase(&3), 1);
    let mut rest: Vec<_> = set.iter().copied().collect();
    rest.sort();
    assert_eq!(rest, [1, 2, 4, 5]);
}

#[test]
fn map_swap_erase_keeps_other_keys_reachable() {
    let mut map = HashMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);

    assert_eq!(map.erase(&"a"), 1);
    assert_eq!(map.at(&"b"), Ok(&2));
    assert_eq!(map.at(&"c"), Ok(&3));
    assert_eq!(map.at(&"a"), Err(Error::KeyNotFound));
    assert_eq!(map.get_index(0), Some((&"c", &3)));
}

#[test]
fn moved_entry_is_relinked_in_its_own_chain() {
    // Identity hashing over 3 buckets: 0 and 3 share bucket 0, 4 sits alone
    // in bucket 1.
    let mut map = HashMap::with_buckets_and_hasher(3, IdentityHashBuilder);
    for key in [0u32, 3, 4] {
        map.insert(key, key * 10);
    }
    assert_eq!(map.bucket_count(), 3);

    assert_eq!(map.remove(&0), Some(0));
    assert_eq!(map.find(&4), Some(0));
    assert_eq!(map.find(&3), Some(1));
    assert_eq!(map.get(&4), Some(&40));

    assert_eq!(map.remove(&3), Some(30));
    assert_eq!(map.find(&4), Some(0));
    assert_eq!(map.len(), 1);
}

#[test]
fn get_or_insert_default_and_at_differ_on_miss() {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in "the quick the lazy the end".split_whitespace() {
        *counts.get_or_insert_default(word.to_string()) += 1;
    }
    assert_eq!(counts.at(&"the".to_string()), Ok(&3));
    assert_eq!(counts.at(&"fox".to_string()), Err(Error::KeyNotFound));
    assert_eq!(counts.len(), 4);
    assert_eq!(*counts.get_or_insert_default("fox".to_string()), 0);
    assert_eq!(counts.len(), 5);
}

#[test]
fn invalid_load_factor_is_rejected() {
    for bad in [0.0, -1.0, 1e-30, 0.001, f32::NAN, f32::INFINITY] {
        assert_eq!(
            TableConfig::new().with_max_load_factor(bad),
            Err(Error::PreconditionViolation(Precondition::InvalidLoadFactor))
        );
    }
}

#[test]
fn low_load_factor_rehashes_early() {
    let config = TableConfig::new()
        .with_bucket_hint(2)
        .with_max_load_factor(0.5)
        .unwrap();
    let mut set = HashSet::with_config(config, IdentityHashBuilder, DefaultEq);
    for i in 0u32..100 {
        set.insert(i);
        assert!(set.load_factor() <= 0.5);
    }
    assert!(set.bucket_count() > 200);
}

#[test]
fn smallest_load_factor_spreads_every_value() {
    let config = TableConfig::new()
        .with_max_load_factor(TableConfig::MIN_MAX_LOAD_FACTOR)
        .unwrap();
    let mut set = HashSet::with_config(config, IdentityHashBuilder, DefaultEq);
    for i in 0u32..20 {
        assert!(set.insert(i).1);
    }
    assert!(set.bucket_count() > 2000);
    assert!((0u32..20).all(|i| set.contains(&i)));
}

#[test]
fn erase_index_past_end_is_a_precondition_violation() {
    let mut set: HashSet<u8> = [1, 2].into_iter().collect();
    assert_eq!(
        set.erase_index(2),
        Err(Error::PreconditionViolation(Precondition::EraseEnd))
    );
    assert_eq!(set.len(), 2);
}

#[test]
fn case_insensitive_keys() {
    #[derive(Clone, Default)]
    struct LowercaseHashBuilder;

    impl BuildHasher for LowercaseHashBuilder {
        type Hasher = std::collections::hash_map::DefaultHasher;

        fn build_hasher(&self) -> Self::Hasher {
            Default::default()
        }
    }

    // Equal keys must hash equally, so the hash ignores case too.
    struct Key(String);

    impl Hash for Key {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.0.to_ascii_lowercase().hash(state);
        }
    }

    let eq = FnEq(|a: &Key, b: &Key| a.0.eq_ignore_ascii_case(&b.0));
    let mut map = HashMap::with_policies(0, LowercaseHashBuilder, eq);
    map.insert(Key("Content-Type".into()), "text/plain");
    map.insert_or_assign(Key("content-type".into()), "text/html");
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Key("CONTENT-TYPE".into())), Some(&"text/html"));
    assert_eq!(map.get_index(0).map(|(k, _)| k.0.as_str()), Some("Content-Type"));
}

#[test]
fn growable_array_positional_editing() {
    let mut array: GrowableArray<char> = "helo".chars().collect();
    array.insert(2, 'l').unwrap();
    array.insert_n(0, 2, '*').unwrap();
    array.erase_range(0..2).unwrap();
    assert_eq!(array.iter().collect::<String>(), "hello");
    assert_eq!(array.pop(), Ok('o'));
    assert!(matches!(array.at(10), Err(Error::IndexOutOfRange { index: 10, len: 4 })));

    array.clear();
    assert_eq!(
        array.pop(),
        Err(Error::PreconditionViolation(Precondition::PopEmpty))
    );
}

#[test]
fn bucket_chains_share_a_pool() {
    let mut pool = NodePool::new();
    let mut evens = BucketChain::new();
    let mut odds = BucketChain::new();
    for i in 0..10 {
        if i % 2 == 0 {
            evens.push_front(&mut pool, i);
        } else {
            odds.push_front(&mut pool, i);
        }
    }
    assert_eq!(pool.live_nodes(), 10);
    assert_eq!(evens.iter(&pool).map(|(_, v)| v).collect::<Vec<_>>(), [8, 6, 4, 2, 0]);

    let removed = evens.erase_range_after(&mut pool, evens.before_begin(), None);
    assert_eq!(removed, 5);
    assert!(evens.is_empty());
    assert_eq!(odds.len(&pool), 5);

    odds.clear(&mut pool);
    assert_eq!(pool.live_nodes(), 0);
}
