use crate::bucket_chain::BucketChain;
use crate::bucket_chain::NodePool;
use crate::config::TableConfig;
use crate::growable_array::GrowableArray;

/// Returns the smallest prime that is `>= n`, never less than
/// [`TableConfig::MIN_BUCKETS`].
pub(crate) fn next_prime(n: usize) -> usize {
    smallest_prime_from(n.max(TableConfig::MIN_BUCKETS))
}

fn smallest_prime_from(mut n: usize) -> usize {
    while !is_prime(n) {
        n = match n.checked_add(1) {
            Some(n) => n,
            None => return n,
        };
    }
    n
}

fn is_prime(n: usize) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// The bucket index of a table: one chain of dense positions per bucket.
///
/// Bucket `i` holds every dense position whose entry hashes to
/// `hash % bucket_count == i`. All chains allocate from a single pool.
#[derive(Clone, Debug)]
pub(crate) struct HashIndex {
    chains: GrowableArray<BucketChain>,
    pool: NodePool,
}

impl HashIndex {
    /// Builds an index with `next_prime(bucket_hint)` empty chains.
    pub(crate) fn with_buckets(bucket_hint: usize) -> Self {
        let count = next_prime(bucket_hint);
        Self {
            chains: GrowableArray::from_fn(count, |_| BucketChain::new()),
            pool: NodePool::new(),
        }
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn bucket_for(&self, hash: u64) -> usize {
        (hash % self.chains.len() as u64) as usize
    }

    pub(crate) fn chain_at(&self, bucket: usize) -> &BucketChain {
        &self.chains[bucket]
    }

    /// Iterates the dense positions stored in `bucket`.
    pub(crate) fn positions(&self, bucket: usize) -> impl Iterator<Item = usize> + '_ {
        self.chain_at(bucket).iter(&self.pool).map(|(_, d)| d)
    }

    pub(crate) fn push_front(&mut self, bucket: usize, dense: usize) {
        self.chains[bucket].push_front(&mut self.pool, dense);
    }

    /// Unlinks the node holding `dense` from `bucket`.
    ///
    /// Walks the chain with a trailing position, since chains only erase
    /// after a position. Returns `false` if `dense` is not in the chain.
    pub(crate) fn unlink(&mut self, bucket: usize, dense: usize) -> bool {
        let chain = &mut self.chains[bucket];
        let mut prev = chain.before_begin();
        while let Some(pos) = chain.next(&self.pool, prev) {
            if chain.payload(&self.pool, pos) == Some(dense) {
                chain.erase_after(&mut self.pool, prev);
                return true;
            }
            prev = pos;
        }
        false
    }

    /// Rewrites the node holding `from` in `bucket` to hold `to` instead.
    pub(crate) fn relink(&mut self, bucket: usize, from: usize, to: usize) -> bool {
        let chain = &mut self.chains[bucket];
        let found = chain
            .iter(&self.pool)
            .find(|&(_, d)| d == from)
            .map(|(pos, _)| pos);
        match found {
            Some(pos) => chain.set_payload(&mut self.pool, pos, to),
            None => false,
        }
    }

    /// Replaces every chain with `bucket_count` empty ones.
    pub(crate) fn resize_and_clear(&mut self, bucket_count: usize) {
        self.pool.reset();
        self.chains.clear();
        self.chains.resize_with(bucket_count, BucketChain::new);
    }

    /// Empties every chain and keeps the bucket count.
    pub(crate) fn clear(&mut self) {
        self.pool.reset();
        for chain in self.chains.iter_mut() {
            chain.forget();
        }
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.chains.iter().map(|chain| chain.len(&self.pool))
    }

    #[cfg(test)]
    pub(crate) fn linked_positions(&self) -> usize {
        self.pool.live_nodes()
    }
}
