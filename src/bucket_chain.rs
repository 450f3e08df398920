//! Singly-linked chains of dense-array positions, used as hash buckets.
//!
//! Chain nodes are not individually boxed. Every chain of a table allocates
//! its nodes from one [`NodePool`], addressed by [`NodeId`], and erased nodes
//! are threaded onto the pool's free list for reuse. A chain itself is just a
//! head link, so an array of empty chains costs one word per bucket.
//!
//! A chain only supports "insert after" and "erase after" a [`Position`].
//! [`Position::BeforeBegin`] stands for the link in front of the first node,
//! which makes operations at the front of the chain uniform with the rest.

use alloc::vec::Vec;

/// Identifies a node inside a [`NodePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A place in a [`BucketChain`] after which nodes can be inserted or erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// The sentinel in front of the first node.
    BeforeBegin,
    /// A linked node.
    Node(NodeId),
}

#[derive(Clone, Debug)]
struct Node {
    payload: usize,
    next: Option<NodeId>,
}

/// Backing storage shared by a set of [`BucketChain`]s.
///
/// A [`NodeId`] or [`Position`] is only meaningful for the pool (and chain)
/// that produced it. Handing a position to a different chain is a logic error
/// and panics on an out-of-range node id; it never causes undefined
/// behavior.
#[derive(Clone, Debug, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
    free: Option<NodeId>,
    live: usize,
}

impl NodePool {
    /// Creates an empty pool.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: None,
            live: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: None,
            live: 0,
        }
    }

    /// Number of nodes currently linked into some chain.
    pub fn live_nodes(&self) -> usize {
        self.live
    }

    /// Number of node slots allocated, live or free.
    pub fn allocated_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Forgets every node at once.
    ///
    /// Any chain still pointing into this pool must be reset with
    /// [`BucketChain::forget`] or discarded.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.free = None;
        self.live = 0;
    }

    fn alloc(&mut self, payload: usize, next: Option<NodeId>) -> NodeId {
        self.live += 1;
        match self.free {
            Some(id) => {
                let node = &mut self.nodes[id.index()];
                self.free = node.next;
                node.payload = payload;
                node.next = next;
                id
            }
            None => {
                let id = NodeId(
                    u32::try_from(self.nodes.len()).expect("bucket chain node pool exhausted"),
                );
                self.nodes.push(Node { payload, next });
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) -> (usize, Option<NodeId>) {
        let node = &mut self.nodes[id.index()];
        let released = (node.payload, node.next);
        node.next = self.free;
        self.free = Some(id);
        self.live -= 1;
        released
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

/// A singly-linked list of `usize` payloads stored in a [`NodePool`].
///
/// There is no size field; [`len`](Self::len) walks the chain.
///
/// # Examples
///
/// ```rust
/// use sparse_hash::bucket_chain::BucketChain;
/// use sparse_hash::bucket_chain::NodePool;
///
/// let mut pool = NodePool::new();
/// let mut chain = BucketChain::new();
///
/// let first = chain.insert_after(&mut pool, chain.before_begin(), 1);
/// chain.insert_after(&mut pool, first, 3);
/// chain.insert_after(&mut pool, first, 2);
///
/// let payloads: Vec<usize> = chain.iter(&pool).map(|(_, v)| v).collect();
/// assert_eq!(payloads, [1, 2, 3]);
///
/// assert_eq!(chain.erase_after(&mut pool, chain.before_begin()), Some(1));
/// assert_eq!(chain.front(&pool), Some(2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BucketChain {
    head: Option<NodeId>,
}

impl BucketChain {
    /// Creates an empty chain.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// The sentinel position in front of the first node.
    pub const fn before_begin(&self) -> Position {
        Position::BeforeBegin
    }

    /// Returns `true` if the sentinel has no successor.
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Counts the nodes by walking the chain.
    pub fn len(&self, pool: &NodePool) -> usize {
        self.iter(pool).count()
    }

    /// The payload of the first node.
    pub fn front(&self, pool: &NodePool) -> Option<usize> {
        self.head.map(|id| pool.node(id).payload)
    }

    /// The position following `pos`, or `None` at the end of the chain.
    pub fn next(&self, pool: &NodePool, pos: Position) -> Option<Position> {
        self.successor(pool, pos).map(Position::Node)
    }

    /// The payload stored at `pos`; `None` for the sentinel.
    pub fn payload(&self, pool: &NodePool, pos: Position) -> Option<usize> {
        match pos {
            Position::BeforeBegin => None,
            Position::Node(id) => Some(pool.node(id).payload),
        }
    }

    /// Overwrites the payload stored at `pos`.
    ///
    /// Returns `false` (and does nothing) for the sentinel.
    pub fn set_payload(&mut self, pool: &mut NodePool, pos: Position, payload: usize) -> bool {
        match pos {
            Position::BeforeBegin => false,
            Position::Node(id) => {
                pool.node_mut(id).payload = payload;
                true
            }
        }
    }

    /// Links a new node holding `payload` directly after `pos`.
    ///
    /// Returns the position of the new node.
    pub fn insert_after(&mut self, pool: &mut NodePool, pos: Position, payload: usize) -> Position {
        let next = self.successor(pool, pos);
        let id = pool.alloc(payload, next);
        *self.link_mut(pool, pos) = Some(id);
        Position::Node(id)
    }

    /// Links a new node holding `payload` at the front of the chain.
    pub fn push_front(&mut self, pool: &mut NodePool, payload: usize) -> Position {
        self.insert_after(pool, Position::BeforeBegin, payload)
    }

    /// Unlinks the node after `pos` and returns its payload.
    ///
    /// Returns `None` if `pos` is the last position.
    pub fn erase_after(&mut self, pool: &mut NodePool, pos: Position) -> Option<usize> {
        let victim = self.successor(pool, pos)?;
        let (payload, next) = pool.release(victim);
        *self.link_mut(pool, pos) = next;
        Some(payload)
    }

    /// Unlinks every node strictly between `first` and `last`.
    ///
    /// `last == None` removes everything after `first`. Returns the number of
    /// nodes removed. `last` must follow `first` in this chain; if it does
    /// not, the rest of the chain after `first` is removed.
    pub fn erase_range_after(
        &mut self,
        pool: &mut NodePool,
        first: Position,
        last: Option<Position>,
    ) -> usize {
        let mut removed = 0;
        while let Some(next) = self.next(pool, first) {
            if Some(next) == last {
                break;
            }
            self.erase_after(pool, first);
            removed += 1;
        }
        removed
    }

    /// Releases every node back to the pool.
    pub fn clear(&mut self, pool: &mut NodePool) {
        while self.erase_after(pool, Position::BeforeBegin).is_some() {}
    }

    /// Drops the chain's links without touching the pool.
    ///
    /// Only valid right after the pool itself was [`reset`](NodePool::reset).
    pub fn forget(&mut self) {
        self.head = None;
    }

    /// Iterates `(position, payload)` pairs from front to back.
    pub fn iter<'a>(&self, pool: &'a NodePool) -> Iter<'a> {
        Iter {
            pool,
            next: self.head,
        }
    }

    fn successor(&self, pool: &NodePool, pos: Position) -> Option<NodeId> {
        match pos {
            Position::BeforeBegin => self.head,
            Position::Node(id) => pool.node(id).next,
        }
    }

    fn link_mut<'a>(&'a mut self, pool: &'a mut NodePool, pos: Position) -> &'a mut Option<NodeId> {
        match pos {
            Position::BeforeBegin => &mut self.head,
            Position::Node(id) => &mut pool.node_mut(id).next,
        }
    }
}

/// Iterator over the nodes of a [`BucketChain`].
pub struct Iter<'a> {
    pool: &'a NodePool,
    next: Option<NodeId>,
}

impl Iterator for Iter<'_> {
    type Item = (Position, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.pool.node(id);
        self.next = node.next;
        Some((Position::Node(id), node.payload))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn payloads(chain: &BucketChain, pool: &NodePool) -> Vec<usize> {
        chain.iter(pool).map(|(_, v)| v).collect()
    }

    #[test]
    fn new_chain_is_empty() {
        let pool = NodePool::new();
        let chain = BucketChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(&pool), 0);
        assert_eq!(chain.front(&pool), None);
        assert_eq!(chain.next(&pool, chain.before_begin()), None);
        assert_eq!(chain.payload(&pool, chain.before_begin()), None);
    }

    #[test]
    fn push_front_prepends() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        for v in 0..4 {
            chain.push_front(&mut pool, v);
        }
        assert_eq!(payloads(&chain, &pool), vec![3, 2, 1, 0]);
        assert_eq!(chain.len(&pool), 4);
        assert_eq!(pool.live_nodes(), 4);
    }

    #[test]
    fn insert_after_middle_and_tail() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        let a = chain.push_front(&mut pool, 10);
        let c = chain.insert_after(&mut pool, a, 30);
        chain.insert_after(&mut pool, a, 20);
        chain.insert_after(&mut pool, c, 40);
        assert_eq!(payloads(&chain, &pool), vec![10, 20, 30, 40]);
    }

    #[test]
    fn erase_after_front_middle_and_end() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        for v in [4, 3, 2, 1] {
            chain.push_front(&mut pool, v);
        }

        assert_eq!(chain.erase_after(&mut pool, chain.before_begin()), Some(1));
        assert_eq!(payloads(&chain, &pool), vec![2, 3, 4]);

        let second = chain.next(&pool, chain.before_begin()).unwrap();
        assert_eq!(chain.erase_after(&mut pool, second), Some(3));
        assert_eq!(payloads(&chain, &pool), vec![2, 4]);

        let last = chain.iter(&pool).last().unwrap().0;
        assert_eq!(chain.erase_after(&mut pool, last), None);
        assert_eq!(pool.live_nodes(), 2);
    }

    #[test]
    fn erase_range_after_removes_open_interval() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        for v in (0..6).rev() {
            chain.push_front(&mut pool, v);
        }
        let positions: Vec<Position> = chain.iter(&pool).map(|(p, _)| p).collect();

        let removed = chain.erase_range_after(&mut pool, positions[0], Some(positions[4]));
        assert_eq!(removed, 3);
        assert_eq!(payloads(&chain, &pool), vec![0, 4, 5]);

        let removed = chain.erase_range_after(&mut pool, chain.before_begin(), None);
        assert_eq!(removed, 3);
        assert!(chain.is_empty());
        assert_eq!(pool.live_nodes(), 0);
    }

    #[test]
    fn released_nodes_are_reused() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        for v in 0..8 {
            chain.push_front(&mut pool, v);
        }
        chain.clear(&mut pool);
        assert!(chain.is_empty());
        assert_eq!(pool.live_nodes(), 0);
        assert_eq!(pool.allocated_nodes(), 8);

        for v in 0..8 {
            chain.push_front(&mut pool, v);
        }
        assert_eq!(pool.allocated_nodes(), 8);
        assert_eq!(pool.live_nodes(), 8);
    }

    #[test]
    fn chains_share_a_pool() {
        let mut pool = NodePool::new();
        let mut a = BucketChain::new();
        let mut b = BucketChain::new();
        a.push_front(&mut pool, 1);
        b.push_front(&mut pool, 2);
        a.push_front(&mut pool, 3);
        b.erase_after(&mut pool, b.before_begin());
        b.push_front(&mut pool, 4);

        assert_eq!(payloads(&a, &pool), vec![3, 1]);
        assert_eq!(payloads(&b, &pool), vec![4]);
        assert_eq!(pool.allocated_nodes(), 3);
    }

    #[test]
    fn set_payload_overwrites_in_place() {
        let mut pool = NodePool::new();
        let mut chain = BucketChain::new();
        let pos = chain.push_front(&mut pool, 7);
        assert!(chain.set_payload(&mut pool, pos, 9));
        assert!(!chain.set_payload(&mut pool, chain.before_begin(), 1));
        assert_eq!(chain.payload(&pool, pos), Some(9));
    }

    #[test]
    fn reset_and_forget() {
        let mut pool = NodePool::with_capacity(4);
        let mut chain = BucketChain::new();
        chain.push_front(&mut pool, 1);
        pool.reset();
        chain.forget();
        assert!(chain.is_empty());
        assert_eq!(pool.allocated_nodes(), 0);
    }
}
