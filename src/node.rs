/// Stable handle to a node slot inside a list's arena.
///
/// Ids are how nodes refer to each other: forward chains hold ids, and
/// the unlink step in delete compares ids rather than addresses, so a
/// recycled slot can never be confused with the node that used to live
/// in it mid-operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> NodeId {
        debug_assert!(index <= u32::MAX as usize);
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A key together with every value stored under it, plus one forward
/// link per level the node participates in.
///
/// `values` keeps insertion order and is never empty while the node is
/// linked into a list; removing the last value removes the node itself.
/// The level is fixed when the node is created and equals the length of
/// `forward`.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub key: K,
    pub values: Vec<V>,
    forward: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, level: usize) -> Node<K, V> {
        debug_assert!(level >= 1);
        Node {
            key,
            values: vec![value],
            forward: vec![None; level],
        }
    }

    /// Number of levels this node is linked at.
    pub fn level(&self) -> usize {
        self.forward.len()
    }

    /// The next node at `level`, or `None` at the end of that chain.
    /// Levels above this node's own height read as `None`.
    pub fn next(&self, level: usize) -> Option<NodeId> {
        self.forward.get(level).copied().flatten()
    }

    pub fn set_next(&mut self, level: usize, target: Option<NodeId>) {
        debug_assert!(level < self.forward.len());
        self.forward[level] = target;
    }
}
