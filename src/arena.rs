use crate::node::{Node, NodeId};

/// Owner of every node in a list, addressed by [`NodeId`].
///
/// Slots are recycled through a free stack: an id stays valid until the
/// node is released, and predecessor links can never outlive the node
/// they point at because release happens exactly once, after unlinking.
/// A vacant slot reached through a live id means the chains are corrupt,
/// which is a fatal internal error rather than something callers handle.
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Arena<K, V> {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.index()].is_none());
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::new(self.slots.len());
                self.slots.push(Some(node));
                id
            }
        }
    }

    /// Frees the slot and returns the node that occupied it.
    pub fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.index()]
            .take()
            .expect("released a vacant node slot");
        self.free.push(id);
        node
    }

    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.index()].as_ref().expect("stale node id")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.index()].as_mut().expect("stale node id")
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
