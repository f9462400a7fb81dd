use std::borrow::Borrow;
use std::cmp;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::arena::Arena;
use crate::error::SkipListError;
use crate::iter::Iter;
use crate::level::{level_for_max_nodes, GeometricLevelGenerator, LevelGenerator};
use crate::node::{Node, NodeId};
use crate::query::Query;

/// Maximum level used by the `Default` constructor; comfortable for
/// lists up to roughly 2^16 distinct keys.
const DEFAULT_MAX_LEVEL: usize = 16;

/// What a successful [`SkipList::insert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// The value was added under the key.
    Added,
    /// The exact (key, value) pair was already present; the list is
    /// unchanged.
    Unchanged,
}

/// An ordered associative container that may hold several values under
/// one key, implemented as a probabilistic skip list.
///
/// Keys are kept in strictly ascending order along the level-0 chain;
/// upper levels are express lanes over it, so search, insert, and
/// delete all run in expected O(log n) comparisons. Values stored under
/// one key keep their insertion order, and a (key, value) pair occurs
/// at most once.
///
/// The structure is single-writer: mutation takes `&mut self`, and
/// iterators and [`Query`] cursors borrow the list for their whole
/// lifetime, so the borrow checker enforces the serialization the
/// algorithms assume.
pub struct SkipList<K, V> {
    /// Forward links of the head sentinel, one per possible level.
    /// Every search starts here; `head[0]` is the first real node, if
    /// any. The sentinel has no key and is never stored in the arena.
    head: Vec<Option<NodeId>>,

    /// Owns every node reachable from `head`.
    arena: Arena<K, V>,

    /// Highest level any live node currently has; 1 when the list is
    /// empty. Grows when a taller node is inserted and shrinks when the
    /// head stops seeing nodes at the top.
    level: usize,

    /// Number of (key, value) pairs stored.
    length: usize,

    /// When set, a key may be associated with at most one value.
    unique: bool,

    /// Cached copy of `generator.max_level()`, which is also the length
    /// of `head`.
    max_level: usize,

    /// Draws the level for newly created nodes.
    generator: Box<dyn LevelGenerator>,
}

impl<K, V> SkipList<K, V> {
    /// Creates an empty list able to index up to `max_level` levels.
    pub fn new(max_level: usize) -> SkipList<K, V> {
        Self::with_generator(Box::new(GeometricLevelGenerator::new(max_level)), false)
    }

    /// Creates an empty list that rejects a second value under an
    /// existing key with [`SkipListError::KeyNotUnique`].
    pub fn new_unique(max_level: usize) -> SkipList<K, V> {
        Self::with_generator(Box::new(GeometricLevelGenerator::new(max_level)), true)
    }

    /// Sizes the list for an expected bound on distinct keys instead of
    /// an explicit level count.
    pub fn with_max_nodes(max_nodes: usize, unique: bool) -> SkipList<K, V> {
        let max_level = level_for_max_nodes(max_nodes);
        Self::with_generator(Box::new(GeometricLevelGenerator::new(max_level)), unique)
    }

    /// Creates an empty list drawing node levels from `generator`.
    pub fn with_generator(generator: Box<dyn LevelGenerator>, unique: bool) -> SkipList<K, V> {
        let max_level = generator.max_level();
        assert!(max_level >= 1, "a skip list needs at least one level");

        SkipList {
            head: vec![None; max_level],
            arena: Arena::new(),
            level: 1,
            length: 0,
            unique,
            max_level,
            generator,
        }
    }

    /// Returns the number of (key, value) pairs stored.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if there are no pairs stored.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Highest level any live node currently has (1 when empty).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Highest level the list can ever use.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns `true` if the list enforces one value per key.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Removes every pair, keeping the configuration.
    pub fn clear(&mut self) {
        self.arena.clear();
        for link in &mut self.head {
            *link = None;
        }
        self.level = 1;
        self.length = 0;
    }

    /// The first key with all of its values, or `None` if empty.
    pub fn first(&self) -> Option<(&K, &[V])> {
        let node = self.arena.get(self.head[0]?);
        Some((&node.key, &node.values[..]))
    }

    /// Visits every (key, value) pair in ascending key order, values in
    /// insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub(crate) fn first_node(&self) -> Option<NodeId> {
        self.head[0]
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.arena.get(id)
    }

    /// Forward link of a predecessor handle; `None` as a handle means
    /// the head sentinel.
    fn next_of(&self, pred: Option<NodeId>, level: usize) -> Option<NodeId> {
        match pred {
            None => self.head[level],
            Some(id) => self.arena.get(id).next(level),
        }
    }

    fn set_next_of(&mut self, pred: Option<NodeId>, level: usize, target: Option<NodeId>) {
        match pred {
            None => self.head[level] = target,
            Some(id) => self.arena.get_mut(id).set_next(level, target),
        }
    }
}

impl<K: Ord, V> SkipList<K, V> {
    /// Walks the level chains and returns the last node whose key is
    /// strictly less than `key`, or the head sentinel (`None`) when no
    /// such node exists.
    fn find_lower_bound<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current: Option<NodeId> = None;

        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.arena.get(next).key.borrow() < key {
                    current = Some(next);
                } else {
                    break;
                }
            }
        }

        current
    }

    /// Same walk as [`find_lower_bound`], additionally recording, per
    /// level, the last node visited before descending. `updates[i]` is
    /// the candidate predecessor at level `i`; entries above the
    /// current list level stay at the head sentinel.
    ///
    /// [`find_lower_bound`]: SkipList::find_lower_bound
    fn find_lower_bound_with_updates<Q>(&self, key: &Q) -> (Option<NodeId>, Vec<Option<NodeId>>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut updates: Vec<Option<NodeId>> = vec![None; self.max_level];
        let mut current: Option<NodeId> = None;

        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(current, level) {
                if self.arena.get(next).key.borrow() < key {
                    current = Some(next);
                } else {
                    break;
                }
            }
            updates[level] = current;
        }

        (current, updates)
    }

    /// First node whose key is greater than or equal to `key`.
    pub(crate) fn find_ge<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.next_of(self.find_lower_bound(key), 0)
    }

    fn find_equal<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_ge(key)?;
        if self.arena.get(id).key.borrow() == key {
            Some(id)
        } else {
            None
        }
    }

    /// Values stored at the first key greater than or equal to `key`;
    /// empty when every key is smaller.
    pub fn search_ge<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find_ge(key) {
            Some(id) => &self.arena.get(id).values,
            None => &[],
        }
    }

    /// Values stored exactly at `key`, in insertion order; empty when
    /// the key is absent.
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find_equal(key) {
            Some(id) => &self.arena.get(id).values,
            None => &[],
        }
    }

    /// Returns `true` if `key` holds at least one value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_equal(key).is_some()
    }

    /// Cursor over the pairs whose keys fall within the given bounds.
    pub fn query(&self, min: Bound<K>, max: Bound<K>) -> Query<'_, K, V> {
        Query::new(self, min, max)
    }

    /// [`query`] sugar accepting any range expression (`..`, `a..`,
    /// `a..b`, `a..=b`, ...). Bounds are cloned out of the range.
    ///
    /// [`query`]: SkipList::query
    pub fn range<R>(&self, range: R) -> Query<'_, K, V>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        self.query(range.start_bound().cloned(), range.end_bound().cloned())
    }
}

impl<K: Ord, V: PartialEq> SkipList<K, V> {
    /// Adds `value` under `key`.
    ///
    /// Inserting a (key, value) pair that is already present is a no-op
    /// reported as [`Inserted::Unchanged`]. On a unique list, inserting
    /// under a key that already holds a value fails with
    /// [`SkipListError::KeyNotUnique`] carrying the key back, and the
    /// list is untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Inserted, SkipListError<K>> {
        let (lower_bound, updates) = self.find_lower_bound_with_updates(&key);

        if let Some(found) = self.next_of(lower_bound, 0) {
            if self.arena.get(found).key == key {
                if self.unique {
                    return Err(SkipListError::KeyNotUnique(key));
                }

                let node = self.arena.get_mut(found);
                if node.values.contains(&value) {
                    return Ok(Inserted::Unchanged);
                }
                node.values.push(value);
                self.length += 1;
                return Ok(Inserted::Added);
            }
        }

        let level = self.generator.random_level();
        debug_assert!(level >= 1 && level <= self.max_level);
        // Entries of `updates` above the previous level already carry
        // the head sentinel, so raising the list needs no patching.
        self.level = cmp::max(self.level, level);

        let node = self.arena.alloc(Node::new(key, value, level));
        for (h, update) in updates.into_iter().enumerate().take(level) {
            let next = self.next_of(update, h);
            self.arena.get_mut(node).set_next(h, next);
            self.set_next_of(update, h, Some(node));
        }

        self.length += 1;
        Ok(Inserted::Added)
    }

    /// Removes the (key, value) pair, reporting whether it was present.
    ///
    /// Removing the last value under a key unlinks the whole node and,
    /// if that node was the tallest, lowers the list level.
    pub fn delete<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (lower_bound, updates) = self.find_lower_bound_with_updates(key);

        let target = match self.next_of(lower_bound, 0) {
            Some(id) if self.arena.get(id).key.borrow() == key => id,
            _ => return false,
        };

        {
            let node = self.arena.get_mut(target);
            let position = match node.values.iter().position(|stored| stored == value) {
                Some(position) => position,
                None => return false,
            };

            node.values.remove(position);
            if !node.values.is_empty() {
                self.length -= 1;
                return true;
            }
        }

        // Last value gone: unlink the node at every level it occupies.
        let node_level = self.arena.get(target).level();
        for (h, update) in updates.into_iter().enumerate().take(node_level) {
            if self.next_of(update, h) != Some(target) {
                // Within the node's own height every predecessor still
                // points at it; anything else means the chains were
                // corrupted by unsynchronized mutation.
                debug_assert!(false, "predecessor lost the node being unlinked");
                break;
            }
            let next = self.arena.get(target).next(h);
            self.set_next_of(update, h, next);
        }

        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }

        self.arena.release(target);
        self.length -= 1;
        true
    }

    /// Moves `value` from the key held in `key_store` to `new_key`,
    /// updating `key_store` in place. `None` on either side means "not
    /// stored". Equal keys are a no-op.
    ///
    /// On a unique list the new key is checked for a conflict before
    /// the old pair is detached, so a failed replace leaves the pair
    /// exactly where it was.
    pub fn replace(
        &mut self,
        new_key: Option<K>,
        key_store: &mut Option<K>,
        value: V,
    ) -> Result<(), SkipListError<K>>
    where
        K: Clone,
    {
        if new_key == *key_store {
            return Ok(());
        }

        if self.unique {
            if let Some(key) = &new_key {
                if self.contains_key(key) {
                    return Err(SkipListError::KeyNotUnique(key.clone()));
                }
            }
        }

        if let Some(old_key) = key_store.take() {
            self.delete(&old_key, &value);
        }
        *key_store = new_key.clone();
        if let Some(key) = new_key {
            self.insert(key, value)?;
        }

        Ok(())
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> SkipList<K, V> {
        SkipList::new(DEFAULT_MAX_LEVEL)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (printed, (key, value)) in self.iter().enumerate() {
            if printed > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "]")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
