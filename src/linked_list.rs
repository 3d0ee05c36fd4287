//! LinkedList: doubly-linked chain whose nodes live in a generational arena.
//!
//! Links are `slotmap` keys instead of pointers. Unlinking is O(1) and a
//! removed node's slot goes back on the arena's free list; its `NodeRef`
//! carries a stale generation and never resolves again, so a dangling
//! reference is an `Err`, not a use-after-free. Each list also stamps its
//! references with its own id; a reference issued by another list is
//! rejected the same way.

use crate::error::{Error, Result};
use core::fmt;
use core::ops::{Index, IndexMut};
use core::sync::atomic::{AtomicUsize, Ordering};
use slotmap::{DefaultKey, SecondaryMap, SlotMap};

/// Stable reference to a node of one `LinkedList`.
///
/// The "end" position is represented as `None` wherever a `NodeRef` is
/// returned.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeRef {
    list: usize,
    key: DefaultKey,
}

struct Node<T> {
    value: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

pub struct LinkedList<T> {
    id: usize,
    nodes: SlotMap<DefaultKey, Node<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        static LIST_ID: AtomicUsize = AtomicUsize::new(0);

        Self {
            id: LIST_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// O(1): the arena tracks the number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.head.map(|k| self.node_ref(k))
    }

    pub fn tail(&self) -> Option<NodeRef> {
        self.tail.map(|k| self.node_ref(k))
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|k| self.nodes.get(k)).map(|n| &n.value)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        let k = self.head?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|k| self.nodes.get(k)).map(|n| &n.value)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        let k = self.tail?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    pub fn push_back(&mut self, value: T) -> NodeRef {
        let prev = self.tail;
        let k = self.nodes.insert(Node {
            value,
            prev,
            next: None,
        });
        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        self.node_ref(k)
    }

    pub fn push_front(&mut self, value: T) -> NodeRef {
        let next = self.head;
        let k = self.nodes.insert(Node {
            value,
            prev: None,
            next,
        });
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.prev = Some(k),
            None => self.tail = Some(k),
        }
        self.head = Some(k);
        self.node_ref(k)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let k = self.head?;
        self.unlink(k)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let k = self.tail?;
        self.unlink(k)
    }

    /// Unlinks `node` and returns its value. O(1).
    ///
    /// Fails with `StaleNode` when `node` was already removed or was issued
    /// by another list.
    pub fn remove(&mut self, node: NodeRef) -> Result<T> {
        self.key(node)
            .and_then(|k| self.unlink(k))
            .ok_or(Error::StaleNode)
    }

    /// Removes the node at position `index`, counted from the head.
    ///
    /// The node is located by walking the links, so with duplicate values
    /// the element at `index` is removed, not the first equal one.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let len = self.len();
        let node = self
            .node_at(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        self.remove(node)
    }

    /// First node whose value equals `value`, or `None` for "end".
    pub fn find(&self, value: &T) -> Option<NodeRef>
    where
        T: PartialEq,
    {
        self.find_by(|v| v == value)
    }

    pub fn find_by<F>(&self, mut pred: F) -> Option<NodeRef>
    where
        F: FnMut(&T) -> bool,
    {
        self.nodes().find(|(_, v)| pred(v)).map(|(n, _)| n)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    pub fn get(&self, node: NodeRef) -> Option<&T> {
        self.nodes.get(self.key(node)?).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut T> {
        let k = self.key(node)?;
        self.nodes.get_mut(k).map(|n| &mut n.value)
    }

    /// Successor of `node`; `None` at the tail or for a stale reference.
    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        let k = self.nodes.get(self.key(node)?)?.next?;
        Some(self.node_ref(k))
    }

    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        let k = self.nodes.get(self.key(node)?)?.prev?;
        Some(self.node_ref(k))
    }

    /// The `index`-th value from the head. O(n).
    pub fn at(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        let node = self.node_at(index)?;
        self.get_mut(node)
    }

    /// Releases every node. Idempotent.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Moves the chain out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: self.nodes(),
        }
    }

    /// Mutable values, head to tail.
    ///
    /// Nodes are ranked by chain position first, then the arena's own
    /// disjoint `&mut` borrows are placed in that order. O(n) extra space.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let mut rank: SecondaryMap<DefaultKey, usize> =
            SecondaryMap::with_capacity(self.nodes.len());
        for (i, (node, _)) in self.nodes().enumerate() {
            rank.insert(node.key, i);
        }

        let mut ordered: Vec<Option<&mut T>> = Vec::with_capacity(rank.len());
        ordered.resize_with(rank.len(), || None);
        for (k, node) in self.nodes.iter_mut() {
            if let Some(&i) = rank.get(k) {
                ordered[i] = Some(&mut node.value);
            }
        }
        IterMut {
            values: ordered.into_iter().flatten(),
        }
    }

    /// Head-to-tail walk yielding each node's reference with its value.
    pub fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            list: self,
            cur: self.head,
        }
    }

    fn node_ref(&self, key: DefaultKey) -> NodeRef {
        NodeRef { list: self.id, key }
    }

    /// Arena key behind `node`, if this list issued it.
    fn key(&self, node: NodeRef) -> Option<DefaultKey> {
        (node.list == self.id).then_some(node.key)
    }

    fn node_at(&self, index: usize) -> Option<NodeRef> {
        self.nodes().nth(index).map(|(n, _)| n)
    }

    fn unlink(&mut self, k: DefaultKey) -> Option<T> {
        let node = self.nodes.remove(k)?;
        match node.prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node.value)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    /// Node-for-node copy in list order into a fresh arena.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

/// Panics on a stale or foreign reference. Use `get` for a checked access.
impl<T> Index<NodeRef> for LinkedList<T> {
    type Output = T;

    fn index(&self, node: NodeRef) -> &T {
        match self.get(node) {
            Some(v) => v,
            None => panic!("NodeRef does not resolve in this list"),
        }
    }
}

impl<T> IndexMut<NodeRef> for LinkedList<T> {
    fn index_mut(&mut self, node: NodeRef) -> &mut T {
        match self.get_mut(node) {
            Some(v) => v,
            None => panic!("NodeRef does not resolve in this list"),
        }
    }
}

/// Positional access, O(n). Panics when `index >= len()`.
impl<T> Index<usize> for LinkedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Some(v) => v,
            None => panic!("index {index} out of bounds for list of length {}", self.len()),
        }
    }
}

impl<T> IndexMut<usize> for LinkedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.at_mut(index) {
            Some(v) => v,
            None => panic!("index {index} out of bounds for list of length {len}"),
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

/// Iterator over values, head to tail.
pub struct Iter<'a, T> {
    nodes: Nodes<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|(_, v)| v)
    }
}

/// Iterator over `(NodeRef, &T)`, head to tail.
pub struct Nodes<'a, T> {
    list: &'a LinkedList<T>,
    cur: Option<DefaultKey>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = (NodeRef, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = self.list.nodes.get(k)?;
        self.cur = node.next;
        Some((self.list.node_ref(k), &node.value))
    }
}

/// Iterator over mutable values, head to tail.
pub struct IterMut<'a, T> {
    values: core::iter::Flatten<std::vec::IntoIter<Option<&'a mut T>>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// Owning iterator; pops from the front.
pub struct IntoIter<T> {
    list: LinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Clone>(l: &LinkedList<T>) -> Vec<T> {
        l.iter().cloned().collect()
    }

    /// Invariant: walking `next` from head reaches tail, and walking `prev`
    /// from tail reaches head, visiting the same nodes.
    #[test]
    fn links_are_symmetric() {
        let list: LinkedList<i32> = (0..5).collect();
        let mut forward = Vec::new();
        let mut cur = list.head();
        while let Some(n) = cur {
            forward.push(n);
            cur = list.next(n);
        }
        let mut backward = Vec::new();
        let mut cur = list.tail();
        while let Some(n) = cur {
            backward.push(n);
            cur = list.prev(n);
        }
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 5);
    }

    /// Invariant: unlinking head, middle and tail keeps head/tail pointers and
    /// order consistent.
    #[test]
    fn remove_head_middle_tail() {
        let mut list = LinkedList::new();
        let a = list.push_back('a');
        let b = list.push_back('b');
        let c = list.push_back('c');
        let d = list.push_back('d');

        assert_eq!(list.remove(b), Ok('b'));
        assert_eq!(collect(&list), vec!['a', 'c', 'd']);
        assert_eq!(list.remove(a), Ok('a'));
        assert_eq!(list.head(), Some(c));
        assert_eq!(list.remove(d), Ok('d'));
        assert_eq!(list.tail(), Some(c));
        assert_eq!(list.remove(c), Ok('c'));
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    /// Invariant: a removed node's reference is stale forever, even after its
    /// slot is reused.
    #[test]
    fn stale_reference_is_rejected() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        assert_eq!(list.remove(a), Ok(1));
        let b = list.push_back(2);
        assert_ne!(a, b);
        assert_eq!(list.remove(a), Err(Error::StaleNode));
        assert_eq!(list.get(a), None);
        assert_eq!(list.get(b), Some(&2));
    }

    /// Invariant: `remove_at` removes by position, so with duplicate values
    /// the node at the given index goes, not the first equal one.
    #[test]
    fn remove_at_is_positional_with_duplicates() {
        let mut list: LinkedList<i32> = [7, 1, 7, 2].into_iter().collect();
        let first = list.head();
        assert_eq!(list.remove_at(2), Ok(7));
        assert_eq!(collect(&list), vec![7, 1, 2]);
        assert_eq!(list.head(), first);
        assert_eq!(
            list.remove_at(3),
            Err(Error::OutOfBounds { index: 3, len: 3 })
        );
    }

    /// Invariant: push_front/pop_back interplay keeps order.
    #[test]
    fn deque_operations() {
        let mut list = LinkedList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
    }

    /// Invariant: `iter_mut` visits each node once in list order.
    #[test]
    fn iter_mut_in_list_order() {
        let mut list = LinkedList::new();
        list.push_back(1);
        list.push_front(0);
        list.push_back(2);
        for (i, v) in list.iter_mut().enumerate() {
            *v *= 10 + i as i32;
        }
        assert_eq!(collect(&list), vec![0, 11, 24]);
    }

    /// Invariant: references from `iter_mut` are disjoint, so all of them
    /// can be held at once and written through afterwards.
    #[test]
    fn iter_mut_references_outlive_the_walk() {
        let mut list = LinkedList::new();
        for i in 0..6 {
            list.push_back(i);
        }
        list.remove_at(1).expect("in bounds");
        list.push_front(9);
        let refs: Vec<&mut i32> = list.iter_mut().collect();
        assert_eq!(refs.len(), 6);
        for r in refs {
            *r += 1;
        }
        assert_eq!(collect(&list), vec![10, 1, 3, 4, 5, 6]);
    }

    /// Invariant: a reference issued by one list never resolves in another,
    /// even when both lists have a node in the same arena slot.
    #[test]
    fn foreign_reference_is_rejected() {
        let mut a = LinkedList::new();
        let mut b = LinkedList::new();
        let ra = a.push_back("a");
        let rb = b.push_back("b");
        assert_ne!(ra, rb);

        assert_eq!(b.remove(ra), Err(Error::StaleNode));
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(ra), None);
        assert_eq!(b.get_mut(ra), None);
        assert_eq!(b.next(ra), None);
        assert_eq!(b.prev(ra), None);
        let indexed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| b[ra]));
        assert!(indexed.is_err());

        assert_eq!(a.remove(ra), Ok("a"));
        assert_eq!(b.remove(rb), Ok("b"));
    }

    /// Invariant: references into a clone come from the clone only.
    #[test]
    fn clone_issues_its_own_references() {
        let list: LinkedList<u8> = (0..3).collect();
        let copy = list.clone();
        let head = list.head().expect("non-empty");
        assert_eq!(copy.get(head), None);
        assert_eq!(copy.head().map(|n| copy[n]), Some(0));
    }

    /// Invariant: clones are deep and ordered; `take` empties the source.
    #[test]
    fn clone_and_take() {
        let mut list: LinkedList<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let mut copy = list.clone();
        copy.push_back("z".into());
        assert_eq!(collect(&list), vec!["x", "y"]);

        let moved = list.take();
        assert!(list.is_empty());
        assert_eq!(moved.len(), 2);
        assert_eq!(copy.len(), 3);
    }

    /// Invariant: `find` returns `None` (end) on a miss and the first match
    /// otherwise; its successor is reachable.
    #[test]
    fn find_and_navigate() {
        let list: LinkedList<i32> = (0..100).collect();
        assert_eq!(list.find(&-1), None);
        let n = list.find(&10).expect("present");
        let next = list.next(n).expect("has successor");
        assert_eq!(list[next], 11);
        assert_eq!(list[10usize], 10);
        assert_eq!(list.at(100), None);
    }

    /// Invariant: `clear` is idempotent.
    #[test]
    fn clear_twice() {
        let mut list: LinkedList<u8> = (0..3).collect();
        list.clear();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);
    }
}
