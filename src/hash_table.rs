//! HashTable: separate chaining over a `DynamicArray` of `LinkedList` buckets.
//!
//! An entry for key `k` lives in bucket `k.digest() % capacity()`. After an
//! insertion pushes the load (`len / capacity`) to the configured threshold
//! the whole table is rehashed into twice as many buckets. Operations that
//! can grow the table take `&mut self`, so a value reference handed out
//! earlier can never be observed across a rehash.

use crate::array::{DynamicArray, DEFAULT_CAPACITY};
use crate::error::{Error, Result};
use crate::hash::{Digest, Hashable};
use crate::linked_list::{self, LinkedList, NodeRef};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::ops::{Index, IndexMut};

pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// An owned key/value pair. The key is fixed once the pair is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyVal<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyVal<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KeyVal<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.key, self.value)
    }
}

type Bucket<K, V> = LinkedList<KeyVal<K, V>>;
type Buckets<K, V> = DynamicArray<Bucket<K, V>>;

/// Bucket index plus node within that bucket's chain.
type Location = (usize, NodeRef);

#[derive(Clone)]
pub struct HashTable<K, V> {
    // Invariant: buckets.len() == buckets.capacity() == capacity().
    buckets: Buckets<K, V>,
    len: usize,
    load_factor: f32,
    reentrancy: DebugReentrancy,
}

impl<K, V> HashTable<K, V> {
    /// 16 buckets, load factor 0.75.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of 0 is allowed; buckets are allocated on first insert.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Fails unless `load_factor` is finite and strictly positive.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Result<Self> {
        if !(load_factor.is_finite() && load_factor > 0.0) {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        Ok(Self::build(capacity, load_factor))
    }

    fn build(capacity: usize, load_factor: f32) -> Self {
        Self {
            buckets: empty_buckets(capacity),
            len: 0,
            load_factor,
            reentrancy: DebugReentrancy::new("HashTable"),
        }
    }

    /// Number of entries. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of entries, counted by summing every chain. O(capacity).
    pub fn size(&self) -> usize {
        self.buckets.iter().map(LinkedList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Growth threshold for `load()`.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn load(&self) -> f32 {
        if self.capacity() == 0 {
            return 0.0;
        }
        self.len as f32 / self.capacity() as f32
    }

    /// Drops every entry. Bucket count is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Entries in bucket order, then chain order within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            chain: None,
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.iter_mut().map(|(_, v)| v)
    }
}

impl<K, V> HashTable<K, V>
where
    K: Hashable + Eq,
{
    /// Returns the value for `key`, inserting `V::default()` on a miss.
    ///
    /// A miss may trigger a rehash; the returned reference points at the
    /// entry's post-rehash location.
    pub fn get_or_insert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Like `get_or_insert`, but `default` only runs on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let at = match probe(&mut self.buckets, &key) {
            (b, Some(n)) => (b, n),
            (b, None) => {
                let kv = KeyVal::new(key, default());
                link(&mut self.buckets, &mut self.len, self.load_factor, b, kv)
            }
        };
        &mut self.buckets[at.0][at.1].value
    }

    /// Upsert. Returns the previous value when `key` was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        match probe(&mut self.buckets, &key) {
            (b, Some(n)) => Some(core::mem::replace(&mut self.buckets[b][n].value, value)),
            (b, None) => {
                let kv = KeyVal::new(key, value);
                link(&mut self.buckets, &mut self.len, self.load_factor, b, kv);
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hashable + Eq,
    {
        let _g = self.reentrancy.enter();
        let (b, n) = locate(&self.buckets, key)?;
        self.buckets[b].get(n).map(|kv| &kv.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hashable + Eq,
    {
        let _g = self.reentrancy.enter();
        let (b, n) = locate(&self.buckets, key)?;
        self.buckets[b].get_mut(n).map(|kv| &mut kv.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hashable + Eq,
    {
        let _g = self.reentrancy.enter();
        locate(&self.buckets, key).is_some()
    }

    /// Unlinks the entry for `key` from its chain. Capacity never shrinks.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hashable + Eq,
    {
        let _g = self.reentrancy.enter();
        let (b, n) = locate(&self.buckets, key)?;
        let kv = self.buckets[b].remove(n).ok()?;
        self.len -= 1;
        Some(kv.value)
    }
}

fn slot(digest: Digest, capacity: usize) -> usize {
    (digest % capacity as Digest) as usize
}

fn empty_buckets<K, V>(capacity: usize) -> Buckets<K, V> {
    let mut buckets = DynamicArray::with_capacity(capacity);
    for _ in 0..capacity {
        buckets.push_back(LinkedList::new());
    }
    buckets
}

fn locate<K, V, Q>(buckets: &Buckets<K, V>, key: &Q) -> Option<Location>
where
    K: Borrow<Q>,
    Q: ?Sized + Hashable + Eq,
{
    if buckets.is_empty() {
        return None;
    }
    let b = slot(key.digest(), buckets.len());
    buckets[b]
        .find_by(|kv| kv.key.borrow() == key)
        .map(|n| (b, n))
}

/// Bucket for `key` and the node already holding it, if any. Digests `key`
/// once. A table without buckets gets the default count first.
fn probe<K, V>(buckets: &mut Buckets<K, V>, key: &K) -> (usize, Option<NodeRef>)
where
    K: Hashable + Eq,
{
    if buckets.is_empty() {
        *buckets = empty_buckets(DEFAULT_CAPACITY);
    }
    let b = slot(key.digest(), buckets.len());
    (b, buckets[b].find_by(|kv| kv.key == *key))
}

/// Appends `kv` to bucket `b` and grows the table once the load reaches
/// `load_factor`. Returns where the entry ends up.
fn link<K: Hashable, V>(
    buckets: &mut Buckets<K, V>,
    len: &mut usize,
    load_factor: f32,
    b: usize,
    kv: KeyVal<K, V>,
) -> Location {
    let n = buckets[b].push_back(kv);
    *len += 1;

    let mut at = (b, n);
    if *len as f32 / buckets.len() as f32 >= load_factor {
        if let Some(moved) = rehash(buckets, *len, Some(at)) {
            at = moved;
        }
        debug_assert!(placement_holds(buckets, *len));
    }
    at
}

/// Doubles the bucket count and relocates every entry.
///
/// `len` is the number of entries across all chains. If `track` names an
/// entry, its new location is returned. An empty table is left untouched.
fn rehash<K: Hashable, V>(
    buckets: &mut Buckets<K, V>,
    len: usize,
    track: Option<Location>,
) -> Option<Location> {
    if len == 0 {
        return track;
    }

    // Drain every chain, front to back, into one flat array.
    let mut drained = DynamicArray::with_capacity(len);
    let mut tracked = None;
    for (i, chain) in buckets.iter_mut().enumerate() {
        while let Some(head) = chain.head() {
            if track == Some((i, head)) {
                tracked = Some(drained.len());
            }
            if let Some(kv) = chain.pop_front() {
                drained.push_back(kv);
            }
        }
    }

    let old_capacity = buckets.len();
    let new_capacity = if old_capacity == 0 {
        DEFAULT_CAPACITY
    } else {
        old_capacity * 2
    };
    buckets.clear();
    let discarded = buckets.resize(new_capacity);
    debug_assert_eq!(discarded, 0);
    for _ in 0..new_capacity {
        buckets.push_back(LinkedList::new());
    }

    let mut moved = None;
    for (pos, kv) in drained.into_iter().enumerate() {
        let b = slot(kv.key.digest(), new_capacity);
        let n = buckets[b].push_back(kv);
        if tracked == Some(pos) {
            moved = Some((b, n));
        }
    }
    moved
}

/// Every entry sits in the bucket its digest selects, and the chains hold
/// exactly `len` entries in total.
fn placement_holds<K: Hashable, V>(buckets: &Buckets<K, V>, len: usize) -> bool {
    let capacity = buckets.len();
    let mut total = 0;
    for (i, chain) in buckets.iter().enumerate() {
        total += chain.len();
        if chain.iter().any(|kv| slot(kv.key.digest(), capacity) != i) {
            return false;
        }
    }
    total == len && buckets.capacity() == capacity
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Panics when `key` is absent. Use `get` for a checked lookup.
impl<K: Hashable + Eq, V> Index<K> for HashTable<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &V {
        match self.get(&key) {
            Some(v) => v,
            None => panic!("key not present in HashTable"),
        }
    }
}

/// Upsert through `get_or_insert`: `table[k] = v` inserts or overwrites.
impl<K: Hashable + Eq, V: Default> IndexMut<K> for HashTable<K, V> {
    fn index_mut(&mut self, key: K) -> &mut V {
        self.get_or_insert(key)
    }
}

impl<K: Hashable + Eq, V> FromIterator<(K, V)> for HashTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K: Hashable + Eq, V> Extend<(K, V)> for HashTable<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    chain: Option<linked_list::Iter<'a, KeyVal<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(kv) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&kv.key, &kv.value));
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in bucket order.
pub struct IterMut<'a, K, V> {
    buckets: core::slice::IterMut<'a, Bucket<K, V>>,
    chain: Option<linked_list::IterMut<'a, KeyVal<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(kv) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&kv.key, &mut kv.value));
            }
            self.chain = Some(self.buckets.next()?.iter_mut());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Owning iterator yielding `KeyVal` pairs in bucket order.
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Bucket<K, V>>,
    chain: Option<linked_list::IntoIter<KeyVal<K, V>>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = KeyVal<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(kv) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(kv);
            }
            self.chain = Some(self.buckets.next()?.into_iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> IntoIterator for HashTable<K, V> {
    type Item = KeyVal<K, V>;
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            remaining: self.len,
            buckets: self.buckets.into_iter(),
            chain: None,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashTable<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
