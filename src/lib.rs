//! chained-hashmap: a separate-chaining hash table built from scratch on
//! two supporting containers that are usable on their own.
//!
//! Internal Design:
//!
//! Summary
//! - Layers, leaf-first:
//!   - DynamicArray<T>: contiguous buffer with explicit capacity; doubles
//!     when a push would overflow it.
//!   - LinkedList<T>: doubly-linked chain stored in a generational arena
//!     (`slotmap`); nodes are addressed by `NodeRef` handles instead of
//!     pointers.
//!   - Hashable: per-key-type digest functions (djb2 for text, golden-ratio
//!     multiplication for 32-bit integers, a BSD-style rotating checksum for
//!     bytes).
//!   - HashTable<K, V>: a `DynamicArray` of `LinkedList<KeyVal<K, V>>`
//!     buckets indexed by `digest % capacity`; owns growth and rehashing.
//!
//! Constraints
//! - Single-threaded: `HashTable` is `!Send`/`!Sync` (no atomics, no locks).
//! - No `unsafe`.
//! - A `NodeRef` resolves only in the list that issued it.
//! - Unique keys: inserting an existing key overwrites its value.
//! - Growth only: capacity doubles when `len / capacity` reaches the load
//!   factor and never shrinks.
//!
//! Rehashing and references
//! - A rehash drains every chain into a flat array, doubles the bucket
//!   array, then re-links each entry under `digest % new_capacity`. Entries
//!   are relocated, never re-created, so uniqueness is preserved.
//! - `get_or_insert` may rehash. It takes `&mut self`, so the borrow checker
//!   rules out holding an earlier value reference across the call.
//!
//! Checked and unchecked access
//! - `get`/`at`/`try_get` return `Option`/`Result`. `Index` impls are the
//!   short form; they panic on a missing position, node or key.
//! - `LinkedList::remove_at` walks to the position; it does not relocate the
//!   node by value, so duplicate values are handled correctly.
//! - `DynamicArray::resize` truncates when shrinking below `len` and returns
//!   how many elements were dropped.
//!
//! Reentrancy
//! - `HashTable` calls user code (`PartialEq`, `Hashable`) while chains are
//!   being scanned or relocated. A debug-only guard panics if that code
//!   re-enters the same table.

pub mod array;
pub mod error;
pub mod hash;
pub mod hash_table;
mod hash_table_proptest;
pub mod linked_list;
mod reentrancy;

// Public surface
pub use array::DynamicArray;
pub use error::{Error, Result};
pub use hash::{Digest, Hashable};
pub use hash_table::{HashTable, KeyVal};
pub use linked_list::{LinkedList, NodeRef};
