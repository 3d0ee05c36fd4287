//! DynamicArray: contiguous growable buffer with explicit capacity control.
//!
//! Capacity is tracked by the array itself rather than left to the
//! allocator: it doubles exactly when a push would exceed it, and `resize`
//! sets it to an exact value. A zero capacity means no buffer at all.

use crate::error::{Error, Result};
use core::ops::{Index, IndexMut};

/// Capacity used by `new()` and when growing from zero.
pub const DEFAULT_CAPACITY: usize = 16;

pub struct DynamicArray<T> {
    // Invariant: buf.len() <= cap, and buf.capacity() >= cap so pushes
    // below `cap` never reallocate behind our back.
    buf: Vec<T>,
    cap: usize,
}

impl<T> DynamicArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity 0 is legal and allocates nothing.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The live elements, or `None` when no buffer is allocated
    /// (`capacity() == 0`).
    pub fn data(&self) -> Option<&[T]> {
        (self.cap != 0).then_some(self.buf.as_slice())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buf.get_mut(index)
    }

    pub fn try_get(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.buf.get(index).ok_or(Error::OutOfBounds { index, len })
    }

    /// Appends `value`, doubling capacity first if the array is full
    /// (growing from zero goes to `DEFAULT_CAPACITY`). Amortized O(1).
    pub fn push_back(&mut self, value: T) {
        if self.buf.len() == self.cap {
            let next = if self.cap == 0 {
                DEFAULT_CAPACITY
            } else {
                self.cap * 2
            };
            self.reallocate(next);
        }
        self.buf.push(value);
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Drops every live element. Capacity is retained.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Reallocates to exactly `new_cap`.
    ///
    /// This is a truncating resize: live elements at positions
    /// `>= new_cap` are dropped. The number of dropped elements is returned
    /// so callers can detect the loss. `resize(0)` releases the buffer.
    pub fn resize(&mut self, new_cap: usize) -> usize {
        let discarded = self.buf.len().saturating_sub(new_cap);
        self.reallocate(new_cap);
        discarded
    }

    /// Position of the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.buf.iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.buf.iter_mut()
    }

    /// Moves the contents out, leaving `self` empty with zero capacity.
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::with_capacity(0))
    }

    fn reallocate(&mut self, new_cap: usize) {
        let mut next = Vec::with_capacity(new_cap);
        let keep = self.buf.len().min(new_cap);
        next.extend(self.buf.drain(..keep));
        // Anything left past `keep` is dropped with the old buffer.
        self.buf = next;
        self.cap = new_cap;
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut buf = Vec::with_capacity(self.cap);
        buf.extend(self.buf.iter().cloned());
        Self { buf, cap: self.cap }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("capacity", &self.cap)
            .field("elements", &self.buf)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    /// Compares live elements only; capacity is not part of equality.
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

/// Panics when `index >= len()`. Use `get` for a checked access.
impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.buf[index]
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.buf[index]
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = Self::new();
        a.extend(iter);
        a
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push_back(v);
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: pushing exactly `capacity` elements does not grow; the next
    /// push doubles capacity, and `len <= capacity` throughout.
    #[test]
    fn growth_doubles_exactly_on_overflow() {
        let mut a = DynamicArray::new();
        let initial = a.capacity();
        assert_eq!(initial, DEFAULT_CAPACITY);
        for i in 0..initial {
            a.push_back(i);
            assert!(a.len() <= a.capacity());
        }
        assert_eq!(a.capacity(), initial);
        a.push_back(42);
        assert_eq!(a.capacity(), initial * 2);
        assert_eq!(a.len(), initial + 1);
    }

    /// Invariant: zero capacity means no buffer; the first push restores
    /// the default capacity.
    #[test]
    fn zero_capacity_has_no_buffer_until_push() {
        let mut a: DynamicArray<u8> = DynamicArray::with_capacity(0);
        assert!(a.data().is_none());
        a.push_back(1);
        assert_eq!(a.capacity(), DEFAULT_CAPACITY);
        assert_eq!(a.data(), Some(&[1u8][..]));
    }

    /// Invariant: shrinking below `len` drops the tail and reports how many
    /// elements were lost.
    #[test]
    fn truncating_resize_reports_discarded() {
        let mut a: DynamicArray<i32> = (0..10).collect();
        assert_eq!(a.resize(4), 6);
        assert_eq!(a.capacity(), 4);
        assert_eq!(a.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(a.resize(8), 0);
        assert_eq!(a.as_slice(), &[0, 1, 2, 3]);
    }

    /// Invariant: `clear` keeps capacity, so refilling up to it does not grow.
    #[test]
    fn clear_retains_capacity() {
        let mut a: DynamicArray<i32> = (0..20).collect();
        let cap = a.capacity();
        a.clear();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), cap);
        for i in 0..cap as i32 {
            a.push_back(i);
        }
        assert_eq!(a.capacity(), cap);
    }

    /// Invariant: clones copy live elements into the same capacity; `take`
    /// leaves the source empty with no buffer.
    #[test]
    fn clone_and_take() {
        let mut a = DynamicArray::with_capacity(5);
        a.push_back("x".to_string());
        a.push_back("y".to_string());
        let b = a.clone();
        assert_eq!(b.capacity(), 5);
        assert_eq!(b, a);

        let moved = a.take();
        assert_eq!(moved.len(), 2);
        assert_eq!(a.capacity(), 0);
        assert!(a.is_empty());
        assert!(a.data().is_none());
    }

    /// Invariant: checked accessors never panic past `len`, even when the
    /// position is below capacity.
    #[test]
    fn checked_access_past_len() {
        let mut a = DynamicArray::new();
        a.push_back(3);
        assert_eq!(a.get(0), Some(&3));
        assert_eq!(a.get(1), None);
        assert_eq!(a.try_get(5), Err(Error::OutOfBounds { index: 5, len: 1 }));
        assert_eq!(a.find(&3), Some(0));
        assert_eq!(a.find(&4), None);
    }
}
