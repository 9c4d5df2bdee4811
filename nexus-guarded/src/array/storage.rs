//! Contiguous buffer with a logical capacity and explicit growth policy.
//!
//! The buffer reports its own capacity rather than `Vec::capacity`, so the
//! growth and shrink policy is observable and deterministic:
//!
//! - **Grow**: an insertion that would exceed capacity grows it to exactly
//!   the needed size ([`Growth::Exact`]) or to `max(2 * capacity, needed)`
//!   ([`Growth::Doubling`]).
//! - **Shrink**: after a removal, if `len < capacity / 2` the capacity drops
//!   to `max(len, 1)`.
//!
//! Capacity never drops below one, so an empty buffer always reports a
//! capacity of exactly one.

use core::cmp::Ordering;

/// Growth policy for [`ArrayList`](crate::ArrayList) storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Growth {
    /// Grow to exactly the number of elements needed.
    #[default]
    Exact,
    /// Grow to at least twice the current capacity.
    Doubling,
}

impl Growth {
    #[inline]
    fn grown(self, capacity: usize, needed: usize) -> usize {
        match self {
            Growth::Exact => needed,
            Growth::Doubling => needed.max(capacity.saturating_mul(2)),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ArrayStorage<T> {
    buf: Vec<T>,
    capacity: usize,
    growth: Growth,
}

impl<T> ArrayStorage<T> {
    pub(crate) fn new(growth: Growth) -> Self {
        Self {
            buf: Vec::with_capacity(1),
            capacity: 1,
            growth,
        }
    }

    pub(crate) fn from_vec(buf: Vec<T>, growth: Growth) -> Self {
        let capacity = buf.len().max(1);
        Self {
            buf,
            capacity,
            growth,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn growth(&self) -> Growth {
        self.growth
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.buf
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    /// Ensures room for `additional` more elements.
    fn reserve(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        if needed <= self.capacity {
            return;
        }

        let grown = self.growth.grown(self.capacity, needed);
        self.buf.reserve_exact(grown - self.buf.len());
        tracing::trace!(from = self.capacity, to = grown, len = self.buf.len(), "grew array storage");
        self.capacity = grown;
    }

    /// Applies the shrink policy after a removal.
    fn shrink(&mut self) {
        let len = self.buf.len();
        if len < self.capacity / 2 {
            let shrunk = len.max(1);
            self.buf.shrink_to(shrunk);
            tracing::trace!(from = self.capacity, to = shrunk, len, "shrank array storage");
            self.capacity = shrunk;
        }
    }

    pub(crate) fn insert(&mut self, index: usize, value: T) {
        self.reserve(1);
        self.buf.insert(index, value);
    }

    pub(crate) fn insert_many(&mut self, index: usize, values: Vec<T>) {
        if values.is_empty() {
            return;
        }
        self.reserve(values.len());
        self.buf.splice(index..index, values);
    }

    pub(crate) fn remove(&mut self, index: usize) -> T {
        let value = self.buf.remove(index);
        self.shrink();
        value
    }

    /// Removes `count` elements starting at `index`.
    pub(crate) fn remove_run(&mut self, index: usize, count: usize) -> Vec<T> {
        let removed: Vec<T> = self.buf.drain(index..index + count).collect();
        if !removed.is_empty() {
            self.shrink();
        }
        removed
    }

    #[inline]
    pub(crate) fn replace(&mut self, index: usize, value: T) -> T {
        core::mem::replace(&mut self.buf[index], value)
    }

    #[inline]
    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        self.buf.swap(i, j);
    }

    pub(crate) fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.buf.sort_by(compare);
    }

    /// Replaces the whole buffer, returning the previous elements.
    ///
    /// Capacity is reset to fit the new contents exactly.
    pub(crate) fn reset(&mut self, buf: Vec<T>) -> Vec<T> {
        self.capacity = buf.len().max(1);
        core::mem::replace(&mut self.buf, buf)
    }

    /// Empties the buffer, returning the previous elements.
    pub(crate) fn clear(&mut self) -> Vec<T> {
        self.reset(Vec::with_capacity(1))
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.buf
    }

    pub(crate) fn is_consistent(&self) -> bool {
        let len = self.buf.len();
        self.capacity >= 1 && len <= self.capacity && (len != 0 || self.capacity == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_capacity_one() {
        let s: ArrayStorage<u32> = ArrayStorage::new(Growth::Exact);
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 1);
        assert!(s.is_consistent());
    }

    #[test]
    fn exact_growth_is_element_at_a_time() {
        let mut s = ArrayStorage::new(Growth::Exact);
        for i in 0..5u32 {
            s.insert(s.len(), i);
            assert_eq!(s.capacity(), (i as usize + 1).max(1));
        }
        assert_eq!(s.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn doubling_growth() {
        let mut s = ArrayStorage::new(Growth::Doubling);
        let mut seen = Vec::new();
        for i in 0..5u32 {
            s.insert(s.len(), i);
            seen.push(s.capacity());
        }
        assert_eq!(seen, vec![1, 2, 4, 4, 8]);
    }

    #[test]
    fn bulk_insert_grows_to_fit() {
        let mut s = ArrayStorage::from_vec(vec![1u32, 2], Growth::Exact);
        s.insert_many(1, vec![7, 8, 9]);
        assert_eq!(s.as_slice(), &[1, 7, 8, 9, 2]);
        assert_eq!(s.capacity(), 5);
    }

    #[test]
    fn shrink_when_below_half() {
        let mut s = ArrayStorage::from_vec((0..8u32).collect(), Growth::Exact);
        assert_eq!(s.capacity(), 8);

        // 7, 6, 5, 4 are not below 8 / 2.
        for _ in 0..4 {
            s.remove(0);
            assert_eq!(s.capacity(), 8);
        }

        s.remove(0);
        assert_eq!(s.len(), 3);
        assert_eq!(s.capacity(), 3);
    }

    #[test]
    fn empty_after_removal_has_capacity_one() {
        let mut s = ArrayStorage::from_vec(vec![1u32, 2], Growth::Exact);
        s.remove(0);
        s.remove(0);
        assert_eq!(s.capacity(), 1);
        assert!(s.is_consistent());
    }

    #[test]
    fn remove_run_and_clear() {
        let mut s = ArrayStorage::from_vec((0..6u32).collect(), Growth::Exact);
        assert_eq!(s.remove_run(1, 4), vec![1, 2, 3, 4]);
        assert_eq!(s.as_slice(), &[0, 5]);
        assert_eq!(s.capacity(), 2);

        assert_eq!(s.clear(), vec![0, 5]);
        assert_eq!(s.capacity(), 1);
    }
}
