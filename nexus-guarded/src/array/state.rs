//! Unlocked array list state: storage plus cursor discipline.
//!
//! Every method here assumes the caller holds the container's mutex. Cursor
//! operations take a registry key so the built-in cursor and auxiliary
//! cursors share one implementation.

use core::cmp::Ordering;

use super::storage::{ArrayStorage, Growth};
use crate::Position;
use crate::contract::{self, Violation};
use crate::registry::{CursorKey, CursorRegistry};

#[derive(Debug)]
pub(crate) struct ArrayState<T> {
    pub(crate) storage: ArrayStorage<T>,
    pub(crate) cursors: CursorRegistry<usize>,
}

impl<T> ArrayState<T> {
    pub(crate) fn new(growth: Growth) -> Self {
        Self {
            storage: ArrayStorage::new(growth),
            cursors: CursorRegistry::new(),
        }
    }

    pub(crate) fn from_vec(values: Vec<T>, growth: Growth) -> Self {
        Self {
            storage: ArrayStorage::from_vec(values, growth),
            cursors: CursorRegistry::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub(crate) fn builtin(&self) -> CursorKey {
        self.cursors.builtin()
    }

    // ========================================================================
    // Preconditions
    // ========================================================================

    #[inline]
    pub(crate) fn require_index(&self, index: usize) {
        let count = self.len();
        contract::require(index < count, || Violation::IndexOutOfBounds { index, count });
    }

    #[inline]
    pub(crate) fn require_insert_index(&self, index: usize) {
        let count = self.len();
        contract::require(index <= count, || Violation::InsertOutOfBounds { index, count });
    }

    #[inline]
    pub(crate) fn require_run(&self, index: usize, count: usize) {
        let len = self.len();
        self.require_insert_index(index);
        contract::require(count <= len - index, || Violation::CountOutOfRange {
            requested: count,
            available: len - index,
        });
    }

    /// Returns the cursor's index, panicking if it is off.
    #[inline]
    pub(crate) fn require_on(&self, key: CursorKey) -> usize {
        let pos = self.cursors.position(key);
        contract::require(pos.is_on(), || Violation::CursorOff);
        pos
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    pub(crate) fn item_at(&self, key: CursorKey) -> Option<&T> {
        self.cursors
            .position(key)
            .on()
            .and_then(|i| self.storage.get(i))
    }

    #[inline]
    pub(crate) fn index(&self, key: CursorKey) -> Option<usize> {
        self.cursors.position(key).on()
    }

    #[inline]
    pub(crate) fn is_first(&self, key: CursorKey) -> bool {
        self.cursors.position(key) == 0
    }

    #[inline]
    pub(crate) fn is_last(&self, key: CursorKey) -> bool {
        let pos = self.cursors.position(key);
        pos.is_on() && pos + 1 == self.len()
    }

    pub(crate) fn start(&mut self, key: CursorKey) {
        let pos = if self.len() == 0 { usize::OFF } else { 0 };
        self.cursors.set(key, pos);
    }

    pub(crate) fn finish(&mut self, key: CursorKey) {
        let pos = self.len().checked_sub(1).unwrap_or(usize::OFF);
        self.cursors.set(key, pos);
    }

    pub(crate) fn forth(&mut self, key: CursorKey) {
        let pos = self.require_on(key);
        let next = if pos + 1 < self.len() { pos + 1 } else { usize::OFF };
        self.cursors.set(key, next);
    }

    pub(crate) fn back(&mut self, key: CursorKey) {
        let pos = self.require_on(key);
        let prev = pos.checked_sub(1).unwrap_or(usize::OFF);
        self.cursors.set(key, prev);
    }

    pub(crate) fn go(&mut self, key: CursorKey, index: usize) {
        self.require_index(index);
        self.cursors.set(key, index);
    }

    /// Moves the cursor to the first match at or after its position.
    ///
    /// An off cursor searches from the start. Ends off if nothing matches.
    pub(crate) fn search_forth(&mut self, key: CursorKey, mut matches: impl FnMut(&T) -> bool) -> bool {
        let from = self.cursors.position(key).on().unwrap_or(0);
        let found = self.storage.as_slice()[from.min(self.len())..]
            .iter()
            .position(|v| matches(v))
            .map(|offset| from + offset);

        self.cursors.set(key, found.unwrap_or(usize::OFF));
        found.is_some()
    }

    /// Moves the cursor to the last match at or before its position.
    ///
    /// An off cursor searches from the end. Ends off if nothing matches.
    pub(crate) fn search_back(&mut self, key: CursorKey, mut matches: impl FnMut(&T) -> bool) -> bool {
        let len = self.len();
        let until = match self.cursors.position(key).on() {
            Some(pos) => pos + 1,
            None => len,
        };
        let found = self.storage.as_slice()[..until.min(len)]
            .iter()
            .rposition(|v| matches(v));

        self.cursors.set(key, found.unwrap_or(usize::OFF));
        found.is_some()
    }

    // ========================================================================
    // Single-element structural changes (cursors corrected one by one)
    // ========================================================================

    /// Inserts at `index`; cursors keep designating the same elements.
    pub(crate) fn insert(&mut self, index: usize, value: T) {
        self.require_insert_index(index);
        self.storage.insert(index, value);
        self.cursors.retarget(|p| if p >= index { p + 1 } else { p });
    }

    pub(crate) fn put_left(&mut self, key: CursorKey, value: T) {
        let pos = self.require_on(key);
        self.insert(pos, value);
    }

    pub(crate) fn put_right(&mut self, key: CursorKey, value: T) {
        let pos = self.require_on(key);
        self.insert(pos + 1, value);
    }

    /// Removes the element at `index`.
    ///
    /// Cursors on it move to its successor (same index), or off when it was
    /// the last element. Cursors past it shift down.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        self.require_index(index);
        let remaining = self.len() - 1;
        self.cursors.retarget(|p| match p.cmp(&index) {
            Ordering::Less => p,
            Ordering::Equal if index < remaining => p,
            Ordering::Equal => usize::OFF,
            Ordering::Greater => p - 1,
        });
        self.storage.remove(index)
    }

    pub(crate) fn remove_first(&mut self) -> T {
        contract::require(self.len() > 0, || Violation::Empty);
        self.remove(0)
    }

    pub(crate) fn remove_last(&mut self) -> T {
        contract::require(self.len() > 0, || Violation::Empty);
        self.remove(self.len() - 1)
    }

    pub(crate) fn remove_at(&mut self, key: CursorKey) -> T {
        let pos = self.require_on(key);
        self.remove(pos)
    }

    pub(crate) fn remove_left(&mut self, key: CursorKey) -> T {
        let pos = self.require_on(key);
        contract::require(pos > 0, || Violation::NoNeighbour);
        self.remove(pos - 1)
    }

    pub(crate) fn remove_right(&mut self, key: CursorKey) -> T {
        let pos = self.require_on(key);
        contract::require(pos + 1 < self.len(), || Violation::NoNeighbour);
        self.remove(pos + 1)
    }

    pub(crate) fn replace(&mut self, index: usize, value: T) -> T {
        self.require_index(index);
        self.storage.replace(index, value)
    }

    pub(crate) fn replace_at(&mut self, key: CursorKey, value: T) -> T {
        let pos = self.require_on(key);
        self.storage.replace(pos, value)
    }

    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        self.require_index(i);
        self.require_index(j);
        self.storage.swap(i, j);
    }

    // ========================================================================
    // Bulk structural changes (all cursors off)
    // ========================================================================

    pub(crate) fn insert_many(&mut self, index: usize, values: Vec<T>) {
        self.require_insert_index(index);
        self.cursors.move_all_off();
        self.storage.insert_many(index, values);
    }

    /// Index where a bulk insertion relative to a cursor lands.
    pub(crate) fn left_of(&self, key: CursorKey) -> usize {
        self.require_on(key)
    }

    pub(crate) fn right_of(&self, key: CursorKey) -> usize {
        self.require_on(key) + 1
    }

    pub(crate) fn prune(&mut self, index: usize, count: usize) -> Vec<T> {
        self.require_run(index, count);
        self.cursors.move_all_off();
        self.storage.remove_run(index, count)
    }

    pub(crate) fn prune_first(&mut self, count: usize) -> Vec<T> {
        self.prune(0, count)
    }

    pub(crate) fn prune_last(&mut self, count: usize) -> Vec<T> {
        let len = self.len();
        contract::require(count <= len, || Violation::CountOutOfRange {
            requested: count,
            available: len,
        });
        self.prune(len - count, count)
    }

    pub(crate) fn keep_first(&mut self, count: usize) -> Vec<T> {
        let len = self.len();
        contract::require(count <= len, || Violation::CountOutOfRange {
            requested: count,
            available: len,
        });
        self.prune(count, len - count)
    }

    pub(crate) fn keep_last(&mut self, count: usize) -> Vec<T> {
        let len = self.len();
        contract::require(count <= len, || Violation::CountOutOfRange {
            requested: count,
            available: len,
        });
        self.prune(0, len - count)
    }

    pub(crate) fn wipe_out(&mut self) -> Vec<T> {
        self.cursors.move_all_off();
        self.storage.clear()
    }

    pub(crate) fn reset(&mut self, values: Vec<T>) -> Vec<T> {
        self.cursors.move_all_off();
        self.storage.reset(values)
    }

    pub(crate) fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.storage.sort_by(compare);
        self.cursors.move_all_off();
        tracing::debug!(len = self.len(), "sorted array list");
    }

    // ========================================================================
    // Invariant
    // ========================================================================

    pub(crate) fn is_consistent(&self) -> bool {
        let len = self.len();
        self.storage.is_consistent()
            && self.cursors.is_consistent()
            && self.cursors.iter().all(|p| p.is_off() || p < len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(values: &[u32]) -> ArrayState<u32> {
        ArrayState::from_vec(values.to_vec(), Growth::Exact)
    }

    #[test]
    fn insert_shifts_cursors_at_or_after() {
        let mut s = state(&[10, 20, 30]);
        let a = s.cursors.attach();
        let b = s.builtin();
        s.go(a, 1);
        s.go(b, 0);

        s.insert(1, 15);

        assert_eq!(s.item_at(a), Some(&20));
        assert_eq!(s.item_at(b), Some(&10));
    }

    #[test]
    fn remove_moves_cursor_to_successor() {
        let mut s = state(&[10, 20, 30]);
        let a = s.cursors.attach();
        let b = s.cursors.attach();
        s.go(a, 1);
        s.go(b, 2);

        assert_eq!(s.remove(1), 20);

        assert_eq!(s.item_at(a), Some(&30));
        assert_eq!(s.item_at(b), Some(&30));
    }

    #[test]
    fn removing_last_element_moves_cursor_off() {
        let mut s = state(&[10, 20]);
        let b = s.builtin();
        s.finish(b);

        s.remove(1);
        assert!(s.index(b).is_none());
    }

    #[test]
    fn put_left_keeps_cursor_on_element() {
        let mut s = state(&[10, 20]);
        let b = s.builtin();
        s.go(b, 1);

        s.put_left(b, 15);
        assert_eq!(s.storage.as_slice(), &[10, 15, 20]);
        assert_eq!(s.item_at(b), Some(&20));

        s.put_right(b, 25);
        assert_eq!(s.storage.as_slice(), &[10, 15, 20, 25]);
        assert_eq!(s.item_at(b), Some(&20));
    }

    #[test]
    fn bulk_changes_move_all_off() {
        let mut s = state(&[1, 2, 3, 4]);
        let a = s.cursors.attach();
        s.go(a, 3);
        s.start(s.builtin());

        s.prune(1, 2);
        assert!(!s.cursors.any_on());
        assert_eq!(s.storage.as_slice(), &[1, 4]);

        s.start(a);
        s.insert_many(1, vec![8, 9]);
        assert!(!s.cursors.any_on());
        assert_eq!(s.storage.as_slice(), &[1, 8, 9, 4]);
    }

    #[test]
    fn searches() {
        let mut s = state(&[5, 7, 5, 9]);
        let b = s.builtin();

        assert!(s.search_forth(b, |v| *v == 5));
        assert_eq!(s.index(b), Some(0));
        s.forth(b);
        assert!(s.search_forth(b, |v| *v == 5));
        assert_eq!(s.index(b), Some(2));

        assert!(s.search_back(b, |v| *v == 7));
        assert_eq!(s.index(b), Some(1));

        assert!(!s.search_forth(b, |v| *v == 42));
        assert!(s.index(b).is_none());
    }

    #[test]
    fn keep_and_prune_ends() {
        let mut s = state(&[1, 2, 3, 4, 5]);
        assert_eq!(s.prune_last(2), vec![4, 5]);
        assert_eq!(s.keep_last(2), vec![1]);
        assert_eq!(s.storage.as_slice(), &[2, 3]);
        assert_eq!(s.keep_first(1), vec![3]);
        assert_eq!(s.prune_first(1), vec![2]);
        assert_eq!(s.len(), 0);
    }

    #[test]
    #[should_panic(expected = "cursor is off")]
    fn forth_from_off_panics() {
        let mut s = state(&[1]);
        let b = s.builtin();
        s.forth(b);
    }

    #[test]
    #[should_panic(expected = "requested 3 elements but only 2 available")]
    fn prune_past_end_panics() {
        let mut s = state(&[1, 2, 3]);
        s.prune(1, 3);
    }
}
