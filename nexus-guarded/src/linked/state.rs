//! Unlocked linked list state: node chain plus cursor discipline.
//!
//! Nodes never move, so insertion leaves every cursor alone. Removing a
//! single node retargets the cursors that sat on it to its successor (off if
//! it was last). Range removal, bulk insertion, sorting and copying move
//! every cursor off.

use core::cmp::Ordering;

use super::chain::{Chain, NONE};
use crate::contract::{self, Violation};
use crate::registry::{CursorKey, CursorRegistry};
use crate::{NodeHandle, Position};

#[derive(Debug)]
pub(crate) struct LinkedState<T> {
    pub(crate) chain: Chain<T>,
    pub(crate) cursors: CursorRegistry<NodeHandle>,
}

impl<T> LinkedState<T> {
    pub(crate) fn new() -> Self {
        Self {
            chain: Chain::new(),
            cursors: CursorRegistry::new(),
        }
    }

    pub(crate) fn from_vec(values: Vec<T>) -> Self {
        Self {
            chain: Chain::from_vec(values),
            cursors: CursorRegistry::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    pub(crate) fn builtin(&self) -> CursorKey {
        self.cursors.builtin()
    }

    // ========================================================================
    // Preconditions
    // ========================================================================

    /// Returns the slot under the cursor, panicking if it is off.
    #[inline]
    pub(crate) fn require_on(&self, key: CursorKey) -> usize {
        let handle = self.cursors.position(key);
        contract::require(handle.is_on(), || Violation::CursorOff);
        self.chain.resolve(handle)
    }

    #[inline]
    fn require_nonempty(&self) {
        contract::require(self.len() > 0, || Violation::Empty);
    }

    #[inline]
    fn require_run(&self, index: usize, count: usize) {
        let len = self.len();
        contract::require(index <= len, || Violation::InsertOutOfBounds { index, count: len });
        contract::require(count <= len - index, || Violation::CountOutOfRange {
            requested: count,
            available: len - index,
        });
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    pub(crate) fn item_at(&self, key: CursorKey) -> Option<&T> {
        let handle = self.cursors.position(key);
        if handle.is_off() {
            return None;
        }
        Some(self.chain.value(self.chain.resolve(handle)))
    }

    pub(crate) fn index(&self, key: CursorKey) -> Option<usize> {
        let handle = self.cursors.position(key).on()?;
        Some(self.chain.index_of(self.chain.resolve(handle)))
    }

    pub(crate) fn is_first(&self, key: CursorKey) -> bool {
        let handle = self.cursors.position(key);
        handle.is_on() && handle.slot == self.chain.first()
    }

    pub(crate) fn is_last(&self, key: CursorKey) -> bool {
        let handle = self.cursors.position(key);
        handle.is_on() && handle.slot == self.chain.last()
    }

    pub(crate) fn start(&mut self, key: CursorKey) {
        let handle = self.chain.handle(self.chain.first());
        self.cursors.set(key, handle);
    }

    pub(crate) fn finish(&mut self, key: CursorKey) {
        let handle = self.chain.handle(self.chain.last());
        self.cursors.set(key, handle);
    }

    pub(crate) fn forth(&mut self, key: CursorKey) {
        let slot = self.require_on(key);
        let handle = self.chain.handle(self.chain.next_of(slot));
        self.cursors.set(key, handle);
    }

    /// Steps back by walking from the first node.
    pub(crate) fn back(&mut self, key: CursorKey) {
        let slot = self.require_on(key);
        let handle = self.chain.handle(self.chain.node_before(slot));
        self.cursors.set(key, handle);
    }

    pub(crate) fn go(&mut self, key: CursorKey, index: usize) {
        let handle = self.chain.handle(self.chain.node_at(index));
        self.cursors.set(key, handle);
    }

    /// Moves the cursor to the first match at or after its node.
    ///
    /// An off cursor searches from the first node. Ends off if nothing
    /// matches.
    pub(crate) fn search_forth(&mut self, key: CursorKey, mut matches: impl FnMut(&T) -> bool) -> bool {
        let handle = self.cursors.position(key);
        let mut slot = if handle.is_on() {
            self.chain.resolve(handle)
        } else {
            self.chain.first()
        };

        while slot != NONE && !matches(self.chain.value(slot)) {
            slot = self.chain.next_of(slot);
        }

        let found = self.chain.handle(slot);
        self.cursors.set(key, found);
        found.is_on()
    }

    /// Moves the cursor to the last match at or before its node.
    ///
    /// Singly linked, so this walks from the first node up to the cursor
    /// (or the whole chain when off) remembering the latest match.
    pub(crate) fn search_back(&mut self, key: CursorKey, mut matches: impl FnMut(&T) -> bool) -> bool {
        let handle = self.cursors.position(key);
        let stop = if handle.is_on() {
            self.chain.next_of(self.chain.resolve(handle))
        } else {
            NONE
        };

        let mut found = NONE;
        let mut slot = self.chain.first();
        while slot != stop {
            if matches(self.chain.value(slot)) {
                found = slot;
            }
            slot = self.chain.next_of(slot);
        }

        let found = self.chain.handle(found);
        self.cursors.set(key, found);
        found.is_on()
    }

    // ========================================================================
    // Single-node structural changes
    // ========================================================================

    pub(crate) fn insert(&mut self, index: usize, value: T) {
        self.chain.insert_at(index, value);
    }

    pub(crate) fn put_first(&mut self, value: T) {
        self.chain.insert_after(NONE, value);
    }

    pub(crate) fn put_last(&mut self, value: T) {
        self.chain.insert_last(value);
    }

    pub(crate) fn put_left(&mut self, key: CursorKey, value: T) {
        let slot = self.require_on(key);
        let prev = self.chain.node_before(slot);
        self.chain.insert_after(prev, value);
    }

    pub(crate) fn put_right(&mut self, key: CursorKey, value: T) {
        let slot = self.require_on(key);
        self.chain.insert_after(slot, value);
    }

    /// Removes the node in `slot`.
    ///
    /// Cursors on it move to its successor, or off if it was last.
    fn remove_slot(&mut self, slot: usize) -> T {
        let removed = self.chain.handle(slot);
        let successor = self.chain.handle(self.chain.next_of(slot));
        self.cursors
            .retarget(|h| if h == removed { successor } else { h });
        self.chain.remove(slot)
    }

    pub(crate) fn remove(&mut self, index: usize) -> T {
        let slot = self.chain.node_at(index);
        self.remove_slot(slot)
    }

    pub(crate) fn remove_first(&mut self) -> T {
        self.require_nonempty();
        self.remove_slot(self.chain.first())
    }

    pub(crate) fn remove_last(&mut self) -> T {
        self.require_nonempty();
        self.remove_slot(self.chain.last())
    }

    pub(crate) fn remove_at(&mut self, key: CursorKey) -> T {
        let slot = self.require_on(key);
        self.remove_slot(slot)
    }

    pub(crate) fn remove_left(&mut self, key: CursorKey) -> T {
        let slot = self.require_on(key);
        let prev = self.chain.node_before(slot);
        contract::require(prev != NONE, || Violation::NoNeighbour);
        self.remove_slot(prev)
    }

    pub(crate) fn remove_right(&mut self, key: CursorKey) -> T {
        let slot = self.require_on(key);
        let next = self.chain.next_of(slot);
        contract::require(next != NONE, || Violation::NoNeighbour);
        self.remove_slot(next)
    }

    pub(crate) fn replace(&mut self, index: usize, value: T) -> T {
        let slot = self.chain.node_at(index);
        self.chain.replace(slot, value)
    }

    pub(crate) fn replace_at(&mut self, key: CursorKey, value: T) -> T {
        let slot = self.require_on(key);
        self.chain.replace(slot, value)
    }

    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        let a = self.chain.node_at(i);
        let b = self.chain.node_at(j);
        self.chain.swap_values(a, b);
    }

    // ========================================================================
    // Bulk structural changes (all cursors off)
    // ========================================================================

    /// Slot after which a bulk insertion at `index` splices.
    pub(crate) fn anchor_at(&self, index: usize) -> usize {
        let count = self.len();
        contract::require(index <= count, || Violation::InsertOutOfBounds { index, count });
        if index == 0 { NONE } else { self.chain.node_at(index - 1) }
    }

    #[inline]
    pub(crate) fn anchor_first(&self) -> usize {
        NONE
    }

    #[inline]
    pub(crate) fn anchor_last(&self) -> usize {
        self.chain.last()
    }

    pub(crate) fn anchor_left(&self, key: CursorKey) -> usize {
        let slot = self.require_on(key);
        self.chain.node_before(slot)
    }

    pub(crate) fn anchor_right(&self, key: CursorKey) -> usize {
        self.require_on(key)
    }

    /// Splices `values` after `anchor` (`NONE` for the front).
    pub(crate) fn splice(&mut self, anchor: usize, values: Vec<T>) {
        self.cursors.move_all_off();
        self.chain.splice_after(anchor, values);
    }

    pub(crate) fn prune(&mut self, index: usize, count: usize) -> Vec<T> {
        self.require_run(index, count);
        self.cursors.move_all_off();
        self.chain.remove_run(index, count)
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
        self.chain.clear()
    }

    /// Replaces all nodes with fresh ones for `values`.
    pub(crate) fn reset(&mut self, values: Vec<T>) -> Vec<T> {
        let old = self.wipe_out();
        self.chain.splice_after(NONE, values);
        old
    }

    pub(crate) fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.chain.sort_by(compare);
        self.cursors.move_all_off();
        tracing::debug!(len = self.len(), "sorted linked list");
    }

    // ========================================================================
    // Invariant
    // ========================================================================

    pub(crate) fn is_consistent(&self) -> bool {
        self.chain.is_consistent()
            && self.cursors.is_consistent()
            && self
                .cursors
                .iter()
                .all(|h| h.is_off() || self.chain.is_live(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(values: &[u32]) -> LinkedState<u32> {
        LinkedState::from_vec(values.to_vec())
    }

    fn values(s: &LinkedState<u32>) -> Vec<u32> {
        s.chain.iter().copied().collect()
    }

    #[test]
    fn removal_retargets_to_successor() {
        let mut s = state(&[24, 13, 7]);
        let c1 = s.builtin();
        let c2 = s.cursors.attach();
        s.go(c1, 0);
        s.go(c2, 1);

        assert_eq!(s.remove(1), 13);

        assert_eq!(s.item_at(c2), Some(&7));
        assert_eq!(s.item_at(c1), Some(&24));
        assert!(s.is_consistent());
    }

    #[test]
    fn removing_last_node_moves_cursor_off() {
        let mut s = state(&[1, 2]);
        let c = s.cursors.attach();
        s.finish(c);

        s.remove_last();
        assert!(s.item_at(c).is_none());
        assert!(s.is_consistent());
    }

    #[test]
    fn insertion_leaves_cursors_alone() {
        let mut s = state(&[1, 3]);
        let c = s.builtin();
        s.go(c, 1);

        s.put_left(c, 2);
        s.put_first(0);
        s.put_right(c, 4);
        s.put_last(5);

        assert_eq!(values(&s), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(s.item_at(c), Some(&3));
        assert_eq!(s.index(c), Some(3));
    }

    #[test]
    fn back_walks_from_first() {
        let mut s = state(&[1, 2, 3]);
        let c = s.builtin();
        s.finish(c);
        s.back(c);
        assert_eq!(s.item_at(c), Some(&2));
        s.back(c);
        s.back(c);
        assert!(s.item_at(c).is_none());
    }

    #[test]
    fn prune_moves_all_off() {
        let mut s = state(&[1, 2, 3, 4]);
        let c = s.cursors.attach();
        s.go(c, 0);

        assert_eq!(s.prune(2, 2), vec![3, 4]);
        assert!(!s.cursors.any_on());
        assert_eq!(values(&s), vec![1, 2]);
    }

    #[test]
    fn searches() {
        let mut s = state(&[5, 7, 5, 9]);
        let c = s.builtin();

        assert!(s.search_forth(c, |v| *v == 5));
        assert_eq!(s.index(c), Some(0));
        s.forth(c);
        assert!(s.search_forth(c, |v| *v == 5));
        assert_eq!(s.index(c), Some(2));

        assert!(s.search_back(c, |v| *v == 5));
        assert_eq!(s.index(c), Some(2));
        s.back(c);
        assert!(s.search_back(c, |v| *v == 5));
        assert_eq!(s.index(c), Some(0));

        assert!(!s.search_back(c, |v| *v == 9));
        assert!(s.item_at(c).is_none());
    }

    #[test]
    fn remove_neighbours() {
        let mut s = state(&[1, 2, 3]);
        let c = s.builtin();
        s.go(c, 1);
        assert_eq!(s.remove_left(c), 1);
        assert_eq!(s.remove_right(c), 3);
        assert_eq!(values(&s), vec![2]);
        assert_eq!(s.item_at(c), Some(&2));
    }

    #[test]
    #[should_panic(expected = "cursor has no neighbour on that side")]
    fn remove_left_of_first_panics() {
        let mut s = state(&[1, 2]);
        let c = s.builtin();
        s.start(c);
        s.remove_left(c);
    }
}
