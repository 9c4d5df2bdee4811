//! Singly-linked node chain over slab storage.
//!
//! Nodes live in a [`Slab`] and link to their successor by slot. The chain
//! tracks first, last, and length; links use `NONE` as the "no node"
//! sentinel.
//!
//! ```text
//! first ──► [24|●]──► [13|●]──► [ 7|NONE] ◄── last
//! ```
//!
//! Every node carries a stamp assigned from a per-chain counter when it is
//! created. Slots are reused after removal; stamps never are, which is what
//! lets a [`NodeHandle`] detect that its node is gone.
//!
//! Reaching a node by index, or a node's predecessor, walks from `first`.

use core::cmp::Ordering;

use slab::Slab;

use crate::{NodeHandle, Position};
use crate::contract::{self, Violation};

pub(crate) const NONE: usize = usize::MAX;

#[derive(Debug)]
pub(crate) struct Node<T> {
    value: T,
    next: usize,
    stamp: u64,
}

#[derive(Debug)]
pub(crate) struct Chain<T> {
    nodes: Slab<Node<T>>,
    first: usize,
    last: usize,
    len: usize,
    next_stamp: u64,
}

impl<T> Chain<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Slab::new(),
            first: NONE,
            last: NONE,
            len: 0,
            next_stamp: 0,
        }
    }

    pub(crate) fn from_vec(values: Vec<T>) -> Self {
        let mut chain = Self::new();
        chain.nodes.reserve(values.len());
        chain.splice_after(NONE, values);
        chain
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn first(&self) -> usize {
        self.first
    }

    #[inline]
    pub(crate) fn last(&self) -> usize {
        self.last
    }

    #[inline]
    pub(crate) fn next_of(&self, slot: usize) -> usize {
        self.nodes[slot].next
    }

    #[inline]
    pub(crate) fn value(&self, slot: usize) -> &T {
        &self.nodes[slot].value
    }

    /// Handle for a live slot, or `OFF` for `NONE`.
    #[inline]
    pub(crate) fn handle(&self, slot: usize) -> NodeHandle {
        if slot == NONE {
            NodeHandle::OFF
        } else {
            NodeHandle::new(slot, self.nodes[slot].stamp)
        }
    }

    /// Returns `true` if `handle` designates a live node.
    #[inline]
    pub(crate) fn is_live(&self, handle: NodeHandle) -> bool {
        self.nodes
            .get(handle.slot)
            .is_some_and(|node| node.stamp == handle.stamp)
    }

    /// Resolves a handle to its slot.
    ///
    /// # Panics
    ///
    /// Panics if the handle's node has been removed.
    #[inline]
    pub(crate) fn resolve(&self, handle: NodeHandle) -> usize {
        contract::require(self.is_live(handle), || Violation::StaleHandle);
        handle.slot
    }

    /// Slot of the node at `index`.
    pub(crate) fn node_at(&self, index: usize) -> usize {
        let count = self.len;
        contract::require(index < count, || Violation::IndexOutOfBounds { index, count });

        let mut slot = self.first;
        for _ in 0..index {
            slot = self.nodes[slot].next;
        }
        slot
    }

    /// Slot of the node preceding `slot`, or `NONE` if it is first.
    pub(crate) fn node_before(&self, slot: usize) -> usize {
        let mut prev = NONE;
        let mut cur = self.first;
        while cur != slot {
            contract::require(cur != NONE, || Violation::Invariant("node not in chain"));
            prev = cur;
            cur = self.nodes[cur].next;
        }
        prev
    }

    /// Position of `slot` counted from the first node.
    pub(crate) fn index_of(&self, slot: usize) -> usize {
        let mut index = 0;
        let mut cur = self.first;
        while cur != slot {
            contract::require(cur != NONE, || Violation::Invariant("node not in chain"));
            index += 1;
            cur = self.nodes[cur].next;
        }
        index
    }

    fn alloc(&mut self, value: T) -> usize {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.nodes.insert(Node {
            value,
            next: NONE,
            stamp,
        })
    }

    /// Inserts `value` after `prev` (`NONE` inserts at the front).
    pub(crate) fn insert_after(&mut self, prev: usize, value: T) -> usize {
        let slot = self.alloc(value);

        if prev == NONE {
            self.nodes[slot].next = self.first;
            self.first = slot;
        } else {
            let next = self.nodes[prev].next;
            self.nodes[slot].next = next;
            self.nodes[prev].next = slot;
        }

        if self.nodes[slot].next == NONE {
            self.last = slot;
        }

        self.len += 1;
        slot
    }

    /// Inserts `value` so that it ends up at `index`.
    pub(crate) fn insert_at(&mut self, index: usize, value: T) -> usize {
        let count = self.len;
        contract::require(index <= count, || Violation::InsertOutOfBounds { index, count });

        let prev = if index == 0 { NONE } else { self.node_at(index - 1) };
        self.insert_after(prev, value)
    }

    #[inline]
    pub(crate) fn insert_last(&mut self, value: T) -> usize {
        self.insert_after(self.last, value)
    }

    /// Links fresh nodes for `values` after `prev` (`NONE` for the front).
    pub(crate) fn splice_after(&mut self, prev: usize, values: Vec<T>) {
        let mut at = prev;
        for value in values {
            at = self.insert_after(at, value);
        }
    }

    /// Unlinks and frees `slot` whose predecessor is `prev`.
    fn unlink(&mut self, prev: usize, slot: usize) -> T {
        let next = self.nodes[slot].next;

        match (prev == NONE, next == NONE) {
            // Sole node.
            (true, true) => {
                self.first = NONE;
                self.last = NONE;
            }
            // First of several.
            (true, false) => self.first = next,
            // Last of several.
            (false, true) => {
                self.nodes[prev].next = NONE;
                self.last = prev;
            }
            // Interior.
            (false, false) => self.nodes[prev].next = next,
        }

        self.len -= 1;
        self.nodes.remove(slot).value
    }

    /// Removes `slot` from the chain, returning its value.
    pub(crate) fn remove(&mut self, slot: usize) -> T {
        let prev = self.node_before(slot);
        self.unlink(prev, slot)
    }

    /// Removes `count` nodes starting at `index`, returning their values.
    pub(crate) fn remove_run(&mut self, index: usize, count: usize) -> Vec<T> {
        if count == 0 {
            return Vec::new();
        }

        let prev = if index == 0 { NONE } else { self.node_at(index - 1) };
        let mut removed = Vec::with_capacity(count);
        for _ in 0..count {
            let slot = if prev == NONE { self.first } else { self.nodes[prev].next };
            removed.push(self.unlink(prev, slot));
        }
        removed
    }

    /// Exchanges the values held by two nodes.
    pub(crate) fn swap_values(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        if let Some((x, y)) = self.nodes.get2_mut(a, b) {
            core::mem::swap(&mut x.value, &mut y.value);
        }
    }

    #[inline]
    pub(crate) fn replace(&mut self, slot: usize, value: T) -> T {
        core::mem::replace(&mut self.nodes[slot].value, value)
    }

    /// Relinks nodes in comparator order without reallocating them.
    pub(crate) fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        if self.len < 2 {
            return;
        }

        let mut order: Vec<usize> = self.slots().collect();
        let nodes = &self.nodes;
        order.sort_by(|&a, &b| compare(&nodes[a].value, &nodes[b].value));

        for pair in order.windows(2) {
            self.nodes[pair[0]].next = pair[1];
        }
        let last = order[order.len() - 1];
        self.nodes[last].next = NONE;
        self.first = order[0];
        self.last = last;
    }

    /// Empties the chain, returning values in order.
    pub(crate) fn clear(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        let mut slot = self.first;
        while slot != NONE {
            let node = self.nodes.remove(slot);
            slot = node.next;
            values.push(node.value);
        }
        self.first = NONE;
        self.last = NONE;
        self.len = 0;
        values
    }

    /// Slots in chain order.
    pub(crate) fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        let mut slot = self.first;
        core::iter::from_fn(move || {
            if slot == NONE {
                return None;
            }
            let current = slot;
            slot = self.nodes[current].next;
            Some(current)
        })
    }

    /// Values in chain order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots().map(move |slot| &self.nodes[slot].value)
    }

    pub(crate) fn into_vec(mut self) -> Vec<T> {
        self.clear()
    }

    pub(crate) fn is_consistent(&self) -> bool {
        if self.len == 0 {
            return self.first == NONE && self.last == NONE && self.nodes.is_empty();
        }
        if self.first == NONE || self.last == NONE || self.nodes.len() != self.len {
            return false;
        }

        let mut walked = 0usize;
        let mut tail = NONE;
        let mut slot = self.first;
        while slot != NONE {
            walked += 1;
            if walked > self.len {
                return false;
            }
            tail = slot;
            slot = self.nodes[slot].next;
        }

        walked == self.len && tail == self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(values: &[u32]) -> Chain<u32> {
        Chain::from_vec(values.to_vec())
    }

    fn values(chain: &Chain<u32>) -> Vec<u32> {
        chain.iter().copied().collect()
    }

    #[test]
    fn empty_chain() {
        let c: Chain<u32> = Chain::new();
        assert_eq!(c.len(), 0);
        assert_eq!(c.first(), NONE);
        assert_eq!(c.last(), NONE);
        assert!(c.handle(NONE).is_off());
        assert!(c.is_consistent());
    }

    #[test]
    fn insert_positions() {
        let mut c = chain(&[2, 4]);
        c.insert_at(0, 1);
        c.insert_at(2, 3);
        c.insert_at(4, 5);
        assert_eq!(values(&c), vec![1, 2, 3, 4, 5]);
        assert_eq!(*c.value(c.last()), 5);
        assert!(c.is_consistent());
    }

    #[test]
    fn remove_each_case() {
        // Interior.
        let mut c = chain(&[1, 2, 3]);
        let mid = c.node_at(1);
        assert_eq!(c.remove(mid), 2);
        assert_eq!(values(&c), vec![1, 3]);

        // Last.
        let last = c.last();
        assert_eq!(c.remove(last), 3);
        assert_eq!(c.last(), c.first());

        // Sole.
        let sole = c.first();
        assert_eq!(c.remove(sole), 1);
        assert!(c.is_consistent());

        // First.
        let mut c = chain(&[1, 2]);
        let first = c.first();
        assert_eq!(c.remove(first), 1);
        assert_eq!(*c.value(c.first()), 2);
        assert!(c.is_consistent());
    }

    #[test]
    fn node_before_and_index_of() {
        let c = chain(&[10, 20, 30]);
        let third = c.node_at(2);
        assert_eq!(c.node_before(third), c.node_at(1));
        assert_eq!(c.node_before(c.first()), NONE);
        assert_eq!(c.index_of(third), 2);
    }

    #[test]
    fn stale_handles_are_detected() {
        let mut c = chain(&[1, 2]);
        let h = c.handle(c.first());
        assert!(c.is_live(h));

        let slot = c.first();
        c.remove(slot);
        // Slab reuses the slot; the stamp differs.
        let reused = c.insert_after(NONE, 9);
        assert_eq!(reused, h.slot);
        assert!(!c.is_live(h));
    }

    #[test]
    #[should_panic(expected = "stale node handle")]
    fn resolving_stale_handle_panics() {
        let mut c = chain(&[1]);
        let h = c.handle(c.first());
        c.clear();
        c.resolve(h);
    }

    #[test]
    fn remove_run_middle_and_tail() {
        let mut c = chain(&[1, 2, 3, 4, 5]);
        assert_eq!(c.remove_run(1, 2), vec![2, 3]);
        assert_eq!(values(&c), vec![1, 4, 5]);
        assert_eq!(c.remove_run(1, 2), vec![4, 5]);
        assert_eq!(c.last(), c.first());
        assert!(c.is_consistent());
    }

    #[test]
    fn sort_relinks_without_reallocating() {
        let mut c = chain(&[3, 1, 2]);
        let mut before: Vec<usize> = c.slots().collect();
        before.sort_unstable();

        c.sort_by(|a, b| a.cmp(b));
        assert_eq!(values(&c), vec![1, 2, 3]);

        let mut after: Vec<usize> = c.slots().collect();
        after.sort_unstable();
        assert_eq!(before, after);
        assert!(c.is_consistent());
    }

    #[test]
    fn swap_values_keeps_links() {
        let mut c = chain(&[1, 2, 3]);
        let (a, b) = (c.node_at(0), c.node_at(2));
        c.swap_values(a, b);
        assert_eq!(values(&c), vec![3, 2, 1]);
        assert_eq!(c.node_at(0), a);
    }
}
