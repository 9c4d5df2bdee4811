//! Cursor registry: the chain of cursor records anchored at a container.
//!
//! Records live in a [`Slab`] and are threaded into a singly-linked chain so
//! bulk operations (invalidate-all, retarget-on-removal) can visit every
//! cursor. The container's built-in cursor is registered at construction and
//! is always the head of the chain.
//!
//! ```text
//! first ──► [built-in] ──► [aux 3] ──► [aux 1] ──► NONE
//!                                          ▲
//! last ────────────────────────────────────┘   (NONE while only built-in exists)
//! ```

use slab::Slab;

use crate::Position;
use crate::contract::{self, Violation};

/// Key of a cursor record inside its registry.
pub(crate) type CursorKey = usize;

const NONE: CursorKey = usize::MAX;

#[derive(Debug)]
struct Record<P> {
    position: P,
    next: CursorKey,
}

#[derive(Debug)]
pub(crate) struct CursorRegistry<P: Position> {
    records: Slab<Record<P>>,
    first: CursorKey,
    last: CursorKey,
}

impl<P: Position> CursorRegistry<P> {
    /// Creates a registry holding only the built-in cursor, off.
    pub(crate) fn new() -> Self {
        let mut records = Slab::with_capacity(1);
        let first = records.insert(Record {
            position: P::OFF,
            next: NONE,
        });

        Self {
            records,
            first,
            last: NONE,
        }
    }

    /// Key of the built-in cursor.
    #[inline]
    pub(crate) fn builtin(&self) -> CursorKey {
        self.first
    }

    /// Number of registered cursors, built-in included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Registers a new cursor at the tail of the chain, off.
    pub(crate) fn attach(&mut self) -> CursorKey {
        let key = self.records.insert(Record {
            position: P::OFF,
            next: NONE,
        });

        let tail = if self.last == NONE { self.first } else { self.last };
        self.records[tail].next = key;
        self.last = key;

        contract::invariant(|| self.is_consistent(), "registry chain");
        key
    }

    /// Unregisters an auxiliary cursor.
    ///
    /// # Panics
    ///
    /// Panics if `key` is the built-in cursor or is not registered.
    pub(crate) fn detach(&mut self, key: CursorKey) {
        contract::require(key != self.first && self.records.contains(key), || {
            Violation::Invariant("detach of unregistered cursor")
        });

        // Singly linked: find the predecessor by walking from the head.
        let mut prev = self.first;
        while self.records[prev].next != key {
            prev = self.records[prev].next;
            contract::require(prev != NONE, || {
                Violation::Invariant("cursor missing from chain")
            });
        }

        let next = self.records.remove(key).next;
        self.records[prev].next = next;

        if self.last == key {
            self.last = if prev == self.first { NONE } else { prev };
        }

        contract::invariant(|| self.is_consistent(), "registry chain");
    }

    #[inline]
    pub(crate) fn position(&self, key: CursorKey) -> P {
        self.records[key].position
    }

    #[inline]
    pub(crate) fn set(&mut self, key: CursorKey, position: P) {
        self.records[key].position = position;
    }

    /// Moves every registered cursor off.
    pub(crate) fn move_all_off(&mut self) {
        let mut on = 0usize;
        let mut key = self.first;
        while key != NONE {
            let record = &mut self.records[key];
            if record.position.is_on() {
                on += 1;
            }
            record.position = P::OFF;
            key = record.next;
        }

        if on > 0 {
            tracing::debug!(cursors = self.records.len(), on, "moved all cursors off");
        }
    }

    /// Rewrites the position of every cursor that is on.
    pub(crate) fn retarget(&mut self, mut f: impl FnMut(P) -> P) {
        let mut key = self.first;
        while key != NONE {
            let record = &mut self.records[key];
            if record.position.is_on() {
                record.position = f(record.position);
            }
            key = record.next;
        }
    }

    #[cfg(test)]
    pub(crate) fn any_on(&self) -> bool {
        self.iter().any(|p| p.is_on())
    }

    /// Iterates positions in chain order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = P> + '_ {
        let mut key = self.first;
        core::iter::from_fn(move || {
            if key == NONE {
                return None;
            }
            let record = &self.records[key];
            key = record.next;
            Some(record.position)
        })
    }

    /// Verifies the chain shape against the record count.
    pub(crate) fn is_consistent(&self) -> bool {
        if !self.records.contains(self.first) {
            return false;
        }

        let mut walked = 0usize;
        let mut key = self.first;
        let mut tail = NONE;
        while key != NONE {
            walked += 1;
            if walked > self.records.len() {
                return false;
            }
            tail = key;
            key = self.records[key].next;
        }

        if walked != self.records.len() {
            return false;
        }

        if walked == 1 {
            self.last == NONE
        } else {
            self.last == tail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_only_builtin() {
        let reg: CursorRegistry<usize> = CursorRegistry::new();
        assert_eq!(reg.len(), 1);
        assert!(reg.position(reg.builtin()).is_off());
        assert!(reg.is_consistent());
        assert_eq!(reg.last, NONE);
    }

    #[test]
    fn attach_appends_to_tail() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let a = reg.attach();
        let b = reg.attach();

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.last, b);
        assert_eq!(reg.records[reg.first].next, a);
        assert_eq!(reg.records[a].next, b);
        assert_eq!(reg.records[b].next, NONE);
    }

    #[test]
    fn detach_tail_moves_last_back() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let a = reg.attach();
        let b = reg.attach();

        reg.detach(b);
        assert_eq!(reg.last, a);

        reg.detach(a);
        assert_eq!(reg.last, NONE);
        assert_eq!(reg.len(), 1);
        assert!(reg.is_consistent());
    }

    #[test]
    fn detach_middle_relinks() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let a = reg.attach();
        let b = reg.attach();
        let c = reg.attach();

        reg.detach(b);
        assert_eq!(reg.records[a].next, c);
        assert_eq!(reg.last, c);
        assert!(reg.is_consistent());
    }

    #[test]
    fn slot_reuse_keeps_chain_order() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let a = reg.attach();
        let b = reg.attach();
        reg.detach(a);
        let c = reg.attach();

        // Slab reuses a's slot, but c still lands at the tail.
        assert_eq!(c, a);
        assert_eq!(reg.records[b].next, c);
        assert_eq!(reg.last, c);
    }

    #[test]
    #[should_panic(expected = "detach of unregistered cursor")]
    fn detach_builtin_panics() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let builtin = reg.builtin();
        reg.detach(builtin);
    }

    #[test]
    fn move_all_off_and_retarget() {
        let mut reg: CursorRegistry<usize> = CursorRegistry::new();
        let a = reg.attach();
        let b = reg.attach();
        reg.set(reg.builtin(), 0);
        reg.set(a, 4);

        reg.retarget(|p| p + 1);
        assert_eq!(reg.position(reg.builtin()), 1);
        assert_eq!(reg.position(a), 5);
        assert!(reg.position(b).is_off());
        assert!(reg.any_on());

        reg.move_all_off();
        assert!(reg.iter().all(|p| p.is_off()));
        assert!(!reg.any_on());
    }
}
