//! Per-container mutex and canonical two-container lock ordering.
//!
//! Each container owns one mutex. Operations that involve two containers
//! (copy, compare, append) must hold both. Locking "receiver, then argument"
//! deadlocks when two threads run `a.append_last(&b)` and `b.append_last(&a)`
//! at the same time, so pairs are always acquired in ascending
//! [`ContainerId`] order regardless of which side is the receiver.
//!
//! ```text
//! thread 1: a.append_last(&b)   lock(min(a,b)) -> lock(max(a,b))
//! thread 2: b.append_last(&a)   lock(min(a,b)) -> lock(max(a,b))
//! ```

use core::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use parking_lot::{Mutex, MutexGuard};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique container identity.
///
/// Assigned at construction and never reused. Clones get a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    fn next() -> Self {
        ContainerId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// State behind a container's mutex.
///
/// The mutex sits on its own cache line so neighbouring containers in a
/// `Vec` don't contend on the same line.
pub(crate) struct Guarded<S> {
    id: ContainerId,
    state: CachePadded<Mutex<S>>,
}

impl<S> Guarded<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            id: ContainerId::next(),
            state: CachePadded::new(Mutex::new(state)),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> ContainerId {
        self.id
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// Consumes the wrapper, returning the state without locking.
    pub(crate) fn into_inner(self) -> S {
        CachePadded::into_inner(self.state).into_inner()
    }
}

/// Guards for a two-container operation.
pub(crate) enum Pair<'a, S> {
    /// Both sides are the same container; locked once.
    Same(MutexGuard<'a, S>),
    /// Receiver guard first, argument guard second.
    Distinct(MutexGuard<'a, S>, MutexGuard<'a, S>),
}

/// Locks `receiver` and `argument` in ascending id order.
pub(crate) fn lock_pair<'a, S>(receiver: &'a Guarded<S>, argument: &'a Guarded<S>) -> Pair<'a, S> {
    if receiver.id == argument.id {
        return Pair::Same(receiver.lock());
    }

    if receiver.id < argument.id {
        let r = receiver.lock();
        let a = argument.lock();
        Pair::Distinct(r, a)
    } else {
        let a = argument.lock();
        let r = receiver.lock();
        Pair::Distinct(r, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = Guarded::new(());
        let b = Guarded::new(());
        assert!(a.id() < b.id());
    }

    #[test]
    fn same_container_locks_once() {
        let a = Guarded::new(5u32);
        match lock_pair(&a, &a) {
            Pair::Same(g) => assert_eq!(*g, 5),
            Pair::Distinct(..) => panic!("expected a single guard"),
        }
    }

    #[test]
    fn distinct_guards_keep_roles() {
        let a = Guarded::new(1u32);
        let b = Guarded::new(2u32);

        match lock_pair(&b, &a) {
            Pair::Distinct(r, arg) => {
                assert_eq!(*r, 2);
                assert_eq!(*arg, 1);
            }
            Pair::Same(_) => panic!("expected two guards"),
        }
    }

    #[test]
    fn reversed_roles_do_not_deadlock() {
        let a = Arc::new(Guarded::new(0u64));
        let b = Arc::new(Guarded::new(0u64));

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let (x, y) = if i == 0 {
                    (Arc::clone(&a), Arc::clone(&b))
                } else {
                    (Arc::clone(&b), Arc::clone(&a))
                };
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        if let Pair::Distinct(mut r, arg) = lock_pair(&x, &y) {
                            *r += 1;
                            assert!(*arg < u64::MAX);
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert!(*a.lock() > 0);
        assert!(*b.lock() > 0);
    }
}
