//! Fail-fast contract checks.
//!
//! Every public operation validates its preconditions before touching
//! storage. A violated precondition is a caller bug: it is logged and the
//! call panics at the caller's location. Structural invariants are rechecked
//! after mutations in debug builds only.

use thiserror::Error;

/// A broken operation contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Index does not designate an element.
    #[error("index {index} out of bounds for count {count}")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Element count at the time of the call.
        count: usize,
    },

    /// Insertion index past the end.
    #[error("insertion index {index} exceeds count {count}")]
    InsertOutOfBounds {
        /// Offending index.
        index: usize,
        /// Element count at the time of the call.
        count: usize,
    },

    /// Operation requires a positioned cursor.
    #[error("cursor is off")]
    CursorOff,

    /// No element on the requested side of the cursor.
    #[error("cursor has no neighbour on that side")]
    NoNeighbour,

    /// Operation requires at least one element.
    #[error("container is empty")]
    Empty,

    /// A run length that exceeds the available elements.
    #[error("requested {requested} elements but only {available} available")]
    CountOutOfRange {
        /// Number of elements asked for.
        requested: usize,
        /// Number of elements available from the starting point.
        available: usize,
    },

    /// Node handle no longer refers to a live node.
    #[error("stale node handle")]
    StaleHandle,

    /// Internal structure is corrupt.
    #[error("invariant broken: {0}")]
    Invariant(&'static str),
}

/// Panics with `violation` unless `cond` holds.
#[inline]
#[track_caller]
pub(crate) fn require(cond: bool, violation: impl FnOnce() -> Violation) {
    if !cond {
        fail(violation());
    }
}

/// Checks a structural invariant in debug builds.
#[inline]
#[track_caller]
pub(crate) fn invariant(cond: impl FnOnce() -> bool, what: &'static str) {
    if cfg!(debug_assertions) && !cond() {
        fail(Violation::Invariant(what));
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn fail(violation: Violation) -> ! {
    let location = core::panic::Location::caller();
    tracing::error!(%violation, %location, "contract violation");
    panic!("contract violation: {violation}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_passes() {
        require(true, || Violation::Empty);
    }

    #[test]
    #[should_panic(expected = "index 4 out of bounds for count 2")]
    fn require_panics_with_message() {
        require(false, || Violation::IndexOutOfBounds { index: 4, count: 2 });
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invariant broken: count")]
    fn invariant_fires_in_debug() {
        invariant(|| false, "count");
    }

    #[test]
    fn display_messages() {
        assert_eq!(Violation::CursorOff.to_string(), "cursor is off");
        assert_eq!(
            Violation::CountOutOfRange {
                requested: 3,
                available: 1
            }
            .to_string(),
            "requested 3 elements but only 1 available"
        );
    }
}
