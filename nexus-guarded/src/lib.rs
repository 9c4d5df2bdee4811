//! Thread-guarded, cursor-iterable lists.
//!
//! Two containers share one model: a resizable array list and a
//! singly-linked list. Both own their elements, guard every operation with
//! a per-container mutex, and support any number of independent cursors
//! over the same storage.
//!
//! ```text
//! ArrayList<T>   contiguous buffer, O(1) index, cursors are indices
//! LinkedList<T>  slab-backed node chain, O(1) ends, cursors are node handles
//! ```
//!
//! # Quick Start
//!
//! ```
//! use nexus_guarded::ArrayList;
//!
//! let list = ArrayList::new();
//! list.put_last(24);
//! list.put_last(13);
//!
//! list.start();
//! assert_eq!(list.item_at(), Some(24));
//! list.forth();
//! assert_eq!(list.item_at(), Some(13));
//! list.forth();
//! assert!(list.off());
//! ```
//!
//! # Cursors
//!
//! Every container has a built-in cursor, driven by `start`, `forth`,
//! `item_at` and friends on the container itself. [`ArrayList::cursor`] and
//! [`LinkedList::cursor`] register additional cursors that borrow the
//! container and unregister on drop.
//!
//! | Change | [`ArrayList`] cursors | [`LinkedList`] cursors |
//! |--------|-----------------------|------------------------|
//! | Single insert | shifted to stay on their element | untouched |
//! | Single remove | successor, or off if last | successor, or off if last |
//! | prune / keep / wipe_out / append / sort / copy | off | off |
//! | swap / replace | untouched | untouched |
//!
//! # Shallow and Deep
//!
//! Operations come in two families. Shallow ones use `Clone`,
//! [`Element::shallow_eq`] and plain drop. Deep ones (`deep_clone`,
//! `deep_copy`, `is_deep_equal`, `*_and_dispose`, `deep_dispose`) go
//! through the rest of the [`Element`] contract.
//!
//! # Two Containers
//!
//! `copy`, `is_equal` and the `append` family lock both containers in
//! ascending [`ContainerId`] order, so reversed calls from two threads
//! cannot deadlock. Passing a container to itself locks it once.
//!
//! # Contract Violations
//!
//! Out-of-range indices, off cursors and similar misuse panic with a
//! [`Violation`] message after logging it through `tracing`. Accessors that
//! can legitimately find nothing (`get`, `first`, `item_at`) return
//! `Option` instead.

#![warn(missing_docs)]

pub mod array;
pub mod capability;
pub mod contract;
pub mod element;
pub mod linked;
mod lock;
pub mod position;
mod registry;

pub use array::{ArrayCursor, ArrayList, Growth};
pub use capability::{Basic, Capability, DIterable, Dispatch, Indexable, Iterable, Operation};
pub use contract::Violation;
pub use element::Element;
pub use linked::{LinkedCursor, LinkedList};
pub use lock::ContainerId;
pub use position::{NodeHandle, Position};
