//! Thread-guarded singly-linked list.
//!
//! Nodes are owned by the list and live in slab storage. Access at either
//! end and relative to a cursor's node is O(1) (except anything that needs a
//! predecessor, which walks from the first node); access by index is O(n).
//!
//! # Cursors
//!
//! Cursors hold validated node handles. Inserting never disturbs a cursor.
//! Removing a node moves the cursors sitting on it to its successor, or off
//! when the node was last. Range removal, appends, sorting and copying move
//! every cursor off.
//!
//! # Example
//!
//! ```
//! use nexus_guarded::LinkedList;
//!
//! let a = LinkedList::from_vec(vec![24, 13]);
//! let b = LinkedList::from_vec(vec![7, 31]);
//!
//! a.append_first(&b);
//!
//! assert_eq!(a.as_vec(), vec![7, 31, 24, 13]);
//! assert_eq!(b.as_vec(), vec![7, 31]);
//! ```

mod chain;
mod cursor;
mod state;

pub use cursor::LinkedCursor;

use core::cmp::Ordering;
use core::fmt;

use parking_lot::MutexGuard;

use crate::Element;
use crate::contract;
use crate::lock::{ContainerId, Guarded, Pair, lock_pair};
use state::LinkedState;

/// A thread-guarded singly-linked list with registered cursors.
///
/// All methods take `&self`; the list serializes access through its own
/// mutex. Accessors hand out clones; use [`with_item`](Self::with_item) to
/// inspect an element in place.
///
/// Closures passed to [`sort`](Self::sort) and [`with_item`](Self::with_item)
/// run while the list is locked and must not call back into it.
pub struct LinkedList<T: Element> {
    inner: Guarded<LinkedState<T>>,
}

impl<T: Element> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> LinkedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            inner: Guarded::new(LinkedState::new()),
        }
    }

    /// Creates a list holding `values` in order.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            inner: Guarded::new(LinkedState::from_vec(values)),
        }
    }

    /// Returns this list's identity.
    #[inline]
    pub fn id(&self) -> ContainerId {
        self.inner.id()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, LinkedState<T>> {
        self.inner.lock()
    }

    #[inline]
    fn mutate<R>(&self, f: impl FnOnce(&mut LinkedState<T>) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state);
        contract::invariant(|| state.is_consistent(), "linked list");
        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the number of elements.
    #[inline]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the list has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns a clone of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn item(&self, index: usize) -> T {
        let state = self.lock();
        let slot = state.chain.node_at(index);
        state.chain.value(slot).clone()
    }

    /// Returns a clone of the element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.with_item(index, T::clone)
    }

    /// Calls `f` with the element at `index` while the list is locked.
    pub fn with_item<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.lock();
        state.chain.iter().nth(index).map(f)
    }

    /// Returns a clone of the first element.
    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    /// Returns a clone of the last element.
    pub fn last(&self) -> Option<T> {
        let state = self.lock();
        if state.len() == 0 {
            return None;
        }
        Some(state.chain.value(state.chain.last()).clone())
    }

    /// Returns `true` if some element is shallow-equal to `value`.
    pub fn has(&self, value: &T) -> bool {
        self.lock().chain.iter().any(|v| v.shallow_eq(value))
    }

    /// Returns `true` if some element is deep-equal to `value`.
    pub fn deep_has(&self, value: &T) -> bool {
        self.lock().chain.iter().any(|v| v.deep_eq(value))
    }

    /// Counts elements shallow-equal to `value`.
    pub fn occurrences(&self, value: &T) -> usize {
        let state = self.lock();
        state.chain.iter().filter(|v| v.shallow_eq(value)).count()
    }

    /// Counts elements deep-equal to `value`.
    pub fn deep_occurrences(&self, value: &T) -> usize {
        let state = self.lock();
        state.chain.iter().filter(|v| v.deep_eq(value)).count()
    }

    /// Returns shallow copies of all elements in order.
    pub fn as_vec(&self) -> Vec<T> {
        self.lock().chain.iter().cloned().collect()
    }

    /// Returns the number of registered cursors, built-in included.
    pub fn cursor_count(&self) -> usize {
        self.lock().cursors.len()
    }

    // ========================================================================
    // Built-in cursor
    // ========================================================================

    /// Returns a clone of the element under the built-in cursor.
    pub fn item_at(&self) -> Option<T> {
        let state = self.lock();
        state.item_at(state.builtin()).cloned()
    }

    /// Returns the built-in cursor's index, or `None` if off.
    ///
    /// Walks from the first node.
    pub fn index(&self) -> Option<usize> {
        let state = self.lock();
        state.index(state.builtin())
    }

    /// Returns `true` if the built-in cursor is off.
    pub fn off(&self) -> bool {
        let state = self.lock();
        state.item_at(state.builtin()).is_none()
    }

    /// Returns `true` if the built-in cursor is on the first node.
    pub fn is_first(&self) -> bool {
        let state = self.lock();
        state.is_first(state.builtin())
    }

    /// Returns `true` if the built-in cursor is on the last node.
    pub fn is_last(&self) -> bool {
        let state = self.lock();
        state.is_last(state.builtin())
    }

    /// Moves the built-in cursor to the first node (off if empty).
    pub fn start(&self) {
        self.mutate(|s| s.start(s.builtin()));
    }

    /// Moves the built-in cursor to the last node (off if empty).
    pub fn finish(&self) {
        self.mutate(|s| s.finish(s.builtin()));
    }

    /// Advances the built-in cursor, going off past the last node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn forth(&self) {
        self.mutate(|s| s.forth(s.builtin()));
    }

    /// Moves the built-in cursor back, going off before the first node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn back(&self) {
        self.mutate(|s| s.back(s.builtin()));
    }

    /// Moves the built-in cursor to `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn go(&self, index: usize) {
        self.mutate(|s| s.go(s.builtin(), index));
    }

    /// Moves the built-in cursor to the next element shallow-equal to
    /// `value`, starting at the current node (or the first node when off).
    /// Returns `false` and leaves the cursor off if none matches.
    pub fn search_forth(&self, value: &T) -> bool {
        self.mutate(|s| s.search_forth(s.builtin(), |v| v.shallow_eq(value)))
    }

    /// Like [`search_forth`](Self::search_forth), searching backwards.
    pub fn search_back(&self, value: &T) -> bool {
        self.mutate(|s| s.search_back(s.builtin(), |v| v.shallow_eq(value)))
    }

    /// Like [`search_forth`](Self::search_forth) with deep equality.
    pub fn deep_search_forth(&self, value: &T) -> bool {
        self.mutate(|s| s.search_forth(s.builtin(), |v| v.deep_eq(value)))
    }

    /// Like [`search_back`](Self::search_back) with deep equality.
    pub fn deep_search_back(&self, value: &T) -> bool {
        self.mutate(|s| s.search_back(s.builtin(), |v| v.deep_eq(value)))
    }

    /// Creates an auxiliary cursor, initially off.
    pub fn cursor(&self) -> LinkedCursor<'_, T> {
        let key = self.mutate(|s| s.cursors.attach());
        LinkedCursor::new(self, key)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Inserts `value` so it ends up at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > count`.
    pub fn put(&self, value: T, index: usize) {
        self.mutate(|s| s.insert(index, value));
    }

    /// Inserts `value` before the first node.
    pub fn put_first(&self, value: T) {
        self.mutate(|s| s.put_first(value));
    }

    /// Inserts `value` after the last node.
    pub fn put_last(&self, value: T) {
        self.mutate(|s| s.put_last(value));
    }

    /// Inserts `value` before the built-in cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_left(&self, value: T) {
        self.mutate(|s| s.put_left(s.builtin(), value));
    }

    /// Inserts `value` after the built-in cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_right(&self, value: T) {
        self.mutate(|s| s.put_right(s.builtin(), value));
    }

    /// Splices shallow copies of `other`'s elements in at `index`.
    ///
    /// `other` keeps its own nodes. Moves all of this list's cursors off.
    ///
    /// # Panics
    ///
    /// Panics if `index > count`.
    pub fn append(&self, other: &LinkedList<T>, index: usize) {
        self.append_with(other, |s| s.anchor_at(index));
    }

    /// Splices shallow copies of `other`'s elements before the first node.
    pub fn append_first(&self, other: &LinkedList<T>) {
        self.append_with(other, |s| s.anchor_first());
    }

    /// Splices shallow copies of `other`'s elements after the last node.
    pub fn append_last(&self, other: &LinkedList<T>) {
        self.append_with(other, |s| s.anchor_last());
    }

    /// Splices shallow copies of `other`'s elements before the built-in
    /// cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn append_left(&self, other: &LinkedList<T>) {
        self.append_with(other, |s| s.anchor_left(s.builtin()));
    }

    /// Splices shallow copies of `other`'s elements after the built-in
    /// cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn append_right(&self, other: &LinkedList<T>) {
        self.append_with(other, |s| s.anchor_right(s.builtin()));
    }

    fn append_with(&self, other: &LinkedList<T>, anchor: impl FnOnce(&LinkedState<T>) -> usize) {
        let mut pair = lock_pair(&self.inner, &other.inner);
        let (dst, values) = match &mut pair {
            Pair::Same(state) => {
                let values: Vec<T> = state.chain.iter().cloned().collect();
                (&mut **state, values)
            }
            Pair::Distinct(dst, src) => (&mut **dst, src.chain.iter().cloned().collect()),
        };

        let at = anchor(dst);
        dst.splice(at, values);
        contract::invariant(|| dst.is_consistent(), "linked list");
    }

    // ========================================================================
    // Replacement
    // ========================================================================

    /// Replaces the element at `index`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn replace(&self, value: T, index: usize) -> T {
        self.mutate(|s| s.replace(index, value))
    }

    /// Replaces the element at `index` and deep-disposes the old one.
    pub fn replace_and_dispose(&self, value: T, index: usize) {
        self.replace(value, index).deep_dispose();
    }

    /// Replaces the element under the built-in cursor, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn replace_at(&self, value: T) -> T {
        self.mutate(|s| s.replace_at(s.builtin(), value))
    }

    /// Replaces the element under the built-in cursor and deep-disposes the
    /// old one.
    pub fn replace_at_and_dispose(&self, value: T) {
        self.replace_at(value).deep_dispose();
    }

    /// Exchanges the elements at `i` and `j`. Nodes and cursors stay put.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn swap(&self, i: usize, j: usize) {
        self.mutate(|s| s.swap(i, j));
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn remove(&self, index: usize) -> T {
        self.mutate(|s| s.remove(index))
    }

    /// Removes the element at `index` and deep-disposes it.
    pub fn remove_and_dispose(&self, index: usize) {
        self.remove(index).deep_dispose();
    }

    /// Removes and returns the first element.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn remove_first(&self) -> T {
        self.mutate(|s| s.remove_first())
    }

    /// Removes the first element and deep-disposes it.
    pub fn remove_first_and_dispose(&self) {
        self.remove_first().deep_dispose();
    }

    /// Removes and returns the last element.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn remove_last(&self) -> T {
        self.mutate(|s| s.remove_last())
    }

    /// Removes the last element and deep-disposes it.
    pub fn remove_last_and_dispose(&self) {
        self.remove_last().deep_dispose();
    }

    /// Removes and returns the element under the built-in cursor. The cursor
    /// moves to the successor, or off if the node was last.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn remove_at(&self) -> T {
        self.mutate(|s| s.remove_at(s.builtin()))
    }

    /// Removes the element under the built-in cursor and deep-disposes it.
    pub fn remove_at_and_dispose(&self) {
        self.remove_at().deep_dispose();
    }

    /// Removes and returns the element before the built-in cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off or on the first node.
    pub fn remove_left(&self) -> T {
        self.mutate(|s| s.remove_left(s.builtin()))
    }

    /// Removes the element before the built-in cursor and deep-disposes it.
    pub fn remove_left_and_dispose(&self) {
        self.remove_left().deep_dispose();
    }

    /// Removes and returns the element after the built-in cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off or on the last node.
    pub fn remove_right(&self) -> T {
        self.mutate(|s| s.remove_right(s.builtin()))
    }

    /// Removes the element after the built-in cursor and deep-disposes it.
    pub fn remove_right_and_dispose(&self) {
        self.remove_right().deep_dispose();
    }

    /// Removes `count` nodes starting at `index`, returning their elements.
    ///
    /// Moves all cursors off.
    ///
    /// # Panics
    ///
    /// Panics if the run extends past the last node.
    pub fn prune(&self, index: usize, count: usize) -> Vec<T> {
        self.mutate(|s| s.prune(index, count))
    }

    /// Like [`prune`](Self::prune), deep-disposing the removed elements.
    pub fn prune_and_dispose(&self, index: usize, count: usize) {
        dispose_all(self.prune(index, count));
    }

    /// Removes the first `count` elements.
    pub fn prune_first(&self, count: usize) -> Vec<T> {
        self.mutate(|s| s.prune_first(count))
    }

    /// Removes the first `count` elements, deep-disposing them.
    pub fn prune_first_and_dispose(&self, count: usize) {
        dispose_all(self.prune_first(count));
    }

    /// Removes the last `count` elements.
    pub fn prune_last(&self, count: usize) -> Vec<T> {
        self.mutate(|s| s.prune_last(count))
    }

    /// Removes the last `count` elements, deep-disposing them.
    pub fn prune_last_and_dispose(&self, count: usize) {
        dispose_all(self.prune_last(count));
    }

    /// Keeps only the first `count` elements, returning the rest.
    pub fn keep_first(&self, count: usize) -> Vec<T> {
        self.mutate(|s| s.keep_first(count))
    }

    /// Keeps only the first `count` elements, deep-disposing the rest.
    pub fn keep_first_and_dispose(&self, count: usize) {
        dispose_all(self.keep_first(count));
    }

    /// Keeps only the last `count` elements, returning the rest.
    pub fn keep_last(&self, count: usize) -> Vec<T> {
        self.mutate(|s| s.keep_last(count))
    }

    /// Keeps only the last `count` elements, deep-disposing the rest.
    pub fn keep_last_and_dispose(&self, count: usize) {
        dispose_all(self.keep_last(count));
    }

    /// Removes every element, returning them in order.
    pub fn wipe_out(&self) -> Vec<T> {
        self.mutate(|s| s.wipe_out())
    }

    /// Removes and deep-disposes every element.
    pub fn wipe_out_and_dispose(&self) {
        dispose_all(self.wipe_out());
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Sorts with a three-way comparator by relinking nodes, and moves all
    /// cursors off.
    pub fn sort(&self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.mutate(|s| s.sort_by(compare));
    }

    // ========================================================================
    // Whole-container operations
    // ========================================================================

    /// Returns a list whose elements are deep clones of this one's.
    pub fn deep_clone(&self) -> Self {
        let state = self.lock();
        Self::from_vec(state.chain.iter().map(T::deep_clone).collect())
    }

    /// Replaces this list's contents with shallow copies of `other`'s.
    ///
    /// Moves all of this list's cursors off. The previous elements are
    /// dropped, not deep-disposed.
    pub fn copy(&self, other: &LinkedList<T>) {
        let old = self.copy_with(other, T::clone);
        drop(old);
    }

    /// Replaces this list's contents with deep clones of `other`'s,
    /// deep-disposing the previous elements.
    pub fn deep_copy(&self, other: &LinkedList<T>) {
        dispose_all(self.copy_with(other, T::deep_clone));
    }

    fn copy_with(&self, other: &LinkedList<T>, copy: impl Fn(&T) -> T) -> Vec<T> {
        match lock_pair(&self.inner, &other.inner) {
            Pair::Same(_) => Vec::new(),
            Pair::Distinct(mut dst, src) => {
                let values = src.chain.iter().map(copy).collect();
                let old = dst.reset(values);
                contract::invariant(|| dst.is_consistent(), "linked list");
                old
            }
        }
    }

    /// Returns `true` if `other` is this list, or both hold pairwise
    /// shallow-equal elements.
    pub fn is_equal(&self, other: &LinkedList<T>) -> bool {
        self.compare_with(other, T::shallow_eq)
    }

    /// Returns `true` if `other` is this list, or both hold pairwise
    /// deep-equal elements.
    pub fn is_deep_equal(&self, other: &LinkedList<T>) -> bool {
        self.compare_with(other, T::deep_eq)
    }

    fn compare_with(&self, other: &LinkedList<T>, eq: impl Fn(&T, &T) -> bool) -> bool {
        match lock_pair(&self.inner, &other.inner) {
            Pair::Same(_) => true,
            Pair::Distinct(a, b) => {
                a.len() == b.len() && a.chain.iter().zip(b.chain.iter()).all(|(x, y)| eq(x, y))
            }
        }
    }

    /// Consumes the list, deep-disposing every element.
    pub fn deep_dispose(self) {
        dispose_all(self.inner.into_inner().chain.into_vec());
    }
}

fn dispose_all<T: Element>(values: Vec<T>) {
    values.into_iter().for_each(T::deep_dispose);
}

/// Shallow clone: same elements (via `Clone`), fresh nodes, cursors and
/// identity.
impl<T: Element> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        Self::from_vec(self.as_vec())
    }
}

impl<T: Element> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<T: Element> From<Vec<T>> for LinkedList<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T: Element> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("LinkedList")
            .field("id", &self.id())
            .field("items", &DebugChain(&state))
            .finish()
    }
}

struct DebugChain<'a, T>(&'a LinkedState<T>);

impl<T: fmt::Debug> fmt::Debug for DebugChain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.chain.iter()).finish()
    }
}
