//! Auxiliary cursors over a [`LinkedList`].

use core::fmt;

use super::LinkedList;
use crate::Element;
use crate::registry::CursorKey;

/// An independent position in a [`LinkedList`].
///
/// The cursor holds a handle to its node rather than an index, so edits
/// elsewhere in the list never move it. Every operation locks the list.
/// Dropping the cursor unregisters it.
///
/// # Example
///
/// ```
/// use nexus_guarded::LinkedList;
///
/// let list = LinkedList::from_vec(vec![10, 20, 30]);
/// let cursor = list.cursor();
///
/// cursor.go(1);
/// list.put_first(5);
///
/// assert_eq!(cursor.item(), Some(20));
/// assert_eq!(cursor.index(), Some(2));
/// ```
pub struct LinkedCursor<'a, T: Element> {
    list: &'a LinkedList<T>,
    key: CursorKey,
}

impl<'a, T: Element> LinkedCursor<'a, T> {
    pub(super) fn new(list: &'a LinkedList<T>, key: CursorKey) -> Self {
        Self { list, key }
    }

    /// Returns the list this cursor belongs to.
    #[inline]
    pub fn list(&self) -> &'a LinkedList<T> {
        self.list
    }

    /// Returns a clone of the element under the cursor.
    pub fn item(&self) -> Option<T> {
        self.list.lock().item_at(self.key).cloned()
    }

    /// Returns the cursor's index, or `None` if off. Walks from the first node.
    pub fn index(&self) -> Option<usize> {
        self.list.lock().index(self.key)
    }

    /// Returns `true` if the cursor is off.
    pub fn off(&self) -> bool {
        self.list.lock().item_at(self.key).is_none()
    }

    /// Returns `true` if the cursor is on the first node.
    pub fn is_first(&self) -> bool {
        self.list.lock().is_first(self.key)
    }

    /// Returns `true` if the cursor is on the last node.
    pub fn is_last(&self) -> bool {
        self.list.lock().is_last(self.key)
    }

    /// Moves to the first node (off if empty).
    pub fn start(&self) {
        self.list.mutate(|s| s.start(self.key));
    }

    /// Moves to the last node (off if empty).
    pub fn finish(&self) {
        self.list.mutate(|s| s.finish(self.key));
    }

    /// Advances, going off past the last node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn forth(&self) {
        self.list.mutate(|s| s.forth(self.key));
    }

    /// Steps back, going off before the first node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn back(&self) {
        self.list.mutate(|s| s.back(self.key));
    }

    /// Moves to `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count`.
    pub fn go(&self, index: usize) {
        self.list.mutate(|s| s.go(self.key, index));
    }

    /// Replaces the element under the cursor, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn replace(&self, value: T) -> T {
        self.list.mutate(|s| s.replace_at(self.key, value))
    }

    /// Removes the node under the cursor. This cursor, and any other on the
    /// same node, moves to the successor or off if the node was last.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn remove(&self) -> T {
        self.list.mutate(|s| s.remove_at(self.key))
    }

    /// Inserts `value` before the cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_left(&self, value: T) {
        self.list.mutate(|s| s.put_left(self.key, value));
    }

    /// Inserts `value` after the cursor's node.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_right(&self, value: T) {
        self.list.mutate(|s| s.put_right(self.key, value));
    }
}

impl<T: Element> Drop for LinkedCursor<'_, T> {
    fn drop(&mut self) {
        self.list.lock().cursors.detach(self.key);
    }
}

impl<T: Element> fmt::Debug for LinkedCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedCursor")
            .field("list", &self.list.id())
            .field("index", &self.index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::LinkedList;

    #[test]
    fn shared_node_retargets_both_cursors() {
        let l = LinkedList::from_vec(vec![24, 13, 7]);
        let a = l.cursor();
        let b = l.cursor();
        a.go(1);
        b.go(1);

        assert_eq!(a.remove(), 13);
        assert_eq!(a.item(), Some(7));
        assert_eq!(b.item(), Some(7));

        b.remove();
        assert!(a.off());
        assert!(b.off());
        assert_eq!(l.as_vec(), vec![24]);
    }

    #[test]
    fn insertion_keeps_node() {
        let l = LinkedList::from_vec(vec![1, 2]);
        let c = l.cursor();
        c.finish();

        c.put_left(9);
        l.put_first(0);
        c.put_right(3);

        assert_eq!(l.as_vec(), vec![0, 1, 9, 2, 3]);
        assert_eq!(c.item(), Some(2));
        assert!(!c.is_last());
        c.forth();
        assert!(c.is_last());
    }

    #[test]
    fn walk_both_ways() {
        let l = LinkedList::from_vec(vec![1, 2, 3]);
        let c = l.cursor();
        c.finish();

        let mut seen = Vec::new();
        while let Some(v) = c.item() {
            seen.push(v);
            c.back();
        }
        assert_eq!(seen, vec![3, 2, 1]);
        assert!(c.off());
    }

    #[test]
    fn drop_unregisters() {
        let l: LinkedList<u8> = LinkedList::new();
        let c = l.cursor();
        assert_eq!(l.cursor_count(), 2);
        drop(c);
        assert_eq!(l.cursor_count(), 1);
    }

    #[test]
    #[should_panic(expected = "cursor is off")]
    fn forth_when_off_panics() {
        let l = LinkedList::from_vec(vec![1]);
        l.cursor().forth();
    }
}
