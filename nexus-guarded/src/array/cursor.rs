//! Auxiliary cursors over an [`ArrayList`].

use core::fmt;

use super::ArrayList;
use crate::Element;
use crate::registry::CursorKey;

/// An independent position in an [`ArrayList`].
///
/// The cursor borrows its list, so the list outlives it. Every operation
/// locks the list. Dropping the cursor unregisters it.
///
/// # Example
///
/// ```
/// use nexus_guarded::ArrayList;
///
/// let list = ArrayList::from_vec(vec![10, 20, 30]);
/// let cursor = list.cursor();
///
/// cursor.go(1);
/// list.remove(1);
///
/// // The cursor follows its element's successor.
/// assert_eq!(cursor.item(), Some(30));
/// ```
pub struct ArrayCursor<'a, T: Element> {
    list: &'a ArrayList<T>,
    key: CursorKey,
}

impl<'a, T: Element> ArrayCursor<'a, T> {
    pub(super) fn new(list: &'a ArrayList<T>, key: CursorKey) -> Self {
        Self { list, key }
    }

    /// Returns the list this cursor belongs to.
    #[inline]
    pub fn list(&self) -> &'a ArrayList<T> {
        self.list
    }

    /// Returns a clone of the element under the cursor.
    pub fn item(&self) -> Option<T> {
        self.list.lock().item_at(self.key).cloned()
    }

    /// Returns the cursor's index, or `None` if off.
    pub fn index(&self) -> Option<usize> {
        self.list.lock().index(self.key)
    }

    /// Returns `true` if the cursor is off.
    pub fn off(&self) -> bool {
        self.index().is_none()
    }

    /// Returns `true` if the cursor is on the first element.
    pub fn is_first(&self) -> bool {
        self.list.lock().is_first(self.key)
    }

    /// Returns `true` if the cursor is on the last element.
    pub fn is_last(&self) -> bool {
        self.list.lock().is_last(self.key)
    }

    /// Moves to the first element (off if empty).
    pub fn start(&self) {
        self.list.mutate(|s| s.start(self.key));
    }

    /// Moves to the last element (off if empty).
    pub fn finish(&self) {
        self.list.mutate(|s| s.finish(self.key));
    }

    /// Advances, going off past the last element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn forth(&self) {
        self.list.mutate(|s| s.forth(self.key));
    }

    /// Steps back, going off before the first element.
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

    /// Removes the element under the cursor. The cursor moves to the
    /// successor, or off if the element was last.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn remove(&self) -> T {
        self.list.mutate(|s| s.remove_at(self.key))
    }

    /// Inserts `value` before the cursor's element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_left(&self, value: T) {
        self.list.mutate(|s| s.put_left(self.key, value));
    }

    /// Inserts `value` after the cursor's element.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is off.
    pub fn put_right(&self, value: T) {
        self.list.mutate(|s| s.put_right(self.key, value));
    }
}

impl<T: Element> Drop for ArrayCursor<'_, T> {
    fn drop(&mut self) {
        self.list.lock().cursors.detach(self.key);
    }
}

impl<T: Element> fmt::Debug for ArrayCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayCursor")
            .field("list", &self.list.id())
            .field("index", &self.index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ArrayList;

    #[test]
    fn cursors_are_independent() {
        let l = ArrayList::from_vec(vec![1, 2, 3]);
        let a = l.cursor();
        let b = l.cursor();

        a.start();
        b.finish();
        a.forth();

        assert_eq!(a.item(), Some(2));
        assert_eq!(b.item(), Some(3));
        assert!(l.off());
        assert_eq!(l.cursor_count(), 3);
    }

    #[test]
    fn drop_unregisters() {
        let l: ArrayList<i32> = ArrayList::new();
        {
            let _a = l.cursor();
            let _b = l.cursor();
            assert_eq!(l.cursor_count(), 3);
        }
        assert_eq!(l.cursor_count(), 1);
    }

    #[test]
    fn edits_through_cursor_move_other_cursors() {
        let l = ArrayList::from_vec(vec![1, 2, 3]);
        let a = l.cursor();
        let b = l.cursor();
        a.go(1);
        b.go(2);

        a.put_left(9);
        assert_eq!(l.as_vec(), vec![1, 9, 2, 3]);
        assert_eq!(a.index(), Some(2));
        assert_eq!(b.index(), Some(3));

        assert_eq!(a.remove(), 2);
        assert_eq!(a.item(), Some(3));
        assert_eq!(b.item(), Some(3));

        a.put_right(4);
        assert_eq!(l.as_vec(), vec![1, 9, 3, 4]);
        assert_eq!(a.replace(30), 3);
        assert_eq!(b.item(), Some(30));
    }

    #[test]
    fn bulk_change_moves_aux_cursors_off() {
        let l = ArrayList::from_vec(vec![4, 3, 2, 1]);
        let a = l.cursor();
        a.go(3);

        l.sort(|x, y| x.cmp(y));
        assert!(a.off());

        a.start();
        l.wipe_out();
        assert!(a.off());
    }

    #[test]
    #[should_panic(expected = "cursor is off")]
    fn remove_when_off_panics() {
        let l = ArrayList::from_vec(vec![1]);
        let a = l.cursor();
        a.remove();
    }
}
