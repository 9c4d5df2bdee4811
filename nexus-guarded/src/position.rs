//! Cursor positions with an "off" sentinel.
//!
//! A position either designates an element or is [`Position::OFF`]. Array
//! cursors hold an index (the off state is `usize::MAX`, the classic "-1"),
//! linked cursors hold a [`NodeHandle`].

/// Trait for cursor position types.
///
/// Mirrors the sentinel-key pattern used for node links: a reserved value
/// stands for "nothing" so positions stay `Copy` and fit in a machine word
/// or two.
///
/// # Example
///
/// ```
/// use nexus_guarded::Position;
///
/// let at: usize = 3;
/// assert!(at.is_on());
/// assert!(usize::OFF.is_off());
/// ```
pub trait Position: Copy + Eq + core::fmt::Debug {
    /// Sentinel for "not positioned on any element".
    const OFF: Self;

    /// Returns `true` if this is the sentinel.
    #[inline]
    fn is_off(&self) -> bool {
        *self == Self::OFF
    }

    /// Returns `true` if this designates an element.
    #[inline]
    fn is_on(&self) -> bool {
        !self.is_off()
    }

    /// Converts to `Option`, mapping the sentinel to `None`.
    #[inline]
    fn on(self) -> Option<Self> {
        if self.is_off() { None } else { Some(self) }
    }
}

impl Position for usize {
    const OFF: Self = usize::MAX;
}

/// Validated reference to a node in a linked chain.
///
/// `slot` locates the node in the chain's arena; `stamp` is the serial the
/// chain assigned when the node was created. Slots are reused after removal,
/// stamps are not, so a handle that outlived its node is detected rather than
/// silently aliasing the slot's new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub(crate) slot: usize,
    pub(crate) stamp: u64,
}

impl NodeHandle {
    #[inline]
    pub(crate) const fn new(slot: usize, stamp: u64) -> Self {
        Self { slot, stamp }
    }
}

impl Position for NodeHandle {
    const OFF: Self = NodeHandle {
        slot: usize::MAX,
        stamp: u64::MAX,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usize_sentinel() {
        assert!(usize::OFF.is_off());
        assert!(0usize.is_on());
        assert_eq!(5usize.on(), Some(5));
        assert_eq!(usize::OFF.on(), None);
    }

    #[test]
    fn node_handle_sentinel() {
        let h = NodeHandle::new(0, 0);
        assert!(h.is_on());
        assert!(NodeHandle::OFF.is_off());
        assert_ne!(h, NodeHandle::new(0, 1));
    }
}
