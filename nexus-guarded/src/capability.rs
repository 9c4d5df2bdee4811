//! Capability groups for generic use of either container.
//!
//! A generic algorithm that only needs "something indexable" or "something
//! I can walk backwards" asks a container for the matching trait object
//! through [`Dispatch`]. Each group also carries stable numeric operation
//! ids, so callers that route by id can resolve them with
//! [`Operation::lookup`].
//!
//! # Example
//!
//! ```
//! use nexus_guarded::capability::{DIterable, Dispatch};
//! use nexus_guarded::{ArrayList, LinkedList};
//!
//! fn reversed<T: nexus_guarded::Element>(it: &dyn DIterable<T>) -> Vec<T> {
//!     let mut out = Vec::new();
//!     it.finish();
//!     while !it.off() {
//!         out.push(it.item_at());
//!         it.back();
//!     }
//!     out
//! }
//!
//! let a = ArrayList::from_vec(vec![1, 2, 3]);
//! let l = LinkedList::from_vec(vec![1, 2, 3]);
//!
//! assert_eq!(reversed(a.diterable().unwrap()), vec![3, 2, 1]);
//! assert_eq!(reversed(l.diterable().unwrap()), vec![3, 2, 1]);
//! ```

use crate::{ArrayList, Element, LinkedList};

/// A named group of operations a container may support.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    /// Dispose, clone, compare, copy.
    Basic = 0,
    /// Count, item by index, replace by index.
    Indexable = 1,
    /// Forward traversal with the built-in cursor.
    Iterable = 2,
    /// Forward and backward traversal with the built-in cursor.
    DIterable = 3,
}

impl Capability {
    /// Every capability, in id order.
    pub const ALL: [Capability; 4] = [
        Capability::Basic,
        Capability::Indexable,
        Capability::Iterable,
        Capability::DIterable,
    ];

    /// Returns the stable id.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the capability with `id`, or `None` if out of range.
    #[inline]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Returns the capability's operations, indexed by operation id.
    pub fn operations(self) -> &'static [Operation] {
        match self {
            Capability::Basic => &BASIC,
            Capability::Indexable => &INDEXABLE,
            Capability::Iterable => &DITERABLE[..ITERABLE_LEN],
            Capability::DIterable => &DITERABLE,
        }
    }
}

/// An operation within a capability group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`Basic::dispose`]
    Dispose,
    /// [`Basic::duplicate`]
    Clone,
    /// [`Basic::compare`]
    Compare,
    /// [`Basic::copy_from`]
    Copy,
    /// [`Indexable::count`] or [`Iterable::count`]
    Count,
    /// [`Indexable::item`]
    Item,
    /// [`Indexable::replace`]
    Replace,
    /// [`Iterable::item_at`]
    ItemAt,
    /// [`Iterable::off`]
    Off,
    /// [`Iterable::is_empty`]
    IsEmpty,
    /// [`Iterable::start`]
    Start,
    /// [`Iterable::forth`]
    Forth,
    /// [`DIterable::finish`]
    Finish,
    /// [`DIterable::back`]
    Back,
}

static BASIC: [Operation; 4] = [
    Operation::Dispose,
    Operation::Clone,
    Operation::Compare,
    Operation::Copy,
];

static INDEXABLE: [Operation; 3] = [Operation::Count, Operation::Item, Operation::Replace];

// Iterable is the prefix of DIterable.
const ITERABLE_LEN: usize = 6;

static DITERABLE: [Operation; 8] = [
    Operation::Count,
    Operation::ItemAt,
    Operation::Off,
    Operation::IsEmpty,
    Operation::Start,
    Operation::Forth,
    Operation::Finish,
    Operation::Back,
];

impl Operation {
    /// Resolves operation `id` within `capability`.
    ///
    /// Returns `None` when `id` is out of range for that group.
    #[inline]
    pub fn lookup(capability: Capability, id: u8) -> Option<Self> {
        capability.operations().get(id as usize).copied()
    }

    /// Returns this operation's id within `capability`, or `None` if the
    /// group does not contain it.
    pub fn id_in(self, capability: Capability) -> Option<u8> {
        capability
            .operations()
            .iter()
            .position(|&op| op == self)
            .map(|i| i as u8)
    }
}

// ============================================================================
// Capability traits
// ============================================================================

/// Whole-container operations. Shallow: elements are shared, not cloned.
pub trait Basic: Sized {
    /// Destroys the container without touching the elements' own resources.
    fn dispose(self);

    /// Returns a container with the same elements and fresh cursors.
    fn duplicate(&self) -> Self;

    /// Returns `true` if both hold pairwise shallow-equal elements.
    fn compare(&self, other: &Self) -> bool;

    /// Replaces this container's contents with `other`'s.
    fn copy_from(&self, other: &Self);
}

/// Random access by index.
pub trait Indexable<T> {
    /// Number of elements.
    fn count(&self) -> usize;

    /// Clone of the element at `index`. Panics if out of range.
    fn item(&self, index: usize) -> T;

    /// Replaces the element at `index`, returning the old one.
    fn replace(&self, value: T, index: usize) -> T;
}

/// Forward traversal with the container's built-in cursor.
pub trait Iterable<T> {
    /// Number of elements.
    fn count(&self) -> usize;

    /// Element under the cursor, or [`Element::sentinel`] when off.
    fn item_at(&self) -> T;

    /// Returns `true` if the cursor is off.
    fn off(&self) -> bool;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool;

    /// Moves the cursor to the first element.
    fn start(&self);

    /// Advances the cursor.
    fn forth(&self);
}

/// Bidirectional traversal with the container's built-in cursor.
pub trait DIterable<T>: Iterable<T> {
    /// Moves the cursor to the last element.
    fn finish(&self);

    /// Steps the cursor back.
    fn back(&self);
}

/// Capability queries for generic callers.
pub trait Dispatch<T> {
    /// Returns `true` if the container supports `capability`.
    fn supports(&self, capability: Capability) -> bool;

    /// The container as [`Indexable`], if supported.
    fn indexable(&self) -> Option<&dyn Indexable<T>>;

    /// The container as [`Iterable`], if supported.
    fn iterable(&self) -> Option<&dyn Iterable<T>>;

    /// The container as [`DIterable`], if supported.
    fn diterable(&self) -> Option<&dyn DIterable<T>>;
}

macro_rules! impl_capabilities {
    ($container:ident) => {
        impl<T: Element> Basic for $container<T> {
            fn dispose(self) {
                drop(self);
            }

            fn duplicate(&self) -> Self {
                self.clone()
            }

            fn compare(&self, other: &Self) -> bool {
                self.is_equal(other)
            }

            fn copy_from(&self, other: &Self) {
                self.copy(other);
            }
        }

        impl<T: Element> Indexable<T> for $container<T> {
            fn count(&self) -> usize {
                $container::count(self)
            }

            fn item(&self, index: usize) -> T {
                $container::item(self, index)
            }

            fn replace(&self, value: T, index: usize) -> T {
                $container::replace(self, value, index)
            }
        }

        impl<T: Element> Iterable<T> for $container<T> {
            fn count(&self) -> usize {
                $container::count(self)
            }

            fn item_at(&self) -> T {
                $container::item_at(self).unwrap_or_else(T::sentinel)
            }

            fn off(&self) -> bool {
                $container::off(self)
            }

            fn is_empty(&self) -> bool {
                $container::is_empty(self)
            }

            fn start(&self) {
                $container::start(self);
            }

            fn forth(&self) {
                $container::forth(self);
            }
        }

        impl<T: Element> DIterable<T> for $container<T> {
            fn finish(&self) {
                $container::finish(self);
            }

            fn back(&self) {
                $container::back(self);
            }
        }

        impl<T: Element> Dispatch<T> for $container<T> {
            #[inline]
            fn supports(&self, _capability: Capability) -> bool {
                true
            }

            fn indexable(&self) -> Option<&dyn Indexable<T>> {
                Some(self)
            }

            fn iterable(&self) -> Option<&dyn Iterable<T>> {
                Some(self)
            }

            fn diterable(&self) -> Option<&dyn DIterable<T>> {
                Some(self)
            }
        }
    };
}

impl_capabilities!(ArrayList);
impl_capabilities!(LinkedList);
