//! Value contract for container elements.
//!
//! Containers move values in and hand clones out. How a value is copied,
//! compared and released depends on which family of operation the caller
//! picks:
//!
//! ```text
//! shallow family   Clone::clone      Element::shallow_eq   drop
//! deep family      Element::deep_clone  Element::deep_eq   Element::deep_dispose
//! ```
//!
//! For plain values the two families coincide. For shared handles such as
//! [`Arc`] they differ: a shallow copy shares the pointee, a deep copy
//! allocates a fresh one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nexus_guarded::Element;
//!
//! let a = Arc::new(String::from("order"));
//! let shallow = a.clone();
//! let deep = a.deep_clone();
//!
//! assert!(a.shallow_eq(&shallow));
//! assert!(!a.shallow_eq(&deep));
//! assert!(a.deep_eq(&deep));
//! ```

use std::sync::Arc;

/// Per-element operations used by the containers.
///
/// `Clone` is the shallow copy. The remaining methods define the deep
/// family and the sentinel handed out when a cursor has nothing to show.
///
/// # Implementing
///
/// ```
/// use nexus_guarded::Element;
///
/// #[derive(Clone, Debug)]
/// struct Order {
///     id: u64,
///     qty: u64,
/// }
///
/// impl Element for Order {
///     fn sentinel() -> Self {
///         Order { id: 0, qty: 0 }
///     }
///
///     fn shallow_eq(&self, other: &Self) -> bool {
///         self.id == other.id
///     }
///
///     fn deep_eq(&self, other: &Self) -> bool {
///         self.id == other.id && self.qty == other.qty
///     }
/// }
/// ```
pub trait Element: Clone {
    /// Default value reported by capability accessors on an off cursor.
    fn sentinel() -> Self;

    /// Reference-level equality.
    fn shallow_eq(&self, other: &Self) -> bool;

    /// Content-level equality.
    fn deep_eq(&self, other: &Self) -> bool;

    /// Produces an independent copy of the value and everything it owns.
    #[inline]
    fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Releases the value and everything it owns.
    #[inline]
    fn deep_dispose(self) {
        drop(self);
    }
}

macro_rules! impl_plain_element {
    ($($ty:ty => $sentinel:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                #[inline]
                fn sentinel() -> Self {
                    $sentinel
                }

                #[inline]
                fn shallow_eq(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn deep_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_plain_element! {
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    i128 => 0,
    isize => 0,
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    u128 => 0,
    usize => 0,
    f32 => 0.0,
    f64 => 0.0,
    bool => false,
    char => '\0',
    String => String::new(),
}

impl<T: Element> Element for Box<T> {
    #[inline]
    fn sentinel() -> Self {
        Box::new(T::sentinel())
    }

    #[inline]
    fn shallow_eq(&self, other: &Self) -> bool {
        (**self).shallow_eq(other)
    }

    #[inline]
    fn deep_eq(&self, other: &Self) -> bool {
        (**self).deep_eq(other)
    }

    #[inline]
    fn deep_clone(&self) -> Self {
        Box::new((**self).deep_clone())
    }

    #[inline]
    fn deep_dispose(self) {
        (*self).deep_dispose();
    }
}

impl<T: Element> Element for Arc<T> {
    #[inline]
    fn sentinel() -> Self {
        Arc::new(T::sentinel())
    }

    /// Identity: both handles point at the same allocation.
    #[inline]
    fn shallow_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }

    #[inline]
    fn deep_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other) || (**self).deep_eq(other)
    }

    #[inline]
    fn deep_clone(&self) -> Self {
        Arc::new((**self).deep_clone())
    }

    /// Disposes the pointee only when this was the last handle.
    #[inline]
    fn deep_dispose(self) {
        if let Ok(inner) = Arc::try_unwrap(self) {
            inner.deep_dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_families_coincide() {
        assert!(24i32.shallow_eq(&24));
        assert!(24i32.deep_eq(&24));
        assert_eq!(13u64.deep_clone(), 13);
        assert_eq!(i32::sentinel(), 0);
        assert_eq!(String::sentinel(), "");
    }

    #[test]
    fn arc_shallow_is_identity() {
        let a = Arc::new(7i32);
        let b = Arc::new(7i32);

        assert!(a.shallow_eq(&a.clone()));
        assert!(!a.shallow_eq(&b));
        assert!(a.deep_eq(&b));
    }

    #[test]
    fn arc_deep_clone_allocates() {
        let a = Arc::new(String::from("x"));
        let b = a.deep_clone();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(Arc::strong_count(&a), 1);
    }

    #[test]
    fn box_delegates_to_pointee() {
        let a = Box::new(Arc::new(1u8));
        let b = a.clone();
        let c = a.deep_clone();

        assert!(a.shallow_eq(&b));
        assert!(!a.shallow_eq(&c));
        assert!(a.deep_eq(&c));
    }
}
