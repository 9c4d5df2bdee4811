use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nexus_guarded::{ArrayList, Element, LinkedList};

/// Element that counts deep clones and deep disposals in shared counters.
#[derive(Clone, Debug)]
struct Tracked {
    value: u32,
    clones: Arc<AtomicUsize>,
    disposals: Arc<AtomicUsize>,
}

impl Element for Tracked {
    fn sentinel() -> Self {
        Tracked {
            value: 0,
            clones: Arc::default(),
            disposals: Arc::default(),
        }
    }

    fn shallow_eq(&self, other: &Self) -> bool {
        self.value == other.value
    }

    fn deep_eq(&self, other: &Self) -> bool {
        self.value == other.value
    }

    fn deep_clone(&self) -> Self {
        self.clones.fetch_add(1, Ordering::Relaxed);
        self.clone()
    }

    fn deep_dispose(self) {
        self.disposals.fetch_add(1, Ordering::Relaxed);
    }
}

struct Counters {
    clones: Arc<AtomicUsize>,
    disposals: Arc<AtomicUsize>,
}

impl Counters {
    fn new() -> Self {
        Counters {
            clones: Arc::default(),
            disposals: Arc::default(),
        }
    }

    fn make(&self, value: u32) -> Tracked {
        Tracked {
            value,
            clones: Arc::clone(&self.clones),
            disposals: Arc::clone(&self.disposals),
        }
    }

    fn many(&self, n: u32) -> Vec<Tracked> {
        (0..n).map(|v| self.make(v)).collect()
    }

    fn clones(&self) -> usize {
        self.clones.load(Ordering::Relaxed)
    }

    fn disposals(&self) -> usize {
        self.disposals.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Deep family
// =============================================================================

#[test]
fn array_deep_operations_touch_each_element_once() {
    let c = Counters::new();
    let a = ArrayList::from_vec(c.many(5));

    let b = a.deep_clone();
    assert_eq!(c.clones(), 5);
    assert!(a.is_deep_equal(&b));

    a.remove_first_and_dispose();
    a.prune_and_dispose(0, 2);
    assert_eq!(c.disposals(), 3);

    a.replace_and_dispose(c.make(99), 0);
    assert_eq!(c.disposals(), 4);

    // Two survivors in `a` are disposed, five clones land in it.
    a.deep_copy(&b);
    assert_eq!(c.clones(), 10);
    assert_eq!(c.disposals(), 6);

    a.wipe_out_and_dispose();
    assert_eq!(c.disposals(), 11);

    b.deep_dispose();
    assert_eq!(c.disposals(), 16);
}

#[test]
fn linked_deep_operations_touch_each_element_once() {
    let c = Counters::new();
    let l = LinkedList::from_vec(c.many(6));

    l.start();
    l.remove_at_and_dispose();
    l.remove_right_and_dispose();
    assert_eq!(c.disposals(), 2);

    l.keep_first_and_dispose(2);
    assert_eq!(c.disposals(), 4);
    assert_eq!(l.count(), 2);

    let copy = l.deep_clone();
    assert_eq!(c.clones(), 2);

    l.start();
    l.replace_at_and_dispose(c.make(42));
    assert_eq!(c.disposals(), 5);
    assert!(!l.is_deep_equal(&copy));

    l.deep_dispose();
    assert_eq!(c.disposals(), 7);
    drop(copy);
    assert_eq!(c.disposals(), 7);
}

// =============================================================================
// Shallow family
// =============================================================================

#[test]
fn shallow_operations_never_deep_dispose() {
    let c = Counters::new();
    let a = ArrayList::from_vec(c.many(4));
    let b = a.clone();

    a.remove(0);
    a.prune(0, 1);
    a.copy(&b);
    a.wipe_out();
    drop(a);
    drop(b);

    assert_eq!(c.clones(), 0);
    assert_eq!(c.disposals(), 0);
}

#[test]
fn shared_handles_differ_between_families() {
    let x = Arc::new(String::from("a"));
    let a = LinkedList::from_vec(vec![Arc::clone(&x)]);

    let shallow = a.clone();
    let deep = a.deep_clone();

    assert!(Arc::ptr_eq(&shallow.item(0), &x));
    assert!(!Arc::ptr_eq(&deep.item(0), &x));
    assert!(a.has(&x));
    assert!(!deep.has(&x));
    assert!(deep.deep_has(&x));
    assert_eq!(deep.deep_occurrences(&x), 1);
    assert_eq!(deep.occurrences(&x), 0);
}
