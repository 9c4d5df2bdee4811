use nexus_guarded::{
    ArrayList, Capability, DIterable, Dispatch, Element, Indexable, Iterable, LinkedList, Operation,
};

/// Routes a numeric operation id through the capability traits, the way an
/// id-driven caller would.
fn run_iterable<T: Element>(it: &dyn DIterable<T>, id: u8) -> Option<String> {
    let op = Operation::lookup(Capability::DIterable, id)?;
    let out = match op {
        Operation::Count => it.count().to_string(),
        Operation::Off => it.off().to_string(),
        Operation::IsEmpty => it.is_empty().to_string(),
        Operation::Start => {
            it.start();
            String::new()
        }
        Operation::Forth => {
            it.forth();
            String::new()
        }
        Operation::Finish => {
            it.finish();
            String::new()
        }
        Operation::Back => {
            it.back();
            String::new()
        }
        Operation::ItemAt => return Some(String::from("item")),
        _ => return None,
    };
    Some(out)
}

fn collect<T: Element>(it: &dyn Iterable<T>) -> Vec<T> {
    let mut out = Vec::new();
    it.start();
    while !it.off() {
        out.push(it.item_at());
        it.forth();
    }
    out
}

fn max_index<T: Element + PartialOrd>(ix: &dyn Indexable<T>) -> Option<usize> {
    (0..ix.count()).reduce(|best, i| if ix.item(i) > ix.item(best) { i } else { best })
}

#[test]
fn containers_are_interchangeable() {
    let a = ArrayList::from_vec(vec![3, 9, 4]);
    let l = LinkedList::from_vec(vec![3, 9, 4]);

    let sources: [&dyn Dispatch<i32>; 2] = [&a, &l];
    for d in sources {
        assert!(Capability::ALL.into_iter().all(|c| d.supports(c)));
        assert_eq!(collect(d.iterable().unwrap()), vec![3, 9, 4]);
        assert_eq!(max_index(d.indexable().unwrap()), Some(1));
    }
}

#[test]
fn id_routing() {
    let l = LinkedList::from_vec(vec![1u8, 2]);
    let it = l.diterable().unwrap();

    assert_eq!(run_iterable(it, 0).as_deref(), Some("2"));
    assert_eq!(run_iterable(it, 2).as_deref(), Some("true"));
    run_iterable(it, 6);
    assert_eq!(l.item_at(), Some(2));
    run_iterable(it, 7);
    assert_eq!(l.item_at(), Some(1));
    assert_eq!(run_iterable(it, 8), None);
}

#[test]
fn empty_container_reports_sentinel() {
    let a: ArrayList<u64> = ArrayList::new();
    let it = a.iterable().unwrap();
    it.start();
    assert!(it.off());
    assert!(it.is_empty());
    assert_eq!(it.item_at(), 0);
}
