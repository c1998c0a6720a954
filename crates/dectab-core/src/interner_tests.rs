use std::cmp::Ordering;

use crate::Interner;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern(b"foo");
    let b = interner.intern(b"foo");
    let c = interner.intern(b"bar");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();

    let sym = interner.intern(b"hello");
    assert_eq!(interner.resolve(sym), b"hello");
}

#[test]
fn cmp_is_content_order() {
    let mut interner = Interner::new();

    let z = interner.intern(b"z");
    let a = interner.intern(b"a");

    // Inserted z first, but content order puts a before z.
    assert_eq!(interner.cmp(a, z), Ordering::Less);
    assert_eq!(interner.cmp(z, a), Ordering::Greater);
    assert_eq!(interner.cmp(a, a), Ordering::Equal);
}

#[test]
fn cmp_length_tiebreak() {
    let mut interner = Interner::new();

    let short = interner.intern(b"ab");
    let long = interner.intern(b"abc");

    assert_eq!(interner.cmp(short, long), Ordering::Less);
}

#[test]
fn display_is_lossy() {
    let mut interner = Interner::new();

    let ok = interner.intern(b"plain");
    let bad = interner.intern(&[0xff, 0xfe]);

    assert_eq!(interner.display(ok), "plain");
    assert!(!interner.display(bad).is_empty());
}

#[test]
fn iter_yields_all_strings() {
    let mut interner = Interner::new();
    let a = interner.intern(b"alpha");
    let b = interner.intern(b"beta");

    let items: Vec<_> = interner.iter().collect();
    assert_eq!(items, vec![(a, b"alpha".as_slice()), (b, b"beta".as_slice())]);
}
