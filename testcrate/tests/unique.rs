use order_tree::Unique;

#[test]
fn tells_apart_equal_values() {
    let a = Unique::new(4);
    let b = Unique::new(4);
    assert!(a == b);
    assert!(a.value_eq(&b));
    assert!(!a.identity_eq(&b));
    assert!(a.identity_eq(&a));
    assert_ne!(a.id(), b.id());
    assert_eq!(a.value(), b.value());
}

#[test]
fn nulls_are_value_equal() {
    let a: Unique<Option<u8>> = Unique::new(None);
    let b: Unique<Option<u8>> = Unique::new(None);
    assert!(a.value_eq(&b));
    assert!(!a.identity_eq(&b));
    assert!(!a.value_eq(&Unique::new(Some(0))));
}

#[test]
fn access() {
    let mut a = Unique::new(String::from("x"));
    let id = a.id();
    a.value_mut().push('y');
    assert_eq!(a.value(), "xy");
    assert_eq!(a.replace(String::from("z")), "xy");
    assert_eq!(a.id(), id);

    let b = a.map(|s| s.len());
    assert_eq!(b.id(), id);
    assert_eq!(*b.value(), 1);
    assert_eq!(b.into_inner(), 1);
    let e = Unique::new(5);
    assert_eq!(format!("{e:?}"), format!("Unique({} => 5)", e.id()));
}
