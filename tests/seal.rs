use ferrous_container::{Container, Lifetime, Resolver};
use std::sync::Arc;

#[test]
fn test_bind_after_seal_is_ignored() {
    let mut container = Container::new();
    container.bind(Lifetime::Factory, || 1u8);
    container.seal();

    assert!(container.is_sealed());
    assert!(!container.bind(Lifetime::Factory, || 2u16));
    assert!(!container.contains::<u16>());
    assert!(container.get::<u16>().is_none());
    assert_eq!(*container.get_required::<u8>(), 1);
}

#[test]
fn test_provide_after_seal_is_ignored() {
    let value = Arc::new(String::from("late"));
    let mut container = Container::new();
    container.seal();

    assert!(!container.provide(&value));
    assert!(container.get::<String>().is_none());
    assert_eq!(Arc::strong_count(&value), 1);
}

#[test]
fn test_seal_is_idempotent() {
    let mut container = Container::new();
    container.seal();
    container.seal();
    assert!(container.is_sealed());
}

#[test]
fn test_duplicate_bind_keeps_first() {
    let mut container = Container::new();
    assert!(container.bind(Lifetime::Singleton, || String::from("first")));
    assert!(!container.bind(Lifetime::Singleton, || String::from("second")));
    assert!(!container.bind(Lifetime::Factory, || String::from("third")));

    assert_eq!(container.get_required::<String>().as_str(), "first");
    assert_eq!(container.binding_count(), 1);
}

#[test]
fn test_provide_conflicts_with_bind() {
    let value = Arc::new(5u64);
    let mut container = Container::new();
    container.bind(Lifetime::Singleton, || 9u64);

    assert!(!container.provide(&value));
    assert_eq!(*container.get_required::<u64>(), 9);
}

#[test]
fn test_resolution_before_seal() {
    let mut container = Container::new();
    container.bind(Lifetime::Factory, || 3i32);
    assert!(!container.is_sealed());
    assert_eq!(*container.get_required::<i32>(), 3);
}
