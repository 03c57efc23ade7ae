//! Tests for receiver parsing, the namespace tree and target resolution.

extern crate callbridge;

use callbridge::resolver::{resolve, resolve_path, Member, Namespace, Receiver};
use callbridge::BridgeError;
use serde_json::{json, Value};

fn tree() -> Namespace {
    let mut root = Namespace::new();
    root.register_fn("now", |_cx, _args: Vec<Value>| Ok(json!(0)))
        .unwrap();
    root.register_fn("a.b.c", |_cx, _args: Vec<Value>| Ok(json!("c")))
        .unwrap();
    root
}

#[test]
fn test_parse_receiver() {
    assert_eq!(Receiver::parse("this").unwrap(), Receiver::Root);
    assert_eq!(
        Receiver::parse("a.b").unwrap(),
        Receiver::Path(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(
        Receiver::parse("thisObj").unwrap(),
        Receiver::Path(vec!["thisObj".to_string()])
    );
    assert_eq!(Receiver::parse("$v8d._x1").unwrap().segments().len(), 2);
}

#[test]
fn test_parse_invalid_receiver() {
    for text in &["", "a..b", ".a", "a.", "1abc", "a b", "a-b"] {
        assert!(
            matches!(Receiver::parse(text), Err(BridgeError::InvalidReceiver { .. })),
            "expected InvalidReceiver for {:?}",
            text
        );
    }
}

#[test]
fn test_resolve_root() {
    let root = tree();
    let target = resolve(&root, "this", "now").unwrap();
    assert!(std::ptr::eq(target.owner, &root));
    assert_eq!(target.member, "now");
    assert!(target.handler().is_some());
}

#[test]
fn test_resolve_nested() {
    let root = tree();
    let target = resolve(&root, "a.b", "c").unwrap();
    assert_eq!(target.member, "c");
    assert!(target.handler().is_some());

    let missing = resolve(&root, "a.b", "d").unwrap();
    assert!(missing.lookup().is_none());
}

#[test]
fn test_resolve_missing_segment() {
    let root = tree();
    match resolve(&root, "a.x", "c") {
        Err(BridgeError::UnresolvedReceiver { receiver, segment }) => {
            assert_eq!(receiver, "a.x");
            assert_eq!(segment, "x");
        }
        other => panic!("expected UnresolvedReceiver, got {:?}", other),
    }
}

#[test]
fn test_resolve_through_handler_fails() {
    let root = tree();
    assert!(matches!(
        resolve(&root, "now", "x"),
        Err(BridgeError::UnresolvedReceiver { .. })
    ));
}

#[test]
fn test_resolve_path() {
    let root = tree();
    let target = resolve_path(&root, "a.b.c").unwrap();
    assert_eq!(target.member, "c");
    assert!(target.handler().is_some());

    let top = resolve_path(&root, "now").unwrap();
    assert!(std::ptr::eq(top.owner, &root));

    assert!(matches!(
        resolve_path(&root, "this"),
        Err(BridgeError::InvalidReceiver { .. })
    ));
}

#[test]
fn test_register_creates_namespaces() {
    let root = tree();
    assert!(matches!(root.member("a"), Some(Member::Namespace(_))));
    let b = root.child("a").and_then(|a| a.child("b")).unwrap();
    assert!(matches!(b.member("c"), Some(Member::Handler(_))));
}

#[test]
fn test_register_through_handler_fails() {
    let mut root = tree();
    let result = root.register_fn("now.later", |_cx, _args: Vec<Value>| Ok(Value::Null));
    assert!(matches!(result, Err(BridgeError::Registration(_))));
}

#[test]
fn test_register_invalid_path() {
    let mut root = Namespace::new();
    let result = root.register_fn("a..b", |_cx, _args: Vec<Value>| Ok(Value::Null));
    assert!(matches!(result, Err(BridgeError::InvalidReceiver { .. })));
}

#[test]
fn test_slots() {
    let mut root = tree();
    assert_eq!(root.get("greeting"), None);
    root.set("greeting", json!("hello")).unwrap();
    assert_eq!(root.get("greeting"), Some(json!("hello")));
    root.set("greeting", json!(1)).unwrap();
    assert_eq!(root.get("greeting"), Some(json!(1)));

    assert!(matches!(root.set("now", json!(1)), Err(BridgeError::Registration(_))));
    assert!(matches!(root.set("a", json!(1)), Err(BridgeError::Registration(_))));
    assert_eq!(root.get("now"), None);
}
