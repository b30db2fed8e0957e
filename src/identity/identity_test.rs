use super::*;

#[test]
fn node_in_root_namespace() {
    let node = NodeName::new("talker", "/").unwrap();

    assert_eq!(node.namespace(), "/");
    assert_eq!(node.fully_qualified_name(), "/talker");
}

#[test]
fn empty_namespace_means_root() {
    let node = NodeName::new("talker", "").unwrap();

    assert_eq!(node.namespace(), "/");
    assert_eq!(node.fully_qualified_name(), "/talker");
}

#[test]
fn nested_namespace_trailing_separator_is_dropped() {
    let node = NodeName::new("driver", "/fleet/robot1/").unwrap();

    assert_eq!(node.name(), "driver");
    assert_eq!(node.namespace(), "/fleet/robot1");
    assert_eq!(node.fully_qualified_name(), "/fleet/robot1/driver");
}

#[test]
fn relative_namespace_is_invalid_state() {
    let err = NodeName::new("driver", "fleet").unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn name_with_separator_is_invalid_state() {
    assert!(NodeName::new("a/b", "/").unwrap_err().is_invalid_state());
    assert!(NodeName::new("", "/").unwrap_err().is_invalid_state());
}

#[test]
fn join_path_never_doubles_separator() {
    assert_eq!(join_path("/", "foo"), "/foo");
    assert_eq!(join_path("/ns", "foo"), "/ns/foo");
    assert_eq!(join_path("/ns/", "foo/bar"), "/ns/foo/bar");
}
