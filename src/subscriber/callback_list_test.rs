use std::cell::RefCell;
use std::sync::Arc;

use super::callback_list::walk;
use super::callback_list::CallbackList;
use super::callback_list::Registration;
use super::callback_list::Registry;
use super::*;
use crate::Parameter;
use crate::ParameterEvent;

fn event_handle(tag: &'static str) -> Arc<ParameterEventCallbackHandle> {
    Arc::new(ParameterEventCallbackHandle::new(Box::new(move |_: &ParameterEvent| {
        let _ = tag;
    })))
}

#[test]
fn push_front_keeps_newest_first() {
    let mut list = CallbackList::default();
    let a = event_handle("a");
    let b = event_handle("b");

    list.push_front(&a);
    list.push_front(&b);

    assert_eq!(list.len(), 2);
    assert_eq!(list.position(&b), Some(0));
    assert_eq!(list.position(&a), Some(1));
}

#[test]
fn remove_matches_by_identity() {
    let mut list = CallbackList::default();
    let a = event_handle("a");
    let lookalike = event_handle("a");
    list.push_front(&a);

    assert!(!list.remove(&lookalike));
    assert!(lookalike.is_registered());
    assert!(list.remove(&a));
    assert!(!a.is_registered());
    assert!(list.is_empty());
    assert!(!list.remove(&a));
}

#[test]
fn retire_all_clears_every_live_entry() {
    let mut list = CallbackList::default();
    let a = event_handle("a");
    let b = event_handle("b");
    list.push_front(&a);
    list.push_front(&b);
    {
        let dropped = event_handle("c");
        list.push_front(&dropped);
    }

    assert_eq!(list.retire_all(), 3);
    assert!(!a.is_registered());
    assert!(!b.is_registered());
}

#[test]
fn walk_visits_only_the_starting_entries() {
    let registry = RefCell::new(Registry::default());
    let a = event_handle("a");
    let b = event_handle("b");
    let c = event_handle("c");
    {
        let mut reg = registry.borrow_mut();
        reg.unkeyed.push_front(&c);
        reg.unkeyed.push_front(&b);
        reg.unkeyed.push_front(&a);
    }

    let late = event_handle("late");
    let mut seen = Vec::new();
    let visit = walk(
        &registry,
        |reg| Some(&mut reg.unkeyed),
        |handle: &ParameterEventCallbackHandle| {
            seen.push(handle as *const _);
            if std::ptr::eq(handle, Arc::as_ptr(&a)) {
                let mut reg = registry.borrow_mut();
                reg.unkeyed.remove(&a);
                reg.unkeyed.remove(&b);
                reg.unkeyed.push_front(&late);
            }
        },
    );

    assert_eq!(seen, vec![Arc::as_ptr(&a), Arc::as_ptr(&c)]);
    assert_eq!(visit.invoked, 2);
    assert_eq!(registry.borrow().unkeyed.position(&late), Some(0));
    assert_eq!(registry.borrow().unkeyed.len(), 2);
}

#[test]
fn walk_prunes_stale_entries_in_place() {
    let registry = RefCell::new(Registry::default());
    let a = event_handle("a");
    let c = event_handle("c");
    {
        let b = event_handle("b");
        let mut reg = registry.borrow_mut();
        reg.unkeyed.push_front(&a);
        reg.unkeyed.push_front(&b);
        reg.unkeyed.push_front(&c);
    }

    let mut seen = Vec::new();
    let visit = walk(
        &registry,
        |reg| Some(&mut reg.unkeyed),
        |handle: &ParameterEventCallbackHandle| seen.push(handle as *const _),
    );

    assert_eq!(seen, vec![Arc::as_ptr(&c), Arc::as_ptr(&a)]);
    assert_eq!(visit.invoked, 2);
    assert_eq!(visit.pruned, 1);
    assert_eq!(registry.borrow().unkeyed.len(), 2);
}

#[test]
fn walk_over_missing_bucket_does_nothing() {
    let registry = RefCell::new(Registry::default());
    let key = RegistrationKey::new("speed", "/robot1");

    let visit = walk(
        &registry,
        |reg| reg.keyed.get_mut(&key),
        |_: &ParameterCallbackHandle| panic!("no entries to invoke"),
    );

    assert_eq!(visit.invoked, 0);
    assert_eq!(visit.pruned, 0);
}

#[test]
fn reconcile_drops_empty_buckets_only() {
    let mut registry = Registry::default();
    let handle = Arc::new(ParameterCallbackHandle::new(
        RegistrationKey::new("speed", "/robot1"),
        Box::new(|_: &Parameter| {}),
    ));
    registry
        .keyed
        .entry(handle.key.clone())
        .or_default()
        .push_front(&handle);
    registry
        .keyed
        .entry(RegistrationKey::new("mode", "/robot1"))
        .or_default();

    registry.reconcile();

    assert_eq!(registry.keyed.len(), 1);
    assert!(registry.keyed.contains_key(handle.key()));
}
