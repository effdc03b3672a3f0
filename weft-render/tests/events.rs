//! Integration tests for event dispatch and action invocation
//!
//! Tests bubbling through the widget hierarchy, listener replacement, and
//! the action walk driven by action-message nodes.

use std::cell::RefCell;
use std::rc::Rc;

use weft_render::testing::{mount, mount_with_store};
use weft_render::{
    ChangedRecords, EventHandler, MemoryStore, Record, WidgetEvent, WidgetId, WidgetTree,
};
use weft_tree::{Attribute, ParseNode};

/// Walk down a chain of only-children.
fn descend(tree: &WidgetTree, mut id: WidgetId, depth: usize) -> WidgetId {
    for _ in 0..depth {
        id = tree.children(id)[0];
    }
    id
}

#[test]
fn test_event_bubbles_to_ancestor_listener() {
    let mut mounted = mount(
        ParseNode::container()
            .child(ParseNode::container().child(ParseNode::element("button"))),
    );
    let root = mounted.tree.root().unwrap();
    let button = descend(&mounted.tree, root, 2);

    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "activate", move |event| {
        log.borrow_mut().push(event.param.clone().unwrap_or_default());
        true
    });

    let handled = mounted
        .tree
        .dispatch_event(button, &WidgetEvent::new("activate").with_param("go"));

    assert!(handled);
    assert_eq!(*seen.borrow(), vec!["go".to_string()]);
}

#[test]
fn test_nearest_listener_wins_when_it_handles() {
    let mut mounted = mount(ParseNode::container().child(ParseNode::container()));
    let root = mounted.tree.root().unwrap();
    let inner = descend(&mounted.tree, root, 1);

    let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let outer_log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "ping", move |_| {
        outer_log.borrow_mut().push("outer");
        true
    });
    let inner_log = Rc::clone(&seen);
    mounted.tree.add_event_listener(inner, "ping", move |_| {
        inner_log.borrow_mut().push("inner");
        true
    });

    assert!(mounted.tree.dispatch_event(inner, &WidgetEvent::new("ping")));
    assert_eq!(*seen.borrow(), vec!["inner"]);
}

#[test]
fn test_declining_listener_lets_the_event_continue_up() {
    let mut mounted = mount(ParseNode::container().child(ParseNode::container()));
    let root = mounted.tree.root().unwrap();
    let inner = descend(&mounted.tree, root, 1);

    let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let inner_log = Rc::clone(&seen);
    mounted.tree.add_event_listener(inner, "ping", move |_| {
        inner_log.borrow_mut().push("inner");
        false
    });
    let outer_log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "ping", move |_| {
        outer_log.borrow_mut().push("outer");
        true
    });

    assert!(mounted.tree.dispatch_event(inner, &WidgetEvent::new("ping")));
    assert_eq!(*seen.borrow(), vec!["inner", "outer"]);
}

#[test]
fn test_unhandled_event_is_dropped() {
    let mounted = mount(ParseNode::container());
    let root = mounted.tree.root().unwrap();
    assert!(!mounted.tree.dispatch_event(root, &WidgetEvent::new("ignored")));
}

#[test]
fn test_registering_again_replaces_the_listener() {
    let mut mounted = mount(ParseNode::container());
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "ping", move |_| {
        first.borrow_mut().push("first");
        true
    });
    let second = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "ping", move |_| {
        second.borrow_mut().push("second");
        true
    });

    mounted.tree.dispatch_event(root, &WidgetEvent::new("ping"));
    assert_eq!(*seen.borrow(), vec!["second"]);
}

#[test]
fn test_add_event_listeners_registers_a_batch() {
    let mut mounted = mount(ParseNode::container());
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let open_log = Rc::clone(&seen);
    let close_log = Rc::clone(&seen);
    let listeners: Vec<(String, EventHandler)> = vec![
        (
            "open".to_string(),
            Rc::new(move |event: &WidgetEvent| {
                open_log.borrow_mut().push(event.event_type.clone());
                true
            }),
        ),
        (
            "close".to_string(),
            Rc::new(move |event: &WidgetEvent| {
                close_log.borrow_mut().push(event.event_type.clone());
                true
            }),
        ),
    ];
    mounted.tree.add_event_listeners(root, listeners);

    assert!(mounted.tree.dispatch_event(root, &WidgetEvent::new("open")));
    assert!(mounted.tree.dispatch_event(root, &WidgetEvent::new("close")));
    assert_eq!(*seen.borrow(), vec!["open".to_string(), "close".to_string()]);
}

#[test]
fn test_listeners_survive_a_structural_rebuild() {
    let store = MemoryStore::shared();
    store.insert("Index", Record::text("A"));
    store.insert("A", Record::text("1"));
    store.insert("B", Record::text("2"));

    let mut mounted = mount_with_store(
        ParseNode::new("list").attr("from", "Index").child(
            ParseNode::new("value")
                .attribute("record", Attribute::macro_call("currentRecord", Vec::new())),
        ),
        store,
    );
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "ping", move |_| {
        *log.borrow_mut() += 1;
        true
    });
    assert!(mounted.tree.dispatch_event(root, &WidgetEvent::new("ping")));

    // A membership change rebuilds the node the listener sits on.
    mounted.store.set_field("Index", "text", "A B");
    assert!(mounted.tree.refresh(&ChangedRecords::new().modified("Index")));
    assert_eq!(mounted.dom.text_content(mounted.mount), "12");

    assert!(mounted.tree.dispatch_event(root, &WidgetEvent::new("ping")));
    assert_eq!(*seen.borrow(), 2);
}

#[test]
fn test_action_message_dispatches_from_its_own_position() {
    let mut mounted = mount(
        ParseNode::container().child(
            ParseNode::new("action-message")
                .attr("message", "notify")
                .attr("param", "p1")
                .attr("extra", "e1"),
        ),
    );
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<Vec<WidgetEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "notify", move |event| {
        log.borrow_mut().push(event.clone());
        true
    });

    let handled = mounted
        .tree
        .invoke_actions(root, root, &WidgetEvent::new("click"));

    assert!(handled);
    let events = seen.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "notify");
    assert_eq!(events[0].param.as_deref(), Some("p1"));
    assert_eq!(events[0].params.get("extra").map(String::as_str), Some("e1"));
    assert!(events[0].origin.is_some());
}

#[test]
fn test_action_without_own_param_forwards_the_triggering_param() {
    let mut mounted = mount(
        ParseNode::container()
            .child(ParseNode::new("action-message").attr("message", "notify")),
    );
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "notify", move |event| {
        log.borrow_mut().push(event.param.clone());
        true
    });

    mounted
        .tree
        .invoke_actions(root, root, &WidgetEvent::new("click").with_param("carried"));

    assert_eq!(*seen.borrow(), vec![Some("carried".to_string())]);
}

#[test]
fn test_handled_action_short_circuits_its_branch_but_not_siblings() {
    // The first action nests another; a handled action stops its own branch,
    // so the nested one never runs, while the sibling branch still does.
    let mut mounted = mount(ParseNode::container().with_children(vec![
        ParseNode::new("action-message")
            .attr("message", "outer")
            .child(ParseNode::new("action-message").attr("message", "nested")),
        ParseNode::new("action-message").attr("message", "sibling"),
    ]));
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    for name in ["outer", "nested", "sibling"] {
        let log = Rc::clone(&seen);
        mounted.tree.add_event_listener(root, name, move |event| {
            log.borrow_mut().push(event.event_type.clone());
            true
        });
    }

    assert!(mounted.tree.invoke_actions(root, root, &WidgetEvent::new("go")));
    assert_eq!(*seen.borrow(), vec!["outer".to_string(), "sibling".to_string()]);
}

#[test]
fn test_non_action_nodes_are_walked_through() {
    // The action sits below a plain element; the walk descends through it.
    let mut mounted = mount(
        ParseNode::element("div")
            .child(ParseNode::new("action-message").attr("message", "notify")),
    );
    let root = mounted.tree.root().unwrap();

    let seen: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
    let log = Rc::clone(&seen);
    mounted.tree.add_event_listener(root, "notify", move |_| {
        *log.borrow_mut() += 1;
        true
    });

    assert!(mounted.tree.invoke_actions(root, root, &WidgetEvent::new("go")));
    assert_eq!(*seen.borrow(), 1);
}
