//! Integration tests for initial materialization
//!
//! Tests the render walk end to end against the headless backend:
//! - Output ordering and nesting for mixed pass-through and element nodes
//! - Attribute resolution for every attribute kind
//! - Variable scoping through vars nodes and initial bindings
//! - Degradation of failing nodes without aborting siblings

use std::rc::Rc;

use rstest::rstest;
use weft_render::testing::{assert_dom, mount, mount_with_store, Mounted};
use weft_render::{
    MemoryStore, Record, SharedDom, VariableParam, WidgetError, WidgetRegistry, WidgetTree,
};
use weft_tree::{Attribute, MacroParam, ParseNode};

#[test]
fn test_element_with_text_child() {
    let mounted = mount(
        ParseNode::element("p")
            .attr("class", "intro")
            .child(ParseNode::text("hello")),
    );

    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child_count(1).child(0, |p| {
        p.tag("p").attribute("class", "intro").child_count(1).child(0, |t| {
            t.text("hello");
        });
    });
}

#[test]
fn test_children_render_in_order_through_pass_through_nodes() {
    // The middle child renders no output node of its own; its children must
    // still land between the siblings' output.
    let mounted = mount(ParseNode::container().with_children(vec![
        ParseNode::text("a"),
        ParseNode::container()
            .child(ParseNode::text("b"))
            .child(ParseNode::text("c")),
        ParseNode::text("d"),
    ]));

    assert_eq!(mounted.dom.text_content(mounted.mount), "abcd");
    assert_eq!(mounted.dom.inner().child_ids(mounted.mount).len(), 4);
}

#[test]
fn test_nested_elements() {
    let mounted = mount(
        ParseNode::element("ul")
            .child(ParseNode::element("li").child(ParseNode::text("one")))
            .child(ParseNode::element("li").child(ParseNode::text("two"))),
    );

    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child(0, |ul| {
        ul.tag("ul")
            .child_count(2)
            .child(0, |li| {
                li.tag("li").text_content("one");
            })
            .child(1, |li| {
                li.tag("li").text_content("two");
            });
    });
}

#[test]
fn test_namespaced_element() {
    let mounted = mount(
        ParseNode::element("svg").attr("xmlns", "http://www.w3.org/2000/svg"),
    );

    let dom = mounted.dom.inner();
    let svg = dom.child_ids(mounted.mount)[0];
    assert_eq!(dom.namespace(svg), Some("http://www.w3.org/2000/svg"));
    assert_eq!(dom.tag(svg), Some("svg"));
}

#[rstest]
#[case(Attribute::string("plain"), "plain")]
#[case(Attribute::number(42.0), "42")]
#[case(Attribute::number(2.5), "2.5")]
#[case(Attribute::boolean(true), "true")]
#[case(Attribute::boolean(false), "false")]
fn test_literal_attribute_kinds_resolve_to_text(
    #[case] attribute: Attribute,
    #[case] expected: &str,
) {
    let mounted = mount(ParseNode::element("div").attribute("data-x", attribute));
    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child(0, |div| {
        div.attribute("data-x", expected);
    });
}

#[test]
fn test_unknown_node_type_renders_placeholder_and_continues() {
    let mounted = mount(ParseNode::container().with_children(vec![
        ParseNode::text("before"),
        ParseNode::new("sparkle"),
        ParseNode::text("after"),
    ]));

    // Siblings are unaffected, the unknown node occupies an empty slot.
    assert_eq!(mounted.dom.text_content(mounted.mount), "beforeafter");
    assert_eq!(mounted.dom.inner().child_ids(mounted.mount).len(), 3);

    let diagnostics = mounted.tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0].error,
        WidgetError::UnknownNodeType { ref type_name } if type_name == "sparkle"
    ));
}

#[test]
fn test_value_widget_renders_store_field() {
    let store = MemoryStore::shared();
    store.insert("Greeting", Record::text("hello").field("lang", "en"));

    let mounted = mount_with_store(
        ParseNode::container()
            .child(ParseNode::new("value").attr("record", "Greeting"))
            .child(ParseNode::new("value").attr("record", "Greeting").attr("field", "lang")),
        store,
    );

    assert_eq!(mounted.dom.text_content(mounted.mount), "helloen");
}

#[test]
fn test_value_widget_without_record_degrades() {
    let mounted = mount(ParseNode::container().with_children(vec![
        ParseNode::text("x"),
        ParseNode::new("value"),
        ParseNode::text("y"),
    ]));

    assert_eq!(mounted.dom.text_content(mounted.mount), "xy");
    let diagnostics = mounted.tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0].error, WidgetError::Setup { .. }));
}

#[test]
fn test_vars_binding_is_visible_to_subtree() {
    let mounted = mount(
        ParseNode::new("vars").attr("color", "red").child(
            ParseNode::element("span")
                .attribute("class", Attribute::macro_call("color", Vec::new()))
                .child(ParseNode::text("tinted")),
        ),
    );

    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child(0, |span| {
        span.tag("span").attribute("class", "red").text_content("tinted");
    });
}

#[test]
fn test_vars_binding_is_not_visible_to_siblings() {
    let mounted = mount(ParseNode::container().with_children(vec![
        ParseNode::new("vars").attr("color", "red"),
        ParseNode::element("span")
            .attribute("class", Attribute::macro_call("color", Vec::new())),
    ]));

    let dom = mounted.dom.inner();
    // The vars node emits no output of its own, so the span is the mount's
    // only child. Its unresolvable reference renders as empty and records a
    // diagnostic.
    assert_dom(&dom, mounted.mount).child_count(1).child(0, |span| {
        span.attribute("class", "");
    });
    assert_eq!(mounted.tree.diagnostics().len(), 1);
    assert!(matches!(
        mounted.tree.diagnostics()[0].error,
        WidgetError::AttributeResolution { .. }
    ));
}

#[test]
fn test_inner_binding_shadows_outer() {
    let mounted = mount(
        ParseNode::new("vars").attr("color", "red").child(
            ParseNode::new("vars").attr("color", "blue").child(
                ParseNode::element("span")
                    .attribute("class", Attribute::macro_call("color", Vec::new())),
            ),
        ),
    );

    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child(0, |span| {
        span.attribute("class", "blue");
    });
}

#[test]
fn test_macro_call_attribute_with_parameters() {
    // A parametrized lookup resolves through the scope chain with the call
    // site's actuals bound to the definition's declared parameters.
    let ast = ParseNode::element("span").attribute(
        "title",
        Attribute::macro_call(
            "greet",
            vec![MacroParam::positional("world"), MacroParam::named("mood", "!")],
        ),
    );

    let dom = SharedDom::new();
    let mount_point = dom.element("div");
    let mut tree = WidgetTree::new(
        ast,
        Rc::new(WidgetRegistry::with_defaults()),
        MemoryStore::shared(),
        Box::new(dom.clone()),
    );
    tree.render_into(mount_point, None).expect("render");
    let root = tree.root().expect("root");
    tree.set_variable(
        root,
        "greet",
        "hello $name$$mood$",
        vec![VariableParam::new("name"), VariableParam::new("mood")],
        false,
    );
    // Recompute with the binding in scope.
    tree.compute_attributes(root);
    assert_eq!(tree.attribute(root, "title"), Some("hello world!"));
}

#[test]
fn test_initial_variable_wraps_root() {
    let ast = ParseNode::element("div")
        .attribute("title", Attribute::macro_call("who", Vec::new()));

    let dom = SharedDom::new();
    let mount_point = dom.element("div");
    let mut tree = WidgetTree::new(
        ast,
        Rc::new(WidgetRegistry::with_defaults()),
        MemoryStore::shared(),
        Box::new(dom.clone()),
    )
    .with_variable("who", "world");
    tree.render_into(mount_point, None).expect("render");

    let inner = dom.inner();
    assert_dom(&inner, mount_point).child(0, |div| {
        div.attribute("title", "world");
    });
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn test_list_renders_one_subtree_per_title() {
    let store = MemoryStore::shared();
    store.insert("A", Record::text("1"));
    store.insert("B", Record::text("2"));
    store.insert("C", Record::text("3"));

    let mounted = mount_with_store(
        ParseNode::new("list").attr("of", "A B C").child(
            ParseNode::new("value")
                .attribute("record", Attribute::macro_call("currentRecord", Vec::new())),
        ),
        store,
    );

    assert_eq!(mounted.dom.text_content(mounted.mount), "123");
}

#[test]
fn test_list_custom_variable_name() {
    let store = MemoryStore::shared();
    store.insert("Only", Record::text("x"));

    let mounted = mount_with_store(
        ParseNode::new("list").attr("of", "Only").attr("variable", "item").child(
            ParseNode::element("span")
                .attribute("data-title", Attribute::macro_call("item", Vec::new())),
        ),
        store,
    );

    let dom = mounted.dom.inner();
    assert_dom(&dom, mounted.mount).child(0, |span| {
        span.attribute("data-title", "Only");
    });
}

#[test]
fn test_ancestor_count_and_qualifier_metadata() {
    let mounted = mount(
        ParseNode::container()
            .child(ParseNode::element("div").child(ParseNode::text("x")))
            .child(ParseNode::element("div")),
    );
    let tree = &mounted.tree;
    let root = tree.root().unwrap();
    let children = tree.children(root);
    let grandchild = tree.children(children[0])[0];

    assert_eq!(tree.ancestor_count(root), 0);
    assert_eq!(tree.ancestor_count(children[0]), 1);
    assert_eq!(tree.ancestor_count(grandchild), 2);

    // Same type, same parent, different position: distinct qualifiers.
    let first = tree.qualifier(children[0], "state");
    let second = tree.qualifier(children[1], "state");
    assert!(first.starts_with("state-"));
    assert_ne!(first, second);
    // The qualifier is a pure function of position, not of the prefix.
    assert_eq!(
        tree.qualifier(children[0], "other").strip_prefix("other"),
        first.strip_prefix("state")
    );
}

#[test]
fn test_rerender_clears_previous_output() {
    let mounted = mount(ParseNode::text("once"));
    let Mounted { mut tree, dom, mount: mount_point, .. } = mounted;

    tree.render_into(mount_point, None).expect("second render");
    assert_eq!(dom.text_content(mount_point), "once");
    assert_eq!(dom.inner().child_ids(mount_point).len(), 1);
}

#[test]
fn test_parse_tree_from_json_renders() {
    let ast: ParseNode = serde_json::from_value(serde_json::json!({
        "type": "element",
        "tag": "p",
        "attributes": {"class": {"type": "string", "value": "note"}},
        "children": [{"type": "text", "text": "loaded"}]
    }))
    .expect("parse tree should deserialize");

    let mounted = mount(ast);
    assert_eq!(
        mounted.dom.serialize(mounted.mount),
        r#"<div><p class="note">loaded</p></div>"#
    );
}
