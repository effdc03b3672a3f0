//! Testing utilities for widget tree assertions
//!
//!     Rendering tests follow two rules:
//!
//!         1. Build fixtures through [mount] / [mount_with_store] so every
//!            test goes through the same registry, store and headless
//!            backend wiring.
//!         2. Assert output structure with [assert_dom] rather than spot
//!            checks, so a test fails loudly when the output tree gains or
//!            loses nodes it did not expect.
//!
//!     ```rust,ignore
//!     let mounted = mount(ParseNode::element("p").child(ParseNode::text("hi")));
//!     let dom = mounted.dom.inner();
//!     assert_dom(&dom, mounted.mount).child_count(1).child(0, |p| {
//!         p.tag("p").text_content("hi");
//!     });
//!     ```

use std::rc::Rc;

use weft_tree::ParseNode;

use crate::dom::DomId;
use crate::fakedom::{FakeDom, SharedDom};
use crate::registry::WidgetRegistry;
use crate::store::{MemoryStore, Store};
use crate::tree::WidgetTree;

/// A rendered fixture: the tree, the store and dom handles it renders
/// through, and the mount-point element.
pub struct Mounted {
    pub tree: WidgetTree,
    pub dom: SharedDom,
    pub store: Rc<MemoryStore>,
    pub mount: DomId,
}

/// Render `node` with the default registry against an empty store.
pub fn mount(node: ParseNode) -> Mounted {
    mount_with_store(node, MemoryStore::shared())
}

/// Render `node` with the default registry against the given store.
pub fn mount_with_store(node: ParseNode, store: Rc<MemoryStore>) -> Mounted {
    let dom = SharedDom::new();
    let mount = dom.element("div");
    let tree_store: Rc<dyn Store> = store.clone();
    let mut tree = WidgetTree::new(
        node,
        Rc::new(WidgetRegistry::with_defaults()),
        tree_store,
        Box::new(dom.clone()),
    );
    tree.render_into(mount, None).expect("root materialization");
    Mounted {
        tree,
        dom,
        store,
        mount,
    }
}

/// Entry point of the fluent output-tree assertions.
pub fn assert_dom<'a>(dom: &'a FakeDom, id: DomId) -> DomAssert<'a> {
    DomAssert { dom, id }
}

pub struct DomAssert<'a> {
    dom: &'a FakeDom,
    id: DomId,
}

impl<'a> DomAssert<'a> {
    pub fn tag(self, expected: &str) -> Self {
        assert_eq!(
            self.dom.tag(self.id),
            Some(expected),
            "expected element <{}>",
            expected
        );
        self
    }

    /// Literal text of a text node.
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(self.dom.text(self.id), Some(expected));
        self
    }

    /// Concatenated text of the whole subtree.
    pub fn text_content(self, expected: &str) -> Self {
        assert_eq!(self.dom.text_content(self.id), expected);
        self
    }

    pub fn attribute(self, name: &str, expected: &str) -> Self {
        assert_eq!(
            self.dom.attribute(self.id, name),
            Some(expected),
            "attribute '{}'",
            name
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.dom.child_ids(self.id);
        assert_eq!(
            children.len(),
            expected,
            "child count of {}",
            self.dom.serialize(self.id)
        );
        self
    }

    pub fn child(self, index: usize, f: impl FnOnce(DomAssert<'a>)) -> Self {
        let children = self.dom.child_ids(self.id);
        let child = *children
            .get(index)
            .unwrap_or_else(|| panic!("no child at index {}", index));
        f(DomAssert {
            dom: self.dom,
            id: child,
        });
        self
    }

    pub fn serialized(self, expected: &str) -> Self {
        assert_eq!(self.dom.serialize(self.id), expected);
        self
    }
}
