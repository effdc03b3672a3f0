//! Retained rendering tree with selective refresh
//!
//!     This crate turns a parse tree (weft-tree's ParseNode) into live output
//!     nodes through a pluggable Dom backend, keeps the widget tree that
//!     produced them, and re-renders only the parts whose inputs changed.
//!
//! Architecture
//!
//!     - Widget trait: behavior of one node kind (execute, render, refresh)
//!     - WidgetTree: arena of widget nodes, owns the render and refresh walks
//!     - WidgetRegistry: name -> widget factory discovery
//!     - Dom trait: output adapter; FakeDom is the headless backend for tests
//!     - Store trait: the record database widgets read from; refresh is driven
//!       by the set of records that changed since the last cycle
//!
//!     The file structure :
//!     .
//!     ├── dom.rs                  # Dom trait and DomError
//!     ├── error.rs                # WidgetError, Diagnostic
//!     ├── event.rs                # WidgetEvent, bubbling dispatch, actions
//!     ├── fakedom.rs              # In-memory Dom backend
//!     ├── registry.rs             # WidgetRegistry
//!     ├── scope.rs                # Variable bindings and text substitution
//!     ├── store.rs                # Store trait, MemoryStore, ChangedRecords
//!     ├── testing.rs              # Fixture and assertion helpers
//!     ├── tree.rs                 # WidgetTree arena and walks
//!     ├── widget.rs               # Widget trait, RefreshOutcome
//!     ├── widgets
//!     │   ├── <kind>.rs           # One built-in widget per file
//!     │   └── mod.rs
//!     ├── lib.rs
//!
//! Refresh model
//!
//!     A refresh cycle takes a ChangedRecords set and walks the tree top
//!     down. Each widget decides for its own node whether nothing changed,
//!     its output can be patched in place, or the subtree must be rebuilt.
//!     A rebuild replaces the node's output at its old position and does not
//!     descend further; anything cheaper descends into the children.
//!
//! Error policy
//!
//!     A widget that fails to set up degrades to an empty placeholder and
//!     records a Diagnostic; rendering continues. Only output adapter
//!     failures propagate, and only a failure at the root aborts a render.

pub mod dom;
pub mod error;
pub mod event;
pub mod fakedom;
pub mod registry;
pub mod scope;
pub mod store;
pub mod testing;
pub mod tree;
pub mod widget;
pub mod widgets;

pub use dom::{Dom, DomError, DomId};
pub use error::{Diagnostic, WidgetError};
pub use event::{EventHandler, WidgetEvent};
pub use fakedom::{FakeDom, SharedDom};
pub use registry::{WidgetFactory, WidgetRegistry};
pub use scope::{VariableBinding, VariableInfo, VariableOptions, VariableParam};
pub use store::{Change, ChangedRecords, MemoryStore, Record, Store};
pub use tree::{WidgetId, WidgetTree};
pub use widget::{PlaceholderWidget, RefreshOutcome, Widget};
