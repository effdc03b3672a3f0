//! Built-in widget classes
//!
//!     One module per widget kind, each registered by
//!     [WidgetRegistry::with_defaults](crate::registry::WidgetRegistry::with_defaults):
//!
//!     | Type | Behavior |
//!     |------|----------|
//!     | `container` | renders only its children, no output of its own |
//!     | `element` | generic element; patches attributes in place |
//!     | `text` | literal text node; static |
//!     | `value` | a record field from the store; patches its text |
//!     | `vars` | binds its attributes as variables for its subtree |
//!     | `list` | one subtree per record title; rebuilds on membership change |
//!     | `action-message` | dispatches an event when invoked as an action |

pub mod action;
pub mod container;
pub mod element;
pub mod list;
pub mod text;
pub mod value;
pub mod vars;

pub use action::ActionMessageWidget;
pub use container::ContainerWidget;
pub use element::ElementWidget;
pub use list::ListWidget;
pub use text::TextWidget;
pub use value::ValueWidget;
pub use vars::VarsWidget;
