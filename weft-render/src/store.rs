//! Data store boundary and the changed-record set
//!
//!     The renderer reads record fields through the [Store] trait and never
//!     writes. The store itself is owned outside the tree and mutated by
//!     external collaborators between refresh cycles; each cycle is driven by
//!     a [ChangedRecords] diff naming the records that were modified or
//!     deleted since the last one.
//!
//!     [MemoryStore] is the reference implementation: a title-keyed map of
//!     field maps behind a `RefCell`, shared with the tree through an `Rc` so
//!     test and host code can mutate it through their own handle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Read-only view of the record store, as the renderer sees it.
pub trait Store {
    /// Value of `field` on the record titled `title`, if both exist.
    fn field(&self, title: &str, field: &str) -> Option<String>;
    fn contains(&self, title: &str) -> bool;
}

/// One record: a flat map of named string fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// A record whose `text` field holds the given value.
    pub fn text(value: impl Into<String>) -> Self {
        Record::new().field("text", value)
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// In-memory record store with interior mutability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn insert(&self, title: impl Into<String>, record: Record) {
        self.records.borrow_mut().insert(title.into(), record);
    }

    /// Set one field, creating the record if it does not exist.
    pub fn set_field(&self, title: &str, field: impl Into<String>, value: impl Into<String>) {
        self.records
            .borrow_mut()
            .entry(title.to_string())
            .or_default()
            .fields
            .insert(field.into(), value.into());
    }

    pub fn remove(&self, title: &str) {
        self.records.borrow_mut().remove(title);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl Store for MemoryStore {
    fn field(&self, title: &str, field: &str) -> Option<String> {
        self.records.borrow().get(title)?.fields.get(field).cloned()
    }

    fn contains(&self, title: &str) -> bool {
        self.records.borrow().contains_key(title)
    }
}

/// How a record changed within one refresh cycle. Exactly one kind per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Modified,
    Deleted,
}

/// The per-cycle diff handed to [refresh](crate::tree::WidgetTree::refresh).
/// Immutable for the duration of the cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangedRecords {
    entries: HashMap<String, Change>,
}

impl ChangedRecords {
    pub fn new() -> Self {
        ChangedRecords::default()
    }

    pub fn modified(mut self, title: impl Into<String>) -> Self {
        self.entries.insert(title.into(), Change::Modified);
        self
    }

    pub fn deleted(mut self, title: impl Into<String>) -> Self {
        self.entries.insert(title.into(), Change::Deleted);
        self
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    pub fn change(&self, title: &str) -> Option<Change> {
        self.entries.get(title).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Change)> {
        self.entries.iter().map(|(title, &c)| (title.as_str(), c))
    }
}
