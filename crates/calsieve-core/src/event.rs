//! Calendar events: named text fields behind a shared, mutable handle.
//!
//! An [`Event`] is a cheap handle. Cloning it does not copy the fields; both
//! clones observe every later `write_field`/`remove_field`. This is how actions
//! mutate events in place as they flow through a pipeline. Use
//! [`Event::detached`] when an independent copy is needed.

use crate::error::{Result, SieveError};
use crate::time::Time;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Field holding the event start, in `YYYYMMDDThhmmssZ` form.
pub const DTSTART: &str = "DTSTART";
/// Field holding the event end, in `YYYYMMDDThhmmssZ` form.
pub const DTEND: &str = "DTEND";

/// A calendar event: field name → field text, in insertion order.
///
/// Field names are unique. Insertion order is kept for display and
/// serialization only; equality ignores it.
#[derive(Clone, Default)]
pub struct Event {
    // Key-value pairs in insertion order; events are small, lookups are linear.
    fields: Rc<RefCell<Vec<(String, String)>>>,
}

impl Event {
    /// An event with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event from `(field, text)` pairs.
    ///
    /// A repeated field keeps the position of its first occurrence and the
    /// text of its last.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let event = Self::new();
        for (field, text) in fields {
            event.write_field(field, text, true);
        }
        event
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.borrow().iter().any(|(name, _)| name == field)
    }

    /// Tolerant accessor: the field's text, or `None` if absent.
    pub fn field_text(&self, field: &str) -> Option<String> {
        self.fields
            .borrow()
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, text)| text.clone())
    }

    /// Strict accessor.
    ///
    /// # Errors
    /// Returns `SieveError::MissingField` if the event lacks `field`.
    pub fn get_field_text(&self, field: &str) -> Result<String> {
        self.field_text(field)
            .ok_or_else(|| SieveError::MissingField(field.to_string()))
    }

    /// Field names in insertion order.
    pub fn get_fields(&self) -> Vec<String> {
        self.fields
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Snapshot of all `(field, text)` pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.fields.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// True if `f(field, text)` holds for at least one field.
    pub fn any_field<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.fields
            .borrow()
            .iter()
            .any(|(name, text)| f(name, text))
    }

    /// Start time derived from `DTSTART`.
    ///
    /// # Errors
    /// Returns `SieveError::InvalidTime` if `DTSTART` is missing or malformed.
    pub fn get_start_time(&self) -> Result<Time> {
        self.time_field(DTSTART, "a start")
    }

    /// End time derived from `DTEND`.
    ///
    /// # Errors
    /// Returns `SieveError::InvalidTime` if `DTEND` is missing or malformed.
    pub fn get_end_time(&self) -> Result<Time> {
        self.time_field(DTEND, "an end")
    }

    fn time_field(&self, field: &str, what: &str) -> Result<Time> {
        let text = self.field_text(field).ok_or_else(|| {
            SieveError::InvalidTime(format!("event does not have {} time ({})", what, field))
        })?;
        Time::parse(&text).map_err(|_| {
            SieveError::InvalidTime(format!(
                "{} '{}' is not in format YYYYMMDDThhmmssZ",
                field, text
            ))
        })
    }

    /// Delete `field` if present; absent fields are not an error.
    pub fn remove_field(&self, field: &str) {
        self.fields.borrow_mut().retain(|(name, _)| name != field);
    }

    /// Set `field` to `text`.
    ///
    /// If the field already exists it is only replaced when `overwrite` is
    /// true, and it keeps its position.
    pub fn write_field(&self, field: impl Into<String>, text: impl Into<String>, overwrite: bool) {
        let field = field.into();
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) if overwrite => slot.1 = text.into(),
            Some(_) => {}
            None => fields.push((field, text.into())),
        }
    }

    /// A deep copy that shares nothing with `self`.
    pub fn detached(&self) -> Self {
        Self {
            fields: Rc::new(RefCell::new(self.entries())),
        }
    }

    /// True if both handles point at the same underlying event.
    pub fn shares_with(&self, other: &Event) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }

    pub(crate) fn write_indented(&self, f: &mut fmt::Formatter<'_>, tabs: usize) -> fmt::Result {
        write!(f, "{}Event:", "\t".repeat(tabs))?;
        for (field, text) in self.fields.borrow().iter() {
            write!(f, "\n{}{}: {}", "\t".repeat(tabs + 1), field, text)?;
        }
        Ok(())
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        if self.shares_with(other) {
            return true;
        }
        let ours = self.fields.borrow();
        let theirs = other.fields.borrow();
        ours.len() == theirs.len()
            && ours
                .iter()
                .all(|(name, text)| theirs.iter().any(|(n, t)| n == name && t == text))
    }
}

impl Eq for Event {}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.borrow();
        f.debug_map()
            .entries(fields.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
