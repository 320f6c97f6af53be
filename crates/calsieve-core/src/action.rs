//! Transform trees mapping one event to zero or more events.

use crate::event::Event;
use crate::pipeline::fan_out;
use serde::{Deserialize, Serialize};

/// How [`Action::AddEvent`] hands out its stored event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddEventPolicy {
    /// Every resolve returns a handle to the same stored event. A later
    /// mutation of any survivor is visible through all of them, including
    /// future resolves of the same action.
    #[default]
    Shared,
    /// Every resolve returns a fresh deep copy of the stored event.
    Copy,
}

/// A transformation applied to an [`Event`].
///
/// Results are ordered and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Apply each stage to every event produced by the previous stage.
    /// No stages is the identity.
    Multiple(Vec<Action>),
    /// Delete a field; absent fields are ignored.
    RemoveField(String),
    /// Write a field, replacing existing text only if `overwrite` is set.
    WriteField {
        field: String,
        text: String,
        overwrite: bool,
    },
    /// Drop the event.
    RemoveEvent,
    /// Keep the event and append `event` after it.
    AddEvent { event: Event, policy: AddEventPolicy },
}

impl Action {
    pub fn remove_field(field: impl Into<String>) -> Self {
        Action::RemoveField(field.into())
    }

    /// `WriteField` with `overwrite` set, the form the rule DSL produces.
    pub fn write_field(field: impl Into<String>, text: impl Into<String>) -> Self {
        Action::WriteField {
            field: field.into(),
            text: text.into(),
            overwrite: true,
        }
    }

    /// `AddEvent` with the default (shared) policy.
    pub fn add_event(event: Event) -> Self {
        Action::AddEvent {
            event,
            policy: AddEventPolicy::default(),
        }
    }

    pub fn resolve(&self, event: Event) -> Vec<Event> {
        match self {
            Action::Multiple(stages) => stages
                .iter()
                .fold(vec![event], |population, stage| {
                    fan_out(population, |e| stage.resolve(e))
                }),
            Action::RemoveField(field) => {
                event.remove_field(field);
                vec![event]
            }
            Action::WriteField {
                field,
                text,
                overwrite,
            } => {
                event.write_field(field.as_str(), text.as_str(), *overwrite);
                vec![event]
            }
            Action::RemoveEvent => Vec::new(),
            Action::AddEvent {
                event: to_add,
                policy,
            } => {
                let added = match policy {
                    AddEventPolicy::Shared => to_add.clone(),
                    AddEventPolicy::Copy => to_add.detached(),
                };
                vec![event, added]
            }
        }
    }
}
