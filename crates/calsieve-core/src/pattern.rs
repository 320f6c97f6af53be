//! Predicate trees evaluated against a single event.
//!
//! Evaluation never mutates the event and never fails: `InTime` treats an
//! event without usable start/end times as "not in the window".

use crate::event::Event;
use crate::time::Time;

/// A boolean expression over an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// True iff every child is true. Empty → true.
    And(Vec<Pattern>),
    /// True iff any child is true. Empty → false.
    Or(Vec<Pattern>),
    Not(Box<Pattern>),
    /// True iff `text` is a substring of some field's text.
    ///
    /// `fields: None` searches every field on the event; `Some(list)` only
    /// the listed fields that are present. `Some(vec![])` never matches.
    HasText {
        text: String,
        fields: Option<Vec<String>>,
    },
    /// True iff the event's `[start, end)` overlaps `[start, end)` of the
    /// window. Touching boundaries do not overlap.
    InTime { start: Time, end: Time },
}

impl Pattern {
    pub fn not(pattern: Pattern) -> Self {
        Pattern::Not(Box::new(pattern))
    }

    /// `HasText` over every field.
    pub fn has_text(text: impl Into<String>) -> Self {
        Pattern::HasText {
            text: text.into(),
            fields: None,
        }
    }

    /// `HasText` restricted to `fields`.
    pub fn has_text_in<I, S>(text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Pattern::HasText {
            text: text.into(),
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    pub fn in_time(start: Time, end: Time) -> Self {
        Pattern::InTime { start, end }
    }

    pub fn resolve(&self, event: &Event) -> bool {
        match self {
            Pattern::And(patterns) => patterns.iter().all(|p| p.resolve(event)),
            Pattern::Or(patterns) => patterns.iter().any(|p| p.resolve(event)),
            Pattern::Not(pattern) => !pattern.resolve(event),
            Pattern::HasText { text, fields } => event.any_field(|name, value| {
                let selected = match fields {
                    Some(fields) => fields.iter().any(|f| f == name),
                    None => true,
                };
                selected && value.contains(text.as_str())
            }),
            Pattern::InTime { start, end } => {
                // Missing or malformed DTSTART/DTEND means "cannot tell", which
                // is reported as no overlap.
                match (event.get_start_time(), event.get_end_time()) {
                    (Ok(event_start), Ok(event_end)) => event_start < *end && event_end > *start,
                    _ => false,
                }
            }
        }
    }
}
