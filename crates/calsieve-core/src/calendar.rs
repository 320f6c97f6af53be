//! The ordered output of a pipeline build, plus renderers for it.

use crate::error::Result;
use crate::event::Event;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

const PRODID: &str = "-//calsieve//calsieve//EN";
// RFC 5545 §3.1: content lines SHOULD NOT exceed 75 octets.
const MAX_LINE_OCTETS: usize = 75;

/// An ordered sequence of events. Order is the order the pipeline produced
/// them; no deduplication is performed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    pub events: Vec<Event>,
}

impl Calendar {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Render as an iCalendar document with CRLF line endings.
    ///
    /// Fields are written as `FIELD:text`, so parameters kept in the field
    /// name (`DTSTART;TZID=...`) survive a read/write cycle. Line breaks inside
    /// a field are written as the `\n` escape; nothing else is escaped.
    pub fn to_ics(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, "BEGIN:VCALENDAR");
        push_line(&mut out, "VERSION:2.0");
        push_line(&mut out, &format!("PRODID:{}", PRODID));
        for event in &self.events {
            push_line(&mut out, "BEGIN:VEVENT");
            for (field, text) in event.entries() {
                let line = format!("{}:{}", escape_breaks(&field), escape_breaks(&text));
                push_line(&mut out, &line);
            }
            push_line(&mut out, "END:VEVENT");
        }
        push_line(&mut out, "END:VCALENDAR");
        out
    }

    /// Render as a pretty-printed JSON array of objects, one per event, with
    /// field order preserved.
    pub fn to_json(&self) -> Result<String> {
        let events: Vec<Value> = self
            .events
            .iter()
            .map(|event| {
                let map: Map<String, Value> = event
                    .entries()
                    .into_iter()
                    .map(|(field, text)| (field, Value::String(text)))
                    .collect();
                Value::Object(map)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&Value::Array(events))?)
    }
}

/// Append one content line, folding it at 75 octets without splitting a
/// UTF-8 sequence. Continuation lines start with a single space.
/// Replace CRLF, CR and LF with the two-character `\n` escape so a value
/// always stays on one content line.
fn escape_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("\r\n", "\\n")
            .replace(['\r', '\n'], "\\n"),
    )
}

fn push_line(out: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;
    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        // The leading space counts towards the next line's length.
        limit = MAX_LINE_OCTETS - 1;
    }
    out.push_str(rest);
    out.push_str("\r\n");
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calendar:")?;
        for event in &self.events {
            writeln!(f)?;
            event.write_indented(f, 1)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Calendar {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
