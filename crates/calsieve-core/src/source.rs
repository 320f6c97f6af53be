//! Event sources: where the pipeline's input events come from.
//!
//! Sources are read once per build. Fetch and parse failures surface as
//! `SieveError::SourceUnavailable` and abort the build.

use crate::error::{Result, SieveError};
use crate::event::Event;
use std::path::PathBuf;
use tracing::debug;

/// A finite, ordered supply of events.
pub trait EventSource {
    /// Short description used in logs and error messages.
    fn name(&self) -> String;

    /// # Errors
    /// Returns `SieveError::SourceUnavailable` if the events cannot be
    /// fetched or parsed.
    fn events(&self) -> Result<Vec<Event>>;
}

/// A fixed list of events. The returned events are handles to the stored
/// ones, so pipeline mutations are visible through this list afterwards.
impl EventSource for Vec<Event> {
    fn name(&self) -> String {
        "static".to_string()
    }

    fn events(&self) -> Result<Vec<Event>> {
        Ok(self.clone())
    }
}

/// iCalendar text held in memory.
#[derive(Debug, Clone)]
pub struct IcsText {
    pub name: String,
    pub text: String,
}

impl IcsText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl EventSource for IcsText {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn events(&self) -> Result<Vec<Event>> {
        parse_ics(&self.name, &self.text)
    }
}

/// An iCalendar file on disk.
#[derive(Debug, Clone)]
pub struct IcsFile {
    pub path: PathBuf,
}

impl IcsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for IcsFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn events(&self) -> Result<Vec<Event>> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| SieveError::SourceUnavailable {
            name: self.name(),
            message: format!("failed to read file: {}", e),
        })?;
        parse_ics(&self.name(), &text)
    }
}

/// An iCalendar document fetched with a blocking HTTP GET.
#[derive(Debug, Clone)]
pub struct IcsUrl {
    pub url: String,
}

impl IcsUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl EventSource for IcsUrl {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn events(&self) -> Result<Vec<Event>> {
        let unavailable = |message: String| SieveError::SourceUnavailable {
            name: self.url.clone(),
            message,
        };

        debug!(url = %self.url, "fetching calendar");
        // Non-2xx statuses come back as errors from `call`.
        let mut response = ureq::get(&self.url)
            .call()
            .map_err(|e| unavailable(format!("HTTP request failed: {}", e)))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| unavailable(format!("failed to read response: {}", e)))?;

        parse_ics(&self.url, &body)
    }
}

/// Parse the events of the first `VCALENDAR` in `text`.
///
/// Folded lines are unfolded first. Each content line is split on its first
/// `:`; the part before it (parameters included) becomes the field name.
/// Components nested inside an event (`VALARM`, ...) are skipped.
///
/// # Errors
/// Returns `SieveError::SourceUnavailable` if there is no complete
/// `VCALENDAR` in the text, or if it ends inside a `VEVENT`.
pub fn parse_ics(name: &str, text: &str) -> Result<Vec<Event>> {
    let unfolded = unfold(text);

    let mut in_calendar = false;
    let mut current: Option<Event> = None;
    // Depth of components nested inside the current event.
    let mut nested = 0usize;
    let mut events = Vec::new();

    for line in unfolded.lines() {
        let line = line.trim_end_matches('\r');
        let Some((field, content)) = line.split_once(':') else {
            continue;
        };

        if nested > 0 {
            match field {
                "BEGIN" => nested += 1,
                "END" => nested -= 1,
                _ => {}
            }
            continue;
        }

        match (field, content) {
            ("BEGIN", "VCALENDAR") if !in_calendar => in_calendar = true,
            ("BEGIN", "VEVENT") if in_calendar && current.is_none() => {
                current = Some(Event::new());
            }
            ("BEGIN", _) if current.is_some() => nested = 1,
            ("END", "VEVENT") => {
                if let Some(event) = current.take() {
                    events.push(event);
                }
            }
            ("END", "VCALENDAR") if in_calendar => {
                if current.is_some() {
                    return Err(SieveError::SourceUnavailable {
                        name: name.to_string(),
                        message: "unterminated VEVENT".to_string(),
                    });
                }
                debug!(source = name, events = events.len(), "parsed VCALENDAR");
                return Ok(events);
            }
            _ => {
                if let Some(event) = &current {
                    event.write_field(field, content, true);
                }
            }
        }
    }

    let message = if in_calendar {
        "unterminated VCALENDAR".to_string()
    } else {
        "no VCALENDAR found".to_string()
    };
    Err(SieveError::SourceUnavailable {
        name: name.to_string(),
        message,
    })
}

/// Join folded content lines (a line break followed by one space or tab).
fn unfold(text: &str) -> String {
    text.replace("\r\n ", "")
        .replace("\r\n\t", "")
        .replace("\n ", "")
        .replace("\n\t", "")
}
