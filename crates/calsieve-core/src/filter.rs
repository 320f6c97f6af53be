//! A pattern-gated action.

use crate::action::Action;
use crate::dsl;
use crate::error::Result;
use crate::event::Event;
use crate::pattern::Pattern;

/// Applies `action` to events matching `pattern`; everything else passes
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub pattern: Pattern,
    pub action: Action,
}

impl Filter {
    pub fn new(pattern: Pattern, action: Action) -> Self {
        Self { pattern, action }
    }

    /// Parse a filter from its pattern and action token lists.
    ///
    /// # Errors
    /// Returns `SieveError::MalformedRule` if either list is rejected by the
    /// rule grammar.
    pub fn from_tokens<S: AsRef<str>>(pattern: &[S], action: &[S]) -> Result<Self> {
        Ok(Self {
            pattern: dsl::parse_pattern(pattern)?,
            action: dsl::parse_action(action)?,
        })
    }

    /// A non-matching event is returned as-is, never dropped.
    pub fn check(&self, event: Event) -> Vec<Event> {
        if self.pattern.resolve(&event) {
            self.action.resolve(event)
        } else {
            vec![event]
        }
    }
}
