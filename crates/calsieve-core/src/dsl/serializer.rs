//! Trees back to tokens.
//!
//! Output is always accepted by the parser, with two exceptions that no
//! parsed tree can contain: a `HasText` with an empty (non-`None`) field list
//! serializes like one searching all fields, and `HasText` field names that
//! start with `/` (or an `AddEvent` field literally named `/add_event`)
//! cannot be read back.

use super::grammar;
use crate::action::Action;
use crate::pattern::Pattern;

pub fn serialize_pattern(pattern: &Pattern) -> Vec<String> {
    let mut out = Vec::new();
    write_pattern(pattern, &mut out);
    out
}

pub fn serialize_action(action: &Action) -> Vec<String> {
    let mut out = Vec::new();
    write_action(action, &mut out);
    out
}

fn push(out: &mut Vec<String>, token: &str) {
    out.push(token.to_string());
}

fn write_pattern(pattern: &Pattern, out: &mut Vec<String>) {
    match pattern {
        Pattern::And(children) => {
            push(out, grammar::AND);
            children.iter().for_each(|c| write_pattern(c, out));
            push(out, grammar::AND_END);
        }
        Pattern::Or(children) => {
            push(out, grammar::OR);
            children.iter().for_each(|c| write_pattern(c, out));
            push(out, grammar::OR_END);
        }
        Pattern::Not(child) => {
            push(out, grammar::NOT);
            write_pattern(child, out);
            push(out, grammar::NOT_END);
        }
        Pattern::HasText { text, fields } => {
            push(out, grammar::HAS_TEXT);
            push(out, text);
            if let Some(fields) = fields {
                out.extend(fields.iter().cloned());
            }
            push(out, grammar::HAS_TEXT_END);
        }
        Pattern::InTime { start, end } => {
            push(out, grammar::IN_TIME);
            out.push(start.as_str());
            out.push(end.as_str());
        }
    }
}

fn write_action(action: &Action, out: &mut Vec<String>) {
    match action {
        Action::Multiple(stages) => {
            push(out, grammar::MULTIPLE);
            stages.iter().for_each(|s| write_action(s, out));
            push(out, grammar::MULTIPLE_END);
        }
        Action::AddEvent { event, .. } => {
            push(out, grammar::ADD_EVENT);
            for (field, text) in event.entries() {
                out.push(field);
                out.push(text);
            }
            push(out, grammar::ADD_EVENT_END);
        }
        Action::RemoveEvent => push(out, grammar::REMOVE_EVENT),
        Action::RemoveField(field) => {
            push(out, grammar::REMOVE_FIELD);
            push(out, field);
        }
        Action::WriteField {
            field,
            text,
            overwrite,
        } => {
            let keyword = if *overwrite {
                grammar::WRITE_FIELD
            } else {
                grammar::DEFAULT_FIELD
            };
            push(out, keyword);
            push(out, field);
            push(out, text);
        }
    }
}

impl Pattern {
    /// Token form of this pattern; see [`crate::dsl`].
    pub fn to_tokens(&self) -> Vec<String> {
        serialize_pattern(self)
    }
}

impl Action {
    /// Token form of this action; see [`crate::dsl`].
    pub fn to_tokens(&self) -> Vec<String> {
        serialize_action(self)
    }
}
