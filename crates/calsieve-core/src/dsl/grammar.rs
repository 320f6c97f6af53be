//! Keyword table for the rule DSL.
//!
//! | keyword         | shape                                              |
//! |-----------------|----------------------------------------------------|
//! | `and`, `or`     | nested patterns, closed by `/and`, `/or`           |
//! | `not`           | exactly one nested pattern, closed by `/not`       |
//! | `has_text`      | `TEXT`, then `FIELD`s up to `/has_text`            |
//! | `in_time`       | exactly two time tokens, no terminator             |
//! | `multiple`      | nested actions, closed by `/multiple`              |
//! | `add_event`     | `FIELD VALUE` pairs, closed by `/add_event`        |
//! | `remove_event`  | no arguments                                       |
//! | `remove_field`  | `FIELD`                                            |
//! | `write_field`   | `FIELD TEXT` (overwrites)                          |
//! | `default_field` | `FIELD TEXT` (only written if the field is absent) |

pub const AND: &str = "and";
pub const AND_END: &str = "/and";
pub const OR: &str = "or";
pub const OR_END: &str = "/or";
pub const NOT: &str = "not";
pub const NOT_END: &str = "/not";
pub const HAS_TEXT: &str = "has_text";
pub const HAS_TEXT_END: &str = "/has_text";
pub const IN_TIME: &str = "in_time";

pub const MULTIPLE: &str = "multiple";
pub const MULTIPLE_END: &str = "/multiple";
pub const ADD_EVENT: &str = "add_event";
pub const ADD_EVENT_END: &str = "/add_event";
pub const REMOVE_EVENT: &str = "remove_event";
pub const REMOVE_FIELD: &str = "remove_field";
pub const WRITE_FIELD: &str = "write_field";
pub const DEFAULT_FIELD: &str = "default_field";

/// Deepest allowed nesting of `and`/`or`/`not`/`multiple` blocks.
pub const MAX_DEPTH: usize = 256;

/// How the tokens following a keyword are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly this many argument tokens, no terminator.
    Fixed(usize),
    /// Nodes of the same kind until a non-keyword token, which must be
    /// `terminator`.
    Nested { terminator: &'static str },
    /// `fixed` argument tokens, then words up to the first token starting
    /// with `/`, which must be `terminator`.
    Trailing {
        fixed: usize,
        terminator: &'static str,
    },
    /// `FIELD VALUE` pairs until `terminator`.
    Pairs { terminator: &'static str },
}

/// One keyword and its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub keyword: &'static str,
    pub shape: Shape,
}

pub const PATTERN_RULES: &[Rule] = &[
    Rule {
        keyword: AND,
        shape: Shape::Nested { terminator: AND_END },
    },
    Rule {
        keyword: OR,
        shape: Shape::Nested { terminator: OR_END },
    },
    Rule {
        keyword: NOT,
        shape: Shape::Nested { terminator: NOT_END },
    },
    Rule {
        keyword: HAS_TEXT,
        shape: Shape::Trailing {
            fixed: 1,
            terminator: HAS_TEXT_END,
        },
    },
    Rule {
        keyword: IN_TIME,
        shape: Shape::Fixed(2),
    },
];

pub const ACTION_RULES: &[Rule] = &[
    Rule {
        keyword: MULTIPLE,
        shape: Shape::Nested {
            terminator: MULTIPLE_END,
        },
    },
    Rule {
        keyword: ADD_EVENT,
        shape: Shape::Pairs {
            terminator: ADD_EVENT_END,
        },
    },
    Rule {
        keyword: REMOVE_EVENT,
        shape: Shape::Fixed(0),
    },
    Rule {
        keyword: REMOVE_FIELD,
        shape: Shape::Fixed(1),
    },
    Rule {
        keyword: WRITE_FIELD,
        shape: Shape::Fixed(2),
    },
    Rule {
        keyword: DEFAULT_FIELD,
        shape: Shape::Fixed(2),
    },
];

/// Find the rule for `token` in `rules`.
pub fn lookup(rules: &'static [Rule], token: &str) -> Option<&'static Rule> {
    rules.iter().find(|rule| rule.keyword == token)
}
