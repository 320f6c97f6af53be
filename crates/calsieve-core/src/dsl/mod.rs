//! The rule DSL: flat string-token form of [`Pattern`] and [`Action`] trees.
//!
//! This is the form rules take inside a configuration document:
//!
//! ```text
//! pattern: and has_text Lab SUMMARY /has_text not in_time 20240101T000000Z 20240201T000000Z /not /and
//! action:  multiple remove_field LOCATION write_field STATUS CANCELLED /multiple
//! ```
//!
//! Every keyword has its own arity rule (see [`grammar`]). Parsing is strict:
//! any structural violation is a `SieveError::MalformedRule`, and a complete
//! token list must describe exactly one tree. Serialization is the inverse,
//! so `serialize(parse(tokens)) == tokens` for every accepted list.
//!
//! # Example
//! ```
//! use calsieve_core::dsl::{parse_pattern, serialize_pattern};
//!
//! let tokens = ["or", "has_text", "Exam", "/has_text", "has_text", "Lab", "SUMMARY", "/has_text", "/or"];
//! let pattern = parse_pattern(&tokens).unwrap();
//! assert_eq!(serialize_pattern(&pattern), tokens);
//! ```
//!
//! [`Pattern`]: crate::Pattern
//! [`Action`]: crate::Action

pub mod grammar;
mod parser;
mod serializer;

pub use parser::{parse_action, parse_action_with, parse_pattern, ParseOptions};
pub use serializer::{serialize_action, serialize_pattern};
