//! # calsieve-core
//!
//! Rule engine for filtering and rewriting calendar events.
//!
//! Events drawn from one or more sources flow through an ordered list of
//! filters. Each [`Filter`] pairs a [`Pattern`] (a predicate tree) with an
//! [`Action`] (a transform tree that may keep, rewrite, drop or duplicate the
//! event). Rules are stored as flat token lists, parsed and serialized by
//! [`dsl`].
//!
//! ## Quick start
//!
//! ```rust
//! use calsieve_core::{Event, Filter, Pipeline};
//!
//! let events = vec![
//!     Event::from_fields([("SUMMARY", "Math lecture")]),
//!     Event::from_fields([("SUMMARY", "Math lab")]),
//! ];
//! let drop_labs = Filter::from_tokens(
//!     &["has_text", "lab", "SUMMARY", "/has_text"],
//!     &["remove_event"],
//! )
//! .unwrap();
//!
//! let calendar = Pipeline::default()
//!     .with_source(events)
//!     .with_filter(drop_labs)
//!     .build()
//!     .unwrap();
//! assert_eq!(calendar.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`time`]: minute-resolution `Time` with the `YYYYMMDDThhmmssZ` encoding
//! - [`event`]: `Event` handles with named text fields
//! - [`calendar`]: ordered pipeline output and its renderers
//! - [`pattern`]: predicate trees
//! - [`action`]: transform trees
//! - [`filter`]: pattern-gated actions
//! - [`pipeline`]: running filters over sources
//! - [`source`]: ICS text, file and URL sources
//! - [`dsl`]: token form of patterns and actions
//! - [`week`]: seven-day HTML schedule of a calendar
//! - [`config`]: the JSON configuration document
//! - [`error`]: error types

pub mod action;
pub mod calendar;
pub mod config;
pub mod dsl;
pub mod error;
pub mod event;
pub mod filter;
pub mod pattern;
pub mod pipeline;
pub mod source;
pub mod time;
pub mod week;

pub use action::{Action, AddEventPolicy};
pub use calendar::Calendar;
pub use config::{Config, ConfigDocument, FilterDocument, SourceSpec};
pub use error::SieveError;
pub use event::Event;
pub use filter::Filter;
pub use pattern::Pattern;
pub use pipeline::Pipeline;
pub use source::{parse_ics, EventSource, IcsFile, IcsText, IcsUrl};
pub use time::Time;
pub use week::WeekView;
