//! The JSON configuration document: sources plus filter rules.
//!
//! ```json
//! {
//!   "src_cals": ["file", "lectures.ics", "/file", "url", "https://example.com/cal.ics", "/url"],
//!   "filters": [
//!     { "pattern": ["has_text", "Lab", "SUMMARY", "/has_text"], "action": ["remove_event"] }
//!   ]
//! }
//! ```
//!
//! Loading is all-or-nothing: one malformed rule or source rejects the whole
//! document.

use crate::action::AddEventPolicy;
use crate::dsl::{self, ParseOptions};
use crate::error::{Result, SieveError};
use crate::filter::Filter;
use crate::pipeline::Pipeline;
use crate::source::{EventSource, IcsFile, IcsUrl};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILE: &str = "file";
const URL: &str = "url";

/// The document exactly as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Flat `KIND LOCATION /KIND` triples.
    #[serde(default)]
    pub src_cals: Vec<String>,
    #[serde(default, skip_serializing_if = "is_shared")]
    pub add_event_policy: AddEventPolicy,
    #[serde(default)]
    pub filters: Vec<FilterDocument>,
}

/// One filter in token form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDocument {
    pub pattern: Vec<String>,
    pub action: Vec<String>,
}

fn is_shared(policy: &AddEventPolicy) -> bool {
    *policy == AddEventPolicy::Shared
}

/// Where a source's events come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Url(String),
}

impl SourceSpec {
    /// Instantiate the source. Relative file paths are resolved against
    /// `base_dir` when one is given.
    pub fn to_source(&self, base_dir: Option<&Path>) -> Box<dyn EventSource> {
        match self {
            SourceSpec::File(path) => {
                let path = match base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.clone(),
                };
                Box::new(IcsFile::new(path))
            }
            SourceSpec::Url(url) => Box::new(IcsUrl::new(url.clone())),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SourceSpec::File(_) => FILE,
            SourceSpec::Url(_) => URL,
        }
    }

    fn location(&self) -> String {
        match self {
            SourceSpec::File(path) => path.to_string_lossy().into_owned(),
            SourceSpec::Url(url) => url.clone(),
        }
    }
}

/// A loaded configuration: parsed sources and filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub sources: Vec<SourceSpec>,
    pub add_event_policy: AddEventPolicy,
    pub filters: Vec<Filter>,
}

impl Config {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns `SieveError::Json` for invalid JSON, `SieveError::Config` for
    /// bad source tokens and `SieveError::MalformedRule` for bad rules.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: ConfigDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// # Errors
    /// See [`Config::from_json`].
    pub fn from_document(document: &ConfigDocument) -> Result<Self> {
        let sources = parse_sources(&document.src_cals)?;
        let options = ParseOptions {
            add_event_policy: document.add_event_policy,
        };

        let filters = document
            .filters
            .iter()
            .enumerate()
            .map(|(index, filter)| -> Result<Filter> {
                let pattern = dsl::parse_pattern(&filter.pattern)
                    .map_err(|e| in_filter(e, index, "pattern"))?;
                let action = dsl::parse_action_with(&filter.action, options)
                    .map_err(|e| in_filter(e, index, "action"))?;
                Ok(Filter::new(pattern, action))
            })
            .collect::<Result<Vec<Filter>>>()?;

        Ok(Self {
            sources,
            add_event_policy: document.add_event_policy,
            filters,
        })
    }

    /// The document form, with every rule re-serialized canonically.
    pub fn to_document(&self) -> ConfigDocument {
        let src_cals = self
            .sources
            .iter()
            .flat_map(|source| {
                [
                    source.kind().to_string(),
                    source.location(),
                    format!("/{}", source.kind()),
                ]
            })
            .collect();

        let filters = self
            .filters
            .iter()
            .map(|filter| FilterDocument {
                pattern: filter.pattern.to_tokens(),
                action: filter.action.to_tokens(),
            })
            .collect();

        ConfigDocument {
            src_cals,
            add_event_policy: self.add_event_policy,
            filters,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// A pipeline over this configuration's sources and filters.
    pub fn pipeline(&self, base_dir: Option<&Path>) -> Pipeline {
        let sources = self
            .sources
            .iter()
            .map(|spec| spec.to_source(base_dir))
            .collect();
        Pipeline::new(sources, self.filters.clone())
    }
}

/// Prefix a rule error with the filter it came from.
fn in_filter(error: SieveError, index: usize, part: &str) -> SieveError {
    match error {
        SieveError::MalformedRule { position, message } => SieveError::MalformedRule {
            position,
            message: format!("filter {} {}: {}", index, part, message),
        },
        other => other,
    }
}

fn parse_sources(tokens: &[String]) -> Result<Vec<SourceSpec>> {
    let mut sources = Vec::new();
    for (index, chunk) in tokens.chunks(3).enumerate() {
        let position = index * 3;
        let [kind, location, end] = chunk else {
            return Err(SieveError::Config(format!(
                "src_cals token {}: expected KIND LOCATION /KIND, found {} token(s)",
                position,
                chunk.len()
            )));
        };
        if *end != format!("/{}", kind) {
            return Err(SieveError::Config(format!(
                "src_cals token {}: expected `/{}`, found `{}`",
                position + 2,
                kind,
                end
            )));
        }
        let source = match kind.as_str() {
            FILE => SourceSpec::File(PathBuf::from(location)),
            URL => SourceSpec::Url(location.clone()),
            other => {
                return Err(SieveError::Config(format!(
                    "src_cals token {}: unknown source kind `{}`",
                    position, other
                )))
            }
        };
        sources.push(source);
    }
    Ok(sources)
}
