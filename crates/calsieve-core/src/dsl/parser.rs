//! Recursive-descent parser driven by the keyword table in [`super::grammar`].

use super::grammar::{self, Rule, Shape};
use crate::action::{Action, AddEventPolicy};
use crate::error::{Result, SieveError};
use crate::event::Event;
use crate::pattern::Pattern;
use crate::time::Time;

/// Settings that influence the trees built from tokens but are not part of
/// the token form itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub add_event_policy: AddEventPolicy,
}

/// Parse a complete token list into exactly one [`Pattern`].
///
/// # Errors
/// Returns `SieveError::MalformedRule` on the first structural violation.
pub fn parse_pattern<S: AsRef<str>>(tokens: &[S]) -> Result<Pattern> {
    Parser::new(tokens, ParseOptions::default()).root()
}

/// Parse a complete token list into exactly one [`Action`], using the
/// default options.
///
/// # Errors
/// Returns `SieveError::MalformedRule` on the first structural violation.
pub fn parse_action<S: AsRef<str>>(tokens: &[S]) -> Result<Action> {
    parse_action_with(tokens, ParseOptions::default())
}

/// Parse a complete token list into exactly one [`Action`].
///
/// # Errors
/// Returns `SieveError::MalformedRule` on the first structural violation.
pub fn parse_action_with<S: AsRef<str>>(tokens: &[S], options: ParseOptions) -> Result<Action> {
    Parser::new(tokens, options).root()
}

/// Arguments collected for one keyword, according to its [`Shape`].
enum Args<T> {
    Words(Vec<String>),
    Children(Vec<T>),
    Trailing { fixed: Vec<String>, rest: Vec<String> },
    Pairs(Vec<(String, String)>),
}

/// A tree kind the parser can build.
trait Node: Sized {
    /// Used in error messages ("pattern", "action").
    const KIND: &'static str;
    const RULES: &'static [Rule];

    /// Build a node from its keyword and arguments. `at` is the keyword's
    /// token index.
    fn build(rule: &Rule, args: Args<Self>, at: usize, options: &ParseOptions) -> Result<Self>;
}

fn malformed(position: usize, message: impl Into<String>) -> SieveError {
    SieveError::MalformedRule {
        position,
        message: message.into(),
    }
}

struct Parser<'a, S> {
    tokens: &'a [S],
    pos: usize,
    /// Open `Nested` blocks around the current token.
    depth: usize,
    options: ParseOptions,
}

impl<'a, S: AsRef<str>> Parser<'a, S> {
    fn new(tokens: &'a [S], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(|t| t.as_ref())
    }

    fn describe(token: Option<&str>) -> String {
        match token {
            Some(t) => format!("`{}`", t),
            None => "end of input".to_string(),
        }
    }

    /// Exactly one node, consuming every token.
    fn root<T: Node>(&mut self) -> Result<T> {
        let node = match self.node::<T>()? {
            Some(node) => node,
            None => {
                return Err(malformed(
                    self.pos,
                    format!("expected a {}, found {}", T::KIND, Self::describe(self.peek())),
                ))
            }
        };

        match self.peek() {
            None => Ok(node),
            Some(token) if grammar::lookup(T::RULES, token).is_some() => Err(malformed(
                self.pos,
                format!("expected a single top-level {}, found another `{}`", T::KIND, token),
            )),
            Some(token) => Err(malformed(self.pos, format!("unexpected token `{}`", token))),
        }
    }

    /// One node if the next token is a keyword of this kind; `None` (nothing
    /// consumed) otherwise.
    fn node<T: Node>(&mut self) -> Result<Option<T>> {
        let Some(rule) = self.peek().and_then(|t| grammar::lookup(T::RULES, t)) else {
            return Ok(None);
        };
        let at = self.pos;
        self.pos += 1;
        let args = self.arguments::<T>(rule, at)?;
        T::build(rule, args, at, &self.options).map(Some)
    }

    /// Nodes until the next token is not a keyword of this kind.
    fn sequence<T: Node>(&mut self) -> Result<Vec<T>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.node::<T>()? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn arguments<T: Node>(&mut self, rule: &Rule, at: usize) -> Result<Args<T>> {
        match rule.shape {
            Shape::Fixed(n) => self.take(rule, n).map(Args::Words),
            Shape::Nested { terminator } => {
                if self.depth == grammar::MAX_DEPTH {
                    return Err(malformed(
                        at,
                        format!("nesting deeper than {} levels", grammar::MAX_DEPTH),
                    ));
                }
                self.depth += 1;
                let children = self.sequence::<T>();
                self.depth -= 1;
                let children = children?;
                self.close(rule, terminator, at)?;
                Ok(Args::Children(children))
            }
            Shape::Trailing { fixed, terminator } => {
                let fixed = self.take(rule, fixed)?;
                let mut rest = Vec::new();
                while let Some(token) = self.peek() {
                    if token.starts_with('/') {
                        break;
                    }
                    rest.push(token.to_string());
                    self.pos += 1;
                }
                self.close(rule, terminator, at)?;
                Ok(Args::Trailing { fixed, rest })
            }
            Shape::Pairs { terminator } => {
                let mut pairs = Vec::new();
                loop {
                    match self.peek() {
                        Some(token) if token == terminator => {
                            self.pos += 1;
                            return Ok(Args::Pairs(pairs));
                        }
                        Some(field) => {
                            let Some(value) = self.tokens.get(self.pos + 1) else {
                                return Err(malformed(
                                    self.pos + 1,
                                    format!("`{}` field `{}` has no value", rule.keyword, field),
                                ));
                            };
                            pairs.push((field.to_string(), value.as_ref().to_string()));
                            self.pos += 2;
                        }
                        None => {
                            return Err(malformed(
                                self.pos,
                                format!(
                                    "expected `{}` to close `{}` opened at token {}, found end of input",
                                    terminator, rule.keyword, at
                                ),
                            ))
                        }
                    }
                }
            }
        }
    }

    /// The next `n` tokens, verbatim.
    fn take(&mut self, rule: &Rule, n: usize) -> Result<Vec<String>> {
        let available = self.tokens.len() - self.pos;
        if available < n {
            return Err(malformed(
                self.tokens.len(),
                format!(
                    "`{}` expects {} argument(s), found {}",
                    rule.keyword, n, available
                ),
            ));
        }
        let words = self.tokens[self.pos..self.pos + n]
            .iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        self.pos += n;
        Ok(words)
    }

    fn close(&mut self, rule: &Rule, terminator: &str, at: usize) -> Result<()> {
        match self.peek() {
            Some(token) if token == terminator => {
                self.pos += 1;
                Ok(())
            }
            found => Err(malformed(
                self.pos,
                format!(
                    "expected `{}` to close `{}` opened at token {}, found {}",
                    terminator,
                    rule.keyword,
                    at,
                    Self::describe(found)
                ),
            )),
        }
    }
}

fn shape_mismatch(rule: &Rule, at: usize) -> SieveError {
    // Only reachable if the table and the builders disagree.
    malformed(at, format!("internal grammar error for `{}`", rule.keyword))
}

impl Node for Pattern {
    const KIND: &'static str = "pattern";
    const RULES: &'static [Rule] = grammar::PATTERN_RULES;

    fn build(rule: &Rule, args: Args<Self>, at: usize, _options: &ParseOptions) -> Result<Self> {
        match (rule.keyword, args) {
            (grammar::AND, Args::Children(children)) => Ok(Pattern::And(children)),
            (grammar::OR, Args::Children(children)) => Ok(Pattern::Or(children)),
            (grammar::NOT, Args::Children(mut children)) => {
                if children.len() != 1 {
                    return Err(malformed(
                        at,
                        format!("`not` expects exactly one pattern, found {}", children.len()),
                    ));
                }
                Ok(Pattern::not(children.remove(0)))
            }
            (grammar::HAS_TEXT, Args::Trailing { mut fixed, rest }) => {
                let text = fixed.remove(0);
                let fields = if rest.is_empty() { None } else { Some(rest) };
                Ok(Pattern::HasText { text, fields })
            }
            (grammar::IN_TIME, Args::Words(words)) => {
                let time = |i: usize| -> Result<Time> {
                    let token = &words[i];
                    let parsed = Time::parse(token).map_err(|e| {
                        malformed(at + 1 + i, format!("`in_time` argument: {}", e))
                    })?;
                    // Seconds are not kept, so only `..00Z` survives a roundtrip.
                    if parsed.as_str() != *token {
                        return Err(malformed(
                            at + 1 + i,
                            format!(
                                "`in_time` argument `{}` must have zero seconds \
                                 (seconds are dropped and would not serialize back)",
                                token
                            ),
                        ));
                    }
                    Ok(parsed)
                };
                Ok(Pattern::InTime {
                    start: time(0)?,
                    end: time(1)?,
                })
            }
            _ => Err(shape_mismatch(rule, at)),
        }
    }
}

impl Node for Action {
    const KIND: &'static str = "action";
    const RULES: &'static [Rule] = grammar::ACTION_RULES;

    fn build(rule: &Rule, args: Args<Self>, at: usize, options: &ParseOptions) -> Result<Self> {
        match (rule.keyword, args) {
            (grammar::MULTIPLE, Args::Children(children)) => Ok(Action::Multiple(children)),
            (grammar::ADD_EVENT, Args::Pairs(pairs)) => {
                let event = Event::new();
                for (field, value) in pairs {
                    if event.has_field(&field) {
                        return Err(malformed(
                            at,
                            format!("`add_event` repeats field `{}`", field),
                        ));
                    }
                    event.write_field(field, value, true);
                }
                Ok(Action::AddEvent {
                    event,
                    policy: options.add_event_policy,
                })
            }
            (grammar::REMOVE_EVENT, Args::Words(_)) => Ok(Action::RemoveEvent),
            (grammar::REMOVE_FIELD, Args::Words(mut words)) => {
                Ok(Action::RemoveField(words.remove(0)))
            }
            (keyword @ (grammar::WRITE_FIELD | grammar::DEFAULT_FIELD), Args::Words(words)) => {
                let [field, text]: [String; 2] =
                    words.try_into().map_err(|_| shape_mismatch(rule, at))?;
                Ok(Action::WriteField {
                    field,
                    text,
                    overwrite: keyword == grammar::WRITE_FIELD,
                })
            }
            _ => Err(shape_mismatch(rule, at)),
        }
    }
}
