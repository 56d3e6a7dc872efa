#[macro_use]
mod macros;
mod api;
pub mod ast;
mod engine;
mod error;
mod highlight;
mod query;
mod syntax;
mod text;

pub use api::{
    Evaluation, EvaluationVerbose, Options, compile_pattern, contains, contains_any, contains_all, evaluate,
    evaluate_parallel, evaluate_verbose, find_range, find_range_in_text, text_to_tokens,
};
pub use engine::{
    Cnf, EvalMetrics, Literal, LiteralKind, MatchRule, MatchRuleSet, RangeCache, RuleMetrics, find_literal_range,
    find_range_with, simplify, to_cnf, to_cnf_tree,
};
pub use error::{MatchError, Result};
pub use highlight::highlight;
pub use query::{QueryConverter, RenderFlags};
pub use syntax::{compile_body, compile_rule, compile_rule_set, parse_expression};
pub use text::{NormalizeStep, Normalizer, Tokenizer};

use std::fmt;
use std::hash::{Hash, Hasher};

// --- Tokens -----------------------------------------------------------------

/// Wildcard markers usable inside a concatenated literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wildcard {
    /// `?`: exactly one token.
    AnyOne,
    /// `+`: one or more tokens.
    AnyPlus,
    /// `*`: zero or more tokens.
    AnyStar,
}

impl Wildcard {
    pub fn symbol(self) -> &'static str {
        match self {
            Wildcard::AnyOne => "?",
            Wildcard::AnyPlus => "+",
            Wildcard::AnyStar => "*",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "?" => Some(Wildcard::AnyOne),
            "+" => Some(Wildcard::AnyPlus),
            "*" => Some(Wildcard::AnyStar),
            _ => None,
        }
    }
}

/// A word-like part of a text, or one element of a pattern literal.
///
/// Text tokens carry the byte span they were cut from. Pattern tokens use
/// `match_on_normalized` to select which form is compared: quoted `"Exact"`
/// atoms compare the raw `word`, everything else compares `normalized`.
///
/// Equality and hashing follow the comparison mode, so two pattern tokens
/// built from `Apple` and `apple` are equal once normalized to `apple`.
#[derive(Debug, Clone)]
pub struct Token {
    pub word: String,
    pub normalized: String,
    /// Index of the token in its token array.
    pub position: usize,
    /// Start byte offset in the source text (inclusive).
    pub char_start: usize,
    /// End byte offset in the source text (exclusive).
    pub char_end: usize,
    pub match_on_normalized: bool,
}

impl Token {
    /// A token whose normalized form equals its word. Matches on normalized form.
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        Token { normalized: word.clone(), word, position: 0, char_start: 0, char_end: 0, match_on_normalized: true }
    }

    /// A text token cut from `char_start..char_end` of the source.
    pub fn at(word: impl Into<String>, position: usize, char_start: usize, char_end: usize) -> Self {
        Token { position, char_start, char_end, ..Token::new(word) }
    }

    /// A pattern token that compares the raw word.
    pub fn exact(word: impl Into<String>) -> Self {
        Token { match_on_normalized: false, ..Token::new(word) }
    }

    pub fn wildcard(w: Wildcard) -> Self {
        Token::exact(w.symbol())
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized = normalized.into();
        self
    }

    /// The form used for comparisons.
    pub fn key(&self) -> &str {
        if self.match_on_normalized { &self.normalized } else { &self.word }
    }

    /// Wildcards are exact-match tokens whose word is one of `?`, `+`, `*`.
    pub fn as_wildcard(&self) -> Option<Wildcard> {
        if self.match_on_normalized { None } else { Wildcard::from_symbol(&self.word) }
    }

    /// Does this (text) token satisfy `pattern`?
    ///
    /// The pattern decides the comparison mode. A `?` pattern matches anything.
    pub fn matches(&self, pattern: &Token) -> bool {
        if pattern.as_wildcard() == Some(Wildcard::AnyOne) {
            return true;
        }
        if pattern.match_on_normalized { self.normalized == pattern.normalized } else { self.word == pattern.word }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.match_on_normalized == other.match_on_normalized && self.key() == other.key()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.match_on_normalized.hash(state);
        self.key().hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// --- Ranges -----------------------------------------------------------------

/// Half-open token index range produced by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// Start token index (inclusive).
    pub start: usize,
    /// End token index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// A labeled match: which rule fired, over which tokens and which bytes of the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRange {
    pub label: String,
    /// Start token index (inclusive).
    pub token_start: usize,
    /// End token index (exclusive).
    pub token_end: usize,
    /// Start byte offset (inclusive).
    pub char_start: usize,
    /// End byte offset (exclusive).
    pub char_end: usize,
}

impl MatchRange {
    pub fn token_range(&self) -> Range {
        Range::new(self.token_start, self.token_end)
    }
}

impl fmt::Display for MatchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ tokens {}..{} bytes {}..{}",
            self.label, self.token_start, self.token_end, self.char_start, self.char_end
        )
    }
}
