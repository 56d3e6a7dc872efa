//! Configuration errors.
//!
//! Everything that can go wrong in this crate goes wrong while *building*
//! things: parsing an expression, turning a rule line into a rule, validating a
//! rule set, constructing a literal. Evaluation itself never fails; "no match"
//! is an ordinary `None`.

use thiserror::Error;

/// Errors surfaced while compiling expressions and assembling rule sets.
///
/// # Examples
/// ```
/// use phrasematch::{MatchError, Options, compile_rule_set};
///
/// let err = compile_rule_set("a = #b", &Options::default()).unwrap_err();
/// assert!(matches!(err, MatchError::UnresolvedLookup { .. }));
/// assert_eq!(err.to_string(), "rule 'a' contains a lookup to a rule that is not defined: #b");
/// ```
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{message} at byte {position}")]
    Parse { message: String, position: usize },

    #[error("line {line}: the rule does not assign a rule name (rule_name = ...)")]
    MissingAssignment { line: usize },

    #[error("line {line}: invalid rule name '{head}'")]
    InvalidRuleHead { head: String, line: usize },

    #[error("there are multiple definitions of rule '{head}'")]
    DuplicateRule { head: String },

    #[error("rule '{rule}' contains a lookup to a rule that is not defined: #{target}")]
    UnresolvedLookup { rule: String, target: String },

    #[error("rule '{rule}' contains a lookup to itself; no recursion allowed")]
    SelfLookup { rule: String },

    #[error("rules form a lookup cycle: {}", path.join(" -> "))]
    LookupCycle { path: Vec<String> },

    #[error("pattern contains multiple wildcards next to each other: {literal}")]
    AdjacentWildcards { literal: String },

    #[error("unexpected node in CNF expression: {node}")]
    MalformedLiteral { node: String },

    #[error("pattern word '{word}' is empty after normalization")]
    EmptyAtom { word: String },

    #[error("rule '{head}' is stored under the key '{key}'")]
    MismatchedRuleKey { key: String, head: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;

pub(crate) fn parse_error(message: impl Into<String>, position: usize) -> MatchError {
    MatchError::Parse { message: message.into(), position }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_position() {
        let err = parse_error("unbalanced parentheses", 7);
        assert_eq!(err.to_string(), "unbalanced parentheses at byte 7");
    }

    #[test]
    fn formats_cycle_path() {
        let err = MatchError::LookupCycle { path: vec!["a".into(), "b".into(), "a".into()] };
        assert_eq!(err.to_string(), "rules form a lookup cycle: a -> b -> a");
    }

    #[test]
    fn forwards_io_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "rules.txt");
        let err = MatchError::from(io);
        assert_eq!(err.to_string(), "rules.txt");
    }
}
