//! Literals and the CNF container.
//!
//! A `Literal` is the atomic matchable unit: a non-empty sequence of pattern
//! tokens (several when built from `a_b_c`), a negation flag, and a kind that
//! distinguishes plain literals from `#rule` lookups. A `Cnf` is a conjunction
//! of disjunctions of literals.
//!
//! Literals are value objects. They are hashed (evaluation cache keys) and
//! totally ordered (simplification sorts them), and both agree with `Eq`.
//!
//! ## Ordering
//!
//! ```text
//! first token key ─▶ negation (negated first) ─▶ remaining token keys
//!                  ─▶ kind ─▶ per-token match mode
//! ```
//!
//! Putting negation right after the first token groups `-a` next to `a`
//! once a disjunction is sorted, which is what complement pruning relies on.

use crate::error::{MatchError, Result};
use crate::{Token, Wildcard};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
    /// Token sequence matched against the text.
    Plain,
    /// Reference to another rule; the single token's word is the rule name.
    Lookup,
}

impl LiteralKind {
    /// Single-character marker: `a` for plain, `#` for lookup.
    pub fn meta(self) -> char {
        match self {
            LiteralKind::Plain => 'a',
            LiteralKind::Lookup => '#',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    tokens: Vec<Token>,
    negated: bool,
    kind: LiteralKind,
}

impl Literal {
    /// Build a plain literal.
    ///
    /// Fails when `tokens` is empty or when two wildcards sit next to each
    /// other, since the matcher cannot tell where one ends and the other starts.
    pub fn new(tokens: Vec<Token>, negated: bool) -> Result<Self> {
        if tokens.is_empty() {
            return Err(MatchError::MalformedLiteral { node: "empty token sequence".to_string() });
        }
        let adjacent = tokens.windows(2).any(|pair| pair[0].as_wildcard().is_some() && pair[1].as_wildcard().is_some());
        let literal = Literal { tokens, negated, kind: LiteralKind::Plain };
        if adjacent {
            return Err(MatchError::AdjacentWildcards { literal: literal.to_string() });
        }
        Ok(literal)
    }

    /// Single-token plain literal.
    pub fn word(token: Token, negated: bool) -> Self {
        Literal { tokens: vec![token], negated, kind: LiteralKind::Plain }
    }

    pub fn wildcard(w: Wildcard, negated: bool) -> Self {
        Literal::word(Token::wildcard(w), negated)
    }

    /// Lookup literal referring to rule `name`.
    pub fn lookup(name: impl Into<String>, negated: bool) -> Self {
        Literal { tokens: vec![Token::exact(name)], negated, kind: LiteralKind::Lookup }
    }

    /// Concatenate two literals' token sequences into one plain literal.
    pub fn concat(left: Literal, right: Literal, negated: bool) -> Result<Self> {
        let mut tokens = left.tokens;
        tokens.extend(right.tokens);
        Literal::new(tokens, negated)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    pub fn meta(&self) -> char {
        self.kind.meta()
    }

    pub fn is_lookup(&self) -> bool {
        self.kind == LiteralKind::Lookup
    }

    /// Name of the referenced rule, for lookup literals.
    pub fn lookup_target(&self) -> Option<&str> {
        match self.kind {
            LiteralKind::Lookup => self.tokens.first().map(|t| t.word.as_str()),
            LiteralKind::Plain => None,
        }
    }

    /// The same literal with the negation flipped.
    pub fn negate(&self) -> Self {
        Literal { negated: !self.negated, ..self.clone() }
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (Some((head, rest)), Some((other_head, other_rest))) = (self.tokens.split_first(), other.tokens.split_first())
        else {
            return self.tokens.len().cmp(&other.tokens.len());
        };

        head.key()
            .cmp(other_head.key())
            .then_with(|| other.negated.cmp(&self.negated))
            .then_with(|| rest.iter().map(Token::key).cmp(other_rest.iter().map(Token::key)))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| {
                self.tokens.iter().map(|t| t.match_on_normalized).cmp(other.tokens.iter().map(|t| t.match_on_normalized))
            })
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Renders like `-#fruit` or `the_?_hub`.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("-")?;
        }
        if self.kind == LiteralKind::Lookup {
            f.write_str("#")?;
        }
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// A conjunction of disjunctions of literals.
///
/// An empty `Cnf` has no constraints and matches any input in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    clauses: Vec<Vec<Literal>>,
}

impl Cnf {
    pub fn new(clauses: Vec<Vec<Literal>>) -> Self {
        Cnf { clauses }
    }

    /// The always-true expression.
    pub fn always() -> Self {
        Cnf::default()
    }

    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Vec<Literal>> {
        self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.clauses.iter().flatten()
    }

    /// Distinct rule names referenced by lookup literals, in first-seen order.
    pub fn lookup_targets(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for name in self.literals().filter_map(Literal::lookup_target) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

/// Renders like `[[-b, c], [-b, a]]`.
impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("[")?;
            for (j, lit) in clause.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{lit}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(word: &str) -> Literal {
        Literal::word(Token::new(word), false)
    }

    #[test]
    fn rejects_adjacent_wildcards() {
        let err = Literal::new(
            vec![Token::new("a"), Token::wildcard(Wildcard::AnyStar), Token::wildcard(Wildcard::AnyOne)],
            false,
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::AdjacentWildcards { .. }));
        assert!(err.to_string().contains("a_*_?"));
    }

    #[test]
    fn rejects_empty_sequence() {
        assert!(Literal::new(Vec::new(), false).is_err());
    }

    #[test]
    fn negated_sorts_before_plain_on_same_tokens() {
        let a = lit("a");
        let mut sorted = vec![a.clone(), a.negate(), lit("b")];
        sorted.sort();
        assert_eq!(sorted, vec![a.negate(), a, lit("b")]);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        let short = lit("a");
        let long = Literal::new(vec![Token::new("a"), Token::new("b")], false).unwrap();
        assert_eq!(short.cmp(&long), Ordering::Less);
    }

    #[test]
    fn ordering_agrees_with_equality() {
        let plain = lit("fruit");
        let lookup = Literal::lookup("fruit", false);
        let exact = Literal::word(Token::exact("fruit"), false);
        assert_ne!(plain.cmp(&lookup), Ordering::Equal);
        assert_ne!(plain.cmp(&exact), Ordering::Equal);
        assert_eq!(plain.cmp(&lit("fruit")), Ordering::Equal);
    }

    #[test]
    fn displays_literals_and_cnf() {
        let seq = Literal::new(vec![Token::new("the"), Token::wildcard(Wildcard::AnyOne), Token::new("hub")], true)
            .unwrap();
        let cnf = Cnf::new(vec![vec![seq], vec![Literal::lookup("fruit", false), lit("x")]]);
        assert_eq!(cnf.to_string(), "[[-the_?_hub], [#fruit, x]]");
        assert_eq!(cnf.lookup_targets(), vec!["fruit"]);
    }
}
