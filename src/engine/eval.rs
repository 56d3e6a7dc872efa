//! Matching literals and CNF expressions against token arrays.
//!
//! ## Single literal
//!
//! Every start position is tried in order. At each start the literal's tokens
//! are walked left to right:
//!
//! ```text
//! plain token   must match the token at the cursor
//! ?             consumes one token
//! + / *         jump to the first later match of the next pattern token
//!               (+ skips at least one token, * may skip none)
//! trailing +    consumes one token
//! trailing *    consumes nothing
//! ```
//!
//! A negated literal is the complement of the plain one: `None` when the
//! pattern is found, the whole input otherwise. When the pattern runs off the
//! end of the input no later start can fit it either, so the scan stops there.
//!
//! ## CNF
//!
//! Each disjunction is satisfied by its first true literal; the first false
//! disjunction ends the evaluation. The result starts where the first
//! disjunction's witness starts and ends at the furthest witness end. This is a
//! covering span, not an intersection.

use super::literal::{Cnf, Literal};
use super::rule_set::MatchRuleSet;
use crate::{Range, Token, Wildcard};
use dashmap::DashMap;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::trace;

/// Rule-level result cache shared by all lookups of one evaluation run.
///
/// Entries store `None` for rules known not to match. The sequential
/// evaluator uses a `RefCell<HashMap>`; the parallel one a `DashMap`.
pub trait RangeCache {
    /// `Some(outcome)` when `rule` has been evaluated already.
    fn get(&self, rule: &str) -> Option<Option<Range>>;
    fn put(&self, rule: &str, outcome: Option<Range>);
}

impl RangeCache for RefCell<HashMap<String, Option<Range>>> {
    fn get(&self, rule: &str) -> Option<Option<Range>> {
        self.borrow().get(rule).copied()
    }

    fn put(&self, rule: &str, outcome: Option<Range>) {
        self.borrow_mut().insert(rule.to_string(), outcome);
    }
}

impl RangeCache for DashMap<String, Option<Range>> {
    fn get(&self, rule: &str) -> Option<Option<Range>> {
        DashMap::get(self, rule).map(|entry| *entry.value())
    }

    fn put(&self, rule: &str, outcome: Option<Range>) {
        self.insert(rule.to_string(), outcome);
    }
}

enum Attempt {
    /// Full match ending (exclusive) at this index.
    Matched(usize),
    /// Mismatch at this start; later starts may still match.
    Failed,
    /// The pattern needs more tokens than remain.
    Exhausted,
}

/// Range covered by `literal` in `tokens`.
///
/// Non-negated literals return the first match. Negated literals return
/// `0..tokens.len()` when the pattern cannot be found and `None` when it can.
pub fn find_literal_range(tokens: &[Token], literal: &Literal) -> Option<Range> {
    let whole = Range::new(0, tokens.len());
    let negated = literal.is_negated();

    for start in 0..tokens.len() {
        match match_at(tokens, literal.tokens(), start) {
            Attempt::Matched(end) => return if negated { None } else { Some(Range::new(start, end)) },
            Attempt::Exhausted => break,
            Attempt::Failed => {}
        }
    }

    if negated { Some(whole) } else { None }
}

fn match_at(tokens: &[Token], pattern: &[Token], start: usize) -> Attempt {
    let mut pos = start;
    let mut pi = 0;

    while pi < pattern.len() {
        let element = &pattern[pi];
        let last = pi + 1 == pattern.len();

        match element.as_wildcard() {
            Some(Wildcard::AnyStar) if last => return Attempt::Matched(pos),
            _ if pos >= tokens.len() => return Attempt::Exhausted,
            Some(Wildcard::AnyOne) => {
                pos += 1;
                pi += 1;
            }
            Some(Wildcard::AnyPlus) if last => return Attempt::Matched(pos + 1),
            Some(wildcard) => {
                // Literal construction rules out a wildcard right after this one.
                let next = &pattern[pi + 1];
                let from = if wildcard == Wildcard::AnyStar { pos } else { pos + 1 };
                if from >= tokens.len() {
                    return Attempt::Exhausted;
                }
                match tokens[from..].iter().position(|token| token.matches(next)) {
                    Some(offset) => {
                        pos = from + offset + 1;
                        pi += 2;
                    }
                    None => return Attempt::Failed,
                }
            }
            None => {
                if !tokens[pos].matches(element) {
                    return Attempt::Failed;
                }
                pos += 1;
                pi += 1;
            }
        }
    }

    Attempt::Matched(pos)
}

/// Evaluate `cnf` without a rule context. Lookup literals are matched as
/// plain tokens.
pub(crate) fn find_range(tokens: &[Token], cnf: &Cnf) -> Option<Range> {
    evaluate_cnf(tokens, cnf, |_| None)
}

/// Evaluate `cnf`, resolving `#name` literals against `rules`.
///
/// A looked-up rule is evaluated at most once per `cache`; its outcome is
/// reused by every later lookup and by the rule's own entry in the result.
/// A negated lookup is true over the whole input exactly when the rule does
/// not match.
pub fn find_range_with<C>(tokens: &[Token], cnf: &Cnf, rules: &MatchRuleSet, cache: &C) -> Option<Range>
where
    C: RangeCache + ?Sized,
{
    evaluate_cnf(tokens, cnf, |literal| {
        let name = literal.lookup_target()?;
        let outcome = rule_range(tokens, rules, cache, name);
        Some(match (literal.is_negated(), outcome) {
            (false, outcome) => outcome,
            (true, Some(_)) => None,
            (true, None) => Some(Range::new(0, tokens.len())),
        })
    })
}

/// Outcome of rule `name`, from `cache` when present.
pub(crate) fn rule_range<C>(tokens: &[Token], rules: &MatchRuleSet, cache: &C, name: &str) -> Option<Range>
where
    C: RangeCache + ?Sized,
{
    if let Some(outcome) = cache.get(name) {
        trace!(rule = name, "rule cache hit");
        return outcome;
    }
    trace!(rule = name, "rule cache miss");

    let outcome = rules.get(name).and_then(|rule| find_range_with(tokens, rule.expression(), rules, cache));
    trace!(rule = name, matched = outcome.is_some(), "rule evaluated");
    cache.put(name, outcome);
    outcome
}

/// `lookup` gets the first chance at every literal; `None` from it means
/// "match as a plain literal".
fn evaluate_cnf<'c, F>(tokens: &[Token], cnf: &'c Cnf, mut lookup: F) -> Option<Range>
where
    F: FnMut(&Literal) -> Option<Option<Range>>,
{
    if cnf.is_empty() {
        return Some(Range::new(0, tokens.len()));
    }

    let mut seen: HashMap<&'c Literal, Option<Range>> = HashMap::new();
    let mut found: Option<Range> = None;

    for clause in cnf.clauses() {
        let mut satisfied = None;
        for literal in clause {
            let outcome = match seen.get(literal) {
                Some(cached) => *cached,
                None => {
                    let outcome = lookup(literal).unwrap_or_else(|| find_literal_range(tokens, literal));
                    seen.insert(literal, outcome);
                    outcome
                }
            };
            if outcome.is_some() {
                satisfied = outcome;
                break;
            }
        }

        let range = satisfied?;
        found = Some(match found {
            None => range,
            Some(acc) => Range::new(acc.start, acc.end.max(range.end)),
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().enumerate().map(|(i, w)| Token::at(*w, i, 0, 0)).collect()
    }

    fn pattern(spec: &str, negated: bool) -> Literal {
        let parts = spec
            .split('_')
            .map(|p| match p {
                "?" => Token::wildcard(Wildcard::AnyOne),
                "+" => Token::wildcard(Wildcard::AnyPlus),
                "*" => Token::wildcard(Wildcard::AnyStar),
                w => Token::new(w),
            })
            .collect();
        Literal::new(parts, negated).unwrap()
    }

    const HUB: &[&str] = &["come", "to", "the", "hague", "to", "join", "the", "hub"];

    #[test]
    fn finds_plain_sequence() {
        assert_eq!(find_literal_range(&tokens(HUB), &pattern("the_hague", false)), Some(Range::new(2, 4)));
        assert_eq!(find_literal_range(&tokens(HUB), &pattern("hague_the", false)), None);
    }

    #[test]
    fn single_wildcard_consumes_one() {
        let t = tokens(HUB);
        assert_eq!(find_literal_range(&t, &pattern("join_?_hub", false)), Some(Range::new(5, 8)));
        assert_eq!(find_literal_range(&t, &pattern("come_?_to", false)), None);
    }

    #[test]
    fn plus_skips_at_least_one() {
        let t = tokens(HUB);
        assert_eq!(find_literal_range(&t, &pattern("to_+_the", false)), Some(Range::new(1, 7)));
        assert_eq!(find_literal_range(&t, &pattern("join_+_the", false)), None);
        assert_eq!(find_literal_range(&tokens(&["join", "hub"]), &pattern("join_+_hub", false)), None);
    }

    #[test]
    fn star_may_skip_nothing() {
        let t = tokens(HUB);
        assert_eq!(find_literal_range(&t, &pattern("to_*_the", false)), Some(Range::new(1, 3)));
        assert_eq!(find_literal_range(&t, &pattern("join_*_the", false)), Some(Range::new(5, 7)));
    }

    #[test]
    fn trailing_wildcards() {
        let t = tokens(HUB);
        assert_eq!(find_literal_range(&t, &pattern("join_+", false)), Some(Range::new(5, 7)));
        assert_eq!(find_literal_range(&t, &pattern("hub_*", false)), Some(Range::new(7, 8)));
        assert_eq!(find_literal_range(&t, &pattern("hub_+", false)), None);
        assert_eq!(find_literal_range(&t, &pattern("hub_?", false)), None);
    }

    #[test]
    fn negation_is_vacuously_true_past_the_end() {
        let t = tokens(&["a", "b"]);
        assert_eq!(find_literal_range(&t, &pattern("b_c", true)), Some(Range::new(0, 2)));
        assert_eq!(find_literal_range(&t, &pattern("a_b", true)), None);
        assert_eq!(find_literal_range(&t, &pattern("x", true)), Some(Range::new(0, 2)));
    }

    #[test]
    fn empty_input() {
        assert_eq!(find_literal_range(&[], &pattern("a", false)), None);
        assert_eq!(find_literal_range(&[], &pattern("a", true)), Some(Range::new(0, 0)));
        assert_eq!(find_range(&[], &Cnf::always()), Some(Range::new(0, 0)));
    }

    #[test]
    fn conjunction_extends_to_the_furthest_end() {
        let t = tokens(HUB);
        let cnf = Cnf::new(vec![vec![pattern("join", false)], vec![pattern("come", false)]]);
        // start from the first witness, end never shrinks
        assert_eq!(find_range(&t, &cnf), Some(Range::new(5, 6)));

        let cnf = Cnf::new(vec![vec![pattern("to", false)], vec![pattern("hub", false)]]);
        assert_eq!(find_range(&t, &cnf), Some(Range::new(1, 8)));
    }

    #[test]
    fn false_disjunction_fails_the_conjunction() {
        let t = tokens(HUB);
        let cnf = Cnf::new(vec![vec![pattern("x", false), pattern("y", false)], vec![pattern("hub", false)]]);
        assert_eq!(find_range(&t, &cnf), None);
    }

    #[test]
    fn refcell_cache_round_trips_outcomes() {
        let cache: RefCell<HashMap<String, Option<Range>>> = RefCell::default();
        assert_eq!(RangeCache::get(&cache, "fruit"), None);
        cache.put("fruit", None);
        assert_eq!(RangeCache::get(&cache, "fruit"), Some(None));
    }

    #[test]
    fn dashmap_cache_round_trips_outcomes() {
        let cache: DashMap<String, Option<Range>> = DashMap::new();
        cache.put("fruit", Some(Range::new(1, 2)));
        assert_eq!(RangeCache::get(&cache, "fruit"), Some(Some(Range::new(1, 2))));
    }
}
