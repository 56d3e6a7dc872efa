//! Named rules and rule sets.
//!
//! A `MatchRuleSet` owns its rules and indexes them by head. Construction is
//! the only place validation happens; a set that exists is well formed:
//!
//! - heads are unique,
//! - every `#name` lookup names a rule in the set,
//! - the lookup graph has no cycles (`a = #a` is reported as a self lookup,
//!   longer cycles with their path).
//!
//! Evaluation never fails, and lookups can recurse freely.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `MatchRuleSet::rules` and `MatchRuleSet::lookups`.
//!   Those vectors stay aligned.
//! - Rules are read-only after construction; the parallel evaluator shares
//!   `&self` across threads.

use super::eval::rule_range;
use super::literal::Cnf;
use super::metrics::{EvalMetrics, RuleMetrics};
use super::resolve::resolve_range;
use crate::error::{MatchError, Result};
use crate::{MatchRange, Range, Token};
use dashmap::DashMap;
use rayon::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::debug;

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

/// A compiled `head = expression` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    head: String,
    expression: Cnf,
}

impl MatchRule {
    pub fn new(head: impl Into<String>, expression: Cnf) -> Self {
        MatchRule { head: head.into(), expression }
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn expression(&self) -> &Cnf {
        &self.expression
    }
}

/// Validated collection of rules that may look each other up.
#[derive(Debug, Clone)]
pub struct MatchRuleSet {
    rules: Vec<MatchRule>,
    by_head: HashMap<String, RuleId>,
    /// Outgoing lookup edges per rule.
    lookups: Vec<Vec<RuleId>>,
}

impl MatchRuleSet {
    /// Validate and index `rules`. Rule order is kept for iteration.
    pub fn new(rules: Vec<MatchRule>) -> Result<Self> {
        let mut by_head = HashMap::with_capacity(rules.len());
        for (id, rule) in rules.iter().enumerate() {
            if by_head.insert(rule.head.clone(), id).is_some() {
                return Err(MatchError::DuplicateRule { head: rule.head.clone() });
            }
        }

        let mut lookups = Vec::with_capacity(rules.len());
        for rule in &rules {
            let mut edges = Vec::new();
            for target in rule.expression.lookup_targets() {
                if target == rule.head {
                    return Err(MatchError::SelfLookup { rule: rule.head.clone() });
                }
                match by_head.get(target) {
                    Some(&id) => edges.push(id),
                    None => {
                        return Err(MatchError::UnresolvedLookup {
                            rule: rule.head.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
            lookups.push(edges);
        }

        if let Some(cycle) = find_cycle(&lookups) {
            let path = cycle.into_iter().map(|id| rules[id].head.clone()).collect();
            return Err(MatchError::LookupCycle { path });
        }

        debug!(rules = rules.len(), lookups = lookups.iter().map(Vec::len).sum::<usize>(), "rule set compiled");
        Ok(MatchRuleSet { rules, by_head, lookups })
    }

    /// Build from a head-keyed map. Rules are ordered by head; every key must
    /// equal the head of the rule stored under it.
    pub fn from_map(rules: HashMap<String, MatchRule>) -> Result<Self> {
        if let Some((key, rule)) = rules.iter().find(|(key, rule)| **key != rule.head) {
            return Err(MatchError::MismatchedRuleKey { key: key.clone(), head: rule.head.clone() });
        }
        let mut rules: Vec<MatchRule> = rules.into_values().collect();
        rules.sort_by(|a, b| a.head.cmp(&b.head));
        MatchRuleSet::new(rules)
    }

    pub fn get(&self, head: &str) -> Option<&MatchRule> {
        self.by_head.get(head).map(|&id| &self.rules[id])
    }

    pub fn contains(&self, head: &str) -> bool {
        self.by_head.contains_key(head)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRule> {
        self.rules.iter()
    }

    /// Heads of the rules `head` looks up directly.
    pub fn lookups_of(&self, head: &str) -> Vec<&str> {
        self.by_head
            .get(head)
            .map(|&id| self.lookups[id].iter().map(|&dep| self.rules[dep].head.as_str()).collect())
            .unwrap_or_default()
    }

    /// Evaluate every rule against `tokens`. Only matching rules appear in the
    /// result.
    pub fn evaluate(&self, tokens: &[Token]) -> BTreeMap<String, MatchRange> {
        let cache: RefCell<HashMap<String, Option<Range>>> = RefCell::default();
        self.rules
            .iter()
            .filter_map(|rule| {
                let range = rule_range(tokens, self, &cache, &rule.head)?;
                Some((rule.head.clone(), resolve_range(&rule.head, range, tokens)))
            })
            .collect()
    }

    /// Same result as [`evaluate`](Self::evaluate), one rayon task per rule.
    ///
    /// Lookups shared between rules may be computed by more than one thread;
    /// every computation stores the same outcome.
    pub fn evaluate_parallel(&self, tokens: &[Token]) -> BTreeMap<String, MatchRange> {
        let cache: DashMap<String, Option<Range>> = DashMap::with_capacity(self.rules.len());
        self.rules
            .par_iter()
            .filter_map(|rule| {
                let range = rule_range(tokens, self, &cache, &rule.head)?;
                Some((rule.head.clone(), resolve_range(&rule.head, range, tokens)))
            })
            .collect()
    }

    /// Sequential evaluation with per-rule timings.
    ///
    /// A rule already computed through another rule's lookup is served from
    /// the cache, so its own duration is close to zero.
    pub fn evaluate_with_metrics(&self, tokens: &[Token]) -> (BTreeMap<String, MatchRange>, EvalMetrics) {
        let started = Instant::now();
        let cache: RefCell<HashMap<String, Option<Range>>> = RefCell::default();
        let mut matches = BTreeMap::new();
        let mut metrics = EvalMetrics { tokens: tokens.len(), ..EvalMetrics::default() };

        for rule in &self.rules {
            let rule_started = Instant::now();
            let range = rule_range(tokens, self, &cache, &rule.head);
            metrics.rules.push(RuleMetrics {
                rule: rule.head.clone(),
                duration: rule_started.elapsed(),
                clauses: rule.expression.len(),
                matched: range.is_some(),
            });
            if let Some(range) = range {
                matches.insert(rule.head.clone(), resolve_range(&rule.head, range, tokens));
            }
        }

        metrics.evaluate = started.elapsed();
        debug!(rules = self.rules.len(), matched = matches.len(), elapsed = ?metrics.evaluate, "rule set evaluated");
        (matches, metrics)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// First cycle found by depth-first search, as a closed path `a -> b -> a`.
fn find_cycle(lookups: &[Vec<RuleId>]) -> Option<Vec<RuleId>> {
    let mut marks = vec![Mark::Unvisited; lookups.len()];
    let mut path = Vec::new();
    (0..lookups.len()).find_map(|root| {
        if marks[root] == Mark::Unvisited { visit(root, lookups, &mut marks, &mut path) } else { None }
    })
}

fn visit(id: RuleId, lookups: &[Vec<RuleId>], marks: &mut [Mark], path: &mut Vec<RuleId>) -> Option<Vec<RuleId>> {
    marks[id] = Mark::OnPath;
    path.push(id);

    for &next in &lookups[id] {
        match marks[next] {
            Mark::OnPath => {
                let from = path.iter().position(|&p| p == next)?;
                let mut cycle = path[from..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(next, lookups, marks, path) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }

    path.pop();
    marks[id] = Mark::Done;
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Literal;

    fn lookup_rule(head: &str, targets: &[&str]) -> MatchRule {
        let clause = targets.iter().map(|t| Literal::lookup(*t, false)).collect();
        MatchRule::new(head, Cnf::new(vec![clause]))
    }

    fn word_rule(head: &str, word: &str) -> MatchRule {
        MatchRule::new(head, Cnf::new(vec![vec![Literal::word(Token::new(word), false)]]))
    }

    #[test]
    fn rejects_duplicate_heads() {
        let err = MatchRuleSet::new(vec![word_rule("a", "x"), word_rule("a", "y")]).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateRule { head } if head == "a"));
    }

    #[test]
    fn rejects_unresolved_lookup() {
        let err = MatchRuleSet::new(vec![lookup_rule("a", &["b"])]).unwrap_err();
        assert!(matches!(err, MatchError::UnresolvedLookup { rule, target } if rule == "a" && target == "b"));
    }

    #[test]
    fn rejects_self_lookup() {
        let err = MatchRuleSet::new(vec![lookup_rule("a", &["a"])]).unwrap_err();
        assert!(matches!(err, MatchError::SelfLookup { rule } if rule == "a"));
    }

    #[test]
    fn rejects_indirect_cycle_with_path() {
        let rules = vec![
            word_rule("x", "x"),
            lookup_rule("a", &["b"]),
            lookup_rule("b", &["c", "x"]),
            lookup_rule("c", &["a"]),
        ];
        let err = MatchRuleSet::new(rules).unwrap_err();
        match err {
            MatchError::LookupCycle { path } => assert_eq!(path, vec!["a", "b", "c", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_shared_dependencies() {
        let rules = vec![word_rule("x", "x"), lookup_rule("a", &["x"]), lookup_rule("b", &["x", "a"])];
        let set = MatchRuleSet::new(rules).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.lookups_of("b"), vec!["x", "a"]);
        assert!(set.contains("x"));
    }

    #[test]
    fn from_map_orders_by_head() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), word_rule("b", "y"));
        map.insert("a".to_string(), word_rule("a", "x"));
        let set = MatchRuleSet::from_map(map).unwrap();
        let heads: Vec<&str> = set.iter().map(MatchRule::head).collect();
        assert_eq!(heads, vec!["a", "b"]);
    }

    #[test]
    fn from_map_rejects_keys_that_differ_from_heads() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), word_rule("renamed", "y"));
        let err = MatchRuleSet::from_map(map).unwrap_err();
        assert!(matches!(err, MatchError::MismatchedRuleKey { ref key, ref head } if key == "x" && head == "renamed"));
        assert_eq!(err.to_string(), "rule 'renamed' is stored under the key 'x'");

        let mut map = HashMap::new();
        map.insert("fruit".to_string(), word_rule("apple", "apple"));
        map.insert("food".to_string(), lookup_rule("food", &["fruit"]));
        assert!(matches!(MatchRuleSet::from_map(map), Err(MatchError::MismatchedRuleKey { .. })));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let rules = vec![word_rule("x", "pear"), lookup_rule("a", &["x"]), lookup_rule("b", &["a"])];
        let set = MatchRuleSet::new(rules).unwrap();
        let tokens: Vec<Token> =
            ["a", "ripe", "pear"].iter().enumerate().map(|(i, w)| Token::at(*w, i, i * 5, i * 5 + w.len())).collect();

        let sequential = set.evaluate(&tokens);
        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential, set.evaluate_parallel(&tokens));

        let (with_metrics, metrics) = set.evaluate_with_metrics(&tokens);
        assert_eq!(with_metrics, sequential);
        assert_eq!(metrics.matched(), 3);
        assert_eq!(metrics.tokens, 3);
    }
}
