//! Evaluation metrics.
//!
//! Collected only by the `*_with_metrics` / `*_verbose` entry points; the
//! plain evaluators do not time anything.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct EvalMetrics {
    /// Time spent turning the text into tokens (set by the API layer).
    pub tokenize: Duration,
    /// Time spent evaluating all rules.
    pub evaluate: Duration,
    /// Number of tokens evaluated against.
    pub tokens: usize,
    /// One entry per rule, in rule-set order.
    pub rules: Vec<RuleMetrics>,
}

impl EvalMetrics {
    pub fn total(&self) -> Duration {
        self.tokenize + self.evaluate
    }

    /// Number of rules that matched.
    pub fn matched(&self) -> usize {
        self.rules.iter().filter(|r| r.matched).count()
    }

    /// The slowest rule, if any.
    pub fn slowest(&self) -> Option<&RuleMetrics> {
        self.rules.iter().max_by_key(|r| r.duration)
    }
}

/// Timing for a single rule.
#[derive(Debug, Clone)]
pub struct RuleMetrics {
    pub rule: String,
    /// Elapsed time including lookups that were not cached yet.
    pub duration: Duration,
    /// Number of disjunctions in the compiled expression.
    pub clauses: usize,
    pub matched: bool,
}
