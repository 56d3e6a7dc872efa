//! Compilation and matching engine.
//!
//! This module is the core of the crate: it turns an expression tree into
//! Conjunctive Normal Form and evaluates that form against token arrays. The
//! engine is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! MatchNode (ast.rs)
//!     │  to_cnf_tree                  (cnf.rs)
//!     │    - NNF: push negations down (De Morgan, double negation)
//!     │    - distribute OR over AND
//!     │  flatten                      (cnf.rs)
//!     │    - AND/OR tree -> Vec<Vec<Literal>>
//!     v
//! Cnf ── simplify ──> Cnf             (simplify.rs)
//!     │
//!     │  MatchRule / MatchRuleSet     (rule_set.rs)
//!     │    - unique heads, lookup graph validated at construction
//!     v
//! tokens ── find_range_with ──> Option<Range>   (eval.rs)
//!              - per-call literal cache
//!              - lookups resolved through a RangeCache
//!     │
//!     v
//! resolve_range ──> MatchRange        (resolve.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `literal.rs`: the `Literal` value type and the `Cnf` container.
//! - `cnf.rs`: the three rewrite passes and literal construction.
//! - `simplify.rs`: dedup, complement pruning and subsumption.
//! - `eval.rs`: single-literal matching and CNF evaluation.
//! - `rule_set.rs`: named rules, validation, sequential/parallel evaluation.
//! - `resolve.rs`: token ranges to labeled byte ranges.
//! - `metrics.rs`: optional timing/counters for an evaluation run.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`. Set `PHRASEMATCH_LOG=phrasematch=trace`
//! when running the CLI to see per-rule outcomes and lookup cache traffic.

#[path = "engine/cnf.rs"]
mod cnf;
#[path = "engine/eval.rs"]
mod eval;
#[path = "engine/literal.rs"]
mod literal;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/rule_set.rs"]
mod rule_set;
#[path = "engine/simplify.rs"]
mod simplify;


pub use cnf::{to_cnf, to_cnf_tree};
pub use eval::{RangeCache, find_literal_range, find_range_with};
pub use literal::{Cnf, Literal, LiteralKind};
pub use metrics::{EvalMetrics, RuleMetrics};
pub use rule_set::{MatchRule, MatchRuleSet};
pub use simplify::simplify;

pub(crate) use eval::find_range;
pub(crate) use resolve::resolve_range;
