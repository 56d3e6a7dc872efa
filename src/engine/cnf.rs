//! Expression tree to CNF.
//!
//! Three rewrites, each building a fresh tree:
//!
//! ```text
//! MatchNode ─▶ NNF (De Morgan / double negation, to a fixpoint)
//!           ─▶ distribute OR over AND (depth-first)
//!           ─▶ flatten into Vec<Vec<Literal>>
//! ```
//!
//! The distribution step can grow exponentially with nesting depth. Rule
//! expressions are small, so no linear-size encoding is attempted: literals
//! must stay readable token sequences.

use super::literal::{Cnf, Literal};
use crate::ast::MatchNode;
use crate::error::{MatchError, Result};
use crate::text::Normalizer;
use crate::{Token, Wildcard};
use tracing::trace;

type Rewrite = fn(MatchNode) -> (MatchNode, bool);

/// Rewrite `node` into an AND-of-ORs tree with negation only on leaves.
pub fn to_cnf_tree(node: &MatchNode) -> MatchNode {
    let passes: [Rewrite; 3] = [not_over_or, not_over_and, double_not];

    let mut tree = node.clone();
    let mut rounds = 0usize;
    loop {
        let mut changed = false;
        for pass in passes {
            let (next, pass_changed) = rewrite_all(tree, pass);
            tree = next;
            changed |= pass_changed;
        }
        rounds += 1;
        if !changed {
            break;
        }
    }
    trace!(rounds, "negation normal form reached");

    distribute(tree)
}

/// Compile `node` into a flat CNF, normalizing literal tokens with `normalizer`.
pub fn to_cnf(node: &MatchNode, normalizer: &Normalizer) -> Result<Cnf> {
    let tree = to_cnf_tree(node);
    flatten(&tree, normalizer)
}

// --- NNF ----------------------------------------------------------------------

/// Apply `rule` at every node top-down. A rewritten node is not revisited in
/// the same sweep.
fn rewrite_all(node: MatchNode, rule: Rewrite) -> (MatchNode, bool) {
    let (node, changed) = rule(node);
    if changed {
        return (node, true);
    }
    match node {
        MatchNode::And(l, r) => {
            let ((l, cl), (r, cr)) = (rewrite_all(*l, rule), rewrite_all(*r, rule));
            (MatchNode::and(l, r), cl || cr)
        }
        MatchNode::Or(l, r) => {
            let ((l, cl), (r, cr)) = (rewrite_all(*l, rule), rewrite_all(*r, rule));
            (MatchNode::or(l, r), cl || cr)
        }
        MatchNode::Concat(l, r) => {
            let ((l, cl), (r, cr)) = (rewrite_all(*l, rule), rewrite_all(*r, rule));
            (MatchNode::concat(l, r), cl || cr)
        }
        MatchNode::Not(inner) => {
            let (inner, changed) = rewrite_all(*inner, rule);
            (MatchNode::not(inner), changed)
        }
        leaf => (leaf, false),
    }
}

fn not_over_or(node: MatchNode) -> (MatchNode, bool) {
    match node {
        MatchNode::Not(inner) => match *inner {
            MatchNode::Or(x, y) => (MatchNode::and(MatchNode::not(*x), MatchNode::not(*y)), true),
            other => (MatchNode::not(other), false),
        },
        other => (other, false),
    }
}

fn not_over_and(node: MatchNode) -> (MatchNode, bool) {
    match node {
        MatchNode::Not(inner) => match *inner {
            MatchNode::And(x, y) => (MatchNode::or(MatchNode::not(*x), MatchNode::not(*y)), true),
            other => (MatchNode::not(other), false),
        },
        other => (other, false),
    }
}

fn double_not(node: MatchNode) -> (MatchNode, bool) {
    match node {
        MatchNode::Not(inner) => match *inner {
            MatchNode::Not(x) => (*x, true),
            other => (MatchNode::not(other), false),
        },
        other => (other, false),
    }
}

// --- Distribution -------------------------------------------------------------

fn distribute(node: MatchNode) -> MatchNode {
    match node {
        MatchNode::And(l, r) => MatchNode::and(distribute(*l), distribute(*r)),
        MatchNode::Or(l, r) => distribute_or(distribute(*l), distribute(*r)),
        other => other,
    }
}

/// `a | (b & c)` -> `(a | b) & (a | c)`, either side. Both inputs are already
/// in CNF; the recursion re-checks the new OR nodes it creates.
fn distribute_or(left: MatchNode, right: MatchNode) -> MatchNode {
    match (left, right) {
        (a, MatchNode::And(b, c)) => MatchNode::and(distribute_or(a.clone(), *b), distribute_or(a, *c)),
        (MatchNode::And(b, c), a) => MatchNode::and(distribute_or(*b, a.clone()), distribute_or(*c, a)),
        (l, r) => MatchNode::or(l, r),
    }
}

// --- Flattening ---------------------------------------------------------------

fn flatten(tree: &MatchNode, normalizer: &Normalizer) -> Result<Cnf> {
    let mut clauses = Vec::new();
    conjunction(tree, normalizer, &mut clauses)?;
    Ok(Cnf::new(clauses))
}

fn conjunction(node: &MatchNode, normalizer: &Normalizer, out: &mut Vec<Vec<Literal>>) -> Result<()> {
    match node {
        MatchNode::And(l, r) => {
            conjunction(l, normalizer, out)?;
            conjunction(r, normalizer, out)
        }
        other => {
            let mut clause = Vec::new();
            disjunction(other, normalizer, &mut clause)?;
            out.push(clause);
            Ok(())
        }
    }
}

fn disjunction(node: &MatchNode, normalizer: &Normalizer, out: &mut Vec<Literal>) -> Result<()> {
    match node {
        MatchNode::Or(l, r) => {
            disjunction(l, normalizer, out)?;
            disjunction(r, normalizer, out)
        }
        MatchNode::Not(inner) => {
            out.push(literal(inner, true, true, normalizer)?);
            Ok(())
        }
        other => {
            out.push(literal(other, false, true, normalizer)?);
            Ok(())
        }
    }
}

/// Literal construction. `top` is false inside a concatenation, where lookups
/// and negation have no meaning.
fn literal(node: &MatchNode, negated: bool, top: bool, normalizer: &Normalizer) -> Result<Literal> {
    match node {
        MatchNode::Atom(word) => {
            let normalized = normalizer.normalize(word);
            if normalized.is_empty() {
                return Err(MatchError::EmptyAtom { word: word.clone() });
            }
            Ok(Literal::word(Token::new(word.as_str()).with_normalized(normalized), negated))
        }
        MatchNode::Exact(word) if word.is_empty() => Err(MatchError::EmptyAtom { word: String::new() }),
        MatchNode::Exact(word) => Ok(Literal::word(Token::exact(word.as_str()), negated)),
        MatchNode::AnyOne => Ok(Literal::wildcard(Wildcard::AnyOne, negated)),
        MatchNode::AnyPlus => Ok(Literal::wildcard(Wildcard::AnyPlus, negated)),
        MatchNode::AnyStar => Ok(Literal::wildcard(Wildcard::AnyStar, negated)),
        MatchNode::Lookup(name) if top => Ok(Literal::lookup(name.as_str(), negated)),
        MatchNode::Concat(l, r) => {
            let left = literal(l, false, false, normalizer)?;
            let right = literal(r, false, false, normalizer)?;
            Literal::concat(left, right, negated)
        }
        other => Err(MatchError::MalformedLiteral { node: other.to_string() }),
    }
}
