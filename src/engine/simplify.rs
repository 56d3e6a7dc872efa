//! Heuristic CNF simplification.
//!
//! ```text
//! [[-b, a], [-b, -b, c], [-b, -b, a]]
//!   dedup        -> [[-b, a], [-b, c], [-b, a]]
//!   subsumption  -> [[-b, a], [-b, c]]
//! ```
//!
//! This is not Boolean minimization. Resolution (`(a | b) & -b` to `a & -b`)
//! is not attempted.

use super::literal::{Cnf, Literal};
use tracing::debug;

/// Simplify `cnf` without changing whether it matches any token array.
///
/// 1. Sort and dedup every disjunction.
/// 2. Drop disjunctions holding a literal and its complement (`a | -a`);
///    they are always true.
/// 3. Drop every disjunction that is a superset of an earlier one
///    (`a & (a | b)` is `a`). Survivors keep their original order.
pub fn simplify(cnf: Cnf) -> Cnf {
    let before = cnf.len();

    let deduped: Vec<Vec<Literal>> = cnf
        .into_clauses()
        .into_iter()
        .map(|mut clause| {
            clause.sort();
            clause.dedup();
            clause
        })
        .filter(|clause| !clause.is_empty() && !is_tautology(clause))
        .collect();

    let mut keep = vec![true; deduped.len()];
    for i in (0..deduped.len()).rev() {
        let candidate = &deduped[i];
        if deduped[..i].iter().any(|earlier| is_subset(earlier, candidate)) {
            keep[i] = false;
        }
    }

    let clauses: Vec<Vec<Literal>> =
        deduped.into_iter().zip(keep).filter_map(|(clause, kept)| kept.then_some(clause)).collect();

    debug!(before, after = clauses.len(), "simplified cnf");
    Cnf::new(clauses)
}

/// `clause` must be sorted. Multi-token literals do not always sort next to
/// their complement (`-a_b, -a_c, a_b`), hence the search.
fn is_tautology(clause: &[Literal]) -> bool {
    clause.iter().filter(|lit| lit.is_negated()).any(|lit| clause.binary_search(&lit.negate()).is_ok())
}

/// Both sides sorted and deduplicated.
fn is_subset(small: &[Literal], large: &[Literal]) -> bool {
    small.len() <= large.len() && small.iter().all(|lit| large.binary_search(lit).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    fn lit(w: &str) -> Literal {
        Literal::word(Token::new(w), false)
    }

    fn not(w: &str) -> Literal {
        Literal::word(Token::new(w), true)
    }

    #[test]
    fn removes_duplicates_and_supersets() {
        let cnf = Cnf::new(vec![
            vec![not("b"), lit("a")],
            vec![not("b"), not("b"), lit("c")],
            vec![not("b"), not("b"), lit("a")],
        ]);
        assert_eq!(simplify(cnf).to_string(), "[[a, -b], [-b, c]]");
    }

    #[test]
    fn subsumption_keeps_the_smaller_clause() {
        let cnf = Cnf::new(vec![vec![lit("a")], vec![lit("a"), lit("b")]]);
        assert_eq!(simplify(cnf), Cnf::new(vec![vec![lit("a")]]));
    }

    #[test]
    fn later_subset_removes_nothing_earlier() {
        // Only earlier clauses subsume later ones.
        let cnf = Cnf::new(vec![vec![lit("a"), lit("b")], vec![lit("a")]]);
        assert_eq!(simplify(cnf).len(), 2);
    }

    #[test]
    fn equal_clauses_collapse_to_first() {
        let cnf = Cnf::new(vec![vec![lit("x")], vec![lit("y")], vec![lit("x")]]);
        assert_eq!(simplify(cnf).to_string(), "[[x], [y]]");
    }

    #[test]
    fn tautology_disappears() {
        let cnf = Cnf::new(vec![vec![lit("a"), not("a"), lit("b")], vec![lit("c")]]);
        assert_eq!(simplify(cnf).to_string(), "[[c]]");
    }

    #[test]
    fn tautology_found_when_complements_sort_apart() {
        let seq = |rest: &str, negated: bool| Literal::new(vec![Token::new("a"), Token::new(rest)], negated).unwrap();
        let cnf = Cnf::new(vec![vec![seq("b", true), seq("c", true), seq("b", false)], vec![lit("d")]]);
        assert_eq!(simplify(cnf).to_string(), "[[d]]");
    }

    #[test]
    fn all_tautologies_leave_the_always_true_form() {
        let cnf = Cnf::new(vec![vec![lit("a"), not("a")]]);
        assert!(simplify(cnf).is_empty());
    }

    #[test]
    fn lookup_and_plain_are_not_complements() {
        let cnf = Cnf::new(vec![vec![Literal::lookup("a", false), not("a")]]);
        assert_eq!(simplify(cnf).len(), 1);
    }
}
