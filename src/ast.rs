//! Expression tree produced by the parser front-end.
//!
//! `MatchNode` is a closed set of node shapes: binary operators, unary
//! negation, the three leaf atoms (normalized, exact, lookup) and the three
//! wildcards. Every rewrite in the CNF transform builds new nodes; nothing is
//! mutated in place.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchNode {
    /// `a & b`
    And(Box<MatchNode>, Box<MatchNode>),
    /// `a | b`
    Or(Box<MatchNode>, Box<MatchNode>),
    /// `-a`
    Not(Box<MatchNode>),
    /// `a_b`: token adjacency.
    Concat(Box<MatchNode>, Box<MatchNode>),
    /// `word` or `'word'`: compared on normalized form.
    Atom(String),
    /// `"Word"`: compared on the raw form.
    Exact(String),
    /// `#rule`: evaluates another rule of the same set.
    Lookup(String),
    /// `?`
    AnyOne,
    /// `+`
    AnyPlus,
    /// `*`
    AnyStar,
}

impl MatchNode {
    pub fn and(left: MatchNode, right: MatchNode) -> Self {
        MatchNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: MatchNode, right: MatchNode) -> Self {
        MatchNode::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: MatchNode) -> Self {
        MatchNode::Not(Box::new(inner))
    }

    pub fn concat(left: MatchNode, right: MatchNode) -> Self {
        MatchNode::Concat(Box::new(left), Box::new(right))
    }

    pub fn atom(word: impl Into<String>) -> Self {
        MatchNode::Atom(word.into())
    }

    pub fn exact(word: impl Into<String>) -> Self {
        MatchNode::Exact(word.into())
    }

    pub fn lookup(name: impl Into<String>) -> Self {
        MatchNode::Lookup(name.into())
    }

    pub fn is_and(&self) -> bool {
        matches!(self, MatchNode::And(..))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            MatchNode::Atom(_)
                | MatchNode::Exact(_)
                | MatchNode::Lookup(_)
                | MatchNode::AnyOne
                | MatchNode::AnyPlus
                | MatchNode::AnyStar
        )
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            MatchNode::And(l, r) | MatchNode::Or(l, r) | MatchNode::Concat(l, r) => 1 + l.size() + r.size(),
            MatchNode::Not(inner) => 1 + inner.size(),
            _ => 1,
        }
    }
}

/// Fully parenthesized rendering, e.g. `(NOT('a') AND ('b' OR "C"))`.
impl fmt::Display for MatchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchNode::And(l, r) => write!(f, "({l} AND {r})"),
            MatchNode::Or(l, r) => write!(f, "({l} OR {r})"),
            MatchNode::Not(inner) => write!(f, "NOT({inner})"),
            MatchNode::Concat(l, r) => write!(f, "{l}_{r}"),
            MatchNode::Atom(w) => write!(f, "'{w}'"),
            MatchNode::Exact(w) => write!(f, "\"{w}\""),
            MatchNode::Lookup(name) => write!(f, "#{name}"),
            MatchNode::AnyOne => f.write_str("?"),
            MatchNode::AnyPlus => f.write_str("+"),
            MatchNode::AnyStar => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_expression() {
        let node = MatchNode::and(
            MatchNode::not(MatchNode::atom("a")),
            MatchNode::or(MatchNode::atom("b"), MatchNode::concat(MatchNode::exact("C"), MatchNode::AnyOne)),
        );
        assert_eq!(node.to_string(), "(NOT('a') AND ('b' OR \"C\"_?))");
        assert_eq!(node.size(), 8);
    }

    #[test]
    fn leaves_have_no_children() {
        assert!(MatchNode::lookup("fruit").is_leaf());
        assert!(MatchNode::AnyStar.is_leaf());
        assert!(!MatchNode::not(MatchNode::AnyStar).is_leaf());
    }
}
