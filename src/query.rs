//! Export of compiled patterns to full-text query syntaxes.
//!
//! The projection is one-way and lossy: lookups become plain terms, wildcards
//! are usually dropped, and adjacency may turn into conjunction. It is meant
//! for pre-filtering a document store before running the real matcher.
//!
//! ```text
//! [[apple, pear], [-rotten]]
//!   default   ("apple" | "pear") & (not("rotten"))
//!   lucene    (+"apple" OR +"pear") AND (-(+"rotten"))
//!   postgres  (apple | pear) & (!(rotten))
//! ```

use crate::engine::{Cnf, Literal};
use std::fmt::Write;

bitflags::bitflags! {
    /// Rendering switches for [`QueryConverter`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u8 {
        /// Leave `?`, `+` and `*` out of rendered sequences.
        const IGNORE_WILDCARDS         = 1 << 0;
        /// Join sequence tokens with the AND operator instead of a space.
        const SEQUENCES_AS_CONJUNCTION = 1 << 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConverter {
    pub and_op: String,
    pub or_op: String,
    /// Prefix for negated literals, applied as `not_op(...)`.
    pub not_op: String,
    pub quote_begin: String,
    pub quote_end: String,
    pub flags: RenderFlags,
}

impl Default for QueryConverter {
    fn default() -> Self {
        QueryConverter {
            and_op: " & ".to_string(),
            or_op: " | ".to_string(),
            not_op: "not".to_string(),
            quote_begin: "\"".to_string(),
            quote_end: "\"".to_string(),
            flags: RenderFlags::all(),
        }
    }
}

impl QueryConverter {
    /// Lucene query parser syntax. Sequences become phrase queries.
    pub fn lucene() -> Self {
        QueryConverter {
            and_op: " AND ".to_string(),
            or_op: " OR ".to_string(),
            not_op: "-".to_string(),
            quote_begin: "+\"".to_string(),
            quote_end: "\"".to_string(),
            flags: RenderFlags::IGNORE_WILDCARDS,
        }
    }

    /// PostgreSQL `tsquery` syntax. Sequences become conjunctions.
    pub fn postgres() -> Self {
        QueryConverter {
            and_op: " & ".to_string(),
            or_op: " | ".to_string(),
            not_op: "!".to_string(),
            quote_begin: String::new(),
            quote_end: String::new(),
            flags: RenderFlags::all(),
        }
    }

    /// `default`, `lucene` or `postgres`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(QueryConverter::default()),
            "lucene" => Some(QueryConverter::lucene()),
            "postgres" => Some(QueryConverter::postgres()),
            _ => None,
        }
    }

    /// Render `cnf`. Literals left without tokens (a lone wildcard) are
    /// skipped, and so are disjunctions left empty.
    pub fn convert(&self, cnf: &Cnf) -> String {
        let clauses: Vec<String> = cnf
            .clauses()
            .iter()
            .filter_map(|clause| {
                let terms: Vec<String> = clause.iter().filter_map(|lit| self.literal(lit)).collect();
                (!terms.is_empty()).then(|| format!("({})", terms.join(&self.or_op)))
            })
            .collect();
        clauses.join(&self.and_op)
    }

    fn literal(&self, literal: &Literal) -> Option<String> {
        let separator = if self.flags.contains(RenderFlags::SEQUENCES_AS_CONJUNCTION) { &self.and_op } else { " " };
        let words: Vec<&str> = literal
            .tokens()
            .iter()
            .filter(|t| !(self.flags.contains(RenderFlags::IGNORE_WILDCARDS) && t.as_wildcard().is_some()))
            .map(|t| t.key())
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut out = String::new();
        if literal.is_negated() {
            let _ = write!(out, "{}(", self.not_op);
        }
        let _ = write!(out, "{}{}{}", self.quote_begin, words.join(separator), self.quote_end);
        if literal.is_negated() {
            out.push(')');
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Options, compile_pattern};

    fn cnf(src: &str) -> Cnf {
        compile_pattern(src, &Options::default()).unwrap()
    }

    #[test]
    fn presets_render_the_same_cnf() {
        let c = cnf("(apple | pear) & -rotten");
        assert_eq!(QueryConverter::default().convert(&c), "(\"apple\" | \"pear\") & (not(\"rotten\"))");
        assert_eq!(QueryConverter::lucene().convert(&c), "(+\"apple\" OR +\"pear\") AND (-(+\"rotten\"))");
        assert_eq!(QueryConverter::postgres().convert(&c), "(apple | pear) & (!(rotten))");
    }

    #[test]
    fn sequences_as_phrase_or_conjunction() {
        let c = cnf("join_?_hub");
        assert_eq!(QueryConverter::lucene().convert(&c), "(+\"join hub\")");
        assert_eq!(QueryConverter::postgres().convert(&c), "(join & hub)");
    }

    #[test]
    fn wildcards_kept_when_asked() {
        let converter = QueryConverter { flags: RenderFlags::empty(), ..QueryConverter::default() };
        assert_eq!(converter.convert(&cnf("join_*_hub")), "(\"join * hub\")");
    }

    #[test]
    fn lone_wildcards_disappear() {
        assert_eq!(QueryConverter::default().convert(&cnf("* & x")), "(\"x\")");
    }
}
