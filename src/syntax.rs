//! Pattern language front-end.
//!
//! ```text
//! "fruit = apple | 'pear'_*_\"Juice\""
//!     │ rules.rs   split head / body, line bookkeeping
//!     │ lexer.rs   body -> lexemes with byte positions
//!     │ parser.rs  lexemes -> MatchNode (precedence: _ over & over |)
//!     v
//! MatchNode ─▶ engine (CNF, simplify) ─▶ MatchRule
//! ```
//!
//! Operators have symbolic and keyword spellings: `|`/`OR`, `&`/`AND`,
//! `-`/`NOT`, `#`/`LOOKUP`. Keywords are upper case and must stand alone, so
//! `or` and `ORANGE` are ordinary words.

#[path = "syntax/lexer.rs"]
mod lexer;
#[path = "syntax/parser.rs"]
mod parser;
#[path = "syntax/rules.rs"]
mod rules;

pub use parser::parse_expression;
pub use rules::{compile_body, compile_rule, compile_rule_set};
