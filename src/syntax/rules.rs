//! Rule lines and rule-set sources.
//!
//! ```text
//! // comment
//! fruit = apple | pear
//! food  = bread | #fruit
//! ```
//!
//! Lines are trimmed. Blank lines and `//` comments are skipped. Every other
//! line splits at its first `=` into a head and a body.

use super::parse_expression;
use crate::api::Options;
use crate::engine::{Cnf, MatchRule, MatchRuleSet, simplify, to_cnf};
use crate::error::{MatchError, Result};
use tracing::debug;

/// Compile a pattern body into CNF, simplified unless `options.simplify` is off.
pub fn compile_body(src: &str, options: &Options) -> Result<Cnf> {
    let node = parse_expression(src)?;
    let cnf = to_cnf(&node, &options.normalizer)?;
    Ok(if options.simplify { simplify(cnf) } else { cnf })
}

/// Compile a single `head = body` line.
///
/// ```
/// use phrasematch::{Options, compile_rule};
///
/// let rule = compile_rule("fruit = apple | Pear", &Options::default()).unwrap();
/// assert_eq!(rule.head(), "fruit");
/// assert_eq!(rule.expression().to_string(), "[[apple, pear]]");
/// ```
pub fn compile_rule(line: &str, options: &Options) -> Result<MatchRule> {
    compile_line(line.trim(), 1, options)
}

/// Compile a whole rule source and validate it as a set.
pub fn compile_rule_set(source: &str, options: &Options) -> Result<MatchRuleSet> {
    let mut rules = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        rules.push(compile_line(line, index + 1, options)?);
    }
    debug!(rules = rules.len(), simplify = options.simplify, "compiled rule source");
    MatchRuleSet::new(rules)
}

fn compile_line(line: &str, number: usize, options: &Options) -> Result<MatchRule> {
    let Some((head, body)) = line.split_once('=') else {
        return Err(MatchError::MissingAssignment { line: number });
    };

    let head = head.trim();
    if head.is_empty() || !head.chars().all(char::is_alphanumeric) {
        return Err(MatchError::InvalidRuleHead { head: head.to_string(), line: number });
    }

    let expression = compile_body(body.trim(), options).map_err(|err| match err {
        MatchError::Parse { message, position } => {
            MatchError::Parse { message: format!("line {number}: {message}"), position }
        }
        other => other,
    })?;
    Ok(MatchRule::new(head, expression))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let src = "// fruit\n\n  fruit = apple | pear\n   // food\nfood = bread | #fruit\n";
        let set = compile_rule_set(src, &Options::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.lookups_of("food"), vec!["fruit"]);
    }

    #[test]
    fn missing_assignment_names_the_line() {
        let err = compile_rule_set("a = x\n\nb x y", &Options::default()).unwrap_err();
        assert!(matches!(err, MatchError::MissingAssignment { line: 3 }));
    }

    #[test]
    fn rejects_bad_heads() {
        let err = compile_rule("my rule = x", &Options::default()).unwrap_err();
        assert!(matches!(err, MatchError::InvalidRuleHead { ref head, line: 1 } if head == "my rule"));
        assert!(compile_rule(" = x", &Options::default()).is_err());
    }

    #[test]
    fn body_may_contain_equals_in_quotes() {
        let rule = compile_rule("eq = \"a=b\"", &Options::default()).unwrap();
        assert_eq!(rule.expression().to_string(), "[[a=b]]");
    }

    #[test]
    fn parse_errors_carry_the_line() {
        let err = compile_rule_set("a = x\nb = (y", &Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "line 2: missing ')' at byte 0");
    }

    #[test]
    fn simplification_is_optional() {
        let raw = Options { simplify: false, ..Options::default() };
        assert_eq!(compile_body("a & (a | b)", &raw).unwrap().len(), 2);
        assert_eq!(compile_body("a & (a | b)", &Options::default()).unwrap().len(), 1);
    }

    #[test]
    fn literal_tokens_use_the_configured_normalizer() {
        let cnf = compile_body("Café_'Noir' | \"Noir\"", &Options::default()).unwrap();
        assert_eq!(cnf.to_string(), "[[Noir, cafe_noir]]");
    }
}
