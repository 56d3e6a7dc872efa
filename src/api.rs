use crate::engine::{self, Cnf, EvalMetrics, MatchRuleSet};
use crate::error::Result;
use crate::syntax::compile_body;
use crate::text::{Normalizer, Tokenizer};
use crate::{MatchRange, Range, Token};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Compilation and tokenization settings.
///
/// Passed explicitly to every entry point; there is no process-wide default.
/// Text and patterns must share the same normalizer.
#[derive(Debug, Clone)]
pub struct Options {
    pub normalizer: Normalizer,
    pub tokenizer: Tokenizer,
    /// Run the simplifier after CNF conversion.
    pub simplify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { normalizer: Normalizer::default(), tokenizer: Tokenizer::default(), simplify: true }
    }
}

/// Result from [`evaluate`].
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The evaluated input text.
    pub text: String,
    pub tokens: Vec<Token>,
    /// One entry per matching rule.
    pub matches: BTreeMap<String, MatchRange>,
    /// Tokenization plus evaluation.
    pub elapsed: Duration,
}

impl Evaluation {
    pub fn is_match(&self, label: &str) -> bool {
        self.matches.contains_key(label)
    }

    /// Slice of the input covered by `label`'s match.
    pub fn body(&self, label: &str) -> Option<&str> {
        let m = self.matches.get(label)?;
        self.text.get(m.char_start..m.char_end)
    }
}

/// Result from [`evaluate_verbose`].
#[derive(Debug, Clone)]
pub struct EvaluationVerbose {
    pub evaluation: Evaluation,
    pub metrics: EvalMetrics,
}

/// Tokenize `text` with the configured tokenizer and normalizer.
pub fn text_to_tokens(text: &str, options: &Options) -> Vec<Token> {
    options.tokenizer.tokenize(text, &options.normalizer)
}

/// Compile a single pattern expression.
pub fn compile_pattern(src: &str, options: &Options) -> Result<Cnf> {
    compile_body(src, options)
}

/// Evaluate a compiled pattern without rule context.
///
/// `#name` lookups have nothing to resolve against here and are matched as
/// plain tokens; use a [`MatchRuleSet`] for lookups.
pub fn find_range(tokens: &[Token], cnf: &Cnf) -> Option<Range> {
    engine::find_range(tokens, cnf)
}

/// Compile `pattern`, tokenize `text` and report where it matches.
///
/// The match is labeled with the pattern source.
///
/// # Example
/// ```
/// use phrasematch::{Options, find_range_in_text};
///
/// let text = "Come to The Hague to join the Hub!";
/// let m = find_range_in_text(text, "join & hub", &Options::default()).unwrap().unwrap();
/// assert_eq!(&text[m.char_start..m.char_end], "join the Hub");
/// ```
pub fn find_range_in_text(text: &str, pattern: &str, options: &Options) -> Result<Option<MatchRange>> {
    let cnf = compile_pattern(pattern, options)?;
    let tokens = text_to_tokens(text, options);
    Ok(engine::find_range(&tokens, &cnf).map(|range| engine::resolve_range(pattern, range, &tokens)))
}

pub fn contains(tokens: &[Token], cnf: &Cnf) -> bool {
    engine::find_range(tokens, cnf).is_some()
}

/// True when at least one pattern matches. False for an empty slice.
pub fn contains_any(tokens: &[Token], patterns: &[Cnf]) -> bool {
    patterns.iter().any(|cnf| contains(tokens, cnf))
}

/// True when every pattern matches. True for an empty slice.
pub fn contains_all(tokens: &[Token], patterns: &[Cnf]) -> bool {
    patterns.iter().all(|cnf| contains(tokens, cnf))
}

/// Tokenize `text` and evaluate every rule of `rules` against it.
///
/// # Example
/// ```
/// use phrasematch::{Options, compile_rule_set, evaluate};
///
/// let options = Options::default();
/// let rules = compile_rule_set("fruit = apple | pear\nfood = bread | #fruit", &options).unwrap();
/// let out = evaluate("the monkey eats a pear", &rules, &options);
/// assert_eq!(out.body("fruit"), Some("pear"));
/// assert_eq!(out.body("food"), Some("pear"));
/// ```
pub fn evaluate(text: &str, rules: &MatchRuleSet, options: &Options) -> Evaluation {
    let started = Instant::now();
    let tokens = text_to_tokens(text, options);
    let matches = rules.evaluate(&tokens);
    Evaluation { text: text.to_string(), tokens, matches, elapsed: started.elapsed() }
}

/// [`evaluate`] on rayon's thread pool, one task per rule.
pub fn evaluate_parallel(text: &str, rules: &MatchRuleSet, options: &Options) -> Evaluation {
    let started = Instant::now();
    let tokens = text_to_tokens(text, options);
    let matches = rules.evaluate_parallel(&tokens);
    Evaluation { text: text.to_string(), tokens, matches, elapsed: started.elapsed() }
}

/// Like [`evaluate`], with per-rule timings.
///
/// The default [`evaluate`] path does not time individual rules.
pub fn evaluate_verbose(text: &str, rules: &MatchRuleSet, options: &Options) -> EvaluationVerbose {
    let started = Instant::now();
    let tokens = text_to_tokens(text, options);
    let tokenize = started.elapsed();

    let (matches, mut metrics) = rules.evaluate_with_metrics(&tokens);
    metrics.tokenize = tokenize;

    let evaluation = Evaluation { text: text.to_string(), tokens, matches, elapsed: started.elapsed() };
    EvaluationVerbose { evaluation, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::compile_rule_set;

    #[test]
    fn evaluate_returns_labeled_bodies() {
        let options = Options::default();
        let rules = compile_rule_set("greeting = hello | hi\nnoun = world", &options).unwrap();
        let out = evaluate("Hi there, World!", &rules, &options);

        assert_eq!(out.text, "Hi there, World!");
        assert_eq!(out.body("greeting"), Some("Hi"));
        assert_eq!(out.body("noun"), Some("World"));
        assert!(!out.is_match("other"));
        assert_eq!(out.tokens.len(), 3);
    }

    #[test]
    fn parallel_evaluation_agrees() {
        let options = Options::default();
        let rules = compile_rule_set("fruit = apple | pear\nfood = bread | #fruit\nnone = -#food", &options).unwrap();
        let text = "bread and pears, then a pear";
        assert_eq!(evaluate_parallel(text, &rules, &options).matches, evaluate(text, &rules, &options).matches);
    }

    #[test]
    fn evaluate_verbose_includes_metrics() {
        let options = Options::default();
        let rules = compile_rule_set("a = x\nb = y\nc = #a & #b", &options).unwrap();
        let out = evaluate_verbose("x y", &rules, &options);

        assert_eq!(out.metrics.rules.len(), 3);
        assert_eq!(out.metrics.matched(), 3);
        assert!(out.metrics.total() <= out.evaluation.elapsed);
        assert_eq!(out.evaluation.matches.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn contains_helpers() {
        let options = Options::default();
        let tokens = text_to_tokens("I like apple juice", &options);
        let apple = compile_pattern("apple", &options).unwrap();
        let pear = compile_pattern("pear", &options).unwrap();

        assert!(contains(&tokens, &apple));
        assert!(contains_any(&tokens, &[pear.clone(), apple.clone()]));
        assert!(!contains_all(&tokens, &[pear, apple]));
        assert!(contains_all(&tokens, &[]));
        assert!(!contains_any(&tokens, &[]));
    }

    #[test]
    fn compile_errors_surface() {
        assert!(find_range_in_text("text", "a &", &Options::default()).is_err());
    }
}
