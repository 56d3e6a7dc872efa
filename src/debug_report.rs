use phrasematch::{EvalMetrics, Evaluation, MatchRuleSet, Options, QueryConverter, highlight};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

/// One evaluation, with metrics when the sequential evaluator ran.
pub struct Run {
    pub evaluation: Evaluation,
    pub metrics: Option<EvalMetrics>,
}

pub struct ReportOptions<'a> {
    pub color: bool,
    pub highlight: bool,
    pub query: Option<QueryConverter>,
    pub options: &'a Options,
}

pub fn print_run(rules: &MatchRuleSet, run: &Run, report: &ReportOptions<'_>) {
    let palette = ansi::Palette::new(report.color);
    let evaluation = &run.evaluation;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Matching: \"{}\"", evaluation.text.trim_end()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    print_rules(rules, report, &palette);

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    print_tokens(evaluation, report.options, &palette);

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if evaluation.matches.is_empty() {
        println!("{}", palette.dim("  No rule matched"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Text and patterns normalize differently (quoted \"Exact\" atoms compare case)");
        println!("  • A `+` wildcard needs at least one token in between");
        println!("  • A negated literal found its pattern");
        println!("\n{}", palette.dim("  Tip: run with --debug or PHRASEMATCH_LOG=trace to follow lookups"));
    } else {
        print_results(evaluation, &palette);
    }

    if report.highlight {
        println!("\n{}", palette.paint("━━━ Highlight ━━━", ansi::GRAY));
        println!("  {}", highlight(&evaluation.text, &evaluation.matches));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    print_timing(run, &palette);
    println!();
}

fn print_rules(rules: &MatchRuleSet, report: &ReportOptions<'_>, palette: &ansi::Palette) {
    for rule in rules.iter() {
        println!("  {} {}", palette.bold(palette.paint(rule.head(), ansi::BLUE)), palette.dim(rule.expression().to_string()));

        let lookups = rules.lookups_of(rule.head());
        if !lookups.is_empty() {
            println!("      {} {}", palette.dim("looks up:"), palette.paint(lookups.join(", "), ansi::MAGENTA));
        }
        if let Some(converter) = &report.query {
            println!("      {} {}", palette.dim("query:"), palette.paint(converter.convert(rule.expression()), ansi::CYAN));
        }
    }
}

fn print_tokens(evaluation: &Evaluation, options: &Options, palette: &ansi::Palette) {
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("count:"),
        palette.paint(evaluation.tokens.len().to_string(), ansi::YELLOW),
        palette.dim("tokenizer:"),
        palette.paint(options.tokenizer.name(), ansi::BLUE),
        palette.dim("normalizer:"),
        palette.paint(options.normalizer.to_string(), ansi::BLUE),
    );

    let shown: Vec<&str> = evaluation.tokens.iter().take(24).map(|t| t.normalized.as_str()).collect();
    let mut line = shown.join(" ");
    if evaluation.tokens.len() > shown.len() {
        line.push_str(&format!(" ... +{} more", evaluation.tokens.len() - shown.len()));
    }
    println!("  {}", palette.dim(line));
}

fn print_results(evaluation: &Evaluation, palette: &ansi::Palette) {
    for (idx, m) in evaluation.matches.values().enumerate() {
        println!(
            "  {} {} {} {}  {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(&m.label, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("tokens {}..{}", m.token_start, m.token_end), ansi::YELLOW),
            palette.dim(format!("bytes {}..{}", m.char_start, m.char_end)),
        );
        if let Some(body) = evaluation.body(&m.label) {
            println!("      {} {}", palette.dim("body:"), palette.paint(format!("\"{body}\""), ansi::CYAN));
        }
    }
}

fn print_timing(run: &Run, palette: &ansi::Palette) {
    let Some(metrics) = &run.metrics else {
        println!(
            "  Total: {}  │  {}",
            palette.paint(format!("{:?}", run.evaluation.elapsed), ansi::GREEN),
            palette.dim("parallel evaluation, no per-rule timings"),
        );
        return;
    };

    println!(
        "  Total: {}  │  Tokenize: {}  │  Evaluate: {}",
        palette.paint(format!("{:?}", run.evaluation.elapsed), ansi::GREEN),
        palette.dim(format!("{:?}", metrics.tokenize)),
        palette.paint(format!("{:?}", metrics.evaluate), ansi::CYAN),
    );
    if let Some(slowest) = metrics.slowest() {
        println!(
            "  {} {} {}  {} {}",
            palette.dim("slowest:"),
            palette.paint(&slowest.rule, ansi::BLUE),
            palette.dim(format!("{:?}", slowest.duration)),
            palette.dim("clauses:"),
            palette.paint(slowest.clauses.to_string(), ansi::YELLOW),
        );
    }
}
