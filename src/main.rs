mod debug_report;

use phrasematch::{
    MatchError, MatchRule, MatchRuleSet, Normalizer, Options, QueryConverter, Tokenizer, compile_pattern,
    compile_rule_set, evaluate_parallel, evaluate_verbose,
};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PHRASEMATCH_LOG";
const EXPR_LABEL: &str = "expr";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging(config.debug);

    let rules = match load_rules(&config.source, &config.options) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let run = if config.parallel {
        debug_report::Run { evaluation: evaluate_parallel(&config.input, &rules, &config.options), metrics: None }
    } else {
        let verbose = evaluate_verbose(&config.input, &rules, &config.options);
        debug_report::Run { evaluation: verbose.evaluation, metrics: Some(verbose.metrics) }
    };

    let report = debug_report::ReportOptions {
        color: config.color,
        highlight: config.highlight,
        query: config.query,
        options: &config.options,
    };
    debug_report::print_run(&rules, &run, &report);
}

enum RuleSource {
    File(PathBuf),
    Expr(String),
}

struct CliConfig {
    input: String,
    source: RuleSource,
    options: Options,
    parallel: bool,
    highlight: bool,
    query: Option<QueryConverter>,
    color: bool,
    debug: bool,
}

/// Logs go to stderr. `--debug` wins over `PHRASEMATCH_LOG`.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber that is already installed stays in place.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(true).try_init();
}

fn load_rules(source: &RuleSource, options: &Options) -> Result<MatchRuleSet, MatchError> {
    match source {
        RuleSource::File(path) => {
            let text = std::fs::read_to_string(path)?;
            compile_rule_set(&text, options)
        }
        RuleSource::Expr(expr) => {
            let cnf = compile_pattern(expr, options)?;
            MatchRuleSet::new(vec![MatchRule::new(EXPR_LABEL, cnf)])
        }
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut source: Option<RuleSource> = None;
    let mut options = Options::default();
    let mut parallel = false;
    let mut highlight = false;
    let mut query = None;
    let mut color = io::stdout().is_terminal();
    let mut debug = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("phrasematch {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--debug" => debug = true,
            "--parallel" => parallel = true,
            "--highlight" => highlight = true,
            "--no-simplify" => options.simplify = false,
            "-r" | "--rules" => {
                let value = take_value(&flag, inline, &mut args)?;
                set_source(&mut source, RuleSource::File(PathBuf::from(value)))?;
            }
            "-e" | "--expr" => {
                let value = take_value(&flag, inline, &mut args)?;
                set_source(&mut source, RuleSource::Expr(value))?;
            }
            "--tokenizer" => {
                let value = take_value(&flag, inline, &mut args)?;
                options.tokenizer = Tokenizer::from_name(&value).ok_or_else(|| {
                    format!("error: invalid --tokenizer '{value}' (expected matching, splitting or whitespace)")
                })?;
            }
            "--normalizer" => {
                let value = take_value(&flag, inline, &mut args)?;
                options.normalizer = Normalizer::preset(&value)
                    .ok_or_else(|| format!("error: invalid --normalizer '{value}' (expected default, lower or none)"))?;
            }
            "--query" => {
                let value = take_value(&flag, inline, &mut args)?;
                query = Some(QueryConverter::preset(&value).ok_or_else(|| {
                    format!("error: invalid --query '{value}' (expected default, lucene or postgres)")
                })?);
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args.by_ref()).collect::<Vec<_>>().join(" ");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let Some(source) = source else {
        return Err(format!("error: one of --rules or --expr is required\n\n{}", help_text()));
    };

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, source, options, parallel, highlight, query, color, debug })
}

fn take_value(flag: &str, inline: Option<String>, args: &mut impl Iterator<Item = String>) -> Result<String, String> {
    inline.or_else(|| args.next()).ok_or_else(|| format!("error: {flag} expects a value"))
}

fn set_source(slot: &mut Option<RuleSource>, source: RuleSource) -> Result<(), String> {
    if slot.is_some() {
        return Err("error: --rules and --expr are mutually exclusive and may be given once".to_string());
    }
    *slot = Some(source);
    Ok(())
}

fn set_input(slot: &mut Option<String>, input: String) -> Result<(), String> {
    if slot.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *slot = Some(input);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "phrasematch {version}

Label text spans with boolean phrase patterns.

Usage:
  phrasematch [OPTIONS] --rules <file> [--] <text...>
  phrasematch [OPTIONS] --expr <expression> [--] <text...>

Text is read from stdin when no text arguments are given.

Options:
  -r, --rules <file>         Rule-set source: one `name = expression` per line,
                             `//` starts a comment line.
  -e, --expr <expression>    Single expression, reported as label \"{label}\".
  --tokenizer <kind>         matching | splitting | whitespace (default: matching)
  --normalizer <kind>        default | lower | none (default: default)
  --no-simplify              Keep compiled expressions unsimplified.
  --parallel                 Evaluate rules on a thread pool.
  --highlight                Print the text with <span> markup per label.
  --query <preset>           Also print each expression as a query:
                             default | lucene | postgres
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  --debug                    Debug logging on stderr (else ${log_env}, default warn).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  The rules or expression failed to compile.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        label = EXPR_LABEL,
        log_env = LOG_ENV,
    )
}
