//! HTML-ish markup for evaluation results.

use crate::MatchRange;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Wrap every match of `matches` in `<span class="label">`.
///
/// At each byte offset closing markers come before opening ones, and longer
/// ranges open first, so nested matches nest in the output. A range that ends
/// while later-opened spans are still active closes them too; those spans are
/// reopened right after, so overlapping matches come out as split spans. Text
/// between markers is escaped. Empty ranges and ranges that do not fall on
/// character boundaries of `text` are skipped.
///
/// ```
/// use phrasematch::{Options, compile_rule_set, evaluate, highlight};
///
/// let options = Options::default();
/// let rules = compile_rule_set("fruit = pear\nfood = #fruit | bread", &options).unwrap();
/// let out = evaluate("a pear & bread", &rules, &options);
/// assert_eq!(
///     highlight(&out.text, &out.matches),
///     "a <span class=\"fruit\">pear</span> &amp; <span class=\"food\">bread</span>",
/// );
/// ```
pub fn highlight(text: &str, matches: &BTreeMap<String, MatchRange>) -> String {
    let spans: Vec<&MatchRange> =
        matches.values().filter(|m| m.char_start < m.char_end && text.get(m.char_start..m.char_end).is_some()).collect();

    let mut offsets: Vec<usize> = spans.iter().flat_map(|m| [m.char_start, m.char_end]).collect();
    offsets.sort_unstable();
    offsets.dedup();

    let mut out = String::with_capacity(text.len() + spans.len() * 32);
    let mut open: Vec<&MatchRange> = Vec::new();
    let mut cursor = 0;
    for offset in offsets {
        escape_into(&mut out, text.get(cursor..offset).unwrap_or_default());
        cursor = offset;

        // Innermost spans close first; survivors reopen in their old order.
        if let Some(first) = open.iter().position(|m| m.char_end == offset) {
            let closed: Vec<&MatchRange> = open.drain(first..).collect();
            for _ in &closed {
                out.push_str("</span>");
            }
            for m in closed.into_iter().filter(|m| m.char_end != offset) {
                open_span(&mut out, m);
                open.push(m);
            }
        }

        let mut opening: Vec<&MatchRange> = spans.iter().copied().filter(|m| m.char_start == offset).collect();
        opening.sort_by(|a, b| b.char_end.cmp(&a.char_end).then_with(|| a.label.cmp(&b.label)));
        for m in opening {
            open_span(&mut out, m);
            open.push(m);
        }
    }
    escape_into(&mut out, text.get(cursor..).unwrap_or_default());
    out
}

fn open_span(out: &mut String, m: &MatchRange) {
    out.push_str("<span class=\"");
    escape_into(out, &m.label);
    out.push_str("\">");
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => {
                let _ = out.write_char(c);
            }
        }
    }
}
