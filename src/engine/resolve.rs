//! Range resolution.
//!
//! The evaluator works on token indices. Callers want to know which part of
//! the *text* matched, so a token range is resolved into a `MatchRange` by
//! reading the byte spans recorded on the first and last covered tokens:
//!
//! ```text
//! tokens:  [come][to][the][hague]
//! range:          1..3
//! bytes:          tokens[1].char_start .. tokens[2].char_end
//! ```
//!
//! Empty ranges have no covered token. They resolve to an empty byte range at
//! the start of the token at `range.start`, at the end of the text's last
//! token when `range.start` is past the end, or at 0 for an empty input.

use crate::{MatchRange, Range, Token};

pub(crate) fn resolve_range(label: &str, range: Range, tokens: &[Token]) -> MatchRange {
    let (char_start, char_end) = if range.is_empty() {
        let at = match tokens.get(range.start) {
            Some(token) => token.char_start,
            None => tokens.last().map_or(0, |t| t.char_end),
        };
        (at, at)
    } else {
        let start = tokens.get(range.start).map_or(0, |t| t.char_start);
        let end = tokens.get(range.end - 1).map_or(start, |t| t.char_end);
        (start, end)
    };

    MatchRange { label: label.to_string(), token_start: range.start, token_end: range.end, char_start, char_end }
}
