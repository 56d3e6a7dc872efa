//! Turning raw text into tokens.
//!
//! Two independent pieces, both plain values passed around explicitly:
//!
//! - `Tokenizer` cuts text into word-like spans and records byte offsets.
//! - `Normalizer` maps a word to the form used for normalized comparisons.
//!
//! The same normalizer must be used for the text and for the patterns that
//! are matched against it, or normalized atoms will never compare equal.

#[path = "text/normalize.rs"]
mod normalize;
#[path = "text/tokenize.rs"]
mod tokenize;

pub use normalize::{NormalizeStep, Normalizer};
pub use tokenize::Tokenizer;
