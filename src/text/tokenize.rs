use super::Normalizer;
use crate::Token;
use regex::Regex;

/// How text is cut into tokens.
///
/// Every tokenizer records byte offsets into the source text and assigns
/// sequential positions starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tokenizer {
    /// Words (letters with inner apostrophes), number-like runs, `#tags` and
    /// `@handles`. Everything else is skipped.
    #[default]
    Matching,
    /// Runs of characters between whitespace and `,.:;?![](){}&|/<=>`.
    Splitting,
    /// Runs of non-whitespace.
    Whitespace,
}

impl Tokenizer {
    /// `matching`, `splitting` or `whitespace`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "matching" => Some(Tokenizer::Matching),
            "splitting" => Some(Tokenizer::Splitting),
            "whitespace" => Some(Tokenizer::Whitespace),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tokenizer::Matching => "matching",
            Tokenizer::Splitting => "splitting",
            Tokenizer::Whitespace => "whitespace",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Tokenizer::Matching => {
                regex!(r"[-+]?[0-9]+[0-9.,]*|[#@]+[A-Za-z0-9_-]+|\p{L}\p{M}*(?:[\p{L}\p{M}']*\p{L}\p{M}*)?")
            }
            Tokenizer::Splitting => regex!(r"[^ \t\n\r\x0C,.:;?!\[\](){}&|/<=>]+"),
            Tokenizer::Whitespace => regex!(r"\S+"),
        }
    }

    /// Cut `text` into tokens, normalizing each word with `normalizer`.
    ///
    /// ```
    /// use phrasematch::{Normalizer, Tokenizer};
    ///
    /// let tokens = Tokenizer::Matching.tokenize("Come to The Hague!", &Normalizer::default());
    /// let words: Vec<&str> = tokens.iter().map(|t| t.normalized.as_str()).collect();
    /// assert_eq!(words, ["come", "to", "the", "hague"]);
    /// assert_eq!((tokens[3].char_start, tokens[3].char_end), (12, 17));
    /// ```
    pub fn tokenize(self, text: &str, normalizer: &Normalizer) -> Vec<Token> {
        self.pattern()
            .find_iter(text)
            .enumerate()
            .map(|(position, m)| {
                Token::at(m.as_str(), position, m.start(), m.end()).with_normalized(normalizer.normalize(m.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokenizer: Tokenizer, text: &str) -> Vec<String> {
        tokenizer.tokenize(text, &Normalizer::identity()).into_iter().map(|t| t.word).collect()
    }

    #[test]
    fn matching_keeps_words_numbers_tags() {
        assert_eq!(words(Tokenizer::Matching, "I am @arvid, so you #know... Can't complain! 41.4 -56?"), vec![
            "I", "am", "@arvid", "so", "you", "#know", "Can't", "complain", "41.4", "-56"
        ]);
    }

    #[test]
    fn matching_handles_accented_words() {
        let tokens = Tokenizer::Matching.tokenize("un café noir", &Normalizer::default());
        assert_eq!(tokens[1].word, "café");
        assert_eq!(tokens[1].normalized, "cafe");
        assert_eq!((tokens[1].char_start, tokens[1].char_end), (3, 8));
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn splitting_cuts_on_punctuation() {
        assert_eq!(words(Tokenizer::Splitting, "a,b (c) d/e $1"), vec!["a", "b", "c", "d", "e", "$1"]);
    }

    #[test]
    fn whitespace_keeps_punctuation() {
        assert_eq!(words(Tokenizer::Whitespace, " Hub!  now\t"), vec!["Hub!", "now"]);
    }

    #[test]
    fn names_round_trip() {
        for t in [Tokenizer::Matching, Tokenizer::Splitting, Tokenizer::Whitespace] {
            assert_eq!(Tokenizer::from_name(t.name()), Some(t));
        }
        assert_eq!(Tokenizer::from_name("bpe"), None);
    }
}
