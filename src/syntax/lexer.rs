//! Splits a pattern body into lexemes.
//!
//! Words are runs of alphanumeric characters in any script. Quoted strings
//! take a backslash escape for the next character. Positions are byte offsets
//! into the body.

use crate::error::{Result, parse_error};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Lexeme {
    pub(super) kind: LexemeKind,
    pub(super) start: usize,
}

impl Lexeme {
    pub(super) fn describe(&self) -> String {
        match &self.kind {
            LexemeKind::Word(w) => format!("word '{w}'"),
            LexemeKind::Quoted(w) => format!("'{w}'"),
            LexemeKind::Exact(w) => format!("\"{w}\""),
            LexemeKind::AnyOne => "'?'".to_string(),
            LexemeKind::AnyPlus => "'+'".to_string(),
            LexemeKind::AnyStar => "'*'".to_string(),
            LexemeKind::Not => "'-'".to_string(),
            LexemeKind::Lookup => "'#'".to_string(),
            LexemeKind::And => "'&'".to_string(),
            LexemeKind::Or => "'|'".to_string(),
            LexemeKind::Concat => "'_'".to_string(),
            LexemeKind::LParen => "'('".to_string(),
            LexemeKind::RParen => "')'".to_string(),
            LexemeKind::End => "<end>".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum LexemeKind {
    Word(String),
    /// `'...'`: normalized atom.
    Quoted(String),
    /// `"..."`: exact atom.
    Exact(String),
    AnyOne,
    AnyPlus,
    AnyStar,
    Not,
    Lookup,
    And,
    Or,
    Concat,
    LParen,
    RParen,
    End,
}

pub(super) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn next_lexeme(&mut self) -> Result<Lexeme> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(ch) = self.bump_char() else {
            return Ok(Lexeme { kind: LexemeKind::End, start: self.input.len() });
        };

        let kind = match ch {
            '(' => LexemeKind::LParen,
            ')' => LexemeKind::RParen,
            '&' => LexemeKind::And,
            '|' => LexemeKind::Or,
            '_' => LexemeKind::Concat,
            '-' => LexemeKind::Not,
            '#' => LexemeKind::Lookup,
            '?' => LexemeKind::AnyOne,
            '+' => LexemeKind::AnyPlus,
            '*' => LexemeKind::AnyStar,
            '"' => LexemeKind::Exact(self.lex_quoted('"', start)?),
            '\'' => LexemeKind::Quoted(self.lex_quoted('\'', start)?),
            c if c.is_alphanumeric() => self.lex_word(start),
            other => return Err(parse_error(format!("unexpected character '{other}'"), start)),
        };
        Ok(Lexeme { kind, start })
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Opening quote already consumed.
    fn lex_quoted(&mut self, quote: char, start: usize) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.bump_char() {
                Some('\\') => match self.bump_char() {
                    Some(escaped) => out.push(escaped),
                    None => break,
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(parse_error(format!("unterminated {quote}-quoted string"), start))
    }

    /// First character already consumed.
    fn lex_word(&mut self, start: usize) -> LexemeKind {
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() {
                self.bump_char();
            } else {
                break;
            }
        }
        let word = &self.input[start..self.pos];
        match word {
            "AND" => LexemeKind::And,
            "OR" => LexemeKind::Or,
            "NOT" => LexemeKind::Not,
            "LOOKUP" => LexemeKind::Lookup,
            _ => LexemeKind::Word(word.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<LexemeKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme().unwrap();
            if lexeme.kind == LexemeKind::End {
                return out;
            }
            out.push(lexeme.kind);
        }
    }

    #[test]
    fn symbols_and_words() {
        assert_eq!(kinds("join_?_hub & -x"), vec![
            LexemeKind::Word("join".into()),
            LexemeKind::Concat,
            LexemeKind::AnyOne,
            LexemeKind::Concat,
            LexemeKind::Word("hub".into()),
            LexemeKind::And,
            LexemeKind::Not,
            LexemeKind::Word("x".into()),
        ]);
    }

    #[test]
    fn keywords_must_be_whole_upper_case_words() {
        assert_eq!(kinds("a OR ORANGE or b"), vec![
            LexemeKind::Word("a".into()),
            LexemeKind::Or,
            LexemeKind::Word("ORANGE".into()),
            LexemeKind::Word("or".into()),
            LexemeKind::Word("b".into()),
        ]);
    }

    #[test]
    fn quoted_strings_unescape() {
        assert_eq!(kinds(r#""The" 'can\'t'"#), vec![
            LexemeKind::Exact("The".into()),
            LexemeKind::Quoted("can't".into()),
        ]);
    }

    #[test]
    fn unterminated_quote_reports_its_start() {
        let mut lexer = Lexer::new("a | \"open");
        lexer.next_lexeme().unwrap();
        lexer.next_lexeme().unwrap();
        let err = lexer.next_lexeme().unwrap_err();
        assert_eq!(err.to_string(), "unterminated \"-quoted string at byte 4");
    }

    #[test]
    fn unicode_words_keep_byte_positions() {
        let mut lexer = Lexer::new("café | x");
        assert_eq!(lexer.next_lexeme().unwrap().kind, LexemeKind::Word("café".into()));
        assert_eq!(lexer.next_lexeme().unwrap().start, 6);
    }

    #[test]
    fn rejects_stray_characters() {
        let err = Lexer::new("  $").next_lexeme().unwrap_err();
        assert_eq!(err.to_string(), "unexpected character '$' at byte 2");
    }
}
