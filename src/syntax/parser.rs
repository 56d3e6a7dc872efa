use super::lexer::{Lexeme, LexemeKind, Lexer};
use crate::ast::MatchNode;
use crate::error::{Result, parse_error};

/// Parse a pattern body into an expression tree.
///
/// ```
/// use phrasematch::parse_expression;
///
/// let node = parse_expression("apple | pear_*_juice & -\"Banana\"").unwrap();
/// assert_eq!(node.to_string(), "('apple' OR ('pear'_*_'juice' AND NOT(\"Banana\")))");
/// ```
pub fn parse_expression(src: &str) -> Result<MatchNode> {
    let mut parser = Parser::new(src)?;
    let node = parser.parse_or()?;
    parser.expect_end()?;
    Ok(node)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Lexeme,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_lexeme()?;
        Ok(Self { lexer, current })
    }

    fn expect_end(&self) -> Result<()> {
        if matches!(self.current.kind, LexemeKind::End) {
            Ok(())
        } else {
            Err(parse_error(format!("expected an operator but found {}", self.current.describe()), self.current.start))
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_lexeme()?;
        Ok(())
    }

    fn parse_or(&mut self) -> Result<MatchNode> {
        self.parse_chain(Self::parse_and, LexemeKind::Or, MatchNode::or)
    }

    fn parse_and(&mut self) -> Result<MatchNode> {
        self.parse_chain(Self::parse_concat, LexemeKind::And, MatchNode::and)
    }

    fn parse_concat(&mut self) -> Result<MatchNode> {
        self.parse_chain(Self::parse_atom, LexemeKind::Concat, MatchNode::concat)
    }

    /// Left-associative `operand (op operand)*`.
    fn parse_chain<F, B>(&mut self, mut parse_operand: F, operator: LexemeKind, build: B) -> Result<MatchNode>
    where
        F: FnMut(&mut Self) -> Result<MatchNode>,
        B: Fn(MatchNode, MatchNode) -> MatchNode,
    {
        let mut node = parse_operand(self)?;
        while self.current.kind == operator {
            self.advance()?;
            let rhs = parse_operand(self)?;
            node = build(node, rhs);
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<MatchNode> {
        let lexeme = self.current.clone();
        let node = match lexeme.kind {
            LexemeKind::Word(w) | LexemeKind::Quoted(w) => MatchNode::Atom(w),
            LexemeKind::Exact(w) => MatchNode::Exact(w),
            LexemeKind::AnyOne => MatchNode::AnyOne,
            LexemeKind::AnyPlus => MatchNode::AnyPlus,
            LexemeKind::AnyStar => MatchNode::AnyStar,
            LexemeKind::Not => {
                self.advance()?;
                return Ok(MatchNode::not(self.parse_atom()?));
            }
            LexemeKind::Lookup => {
                self.advance()?;
                return match self.current.kind.clone() {
                    LexemeKind::Word(name) => {
                        self.advance()?;
                        Ok(MatchNode::Lookup(name))
                    }
                    _ => Err(parse_error("expected a rule name after '#'", self.current.start)),
                };
            }
            LexemeKind::LParen => {
                self.advance()?;
                let inner = self.parse_or()?;
                if self.current.kind != LexemeKind::RParen {
                    return Err(parse_error("missing ')'", lexeme.start));
                }
                self.advance()?;
                return Ok(inner);
            }
            LexemeKind::End => return Err(parse_error("expected a pattern", lexeme.start)),
            _ => {
                return Err(parse_error(format!("expected a pattern but found {}", lexeme.describe()), lexeme.start));
            }
        };
        self.advance()?;
        Ok(node)
    }
}
