//! Recursive descent parser for filter expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or         := and ("or" and)*
//! and        := unary ("and" unary)*
//! unary      := "not" unary | comparison
//! comparison := primary (op primary)?
//! primary    := "(" or ")" | literal | function "(" args ")" | property
//! ```
//!
//! Input is bounded: filters longer than [`MAX_FILTER_LENGTH`] bytes, nested
//! deeper than [`MAX_DEPTH`] or joined by more than [`MAX_OPERATORS`]
//! boolean operators are rejected as malformed.
//!
//! Constructs outside this grammar that are valid in the wider filter
//! language (arithmetic, `has`, `in`, lambdas, navigation paths, other
//! functions) are reported as unsupported rather than malformed.

use crate::error::{SearchError, SearchResult};
use crate::filter::ast::{CompareOp, Expr, Literal, Operand, StringFunction};
use crate::filter::lexer::{Spanned, Token, tokenize};

/// Longest accepted filter, in bytes.
pub const MAX_FILTER_LENGTH: usize = 4096;

/// Deepest accepted nesting of parentheses and `not`.
pub const MAX_DEPTH: usize = 64;

/// Most `and`, `or` and `not` operators accepted in one filter.
pub const MAX_OPERATORS: usize = 256;

const ARITHMETIC: [&str; 6] = ["add", "sub", "mul", "div", "divby", "mod"];
const LAMBDAS: [&str; 2] = ["any", "all"];

/// Parses a filter expression.
///
/// ## Errors
///
/// Returns `SearchError::InvalidFilter` for malformed input and
/// `SearchError::UnsupportedQuery` for valid but unsupported constructs.
pub fn parse(input: &str) -> SearchResult<Expr> {
    if input.len() > MAX_FILTER_LENGTH {
        return Err(SearchError::invalid(
            MAX_FILTER_LENGTH,
            format!("filter longer than {MAX_FILTER_LENGTH} bytes"),
        ));
    }
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SearchError::invalid(0, "empty filter"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
        operators: 0,
    };
    let expr = parser.or()?;

    if let Some(spanned) = parser.peek() {
        return Err(SearchError::invalid(
            spanned.position,
            format!("unexpected {}", describe(&spanned.token)),
        ));
    }
    Ok(expr)
}

// What a primary production produced: either a value that may take part in
// a comparison, or a complete condition.
enum Term {
    Operand(Operand),
    Condition(Expr),
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
    operators: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_keyword(&self) -> Option<&str> {
        match self.peek() {
            Some(Spanned {
                token: Token::Ident(word),
                ..
            }) => Some(word.as_str()),
            _ => None,
        }
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |s| s.position)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn expect(&mut self, expected: &Token) -> SearchResult<()> {
        match self.next() {
            Some(spanned) if &spanned.token == expected => Ok(()),
            Some(spanned) => Err(SearchError::invalid(
                spanned.position,
                format!(
                    "expected {}, found {}",
                    describe(expected),
                    describe(&spanned.token)
                ),
            )),
            None => Err(SearchError::invalid(
                self.end,
                format!("expected {}, found end of input", describe(expected)),
            )),
        }
    }

    // Called with the operator token still current.
    fn operator(&mut self) -> SearchResult<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(SearchError::invalid(
                self.position(),
                format!("filter has more than {MAX_OPERATORS} operators"),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn descend(&mut self, position: usize) -> SearchResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SearchError::invalid(position, "filter nested too deeply"));
        }
        Ok(())
    }

    fn or(&mut self) -> SearchResult<Expr> {
        let mut left = self.and()?;
        while self.peek_keyword() == Some("or") {
            self.operator()?;
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> SearchResult<Expr> {
        let mut left = self.unary()?;
        while self.peek_keyword() == Some("and") {
            self.operator()?;
            let right = self.unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> SearchResult<Expr> {
        if self.peek_keyword() == Some("not") {
            self.descend(self.position())?;
            self.operator()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> SearchResult<Expr> {
        let left = self.primary()?;
        self.reject_unsupported_operator()?;

        let Some(op) = self.peek_keyword().and_then(CompareOp::from_keyword) else {
            return Ok(match left {
                Term::Operand(operand) => Expr::Value(operand),
                Term::Condition(expr) => expr,
            });
        };
        let op_position = self.position();
        self.pos += 1;

        let right = self.primary()?;
        self.reject_unsupported_operator()?;

        match (left, right) {
            (Term::Operand(left), Term::Operand(right)) => Ok(Expr::Compare { op, left, right }),
            _ => Err(SearchError::unsupported(format!(
                "comparing a condition with '{op}' at position {op_position}"
            ))),
        }
    }

    fn reject_unsupported_operator(&self) -> SearchResult<()> {
        match self.peek_keyword() {
            Some(word) if ARITHMETIC.contains(&word) => Err(SearchError::unsupported(format!(
                "arithmetic operator '{word}'"
            ))),
            Some(word @ ("has" | "in")) => {
                Err(SearchError::unsupported(format!("operator '{word}'")))
            }
            _ => Ok(()),
        }
    }

    fn primary(&mut self) -> SearchResult<Term> {
        let Some(spanned) = self.next() else {
            return Err(SearchError::invalid(self.end, "unexpected end of input"));
        };

        match spanned.token {
            Token::LParen => {
                self.descend(spanned.position)?;
                let inner = self.or()?;
                self.expect(&Token::RParen)?;
                self.depth -= 1;
                Ok(match inner {
                    Expr::Value(operand) => Term::Operand(operand),
                    expr => Term::Condition(expr),
                })
            }
            Token::Str(value) => Ok(Term::Operand(Operand::Literal(Literal::String(value)))),
            Token::Int(value) => Ok(Term::Operand(Operand::Literal(Literal::Integer(value)))),
            Token::Ident(word) => self.identifier(word, spanned.position),
            other => Err(SearchError::invalid(
                spanned.position,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn identifier(&mut self, word: String, position: usize) -> SearchResult<Term> {
        match word.as_str() {
            "true" => return Ok(Term::Operand(Operand::Literal(Literal::Boolean(true)))),
            "false" => return Ok(Term::Operand(Operand::Literal(Literal::Boolean(false)))),
            "null" => return Ok(Term::Operand(Operand::Literal(Literal::Null))),
            "and" | "or" | "not" | "eq" | "ne" | "lt" | "le" | "gt" | "ge" => {
                return Err(SearchError::invalid(
                    position,
                    format!("unexpected keyword '{word}'"),
                ));
            }
            _ => {}
        }

        match self.peek().map(|s| &s.token) {
            Some(Token::LParen) => self.function(&word, position),
            Some(Token::Slash) => {
                self.pos += 1;
                match self.peek_keyword() {
                    Some(lambda) if LAMBDAS.contains(&lambda) => Err(SearchError::unsupported(
                        format!("lambda operator '{lambda}' on '{word}'"),
                    )),
                    _ => Err(SearchError::unsupported(format!(
                        "navigation path starting at '{word}'"
                    ))),
                }
            }
            _ => Ok(Term::Operand(Operand::Property(word))),
        }
    }

    fn function(&mut self, name: &str, position: usize) -> SearchResult<Term> {
        let Some(function) = StringFunction::from_name(name) else {
            return Err(SearchError::unsupported(format!(
                "function '{name}' at position {position}"
            )));
        };
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        if self.peek().map(|s| &s.token) != Some(&Token::RParen) {
            loop {
                match self.primary()? {
                    Term::Operand(operand) => args.push(operand),
                    Term::Condition(_) => {
                        return Err(SearchError::unsupported(format!(
                            "condition as argument of '{function}'"
                        )));
                    }
                }
                if self.peek().map(|s| &s.token) == Some(&Token::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        if args.len() != 2 {
            return Err(SearchError::invalid(
                position,
                format!("'{function}' takes 2 arguments, got {}", args.len()),
            ));
        }
        Ok(Term::Condition(Expr::Function { function, args }))
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(word) => format!("'{word}'"),
        Token::Str(_) => "string literal".to_string(),
        Token::Int(value) => format!("'{value}'"),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Colon => "':'".to_string(),
    }
}
