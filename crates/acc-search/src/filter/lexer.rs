//! Tokenizer for filter expressions.

use crate::error::{SearchError, SearchResult};

/// A filter token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A name: property, function or keyword.
    Ident(String),
    /// A single-quoted string literal, unescaped.
    Str(String),
    /// An integer literal.
    Int(i64),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// `:`
    Colon,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset in the input.
    pub position: usize,
}

/// Splits a filter into tokens.
///
/// ## Errors
///
/// Returns `SearchError::InvalidFilter` for unterminated strings, integers
/// out of range and characters that cannot start a token.
pub fn tokenize(input: &str) -> SearchResult<Vec<Spanned>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'(' => {
                pos += 1;
                Token::LParen
            }
            b')' => {
                pos += 1;
                Token::RParen
            }
            b',' => {
                pos += 1;
                Token::Comma
            }
            b'/' => {
                pos += 1;
                Token::Slash
            }
            b':' => {
                pos += 1;
                Token::Colon
            }
            b'\'' => {
                let (value, end) = string_literal(input, start)?;
                pos = end;
                Token::Str(value)
            }
            b'-' | b'0'..=b'9' => {
                let (value, end) = integer_literal(input, start)?;
                pos = end;
                Token::Int(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {
                pos += 1;
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                Token::Ident(input[start..pos].to_string())
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or_default();
                return Err(SearchError::invalid(
                    start,
                    format!("unexpected character {ch:?}"),
                ));
            }
        };

        tokens.push(Spanned {
            token,
            position: start,
        });
    }

    Ok(tokens)
}

// Reads a quoted string starting at `start`. Two quotes in a row stand for
// one literal quote.
fn string_literal(input: &str, start: usize) -> SearchResult<(String, usize)> {
    let mut value = String::new();
    let mut chars = input[start + 1..].char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch != '\'' {
            value.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, '\''))) {
            chars.next();
            value.push('\'');
            continue;
        }
        return Ok((value, start + 1 + offset + 1));
    }

    Err(SearchError::invalid(start, "unterminated string literal"))
}

fn integer_literal(input: &str, start: usize) -> SearchResult<(i64, usize)> {
    let bytes = input.as_bytes();
    let mut end = start;
    if bytes[end] == b'-' {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return Err(SearchError::invalid(start, "expected digits after '-'"));
    }
    if end < bytes.len() && (bytes[end].is_ascii_alphabetic() || bytes[end] == b'.') {
        return Err(SearchError::invalid(
            start,
            "only integer literals are supported",
        ));
    }

    input[start..end]
        .parse::<i64>()
        .map(|value| (value, end))
        .map_err(|_| SearchError::invalid(start, "integer literal out of range"))
}
