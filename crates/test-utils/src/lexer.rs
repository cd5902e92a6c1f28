// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Tokenizer for SQL expression text

use crate::error::{HarnessError, HarnessResult};

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted word; keywords are recognized by the parser
    Word(String),
    /// Backtick-quoted identifier, unescaped
    QuotedIdent(String),
    /// String literal, unescaped
    Str(String),
    /// Integer digits
    Int(String),
    /// Fixed-point digits, e.g. `3.14`
    Decimal(String),
    /// Exponent-form number, e.g. `1.5e0`
    Float(String),
    /// Operator or punctuation
    Symbol(&'static str),
    Eof,
}

/// A token with its byte span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

const SYMBOLS: &[&str] = &[
    "<=>", "<=", ">=", "<>", "!=", "<<", ">>", "&&", "||", ":=", "@@", "=", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "~", "!", "(", ")", ",", ".", "?", "@",
];

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Tokenize the whole input; the last token is always [`Token::Eof`]
    pub fn tokenize(mut self) -> HarnessResult<Vec<Spanned>> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let token = self.next_token()?;
            let done = token == Token::Eof;
            out.push(Spanned {
                token,
                start,
                end: self.pos,
            });
            if done {
                return Ok(out);
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> HarnessResult<Token> {
        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };
        match c {
            '\'' | '"' => self.read_string(c),
            '`' => self.read_quoted_ident(),
            c if c.is_ascii_digit() => Ok(self.read_number()),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_word()),
            _ => self.read_symbol(),
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        Token::Word(self.src[start..self.pos].to_string())
    }

    fn read_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        self.read_digits();
        let mut fractional = false;
        let mut exponent = false;

        let mut chars = self.rest().chars();
        if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
            fractional = true;
            self.bump();
            self.read_digits();
        }

        let mut chars = self.rest().chars();
        if matches!(chars.next(), Some('e' | 'E')) {
            let next = chars.next();
            let sign = matches!(next, Some('+' | '-'));
            let digit = if sign { chars.next() } else { next };
            if digit.is_some_and(|c| c.is_ascii_digit()) {
                exponent = true;
                self.bump();
                if sign {
                    self.bump();
                }
                self.read_digits();
            }
        }

        let text = self.src[start..self.pos].to_string();
        if exponent {
            Token::Float(text)
        } else if fractional {
            Token::Decimal(text)
        } else {
            Token::Int(text)
        }
    }

    fn read_string(&mut self, quote: char) -> HarnessResult<Token> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.bump();
                        value.push(quote);
                    } else {
                        return Ok(Token::Str(value));
                    }
                }
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some(c) => value.push(c),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(HarnessError::syntax(start, "unterminated string literal"))
    }

    fn read_quoted_ident(&mut self) -> HarnessResult<Token> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('`') => {
                    if self.peek() == Some('`') {
                        self.bump();
                        value.push('`');
                    } else {
                        return Ok(Token::QuotedIdent(value));
                    }
                }
                Some(c) => value.push(c),
                None => return Err(HarnessError::syntax(start, "unterminated quoted identifier")),
            }
        }
    }

    fn read_symbol(&mut self) -> HarnessResult<Token> {
        let rest = self.rest();
        match SYMBOLS.iter().find(|s| rest.starts_with(**s)) {
            Some(symbol) => {
                self.pos += symbol.len();
                Ok(Token::Symbol(*symbol))
            }
            None => Err(HarnessError::syntax(
                self.pos,
                format!("unexpected character {:?}", self.peek().unwrap_or_default()),
            )),
        }
    }
}
