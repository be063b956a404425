//! Recursive-descent parser for the annotation argument grammar
//!
//! ```text
//! named_arguments := assignment ("," assignment)*
//! assignment      := IDENT | IDENT "=" expression
//! expression      := BOOL | NUMBER | STRING | class_ref
//! class_ref       := "__class" open class_name open args close close
//! class_name      := IDENT ("::" IDENT)* template?
//! template        := "<" (IDENT ("," IDENT)*)? ">"
//! args            := (expression ("," expression)*)?
//! open/close      := "(" / ")" or "{" / "}"
//! ```

use declgraph_model::{MetaAttributeMap, MetaValue};
use logos::Logos;
use thiserror::Error;

use crate::lexer::Token;

#[derive(Debug, Error, PartialEq)]
pub enum AttrError {
    #[error("invalid token at offset {offset}")]
    InvalidToken { offset: usize },
    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },
    #[error("unexpected end of arguments")]
    UnexpectedEnd,
}

/// Parse an annotate argument string into a metadata map.
///
/// Blank input is valid and yields an empty map.
pub fn parse_named_arguments(content: &str) -> Result<MetaAttributeMap, AttrError> {
    let mut map = MetaAttributeMap::new();
    if content.trim().is_empty() {
        return Ok(map);
    }

    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(content).spanned() {
        match result {
            Ok(token) => tokens.push((token, span.start)),
            Err(()) => return Err(AttrError::InvalidToken { offset: span.start }),
        }
    }

    let mut parser = Parser { tokens, pos: 0 };
    parser.assignment(&mut map)?;
    while parser.eat(&Token::Comma) {
        parser.assignment(&mut map)?;
    }
    if let Some((token, offset)) = parser.peek() {
        return Err(AttrError::UnexpectedToken {
            offset: *offset,
            found: token.describe(),
        });
    }
    Ok(map)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(Token, usize)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<(Token, usize), AttrError> {
        let entry = self.tokens.get(self.pos).cloned().ok_or(AttrError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(entry)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|(t, _)| t) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, token: Token, offset: usize) -> AttrError {
        AttrError::UnexpectedToken {
            offset,
            found: token.describe(),
        }
    }

    fn assignment(&mut self, map: &mut MetaAttributeMap) -> Result<(), AttrError> {
        let (token, offset) = self.next()?;
        let Token::Ident(name) = token else {
            return Err(self.unexpected(token, offset));
        };
        let value = if self.eat(&Token::Eq) {
            self.expression()?
        } else {
            MetaValue::Bool(true)
        };
        map.insert(name, value);
        Ok(())
    }

    fn expression(&mut self) -> Result<MetaValue, AttrError> {
        let (token, offset) = self.next()?;
        match token {
            Token::True => Ok(MetaValue::Bool(true)),
            Token::False => Ok(MetaValue::Bool(false)),
            Token::Int(value) => Ok(MetaValue::Int(value)),
            Token::Float(value) => Ok(MetaValue::Float(value)),
            Token::Str(value) => Ok(MetaValue::Str(value)),
            Token::Class => self.class_ref(),
            other => Err(self.unexpected(other, offset)),
        }
    }

    /// `__class(Name(args))`, flattened back to `Name(args)` text.
    fn class_ref(&mut self) -> Result<MetaValue, AttrError> {
        let outer = self.open_bracket()?;
        let mut text = self.class_name()?;
        let inner = self.open_bracket()?;
        text.push('(');
        text.push_str(&self.args()?);
        text.push(')');
        self.close_bracket(inner)?;
        self.close_bracket(outer)?;
        Ok(MetaValue::Path(text))
    }

    fn class_name(&mut self) -> Result<String, AttrError> {
        let (token, offset) = self.next()?;
        let Token::Ident(first) = token else {
            return Err(self.unexpected(token, offset));
        };
        let mut name = first;
        while self.eat(&Token::PathSep) {
            let (token, offset) = self.next()?;
            let Token::Ident(part) = token else {
                return Err(self.unexpected(token, offset));
            };
            name.push_str("::");
            name.push_str(&part);
        }
        if self.eat(&Token::Lt) {
            name.push('<');
            let mut first_param = true;
            while !self.eat(&Token::Gt) {
                if !first_param && !self.eat(&Token::Comma) {
                    let (token, offset) = self.next()?;
                    return Err(self.unexpected(token, offset));
                }
                let (token, offset) = self.next()?;
                let Token::Ident(param) = token else {
                    return Err(self.unexpected(token, offset));
                };
                if !first_param {
                    name.push(',');
                }
                name.push_str(&param);
                first_param = false;
            }
            name.push('>');
        }
        Ok(name)
    }

    /// Comma-separated expression list, re-serialized to text.
    fn args(&mut self) -> Result<String, AttrError> {
        let mut out = String::new();
        if self.at_close_bracket() {
            return Ok(out);
        }
        loop {
            let value = self.expression()?;
            if !out.is_empty() {
                out.push(',');
            }
            match value {
                MetaValue::Bool(true) => out.push_str("true"),
                MetaValue::Bool(false) => out.push_str("false"),
                MetaValue::Int(v) => out.push_str(&v.to_string()),
                MetaValue::Float(v) => out.push_str(&v.to_string()),
                MetaValue::Str(v) => {
                    out.push('"');
                    out.push_str(&v);
                    out.push('"');
                }
                MetaValue::Path(v) => out.push_str(&v),
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(out)
    }

    fn at_close_bracket(&self) -> bool {
        matches!(self.peek(), Some((Token::RParen, _)) | Some((Token::RBrace, _)))
    }

    fn open_bracket(&mut self) -> Result<Token, AttrError> {
        let (token, offset) = self.next()?;
        match token {
            Token::LParen | Token::LBrace => Ok(token),
            other => Err(self.unexpected(other, offset)),
        }
    }

    fn close_bracket(&mut self, open: Token) -> Result<(), AttrError> {
        let expected = if open == Token::LParen {
            Token::RParen
        } else {
            Token::RBrace
        };
        let (token, offset) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(self.unexpected(token, offset))
        }
    }
}
