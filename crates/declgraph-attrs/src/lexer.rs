//! Token definitions for the annotation argument grammar

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("true")]
    True,

    #[token("false")]
    False,

    /// The `__class(...)` type-reference keyword
    #[token("__class")]
    Class,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string(), priority = 2)]
    Ident(String),

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("::")]
    PathSep,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::True => "true".into(),
            Token::False => "false".into(),
            Token::Class => "__class".into(),
            Token::Ident(name) => format!("identifier `{name}`"),
            Token::Float(v) => format!("number `{v}`"),
            Token::Int(v) => format!("number `{v}`"),
            Token::Str(_) => "string literal".into(),
            Token::Eq => "`=`".into(),
            Token::Comma => "`,`".into(),
            Token::PathSep => "`::`".into(),
            Token::Lt => "`<`".into(),
            Token::Gt => "`>`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
        }
    }
}

/// Strip the surrounding quotes and process escapes.
fn unescape(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexes_all_token_kinds() {
        let tokens: Vec<_> = Token::lexer(r#"name = __class(a::b<c>(1, 2.5, "s", true))"#)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tokens[0], Token::Ident("name".into()));
        assert_eq!(tokens[1], Token::Eq);
        assert_eq!(tokens[2], Token::Class);
        assert!(tokens.contains(&Token::PathSep));
        assert!(tokens.contains(&Token::Float(2.5)));
        assert!(tokens.contains(&Token::Str("s".into())));
        assert!(tokens.contains(&Token::True));
    }

    #[test]
    fn test_keyword_prefix_stays_identifier() {
        let tokens: Vec<_> = Token::lexer("truex falsey")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![Token::Ident("truex".into()), Token::Ident("falsey".into())]
        );
    }
}
