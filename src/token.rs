use crate::diagnostic::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Number,
    String,

    // Keywords
    Let,
    Func,
    If,
    While,
    Print,
    Return,

    Ident,
    /// Single-character operator: `+ - * / < > = !`
    Op,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Let => "LET",
            TokenKind::Func => "FUNC",
            TokenKind::If => "IF",
            TokenKind::While => "WHILE",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::Ident => "IDENT",
            TokenKind::Op => "OP",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Comma => "COMMA",
        };
        f.write_str(name)
    }
}

/// A classified lexeme. For `String` tokens `text` holds the decoded
/// contents (quotes stripped, escapes resolved); for every other kind it is
/// the exact source slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is_op(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Op && self.text == symbol
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{} {:?}", self.kind, self.text),
            _ => write!(f, "{} `{}`", self.kind, self.text),
        }
    }
}
