use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::{Token, TokenKind};
use chumsky::prelude::*;
use chumsky::Boxed;
use std::fmt;

type LexExtra<'a> = extra::Err<Simple<'a, char>>;

/// Knobs for the tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    /// Only accept a keyword when it is not immediately followed by an
    /// identifier character. Off by default: `iffy` lexes as `if` + `fy`.
    pub strict_keywords: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub character: char,
    pub span: Span,
}

impl LexError {
    pub fn new(character: char, span: Span) -> Self {
        Self { character, span }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(format!("unrecognized character {:?}", self.character))
            .with_code("E0001")
            .with_label(Label::primary(self.span, "no token starts here"))
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unrecognized character {:?} at offset {}",
            self.character, self.span.start
        )
    }
}

impl std::error::Error for LexError {}

fn is_skippable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_ident_continue(c: &char) -> bool {
    c.is_alphanumeric() || *c == '_'
}

fn keyword<'a>(
    word: &'static str,
    kind: TokenKind,
    strict: bool,
) -> Boxed<'a, 'a, &'a str, (TokenKind, String), LexExtra<'a>> {
    let word_parser = just(word).map(move |matched: &str| (kind, matched.to_string()));
    if strict {
        word_parser
            .then_ignore(any().filter(is_ident_continue).not())
            .boxed()
    } else {
        word_parser.boxed()
    }
}

fn symbol<'a>(
    c: char,
    kind: TokenKind,
) -> impl Parser<'a, &'a str, (TokenKind, String), LexExtra<'a>> + Clone {
    just(c).map(move |matched: char| (kind, matched.to_string()))
}

/// Matches exactly one token at the start of the input. Alternatives are
/// tried in priority order and the first one that matches wins, which is
/// why keywords shadow identifiers sharing their prefix.
fn lexeme<'a>(
    strict_keywords: bool,
) -> impl Parser<'a, &'a str, ((TokenKind, String), SimpleSpan), LexExtra<'a>> {
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| (TokenKind::Number, s.to_string()));

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
    )));

    let string = just('"')
        .ignore_then(none_of("\\\"").or(escape).repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(|s| (TokenKind::String, s));

    let ident = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(any().filter(is_ident_continue).repeated())
        .to_slice()
        .map(|s: &str| (TokenKind::Ident, s.to_string()));

    let op = one_of("+-*/<>=!").map(|c: char| (TokenKind::Op, c.to_string()));

    choice((
        number,
        string,
        keyword("let", TokenKind::Let, strict_keywords),
        keyword("func", TokenKind::Func, strict_keywords),
        keyword("if", TokenKind::If, strict_keywords),
        keyword("while", TokenKind::While, strict_keywords),
        keyword("print", TokenKind::Print, strict_keywords),
        keyword("return", TokenKind::Return, strict_keywords),
        ident,
        op,
        symbol('(', TokenKind::LParen),
        symbol(')', TokenKind::RParen),
        symbol('{', TokenKind::LBrace),
        symbol('}', TokenKind::RBrace),
        symbol(',', TokenKind::Comma),
    ))
    .map_with(|lexeme, e| (lexeme, e.span()))
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(source, LexOptions::default())
}

/// Converts the whole input into tokens, failing on the first character no
/// token pattern accepts.
pub fn tokenize_with(source: &str, options: LexOptions) -> Result<Vec<Token>, LexError> {
    let lexeme = lexeme(options.strict_keywords).lazy();
    let mut tokens = Vec::new();
    let mut offset = 0;

    while let Some(character) = source[offset..].chars().next() {
        if is_skippable(character) {
            offset += character.len_utf8();
            continue;
        }

        match lexeme.parse(&source[offset..]).into_result() {
            Ok(((kind, text), span)) => {
                tokens.push(Token::new(
                    kind,
                    text,
                    Span::new(offset + span.start, offset + span.end),
                ));
                offset += span.end;
            }
            Err(_) => {
                return Err(LexError::new(
                    character,
                    Span::new(offset, offset + character.len_utf8()),
                ));
            }
        }
    }

    Ok(tokens)
}
