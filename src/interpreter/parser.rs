use crate::ast::{BinaryOp, Block, Expr, FunctionDecl, Stmt};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::{Token, TokenKind};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn is_end_of_input(&self) -> bool {
        self.found.is_none()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string())
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));

        if self.expected.len() == 1 {
            diag = diag.with_help(format!("expected {} here", self.expected[0]));
        }

        diag
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected.is_empty() {
            return f.write_str(&self.message);
        }
        write!(f, "expected {}", self.expected.join(" or "))?;
        match &self.found {
            Some(found) => write!(f, ", found {}", found),
            None => write!(f, ", found end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over a flat token sequence with a single
/// forward cursor and one token of lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    source_len: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let source_len = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens,
            current: 0,
            source_len,
        }
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    fn check(&self, kind: TokenKind) -> bool {
        matches!(self.current_token(), Some(token) if token.kind == kind)
    }

    fn check_op(&self, symbol: &str) -> bool {
        matches!(self.current_token(), Some(token) if token.is_op(symbol))
    }

    fn current_span(&self) -> Span {
        self.current_token()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn error_here(&self, expected: impl Into<String>) -> ParseError {
        match self.current_token() {
            Some(token) => ParseError::new("unexpected token", token.span)
                .with_expected(vec![expected.into()])
                .with_found(token.to_string()),
            None => ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec![expected.into()]),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        match self.current_token() {
            Some(token) if token.kind == expected => {
                let token = token.clone();
                self.current += 1;
                Ok(token)
            }
            _ => Err(self.error_here(expected.to_string())),
        }
    }

    fn expect_op(&mut self, symbol: &str) -> Result<Token, ParseError> {
        match self.current_token() {
            Some(token) if token.is_op(symbol) => {
                let token = token.clone();
                self.current += 1;
                Ok(token)
            }
            _ => Err(self.error_here(format!("`{}`", symbol))),
        }
    }

    fn expect_ident(&mut self) -> Result<Rc<str>, ParseError> {
        self.expect(TokenKind::Ident).map(|t| Rc::from(t.text.as_str()))
    }

    /// Parses the whole token sequence as a program.
    pub fn parse(&mut self) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(Block::new(statements))
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token().map(|t| t.kind) {
            Some(TokenKind::Let) => self.parse_let_statement(),
            Some(TokenKind::Print) => {
                self.advance();
                Ok(Stmt::Print(self.parse_expression()?))
            }
            Some(TokenKind::Return) => {
                self.advance();
                Ok(Stmt::Return(self.parse_expression()?))
            }
            Some(TokenKind::If) => {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                Ok(Stmt::If { condition, body })
            }
            Some(TokenKind::While) => {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                Ok(Stmt::While { condition, body })
            }
            Some(TokenKind::Func) => self.parse_function_statement(),
            _ => Ok(Stmt::Expr(self.parse_expression()?)),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Let)?;
        let name = self.expect_ident()?;
        self.expect_op("=")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assign { name, value })
    }

    fn parse_function_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Func)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && self.current_token().is_some() {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(statements))
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_comparison()
    }

    /// Reads a comparison operator spelled as one or two `OP` tokens.
    /// Returns `None` without consuming anything when the current tokens do
    /// not form one, which ends the comparison chain.
    fn comparison_operator(&mut self) -> Result<Option<BinaryOp>, ParseError> {
        let base = match self.current_token() {
            Some(token) if token.kind == TokenKind::Op => token.text.clone(),
            _ => return Ok(None),
        };
        let followed_by_eq = matches!(self.peek_token(), Some(next) if next.is_op("="));

        let op = match (base.as_str(), followed_by_eq) {
            ("<", true) => BinaryOp::LessEq,
            (">", true) => BinaryOp::GreaterEq,
            ("=", true) => BinaryOp::Eq,
            ("!", true) => BinaryOp::NotEq,
            ("<", false) => BinaryOp::Less,
            (">", false) => BinaryOp::Greater,
            ("!", false) => {
                self.advance();
                return Err(self.error_here("`=`"));
            }
            _ => return Ok(None),
        };

        self.advance();
        if followed_by_eq {
            self.advance();
        }
        Ok(Some(op))
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_addition()?;
        while let Some(op) = self.comparison_operator()? {
            let right = self.parse_addition()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = if self.check_op("+") {
                BinaryOp::Add
            } else if self.check_op("-") {
                BinaryOp::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_multiplication()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;
        loop {
            let op = if self.check_op("*") {
                BinaryOp::Mul
            } else if self.check_op("/") {
                BinaryOp::Div
            } else {
                break;
            };
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = match self.current_token() {
            Some(token) => token.clone(),
            None => return Err(self.error_here("expression")),
        };

        match token.kind {
            TokenKind::Number => {
                self.advance();
                parse_number_literal(&token)
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::String(Rc::from(token.text.as_str())))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident => {
                self.advance();
                let name: Rc<str> = Rc::from(token.text.as_str());
                if self.check(TokenKind::LParen) {
                    let args = self.parse_call_arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            _ => Err(self.error_here("expression")),
        }
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

fn parse_number_literal(token: &Token) -> Result<Expr, ParseError> {
    if token.text.contains('.') {
        token
            .text
            .parse::<f64>()
            .map(Expr::Float)
            .map_err(|_| ParseError::new(format!("invalid number literal `{}`", token.text), token.span))
    } else {
        token.text.parse::<i64>().map(Expr::Number).map_err(|_| {
            ParseError::new(
                format!("integer literal `{}` does not fit in 64 bits", token.text),
                token.span,
            )
        })
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Block, ParseError> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> Result<Block, ParseError> {
        parse(tokenize(source).expect("Lexer failed"))
    }

    fn parse_expr(source: &str) -> Expr {
        let block = parse_source(source).expect("Parse failed");
        match block.statements.into_iter().next() {
            Some(Stmt::Expr(expr)) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(Rc::from(name)))
    }

    fn num(n: i64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_let_statement() {
        let block = parse_source("let x = 5").unwrap();
        assert_eq!(
            block.statements,
            vec![Stmt::Assign {
                name: Rc::from("x"),
                value: Expr::Number(5)
            }]
        );
    }

    #[test]
    fn test_statements_need_no_separator() {
        let block = parse_source("let i = 0 while i < 3 { print i let i = i + 1 }").unwrap();
        assert_eq!(block.statements.len(), 2);
        match &block.statements[1] {
            Stmt::While { body, .. } => assert_eq!(body.statements.len(), 2),
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            parse_expr("a + b * c"),
            Expr::BinOp {
                left: var("a"),
                op: BinaryOp::Add,
                right: Box::new(Expr::BinOp {
                    left: var("b"),
                    op: BinaryOp::Mul,
                    right: var("c")
                })
            }
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_expr("a - b - c"),
            Expr::BinOp {
                left: Box::new(Expr::BinOp {
                    left: var("a"),
                    op: BinaryOp::Sub,
                    right: var("b")
                }),
                op: BinaryOp::Sub,
                right: var("c")
            }
        );
    }

    #[test]
    fn test_chained_comparison_is_left_nested() {
        assert_eq!(
            parse_expr("a < b < c"),
            Expr::BinOp {
                left: Box::new(Expr::BinOp {
                    left: var("a"),
                    op: BinaryOp::Less,
                    right: var("b")
                }),
                op: BinaryOp::Less,
                right: var("c")
            }
        );
    }

    #[test]
    fn test_two_token_comparisons() {
        let cases = [
            ("a == 1", BinaryOp::Eq),
            ("a != 1", BinaryOp::NotEq),
            ("a <= 1", BinaryOp::LessEq),
            ("a >= 1", BinaryOp::GreaterEq),
            ("a < 1", BinaryOp::Less),
            ("a > 1", BinaryOp::Greater),
        ];
        for (source, expected) in cases {
            assert_eq!(
                parse_expr(source),
                Expr::BinOp {
                    left: var("a"),
                    op: expected,
                    right: num(1)
                },
                "source: {}",
                source
            );
        }
    }

    #[test]
    fn test_lone_bang_is_an_error() {
        let err = parse_source("print a ! b").unwrap_err();
        assert_eq!(err.expected, vec!["`=`".to_string()]);
        assert!(err.found.unwrap().contains('b'));
    }

    #[test]
    fn test_lone_equals_ends_expression() {
        let err = parse_source("a = 1").unwrap_err();
        assert_eq!(err.expected, vec!["expression".to_string()]);
    }

    #[test]
    fn test_call_with_arguments() {
        assert_eq!(
            parse_expr("add(1, x)"),
            Expr::Call {
                name: Rc::from("add"),
                args: vec![Expr::Number(1), Expr::Var(Rc::from("x"))]
            }
        );
        assert_eq!(
            parse_expr("now()"),
            Expr::Call {
                name: Rc::from("now"),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_function_declaration() {
        let block = parse_source("func f(x, y) { return x + y }").unwrap();
        match &block.statements[0] {
            Stmt::Function(decl) => {
                assert_eq!(decl.name.as_ref(), "f");
                assert_eq!(decl.params, vec![Rc::from("x"), Rc::from("y")]);
                assert_eq!(decl.body.statements.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse_source("f(1,)").is_err());
        assert!(parse_source("f(,1)").is_err());
        assert!(parse_source("func f(a,) { }").is_err());
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(parse_expr("1.5"), Expr::Float(1.5));
    }

    #[test]
    fn test_integer_literal_overflow() {
        let err = parse_source("print 99999999999999999999").unwrap_err();
        assert!(err.message.contains("64 bits"));
    }

    #[test]
    fn test_unmatched_paren_reports_end_of_input() {
        let err = parse_source("print (1 + 2").unwrap_err();
        assert!(err.is_end_of_input());
        assert_eq!(err.expected, vec!["RPAREN".to_string()]);
        assert_eq!(err.to_string(), "expected RPAREN, found end of input");
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_source("if 1 { print 2").unwrap_err();
        assert!(err.is_end_of_input());
    }

    #[test]
    fn test_let_requires_equals() {
        let err = parse_source("let x + 1").unwrap_err();
        assert_eq!(err.expected, vec!["`=`".to_string()]);
    }
}
