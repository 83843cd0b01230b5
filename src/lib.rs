pub mod ast;
pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Block, Expr, Stmt};
pub use interpreter::{parse, run, FlowError, Interpreter};
pub use lexer::{tokenize, tokenize_with, LexOptions};
pub use token::{Token, TokenKind};
pub use value::Value;
