use crate::diagnostic::Diagnostic;
use crate::lexer::LexError;
use super::parser::ParseError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// An operator applied to operand types it has no meaning for.
    UnknownOperator { op: String, left: &'static str, right: &'static str },
    UndefinedFunction { name: String },
    DivisionByZero,
    IntegerOverflow { op: String },
    /// A built-in received an argument it cannot work with.
    TypeError { message: String },
    /// Console input or output failed.
    Io { message: String },
    /// Function calls nested deeper than the interpreter allows.
    RecursionLimit { depth: usize },
}

impl RuntimeError {
    pub fn unknown_operator(op: impl Into<String>, left: &'static str, right: &'static str) -> Self {
        Self::UnknownOperator { op: op.into(), left, right }
    }

    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::UndefinedFunction { name: name.into() }
    }

    pub fn integer_overflow(op: impl Into<String>) -> Self {
        Self::IntegerOverflow { op: op.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            Self::UnknownOperator { .. } => "E0201",
            Self::UndefinedFunction { .. } => "E0202",
            Self::DivisionByZero => "E0203",
            Self::IntegerOverflow { .. } => "E0204",
            Self::TypeError { .. } => "E0205",
            Self::Io { .. } => "E0206",
            Self::RecursionLimit { .. } => "E0207",
        };
        let diagnostic = Diagnostic::error(self.to_string()).with_code(code);
        match self {
            Self::UndefinedFunction { name } => {
                diagnostic.with_help(format!("declare it with `func {}(...) {{ ... }}` before calling it", name))
            }
            _ => diagnostic,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownOperator { op, left, right } => {
                write!(f, "Unknown operator: {} {} {}", left, op, right)
            }
            RuntimeError::UndefinedFunction { name } => write!(f, "Undefined function: {}", name),
            RuntimeError::DivisionByZero => write!(f, "Division by zero"),
            RuntimeError::IntegerOverflow { op } => write!(f, "Integer overflow in `{}`", op),
            RuntimeError::TypeError { message } => write!(f, "Type error: {}", message),
            RuntimeError::Io { message } => write!(f, "I/O error: {}", message),
            RuntimeError::RecursionLimit { depth } => {
                write!(f, "Maximum recursion depth exceeded ({})", depth)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Any failure that ends a program run.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl FlowError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FlowError::Lex(e) => e.to_diagnostic(),
            FlowError::Parse(e) => e.to_diagnostic(),
            FlowError::Runtime(e) => e.to_diagnostic(),
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Lex(e) => write!(f, "Lex error: {}", e),
            FlowError::Parse(e) => write!(f, "Parse error: {}", e),
            FlowError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Lex(e) => Some(e),
            FlowError::Parse(e) => Some(e),
            FlowError::Runtime(e) => Some(e),
        }
    }
}

impl From<LexError> for FlowError {
    fn from(e: LexError) -> Self {
        FlowError::Lex(e)
    }
}

impl From<ParseError> for FlowError {
    fn from(e: ParseError) -> Self {
        FlowError::Parse(e)
    }
}

impl From<RuntimeError> for FlowError {
    fn from(e: RuntimeError) -> Self {
        FlowError::Runtime(e)
    }
}
