//! Built-in functions for the flow interpreter.
//!
//! Functions are organized into categories:
//! - **Types**: Conversion and inspection (len, type, str, int)
//! - **Generators**: Functions that produce sequences (range)
//! - **IO**: Console and file access (input, read_file, write_file)
//! - **Net**: Outbound HTTP (http_get, http_post)
//!
//! The I/O-bound built-ins never fail at the language level: any underlying
//! failure comes back as an `"Error: <message>"` string the script can test.

mod generators;
mod io;
mod net;
mod types;

pub use generators::*;
pub use io::*;
pub use net::*;
pub use types::*;

use crate::value::Value;
use std::fmt;

// Expects `RuntimeError` in scope at the call site.
macro_rules! require_args {
    ($args:expr, $n:expr, $name:expr) => {
        if $args.len() < $n {
            return Err(RuntimeError::type_error(format!(
                "{} expected at least {} argument(s), got {}",
                $name,
                $n,
                $args.len()
            )));
        }
    };
}

pub(crate) use require_args;

/// The fixed table of host operations. Checked before user functions, so a
/// script cannot shadow these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Type,
    Str,
    Int,
    Range,
    Input,
    HttpGet,
    HttpPost,
    ReadFile,
    WriteFile,
}

impl Builtin {
    pub const ALL: [Builtin; 10] = [
        Builtin::Len,
        Builtin::Type,
        Builtin::Str,
        Builtin::Int,
        Builtin::Range,
        Builtin::Input,
        Builtin::HttpGet,
        Builtin::HttpPost,
        Builtin::ReadFile,
        Builtin::WriteFile,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Type => "type",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Range => "range",
            Builtin::Input => "input",
            Builtin::HttpGet => "http_get",
            Builtin::HttpPost => "http_post",
            Builtin::ReadFile => "read_file",
            Builtin::WriteFile => "write_file",
        }
    }
}

/// The value an I/O built-in hands back instead of raising.
pub(crate) fn failure(message: impl fmt::Display) -> Value {
    Value::str(format!("Error: {}", message))
}
