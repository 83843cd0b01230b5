//! Console and file access.

use crate::value::Value;
use super::super::error::RuntimeError;
use super::failure;
use std::fs;
use std::io::{BufRead, Write};

/// Writes the optional prompt, then reads one line without its terminator.
/// End of input reads as the empty string.
pub fn builtin_input(
    args: &[Value],
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    if let Some(prompt) = args.first() {
        write!(output, "{}", prompt).map_err(|e| RuntimeError::io(e.to_string()))?;
    }
    output.flush().map_err(|e| RuntimeError::io(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| RuntimeError::io(e.to_string()))?;
    let trimmed = line.trim_end_matches(['\n', '\r']);
    Ok(Value::str(trimmed))
}

pub fn builtin_read_file(args: &[Value]) -> Result<Value, RuntimeError> {
    let Some(path) = args.first() else {
        return Ok(failure("read_file expects a path"));
    };
    let path = path.to_string();
    Ok(match fs::read_to_string(&path) {
        Ok(contents) => Value::str(contents),
        Err(e) => failure(e),
    })
}

pub fn builtin_write_file(args: &[Value]) -> Result<Value, RuntimeError> {
    let Some(path) = args.first() else {
        return Ok(failure("write_file expects a path"));
    };
    let path = path.to_string();
    let contents = args.get(1).map(Value::to_string).unwrap_or_default();
    Ok(match fs::write(&path, contents) {
        Ok(()) => Value::str(format!("Successfully wrote to {}", path)),
        Err(e) => failure(e),
    })
}
