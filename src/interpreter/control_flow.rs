use crate::value::Value;

/// Completion of a statement. `Return` unwinds through enclosing blocks and
/// loops until the innermost function call (or the program) absorbs it.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Next,
    Return(Value),
}
