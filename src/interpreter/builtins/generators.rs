use crate::value::Value;
use super::super::error::RuntimeError;
use super::require_args;

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`,
/// materialized eagerly.
pub fn builtin_range(args: &[Value]) -> Result<Value, RuntimeError> {
    require_args!(args, 1, "range");

    let mut bounds = Vec::with_capacity(args.len());
    for arg in args {
        let bound = arg.as_i64().ok_or_else(|| {
            RuntimeError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                arg.type_name()
            ))
        })?;
        bounds.push(bound);
    }

    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => {
            return Err(RuntimeError::type_error(format!(
                "range expected at most 3 arguments, got {}",
                args.len()
            )))
        }
    };

    if step == 0 {
        return Err(RuntimeError::type_error("range() arg 3 must not be zero"));
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Int(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }

    Ok(Value::list(items))
}
