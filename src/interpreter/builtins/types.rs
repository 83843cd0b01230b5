//! Conversion and inspection built-in functions.

use crate::value::Value;
use super::super::error::RuntimeError;

pub fn builtin_len(args: &[Value]) -> Result<Value, RuntimeError> {
    let length = match args.first() {
        None => 0,
        Some(Value::Str(s)) => s.chars().count(),
        Some(Value::List(items)) => items.len(),
        Some(Value::Map(map)) => map.len(),
        Some(other) => {
            return Err(RuntimeError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    i64::try_from(length)
        .map(Value::Int)
        .map_err(|_| RuntimeError::integer_overflow("len"))
}

pub fn builtin_type(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::str(args.first().map_or("None", Value::type_name)))
}

pub fn builtin_str(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(match args.first() {
        Some(Value::Str(s)) => Value::Str(s.clone()),
        Some(other) => Value::str(other.to_string()),
        None => Value::str(""),
    })
}

// Bounds of the f64 range that truncates into an i64.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

pub fn builtin_int(args: &[Value]) -> Result<Value, RuntimeError> {
    match args.first() {
        None => Ok(Value::Int(0)),
        Some(Value::Int(n)) => Ok(Value::Int(*n)),
        Some(Value::Bool(b)) => Ok(Value::Int(i64::from(*b))),
        Some(Value::Float(n)) => {
            let truncated = n.trunc();
            if !(I64_LOWER..I64_UPPER).contains(&truncated) {
                return Err(RuntimeError::type_error(format!("cannot convert float {} to int", n)));
            }
            Ok(Value::Int(truncated as i64))
        }
        Some(value @ Value::Str(s)) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeError::type_error(format!("invalid literal for int(): {}", value.repr()))
        }),
        Some(other) => Err(RuntimeError::type_error(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(builtin_len(&[]).unwrap(), Value::Int(0));
        assert_eq!(builtin_len(&[Value::str("héllo")]).unwrap(), Value::Int(5));
        assert_eq!(
            builtin_len(&[Value::list(vec![Value::Int(1), Value::Int(2)])]).unwrap(),
            Value::Int(2)
        );
        assert!(builtin_len(&[Value::Int(3)]).is_err());
    }

    #[test]
    fn test_type() {
        assert_eq!(builtin_type(&[]).unwrap(), Value::str("None"));
        assert_eq!(builtin_type(&[Value::Int(1)]).unwrap(), Value::str("int"));
        assert_eq!(builtin_type(&[Value::Float(1.0)]).unwrap(), Value::str("float"));
        assert_eq!(builtin_type(&[Value::str("x")]).unwrap(), Value::str("str"));
        assert_eq!(builtin_type(&[Value::list(vec![])]).unwrap(), Value::str("list"));
    }

    #[test]
    fn test_str() {
        assert_eq!(builtin_str(&[]).unwrap(), Value::str(""));
        assert_eq!(builtin_str(&[Value::Int(12)]).unwrap(), Value::str("12"));
        assert_eq!(builtin_str(&[Value::None]).unwrap(), Value::str("None"));
    }

    #[test]
    fn test_int() {
        assert_eq!(builtin_int(&[]).unwrap(), Value::Int(0));
        assert_eq!(builtin_int(&[Value::str(" 42\n")]).unwrap(), Value::Int(42));
        assert_eq!(builtin_int(&[Value::str("-7")]).unwrap(), Value::Int(-7));
        assert_eq!(builtin_int(&[Value::Float(3.9)]).unwrap(), Value::Int(3));
        assert_eq!(builtin_int(&[Value::Float(-3.9)]).unwrap(), Value::Int(-3));
        assert_eq!(builtin_int(&[Value::Bool(true)]).unwrap(), Value::Int(1));
        assert!(builtin_int(&[Value::str("abc")]).is_err());
        assert!(builtin_int(&[Value::Float(f64::NAN)]).is_err());
        assert!(builtin_int(&[Value::None]).is_err());
    }
}
