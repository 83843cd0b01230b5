use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A runtime value. Lists only come out of `range`; maps only out of
/// decoded JSON responses.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<Vec<Value>>),
    Map(Rc<IndexMap<String, Value>>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(left_str), Value::Str(right_str)) => left_str == right_str,
            (Value::List(left_list), Value::List(right_list)) => left_list == right_list,
            (Value::Map(left_map), Value::Map(right_map)) => left_map == right_map,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(left_num), Some(right_num)) => match (self, other) {
                    (Value::Float(_), _) | (_, Value::Float(_)) => left_num == right_num,
                    _ => self.as_i64() == other.as_i64(),
                },
                _ => false,
            },
        }
    }
}

impl Value {
    pub fn str(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Str(s) = self {
            Some(s.as_ref())
        } else {
            None
        }
    }

    /// Integer view; booleans count as 0/1 the way arithmetic treats them.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => self.as_i64().map(|n| n as f64),
        }
    }

    /// Ordering for `<`, `>`, `<=`, `>=`. `None` means the operand types
    /// cannot be ordered against each other.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(left_str), Value::Str(right_str)) => Some(left_str.cmp(right_str)),
            (Value::List(left_list), Value::List(right_list)) => {
                for (left_item, right_item) in left_list.iter().zip(right_list.iter()) {
                    if left_item != right_item {
                        return left_item.compare(right_item);
                    }
                }
                Some(left_list.len().cmp(&right_list.len()))
            }
            (Value::Float(_), _) | (_, Value::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            _ => Some(self.as_i64()?.cmp(&other.as_i64()?)),
        }
    }

    /// Rendering used inside containers: strings are quoted.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('\'', "\\'")
                    .replace('\n', "\\n")
                    .replace('\t', "\\t");
                format!("'{}'", escaped)
            }
            _ => self.to_string(),
        }
    }
}

fn format_float(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else {
        let text = format!("{:?}", n);
        // Positive exponents carry an explicit sign: 1e+16.
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(Value::repr).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Map(map) => {
                let rendered: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}: {}", Value::str(key).repr(), value.repr()))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}
