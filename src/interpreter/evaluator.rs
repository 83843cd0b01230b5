use crate::ast::{BinaryOp, Block, Expr, FunctionDecl, Stmt};
use crate::lexer::{tokenize_with, LexOptions};
use crate::value::Value;
use super::builtins::{self, Builtin};
use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::{FlowError, RuntimeError};
use super::parser;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::mem;
use std::rc::Rc;

/// Nesting limit for user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

// Remaining stack below which evaluation moves onto a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

pub struct Interpreter {
    env: Environment,
    functions: HashMap<Rc<str>, Rc<FunctionDecl>>,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
    http: ureq::Agent,
    call_depth: usize,
    max_call_depth: usize,
}

impl Interpreter {
    /// An interpreter wired to the process's stdout and stdin.
    pub fn new() -> Self {
        Self::with_io(io::stdout(), BufReader::new(io::stdin()))
    }

    pub fn with_io(output: impl Write + 'static, input: impl BufRead + 'static) -> Self {
        Self {
            env: Environment::new(),
            functions: HashMap::new(),
            output: Box::new(output),
            input: Box::new(input),
            http: ureq::Agent::new(),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Tokenizes, parses and executes `source` against this interpreter's
    /// state. Variables and functions persist across calls.
    pub fn run(&mut self, source: &str) -> Result<(), FlowError> {
        self.run_with(source, LexOptions::default())
    }

    pub fn run_with(&mut self, source: &str, options: LexOptions) -> Result<(), FlowError> {
        let tokens = tokenize_with(source, options)?;
        let program = parser::parse(tokens)?;
        self.execute(&program)?;
        Ok(())
    }

    /// Runs a program. A top-level `return` ends it early.
    pub fn execute(&mut self, program: &Block) -> Result<(), RuntimeError> {
        self.execute_block(program)?;
        self.output
            .flush()
            .map_err(|e| RuntimeError::io(e.to_string()))
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn execute_block(&mut self, block: &Block) -> Result<ControlFlow, RuntimeError> {
        for statement in &block.statements {
            if let ControlFlow::Return(value) = self.execute_statement(statement)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Next)
    }

    fn execute_statement(&mut self, statement: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match statement {
            Stmt::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.set(name.clone(), value);
                Ok(ControlFlow::Next)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value).map_err(|e| RuntimeError::io(e.to_string()))?;
                Ok(ControlFlow::Next)
            }
            Stmt::If { condition, body } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(body)
                } else {
                    Ok(ControlFlow::Next)
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let ControlFlow::Return(value) = self.execute_block(body)? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::Next)
            }
            Stmt::Function(decl) => {
                self.functions.insert(decl.name.clone(), decl.clone());
                Ok(ControlFlow::Next)
            }
            Stmt::Return(expr) => Ok(ControlFlow::Return(self.evaluate(expr)?)),
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
                Ok(ControlFlow::Next)
            }
        }
    }

    /// Evaluates an expression, growing the stack when a deep call chain
    /// is close to exhausting it.
    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n) => Ok(Value::Int(*n)),
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::String(s) => Ok(Value::Str(s.clone())),
            // Unbound names read as 0
            Expr::Var(name) => Ok(self.env.get(name).cloned().unwrap_or(Value::Int(0))),
            Expr::BinOp { left, op, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                eval_binary_op(&left_val, *op, &right_val)
            }
            Expr::Call { name, args } => self.call(name, args),
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<Value, RuntimeError> {
        if let Some(builtin) = Builtin::from_name(name) {
            let values = self.evaluate_arguments(args)?;
            return self.call_builtin(builtin, &values);
        }

        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_function(name))?;
        let values = self.evaluate_arguments(args)?;
        self.call_user_function(&function, values)
    }

    fn evaluate_arguments(&mut self, args: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }

    fn call_builtin(&mut self, builtin: Builtin, args: &[Value]) -> Result<Value, RuntimeError> {
        match builtin {
            Builtin::Len => builtins::builtin_len(args),
            Builtin::Type => builtins::builtin_type(args),
            Builtin::Str => builtins::builtin_str(args),
            Builtin::Int => builtins::builtin_int(args),
            Builtin::Range => builtins::builtin_range(args),
            Builtin::Input => builtins::builtin_input(args, &mut *self.input, &mut *self.output),
            Builtin::HttpGet => builtins::builtin_http_get(&self.http, args),
            Builtin::HttpPost => builtins::builtin_http_post(&self.http, args),
            Builtin::ReadFile => builtins::builtin_read_file(args),
            Builtin::WriteFile => builtins::builtin_write_file(args),
        }
    }

    /// Runs `function` in a copy of the caller's environment with the
    /// parameters bound positionally. Surplus arguments are dropped and
    /// missing parameters stay unbound. The caller's environment is put back
    /// on every exit path.
    fn call_user_function(
        &mut self,
        function: &FunctionDecl,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::RecursionLimit { depth: self.max_call_depth });
        }

        let frame = self.env.overlay(function.params.iter().cloned().zip(args));
        let caller_env = mem::replace(&mut self.env, frame);
        self.call_depth += 1;
        let completion = self.execute_block(&function.body);
        self.call_depth -= 1;
        self.env = caller_env;

        match completion? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Next => Ok(Value::None),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `source` in a fresh interpreter on stdout/stdin.
pub fn run(source: &str) -> Result<(), FlowError> {
    Interpreter::new().run(source)
}

pub fn eval_binary_op(left: &Value, op: BinaryOp, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEq | BinaryOp::GreaterEq => {
            compare_values(left, op, right)
        }
        BinaryOp::Add => match (left, right) {
            (Value::Str(left_str), Value::Str(right_str)) => {
                let mut combined = String::with_capacity(left_str.len() + right_str.len());
                combined.push_str(left_str);
                combined.push_str(right_str);
                Ok(Value::str(combined))
            }
            (Value::List(left_list), Value::List(right_list)) => {
                let mut combined = Vec::with_capacity(left_list.len() + right_list.len());
                combined.extend(left_list.iter().cloned());
                combined.extend(right_list.iter().cloned());
                Ok(Value::list(combined))
            }
            _ => arithmetic(left, op, right),
        },
        BinaryOp::Mul => match (left, right) {
            (Value::Str(_), _) | (Value::List(_), _) if right.as_i64().is_some() => {
                repeat(left, right)
            }
            (_, Value::Str(_)) | (_, Value::List(_)) if left.as_i64().is_some() => {
                repeat(right, left)
            }
            _ => arithmetic(left, op, right),
        },
        BinaryOp::Sub | BinaryOp::Div => arithmetic(left, op, right),
    }
}

fn compare_values(left: &Value, op: BinaryOp, right: &Value) -> Result<Value, RuntimeError> {
    let float_operands = matches!(left, Value::Float(_)) || matches!(right, Value::Float(_));
    if let (true, Some(left_num), Some(right_num)) = (float_operands, left.as_f64(), right.as_f64()) {
        // Direct float comparison so NaN compares false rather than failing
        let result = match op {
            BinaryOp::Less => left_num < right_num,
            BinaryOp::Greater => left_num > right_num,
            BinaryOp::LessEq => left_num <= right_num,
            _ => left_num >= right_num,
        };
        return Ok(Value::Bool(result));
    }

    let ordering = left
        .compare(right)
        .ok_or_else(|| RuntimeError::unknown_operator(op.symbol(), left.type_name(), right.type_name()))?;
    let result = match op {
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::LessEq => ordering != Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

fn arithmetic(left: &Value, op: BinaryOp, right: &Value) -> Result<Value, RuntimeError> {
    let unknown = || RuntimeError::unknown_operator(op.symbol(), left.type_name(), right.type_name());

    if let (Some(left_int), Some(right_int)) = (left.as_i64(), right.as_i64()) {
        let result = match op {
            BinaryOp::Add => left_int.checked_add(right_int),
            BinaryOp::Sub => left_int.checked_sub(right_int),
            BinaryOp::Mul => left_int.checked_mul(right_int),
            BinaryOp::Div => {
                if right_int == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                floor_div(left_int, right_int)
            }
            _ => return Err(unknown()),
        };
        return result
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::integer_overflow(op.symbol()));
    }

    let (left_num, right_num) = match (left.as_f64(), right.as_f64()) {
        (Some(left_num), Some(right_num)) => (left_num, right_num),
        _ => return Err(unknown()),
    };
    let result = match op {
        BinaryOp::Add => left_num + right_num,
        BinaryOp::Sub => left_num - right_num,
        BinaryOp::Mul => left_num * right_num,
        BinaryOp::Div => {
            if right_num == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            left_num / right_num
        }
        _ => return Err(unknown()),
    };
    Ok(Value::Float(result))
}

/// Integer division rounding toward negative infinity.
fn floor_div(dividend: i64, divisor: i64) -> Option<i64> {
    let quotient = dividend.checked_div(divisor)?;
    if dividend % divisor != 0 && ((dividend < 0) != (divisor < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// `sequence * count`; a non-positive count yields an empty sequence. A
/// result too large to allocate is an overflow, not an abort.
fn repeat(sequence: &Value, count: &Value) -> Result<Value, RuntimeError> {
    let overflow = || RuntimeError::integer_overflow("*");
    let times = usize::try_from(count.as_i64().unwrap_or(0).max(0)).map_err(|_| overflow())?;
    match sequence {
        Value::Str(s) => {
            let total = s.len().checked_mul(times).ok_or_else(overflow)?;
            if total == 0 {
                return Ok(Value::str(""));
            }
            let mut repeated = String::new();
            repeated.try_reserve_exact(total).map_err(|_| overflow())?;
            for _ in 0..times {
                repeated.push_str(s);
            }
            Ok(Value::str(repeated))
        }
        Value::List(items) => {
            let total = items.len().checked_mul(times).ok_or_else(overflow)?;
            if total == 0 {
                return Ok(Value::list(Vec::new()));
            }
            let mut repeated = Vec::new();
            repeated.try_reserve_exact(total).map_err(|_| overflow())?;
            for _ in 0..times {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::list(repeated))
        }
        _ => Err(RuntimeError::unknown_operator("*", sequence.type_name(), count.type_name())),
    }
}
