pub mod parser;
pub mod environment;
pub mod error;
pub mod control_flow;
pub mod builtins;
pub mod evaluator;

pub use error::{FlowError, RuntimeError};
pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use builtins::Builtin;
pub use parser::{parse, ParseError, Parser};
pub use evaluator::{eval_binary_op, run, Interpreter, DEFAULT_MAX_CALL_DEPTH};
