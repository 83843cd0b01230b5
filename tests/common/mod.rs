#![allow(dead_code)]

use flowlang::interpreter::RuntimeError;
use flowlang::{FlowError, Interpreter};
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An output sink the test keeps a handle to after the interpreter takes
/// ownership of its clone.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn interpreter_with_input(input: &str) -> (Interpreter, SharedOutput) {
    let output = SharedOutput::default();
    let interpreter = Interpreter::with_io(output.clone(), Cursor::new(input.to_string()));
    (interpreter, output)
}

pub fn run_capture(source: &str) -> Result<String, FlowError> {
    run_with_input(source, "")
}

pub fn run_with_input(source: &str, input: &str) -> Result<String, FlowError> {
    let (mut interpreter, output) = interpreter_with_input(input);
    interpreter.run(source)?;
    Ok(output.contents())
}

/// Output of a program that must succeed.
pub fn output_of(source: &str) -> String {
    match run_capture(source) {
        Ok(output) => output,
        Err(e) => panic!("program failed: {}\n{}", e, source),
    }
}

pub fn runtime_error(source: &str) -> RuntimeError {
    match run_capture(source) {
        Err(FlowError::Runtime(e)) => e,
        other => panic!("expected a runtime error, got {:?}", other),
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "flowlang-{}-{}-{}",
        label,
        std::process::id(),
        unique
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Quotes a host string as a flow string literal.
pub fn flow_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
