use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// The variables visible to the running statement.
///
/// A call does not push a scope: it swaps in a copy of the caller's
/// environment overlaid with the parameters, and swaps the caller's back on
/// exit. Writes made inside the call never reach the caller.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<Rc<str>, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds or rebinds a name.
    pub fn set(&mut self, name: Rc<str>, value: Value) {
        self.vars.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Snapshot of this environment with `bindings` layered on top.
    pub fn overlay(&self, bindings: impl IntoIterator<Item = (Rc<str>, Value)>) -> Environment {
        let mut frame = self.clone();
        for (name, value) in bindings {
            frame.set(name, value);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
