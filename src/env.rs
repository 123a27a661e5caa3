use crate::value::Value;
use std::collections::HashMap;

/// The variable store owned by one interpreter instance.
///
/// Bindings are created empty at construction, written only by the `set`
/// command, and wiped all at once by `clear`. There is no persistence: the
/// store lives exactly as long as the interpreter.
///
/// `should_exit` lets a read loop know the session asked to terminate, so
/// library code never has to kill the process itself.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, Value>,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a bound variable.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Creates or overwrites a binding.
    pub fn set_var(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Removes every binding in one step. Idempotent.
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True when no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
