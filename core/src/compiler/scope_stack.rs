//! Lexical scopes for compile-time name resolution.
//!
//! The root scope holds names assigned and functions defined at the top level
//! of the expression. Each local function body pushes a scope pre-populated
//! with its parameters. Lookups search from the innermost scope outward, so
//! parameters shadow outer names strictly within the body.
//!
//! The scope stack mirrors the VM's frame chain one to one: a name bound in
//! the scope at depth `n` lives in the frame created for that scope at
//! runtime.

use ecow::EcoString;
use hashbrown::HashMap;

/// What a name in scope refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Parameter of an enclosing local function. Never assignable.
    Parameter,
    /// Name introduced by an assignment.
    Local,
    /// Local function definition.
    Function { slot: usize, arity: usize },
}

impl Binding {
    pub fn is_value(self) -> bool {
        matches!(self, Binding::Parameter | Binding::Local)
    }
}

#[derive(Debug, Default)]
struct Scope {
    names: HashMap<EcoString, Binding>,
}

#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// A stack holding only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Enter a local function body. `params` must already be distinct.
    pub fn push_function(&mut self, params: &[EcoString]) {
        let names = params
            .iter()
            .map(|name| (name.clone(), Binding::Parameter))
            .collect();
        self.scopes.push(Scope { names });
    }

    /// Leave a local function body. The root scope is never popped.
    pub fn pop_function(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).copied())
    }

    /// Bind `name` in the innermost scope, replacing any earlier binding
    /// there.
    pub fn bind(&mut self, name: EcoString, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name, binding);
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
