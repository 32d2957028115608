//! Capability registries.
//!
//! Four independently mutable name tables: unary operators, binary operators,
//! functions and constants. They are the only record of what an expression
//! may name and invoke. The compiler consults them once; every call
//! instruction it emits holds its own `Arc` of the resolved entry. Mutating a
//! registry afterwards therefore never changes an already-compiled program:
//! removing an entry does not revoke it from existing programs, and adding one
//! does not grant it to them.

mod function;
mod operator;


pub use function::{Function, NativeFn};
pub use operator::{
    Arity, Associativity, BinaryFn, Junction, Operator, OperatorFn, Precedence, UnaryFn,
};

use core::fmt;
use std::sync::Arc;

use ecow::EcoString;
use hashbrown::HashMap;
use tracing::debug;

use crate::values::Value;

/// The set of operators, functions and constants a compilation may resolve.
///
/// `Registries::default()` is populated with the standard library; use
/// [`Registries::empty`] to start from nothing. Cloning is cheap (entries are
/// shared), which makes per-request snapshots practical.
///
/// # Example
///
/// ```
/// use tally_core::{Registries, compile, CompilationOptions};
///
/// let mut registries = Registries::default();
/// registries.set_functions([]);
///
/// // Arithmetic still works; there is nothing left to call.
/// assert!(compile("1 + 2", &registries, &CompilationOptions::default()).is_ok());
/// assert!(compile("max(1, 2)", &registries, &CompilationOptions::default()).is_err());
/// ```
#[derive(Clone)]
pub struct Registries {
    unary_operators: HashMap<EcoString, Arc<Operator>>,
    binary_operators: HashMap<EcoString, Arc<Operator>>,
    functions: HashMap<EcoString, Arc<Function>>,
    constants: HashMap<EcoString, Value>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registries {
    /// Registries with no entries at all. Only literals, arrays, grammar forms
    /// and free variables remain usable.
    pub fn empty() -> Self {
        Self {
            unary_operators: HashMap::new(),
            binary_operators: HashMap::new(),
            functions: HashMap::new(),
            constants: HashMap::new(),
        }
    }

    /// Registries populated with the standard operators, functions and
    /// constants.
    pub fn with_defaults() -> Self {
        let mut registries = Self::empty();
        registries.set_operators(crate::stdlib::default_operators());
        registries.set_functions(crate::stdlib::default_functions());
        registries.set_constants(crate::stdlib::default_constants());
        registries
    }

    // === Bulk replacement ===

    /// Replace the whole function table.
    pub fn set_functions(&mut self, functions: impl IntoIterator<Item = Function>) {
        self.functions.clear();
        for function in functions {
            self.insert_function(function);
        }
        debug!(count = self.functions.len(), "function registry replaced");
    }

    /// Replace the whole constant table.
    pub fn set_constants<K, V>(&mut self, constants: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<EcoString>,
        V: Into<Value>,
    {
        self.constants = constants
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        debug!(count = self.constants.len(), "constant registry replaced");
    }

    /// Replace both operator tables. Each operator lands in the unary or the
    /// binary table according to its arity.
    pub fn set_operators(&mut self, operators: impl IntoIterator<Item = Operator>) {
        self.unary_operators.clear();
        self.binary_operators.clear();
        for operator in operators {
            self.insert_operator(operator);
        }
        debug!(
            unary = self.unary_operators.len(),
            binary = self.binary_operators.len(),
            "operator registries replaced"
        );
    }

    /// Empty all four tables.
    pub fn clear_all(&mut self) {
        self.unary_operators.clear();
        self.binary_operators.clear();
        self.functions.clear();
        self.constants.clear();
        debug!("all registries cleared");
    }

    // === Functions ===

    pub fn insert_function(&mut self, function: Function) -> Option<Arc<Function>> {
        self.functions
            .insert(EcoString::from(function.name()), Arc::new(function))
    }

    pub fn remove_function(&mut self, name: &str) -> Option<Arc<Function>> {
        self.functions.remove(name)
    }

    pub fn function(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values().map(Arc::as_ref)
    }

    // === Constants ===

    pub fn insert_constant(
        &mut self,
        name: impl Into<EcoString>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.constants.insert(name.into(), value.into())
    }

    pub fn remove_constant(&mut self, name: &str) -> Option<Value> {
        self.constants.remove(name)
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), v))
    }

    // === Operators ===

    pub fn insert_operator(&mut self, operator: Operator) -> Option<Arc<Operator>> {
        let table = match operator.arity() {
            Arity::Unary => &mut self.unary_operators,
            Arity::Binary => &mut self.binary_operators,
        };
        table.insert(EcoString::from(operator.symbol()), Arc::new(operator))
    }

    pub fn remove_operator(&mut self, symbol: &str, arity: Arity) -> Option<Arc<Operator>> {
        match arity {
            Arity::Unary => self.unary_operators.remove(symbol),
            Arity::Binary => self.binary_operators.remove(symbol),
        }
    }

    pub fn unary_operator(&self, symbol: &str) -> Option<&Arc<Operator>> {
        self.unary_operators.get(symbol)
    }

    pub fn binary_operator(&self, symbol: &str) -> Option<&Arc<Operator>> {
        self.binary_operators.get(symbol)
    }

    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.unary_operators
            .values()
            .chain(self.binary_operators.values())
            .map(Arc::as_ref)
    }

    /// Whether `name` is claimed by any registry table. Such names are never
    /// free variables.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.unary_operators.contains_key(name)
            || self.binary_operators.contains_key(name)
            || self.functions.contains_key(name)
            || self.constants.contains_key(name)
    }
}

fn sorted_keys<V>(map: &HashMap<EcoString, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(EcoString::as_str).collect();
    keys.sort_unstable();
    keys
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field("unary_operators", &sorted_keys(&self.unary_operators))
            .field("binary_operators", &sorted_keys(&self.binary_operators))
            .field("functions", &sorted_keys(&self.functions))
            .field("constants", &sorted_keys(&self.constants))
            .finish()
    }
}
