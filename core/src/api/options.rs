//! Configuration options for the Tally engine.
//!
//! No option can widen what an expression may invoke. Each one either
//! restricts a grammar feature or bounds a resource.

/// Grammar features and compile-time resource bounds.
///
/// # Example
///
/// ```
/// use tally_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     enable_assignment: false,
///     enable_local_function_definition: false,
///     ..CompilationOptions::default()
/// };
/// assert!(!options.enable_membership);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Parse `a in b` as a membership test.
    ///
    /// Default: false
    pub enable_membership: bool,

    /// Allow `f(x, y) = body`.
    ///
    /// Default: true
    pub enable_local_function_definition: bool,

    /// Allow `name = expr`.
    ///
    /// Default: true
    pub enable_assignment: bool,

    /// Allow the whitelisted member forms `a.length`, `a.first`, `a.last`.
    ///
    /// Default: true
    pub enable_member_access: bool,

    /// Maximum syntactic nesting (parentheses, operands, arguments) and
    /// maximum height of the parsed tree, so a chain like `a + b + ...` or
    /// `a[0][0]...` counts one level per link.
    ///
    /// Default: 100
    pub max_recursion_depth: usize,

    /// Maximum size of the compiled program, nested blocks included.
    ///
    /// Default: 10_000
    pub max_instruction_count: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            enable_membership: false,
            enable_local_function_definition: true,
            enable_assignment: true,
            enable_member_access: true,
            max_recursion_depth: 100,
            max_instruction_count: 10_000,
        }
    }
}

/// Runtime resource bounds.
///
/// # Example
///
/// ```
/// use tally_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 32,
///     max_steps: 10_000,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum nesting of local function calls.
    ///
    /// Default: 128
    pub max_depth: usize,

    /// Maximum number of instructions executed by one evaluation.
    ///
    /// Default: 1_000_000
    pub max_steps: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_steps: 1_000_000,
        }
    }
}

/// Defaults applied by an [`Engine`](super::Engine).
///
/// # Example
///
/// ```
/// use tally_core::api::{CompilationOptions, EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     default_compilation_options: CompilationOptions {
///         enable_membership: true,
///         ..CompilationOptions::default()
///     },
///     default_execution_options: ExecutionOptions::default(),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Used by `Engine::compile()`.
    pub default_compilation_options: CompilationOptions,

    /// Stored in every compiled expression and used by
    /// `CompiledExpression::evaluate()`.
    pub default_execution_options: ExecutionOptions,
}
