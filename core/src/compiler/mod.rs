//! Compiler from the parsed AST to VM code.
//!
//! All name resolution happens here:
//!
//! - identifiers in value position become local loads, inlined constants or
//!   free-variable loads;
//! - call targets resolve to a registry function or a local function, never
//!   to a value;
//! - member names are checked against the fixed property set.
//!
//! Anything that fails to resolve is a compile error, so a compiled
//! expression can only ever invoke what the registries held at compile time.

mod bytecode;
mod scope_stack;


pub use bytecode::{BytecodeCompiler, Program};
