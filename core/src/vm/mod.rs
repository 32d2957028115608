//! Stack-based virtual machine.
//!
//! Control flow is structured: branches, short-circuit operands and local
//! function bodies are nested [`Code`] blocks, executed recursively.

mod code;
mod error;
mod frames;
mod instruction_set;
mod runtime;
mod stack;


pub use code::Code;
pub use error::{EvaluationError, RuntimeError, UnresolvedVariableError};
pub use instruction_set::{Instruction, LocalFunction, Property};
pub use runtime::VM;

pub(crate) use stack::Stack;
