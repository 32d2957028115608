//! Tally VM instructions.
//!
//! Each instruction consumes its operands from the value stack and pushes one
//! result.
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`
//!
//! Call instructions hold the resolved registry entry itself, not its name.
//! There is no instruction that calls a value taken from the stack, so no
//! value arriving through the bindings can ever be invoked.

use core::fmt;
use std::sync::Arc;

use ecow::EcoString;

use crate::{
    registry::{Function, Junction, Operator},
    values::Value,
    vm::Code,
};

#[derive(Clone)]
pub enum Instruction {
    /// Push a literal or an inlined constant.
    /// Stack: [...] -> [..., value]
    PushLiteral(Value),

    /// Read a free variable from the binding map.
    /// Stack: [...] -> [..., value]
    LoadVariable(EcoString),

    /// Read a parameter or an assigned local, walking the frame chain.
    /// Stack: [...] -> [..., value]
    LoadLocal(EcoString),

    /// Apply a unary or binary registry operator.
    /// Stack: [..., a] -> [..., op a] or [..., a, b] -> [..., a op b]
    CallOperator(Arc<Operator>),

    /// `and`/`or`: `rhs` only runs when the left operand does not decide.
    /// Stack: [..., a] -> [..., bool]
    ShortCircuit { junction: Junction, rhs: Code },

    /// Call a registry function with `argc` arguments.
    /// Stack: [..., a1, ..., aN] -> [..., result]
    CallFunction { function: Arc<Function>, argc: usize },

    /// Call the local function defined under `slot`.
    /// Stack: [..., a1, ..., aN] -> [..., result]
    CallLocalFunction {
        name: EcoString,
        slot: usize,
        argc: usize,
    },

    /// Record a local function in the current frame.
    /// Stack: [...] -> [...]
    DefineLocalFunction(Arc<LocalFunction>),

    /// Stack: [..., a1, ..., aN] -> [..., [a1, ..., aN]]
    MakeArray(usize),

    /// Stack: [..., target, index] -> [..., target[index]]
    Index,

    /// Stack: [..., target] -> [..., target.property]
    MemberAccess(Property),

    /// Store the top of the stack into the current frame, leaving it there.
    /// Stack: [..., value] -> [..., value]
    Assign(EcoString),

    /// Run exactly one branch.
    /// Stack: [..., condition] -> [..., result]
    Conditional { then_branch: Code, else_branch: Code },

    /// Discard the previous statement's value.
    /// Stack: [..., a] -> [...]
    Sequence,
}

/// A local function definition: `name(params) = body`.
#[derive(Debug)]
pub struct LocalFunction {
    pub name: EcoString,
    /// Unique per compilation; call sites refer to the definition by slot.
    pub slot: usize,
    pub params: Vec<EcoString>,
    pub body: Code,
}

/// The members an expression may access. Anything else is rejected when
/// compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Characters of a string or elements of an array.
    Length,
    /// First element of an array.
    First,
    /// Last element of an array.
    Last,
}

impl Property {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Property::Length),
            "first" => Some(Property::First),
            "last" => Some(Property::Last),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Property::Length => "length",
            Property::First => "first",
            Property::Last => "last",
        }
    }
}

impl Instruction {
    /// Number of instructions in nested blocks, this one included.
    pub fn size(&self) -> usize {
        1 + match self {
            Instruction::ShortCircuit { rhs, .. } => rhs.size(),
            Instruction::Conditional {
                then_branch,
                else_branch,
            } => then_branch.size() + else_branch.size(),
            Instruction::DefineLocalFunction(def) => def.body.size(),
            _ => 0,
        }
    }
}

/// Short description used in evaluation errors, e.g. `operator /`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushLiteral(value) => write!(f, "literal {}", value),
            Instruction::LoadVariable(name) => write!(f, "variable `{}`", name),
            Instruction::LoadLocal(name) => write!(f, "local `{}`", name),
            Instruction::CallOperator(op) => write!(f, "operator {}", op.symbol()),
            Instruction::ShortCircuit { junction, .. } => match junction {
                Junction::And => f.write_str("operator and"),
                Junction::Or => f.write_str("operator or"),
            },
            Instruction::CallFunction { function, argc } => {
                write!(f, "call to {}/{}", function.name(), argc)
            }
            Instruction::CallLocalFunction { name, argc, .. } => {
                write!(f, "call to local {}/{}", name, argc)
            }
            Instruction::DefineLocalFunction(def) => {
                write!(f, "definition of {}/{}", def.name, def.params.len())
            }
            Instruction::MakeArray(n) => write!(f, "array of {}", n),
            Instruction::Index => f.write_str("index"),
            Instruction::MemberAccess(property) => write!(f, "member .{}", property.name()),
            Instruction::Assign(name) => write!(f, "assignment to `{}`", name),
            Instruction::Conditional { .. } => f.write_str("conditional"),
            Instruction::Sequence => f.write_str("sequence"),
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushLiteral(value) => write!(f, "PushLiteral({})", value),
            Instruction::LoadVariable(name) => write!(f, "LoadVariable({})", name),
            Instruction::LoadLocal(name) => write!(f, "LoadLocal({})", name),
            Instruction::CallOperator(op) => write!(f, "CallOperator({})", op.symbol()),
            Instruction::ShortCircuit { junction, .. } => {
                write!(f, "ShortCircuit({:?})", junction)
            }
            Instruction::CallFunction { function, argc } => {
                write!(f, "CallFunction({}, {})", function.name(), argc)
            }
            Instruction::CallLocalFunction { name, slot, argc } => {
                write!(f, "CallLocalFunction({}#{}, {})", name, slot, argc)
            }
            Instruction::DefineLocalFunction(def) => write!(
                f,
                "DefineLocalFunction({}#{}({}))",
                def.name,
                def.slot,
                def.params.join(", ")
            ),
            Instruction::MakeArray(n) => write!(f, "MakeArray({})", n),
            Instruction::Index => f.write_str("Index"),
            Instruction::MemberAccess(property) => {
                write!(f, "MemberAccess({})", property.name())
            }
            Instruction::Assign(name) => write!(f, "Assign({})", name),
            Instruction::Conditional { .. } => f.write_str("Conditional"),
            Instruction::Sequence => f.write_str("Sequence"),
        }
    }
}
