use core::fmt;

use crate::{syntax::Span, vm::Instruction};

/// A block of instructions with the source span of each one.
///
/// Branches, short-circuit operands and local function bodies are nested
/// blocks rather than jump targets, so the VM never computes an address.
#[derive(Clone, Default)]
pub struct Code {
    instructions: Vec<Instruction>,
    spans: Vec<Span>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction, span: Span) {
        self.instructions.push(instruction);
        self.spans.push(span);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Instruction, &Span)> {
        self.instructions.iter().zip(&self.spans)
    }

    /// Total instruction count, nested blocks included.
    pub fn size(&self) -> usize {
        self.instructions.iter().map(Instruction::size).sum()
    }

    fn disassemble(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for (addr, (instr, span)) in self.iter().enumerate() {
            writeln!(f, "{:indent$}{:4}  {:?}  @{}", "", addr, instr, span, indent = indent)?;
            let nested = indent + 6;
            match instr {
                Instruction::ShortCircuit { rhs, .. } => rhs.disassemble(f, nested)?,
                Instruction::Conditional {
                    then_branch,
                    else_branch,
                } => {
                    writeln!(f, "{:nested$}then:", "", nested = nested)?;
                    then_branch.disassemble(f, nested + 2)?;
                    writeln!(f, "{:nested$}else:", "", nested = nested)?;
                    else_branch.disassemble(f, nested + 2)?;
                }
                Instruction::DefineLocalFunction(def) => def.body.disassemble(f, nested)?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code {{")?;
        writeln!(f, "  size: {}", self.size())?;
        writeln!(f, "  instructions:")?;
        self.disassemble(f, 4)?;
        write!(f, "}}")
    }
}
