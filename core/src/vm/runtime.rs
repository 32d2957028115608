use ecow::{EcoString, eco_format};
use tracing::trace;

use crate::{
    api::{Error, ExecutionOptions, ResourceLimitError, ResourceLimitKind},
    registry::{Junction, OperatorFn},
    stdlib::sequence::length,
    syntax::Span,
    values::{Bindings, Value},
    vm::{
        Code, EvaluationError, Instruction, Property, RuntimeError, Stack,
        UnresolvedVariableError,
        frames::{Frames, ROOT},
    },
};

/// Executes compiled code against one set of bindings.
///
/// A VM is created per evaluation; it owns the operand stack and the frames,
/// and borrows the code and bindings immutably, so any number of evaluations
/// of the same code can run concurrently.
pub struct VM<'a> {
    bindings: &'a Bindings,
    options: &'a ExecutionOptions,
    stack: Stack<Value>,
    frames: Frames,
    depth: usize,
    steps: usize,
}

impl<'a> VM<'a> {
    pub fn new(bindings: &'a Bindings, options: &'a ExecutionOptions) -> Self {
        VM {
            bindings,
            options,
            stack: Stack::with_capacity(16),
            frames: Frames::new(),
            depth: 0,
            steps: 0,
        }
    }

    /// Convenience method to evaluate code in one call.
    pub fn execute(code: &Code, bindings: &'a Bindings, options: &'a ExecutionOptions) -> Result<Value, Error> {
        let mut vm = VM::new(bindings, options);
        vm.run(code)
    }

    pub fn run(&mut self, code: &Code) -> Result<Value, Error> {
        self.block(code, ROOT)?;
        trace!(steps = self.steps, "evaluation finished");
        self.stack.pop().map_err(|kind| {
            EvaluationError {
                kind,
                instruction: "end of expression".into(),
                span: Span::default(),
            }
            .into()
        })
    }

    fn block(&mut self, code: &Code, frame: usize) -> Result<(), Error> {
        for (instruction, span) in code.iter() {
            self.steps += 1;
            if self.steps > self.options.max_steps {
                let kind = ResourceLimitKind::Steps {
                    limit: self.options.max_steps,
                };
                return Err(ResourceLimitError::new(kind, span.clone()).into());
            }
            self.step(instruction, span, frame)?;
        }
        Ok(())
    }

    fn step(&mut self, instruction: &Instruction, span: &Span, frame: usize) -> Result<(), Error> {
        let fault = |kind: RuntimeError| -> Error {
            EvaluationError {
                kind,
                instruction: eco_format!("{}", instruction),
                span: span.clone(),
            }
            .into()
        };
        let unresolved = |name: &EcoString| -> Error {
            UnresolvedVariableError {
                name: name.clone(),
                span: span.clone(),
            }
            .into()
        };

        use Instruction::*;
        match instruction {
            PushLiteral(value) => self.stack.push(value.clone()),
            LoadVariable(name) => {
                let value = self.bindings.get(name).ok_or_else(|| unresolved(name))?;
                self.stack.push(value.clone());
            }
            LoadLocal(name) => {
                let value = self.frames.variable(frame, name).ok_or_else(|| unresolved(name))?;
                self.stack.push(value.clone());
            }
            CallOperator(operator) => {
                let result = match operator.implementation() {
                    OperatorFn::Unary(f) => {
                        let a = self.stack.pop().map_err(fault)?;
                        f(&a)
                    }
                    OperatorFn::Binary(f) => {
                        let b = self.stack.pop().map_err(fault)?;
                        let a = self.stack.pop().map_err(fault)?;
                        f(&a, &b)
                    }
                    OperatorFn::ShortCircuit(junction) => {
                        let b = self.stack.pop().map_err(fault)?;
                        let a = self.stack.pop().map_err(fault)?;
                        Ok(Value::Bool(match junction {
                            Junction::And => a.is_truthy() && b.is_truthy(),
                            Junction::Or => a.is_truthy() || b.is_truthy(),
                        }))
                    }
                };
                self.stack.push(result.map_err(fault)?);
            }
            ShortCircuit { junction, rhs } => {
                let left = self.stack.pop().map_err(fault)?.is_truthy();
                let decided = match junction {
                    Junction::And => !left,
                    Junction::Or => left,
                };
                let result = if decided {
                    left
                } else {
                    self.block(rhs, frame)?;
                    self.stack.pop().map_err(fault)?.is_truthy()
                };
                self.stack.push(Value::Bool(result));
            }
            CallFunction { function, argc } => {
                let args = self.stack.pop_n(*argc).map_err(fault)?;
                let result = function.call(&args).map_err(fault)?;
                self.stack.push(result);
            }
            CallLocalFunction { name, slot, argc } => {
                let args = self.stack.pop_n(*argc).map_err(fault)?;
                let Some(closure) = self.frames.function(frame, *slot).cloned() else {
                    return Err(fault(RuntimeError::UndefinedLocalFunction(name.clone())));
                };
                if self.depth >= self.options.max_depth {
                    let kind = ResourceLimitKind::CallDepth {
                        limit: self.options.max_depth,
                    };
                    return Err(ResourceLimitError::new(kind, span.clone()).into());
                }
                trace!(name = %name, depth = self.depth, "calling local function");

                let base = self.frames.len();
                let callee = self.frames.push(closure.env);
                for (param, arg) in closure.definition.params.iter().zip(args) {
                    self.frames.assign(callee, param.clone(), arg);
                }
                self.depth += 1;
                let result = self.block(&closure.definition.body, callee);
                self.depth -= 1;
                self.frames.truncate(base);
                result?;
            }
            DefineLocalFunction(definition) => self.frames.define(frame, definition.clone()),
            MakeArray(n) => {
                let items = self.stack.pop_n(*n).map_err(fault)?;
                self.stack.push(Value::array(items));
            }
            Index => {
                let index = self.stack.pop().map_err(fault)?;
                let target = self.stack.pop().map_err(fault)?;
                self.stack.push(index_value(&target, &index).map_err(fault)?);
            }
            MemberAccess(property) => {
                let target = self.stack.pop().map_err(fault)?;
                self.stack.push(member(&target, *property).map_err(fault)?);
            }
            Assign(name) => {
                let value = self
                    .stack
                    .peek()
                    .cloned()
                    .ok_or_else(|| fault(RuntimeError::StackUnderflow))?;
                self.frames.assign(frame, name.clone(), value);
            }
            Conditional {
                then_branch,
                else_branch,
            } => {
                let condition = self.stack.pop().map_err(fault)?;
                let branch = if condition.is_truthy() { then_branch } else { else_branch };
                self.block(branch, frame)?;
            }
            Sequence => {
                self.stack.pop().map_err(fault)?;
            }
        }
        Ok(())
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let i = match index.as_number() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n < usize::MAX as f64 => n as usize,
        _ => return Err(RuntimeError::InvalidIndex(eco_format!("{}", index))),
    };
    match target {
        Value::Array(items) => items.get(i).cloned().ok_or(RuntimeError::IndexOutOfBounds {
            index: i,
            len: items.len(),
        }),
        Value::Str(s) => s.chars().nth(i).map(|c| Value::Str(eco_format!("{}", c))).ok_or_else(|| {
            RuntimeError::IndexOutOfBounds {
                index: i,
                len: s.chars().count(),
            }
        }),
        other => Err(RuntimeError::type_mismatch("array or string", other)),
    }
}

fn member(target: &Value, property: Property) -> Result<Value, RuntimeError> {
    if property == Property::Length {
        return Ok(Value::Number(length(target)? as f64));
    }
    let Value::Array(items) = target else {
        return Err(RuntimeError::type_mismatch("array", target));
    };
    let item = match property {
        Property::First => items.first(),
        _ => items.last(),
    };
    item.cloned().ok_or(RuntimeError::IndexOutOfBounds { index: 0, len: 0 })
}
