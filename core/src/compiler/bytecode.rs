//! Name resolution and code generation.

use std::{collections::BTreeSet, sync::Arc};

use ecow::{EcoString, eco_format};
use tracing::trace;

use crate::{
    api::{CompilationOptions, Error, ResourceLimitError, ResourceLimitKind},
    compiler::scope_stack::{Binding, ScopeStack},
    parser::{Expr, Node, ParseError, ParseErrorKind},
    registry::{Function, OperatorFn, Registries},
    syntax::Span,
    values::Value,
    vm::{Code, Instruction, LocalFunction, Property},
};

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Program {
    pub code: Code,
    /// Names that must be supplied in the bindings at evaluation time.
    pub free_variables: BTreeSet<EcoString>,
}

/// Compiles an AST against a registry snapshot.
///
/// Every call target is resolved here. The resulting [`Code`] holds the
/// registry entries themselves, so later changes to the registries do not
/// affect it.
pub struct BytecodeCompiler<'a> {
    source: &'a str,
    registries: &'a Registries,
    options: &'a CompilationOptions,
    scopes: ScopeStack,
    free_variables: BTreeSet<EcoString>,
    next_slot: usize,
    emitted: usize,
}

impl<'a> BytecodeCompiler<'a> {
    pub fn new(source: &'a str, registries: &'a Registries, options: &'a CompilationOptions) -> Self {
        Self {
            source,
            registries,
            options,
            scopes: ScopeStack::new(),
            free_variables: BTreeSet::new(),
            next_slot: 0,
            emitted: 0,
        }
    }

    /// Convenience method to compile an expression in one call.
    pub fn compile(
        source: &'a str,
        ast: &Node,
        registries: &'a Registries,
        options: &'a CompilationOptions,
    ) -> Result<Program, Error> {
        // Code generation recurses once per tree level.
        if ast.height() > options.max_recursion_depth {
            return Err(ResourceLimitError::new(
                ResourceLimitKind::NestingDepth {
                    limit: options.max_recursion_depth,
                },
                ast.span.clone(),
            )
            .into());
        }
        let mut compiler = Self::new(source, registries, options);
        let code = compiler.compile_block(ast)?;
        Ok(Program {
            code,
            free_variables: compiler.free_variables,
        })
    }

    fn compile_block(&mut self, node: &Node) -> Result<Code, Error> {
        let mut code = Code::new();
        self.compile_node(node, &mut code)?;
        Ok(code)
    }

    fn emit(&mut self, code: &mut Code, instruction: Instruction, span: &Span) -> Result<(), Error> {
        self.emitted += 1;
        if self.emitted > self.options.max_instruction_count {
            return Err(ResourceLimitError::new(
                ResourceLimitKind::InstructionCount {
                    limit: self.options.max_instruction_count,
                },
                span.clone(),
            )
            .into());
        }
        code.push(instruction, span.clone());
        Ok(())
    }

    fn compile_node(&mut self, node: &Node, code: &mut Code) -> Result<(), Error> {
        let span = &node.span;
        match &node.expr {
            Expr::Number(n) => self.emit(code, Instruction::PushLiteral(Value::Number(*n)), span),
            Expr::Str(s) => self.emit(code, Instruction::PushLiteral(Value::Str(s.clone())), span),
            Expr::Identifier(name) => self.compile_identifier(name, span, code),
            Expr::Array(items) => {
                for item in items {
                    self.compile_node(item, code)?;
                }
                self.emit(code, Instruction::MakeArray(items.len()), span)
            }
            Expr::Unary { op, operand } => {
                let Some(operator) = self.registries.unary_operator(op) else {
                    return Err(error(ParseErrorKind::UnknownOperator(op.clone()), span));
                };
                let operator = operator.clone();
                self.compile_node(operand, code)?;
                self.emit(code, Instruction::CallOperator(operator), span)
            }
            Expr::Binary { op, left, right } => {
                let Some(operator) = self.registries.binary_operator(op) else {
                    return Err(error(ParseErrorKind::UnknownOperator(op.clone()), span));
                };
                let operator = operator.clone();
                self.compile_node(left, code)?;
                if let OperatorFn::ShortCircuit(junction) = operator.implementation() {
                    let junction = *junction;
                    let rhs = self.compile_block(right)?;
                    self.emit(code, Instruction::ShortCircuit { junction, rhs }, span)
                } else {
                    self.compile_node(right, code)?;
                    self.emit(code, Instruction::CallOperator(operator), span)
                }
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                self.compile_node(condition, code)?;
                let then_branch = self.compile_block(then_branch)?;
                let else_branch = self.compile_block(else_branch)?;
                self.emit(
                    code,
                    Instruction::Conditional {
                        then_branch,
                        else_branch,
                    },
                    span,
                )
            }
            Expr::Call { callee, args } => self.compile_call(callee, args, span, code),
            Expr::Index { target, index } => {
                self.compile_node(target, code)?;
                self.compile_node(index, code)?;
                self.emit(code, Instruction::Index, span)
            }
            Expr::Member { target, name } => {
                let Some(property) = Property::from_name(name) else {
                    return Err(error(ParseErrorKind::ForbiddenMember(name.clone()), span));
                };
                self.compile_node(target, code)?;
                self.emit(code, Instruction::MemberAccess(property), span)
            }
            Expr::Assign { name, value } => {
                self.check_assignable(name, span)?;
                self.compile_node(value, code)?;
                self.scopes.bind(name.clone(), Binding::Local);
                self.emit(code, Instruction::Assign(name.clone()), span)
            }
            Expr::FunctionDef { name, params, body } => {
                self.define_function(name, params, body, span, code)?;
                self.emit(code, Instruction::PushLiteral(Value::Null), span)
            }
            Expr::Sequence(statements) => {
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        self.emit(code, Instruction::Sequence, &statement.span)?;
                    }
                    self.compile_node(statement, code)?;
                }
                Ok(())
            }
        }
    }

    fn compile_identifier(&mut self, name: &EcoString, span: &Span, code: &mut Code) -> Result<(), Error> {
        match self.scopes.lookup(name) {
            Some(binding) if binding.is_value() => {
                return self.emit(code, Instruction::LoadLocal(name.clone()), span);
            }
            Some(_) => return Err(error(ParseErrorKind::FunctionAsValue(name.clone()), span)),
            None => {}
        }
        if let Some(value) = self.registries.constant(name) {
            let value = value.clone();
            return self.emit(code, Instruction::PushLiteral(value), span);
        }
        if self.registries.function(name).is_some() {
            return Err(error(ParseErrorKind::FunctionAsValue(name.clone()), span));
        }
        if self.registries.unary_operator(name).is_some()
            || self.registries.binary_operator(name).is_some()
        {
            return Err(error(ParseErrorKind::OperatorAsValue(name.clone()), span));
        }
        trace!(name = %name, "free variable");
        self.free_variables.insert(name.clone());
        self.emit(code, Instruction::LoadVariable(name.clone()), span)
    }

    fn compile_call(&mut self, callee: &Node, args: &[Node], span: &Span, code: &mut Code) -> Result<(), Error> {
        let name = match &callee.expr {
            Expr::Identifier(name) => name,
            Expr::FunctionDef { name, params, body } => {
                let slot = self.define_function(name, params, body, &callee.span, code)?;
                check_local_arity(name, params.len(), args.len(), span)?;
                return self.emit_local_call(name, slot, args, span, code);
            }
            _ => {
                let text = callee.span.str_of(self.source);
                return Err(error(ParseErrorKind::NotCallable(text.into()), span));
            }
        };

        match self.scopes.lookup(name) {
            Some(Binding::Function { slot, arity }) => {
                trace!(name = %name, slot, "resolved local function");
                check_local_arity(name, arity, args.len(), span)?;
                return self.emit_local_call(name, slot, args, span, code);
            }
            Some(_) => return Err(error(ParseErrorKind::NotCallable(name.clone()), span)),
            None => {}
        }

        let Some(function) = self.registries.function(name) else {
            return Err(error(ParseErrorKind::UnknownFunction(name.clone()), &callee.span));
        };
        let function = function.clone();
        if !function.accepts(args.len()) {
            return Err(error(
                ParseErrorKind::ArityMismatch {
                    name: name.clone(),
                    expected: expected_arity(&function),
                    found: args.len(),
                },
                span,
            ));
        }
        trace!(name = %name, argc = args.len(), "resolved registry function");
        for arg in args {
            self.compile_node(arg, code)?;
        }
        let argc = args.len();
        self.emit(code, Instruction::CallFunction { function, argc }, span)
    }

    fn emit_local_call(
        &mut self,
        name: &EcoString,
        slot: usize,
        args: &[Node],
        span: &Span,
        code: &mut Code,
    ) -> Result<(), Error> {
        for arg in args {
            self.compile_node(arg, code)?;
        }
        let instruction = Instruction::CallLocalFunction {
            name: name.clone(),
            slot,
            argc: args.len(),
        };
        self.emit(code, instruction, span)
    }

    /// Emits the definition and returns its slot. The name is bound before
    /// the body compiles so the body can call itself.
    fn define_function(
        &mut self,
        name: &EcoString,
        params: &[EcoString],
        body: &Node,
        span: &Span,
        code: &mut Code,
    ) -> Result<usize, Error> {
        if self.registries.function(name).is_some() {
            return Err(error(ParseErrorKind::ShadowsRegistryFunction(name.clone()), span));
        }
        if self.scopes.lookup(name) == Some(Binding::Parameter) {
            return Err(error(ParseErrorKind::IllegalAssignmentTarget, span));
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.scopes.bind(
            name.clone(),
            Binding::Function {
                slot,
                arity: params.len(),
            },
        );
        trace!(name = %name, slot, depth = self.scopes.depth(), "defining local function");

        self.scopes.push_function(params);
        let body = self.compile_block(body);
        self.scopes.pop_function();

        let definition = LocalFunction {
            name: name.clone(),
            slot,
            params: params.to_vec(),
            body: body?,
        };
        self.emit(code, Instruction::DefineLocalFunction(Arc::new(definition)), span)?;
        Ok(slot)
    }

    fn check_assignable(&self, name: &EcoString, span: &Span) -> Result<(), Error> {
        let illegal = match self.scopes.lookup(name) {
            Some(Binding::Local) => false,
            Some(_) => true,
            None => {
                self.registries.constant(name).is_some()
                    || self.registries.function(name).is_some()
                    || self.registries.unary_operator(name).is_some()
                    || self.registries.binary_operator(name).is_some()
            }
        };
        if illegal {
            return Err(error(ParseErrorKind::IllegalAssignmentTarget, span));
        }
        Ok(())
    }
}

fn error(kind: ParseErrorKind, span: &Span) -> Error {
    ParseError::new(kind, span.clone()).into()
}

fn check_local_arity(name: &EcoString, arity: usize, found: usize, span: &Span) -> Result<(), Error> {
    if arity == found {
        return Ok(());
    }
    Err(error(
        ParseErrorKind::ArityMismatch {
            name: name.clone(),
            expected: eco_format!("{}", arity),
            found,
        },
        span,
    ))
}

fn expected_arity(function: &Function) -> EcoString {
    match function.max_arity() {
        Some(max) if max == function.min_arity() => eco_format!("{}", max),
        Some(max) => eco_format!("{} to {}", function.min_arity(), max),
        None => eco_format!("at least {}", function.min_arity()),
    }
}
