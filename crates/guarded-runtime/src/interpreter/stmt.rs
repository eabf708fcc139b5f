//! Statement execution

use crate::ast::*;
use crate::interpreter::{input, Interpreter};
use crate::span::Span;
use crate::types::Type;
use crate::value::{ArrayValue, RuntimeError, RuntimeValue};
use std::io::Write;

impl<'io> Interpreter<'io> {
    /// Execute a block in its own scope, discarding the scope's values on exit
    pub(super) fn eval_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        let enclosing = self.scope.replace(block.scope);
        let result = self.eval_statements(&block.statements);
        self.scopes.discard(block.scope);
        self.scope = enclosing;
        result
    }

    /// Execute statements strictly left to right
    pub(super) fn eval_statements(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.eval_statement(stmt)?;
        }
        Ok(())
    }

    /// Execute a statement
    fn eval_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Block(block) => self.eval_block(block),
            Stmt::Assign(assign) => self.eval_assign(assign),
            Stmt::If(guarded) => self.eval_if(guarded),
            Stmt::Do(guarded) => self.eval_do(guarded),
            Stmt::For(for_stmt) => self.eval_for(for_stmt),
            Stmt::Print(print) => self.eval_print(print),
            Stmt::Read(read) => self.eval_read(read),
        }
    }

    /// Evaluate every right-hand side, then commit to the target
    fn eval_assign(&mut self, assign: &Assign) -> Result<(), RuntimeError> {
        let mut values = Vec::with_capacity(assign.values.len());
        for expr in &assign.values {
            values.push(self.eval_expr(expr)?);
        }

        let ty = self.binding(&assign.target)?.ty;
        let value = assigned_value(ty, values, assign.span)?;
        self.binding_mut(&assign.target)?.value = Some(value);
        Ok(())
    }

    /// Run the body of every guard that holds, in order
    fn eval_if(&mut self, guarded: &GuardedStmt) -> Result<(), RuntimeError> {
        self.eval_guards(&guarded.guards)?;
        Ok(())
    }

    /// Repeat whole guard passes while any guard held in the last pass
    fn eval_do(&mut self, guarded: &GuardedStmt) -> Result<(), RuntimeError> {
        let mut pass: u64 = 0;
        loop {
            pass += 1;
            let any_held = self.eval_guards(&guarded.guards)?;
            tracing::trace!(pass, any_held, line = guarded.span.line, "do pass");
            if !any_held {
                return Ok(());
            }
        }
    }

    /// One pass over `guards`; returns whether at least one held
    fn eval_guards(&mut self, guards: &[Guard]) -> Result<bool, RuntimeError> {
        let mut any_held = false;
        for guard in guards {
            if self.eval_condition(&guard.condition)? {
                any_held = true;
                self.eval_statements(&guard.body)?;
            }
        }
        Ok(any_held)
    }

    /// Bind the control variable to each value of `lower..=upper` in turn
    fn eval_for(&mut self, for_stmt: &ForStmt) -> Result<(), RuntimeError> {
        let lower = self.eval_int(&for_stmt.lower)?;
        let upper = self.eval_int(&for_stmt.upper)?;
        tracing::trace!(lower, upper, var = %for_stmt.var.name, "for loop");

        let enclosing = self.scope.replace(for_stmt.scope);
        let result = self.eval_for_body(for_stmt, lower, upper);
        self.scopes.discard(for_stmt.scope);
        self.scope = enclosing;
        result
    }

    fn eval_for_body(
        &mut self,
        for_stmt: &ForStmt,
        lower: i64,
        upper: i64,
    ) -> Result<(), RuntimeError> {
        for i in lower..=upper {
            self.binding_mut(&for_stmt.var)?.value = Some(RuntimeValue::Int(i));
            self.eval_statements(&for_stmt.body)?;
        }
        Ok(())
    }

    /// Write the textual form of a value, with a newline for `println`
    fn eval_print(&mut self, print: &PrintStmt) -> Result<(), RuntimeError> {
        let value = self.eval_expr(&print.expr)?;
        if print.newline {
            writeln!(self.output, "{}", value)?;
        } else {
            write!(self.output, "{}", value)?;
        }
        if self.config.flush_output {
            self.output.flush()?;
        }
        Ok(())
    }

    /// Read one line and store it with the shape of the target's type
    fn eval_read(&mut self, read: &ReadStmt) -> Result<(), RuntimeError> {
        let ty = self.binding(&read.target)?.ty;

        if self.config.prompts {
            writeln!(self.output, "{}", input::prompt(ty))?;
        }
        self.output.flush()?;

        let bad_input = RuntimeError::InputFormat {
            span: read.target.span,
        };
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(bad_input);
        }
        // Undecodable input is a format error at the target, not an I/O fault.
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => return Err(bad_input),
        };
        tracing::trace!(var = %read.target.name, input = line.trim_end(), "read input");

        let value = input::parse_line(&line, ty).ok_or(bad_input)?;
        self.binding_mut(&read.target)?.value = Some(value);
        Ok(())
    }
}

/// Value stored by `target := values` for a target declared as `ty`
///
/// Arrays receive either a whole array value or one int per slot.
fn assigned_value(
    ty: Type,
    mut values: Vec<RuntimeValue>,
    span: Span,
) -> Result<RuntimeValue, RuntimeError> {
    match ty {
        Type::Array { lower, upper } => {
            if let [RuntimeValue::Array(_)] = values.as_slice() {
                if let Some(whole) = values.pop() {
                    return Ok(whole);
                }
            }
            let items = values
                .into_iter()
                .map(|value| match value {
                    RuntimeValue::Int(n) => Ok(n),
                    other => Err(RuntimeError::TypeError {
                        msg: format!("expected int element, found {}", other.type_name()),
                        span,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            ArrayValue::new(lower, upper, items)
                .map(RuntimeValue::Array)
                .map_err(|err| RuntimeError::from_array(err, span))
        }
        _ => values.into_iter().next().ok_or_else(|| RuntimeError::TypeError {
            msg: "assignment without a value".to_string(),
            span,
        }),
    }
}
