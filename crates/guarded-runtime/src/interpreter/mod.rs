//! AST interpreter (tree-walking)
//!
//! Executes a checked program against its scope arena. Supports:
//! - Expression evaluation (literals, operators, indexing, array modification, built-ins)
//! - Statement execution (assignment, guarded selection and iteration, `for`, I/O)
//! - Block scoping: a scope's values are discarded when its block or loop exits
//!
//! The first fault aborts the run.

mod expr;
mod input;
mod stmt;

use crate::ast::{Identifier, Program};
use crate::config::RuntimeConfig;
use crate::symbol::{Binding, ScopeId, SymbolTable};
use crate::value::RuntimeError;
use std::io::{BufRead, Write};

/// Interpreter state
pub struct Interpreter<'io> {
    /// Live bindings, one scope per block and `for` loop
    pub(super) scopes: SymbolTable,
    /// Scope of the statement being executed
    pub(super) scope: Option<ScopeId>,
    /// Source of `read` lines
    pub(super) input: &'io mut dyn BufRead,
    /// Sink for `print`, `println` and prompts
    pub(super) output: &'io mut dyn Write,
    pub(super) config: RuntimeConfig,
}

impl<'io> Interpreter<'io> {
    /// Create an interpreter over `scopes`, usually a copy of `Program::scopes`
    pub fn new(
        scopes: SymbolTable,
        input: &'io mut dyn BufRead,
        output: &'io mut dyn Write,
    ) -> Self {
        Self {
            scopes,
            scope: None,
            input,
            output,
            config: RuntimeConfig::default(),
        }
    }

    /// Replace the default configuration
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute a checked program to completion or first fault
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn eval(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let result = self.eval_block(&program.block);
        let flushed = self.output.flush();
        result?;
        flushed?;
        Ok(())
    }

    /// Binding for `ident`, resolved from the current scope outward
    pub(super) fn binding(&self, ident: &Identifier) -> Result<&Binding, RuntimeError> {
        let scope = self.scope.ok_or_else(|| undeclared(ident))?;
        self.scopes
            .lookup(scope, &ident.name)
            .map_err(|_| undeclared(ident))
    }

    /// Mutable binding for `ident`
    pub(super) fn binding_mut(&mut self, ident: &Identifier) -> Result<&mut Binding, RuntimeError> {
        let scope = self.scope.ok_or_else(|| undeclared(ident))?;
        self.scopes
            .lookup_mut(scope, &ident.name)
            .map_err(|_| undeclared(ident))
    }
}

fn undeclared(ident: &Identifier) -> RuntimeError {
    RuntimeError::UndeclaredVariable {
        name: ident.name.clone(),
        span: ident.span,
    }
}
