//! Type checking
//!
//! The checker enforces GuardedUSB's static rules:
//! - Arithmetic and comparison operands are int, logical operands are bool
//! - Guards are bool
//! - Assignments match the declared type (arrays by shape or element count)
//! - `for` control variables are never assigned or read into
//!
//! Children are checked before their parent and the first violation aborts
//! the pass. Every expression is annotated with its type on the way.

mod expr;

use crate::ast::*;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::span::Span;
use crate::symbol::{Binding, ScopeId, SymbolError, SymbolTable};
use crate::types::Type;

/// Result of checking a node
pub(super) type CheckResult<T> = Result<T, Diagnostic>;

/// Type checker state
pub struct TypeChecker<'a> {
    /// Scope skeleton built by the parser
    pub(super) scopes: &'a SymbolTable,
    /// Scope of the node being checked
    pub(super) scope: Option<ScopeId>,
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker over the given scopes
    pub fn new(scopes: &'a SymbolTable) -> Self {
        Self {
            scopes,
            scope: None,
        }
    }

    /// Type check a program, stopping at the first error
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check(&mut self, program: &Program) -> Result<(), Diagnostic> {
        self.check_block(&program.block)?;
        tracing::debug!(scopes = self.scopes.len(), "program checked");
        Ok(())
    }

    fn check_block(&mut self, block: &Block) -> CheckResult<()> {
        self.with_scope(block.scope, |checker| {
            checker.check_statements(&block.statements)
        })
    }

    fn check_statements(&mut self, statements: &[Stmt]) -> CheckResult<()> {
        statements
            .iter()
            .try_for_each(|stmt| self.check_statement(stmt))
    }

    /// Check a statement
    fn check_statement(&mut self, stmt: &Stmt) -> CheckResult<()> {
        match stmt {
            Stmt::Block(block) => self.check_block(block),
            Stmt::Assign(assign) => self.check_assign(assign),
            Stmt::If(guarded) | Stmt::Do(guarded) => self.check_guards(&guarded.guards),
            Stmt::For(for_stmt) => self.check_for(for_stmt),
            Stmt::Print(print) => self.check_expr(&print.expr).map(|_| ()),
            Stmt::Read(read) => {
                let binding = self.lookup(&read.target)?;
                if binding.control {
                    return Err(Diagnostic::new(
                        ErrorKind::ControlVariableMutation,
                        format!("`read` changes control variable `{}`", binding.name),
                        read.target.span,
                    ));
                }
                Ok(())
            }
        }
    }

    /// Check an assignment against the target's declared type
    fn check_assign(&mut self, assign: &Assign) -> CheckResult<()> {
        let binding = self.lookup(&assign.target)?;
        let mut types = Vec::with_capacity(assign.values.len());
        for value in &assign.values {
            types.push(self.check_expr(value)?);
        }
        let span = assign.target.span;

        if binding.control {
            return Err(Diagnostic::new(
                ErrorKind::ControlVariableMutation,
                format!("`:=` changes control variable `{}`", binding.name),
                span,
            ));
        }

        match binding.ty {
            Type::Array { .. } => {
                if types.len() == 1 && types[0] == binding.ty {
                    return Ok(());
                }
                if binding.ty.array_size() != i64::try_from(types.len()).ok() {
                    return Err(Diagnostic::type_mismatch(
                        "number of elements must be equal to array size",
                        span,
                    ));
                }
                if types.iter().any(|ty| *ty != Type::Int) {
                    return Err(Diagnostic::type_mismatch(
                        format!("array `{}` elements must be int", binding.name),
                        span,
                    ));
                }
                Ok(())
            }
            declared => {
                let received = types.first().copied();
                if received != Some(declared) {
                    let received = received.map_or_else(|| "nothing".to_string(), |t| t.to_string());
                    return Err(Diagnostic::type_mismatch(
                        format!(
                            "{} variable `{}` receives {}",
                            declared, binding.name, received
                        ),
                        span,
                    ));
                }
                if types.len() != 1 {
                    return Err(Diagnostic::type_mismatch(
                        format!("too many elements for variable `{}`", binding.name),
                        span,
                    ));
                }
                Ok(())
            }
        }
    }

    /// Check every guard of an `if` or `do`
    fn check_guards(&mut self, guards: &[Guard]) -> CheckResult<()> {
        for guard in guards {
            let ty = self.check_expr(&guard.condition)?;
            if ty != Type::Bool {
                return Err(Diagnostic::type_mismatch(
                    "condition must be bool",
                    guard.condition.span,
                ));
            }
            self.check_statements(&guard.body)?;
        }
        Ok(())
    }

    /// Check a `for` loop; bounds live in the enclosing scope
    fn check_for(&mut self, for_stmt: &ForStmt) -> CheckResult<()> {
        for bound in [&for_stmt.lower, &for_stmt.upper] {
            if self.check_expr(bound)? != Type::Int {
                return Err(Diagnostic::type_mismatch(
                    "`for` bounds must be int",
                    bound.span,
                ));
            }
        }
        self.with_scope(for_stmt.scope, |checker| {
            checker.check_statements(&for_stmt.body)
        })
    }

    // === Scope helpers ===

    /// Run `f` with `scope` as the current scope
    fn with_scope<T>(
        &mut self,
        scope: ScopeId,
        f: impl FnOnce(&mut Self) -> CheckResult<T>,
    ) -> CheckResult<T> {
        let enclosing = self.scope.replace(scope);
        let result = f(self);
        self.scope = enclosing;
        result
    }

    /// Resolve `ident` from the current scope outward
    pub(super) fn lookup(&self, ident: &Identifier) -> CheckResult<&'a Binding> {
        let found = match self.scope {
            Some(scope) => self.scopes.lookup(scope, &ident.name),
            None => Err(SymbolError::Undeclared {
                name: ident.name.clone(),
            }),
        };
        found.map_err(|err| undeclared(err, ident.span))
    }
}

fn undeclared(err: SymbolError, span: Span) -> Diagnostic {
    Diagnostic::new(ErrorKind::UndeclaredVariable, err.to_string(), span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn check_source(source: &str) -> Result<Program, Diagnostic> {
        let (tokens, diags) = Lexer::new(source).tokenize();
        assert!(diags.is_empty(), "lex errors: {:?}", diags);
        let program = Parser::new(tokens).parse()?;
        TypeChecker::new(&program.scopes).check(&program)?;
        Ok(program)
    }

    fn check_error(source: &str) -> Diagnostic {
        check_source(source).expect_err("expected a checking error")
    }

    #[test]
    fn test_well_typed_program() {
        assert!(check_source(
            "|[ declare x : int; b : bool; a : array[1..3]
               x := 1; b := x < 2 /\\ true; a := 1, x, 3;
               if b --> println a[2] [] !b --> println size(a) fi
            ]|"
        )
        .is_ok());
    }

    #[test]
    fn test_scalar_assignment_type_mismatch() {
        let err = check_error("|[ declare x : int x := true ]|");
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, "int variable `x` receives bool");
    }

    #[test]
    fn test_scalar_assignment_too_many() {
        let err = check_error("|[ declare x : int x := 1, 2 ]|");
        assert_eq!(err.message, "too many elements for variable `x`");
    }

    #[test]
    fn test_array_assignment_by_shape() {
        assert!(check_source(
            "|[ declare a, b : array[0..1] a := 1, 2; b := a; b := a(0:5) ]|"
        )
        .is_ok());
    }

    #[test]
    fn test_array_assignment_wrong_count() {
        let err = check_error("|[ declare a : array[1..3] a := 1, 2 ]|");
        assert_eq!(err.message, "number of elements must be equal to array size");
    }

    #[test]
    fn test_array_assignment_wrong_shape() {
        let err = check_error("|[ declare a : array[1..3]; b : array[0..2] b := 0, 0, 0; a := b ]|");
        assert_eq!(err.message, "number of elements must be equal to array size");
    }

    #[test]
    fn test_array_elements_must_be_int() {
        let err = check_error("|[ declare a : array[1..2] a := 1, false ]|");
        assert_eq!(err.message, "array `a` elements must be int");
    }

    #[test]
    fn test_control_variable_assignment() {
        let err = check_error("|[ for i in 1 to 3 --> i := 2 rof ]|");
        assert_eq!(err.kind, ErrorKind::ControlVariableMutation);
        assert_eq!(err.message, "`:=` changes control variable `i`");
    }

    #[test]
    fn test_control_variable_read() {
        let err = check_error("|[ for i in 1 to 3 --> read i rof ]|");
        assert_eq!(err.message, "`read` changes control variable `i`");
    }

    #[test]
    fn test_shadowing_control_variable_is_assignable() {
        assert!(check_source(
            "|[ for i in 1 to 2 --> |[ declare i : int i := 7; println i ]| rof ]|"
        )
        .is_ok());
    }

    #[test]
    fn test_guard_must_be_bool() {
        let err = check_error("|[ declare x : int x := 1; if x --> print x fi ]|");
        assert_eq!(err.message, "condition must be bool");
    }

    #[test]
    fn test_second_guard_checked() {
        let err = check_error("|[ do true --> print 1 [] 3 --> print 2 od ]|");
        assert_eq!(err.message, "condition must be bool");
    }

    #[test]
    fn test_for_bounds_must_be_int() {
        let err = check_error("|[ for i in true to 3 --> print i rof ]|");
        assert_eq!(err.message, "`for` bounds must be int");
    }

    #[test]
    fn test_undeclared_variable() {
        let err = check_error("|[ declare x : int\n y := 1 ]|");
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
        assert_eq!(err.to_string(), "Error: line 2 Variable `y` undeclared");
    }

    #[test]
    fn test_block_scope_ends_at_close() {
        let err = check_error("|[ |[ declare t : int t := 1 ]|; print t ]|");
        assert_eq!(err.message, "Variable `t` undeclared");
    }

    #[test]
    fn test_expressions_are_annotated() {
        let program = check_source("|[ declare a : array[2..3] a := 4, 5; print a(2:1) ]|")
            .unwrap();
        match &program.block.statements[1] {
            Stmt::Print(print) => assert_eq!(print.expr.ty(), Some(Type::array(2, 3))),
            other => panic!("Expected print, got {:?}", other),
        }
    }
}
