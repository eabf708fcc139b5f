//! GuardedUSB runtime API for embedding

use crate::ast::Program;
use crate::config::RuntimeConfig;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::typechecker::TypeChecker;
use crate::value::RuntimeError;
use std::io::{BufRead, Write};
use std::path::Path;

/// Result type for runtime operations
///
/// The error side holds one diagnostic, or every lexical error of the source.
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// GuardedUSB runtime instance
///
/// Runs the full pipeline: lexing, parsing, checking and evaluation. Each
/// phase must succeed before the next one starts.
///
/// # Examples
///
/// ```
/// use guarded_runtime::Guarded;
///
/// let runtime = Guarded::new();
/// let mut output: Vec<u8> = Vec::new();
/// runtime
///     .run("|[ println 6 * 7 ]|", &mut "".as_bytes(), &mut output)
///     .unwrap();
/// assert_eq!(output, b"42\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Guarded {
    config: RuntimeConfig,
}

impl Guarded {
    /// Create a runtime with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime with the given configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Lex, parse and check `source` without running it
    ///
    /// On success every expression of the returned program carries its type.
    pub fn check(&self, source: &str) -> RuntimeResult<Program> {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();
        if !lex_errors.is_empty() {
            return Err(lex_errors);
        }

        let program = Parser::new(tokens).parse().map_err(|diag| vec![diag])?;
        TypeChecker::new(&program.scopes)
            .check(&program)
            .map_err(|diag| vec![diag])?;
        Ok(program)
    }

    /// Check and run `source`, reading from `input` and writing to `output`
    pub fn run<R: BufRead, W: Write>(
        &self,
        source: &str,
        input: &mut R,
        output: &mut W,
    ) -> RuntimeResult<()> {
        let program = self.check(source)?;
        Interpreter::new(program.scopes.clone(), input, output)
            .with_config(self.config)
            .eval(&program)
            .map_err(|err| vec![runtime_error_to_diagnostic(err)])
    }

    /// Read a source file, then check and run it
    pub fn run_file<R: BufRead, W: Write>(
        &self,
        path: &Path,
        input: &mut R,
        output: &mut W,
    ) -> RuntimeResult<()> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::unlocated(
                ErrorKind::Io,
                format!("Failed to read file {}: {}", path.display(), e),
            )]
        })?;
        self.run(&source, input, output)
    }

    /// Run `source` against the process's standard input and output
    pub fn run_stdio(&self, source: &str) -> RuntimeResult<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run(source, &mut stdin.lock(), &mut stdout.lock())
    }
}

/// Process exit status for a finished run: 0 on success, 1 on any error
pub fn exit_status<T>(result: &RuntimeResult<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Convert a runtime error to a diagnostic
pub fn runtime_error_to_diagnostic(error: RuntimeError) -> Diagnostic {
    let kind = match &error {
        RuntimeError::UndeclaredVariable { .. } => ErrorKind::UndeclaredVariable,
        RuntimeError::UninitializedVariable { .. } => ErrorKind::UninitializedVariable,
        RuntimeError::OutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
        RuntimeError::DivideByZero { .. } => ErrorKind::DivisionByZero,
        RuntimeError::Overflow { .. } => ErrorKind::IntegerOverflow,
        RuntimeError::InputFormat { .. } => ErrorKind::InputFormat,
        RuntimeError::Io { .. } => ErrorKind::Io,
        RuntimeError::TypeError { .. } => ErrorKind::RuntimeType,
    };
    match error.span() {
        Some(span) => Diagnostic::new(kind, error.to_string(), span),
        None => Diagnostic::unlocated(kind, error.to_string()),
    }
}
