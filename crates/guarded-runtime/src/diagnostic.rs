//! Diagnostic system for fatal errors
//!
//! Every failure of the pipeline (lexing, parsing, checking, evaluation)
//! is reported through the unified `Diagnostic` type, so a host prints the
//! same `Error: ...` line regardless of which phase gave up.

pub mod error_codes;

use crate::span::Span;
use std::fmt;

/// Classification of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Character that starts no token
    Lexical,
    /// Token stream that does not match the grammar
    Syntax,
    DuplicateDeclaration,
    UndeclaredVariable,
    /// Operand, assignment, guard or array-size rule violated
    TypeMismatch,
    ControlVariableMutation,
    IndexOutOfBounds,
    UninitializedVariable,
    DivisionByZero,
    InputFormat,
    IntegerOverflow,
    Io,
    /// Ill-typed value reached the evaluator (only possible on unchecked trees)
    RuntimeType,
}

impl ErrorKind {
    /// Stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Lexical => error_codes::UNEXPECTED_CHARACTER,
            ErrorKind::Syntax => error_codes::SYNTAX_ERROR,
            ErrorKind::DuplicateDeclaration => error_codes::DUPLICATE_DECLARATION,
            ErrorKind::UndeclaredVariable => error_codes::UNDECLARED_VARIABLE,
            ErrorKind::TypeMismatch => error_codes::TYPE_MISMATCH,
            ErrorKind::ControlVariableMutation => error_codes::CONTROL_VARIABLE_MUTATION,
            ErrorKind::IndexOutOfBounds => error_codes::INDEX_OUT_OF_BOUNDS,
            ErrorKind::UninitializedVariable => error_codes::UNINITIALIZED_VARIABLE,
            ErrorKind::DivisionByZero => error_codes::DIVISION_BY_ZERO,
            ErrorKind::InputFormat => error_codes::INPUT_FORMAT,
            ErrorKind::IntegerOverflow => error_codes::INTEGER_OVERFLOW,
            ErrorKind::Io => error_codes::IO_ERROR,
            ErrorKind::RuntimeType => error_codes::RUNTIME_TYPE_ERROR,
        }
    }
}

/// A fatal error with its source line, when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: ErrorKind,
    /// Error code (e.g., "GU0003")
    pub code: &'static str,
    /// Message without the `Error: line N` prefix
    pub message: String,
    /// Line number (1-based), if the failure has a location
    pub line: Option<u32>,
    /// Column number (1-based), if the failure has a location
    pub column: Option<u32>,
}

impl Diagnostic {
    /// Create a diagnostic located at `span`
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
            line: span.line(),
            column: span.line().map(|_| span.column),
        }
    }

    /// Create a diagnostic with no source location
    pub fn unlocated(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Type rule violation
    pub fn type_mismatch(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::TypeMismatch, message, span)
    }

    /// Syntax error
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    /// Render as the single line a host prints before exiting
    pub fn to_human_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Error: line {} {}", line, self.message),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_located_format() {
        let diag = Diagnostic::new(ErrorKind::DivisionByZero, "division by 0", Span::new(1, 12));
        assert_eq!(diag.to_string(), "Error: line 1 division by 0");
        assert_eq!(diag.code, "GU0003");
        assert_eq!(diag.column, Some(12));
    }

    #[test]
    fn test_unlocated_format() {
        let diag = Diagnostic::unlocated(ErrorKind::Io, "I/O error: broken pipe");
        assert_eq!(diag.to_string(), "Error: I/O error: broken pipe");
        assert_eq!(diag.line, None);
    }

    #[test]
    fn test_dummy_span_is_unlocated() {
        let diag = Diagnostic::type_mismatch("condition must be bool", Span::dummy());
        assert_eq!(diag.to_human_string(), "Error: condition must be bool");
    }
}
