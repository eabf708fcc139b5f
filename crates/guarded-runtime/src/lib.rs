//! GuardedUSB Runtime - Core language implementation
//!
//! This library provides the complete GuardedUSB interpreter:
//! - Lexical analysis and parsing (with scope construction)
//! - Type checking and annotation
//! - Tree-walking evaluation with guarded commands and range-indexed arrays

/// GuardedUSB runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod symbol;
pub mod token;
pub mod typechecker;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use config::{ConfigError, RuntimeConfig};
pub use diagnostic::{error_codes, Diagnostic, ErrorKind};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use parser::Parser;
pub use runtime::{exit_status, Guarded, RuntimeResult};
pub use span::Span;
pub use symbol::{Binding, ScopeId, SymbolError, SymbolTable};
pub use token::{Token, TokenKind};
pub use typechecker::TypeChecker;
pub use types::Type;
pub use value::{ArrayError, ArrayValue, RuntimeError, RuntimeValue};
