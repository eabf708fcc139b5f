//! Error code registry
//!
//! Error codes follow the GUxxxx scheme.
//! Ranges:
//! - GU0xxx: Runtime errors (bounds, division, input, ...)
//! - GU1xxx: Lexical and syntax errors
//! - GU3xxx: Semantic errors (scoping and type rules)

// GU0xxx - Runtime Errors
pub const UNINITIALIZED_VARIABLE: &str = "GU0001";
pub const INDEX_OUT_OF_BOUNDS: &str = "GU0002";
pub const DIVISION_BY_ZERO: &str = "GU0003";
pub const INPUT_FORMAT: &str = "GU0004";
pub const INTEGER_OVERFLOW: &str = "GU0005";
pub const IO_ERROR: &str = "GU0006";
pub const RUNTIME_TYPE_ERROR: &str = "GU0007";

// GU1xxx - Syntax Errors
pub const UNEXPECTED_CHARACTER: &str = "GU1001";
pub const SYNTAX_ERROR: &str = "GU1002";

// GU3xxx - Semantic Errors
pub const DUPLICATE_DECLARATION: &str = "GU3001";
pub const UNDECLARED_VARIABLE: &str = "GU3002";
pub const TYPE_MISMATCH: &str = "GU3003";
pub const CONTROL_VARIABLE_MUTATION: &str = "GU3004";

/// Error code descriptor with code and description
#[derive(Debug, Clone)]
pub struct ErrorCodeInfo {
    /// The error code string (e.g., "GU0001")
    pub code: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Get info for an error code, if known
pub fn lookup(code: &str) -> Option<ErrorCodeInfo> {
    ERROR_CODES.iter().find(|e| e.code == code).cloned()
}

/// Get description for an error code
pub fn description_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|e| e.description)
}

/// All known error codes with descriptions
pub static ERROR_CODES: &[ErrorCodeInfo] = &[
    ErrorCodeInfo {
        code: UNINITIALIZED_VARIABLE,
        description: "Variable read before any value was assigned",
    },
    ErrorCodeInfo {
        code: INDEX_OUT_OF_BOUNDS,
        description: "Array index outside the declared range",
    },
    ErrorCodeInfo {
        code: DIVISION_BY_ZERO,
        description: "Integer division or modulo by zero",
    },
    ErrorCodeInfo {
        code: INPUT_FORMAT,
        description: "Input line does not match the type of the `read` target",
    },
    ErrorCodeInfo {
        code: INTEGER_OVERFLOW,
        description: "Integer arithmetic overflowed 64 bits",
    },
    ErrorCodeInfo {
        code: IO_ERROR,
        description: "Failure reading input or writing output",
    },
    ErrorCodeInfo {
        code: RUNTIME_TYPE_ERROR,
        description: "Operand of unexpected type reached the evaluator",
    },
    ErrorCodeInfo {
        code: UNEXPECTED_CHARACTER,
        description: "Character that starts no token",
    },
    ErrorCodeInfo {
        code: SYNTAX_ERROR,
        description: "Token stream does not match the grammar",
    },
    ErrorCodeInfo {
        code: DUPLICATE_DECLARATION,
        description: "Name declared twice in the same block",
    },
    ErrorCodeInfo {
        code: UNDECLARED_VARIABLE,
        description: "Name not declared in any enclosing scope",
    },
    ErrorCodeInfo {
        code: TYPE_MISMATCH,
        description: "Operand, assignment, guard or array size violates the type rules",
    },
    ErrorCodeInfo {
        code: CONTROL_VARIABLE_MUTATION,
        description: "Assignment or `read` targeting a `for` control variable",
    },
];
