//! Abstract Syntax Tree (AST) definitions
//!
//! The tree is immutable once the parser hands it over. The only thing the
//! checker writes is the type annotation slot of each `Expr`, which the
//! evaluator may then read.

use crate::span::Span;
use crate::symbol::{ScopeId, SymbolTable};
use crate::types::Type;
use std::cell::Cell;

/// Parsed program: the root block plus the scope skeleton built while parsing
#[derive(Debug, Clone)]
pub struct Program {
    pub block: Block,
    /// Declared variables of every block and `for` loop, still uninitialized
    pub scopes: SymbolTable,
}

/// `|[ declare ... instructions ]|`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Scope holding this block's declarations
    pub scope: ScopeId,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Variable reference
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    Assign(Assign),
    If(GuardedStmt),
    Do(GuardedStmt),
    For(ForStmt),
    Print(PrintStmt),
    Read(ReadStmt),
}

impl Stmt {
    /// Location of the statement's first token
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(block) => block.span,
            Stmt::Assign(assign) => assign.span,
            Stmt::If(guarded) | Stmt::Do(guarded) => guarded.span,
            Stmt::For(for_stmt) => for_stmt.span,
            Stmt::Print(print) => print.span,
            Stmt::Read(read) => read.span,
        }
    }
}

/// `x := e` or `a := e1, e2, ..., en`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Identifier,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// A `condition --> instructions` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

/// `if g1 [] g2 ... fi` or `do g1 [] g2 ... od`
///
/// The first guard is the primary one; the rest follow in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedStmt {
    pub guards: Vec<Guard>,
    pub span: Span,
}

/// `for i in lower to upper --> body rof`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Control variable, declared in `scope`
    pub var: Identifier,
    pub lower: Expr,
    pub upper: Expr,
    pub body: Vec<Stmt>,
    /// Scope holding only the control variable
    pub scope: ScopeId,
    pub span: Span,
}

/// `print e` / `println e`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub expr: Expr,
    /// Whether a newline follows the value
    pub newline: bool,
    pub span: Span,
}

/// `read x`
#[derive(Debug, Clone, PartialEq)]
pub struct ReadStmt {
    pub target: Identifier,
    pub span: Span,
}

/// Expression node with its checker-assigned type
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    ty: Cell<Option<Type>>,
}

impl Expr {
    /// Create an unannotated expression
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: Cell::new(None),
        }
    }

    /// Type resolved by the checker; `None` before checking
    pub fn ty(&self) -> Option<Type> {
        self.ty.get()
    }

    /// Record the resolved type
    pub fn annotate(&self, ty: Type) {
        self.ty.set(Some(ty));
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(Identifier),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a[i]`
    Index {
        array: Identifier,
        index: Box<Expr>,
    },
    /// `a(i : v)`: copy of `a` with slot `i` set to `v`
    Modif {
        array: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    /// `atoi(a)`, `size(a)`, `min(a)`, `max(a)`
    Builtin {
        func: Builtin,
        arg: Box<Expr>,
    },
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Text(String),
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Negate,
    /// `!`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Concat,
}

impl BinaryOp {
    /// Source spelling, as quoted in type errors
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "/\\",
            BinaryOp::Or => "\\/",
            BinaryOp::Concat => "||",
        }
    }
}

/// Built-in array functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Atoi,
    Size,
    Min,
    Max,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Atoi => "atoi",
            Builtin::Size => "size",
            Builtin::Min => "min",
            Builtin::Max => "max",
        }
    }
}
