//! Token types for lexical analysis
//!
//! Defines all token types recognized by the GuardedUSB lexer.

use crate::span::Span;
use std::fmt;

/// Token type produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token (unescaped contents for strings)
    pub lexeme: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Integer literal (42)
    Number,
    /// String literal ("hello")
    String,
    /// Identifier
    Identifier,

    // Keywords
    Declare,
    Read,
    Print,
    Println,
    If,
    Fi,
    For,
    Rof,
    In,
    To,
    Do,
    Od,
    Array,
    True,
    False,
    Bool,
    Int,
    Atoi,
    Size,
    Max,
    Min,

    // Separators
    /// `|[`
    OpenBlock,
    /// `]|`
    CloseBlock,
    /// `..`
    DotDot,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `:=`
    Assign,
    /// `;`
    Semicolon,
    /// `-->`
    Arrow,
    /// `[]`
    Guard,
    /// `:`
    Colon,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `/\`
    And,
    /// `\/`
    Or,
    /// `!`
    Bang,
    /// `!=`
    BangEqual,
    /// `==`
    EqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// `||`
    Concat,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Resolve a word to its keyword kind, if it is reserved
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "declare" => TokenKind::Declare,
            "read" => TokenKind::Read,
            "print" => TokenKind::Print,
            "println" => TokenKind::Println,
            "if" => TokenKind::If,
            "fi" => TokenKind::Fi,
            "for" => TokenKind::For,
            "rof" => TokenKind::Rof,
            "in" => TokenKind::In,
            "to" => TokenKind::To,
            "do" => TokenKind::Do,
            "od" => TokenKind::Od,
            "array" => TokenKind::Array,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "bool" => TokenKind::Bool,
            "int" => TokenKind::Int,
            "atoi" => TokenKind::Atoi,
            "size" => TokenKind::Size,
            "max" => TokenKind::Max,
            "min" => TokenKind::Min,
            _ => return None,
        };
        Some(kind)
    }

    /// Source spelling used in syntax error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Declare => "declare",
            TokenKind::Read => "read",
            TokenKind::Print => "print",
            TokenKind::Println => "println",
            TokenKind::If => "if",
            TokenKind::Fi => "fi",
            TokenKind::For => "for",
            TokenKind::Rof => "rof",
            TokenKind::In => "in",
            TokenKind::To => "to",
            TokenKind::Do => "do",
            TokenKind::Od => "od",
            TokenKind::Array => "array",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Bool => "bool",
            TokenKind::Int => "int",
            TokenKind::Atoi => "atoi",
            TokenKind::Size => "size",
            TokenKind::Max => "max",
            TokenKind::Min => "min",
            TokenKind::OpenBlock => "|[",
            TokenKind::CloseBlock => "]|",
            TokenKind::DotDot => "..",
            TokenKind::Comma => ",",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Assign => ":=",
            TokenKind::Semicolon => ";",
            TokenKind::Arrow => "-->",
            TokenKind::Guard => "[]",
            TokenKind::Colon => ":",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::And => "/\\",
            TokenKind::Or => "\\/",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::EqualEqual => "==",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Concat => "||",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
