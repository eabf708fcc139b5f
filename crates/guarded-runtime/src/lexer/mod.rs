//! Lexical analysis (tokenization)
//!
//! The lexer converts GuardedUSB source code into a stream of tokens with
//! row/column information. Lexical errors do not stop the scan: every bad
//! character is reported, and the caller aborts once the batch is complete.

use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::span::Span;
use crate::token::{Token, TokenKind};

mod literals;

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    pub(super) chars: Vec<char>,
    /// Current position in chars
    pub(super) current: usize,
    /// Current line number (1-indexed)
    pub(super) line: u32,
    /// Current column number (1-indexed)
    pub(super) column: u32,
    /// Start line of current token
    pub(super) start_line: u32,
    /// Start column of current token
    pub(super) start_column: u32,
    /// Collected diagnostics
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source code, returning tokens and any diagnostics
    ///
    /// The token list always ends with an `Eof` token.
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let Some(token) = self.next_token() else {
                continue;
            };
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tracing::trace!(
            tokens = tokens.len(),
            errors = self.diagnostics.len(),
            "tokenized source"
        );
        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token; `None` when the scanned text was an error
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        self.start_line = self.line;
        self.start_column = self.column;

        if self.is_at_end() {
            return Some(self.make_token(TokenKind::Eof, ""));
        }

        let c = self.advance();
        let kind = match c {
            '|' => {
                if self.match_char('[') {
                    TokenKind::OpenBlock
                } else if self.match_char('|') {
                    TokenKind::Concat
                } else {
                    return self.error_unexpected(c);
                }
            }
            ']' => {
                if self.match_char('|') {
                    TokenKind::CloseBlock
                } else {
                    TokenKind::RightBracket
                }
            }
            '[' => {
                if self.match_char(']') {
                    TokenKind::Guard
                } else {
                    TokenKind::LeftBracket
                }
            }
            '.' => {
                if self.match_char('.') {
                    TokenKind::DotDot
                } else {
                    return self.error_unexpected(c);
                }
            }
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '%' => TokenKind::Percent,
            ':' => {
                if self.match_char('=') {
                    TokenKind::Assign
                } else {
                    TokenKind::Colon
                }
            }
            '-' => {
                if self.peek() == '-' && self.peek_next() == Some('>') {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '/' => {
                if self.match_char('\\') {
                    TokenKind::And
                } else {
                    TokenKind::Slash
                }
            }
            '\\' => {
                if self.match_char('/') {
                    TokenKind::Or
                } else {
                    return self.error_unexpected(c);
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    return self.error_unexpected(c);
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '"' => return self.string(),
            c if c.is_ascii_digit() => return Some(self.number()),
            c if c.is_ascii_alphabetic() => return Some(self.identifier()),
            _ => return self.error_unexpected(c),
        };

        let lexeme = kind.as_str();
        Some(self.make_token(kind, lexeme))
    }

    /// Skip whitespace and `//` comments
    fn skip_whitespace_and_comments(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\r' | '\t' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        let start = self.current - 1;
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            self.advance();
        }
        let text: String = self.chars[start..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, text)
    }

    // === Character helpers ===

    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    pub(super) fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    pub(super) fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    pub(super) fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, Span::new(self.start_line, self.start_column))
    }

    /// Record an unexpected-character error at the current token start
    pub(super) fn error_unexpected(&mut self, c: impl std::fmt::Display) -> Option<Token> {
        self.diagnostics.push(Diagnostic::unlocated(
            ErrorKind::Lexical,
            format!(
                "Unexpected {} in row {}, column {}",
                c, self.start_line, self.start_column
            ),
        ));
        None
    }
}
