//! Literal parsing for the lexer

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// Scan a string literal; the opening quote is already consumed
    ///
    /// Strings end on the same line they start. A missing closing quote is
    /// reported as `Unexpected EOL`.
    pub(super) fn string(&mut self) -> Option<Token> {
        let mut value = String::new();
        let mut bad_escape = None;

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return self.error_unexpected("EOL");
            }

            match self.advance() {
                '"' => break,
                '\\' => {
                    if self.is_at_end() || self.peek() == '\n' {
                        return self.error_unexpected("EOL");
                    }
                    let escape_char = self.advance();
                    match escape_char {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            // Keep scanning to the closing quote so the rest of
                            // the line is not lexed as code.
                            bad_escape.get_or_insert(other);
                        }
                    }
                }
                c => value.push(c),
            }
        }

        if let Some(c) = bad_escape {
            return self.error_unexpected(format!("\\{}", c));
        }
        Some(self.make_token(TokenKind::String, value))
    }

    /// Scan an integer literal; the first digit is already consumed
    pub(super) fn number(&mut self) -> Token {
        let start = self.current - 1;

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        let text: String = self.chars[start..self.current].iter().collect();
        self.make_token(TokenKind::Number, text)
    }
}
