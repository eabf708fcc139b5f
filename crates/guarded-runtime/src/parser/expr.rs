//! Expression parsing (Pratt parsing)

use crate::ast::*;
use crate::parser::{parse_integer, ParseResult, Parser, Precedence};
use crate::token::{Token, TokenKind};

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse expression with given precedence
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while precedence < self.current_precedence() {
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    /// Parse prefix expression
    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::Number => self.parse_number(),
            TokenKind::String => {
                let token = self.advance();
                let span = token.span;
                let text = token.lexeme.clone();
                Ok(Expr::new(ExprKind::Literal(Literal::Text(text)), span))
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                let value = token.kind == TokenKind::True;
                let span = token.span;
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(value)), span))
            }
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::Minus | TokenKind::Bang => self.parse_unary(),
            TokenKind::Atoi | TokenKind::Size | TokenKind::Min | TokenKind::Max => {
                self.parse_builtin()
            }
            _ => Err(self.error("an expression")),
        }
    }

    /// Parse infix expression
    fn parse_infix(&mut self, left: Expr) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::LeftParen => self.parse_modif(left),
            _ => self.parse_binary(left),
        }
    }

    /// Get current token precedence
    pub(super) fn current_precedence(&self) -> Precedence {
        token_precedence(self.peek())
    }

    /// Parse integer literal
    fn parse_number(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span;
        let value = parse_integer(&token.lexeme.clone(), span)?;
        Ok(Expr::new(ExprKind::Literal(Literal::Int(value)), span))
    }

    /// Parse a variable reference or `a[i]`
    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let ident = Identifier {
            name: token.lexeme.clone(),
            span: token.span,
        };

        if self.match_token(TokenKind::LeftBracket) {
            let index = self.parse_expression()?;
            self.consume(TokenKind::RightBracket, "`]` after array index")?;
            let span = ident.span;
            return Ok(Expr::new(
                ExprKind::Index {
                    array: ident,
                    index: Box::new(index),
                },
                span,
            ));
        }

        let span = ident.span;
        Ok(Expr::new(ExprKind::Identifier(ident), span))
    }

    /// Parse `( expr )`
    fn parse_group(&mut self) -> ParseResult<Expr> {
        self.consume(TokenKind::LeftParen, "`(`")?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "`)`")?;
        Ok(expr)
    }

    /// Parse `-e` or `!e`
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span;
        let op = match token.kind {
            TokenKind::Minus => UnaryOp::Negate,
            _ => UnaryOp::Not,
        };
        let operand = self.parse_precedence(Precedence::Unary)?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Parse `atoi(e)`, `size(e)`, `min(e)` or `max(e)`
    fn parse_builtin(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span;
        let func = match token.kind {
            TokenKind::Atoi => Builtin::Atoi,
            TokenKind::Size => Builtin::Size,
            TokenKind::Min => Builtin::Min,
            _ => Builtin::Max,
        };
        let expected = format!("`(` after `{}`", func.name());
        self.consume(TokenKind::LeftParen, &expected)?;
        let arg = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "`)`")?;
        Ok(Expr::new(
            ExprKind::Builtin {
                func,
                arg: Box::new(arg),
            },
            span,
        ))
    }

    /// Parse `left(index : value)`
    fn parse_modif(&mut self, left: Expr) -> ParseResult<Expr> {
        let span = self.advance().span;
        let index = self.parse_expression()?;
        self.consume(TokenKind::Colon, "`:` in array modification")?;
        let value = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "`)` after array modification")?;
        Ok(Expr::new(
            ExprKind::Modif {
                array: Box::new(left),
                index: Box::new(index),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// Parse a left-associative binary operator
    fn parse_binary(&mut self, left: Expr) -> ParseResult<Expr> {
        let token = self.advance();
        let span = token.span;
        let kind = token.kind;
        let precedence = token_precedence(token);
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEqual => BinaryOp::Le,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEqual => BinaryOp::Ge,
            TokenKind::EqualEqual => BinaryOp::Eq,
            TokenKind::BangEqual => BinaryOp::Ne,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::Concat => BinaryOp::Concat,
            _ => return Err(self.error("an operator")),
        };

        let right = self.parse_precedence(precedence)?;
        Ok(Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }
}

/// Get precedence for a token
fn token_precedence(token: &Token) -> Precedence {
    match token.kind {
        TokenKind::Concat => Precedence::Concat,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
            Precedence::Comparison
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Term,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Factor,
        TokenKind::LeftParen => Precedence::Postfix,
        _ => Precedence::Lowest,
    }
}
