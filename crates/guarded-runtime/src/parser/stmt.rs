//! Instruction parsing

use crate::ast::*;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::parser::{ParseResult, Parser};
use crate::symbol::Binding;
use crate::token::TokenKind;

impl Parser {
    /// Parse `instr { ; instr }`, tolerating one trailing `;`
    pub(super) fn parse_instructions(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![self.parse_instruction()?];
        while self.match_token(TokenKind::Semicolon) {
            if self.at_instructions_end() {
                break;
            }
            statements.push(self.parse_instruction()?);
        }
        Ok(statements)
    }

    /// Tokens that close an instruction list
    fn at_instructions_end(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::CloseBlock
                | TokenKind::Fi
                | TokenKind::Od
                | TokenKind::Rof
                | TokenKind::Guard
                | TokenKind::Eof
        )
    }

    /// Parse a single instruction
    fn parse_instruction(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::OpenBlock => Ok(Stmt::Block(self.parse_block(Vec::new())?)),
            TokenKind::Identifier => self.parse_assign(),
            TokenKind::Read => {
                let span = self.advance().span;
                let target = self.consume_identifier()?;
                Ok(Stmt::Read(ReadStmt { target, span }))
            }
            TokenKind::Print | TokenKind::Println => {
                let token = self.advance();
                let newline = token.kind == TokenKind::Println;
                let span = token.span;
                let expr = self.parse_expression()?;
                Ok(Stmt::Print(PrintStmt {
                    expr,
                    newline,
                    span,
                }))
            }
            TokenKind::If => {
                let span = self.advance().span;
                let guards = self.parse_guards()?;
                self.consume(TokenKind::Fi, "`fi` to close `if`")?;
                Ok(Stmt::If(GuardedStmt { guards, span }))
            }
            TokenKind::Do => {
                let span = self.advance().span;
                let guards = self.parse_guards()?;
                self.consume(TokenKind::Od, "`od` to close `do`")?;
                Ok(Stmt::Do(GuardedStmt { guards, span }))
            }
            TokenKind::For => self.parse_for(),
            _ => Err(self.error("an instruction")),
        }
    }

    /// Parse `x := e` or `a := e1, ..., en`
    fn parse_assign(&mut self) -> ParseResult<Stmt> {
        let target = self.consume_identifier()?;
        let span = target.span;
        self.consume(TokenKind::Assign, "`:=` after variable name")?;

        let mut values = vec![self.parse_expression()?];
        while self.match_token(TokenKind::Comma) {
            values.push(self.parse_expression()?);
        }

        Ok(Stmt::Assign(Assign {
            target,
            values,
            span,
        }))
    }

    /// Parse `cond --> instrs { [] cond --> instrs }`
    fn parse_guards(&mut self) -> ParseResult<Vec<Guard>> {
        let mut guards = vec![self.parse_guard()?];
        while self.match_token(TokenKind::Guard) {
            guards.push(self.parse_guard()?);
        }
        Ok(guards)
    }

    fn parse_guard(&mut self) -> ParseResult<Guard> {
        let condition = self.parse_expression()?;
        self.consume(TokenKind::Arrow, "`-->` after guard condition")?;
        let body = self.parse_instructions()?;
        Ok(Guard { condition, body })
    }

    /// Parse `for i in e1 to e2 --> instrs rof`
    ///
    /// The bounds belong to the enclosing scope; the body sees a fresh scope
    /// holding only the control variable.
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let span = self.advance().span;
        let var = self.consume_identifier()?;
        self.consume(TokenKind::In, "`in` after loop variable")?;
        let lower = self.parse_expression()?;
        self.consume(TokenKind::To, "`to` between loop bounds")?;
        let upper = self.parse_expression()?;
        if !self.match_token(TokenKind::Arrow) && !self.match_token(TokenKind::Do) {
            return Err(self.error("`-->` after loop bounds"));
        }

        let scope = self.scopes.push_scope(self.current_scope);
        self.scopes
            .declare(scope, Binding::control(var.name.clone(), var.span))
            .map_err(|err| {
                Diagnostic::new(ErrorKind::DuplicateDeclaration, err.to_string(), var.span)
            })?;

        let enclosing = self.current_scope.replace(scope);
        let body = self.parse_instructions()?;
        self.current_scope = enclosing;

        self.consume(TokenKind::Rof, "`rof` to close `for`")?;
        Ok(Stmt::For(ForStmt {
            var,
            lower,
            upper,
            body,
            scope,
            span,
        }))
    }
}
