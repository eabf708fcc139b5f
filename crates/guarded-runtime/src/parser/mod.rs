//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an Abstract Syntax Tree (AST)
//! and, along the way, builds the scope skeleton: one scope per block with
//! its declarations, one per `for` loop with its control variable.
//! Uses Pratt parsing for expressions and recursive descent for instructions.
//! Parsing stops at the first error.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::{Diagnostic, ErrorKind};
use crate::span::Span;
use crate::symbol::{Binding, ScopeId, SymbolTable};
use crate::token::{Token, TokenKind};
use crate::types::Type;

/// Result of a parsing step
pub(super) type ParseResult<T> = Result<T, Diagnostic>;

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    /// Scopes created so far
    pub(super) scopes: SymbolTable,
    /// Innermost scope enclosing the tokens being parsed
    pub(super) current_scope: Option<ScopeId>,
}

/// Operator precedence levels for Pratt parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Concat,     // ||
    Or,         // \/
    And,        // /\
    Equality,   // == !=
    Comparison, // < <= > >=
    Term,       // + -
    Factor,     // * / %
    Unary,      // ! -
    Postfix,    // a(i:v)
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_else(Span::dummy);
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }
        Self {
            tokens,
            current: 0,
            scopes: SymbolTable::new(),
            current_scope: None,
        }
    }

    /// Parse tokens into a program
    ///
    /// Grammar: `[ "declare" decls ] "|[" [ "declare" decls ] instrs "]|"`.
    /// Declarations written before the outer block belong to its scope.
    pub fn parse(&mut self) -> Result<Program, Diagnostic> {
        let outer = if self.match_token(TokenKind::Declare) {
            self.parse_declarations()?
        } else {
            Vec::new()
        };

        let block = self.parse_block(outer)?;
        if !self.check(TokenKind::Eof) {
            return Err(self.error("end of input after the program block"));
        }

        Ok(Program {
            block,
            scopes: std::mem::take(&mut self.scopes),
        })
    }

    // === Blocks and declarations ===

    /// Parse `|[ [declare ...] instructions ]|`, declaring `inherited` first
    pub(super) fn parse_block(&mut self, inherited: Vec<Binding>) -> ParseResult<Block> {
        let span = self.consume(TokenKind::OpenBlock, "`|[`")?.span;
        let scope = self.scopes.push_scope(self.current_scope);

        let mut declarations = inherited;
        if self.match_token(TokenKind::Declare) {
            declarations.extend(self.parse_declarations()?);
        }
        self.scopes
            .declare_all(scope, declarations)
            .map_err(|(err, at)| {
                Diagnostic::new(ErrorKind::DuplicateDeclaration, err.to_string(), at)
            })?;

        let enclosing = self.current_scope.replace(scope);
        let statements = if self.check(TokenKind::CloseBlock) {
            Vec::new()
        } else {
            self.parse_instructions()?
        };
        self.current_scope = enclosing;

        self.consume(TokenKind::CloseBlock, "`]|`")?;
        Ok(Block {
            scope,
            statements,
            span,
        })
    }

    /// Parse `decl { ; decl }`, consuming a `;` that ends the section
    fn parse_declarations(&mut self) -> ParseResult<Vec<Binding>> {
        let mut bindings = self.parse_declaration()?;
        while self.check(TokenKind::Semicolon) {
            self.advance();
            if !self.at_declaration_start() {
                break;
            }
            bindings.extend(self.parse_declaration()?);
        }
        Ok(bindings)
    }

    /// Whether the upcoming tokens are `ident ,` or `ident :`
    fn at_declaration_start(&self) -> bool {
        self.check(TokenKind::Identifier)
            && matches!(
                self.peek_ahead(1).kind,
                TokenKind::Comma | TokenKind::Colon
            )
    }

    /// Parse `a, b, c : t1, t2`; names take the types in order, cycling
    fn parse_declaration(&mut self) -> ParseResult<Vec<Binding>> {
        let mut names = vec![self.consume_identifier()?];
        while self.match_token(TokenKind::Comma) {
            names.push(self.consume_identifier()?);
        }

        self.consume(TokenKind::Colon, "`:` after variable names")?;

        let mut types = vec![self.parse_type()?];
        while self.match_token(TokenKind::Comma) {
            types.push(self.parse_type()?);
        }

        Ok(names
            .into_iter()
            .zip(types.iter().cycle())
            .map(|(name, ty)| Binding::new(name.name, *ty, name.span))
            .collect())
    }

    /// Parse `int`, `bool` or `array[lower..upper]`
    fn parse_type(&mut self) -> ParseResult<Type> {
        match self.peek().kind {
            TokenKind::Int => {
                self.advance();
                Ok(Type::Int)
            }
            TokenKind::Bool => {
                self.advance();
                Ok(Type::Bool)
            }
            TokenKind::Array => {
                let span = self.advance().span;
                self.consume(TokenKind::LeftBracket, "`[` after `array`")?;
                let lower = self.parse_bound()?;
                self.consume(TokenKind::DotDot, "`..` between array bounds")?;
                let upper = self.parse_bound()?;
                self.consume(TokenKind::RightBracket, "`]` after array bounds")?;

                let size = upper.checked_sub(lower).and_then(|d| d.checked_add(1));
                match size {
                    Some(n) if n >= 1 => Ok(Type::array(lower, upper)),
                    _ => Err(Diagnostic::syntax(
                        format!("invalid array range `[{}..{}]`", lower, upper),
                        span,
                    )),
                }
            }
            _ => Err(self.error("a type (`int`, `bool` or `array`)")),
        }
    }

    /// Parse an optionally negated integer literal
    fn parse_bound(&mut self) -> ParseResult<i64> {
        let negative = self.match_token(TokenKind::Minus);
        let token = self.consume(TokenKind::Number, "an integer bound")?.clone();
        let text = if negative {
            format!("-{}", token.lexeme)
        } else {
            token.lexeme.clone()
        };
        parse_integer(&text, token.span)
    }

    // === Token helpers ===

    /// Advance to next token
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Peek `offset` tokens past the current one (clamped to `Eof`)
    pub(super) fn peek_ahead(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail naming what was `expected`
    pub(super) fn consume(&mut self, kind: TokenKind, expected: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    /// Consume an identifier token
    pub(super) fn consume_identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.consume(TokenKind::Identifier, "a variable name")?;
        Ok(Identifier {
            name: token.lexeme.clone(),
            span: token.span,
        })
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Syntax error at the current token
    pub(super) fn error(&self, expected: &str) -> Diagnostic {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::String => format!("\"{}\"", token.lexeme),
            _ => format!("`{}`", token.lexeme),
        };
        Diagnostic::syntax(
            format!("unexpected {}, expected {}", found, expected),
            token.span,
        )
    }
}

/// Convert an integer literal, rejecting values outside 64 bits
pub(super) fn parse_integer(text: &str, span: Span) -> ParseResult<i64> {
    text.parse::<i64>().map_err(|_| {
        Diagnostic::syntax(format!("integer literal `{}` out of range", text), span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(source: &str) -> Result<Program, Diagnostic> {
        let (tokens, diags) = Lexer::new(source).tokenize();
        assert!(diags.is_empty(), "lex errors: {:?}", diags);
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_parse_empty_block() {
        let program = parse_source("|[ ]|").unwrap();
        assert!(program.block.statements.is_empty());
        assert_eq!(program.scopes.len(), 1);
    }

    #[test]
    fn test_declarations_inside_block() {
        let program =
            parse_source("|[ declare a, b : int; c : array[2..4], bool\n a := 1 ]|").unwrap();
        let scope = program.scopes.scope(program.block.scope);
        let decls: Vec<_> = scope.bindings().map(|b| (b.name.as_str(), b.ty)).collect();
        assert_eq!(
            decls,
            vec![("a", Type::Int), ("b", Type::Int), ("c", Type::array(2, 4))]
        );
    }

    #[test]
    fn test_types_cycle_over_names() {
        let program = parse_source("|[ declare p, q, r : int, bool p := 1 ]|").unwrap();
        let scope = program.scopes.scope(program.block.scope);
        let types: Vec<_> = scope.bindings().map(|b| b.ty).collect();
        assert_eq!(types, vec![Type::Int, Type::Bool, Type::Int]);
    }

    #[test]
    fn test_declare_before_block() {
        let program = parse_source("declare x:int |[ x := 5; println x ]|").unwrap();
        let binding = program.scopes.lookup(program.block.scope, "x").unwrap();
        assert_eq!(binding.ty, Type::Int);
        assert_eq!(program.block.statements.len(), 2);
    }

    #[test]
    fn test_semicolon_ends_declaration_section() {
        let program = parse_source("|[ declare x : int; x := 1; print x ]|").unwrap();
        assert_eq!(program.block.statements.len(), 2);
    }

    #[test]
    fn test_duplicate_declaration_cites_later_line() {
        let err = parse_source("|[ declare x : int;\n y : bool;\n x : bool\n y := true ]|")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateDeclaration);
        assert_eq!(err.to_string(), "Error: line 3 Variable `x` already declared");
    }

    #[test]
    fn test_negative_array_bounds() {
        let program = parse_source("|[ declare a : array[-2..-1] a := 1, 2 ]|").unwrap();
        let binding = program.scopes.lookup(program.block.scope, "a").unwrap();
        assert_eq!(binding.ty, Type::array(-2, -1));
    }

    #[test]
    fn test_reversed_array_range_rejected() {
        let err = parse_source("|[ declare a : array[3..1] print 1 ]|").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("invalid array range"));
    }

    #[test]
    fn test_nested_block_scopes_chain() {
        let program = parse_source("|[ declare x : int |[ declare y : int y := 1 ]| ]|").unwrap();
        let inner = match &program.block.statements[0] {
            Stmt::Block(block) => block.scope,
            other => panic!("Expected block, got {:?}", other),
        };
        assert_eq!(program.scopes.scope(inner).parent(), Some(program.block.scope));
        assert!(program.scopes.lookup(inner, "x").is_ok());
        assert!(program.scopes.lookup(program.block.scope, "y").is_err());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_source("|[ print 1 ]| print 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_missing_block_close() {
        let err = parse_source("|[ print 1").unwrap_err();
        assert_eq!(
            err.message,
            "unexpected end of input, expected `]|`"
        );
    }
}
