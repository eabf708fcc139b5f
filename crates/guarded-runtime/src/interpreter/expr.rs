//! Expression evaluation

use crate::ast::*;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{ArrayValue, RuntimeError, RuntimeValue};
use std::borrow::Cow;

impl<'io> Interpreter<'io> {
    /// Evaluate an expression
    pub(super) fn eval_expr(&self, expr: &Expr) -> Result<RuntimeValue, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(match lit {
                Literal::Int(n) => RuntimeValue::Int(*n),
                Literal::Bool(b) => RuntimeValue::Bool(*b),
                Literal::Text(s) => RuntimeValue::Text(s.clone()),
            }),
            ExprKind::Identifier(ident) => self.eval_identifier(ident),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right, expr.span),
            ExprKind::Index { array, index } => {
                let index = self.eval_int(index)?;
                self.array_binding(array)?
                    .get(index)
                    .map(RuntimeValue::Int)
                    .map_err(|err| RuntimeError::from_array(err, array.span))
            }
            ExprKind::Modif {
                array,
                index,
                value,
            } => {
                let index = self.eval_int(index)?;
                let value = self.eval_int(value)?;
                self.eval_array(array)?
                    .with_update(index, value)
                    .map(RuntimeValue::Array)
                    .map_err(|err| RuntimeError::from_array(err, expr.span))
            }
            ExprKind::Builtin { func, arg } => {
                let array = self.eval_array(arg)?;
                let result = match func {
                    Builtin::Atoi => array.first().ok_or_else(|| RuntimeError::TypeError {
                        msg: "`atoi` of an empty array".to_string(),
                        span: arg.span,
                    })?,
                    Builtin::Size => array.size(),
                    Builtin::Min => array.min(),
                    Builtin::Max => array.max(),
                };
                Ok(RuntimeValue::Int(result))
            }
        }
    }

    /// Evaluate an expression the checker typed as int
    pub(super) fn eval_int(&self, expr: &Expr) -> Result<i64, RuntimeError> {
        match self.eval_expr(expr)? {
            RuntimeValue::Int(n) => Ok(n),
            other => Err(type_error("int", &other, expr.span)),
        }
    }

    /// Evaluate a guard
    pub(super) fn eval_condition(&self, expr: &Expr) -> Result<bool, RuntimeError> {
        match self.eval_expr(expr)? {
            RuntimeValue::Bool(b) => Ok(b),
            other => Err(type_error("bool", &other, expr.span)),
        }
    }

    /// Array operand of an index, modification or built-in
    ///
    /// A plain variable is borrowed from its binding; any other expression
    /// is evaluated to an owned value.
    fn eval_array(&self, expr: &Expr) -> Result<Cow<'_, ArrayValue>, RuntimeError> {
        match &expr.kind {
            ExprKind::Identifier(ident) => self.array_binding(ident).map(Cow::Borrowed),
            _ => expect_array(self.eval_expr(expr)?, expr.span).map(Cow::Owned),
        }
    }

    /// Borrow the array held by a variable
    fn array_binding(&self, ident: &Identifier) -> Result<&ArrayValue, RuntimeError> {
        let binding = self.binding(ident)?;
        match &binding.value {
            Some(RuntimeValue::Array(array)) => Ok(array),
            Some(other) => Err(type_error("array", other, ident.span)),
            None => Err(RuntimeError::UninitializedVariable {
                name: binding.name.clone(),
                span: ident.span,
            }),
        }
    }

    /// Current value of a variable; arrays come back as an independent copy
    fn eval_identifier(&self, ident: &Identifier) -> Result<RuntimeValue, RuntimeError> {
        let binding = self.binding(ident)?;
        binding
            .value
            .clone()
            .ok_or_else(|| RuntimeError::UninitializedVariable {
                name: binding.name.clone(),
                span: ident.span,
            })
    }

    /// Evaluate unary operation
    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expr,
        span: Span,
    ) -> Result<RuntimeValue, RuntimeError> {
        match (op, self.eval_expr(operand)?) {
            (UnaryOp::Negate, RuntimeValue::Int(n)) => n
                .checked_neg()
                .map(RuntimeValue::Int)
                .ok_or(RuntimeError::Overflow { span }),
            (UnaryOp::Not, RuntimeValue::Bool(b)) => Ok(RuntimeValue::Bool(!b)),
            (UnaryOp::Negate, other) => Err(type_error("int", &other, span)),
            (UnaryOp::Not, other) => Err(type_error("bool", &other, span)),
        }
    }

    /// Evaluate binary operation; both operands are always evaluated
    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<RuntimeValue, RuntimeError> {
        let left_val = self.eval_expr(left)?;
        let right_val = self.eval_expr(right)?;

        match op {
            BinaryOp::Concat => Ok(RuntimeValue::Text(format!("{}{}", left_val, right_val))),
            BinaryOp::Eq => Ok(RuntimeValue::Bool(left_val == right_val)),
            BinaryOp::Ne => Ok(RuntimeValue::Bool(left_val != right_val)),
            BinaryOp::And | BinaryOp::Or => match (left_val, right_val) {
                (RuntimeValue::Bool(a), RuntimeValue::Bool(b)) => Ok(RuntimeValue::Bool(
                    if op == BinaryOp::And { a & b } else { a | b },
                )),
                (RuntimeValue::Bool(_), other) | (other, _) => Err(type_error("bool", &other, span)),
            },
            _ => match (left_val, right_val) {
                (RuntimeValue::Int(a), RuntimeValue::Int(b)) => eval_int_op(op, a, b, span),
                (RuntimeValue::Int(_), other) | (other, _) => Err(type_error("int", &other, span)),
            },
        }
    }
}

/// Apply an arithmetic or comparison operator to two ints
fn eval_int_op(op: BinaryOp, a: i64, b: i64, span: Span) -> Result<RuntimeValue, RuntimeError> {
    let overflow = RuntimeError::Overflow { span };
    let value = match op {
        BinaryOp::Add => RuntimeValue::Int(a.checked_add(b).ok_or(overflow)?),
        BinaryOp::Sub => RuntimeValue::Int(a.checked_sub(b).ok_or(overflow)?),
        BinaryOp::Mul => RuntimeValue::Int(a.checked_mul(b).ok_or(overflow)?),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivideByZero { span });
            }
            RuntimeValue::Int(floor_div(a, b).ok_or(overflow)?)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivideByZero { span });
            }
            RuntimeValue::Int(floor_mod(a, b))
        }
        BinaryOp::Lt => RuntimeValue::Bool(a < b),
        BinaryOp::Le => RuntimeValue::Bool(a <= b),
        BinaryOp::Gt => RuntimeValue::Bool(a > b),
        BinaryOp::Ge => RuntimeValue::Bool(a >= b),
        other => {
            return Err(RuntimeError::TypeError {
                msg: format!("`{}` is not an int operator", other.as_str()),
                span,
            })
        }
    };
    Ok(value)
}

/// Quotient rounded toward negative infinity; `None` on overflow. `b != 0`.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Remainder with the sign of the divisor. `b != 0`.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

fn expect_array(value: RuntimeValue, span: Span) -> Result<ArrayValue, RuntimeError> {
    match value {
        RuntimeValue::Array(array) => Ok(array),
        other => Err(type_error("array", &other, span)),
    }
}

fn type_error(expected: &str, found: &RuntimeValue, span: Span) -> RuntimeError {
    RuntimeError::TypeError {
        msg: format!("expected {}, found {}", expected, found.type_name()),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::{floor_div, floor_mod};
    use crate::ast::{Expr, ExprKind, Identifier};
    use crate::interpreter::tests::run;
    use crate::interpreter::Interpreter;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::span::Span;
    use crate::value::{ArrayValue, RuntimeError, RuntimeValue};
    use rstest::rstest;
    use std::borrow::Cow;

    #[rstest]
    #[case(7, 2, 3, 1)]
    #[case(-7, 2, -4, 1)]
    #[case(7, -2, -4, -1)]
    #[case(-7, -2, 3, -1)]
    #[case(6, 3, 2, 0)]
    #[case(-6, 3, -2, 0)]
    fn test_floored_division(#[case] a: i64, #[case] b: i64, #[case] q: i64, #[case] r: i64) {
        assert_eq!(floor_div(a, b), Some(q));
        assert_eq!(floor_mod(a, b), r);
    }

    #[test]
    fn test_floored_division_extremes() {
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_mod(i64::MIN, -1), 0);
    }

    #[rstest]
    #[case("1 + 2 * 3", "7")]
    #[case("(1 + 2) * 3", "9")]
    #[case("-7 / 2", "-4")]
    #[case("-7 % 2", "1")]
    #[case("10 - 3 - 2", "5")]
    #[case("3 <= 3", "true")]
    #[case(r"true /\ !false", "true")]
    #[case(r"false \/ false", "false")]
    #[case("1 != 2", "true")]
    #[case(r#""n = " || 4 || "," || true"#, "n = 4,true")]
    fn test_scalar_expressions(#[case] expr: &str, #[case] expected: &str) {
        let source = format!("|[ print {} ]|", expr);
        assert_eq!(run(&source, ""), Ok(expected.to_string()));
    }

    #[test]
    fn test_division_by_zero_line() {
        let err = run("declare x:int |[ x := 1/0 ]|", "").unwrap_err();
        assert!(matches!(err, RuntimeError::DivideByZero { span } if span.line == 1));
    }

    #[test]
    fn test_modulo_by_zero() {
        let err = run("|[ declare z : int\n z := 0;\n print 5 % z ]|", "").unwrap_err();
        assert!(matches!(err, RuntimeError::DivideByZero { span } if span.line == 3));
    }

    #[test]
    fn test_no_short_circuit() {
        let err = run(r"|[ print false /\ 1 / 0 == 0 ]|", "").unwrap_err();
        assert!(matches!(err, RuntimeError::DivideByZero { .. }));
    }

    #[test]
    fn test_overflow_is_a_fault() {
        let err = run("|[ print 9223372036854775807 + 1 ]|", "").unwrap_err();
        assert_eq!(err.to_string(), "integer overflow");
    }

    #[test]
    fn test_index_bounds_are_declared_range() {
        let source = "|[ declare a : array[2..4] a := 20, 30, 40;
                         println a[2]; println a[4]; println a[5] ]|";
        let err = run(source, "").unwrap_err();
        assert_eq!(err.to_string(), "index `5` out of bounds");

        let err = run("|[ declare a : array[2..4] a := 1, 2, 3; print a[1] ]|", "").unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { index: 1, .. }));
    }

    #[test]
    fn test_index_uninitialized_array() {
        let err = run("|[ declare a : array[0..1] print a[0] ]|", "").unwrap_err();
        assert_eq!(err.to_string(), "variable `a` not initialized");
    }

    #[test]
    fn test_modif_leaves_source_untouched() {
        let output = run(
            "|[ declare a, b : array[1..3]
                a := 1, 2, 3; b := a(2:20)(3:30); println a; println b; println a(1:0) == a ]|",
            "",
        );
        assert_eq!(output, Ok("1:1, 2:2, 3:3\n1:1, 2:20, 3:30\nfalse\n".into()));
    }

    #[test]
    fn test_modif_out_of_bounds() {
        let err = run("|[ declare a : array[1..2] a := 1, 2;\n print a(3:0) ]|", "").unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { index: 3, span } if span.line == 2));
    }

    #[test]
    fn test_builtins_report_declared_bounds() {
        let output = run(
            "|[ declare a : array[-3..2]; u : array[9..9]
                a := 100, -50, 7, 8, 9, 1000; u := 42;
                print size(a); print \" \"; print min(a); print \" \"; print max(a);
                print \" \"; print atoi(u) ]|",
            "",
        );
        assert_eq!(output, Ok("6 -3 2 42".into()));
    }

    #[test]
    fn test_array_variable_is_borrowed_for_reads() {
        let (tokens, _) = Lexer::new("|[ declare a : array[1..3] print size(a) ]|").tokenize();
        let program = Parser::new(tokens).parse().unwrap();
        let mut scopes = program.scopes.clone();
        let stored = ArrayValue::new(1, 3, vec![7, 8, 9]).unwrap();
        scopes.lookup_mut(program.block.scope, "a").unwrap().value =
            Some(RuntimeValue::Array(stored.clone()));

        let mut reader = "".as_bytes();
        let mut output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(scopes, &mut reader, &mut output);
        interp.scope = Some(program.block.scope);

        let span = Span::new(1, 1);
        let ident = Identifier {
            name: "a".to_string(),
            span,
        };
        let expr = Expr::new(ExprKind::Identifier(ident), span);
        match interp.eval_array(&expr).unwrap() {
            Cow::Borrowed(array) => assert_eq!(array, &stored),
            Cow::Owned(_) => panic!("array variable was copied for a read"),
        }
    }
}
