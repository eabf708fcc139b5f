//! Expression type checking

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::typechecker::{CheckResult, TypeChecker};
use crate::types::Type;

impl<'a> TypeChecker<'a> {
    /// Check an expression, annotate it and return its type
    pub(super) fn check_expr(&mut self, expr: &Expr) -> CheckResult<Type> {
        let ty = match &expr.kind {
            ExprKind::Literal(lit) => match lit {
                Literal::Int(_) => Type::Int,
                Literal::Bool(_) => Type::Bool,
                Literal::Text(_) => Type::Text,
            },
            ExprKind::Identifier(ident) => self.lookup(ident)?.ty,
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand, expr)?,
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right, expr)?,
            ExprKind::Index { array, index } => {
                let array_ty = self.lookup(array)?.ty;
                self.check_index(index)?;
                if !array_ty.is_array() {
                    return Err(not_an_array(&array.name, array.span));
                }
                Type::Int
            }
            ExprKind::Modif {
                array,
                index,
                value,
            } => {
                let array_ty = self.check_expr(array)?;
                self.check_index(index)?;
                if self.check_expr(value)? != Type::Int {
                    return Err(Diagnostic::type_mismatch(
                        "modification values must be int",
                        value.span,
                    ));
                }
                if !array_ty.is_array() {
                    return Err(match &array.kind {
                        ExprKind::Identifier(ident) => not_an_array(&ident.name, ident.span),
                        _ => Diagnostic::type_mismatch(
                            "modified expression must be array",
                            array.span,
                        ),
                    });
                }
                array_ty
            }
            ExprKind::Builtin { func, arg } => {
                let arg_ty = self.check_expr(arg)?;
                let Some(size) = arg_ty.array_size() else {
                    return Err(Diagnostic::type_mismatch(
                        format!("`{}` argument must be array", func.name()),
                        arg.span,
                    ));
                };
                if *func == Builtin::Atoi && size != 1 {
                    return Err(Diagnostic::type_mismatch(
                        "`atoi` argument size must be 1",
                        arg.span,
                    ));
                }
                Type::Int
            }
        };

        expr.annotate(ty);
        Ok(ty)
    }

    /// Check an array subscript
    fn check_index(&mut self, index: &Expr) -> CheckResult<()> {
        if self.check_expr(index)? != Type::Int {
            return Err(Diagnostic::type_mismatch(
                "array indices must be int",
                index.span,
            ));
        }
        Ok(())
    }

    /// Check a unary expression
    fn check_unary(&mut self, op: UnaryOp, operand: &Expr, expr: &Expr) -> CheckResult<Type> {
        let operand_ty = self.check_expr(operand)?;
        let (expected, name) = match op {
            UnaryOp::Negate => (Type::Int, "int"),
            UnaryOp::Not => (Type::Bool, "bool"),
        };
        if operand_ty != expected {
            return Err(Diagnostic::type_mismatch(
                format!("`{}` operands must be {}", op.as_str(), name),
                expr.span,
            ));
        }
        Ok(expected)
    }

    /// Check a binary expression
    fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        expr: &Expr,
    ) -> CheckResult<Type> {
        let left_ty = self.check_expr(left)?;
        let right_ty = self.check_expr(right)?;

        let operands_are = |ty: Type| left_ty == ty && right_ty == ty;
        let mismatch = |requirement: &str| {
            Err(Diagnostic::type_mismatch(
                format!("`{}` operands must be {}", op.as_str(), requirement),
                expr.span,
            ))
        };

        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if operands_are(Type::Int) {
                    Ok(Type::Int)
                } else {
                    mismatch("int")
                }
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                if operands_are(Type::Int) {
                    Ok(Type::Bool)
                } else {
                    mismatch("int")
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if operands_are(Type::Bool) {
                    Ok(Type::Bool)
                } else {
                    mismatch("bool")
                }
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                if left_ty == right_ty {
                    Ok(Type::Bool)
                } else {
                    mismatch("same type")
                }
            }
            BinaryOp::Concat => Ok(Type::Text),
        }
    }
}

fn not_an_array(name: &str, span: Span) -> Diagnostic {
    Diagnostic::type_mismatch(format!("`{}` is not an array", name), span)
}
