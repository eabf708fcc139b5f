//! Runtime value representation
//!
//! - Int, Bool: immediate values
//! - Text: produced by string literals and `||`, only ever printed
//! - Array: `ArrayValue`, an ordered run of `(index, value)` pairs over the
//!   declared range of its type. Arrays have value semantics: binding one to
//!   a variable stores a copy, and indexed updates work on a fresh clone.

use crate::span::Span;
use crate::types::Type;
use std::fmt;
use thiserror::Error;

/// Failure of an `ArrayValue` operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// Index outside the declared range
    #[error("index `{index}` out of bounds")]
    OutOfBounds { index: i64 },
    /// Element list does not cover the declared range
    #[error("expected {expected} elements, found {found}")]
    SizeMismatch { expected: i64, found: usize },
    /// Bounds that describe no valid range
    #[error("invalid array range `[{lower}..{upper}]`")]
    InvalidRange { lower: i64, upper: i64 },
}

/// Integer array indexed by a contiguous inclusive range.
///
/// The entries always cover exactly `lower..=upper` in ascending order; an
/// entry's index never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayValue {
    lower: i64,
    upper: i64,
    entries: Vec<(i64, i64)>,
}

impl ArrayValue {
    /// Pair the range `lower..=upper` with `values`, in order
    pub fn new(lower: i64, upper: i64, values: Vec<i64>) -> Result<Self, ArrayError> {
        let expected = upper
            .checked_sub(lower)
            .and_then(|d| d.checked_add(1))
            .filter(|&n| n >= 1)
            .ok_or(ArrayError::InvalidRange { lower, upper })?;
        if i64::try_from(values.len()).ok() != Some(expected) {
            return Err(ArrayError::SizeMismatch {
                expected,
                found: values.len(),
            });
        }
        let entries = (lower..=upper).zip(values).collect();
        Ok(Self {
            lower,
            upper,
            entries,
        })
    }

    /// The array type this value inhabits
    pub fn ty(&self) -> Type {
        Type::array(self.lower, self.upper)
    }

    /// Cardinality of the declared range
    pub fn size(&self) -> i64 {
        self.upper - self.lower + 1
    }

    /// Declared lower bound (not the smallest element)
    pub fn min(&self) -> i64 {
        self.lower
    }

    /// Declared upper bound (not the largest element)
    pub fn max(&self) -> i64 {
        self.upper
    }

    /// Value paired with the lowest index
    pub fn first(&self) -> Option<i64> {
        self.entries.first().map(|&(_, value)| value)
    }

    fn position(&self, index: i64) -> Result<usize, ArrayError> {
        if index < self.lower || index > self.upper {
            return Err(ArrayError::OutOfBounds { index });
        }
        usize::try_from(index - self.lower).map_err(|_| ArrayError::OutOfBounds { index })
    }

    /// Value stored at `index`
    pub fn get(&self, index: i64) -> Result<i64, ArrayError> {
        let pos = self.position(index)?;
        Ok(self.entries[pos].1)
    }

    /// Overwrite the value stored at `index`.
    ///
    /// Only ever call this on a value no other binding can observe, i.e. a
    /// fresh clone.
    pub fn set(&mut self, index: i64, value: i64) -> Result<(), ArrayError> {
        let pos = self.position(index)?;
        self.entries[pos].1 = value;
        Ok(())
    }

    /// Independent copy with `index` overwritten; `self` is left untouched
    pub fn with_update(&self, index: i64, value: i64) -> Result<Self, ArrayError> {
        let mut copy = self.clone();
        copy.set(index, value)?;
        Ok(copy)
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (index, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", index, value)?;
        }
        Ok(())
    }
}

/// Value produced by evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeValue {
    Int(i64),
    Bool(bool),
    Array(ArrayValue),
    Text(String),
}

impl RuntimeValue {
    /// Get the type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            RuntimeValue::Int(_) => "int".to_string(),
            RuntimeValue::Bool(_) => "bool".to_string(),
            RuntimeValue::Array(array) => array.ty().display_name(),
            RuntimeValue::Text(_) => "string".to_string(),
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Int(n) => write!(f, "{}", n),
            RuntimeValue::Bool(b) => write!(f, "{}", b),
            RuntimeValue::Array(array) => write!(f, "{}", array),
            RuntimeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RuntimeValue {
    fn from(n: i64) -> Self {
        RuntimeValue::Int(n)
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        RuntimeValue::Bool(b)
    }
}

impl From<ArrayValue> for RuntimeValue {
    fn from(array: ArrayValue) -> Self {
        RuntimeValue::Array(array)
    }
}

/// Runtime error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Name not found in any enclosing scope
    #[error("Variable `{name}` undeclared")]
    UndeclaredVariable { name: String, span: Span },
    /// Variable read before being assigned
    #[error("variable `{name}` not initialized")]
    UninitializedVariable { name: String, span: Span },
    /// Array index outside the declared range
    #[error("index `{index}` out of bounds")]
    OutOfBounds { index: i64, span: Span },
    /// Integer division or modulo by zero
    #[error("division by 0")]
    DivideByZero { span: Span },
    /// Integer arithmetic overflowed
    #[error("integer overflow")]
    Overflow { span: Span },
    /// Input line does not match the target's type
    #[error("bad input format")]
    InputFormat { span: Span },
    /// Failure on the input or output stream
    #[error("I/O error: {message}")]
    Io { message: String },
    /// Operand of unexpected type (the checker rules this out)
    #[error("Type error: {msg}")]
    TypeError { msg: String, span: Span },
}

impl RuntimeError {
    /// Source location of the fault, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::UndeclaredVariable { span, .. }
            | RuntimeError::UninitializedVariable { span, .. }
            | RuntimeError::OutOfBounds { span, .. }
            | RuntimeError::DivideByZero { span }
            | RuntimeError::Overflow { span }
            | RuntimeError::InputFormat { span }
            | RuntimeError::TypeError { span, .. } => Some(*span),
            RuntimeError::Io { .. } => None,
        }
    }

    /// Attach a location to an array model failure
    pub fn from_array(err: ArrayError, span: Span) -> Self {
        match err {
            ArrayError::OutOfBounds { index } => RuntimeError::OutOfBounds { index, span },
            ArrayError::SizeMismatch { .. } | ArrayError::InvalidRange { .. } => RuntimeError::TypeError {
                msg: err.to_string(),
                span,
            },
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(lower: i64, upper: i64, values: &[i64]) -> ArrayValue {
        ArrayValue::new(lower, upper, values.to_vec()).unwrap()
    }

    #[test]
    fn test_bounds_and_size_ignore_contents() {
        let arr = array(2, 5, &[40, -3, 7, 100]);
        assert_eq!(arr.size(), 4);
        assert_eq!(arr.min(), 2);
        assert_eq!(arr.max(), 5);
    }

    #[test]
    fn test_lookup_by_index_not_position() {
        let arr = array(10, 12, &[1, 2, 3]);
        assert_eq!(arr.get(10), Ok(1));
        assert_eq!(arr.get(12), Ok(3));
        assert_eq!(arr.get(0), Err(ArrayError::OutOfBounds { index: 0 }));
        assert_eq!(arr.get(13), Err(ArrayError::OutOfBounds { index: 13 }));
    }

    #[test]
    fn test_negative_range() {
        let arr = array(-2, 0, &[5, 6, 7]);
        assert_eq!(arr.get(-2), Ok(5));
        assert_eq!(arr.get(-1), Ok(6));
        assert_eq!(arr.first(), Some(5));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = ArrayValue::new(1, 3, vec![1, 2]).unwrap_err();
        assert_eq!(err, ArrayError::SizeMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = ArrayValue::new(3, 1, vec![]).unwrap_err();
        assert_eq!(err, ArrayError::InvalidRange { lower: 3, upper: 1 });
        assert!(ArrayValue::new(i64::MIN, i64::MAX, vec![]).is_err());
    }

    #[test]
    fn test_with_update_leaves_source_untouched() {
        let original = array(1, 3, &[1, 2, 3]);
        let updated = original.with_update(2, 20).unwrap();
        assert_eq!(original.get(2), Ok(2));
        assert_eq!(updated.get(2), Ok(20));
        assert!(original.with_update(4, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(array(1, 3, &[1, 2, 3]).to_string(), "1:1, 2:2, 3:3");
        assert_eq!(RuntimeValue::Int(-4).to_string(), "-4");
        assert_eq!(RuntimeValue::Bool(true).to_string(), "true");
        assert_eq!(RuntimeValue::Text("hi".into()).to_string(), "hi");
    }

    #[test]
    fn test_runtime_error_messages() {
        let span = Span::new(1, 1);
        assert_eq!(
            RuntimeError::OutOfBounds { index: 5, span }.to_string(),
            "index `5` out of bounds"
        );
        assert_eq!(RuntimeError::DivideByZero { span }.to_string(), "division by 0");
        assert_eq!(
            RuntimeError::UninitializedVariable {
                name: "x".into(),
                span
            }
            .to_string(),
            "variable `x` not initialized"
        );
    }
}
