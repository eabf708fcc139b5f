//! Type system representation

use std::fmt;

/// Type representation
///
/// Variables are declared `int`, `bool` or `array[lower..upper]`. `Text` is
/// the type of string literals and concatenations; it only ever appears in
/// output position since no variable can be declared with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// Integer array indexed by the inclusive range `lower..=upper`
    Array { lower: i64, upper: i64 },
    /// String literal or concatenation result
    Text,
}

impl Type {
    /// Array type over `lower..=upper`
    pub fn array(lower: i64, upper: i64) -> Self {
        Type::Array { lower, upper }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    /// Number of elements of an array type
    pub fn array_size(&self) -> Option<i64> {
        match self {
            Type::Array { lower, upper } => upper.checked_sub(*lower)?.checked_add(1),
            _ => None,
        }
    }

    /// Get a human-readable name for this type
    pub fn display_name(&self) -> String {
        match self {
            Type::Int => "int".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Array { lower, upper } => format!("array[{}..{}]", lower, upper),
            Type::Text => "string".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
