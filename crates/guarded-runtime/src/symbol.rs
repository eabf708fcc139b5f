//! Symbol table and name binding
//!
//! Scopes live in an arena owned by `SymbolTable` and are addressed by
//! `ScopeId`. Each declare-block and each `for` loop gets its own scope,
//! linked to the scope it is nested in. The same table backs the checker
//! (declared types) and the interpreter (current values).

use crate::span::Span;
use crate::types::Type;
use crate::value::RuntimeValue;
use std::collections::HashMap;
use thiserror::Error;

/// Handle to a scope in a `SymbolTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Variable name
    pub name: String,
    /// Declared type
    pub ty: Type,
    /// Current value; `None` until first assigned
    pub value: Option<RuntimeValue>,
    /// Whether this is a `for` control variable
    pub control: bool,
    /// Declaration location
    pub span: Span,
}

impl Binding {
    /// Uninitialized variable of the given type
    pub fn new(name: impl Into<String>, ty: Type, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
            control: false,
            span,
        }
    }

    /// Implicit integer control variable of a `for` loop
    pub fn control(name: impl Into<String>, span: Span) -> Self {
        Self {
            control: true,
            ..Self::new(name, Type::Int, span)
        }
    }
}

/// Failure of a scope operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// Name already declared in the same scope
    #[error("Variable `{name}` already declared")]
    Duplicate { name: String },
    /// Name absent from the scope and all its ancestors
    #[error("Variable `{name}` undeclared")]
    Undeclared { name: String },
}

/// One symbol table: name to binding, plus the enclosing scope
#[derive(Debug, Clone, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    bindings: HashMap<String, Binding>,
    /// Names in declaration order
    order: Vec<String>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Binding declared directly in this scope
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.order.iter().filter_map(|name| self.bindings.get(name))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Arena of scopes
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new scope nested in `parent` (`None` for the program root)
    pub fn push_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            ..Scope::default()
        });
        id
    }

    /// Access a scope by handle
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Number of scopes in the arena
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Insert `binding` into `scope`; names must be unique per scope
    pub fn declare(&mut self, scope: ScopeId, binding: Binding) -> Result<(), SymbolError> {
        let scope = &mut self.scopes[scope.0];
        if scope.bindings.contains_key(&binding.name) {
            return Err(SymbolError::Duplicate { name: binding.name });
        }
        scope.order.push(binding.name.clone());
        scope.bindings.insert(binding.name.clone(), binding);
        Ok(())
    }

    /// Declare every binding in order, stopping at the first duplicate
    pub fn declare_all(
        &mut self,
        scope: ScopeId,
        bindings: impl IntoIterator<Item = Binding>,
    ) -> Result<(), (SymbolError, Span)> {
        for binding in bindings {
            let span = binding.span;
            self.declare(scope, binding).map_err(|err| (err, span))?;
        }
        Ok(())
    }

    /// Scope that declares `name`, searching outward from `scope`
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<ScopeId, SymbolError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = &self.scopes[id.0];
            if table.bindings.contains_key(name) {
                return Ok(id);
            }
            current = table.parent;
        }
        Err(SymbolError::Undeclared {
            name: name.to_string(),
        })
    }

    /// First binding for `name` found walking from `scope` to the root
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<&Binding, SymbolError> {
        let owner = self.resolve(scope, name)?;
        self.scopes[owner.0]
            .bindings
            .get(name)
            .ok_or_else(|| SymbolError::Undeclared {
                name: name.to_string(),
            })
    }

    /// Mutable access to the binding `lookup` would return
    pub fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut Binding, SymbolError> {
        let owner = self.resolve(scope, name)?;
        self.scopes[owner.0]
            .bindings
            .get_mut(name)
            .ok_or_else(|| SymbolError::Undeclared {
                name: name.to_string(),
            })
    }

    /// Drop every value held by `scope`, leaving its bindings uninitialized
    pub fn discard(&mut self, scope: ScopeId) {
        let table = &mut self.scopes[scope.0];
        tracing::trace!(scope = scope.0, bindings = table.len(), "discarding scope values");
        for binding in table.bindings.values_mut() {
            binding.value = None;
        }
    }
}
