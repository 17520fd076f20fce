//! Semantic facts supplied by the host compilation.
//!
//! The generator never resolves types or folds constants itself. The host
//! injects a [`SemanticFacts`] implementation that answers the two questions
//! resolution needs; tests supply a fake one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::syntax::{ExpressionSyntax, VariableDeclarator};

/// Identity of a type symbol within one compilation.
///
/// Two symbols are the same type exactly when their identifiers are equal,
/// regardless of display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u64);

/// A named type that owns annotated fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTypeSymbol {
    /// Symbol identity.
    pub id: SymbolId,
    /// Simple type name.
    pub name: String,
    /// Enclosing namespace; `None` for the global namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Simple names of enclosing types, outermost first.
    #[serde(default)]
    pub containing_types: Vec<String>,
}

impl NamedTypeSymbol {
    /// Creates a top-level type symbol.
    #[must_use]
    pub fn new(id: SymbolId, name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            namespace: namespace.map(str::to_owned),
            containing_types: Vec::new(),
        }
    }

    /// Returns the dotted name including namespace and enclosing types.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.namespace
            .iter()
            .map(String::as_str)
            .chain(self.containing_types.iter().map(String::as_str))
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A non-array type, displayed as written by the host (`Body`,
    /// `Game.Body`, `List<Body>`).
    Named {
        /// Display form of the type.
        display: String,
    },
    /// A single-dimensional array of `element`.
    Array {
        /// Element type.
        element: Box<Self>,
    },
}

impl TypeRef {
    /// Creates a named type reference.
    #[must_use]
    pub fn named(display: impl Into<String>) -> Self {
        Self::Named {
            display: display.into(),
        }
    }

    /// Creates an array of `element`.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Returns `true` for array types.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Returns the element type of an array, or `None` for named types.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Array { element } => Some(element),
            Self::Named { .. } => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { display } => f.write_str(display),
            Self::Array { element } => write!(f, "{element}[]"),
        }
    }
}

/// The resolved symbol of one field variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSymbol {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: TypeRef,
    /// Type that declares the field.
    pub containing_type: NamedTypeSymbol,
}

/// Result of compile-time constant evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    /// Any integral constant, including enum members.
    Integer(i64),
    /// A `bool` constant.
    Boolean(bool),
    /// A string constant.
    String(String),
    /// The `null` literal.
    Null,
}

/// Symbol and constant queries answered by the host compilation.
pub trait SemanticFacts {
    /// Resolves the symbol declared by `variable`, or `None` when the host
    /// cannot bind it (for example in an incomplete compilation).
    fn field_symbol(&self, variable: &VariableDeclarator) -> Option<FieldSymbol>;

    /// Evaluates `expression` as a compile-time constant, or `None` when it
    /// is not constant.
    fn constant_value(&self, expression: &ExpressionSyntax) -> Option<ConstantValue>;
}

impl<T: SemanticFacts + ?Sized> SemanticFacts for &T {
    fn field_symbol(&self, variable: &VariableDeclarator) -> Option<FieldSymbol> {
        (**self).field_symbol(variable)
    }

    fn constant_value(&self, expression: &ExpressionSyntax) -> Option<ConstantValue> {
        (**self).constant_value(expression)
    }
}
