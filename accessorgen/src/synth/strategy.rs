//! The retrieval strategy table.
//!
//! A strategy is a (scope, plurality) pair naming one of the six hierarchy
//! lookups. Only the three canonical sources select a strategy from the
//! table; everything else uses [`Strategy::FALLBACK`].

use crate::schema::{CanonicalSource, RetrievalSource};
use crate::semantic::TypeRef;

/// Where a lookup searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupScope {
    /// The instance itself.
    Itself,
    /// The instance and its children, recursively.
    Descendants,
    /// The instance and its parents, recursively.
    Ancestors,
}

/// How many results a lookup returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plurality {
    /// The first match, or `null`.
    Single,
    /// Every match, as an array.
    All,
}

/// One entry of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strategy {
    /// Search scope.
    pub scope: LookupScope,
    /// Result shape.
    pub plurality: Plurality,
}

impl Strategy {
    /// Used for any source that is not exactly one known flag. It ignores
    /// array-ness and looks the full declared type up on the instance.
    pub const FALLBACK: Self = Self {
        scope: LookupScope::Itself,
        plurality: Plurality::Single,
    };

    /// Selects the table entry for `source` and the field's array-ness.
    ///
    /// Returns `None` for non-canonical sources (zero, unions, unknown bits).
    #[must_use]
    pub fn for_source(source: RetrievalSource, is_array: bool) -> Option<Self> {
        let scope = match source.canonical()? {
            CanonicalSource::Itself => LookupScope::Itself,
            CanonicalSource::Descendants => LookupScope::Descendants,
            CanonicalSource::Ancestors => LookupScope::Ancestors,
        };
        let plurality = if is_array {
            Plurality::All
        } else {
            Plurality::Single
        };
        Some(Self { scope, plurality })
    }

    /// Runtime method implementing this lookup.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match (self.scope, self.plurality) {
            (LookupScope::Itself, Plurality::Single) => "GetComponent",
            (LookupScope::Itself, Plurality::All) => "GetComponents",
            (LookupScope::Descendants, Plurality::Single) => "GetComponentInChildren",
            (LookupScope::Descendants, Plurality::All) => "GetComponentsInChildren",
            (LookupScope::Ancestors, Plurality::Single) => "GetComponentInParent",
            (LookupScope::Ancestors, Plurality::All) => "GetComponentsInParent",
        }
    }

    /// Whether the lookup takes the `includeInactive` toggle (always passed
    /// as `true`).
    #[must_use]
    pub const fn includes_inactive(self) -> bool {
        !matches!(self.scope, LookupScope::Itself)
    }

    /// Generic type argument for `declared`: the element type for plural
    /// lookups over arrays, otherwise the declared type itself.
    #[must_use]
    pub fn type_argument(self, declared: &TypeRef) -> String {
        match (self.plurality, declared.element()) {
            (Plurality::All, Some(element)) => element.to_string(),
            _ => declared.to_string(),
        }
    }

    /// Renders the lookup call, e.g. `GetComponentsInChildren<Foo>(true)`.
    #[must_use]
    pub fn render_call(self, declared: &TypeRef) -> String {
        let arguments = if self.includes_inactive() { "true" } else { "" };
        format!(
            "{}<{}>({arguments})",
            self.method_name(),
            self.type_argument(declared)
        )
    }
}
