//! Output units handed back to the host.

use serde::Serialize;

use crate::diagnostics::Diagnostic;

/// A named source text added to the host compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// Unit (file) name, unique within one pass.
    pub name: String,
    /// Generated C# source.
    pub source: String,
}

impl GeneratedUnit {
    /// Creates a unit from its name and text.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Everything one generation pass produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationOutput {
    /// The schema unit followed by one unit per non-empty owner group.
    pub units: Vec<GeneratedUnit>,
    /// Lenient fallbacks taken during the pass.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Looks up a unit by name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Returns `true` when no fallback was taken.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
