//! Non-fatal diagnostics recorded when the generator degrades leniently.
//!
//! None of these change the generated output. They exist so that callers can
//! inspect the fallbacks taken during a pass and, if they choose, treat them
//! as failures.

use std::fmt;

use serde::Serialize;

/// The lenient fallbacks the generator can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The marker attribute had no argument; the field was skipped.
    MissingArgument,
    /// The attribute argument was not a compile-time constant; the field
    /// was skipped.
    NonConstantArgument,
    /// The argument was constant but not an `int`-ranged integer; the field
    /// was skipped.
    ArgumentOutOfDomain,
    /// The host could not bind the field variable; it was skipped.
    UnresolvedSymbol,
    /// The field name had no lowercase letter; the fallback accessor name
    /// was used.
    FallbackIdentifier,
    /// The retrieval source was not a single known flag; the scalar
    /// self lookup was used.
    NonCanonicalSource,
    /// Two accessors in one type received the same name.
    DuplicateAccessor,
    /// Two owner types mapped to the same unit name; the later unit was
    /// given a numbered name.
    DuplicateUnitName,
}

impl DiagnosticKind {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingArgument => "AG0001",
            Self::NonConstantArgument => "AG0002",
            Self::ArgumentOutOfDomain => "AG0003",
            Self::UnresolvedSymbol => "AG0004",
            Self::FallbackIdentifier => "AG0005",
            Self::NonCanonicalSource => "AG0006",
            Self::DuplicateAccessor => "AG0007",
            Self::DuplicateUnitName => "AG0008",
        }
    }

    /// Returns `true` when the field was left out of the output.
    #[must_use]
    pub const fn drops_field(self) -> bool {
        matches!(
            self,
            Self::MissingArgument
                | Self::NonConstantArgument
                | Self::ArgumentOutOfDomain
                | Self::UnresolvedSymbol
        )
    }
}

/// A single recorded fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Which fallback was taken.
    pub kind: DiagnosticKind,
    /// Qualified name of the owning type, when known.
    pub owner: Option<String>,
    /// Field the diagnostic concerns, when known.
    pub field: Option<String>,
    /// Human-readable explanation.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic without location details.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            owner: None,
            field: None,
            message: message.into(),
        }
    }

    /// Attaches the owning type's qualified name.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Attaches the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.code())?;
        match (&self.owner, &self.field) {
            (Some(owner), Some(field)) => write!(f, " {owner}.{field}")?,
            (Some(owner), None) => write!(f, " {owner}")?,
            (None, Some(field)) => write!(f, " {field}")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn display_includes_code_and_location() {
        let diagnostic = Diagnostic::new(DiagnosticKind::NonConstantArgument, "not constant")
            .with_owner("Game.Player")
            .with_field("_body");
        assert_eq!(
            diagnostic.to_string(),
            "AG0002 Game.Player._body: not constant"
        );
    }

    #[rstest]
    fn display_without_location() {
        let diagnostic = Diagnostic::new(DiagnosticKind::MissingArgument, "no argument");
        assert_eq!(diagnostic.to_string(), "AG0001: no argument");
    }

    #[rstest]
    #[case(DiagnosticKind::MissingArgument, true)]
    #[case(DiagnosticKind::UnresolvedSymbol, true)]
    #[case(DiagnosticKind::FallbackIdentifier, false)]
    #[case(DiagnosticKind::NonCanonicalSource, false)]
    #[case(DiagnosticKind::DuplicateAccessor, false)]
    #[case(DiagnosticKind::DuplicateUnitName, false)]
    fn drops_field_marks_skipping_kinds(#[case] kind: DiagnosticKind, #[case] expected: bool) {
        assert_eq!(kind.drops_field(), expected);
    }
}
