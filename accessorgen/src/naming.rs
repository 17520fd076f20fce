//! Derivation of accessor names from backing field names.

use std::fmt;

/// Name used when a field name contains no lowercase letter to capitalise.
pub const FALLBACK_ACCESSOR_NAME: &str = "NoLetterCanUppercase";

/// Characters Unicode counts as lowercase (`Other_Lowercase`) that are not
/// lowercase letters: ordinal indicators, modifier letters, small roman
/// numerals and circled letters.
const OTHER_LOWERCASE: &[(char, char)] = &[
    ('\u{00AA}', '\u{00AA}'),
    ('\u{00BA}', '\u{00BA}'),
    ('\u{02B0}', '\u{02B8}'),
    ('\u{02C0}', '\u{02C1}'),
    ('\u{02E0}', '\u{02E4}'),
    ('\u{0345}', '\u{0345}'),
    ('\u{037A}', '\u{037A}'),
    ('\u{10FC}', '\u{10FC}'),
    ('\u{1D2C}', '\u{1D6A}'),
    ('\u{1D78}', '\u{1D78}'),
    ('\u{1D9B}', '\u{1DBF}'),
    ('\u{2071}', '\u{2071}'),
    ('\u{207F}', '\u{207F}'),
    ('\u{2090}', '\u{209C}'),
    ('\u{2170}', '\u{217F}'),
    ('\u{24D0}', '\u{24E9}'),
    ('\u{2C7C}', '\u{2C7D}'),
    ('\u{A69C}', '\u{A69D}'),
    ('\u{A770}', '\u{A770}'),
    ('\u{A7F2}', '\u{A7F4}'),
    ('\u{A7F8}', '\u{A7F9}'),
    ('\u{AB5C}', '\u{AB5F}'),
    ('\u{AB69}', '\u{AB69}'),
];

/// An accessor name, remembering whether the fallback had to be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessorName {
    /// Derived from the field name.
    Derived(String),
    /// The field name had no lowercase letter; [`FALLBACK_ACCESSOR_NAME`]
    /// stands in.
    Fallback,
}

impl AccessorName {
    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Derived(name) => name,
            Self::Fallback => FALLBACK_ACCESSOR_NAME,
        }
    }

    /// Returns `true` when the fallback identifier was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for AccessorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the accessor name for `field_name`.
///
/// The first lowercase letter is upper-cased and everything before it is
/// dropped, so `_myHealth` becomes `MyHealth` and `m_speed` becomes `M_speed`.
///
/// Classification follows the host's per-UTF-16-unit rules: only lowercase
/// letters (category `Ll`) in the Basic Multilingual Plane qualify, and a
/// letter whose upper case is not a single character is kept as written.
///
/// ```rust
/// use accessorgen::{accessor_name, FALLBACK_ACCESSOR_NAME};
///
/// assert_eq!(accessor_name("_myHealth").as_str(), "MyHealth");
/// assert_eq!(accessor_name("ABC").as_str(), FALLBACK_ACCESSOR_NAME);
/// ```
#[must_use]
pub fn accessor_name(field_name: &str) -> AccessorName {
    let Some((index, first)) = field_name
        .char_indices()
        .find(|(_, ch)| is_lowercase_letter(*ch))
    else {
        return AccessorName::Fallback;
    };
    let rest = field_name
        .get(index + first.len_utf8()..)
        .unwrap_or_default();
    let mut name = String::with_capacity(field_name.len() - index);
    name.push(simple_uppercase(first));
    name.push_str(rest);
    AccessorName::Derived(name)
}

fn is_lowercase_letter(ch: char) -> bool {
    ch.len_utf16() == 1 && ch.is_lowercase() && !is_other_lowercase(ch)
}

fn is_other_lowercase(ch: char) -> bool {
    OTHER_LOWERCASE
        .iter()
        .any(|&(low, high)| (low..=high).contains(&ch))
}

/// Single-character upper case, or `ch` itself when none exists.
fn simple_uppercase(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}
