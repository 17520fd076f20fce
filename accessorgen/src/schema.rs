//! Declarative schema for the marker attribute.
//!
//! The attribute and its `RetrievalSource` enumeration are published as a
//! fixed source unit at the start of every pass so that user code compiles
//! against them in the same compilation.

use bitflags::bitflags;

use crate::unit::GeneratedUnit;

/// Version of the emitted schema text. Bump whenever [`SCHEMA_SOURCE`]
/// changes so cached outputs are invalidated.
pub const SCHEMA_VERSION: &str = "1";

/// Namespace that hosts the attribute and the enumeration.
pub const SCHEMA_NAMESPACE: &str = "HierarchyAccessors";

/// Full type name of the marker attribute.
pub const ATTRIBUTE_TYPE_NAME: &str = "FromHierarchyAttribute";

/// Conventional short form accepted at usage sites (`[FromHierarchy(...)]`).
pub const ATTRIBUTE_SHORT_NAME: &str = "FromHierarchy";

/// Name of the unit carrying the schema.
pub const SCHEMA_UNIT_NAME: &str = "FromHierarchyAttribute.g.cs";

/// C# text defining the marker attribute and the retrieval source flags.
pub const SCHEMA_SOURCE: &str = r"// <auto-generated/>
using System;

namespace HierarchyAccessors
{
    [AttributeUsage(AttributeTargets.Field, Inherited = false, AllowMultiple = false)]
    internal sealed class FromHierarchyAttribute : Attribute
    {
        public FromHierarchyAttribute(RetrievalSource source)
        {
            Source = source;
        }

        public RetrievalSource Source { get; }
    }

    [Flags]
    internal enum RetrievalSource
    {
        Self = 1,
        Descendants = 1 << 1,
        Ancestors = 1 << 2,
    }
}
";

bitflags! {
    /// Where in the object hierarchy a dependency is looked up.
    ///
    /// Members combine by union, but only the three single-flag values have
    /// a dedicated lookup strategy. Unknown bits are retained so that every
    /// integral attribute argument stays representable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RetrievalSource: i32 {
        /// The annotated instance itself.
        const SELF = 1;
        /// Children of the instance, recursively.
        const DESCENDANTS = 1 << 1;
        /// Parents of the instance, recursively.
        const ANCESTORS = 1 << 2;
    }
}

/// The three retrieval sources with defined synthesis behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalSource {
    /// Exactly [`RetrievalSource::SELF`].
    Itself,
    /// Exactly [`RetrievalSource::DESCENDANTS`].
    Descendants,
    /// Exactly [`RetrievalSource::ANCESTORS`].
    Ancestors,
}

impl RetrievalSource {
    /// Decodes an integral attribute argument.
    ///
    /// Returns `None` when the value does not fit the enumeration's `int`
    /// representation.
    #[must_use]
    pub fn from_constant(value: i64) -> Option<Self> {
        i32::try_from(value).ok().map(Self::from_bits_retain)
    }

    /// Returns the canonical single-flag form, if this value is one.
    ///
    /// Zero, unions and values carrying unknown bits have no canonical form.
    #[must_use]
    pub fn canonical(self) -> Option<CanonicalSource> {
        if self == Self::SELF {
            Some(CanonicalSource::Itself)
        } else if self == Self::DESCENDANTS {
            Some(CanonicalSource::Descendants)
        } else if self == Self::ANCESTORS {
            Some(CanonicalSource::Ancestors)
        } else {
            None
        }
    }
}

/// Returns the fixed schema unit emitted first in every pass.
#[must_use]
pub fn schema_unit() -> GeneratedUnit {
    GeneratedUnit::new(SCHEMA_UNIT_NAME, SCHEMA_SOURCE)
}
