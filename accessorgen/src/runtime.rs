//! Rust model of the runtime side of generated accessors.
//!
//! Generated C# calls one of six hierarchy lookups and caches the result in
//! the backing field. [`HierarchyLookup`] names those lookups and
//! [`CachedAccessor`] reproduces the accessor's compute-once behaviour, so the
//! strategy table and the caching contract can be exercised without a C#
//! runtime.

use crate::resolve::FieldDescriptor;
use crate::synth::{LookupScope, Plurality, Strategy};

/// The hierarchy queries generated accessors depend on.
pub trait HierarchyLookup {
    /// Handle to a found component.
    type Handle: Clone;

    /// First component of `type_name` on the instance itself.
    fn find_in_self(&self, type_name: &str) -> Option<Self::Handle>;

    /// Every component of `type_name` on the instance itself.
    fn find_all_in_self(&self, type_name: &str) -> Vec<Self::Handle>;

    /// First component of `type_name` on the instance or its descendants.
    fn find_in_descendants(&self, type_name: &str, include_inactive: bool) -> Option<Self::Handle>;

    /// Every component of `type_name` on the instance or its descendants.
    fn find_all_in_descendants(&self, type_name: &str, include_inactive: bool) -> Vec<Self::Handle>;

    /// First component of `type_name` on the instance or its ancestors.
    fn find_in_ancestors(&self, type_name: &str, include_inactive: bool) -> Option<Self::Handle>;

    /// Every component of `type_name` on the instance or its ancestors.
    fn find_all_in_ancestors(&self, type_name: &str, include_inactive: bool) -> Vec<Self::Handle>;
}

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<H> {
    /// A singular lookup; `None` mirrors a `null` result.
    One(Option<H>),
    /// A plural lookup; never `null`, possibly empty.
    Many(Vec<H>),
}

impl<H> Resolved<H> {
    /// Returns `false` for the unset sentinel (`null`).
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::One(None))
    }
}

impl Strategy {
    /// Performs this strategy's lookup for `type_argument`.
    #[must_use]
    pub fn resolve<L>(self, lookup: &L, type_argument: &str) -> Resolved<L::Handle>
    where
        L: HierarchyLookup + ?Sized,
    {
        let include_inactive = self.includes_inactive();
        match (self.scope, self.plurality) {
            (LookupScope::Itself, Plurality::Single) => {
                Resolved::One(lookup.find_in_self(type_argument))
            }
            (LookupScope::Itself, Plurality::All) => {
                Resolved::Many(lookup.find_all_in_self(type_argument))
            }
            (LookupScope::Descendants, Plurality::Single) => {
                Resolved::One(lookup.find_in_descendants(type_argument, include_inactive))
            }
            (LookupScope::Descendants, Plurality::All) => {
                Resolved::Many(lookup.find_all_in_descendants(type_argument, include_inactive))
            }
            (LookupScope::Ancestors, Plurality::Single) => {
                Resolved::One(lookup.find_in_ancestors(type_argument, include_inactive))
            }
            (LookupScope::Ancestors, Plurality::All) => {
                Resolved::Many(lookup.find_all_in_ancestors(type_argument, include_inactive))
            }
        }
    }
}

/// Per-instance memoized accessor for one field.
///
/// Reads return the cached value once it is set and never look it up again;
/// a `null` singular result stays unset, so the next read retries.
#[derive(Debug, Clone)]
pub struct CachedAccessor<H> {
    strategy: Strategy,
    type_argument: String,
    slot: Option<Resolved<H>>,
}

impl<H: Clone> CachedAccessor<H> {
    /// Creates an unset accessor using the same strategy synthesis selects.
    #[must_use]
    pub fn for_descriptor(descriptor: &FieldDescriptor) -> Self {
        let strategy = Strategy::for_source(descriptor.source, descriptor.declared_type.is_array())
            .unwrap_or(Strategy::FALLBACK);
        Self {
            strategy,
            type_argument: strategy.type_argument(&descriptor.declared_type),
            slot: None,
        }
    }

    /// The strategy this accessor resolves with.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Reads the accessor, resolving through `lookup` only while unset.
    pub fn read<L>(&mut self, lookup: &L) -> Resolved<H>
    where
        L: HierarchyLookup<Handle = H> + ?Sized,
    {
        if let Some(cached) = self.slot.as_ref().filter(|value| value.is_set()) {
            return cached.clone();
        }
        let value = self.strategy.resolve(lookup, &self.type_argument);
        self.slot = Some(value.clone());
        value
    }
}
