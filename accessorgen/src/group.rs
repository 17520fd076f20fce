//! Partitioning of descriptors by owning type.

use indexmap::IndexMap;

use crate::resolve::FieldDescriptor;
use crate::semantic::{NamedTypeSymbol, SymbolId};

/// The annotated fields of one owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    /// The owning type.
    pub owner: NamedTypeSymbol,
    /// Fields in resolution order; all share `owner.id`.
    pub fields: Vec<FieldDescriptor>,
}

impl ClassGroup {
    /// Creates an empty group for `owner`.
    #[must_use]
    pub const fn new(owner: NamedTypeSymbol) -> Self {
        Self {
            owner,
            fields: Vec::new(),
        }
    }

    /// Returns `true` when the group has no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Groups descriptors by owner symbol identity.
///
/// Types are keyed by [`SymbolId`], never by name, so `A.Player` and
/// `B.Player` stay apart. Groups appear in first-encounter order, though
/// callers should not rely on any inter-group ordering.
#[must_use]
pub fn group_by_owner(descriptors: Vec<FieldDescriptor>) -> Vec<ClassGroup> {
    let mut groups: IndexMap<SymbolId, ClassGroup> = IndexMap::new();
    for descriptor in descriptors {
        groups
            .entry(descriptor.owner.id)
            .or_insert_with(|| ClassGroup::new(descriptor.owner.clone()))
            .fields
            .push(descriptor);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    //! Tests for owner grouping.

    use super::*;
    use crate::schema::RetrievalSource;
    use crate::semantic::TypeRef;
    use rstest::rstest;

    fn descriptor(owner: &NamedTypeSymbol, field: &str) -> FieldDescriptor {
        FieldDescriptor {
            field_name: field.to_owned(),
            owner: owner.clone(),
            declared_type: TypeRef::named("Body"),
            source: RetrievalSource::SELF,
        }
    }

    fn field_names(groups: &[ClassGroup], owner: SymbolId) -> Vec<&str> {
        groups
            .iter()
            .filter(|group| group.owner.id == owner)
            .flat_map(|group| &group.fields)
            .map(|field| field.field_name.as_str())
            .collect()
    }

    #[rstest]
    fn same_simple_name_in_different_namespaces_stays_apart() {
        let first = NamedTypeSymbol::new(SymbolId(1), "Player", Some("Alpha"));
        let second = NamedTypeSymbol::new(SymbolId(2), "Player", Some("Beta"));
        let groups = group_by_owner(vec![
            descriptor(&first, "_a"),
            descriptor(&second, "_b"),
            descriptor(&first, "_c"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(field_names(&groups, SymbolId(1)), ["_a", "_c"]);
        assert_eq!(field_names(&groups, SymbolId(2)), ["_b"]);
    }

    #[rstest]
    fn every_field_in_a_group_shares_the_owner_identity() {
        let owner = NamedTypeSymbol::new(SymbolId(5), "Enemy", None);
        let other = NamedTypeSymbol::new(SymbolId(6), "Boss", None);
        let groups = group_by_owner(vec![
            descriptor(&owner, "_x"),
            descriptor(&other, "_y"),
            descriptor(&owner, "_z"),
        ]);
        for group in &groups {
            assert!(!group.is_empty());
            assert!(group.fields.iter().all(|f| f.owner.id == group.owner.id));
        }
    }

    #[rstest]
    fn no_descriptors_yield_no_groups() {
        assert!(group_by_owner(Vec::new()).is_empty());
    }
}
