//! Syntactic discovery of fields carrying the marker attribute.
//!
//! Discovery never consults semantic facts, so it works on incomplete
//! compilations. It reports each matching declaration once, leaving the
//! per-variable expansion to resolution.

use tracing::trace;

use crate::schema::{ATTRIBUTE_SHORT_NAME, ATTRIBUTE_TYPE_NAME};
use crate::syntax::{AttributeSyntax, FieldSyntax, MemberSyntax, SyntaxTree};

/// A field declaration paired with its first marker attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredField<'a> {
    /// Tree the declaration lives in.
    pub tree: &'a SyntaxTree,
    /// The annotated declaration.
    pub declaration: &'a FieldSyntax,
    /// The first attribute on the declaration that names the marker.
    pub attribute: &'a AttributeSyntax,
}

/// Returns `true` when `written` names the marker attribute.
///
/// Qualifiers are ignored (`HierarchyAccessors.FromHierarchy`,
/// `global::HierarchyAccessors.FromHierarchyAttribute`); the remaining
/// identifier must equal the full or the short attribute name exactly.
#[must_use]
pub fn is_marker_attribute(written: &str) -> bool {
    let trimmed = written.trim();
    let identifier = trimmed
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(trimmed);
    identifier == ATTRIBUTE_TYPE_NAME || identifier == ATTRIBUTE_SHORT_NAME
}

/// Finds every annotated field declaration across `trees`, in source order.
#[must_use]
pub fn discover_fields(trees: &[SyntaxTree]) -> Vec<DiscoveredField<'_>> {
    let mut found = Vec::new();
    for tree in trees {
        visit_members(tree, &tree.members, &mut found);
    }
    found
}

fn visit_members<'a>(
    tree: &'a SyntaxTree,
    members: &'a [MemberSyntax],
    found: &mut Vec<DiscoveredField<'a>>,
) {
    for member in members {
        match member {
            MemberSyntax::Namespace(namespace) => visit_members(tree, &namespace.members, found),
            MemberSyntax::Type(ty) => visit_members(tree, &ty.members, found),
            MemberSyntax::Field(declaration) => {
                if let Some(attribute) = first_marker(declaration) {
                    trace!(
                        path = %tree.path,
                        attribute = %attribute.name,
                        "discovered annotated field declaration"
                    );
                    found.push(DiscoveredField {
                        tree,
                        declaration,
                        attribute,
                    });
                }
            }
            MemberSyntax::Other => {}
        }
    }
}

fn first_marker(declaration: &FieldSyntax) -> Option<&AttributeSyntax> {
    declaration
        .attributes()
        .find(|attribute| is_marker_attribute(&attribute.name))
}

#[cfg(test)]
mod tests {
    //! Tests for marker attribute discovery.

    use super::*;
    use crate::syntax::{
        AttributeListSyntax, ExpressionSyntax, NamespaceSyntax, NodeId, TypeSyntax,
        VariableDeclarator,
    };
    use rstest::rstest;

    #[rstest]
    #[case("FromHierarchy", true)]
    #[case("FromHierarchyAttribute", true)]
    #[case("HierarchyAccessors.FromHierarchy", true)]
    #[case("global::HierarchyAccessors.FromHierarchyAttribute", true)]
    #[case(" FromHierarchy ", true)]
    #[case("MyFromHierarchy", false)]
    #[case("FromHierarchyAttr", false)]
    #[case("fromhierarchy", false)]
    #[case("SerializeField", false)]
    fn marker_matching(#[case] written: &str, #[case] expected: bool) {
        assert_eq!(is_marker_attribute(written), expected);
    }

    #[rstest]
    fn first_matching_attribute_wins() {
        let declaration = field(
            vec![
                vec![attribute("SerializeField", 10)],
                vec![
                    attribute("FromHierarchy", 11),
                    attribute("FromHierarchyAttribute", 12),
                ],
            ],
            &["_body"],
        );
        let tree = tree_with(vec![MemberSyntax::Field(declaration)]);
        let trees = [tree];
        let found = discover_fields(&trees);
        assert_eq!(found.len(), 1);
        let first = found.first().expect("one discovered field");
        assert_eq!(first.attribute.name, "FromHierarchy");
        assert_eq!(
            first.attribute.arguments.first().map(|arg| arg.id),
            Some(NodeId(11))
        );
    }

    #[rstest]
    fn multi_variable_declaration_is_discovered_once() {
        let declaration = field(
            vec![vec![attribute("FromHierarchy", 1)]],
            &["_a", "_b", "_c"],
        );
        let trees = [tree_with(vec![MemberSyntax::Field(declaration)])];
        let found = discover_fields(&trees);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found.first().map(|f| f.declaration.variables.len()),
            Some(3)
        );
    }

    #[rstest]
    fn walks_namespaces_and_nested_types() {
        let inner = MemberSyntax::Type(TypeSyntax {
            name: "Inner".to_owned(),
            members: vec![MemberSyntax::Field(field(
                vec![vec![attribute("FromHierarchy", 2)]],
                &["_inner"],
            ))],
        });
        let outer = MemberSyntax::Type(TypeSyntax {
            name: "Outer".to_owned(),
            members: vec![
                MemberSyntax::Other,
                MemberSyntax::Field(field(vec![vec![attribute("FromHierarchy", 1)]], &["_outer"])),
                inner,
                MemberSyntax::Field(field(vec![vec![attribute("Range", 3)]], &["_plain"])),
            ],
        });
        let namespace = MemberSyntax::Namespace(NamespaceSyntax {
            name: "Game".to_owned(),
            members: vec![outer],
        });
        let trees = [tree_with(vec![namespace]), tree_with(Vec::new())];
        let names: Vec<&str> = discover_fields(&trees)
            .iter()
            .filter_map(|found| found.declaration.variables.first())
            .map(|variable| variable.name.as_str())
            .collect();
        assert_eq!(names, ["_outer", "_inner"]);
    }

    #[rstest]
    fn fields_without_attributes_are_ignored() {
        let trees = [tree_with(vec![MemberSyntax::Field(field(Vec::new(), &["_x"]))])];
        assert!(discover_fields(&trees).is_empty());
    }

    fn tree_with(members: Vec<MemberSyntax>) -> SyntaxTree {
        SyntaxTree {
            path: "Test.cs".to_owned(),
            members,
        }
    }

    fn attribute(name: &str, argument_id: u32) -> AttributeSyntax {
        AttributeSyntax {
            name: name.to_owned(),
            arguments: vec![ExpressionSyntax {
                id: NodeId(argument_id),
                text: "RetrievalSource.Self".to_owned(),
            }],
        }
    }

    fn field(lists: Vec<Vec<AttributeSyntax>>, names: &[&str]) -> FieldSyntax {
        FieldSyntax {
            attribute_lists: lists
                .into_iter()
                .map(|attributes| AttributeListSyntax { attributes })
                .collect(),
            type_syntax: "Body".to_owned(),
            variables: names
                .iter()
                .zip(100..)
                .map(|(name, id)| VariableDeclarator {
                    id: NodeId(id),
                    name: (*name).to_owned(),
                })
                .collect(),
        }
    }
}
