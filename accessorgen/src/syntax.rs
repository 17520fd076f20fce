//! Host syntax trees as seen by the generator.
//!
//! The host compilation owns parsing; these types carry just enough structure
//! for discovery: namespaces, type declarations, and field declarations with
//! their attribute lists. Nodes the generator does not care about deserialize
//! as [`MemberSyntax::Other`] so partial or unfamiliar trees are tolerated.

use serde::{Deserialize, Serialize};

/// Identifier of a syntax node, unique within one compilation.
///
/// Semantic facts are keyed by these identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// One source file of the host compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    /// Path of the file the tree was parsed from.
    #[serde(default)]
    pub path: String,
    /// Top-level members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberSyntax>,
}

/// A member of a compilation unit, namespace, or type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberSyntax {
    /// `namespace Name { ... }` or a file-scoped namespace.
    Namespace(NamespaceSyntax),
    /// A class, struct, or record declaration.
    Type(TypeSyntax),
    /// A field declaration.
    Field(FieldSyntax),
    /// Any member the generator ignores (methods, properties, ...).
    #[serde(other)]
    Other,
}

/// A namespace declaration and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSyntax {
    /// Namespace name as written, possibly dotted.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberSyntax>,
}

/// A type declaration and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSyntax {
    /// Simple type name.
    pub name: String,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberSyntax>,
}

/// A field declaration, possibly introducing several variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSyntax {
    /// Attribute lists in source order (`[A, B] [C]` is two lists).
    #[serde(default)]
    pub attribute_lists: Vec<AttributeListSyntax>,
    /// Declared type as written.
    #[serde(default)]
    pub type_syntax: String,
    /// Declared variables (`private Body _a, _b;` has two).
    #[serde(default)]
    pub variables: Vec<VariableDeclarator>,
}

/// One bracketed attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeListSyntax {
    /// Attributes in source order.
    #[serde(default)]
    pub attributes: Vec<AttributeSyntax>,
}

/// A single attribute usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSyntax {
    /// Attribute name exactly as written, including any qualifier.
    pub name: String,
    /// Argument expressions in source order.
    #[serde(default)]
    pub arguments: Vec<ExpressionSyntax>,
}

/// An expression node, such as an attribute argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionSyntax {
    /// Node identifier used for constant evaluation.
    pub id: NodeId,
    /// Source text of the expression.
    #[serde(default)]
    pub text: String,
}

/// A variable introduced by a field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    /// Node identifier used for symbol lookup.
    pub id: NodeId,
    /// Variable name.
    pub name: String,
}

impl FieldSyntax {
    /// Iterates over every attribute of the declaration in source order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeSyntax> {
        self.attribute_lists
            .iter()
            .flat_map(|list| list.attributes.iter())
    }
}

#[cfg(test)]
mod tests {
    //! Tests for syntax tree deserialization.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_member_kinds_deserialize_as_other() {
        let json = r#"{
            "path": "Player.cs",
            "members": [
                { "kind": "method", "name": "Update" },
                { "kind": "type", "name": "Player", "members": [] }
            ]
        }"#;
        let tree: SyntaxTree = serde_json::from_str(json).expect("parse tree");
        assert_eq!(tree.members.len(), 2);
        assert_eq!(tree.members.first(), Some(&MemberSyntax::Other));
        assert!(matches!(
            tree.members.get(1),
            Some(MemberSyntax::Type(ty)) if ty.name == "Player"
        ));
    }

    #[rstest]
    fn attributes_flatten_lists_in_source_order() {
        let field = FieldSyntax {
            attribute_lists: vec![
                AttributeListSyntax {
                    attributes: vec![attribute("SerializeField"), attribute("A")],
                },
                AttributeListSyntax {
                    attributes: vec![attribute("B")],
                },
            ],
            ..FieldSyntax::default()
        };
        let names: Vec<&str> = field.attributes().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, ["SerializeField", "A", "B"]);
    }

    fn attribute(name: &str) -> AttributeSyntax {
        AttributeSyntax {
            name: name.to_owned(),
            arguments: Vec::new(),
        }
    }
}
