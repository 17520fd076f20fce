//! Serialized compilation snapshots.
//!
//! A snapshot bundles the host's syntax trees with the semantic facts the
//! generator will ask for, so a pass can run outside the host compiler. It is
//! the input format of the `accessorgen` command-line tool and doubles as a
//! ready-made [`SemanticFacts`] implementation for tests.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SnapshotError;
use crate::semantic::{ConstantValue, FieldSymbol, SemanticFacts};
use crate::syntax::{ExpressionSyntax, MemberSyntax, NodeId, SyntaxTree, VariableDeclarator};

/// Semantic facts keyed by syntax node identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFacts {
    /// Field symbols keyed by variable declarator id.
    #[serde(default)]
    pub fields: BTreeMap<NodeId, FieldSymbol>,
    /// Constant values keyed by expression id. Expressions without an entry
    /// are not compile-time constants.
    #[serde(default)]
    pub constants: BTreeMap<NodeId, ConstantValue>,
}

impl SemanticFacts for SnapshotFacts {
    fn field_symbol(&self, variable: &VariableDeclarator) -> Option<FieldSymbol> {
        self.fields.get(&variable.id).cloned()
    }

    fn constant_value(&self, expression: &ExpressionSyntax) -> Option<ConstantValue> {
        self.constants.get(&expression.id).cloned()
    }
}

/// Syntax trees plus the facts describing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationSnapshot {
    /// Source trees in compilation order.
    #[serde(default)]
    pub trees: Vec<SyntaxTree>,
    /// Facts for the nodes of `trees`.
    #[serde(default)]
    pub facts: SnapshotFacts,
}

impl CompilationSnapshot {
    /// Parses and validates a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] for malformed JSON and
    /// [`SnapshotError::DuplicateNode`] when a node id is reused.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }

    /// Hex SHA-256 digest of the snapshot's canonical JSON.
    ///
    /// Equal snapshots produce equal fingerprints, which makes the digest a
    /// safe memoization key for a generation pass.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn fingerprint(&self) -> Result<String, SnapshotError> {
        let bytes = serde_json::to_vec(self).map_err(SnapshotError::Encode)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for tree in &self.trees {
            check_unique_ids(tree, &tree.members, &mut seen)?;
        }
        Ok(())
    }
}

fn check_unique_ids(
    tree: &SyntaxTree,
    members: &[MemberSyntax],
    seen: &mut HashSet<NodeId>,
) -> Result<(), SnapshotError> {
    for member in members {
        match member {
            MemberSyntax::Namespace(namespace) => check_unique_ids(tree, &namespace.members, seen)?,
            MemberSyntax::Type(ty) => check_unique_ids(tree, &ty.members, seen)?,
            MemberSyntax::Field(field) => {
                let variable_ids = field.variables.iter().map(|variable| variable.id);
                let argument_ids = field
                    .attributes()
                    .flat_map(|attribute| attribute.arguments.iter().map(|argument| argument.id));
                for id in variable_ids.chain(argument_ids) {
                    if !seen.insert(id) {
                        return Err(SnapshotError::DuplicateNode {
                            id: id.0,
                            path: tree.path.clone(),
                        });
                    }
                }
            }
            MemberSyntax::Other => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Tests for snapshot parsing and fingerprinting.

    use super::*;
    use crate::semantic::TypeRef;
    use rstest::{fixture, rstest};

    const PLAYER_SNAPSHOT: &str = r#"{
        "trees": [{
            "path": "Player.cs",
            "members": [{
                "kind": "type",
                "name": "Player",
                "members": [{
                    "kind": "field",
                    "type_syntax": "Body",
                    "attribute_lists": [{ "attributes": [{
                        "name": "FromHierarchy",
                        "arguments": [{ "id": 2, "text": "RetrievalSource.Self" }]
                    }]}],
                    "variables": [{ "id": 1, "name": "_body" }]
                }]
            }]
        }],
        "facts": {
            "fields": {
                "1": {
                    "name": "_body",
                    "field_type": { "kind": "named", "display": "Body" },
                    "containing_type": { "id": 10, "name": "Player" }
                }
            },
            "constants": { "2": { "integer": 1 } }
        }
    }"#;

    #[fixture]
    fn snapshot() -> CompilationSnapshot {
        CompilationSnapshot::from_json(PLAYER_SNAPSHOT).expect("parse snapshot")
    }

    #[rstest]
    fn facts_answer_by_node_id(snapshot: CompilationSnapshot) {
        let variable = VariableDeclarator {
            id: NodeId(1),
            name: "_body".to_owned(),
        };
        let symbol = snapshot.facts.field_symbol(&variable).expect("symbol");
        assert_eq!(symbol.field_type, TypeRef::named("Body"));
        assert_eq!(symbol.containing_type.namespace, None);

        let argument = ExpressionSyntax {
            id: NodeId(2),
            text: String::new(),
        };
        assert_eq!(
            snapshot.facts.constant_value(&argument),
            Some(ConstantValue::Integer(1))
        );
        let missing = ExpressionSyntax {
            id: NodeId(3),
            text: String::new(),
        };
        assert_eq!(snapshot.facts.constant_value(&missing), None);
    }

    #[rstest]
    fn fingerprint_is_stable_across_round_trips(snapshot: CompilationSnapshot) {
        let json = snapshot.to_json().expect("encode");
        let reparsed = CompilationSnapshot::from_json(&json).expect("reparse");
        assert_eq!(
            snapshot.fingerprint().expect("fingerprint"),
            reparsed.fingerprint().expect("fingerprint")
        );
    }

    #[rstest]
    fn fingerprint_changes_with_facts(snapshot: CompilationSnapshot) {
        let mut changed = snapshot.clone();
        changed
            .facts
            .constants
            .insert(NodeId(2), ConstantValue::Integer(2));
        assert_ne!(
            snapshot.fingerprint().expect("fingerprint"),
            changed.fingerprint().expect("fingerprint")
        );
    }

    #[rstest]
    fn duplicate_node_ids_are_rejected() {
        let json = PLAYER_SNAPSHOT.replace(r#""id": 2, "text""#, r#""id": 1, "text""#);
        let err = CompilationSnapshot::from_json(&json).expect_err("duplicate id");
        assert!(matches!(err, SnapshotError::DuplicateNode { id: 1, .. }));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        let err = CompilationSnapshot::from_json("{ not json").expect_err("parse failure");
        assert!(matches!(err, SnapshotError::Parse(_)));
    }
}
