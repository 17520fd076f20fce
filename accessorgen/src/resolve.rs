//! Semantic resolution of discovered fields into descriptors.
//!
//! Each variable of a discovered declaration becomes one [`FieldDescriptor`]
//! once the host has bound its symbol and the attribute argument has folded
//! to a constant in the [`RetrievalSource`] domain. Anything else is dropped
//! from the output and recorded as a [`Diagnostic`].

use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::discovery::DiscoveredField;
use crate::schema::RetrievalSource;
use crate::semantic::{ConstantValue, NamedTypeSymbol, SemanticFacts, TypeRef};
use crate::syntax::AttributeSyntax;

/// A resolved annotated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Backing field name.
    pub field_name: String,
    /// Type declaring the field.
    pub owner: NamedTypeSymbol,
    /// Declared field type.
    pub declared_type: TypeRef,
    /// Decoded attribute argument.
    pub source: RetrievalSource,
}

/// Descriptors and diagnostics produced by [`resolve_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Descriptors in declaration order.
    pub descriptors: Vec<FieldDescriptor>,
    /// Fields dropped along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Why an attribute argument could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceRejection {
    Missing,
    NotConstant { text: String },
    OutOfDomain { text: String, value: ConstantValue },
}

impl SourceRejection {
    const fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Missing => DiagnosticKind::MissingArgument,
            Self::NotConstant { .. } => DiagnosticKind::NonConstantArgument,
            Self::OutOfDomain { .. } => DiagnosticKind::ArgumentOutOfDomain,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Missing => "marker attribute has no retrieval source argument".to_owned(),
            Self::NotConstant { text } => {
                format!("argument `{text}` is not a compile-time constant")
            }
            Self::OutOfDomain { text, value } => {
                format!("argument `{text}` evaluates to {value:?}, not a RetrievalSource value")
            }
        }
    }
}

/// Resolves every variable of every discovered declaration.
#[must_use]
pub fn resolve_fields(
    discovered: &[DiscoveredField<'_>],
    facts: &dyn SemanticFacts,
) -> Resolution {
    let mut resolution = Resolution::default();
    for found in discovered {
        let source = decode_source(found.attribute, facts);
        for variable in &found.declaration.variables {
            let Some(symbol) = facts.field_symbol(variable) else {
                debug!(field = %variable.name, path = %found.tree.path, "field symbol unresolved");
                resolution.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::UnresolvedSymbol,
                        format!("no symbol bound for field `{}`", variable.name),
                    )
                    .with_field(&variable.name),
                );
                continue;
            };
            match &source {
                Ok(decoded) => {
                    trace!(
                        owner = %symbol.containing_type.qualified_name(),
                        field = %symbol.name,
                        source = decoded.bits(),
                        "resolved annotated field"
                    );
                    resolution.descriptors.push(FieldDescriptor {
                        field_name: symbol.name,
                        owner: symbol.containing_type,
                        declared_type: symbol.field_type,
                        source: *decoded,
                    });
                }
                Err(rejection) => {
                    debug!(field = %symbol.name, kind = ?rejection.kind(), "field dropped");
                    resolution.diagnostics.push(
                        Diagnostic::new(rejection.kind(), rejection.message())
                            .with_owner(symbol.containing_type.qualified_name())
                            .with_field(symbol.name),
                    );
                }
            }
        }
    }
    resolution
}

fn decode_source(
    attribute: &AttributeSyntax,
    facts: &dyn SemanticFacts,
) -> Result<RetrievalSource, SourceRejection> {
    let argument = attribute.arguments.first().ok_or(SourceRejection::Missing)?;
    let value = facts
        .constant_value(argument)
        .ok_or_else(|| SourceRejection::NotConstant {
            text: argument.text.clone(),
        })?;
    match value {
        ConstantValue::Integer(raw) => {
            RetrievalSource::from_constant(raw).ok_or_else(|| SourceRejection::OutOfDomain {
                text: argument.text.clone(),
                value: ConstantValue::Integer(raw),
            })
        }
        other => Err(SourceRejection::OutOfDomain {
            text: argument.text.clone(),
            value: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    //! Tests for field resolution against an in-memory fact table.

    use std::collections::HashMap;

    use super::*;
    use crate::discovery::discover_fields;
    use crate::semantic::{FieldSymbol, SymbolId};
    use crate::syntax::{
        AttributeListSyntax, ExpressionSyntax, FieldSyntax, MemberSyntax, NodeId, SyntaxTree,
        VariableDeclarator,
    };
    use rstest::rstest;

    #[derive(Default)]
    struct Facts {
        fields: HashMap<NodeId, FieldSymbol>,
        constants: HashMap<NodeId, ConstantValue>,
    }

    impl SemanticFacts for Facts {
        fn field_symbol(&self, variable: &VariableDeclarator) -> Option<FieldSymbol> {
            self.fields.get(&variable.id).cloned()
        }

        fn constant_value(&self, expression: &ExpressionSyntax) -> Option<ConstantValue> {
            self.constants.get(&expression.id).cloned()
        }
    }

    fn player() -> NamedTypeSymbol {
        NamedTypeSymbol::new(SymbolId(7), "Player", Some("Game"))
    }

    fn declaration(argument: Option<u32>, variables: &[(u32, &str)]) -> FieldSyntax {
        FieldSyntax {
            attribute_lists: vec![AttributeListSyntax {
                attributes: vec![AttributeSyntax {
                    name: "FromHierarchy".to_owned(),
                    arguments: argument
                        .map(|id| ExpressionSyntax {
                            id: NodeId(id),
                            text: "source".to_owned(),
                        })
                        .into_iter()
                        .collect(),
                }],
            }],
            type_syntax: "Body".to_owned(),
            variables: variables
                .iter()
                .map(|(id, name)| VariableDeclarator {
                    id: NodeId(*id),
                    name: (*name).to_owned(),
                })
                .collect(),
        }
    }

    fn bind(facts: &mut Facts, id: u32, name: &str, ty: TypeRef) {
        facts.fields.insert(
            NodeId(id),
            FieldSymbol {
                name: name.to_owned(),
                field_type: ty,
                containing_type: player(),
            },
        );
    }

    fn run(facts: &Facts, declaration: FieldSyntax) -> Resolution {
        let trees = [SyntaxTree {
            path: "Player.cs".to_owned(),
            members: vec![MemberSyntax::Field(declaration)],
        }];
        let discovered = discover_fields(&trees);
        resolve_fields(&discovered, facts)
    }

    #[rstest]
    fn each_variable_shares_type_and_source() {
        let mut facts = Facts::default();
        facts.constants.insert(NodeId(1), ConstantValue::Integer(4));
        bind(&mut facts, 10, "_left", TypeRef::named("Hand"));
        bind(&mut facts, 11, "_right", TypeRef::named("Hand"));

        let pair = declaration(Some(1), &[(10, "_left"), (11, "_right")]);
        let resolution = run(&facts, pair);

        assert!(resolution.diagnostics.is_empty());
        let names: Vec<&str> = resolution
            .descriptors
            .iter()
            .map(|d| d.field_name.as_str())
            .collect();
        assert_eq!(names, ["_left", "_right"]);
        let is_shared = resolution
            .descriptors
            .iter()
            .all(|d| d.source == RetrievalSource::ANCESTORS && d.owner == player());
        assert!(is_shared);
    }

    #[rstest]
    #[case::not_constant(None, DiagnosticKind::NonConstantArgument)]
    #[case::string(Some(ConstantValue::String("Self".to_owned())), DiagnosticKind::ArgumentOutOfDomain)]
    #[case::null(Some(ConstantValue::Null), DiagnosticKind::ArgumentOutOfDomain)]
    #[case::boolean(Some(ConstantValue::Boolean(true)), DiagnosticKind::ArgumentOutOfDomain)]
    #[case::too_large(Some(ConstantValue::Integer(1 << 40)), DiagnosticKind::ArgumentOutOfDomain)]
    fn undecodable_arguments_drop_the_field(
        #[case] constant: Option<ConstantValue>,
        #[case] expected: DiagnosticKind,
    ) {
        let mut facts = Facts::default();
        if let Some(value) = constant {
            facts.constants.insert(NodeId(1), value);
        }
        bind(&mut facts, 10, "_body", TypeRef::named("Body"));

        let resolution = run(&facts, declaration(Some(1), &[(10, "_body")]));

        assert!(resolution.descriptors.is_empty());
        let diagnostic = resolution.diagnostics.first().expect("one diagnostic");
        assert_eq!(diagnostic.kind, expected);
        assert_eq!(diagnostic.owner.as_deref(), Some("Game.Player"));
        assert_eq!(diagnostic.field.as_deref(), Some("_body"));
    }

    #[rstest]
    fn missing_argument_drops_the_field() {
        let mut facts = Facts::default();
        bind(&mut facts, 10, "_body", TypeRef::named("Body"));

        let resolution = run(&facts, declaration(None, &[(10, "_body")]));

        assert!(resolution.descriptors.is_empty());
        assert_eq!(
            resolution.diagnostics.first().map(|d| d.kind),
            Some(DiagnosticKind::MissingArgument)
        );
    }

    #[rstest]
    fn unbound_variables_are_skipped_individually() {
        let mut facts = Facts::default();
        facts.constants.insert(NodeId(1), ConstantValue::Integer(1));
        bind(&mut facts, 11, "_bound", TypeRef::named("Body"));

        let pair = declaration(Some(1), &[(10, "_unbound"), (11, "_bound")]);
        let resolution = run(&facts, pair);

        assert_eq!(resolution.descriptors.len(), 1);
        let bound = resolution.descriptors.first().expect("bound descriptor");
        assert_eq!(bound.field_name, "_bound");
        let diagnostic = resolution.diagnostics.first().expect("one diagnostic");
        assert_eq!(diagnostic.kind, DiagnosticKind::UnresolvedSymbol);
        assert_eq!(diagnostic.field.as_deref(), Some("_unbound"));
    }

    #[rstest]
    fn non_canonical_constants_are_kept_for_synthesis() {
        let mut facts = Facts::default();
        facts.constants.insert(NodeId(1), ConstantValue::Integer(3));
        bind(&mut facts, 10, "_body", TypeRef::named("Body"));

        let resolution = run(&facts, declaration(Some(1), &[(10, "_body")]));

        let descriptor = resolution.descriptors.first().expect("descriptor kept");
        assert_eq!(descriptor.source.bits(), 3);
        assert!(resolution.diagnostics.is_empty());
    }
}
