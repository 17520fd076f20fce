//! Builds in-memory compilations for generator tests.
//!
//! [`CompilationBuilder`] plays the host compiler: it lays out syntax trees
//! and records the symbol and constant facts the generator will ask for,
//! handing out node and symbol identifiers as it goes.
//!
//! # Examples
//!
//! ```
//! use accessorgen::{Generator, RetrievalSource, TypeRef};
//! use accessorgen_test_helpers::compilation::{CompilationBuilder, FieldSpec};
//!
//! let mut builder = CompilationBuilder::new();
//! let player = builder.class(None, "Player");
//! builder.field(
//!     &player,
//!     FieldSpec::new(TypeRef::named("Body"), &["_body"]).from_hierarchy(RetrievalSource::SELF),
//! );
//! let snapshot = builder.build();
//! let output = Generator::new(&snapshot.facts).generate(&snapshot.trees);
//! assert!(output.unit("Player.g.cs").is_some());
//! ```

use accessorgen::schema::{ATTRIBUTE_SHORT_NAME, RetrievalSource};
use accessorgen::semantic::{ConstantValue, FieldSymbol, NamedTypeSymbol, SymbolId, TypeRef};
use accessorgen::snapshot::{CompilationSnapshot, SnapshotFacts};
use accessorgen::syntax::{
    AttributeListSyntax, AttributeSyntax, ExpressionSyntax, FieldSyntax, MemberSyntax,
    NamespaceSyntax, NodeId, SyntaxTree, TypeSyntax, VariableDeclarator,
};

/// How an attribute argument evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A compile-time constant with the given source text.
    Constant {
        /// Source text of the argument.
        text: String,
        /// Folded value.
        value: ConstantValue,
    },
    /// An expression the host cannot fold.
    NonConstant(String),
}

impl Argument {
    /// An integral constant written as `text`.
    #[must_use]
    pub fn integer(text: impl Into<String>, value: i64) -> Self {
        Self::Constant {
            text: text.into(),
            value: ConstantValue::Integer(value),
        }
    }

    /// The constant a `RetrievalSource` member expression folds to.
    #[must_use]
    pub fn source(source: RetrievalSource) -> Self {
        Self::integer(
            format!("(RetrievalSource){}", source.bits()),
            i64::from(source.bits()),
        )
    }
}

#[derive(Debug, Clone)]
struct AttributeSpec {
    name: String,
    arguments: Vec<Argument>,
}

/// A field declaration to add to a type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    field_type: TypeRef,
    names: Vec<String>,
    attribute_lists: Vec<Vec<AttributeSpec>>,
    bound: bool,
}

impl FieldSpec {
    /// A declaration of `names`, all of type `field_type`, with no attributes.
    #[must_use]
    pub fn new(field_type: TypeRef, names: &[&str]) -> Self {
        Self {
            field_type,
            names: names.iter().map(|name| (*name).to_owned()).collect(),
            attribute_lists: Vec::new(),
            bound: true,
        }
    }

    /// Adds `[FromHierarchy(source)]` as its own attribute list.
    #[must_use]
    pub fn from_hierarchy(self, source: RetrievalSource) -> Self {
        self.attribute(ATTRIBUTE_SHORT_NAME, vec![Argument::source(source)])
    }

    /// Adds an attribute list holding a single attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str, arguments: Vec<Argument>) -> Self {
        self.attribute_lists.push(vec![AttributeSpec {
            name: name.to_owned(),
            arguments,
        }]);
        self
    }

    /// Leaves the declared variables without symbols, as an incomplete
    /// compilation would.
    #[must_use]
    pub const fn unbound(mut self) -> Self {
        self.bound = false;
        self
    }
}

#[derive(Debug)]
struct Declaration {
    symbol: NamedTypeSymbol,
    members: Vec<MemberSyntax>,
}

#[derive(Debug)]
struct PendingTree {
    path: String,
    declarations: Vec<Declaration>,
}

impl PendingTree {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            declarations: Vec::new(),
        }
    }
}

/// Assembles a [`CompilationSnapshot`] one declaration at a time.
#[derive(Debug)]
pub struct CompilationBuilder {
    finished: Vec<PendingTree>,
    current: PendingTree,
    facts: SnapshotFacts,
    next_node: u32,
    next_symbol: u64,
}

impl Default for CompilationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationBuilder {
    /// Starts a compilation with a single file named `Source0.cs`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: PendingTree::new("Source0.cs"),
            facts: SnapshotFacts::default(),
            next_node: 1,
            next_symbol: 1,
        }
    }

    /// Starts a new file; later declarations land in it.
    pub fn file(&mut self, path: &str) -> &mut Self {
        let previous = std::mem::replace(&mut self.current, PendingTree::new(path));
        self.finished.push(previous);
        self
    }

    /// Declares a top-level class and returns its symbol.
    pub fn class(&mut self, namespace: Option<&str>, name: &str) -> NamedTypeSymbol {
        let symbol = NamedTypeSymbol::new(self.symbol_id(), name, namespace);
        self.declare(&symbol);
        symbol
    }

    /// Declares a class nested inside `outer` and returns its symbol.
    pub fn nested_class(&mut self, outer: &NamedTypeSymbol, name: &str) -> NamedTypeSymbol {
        let mut symbol = NamedTypeSymbol::new(self.symbol_id(), name, outer.namespace.as_deref());
        symbol.containing_types = outer.containing_types.clone();
        symbol.containing_types.push(outer.name.clone());
        self.declare(&symbol);
        symbol
    }

    /// Adds a field declaration to `owner` in the current file.
    ///
    /// When `owner` was declared in an earlier file, a partial declaration
    /// of it is opened in the current one.
    pub fn field(&mut self, owner: &NamedTypeSymbol, spec: FieldSpec) -> &mut Self {
        let attribute_lists = spec
            .attribute_lists
            .iter()
            .map(|list| AttributeListSyntax {
                attributes: list
                    .iter()
                    .map(|attribute| self.attribute_syntax(attribute))
                    .collect(),
            })
            .collect();
        let variables: Vec<VariableDeclarator> = spec
            .names
            .into_iter()
            .map(|name| VariableDeclarator {
                id: self.node_id(),
                name,
            })
            .collect();
        if spec.bound {
            for variable in &variables {
                self.facts.fields.insert(
                    variable.id,
                    FieldSymbol {
                        name: variable.name.clone(),
                        field_type: spec.field_type.clone(),
                        containing_type: owner.clone(),
                    },
                );
            }
        }
        let field = MemberSyntax::Field(FieldSyntax {
            attribute_lists,
            type_syntax: spec.field_type.to_string(),
            variables,
        });
        let declarations = &mut self.current.declarations;
        let index = declarations
            .iter()
            .position(|declaration| declaration.symbol.id == owner.id)
            .unwrap_or_else(|| {
                declarations.push(Declaration {
                    symbol: owner.clone(),
                    members: Vec::new(),
                });
                declarations.len() - 1
            });
        if let Some(declaration) = declarations.get_mut(index) {
            declaration.members.push(field);
        }
        self
    }

    /// Finishes the compilation.
    #[must_use]
    pub fn build(self) -> CompilationSnapshot {
        let mut pending = self.finished;
        pending.push(self.current);
        let trees = pending
            .into_iter()
            .map(|tree| {
                let members = tree.declarations.into_iter().map(declaration_syntax);
                SyntaxTree {
                    path: tree.path,
                    members: members.collect(),
                }
            })
            .collect();
        CompilationSnapshot {
            trees,
            facts: self.facts,
        }
    }

    fn attribute_syntax(&mut self, attribute: &AttributeSpec) -> AttributeSyntax {
        let arguments = attribute
            .arguments
            .iter()
            .map(|argument| {
                let id = self.node_id();
                match argument {
                    Argument::Constant { text, value } => {
                        self.facts.constants.insert(id, value.clone());
                        ExpressionSyntax {
                            id,
                            text: text.clone(),
                        }
                    }
                    Argument::NonConstant(text) => ExpressionSyntax {
                        id,
                        text: text.clone(),
                    },
                }
            })
            .collect();
        AttributeSyntax {
            name: attribute.name.clone(),
            arguments,
        }
    }

    fn declare(&mut self, symbol: &NamedTypeSymbol) {
        self.current.declarations.push(Declaration {
            symbol: symbol.clone(),
            members: Vec::new(),
        });
    }

    fn node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn symbol_id(&mut self) -> SymbolId {
        let id = SymbolId(self.next_symbol);
        self.next_symbol += 1;
        id
    }
}

/// Wraps a declaration in its containing types and namespace.
fn declaration_syntax(declaration: Declaration) -> MemberSyntax {
    let Declaration { symbol, members } = declaration;
    let innermost = MemberSyntax::Type(TypeSyntax {
        name: symbol.name,
        members,
    });
    let nested = symbol
        .containing_types
        .into_iter()
        .rev()
        .fold(innermost, |inner, name| {
            MemberSyntax::Type(TypeSyntax {
                name,
                members: vec![inner],
            })
        });
    match symbol.namespace {
        Some(name) => MemberSyntax::Namespace(NamespaceSyntax {
            name,
            members: vec![nested],
        }),
        None => nested,
    }
}
