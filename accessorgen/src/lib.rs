//! Core crate for the `accessorgen` source generator.
//!
//! The generator augments C# types with memoized accessors for fields tagged
//! with the `[FromHierarchy(...)]` marker attribute. Each accessor resolves its
//! dependency lazily from the surrounding object hierarchy (the instance, its
//! descendants, or its ancestors) on first read and caches it in the backing
//! field afterwards.
//!
//! A generation pass is a pure function of the host's syntax trees and the
//! [`SemanticFacts`] capability the host injects:
//!
//! ```rust
//! use accessorgen::{CompilationSnapshot, Generator};
//!
//! let snapshot = CompilationSnapshot::default();
//! let output = Generator::new(&snapshot.facts).generate(&snapshot.trees);
//! assert_eq!(output.units.len(), 1, "only the attribute schema is emitted");
//! ```

pub mod diagnostics;
pub mod discovery;
mod error;
pub mod generator;
pub mod group;
pub mod naming;
pub mod resolve;
pub mod runtime;
pub mod schema;
pub mod semantic;
pub mod snapshot;
pub mod syntax;
pub mod synth;
mod unit;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::SnapshotError;
pub use generator::Generator;
pub use group::ClassGroup;
pub use naming::{AccessorName, FALLBACK_ACCESSOR_NAME, accessor_name};
pub use resolve::FieldDescriptor;
pub use schema::{RetrievalSource, SCHEMA_VERSION};
pub use semantic::{ConstantValue, FieldSymbol, NamedTypeSymbol, SemanticFacts, SymbolId, TypeRef};
pub use snapshot::{CompilationSnapshot, SnapshotFacts};
pub use syntax::SyntaxTree;
pub use synth::Strategy;
pub use unit::{GeneratedUnit, GenerationOutput};
