//! Synthesis of augmenting partial declarations.
//!
//! Each owner group becomes one unit holding a `partial` declaration of the
//! owner, wrapped in its namespace and enclosing types, with one memoized
//! accessor per field:
//!
//! ```text
//! private Body Body => _body is null
//!     ? (_body = GetComponent<Body>())
//!     : _body;
//! ```

mod strategy;
mod writer;

use std::collections::HashSet;

use tracing::{debug, trace};

pub use strategy::{LookupScope, Plurality, Strategy};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::group::ClassGroup;
use crate::naming::accessor_name;
use crate::resolve::FieldDescriptor;
use crate::semantic::NamedTypeSymbol;
use crate::unit::GeneratedUnit;
use writer::CodeWriter;

/// Suffix appended to the owner's qualified name to form a unit name.
pub const GENERATED_UNIT_SUFFIX: &str = ".g.cs";

const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>";

/// Returns the unit name for `owner`, e.g. `Game.Player.g.cs`.
///
/// The qualified name keeps same-named types from different namespaces in
/// separate units.
#[must_use]
pub fn unit_name(owner: &NamedTypeSymbol) -> String {
    format!("{}{GENERATED_UNIT_SUFFIX}", owner.qualified_name())
}

/// Synthesizes the unit for `group`, or `None` when it has no fields.
///
/// Fallbacks taken while rendering are appended to `diagnostics`.
pub fn synthesize(group: &ClassGroup, diagnostics: &mut Vec<Diagnostic>) -> Option<GeneratedUnit> {
    if group.is_empty() {
        return None;
    }
    let owner = &group.owner;
    let owner_name = owner.qualified_name();
    let mut writer = CodeWriter::new();
    writer.line(AUTO_GENERATED_HEADER);

    if let Some(namespace) = &owner.namespace {
        writer.open_block(&format!("namespace {namespace}"));
    }
    for container in &owner.containing_types {
        writer.open_block(&format!("partial class {container}"));
    }
    writer.open_block(&format!("public partial class {}", owner.name));

    let mut seen = HashSet::new();
    for (index, field) in group.fields.iter().enumerate() {
        if index > 0 {
            writer.blank();
        }
        let accessor = write_accessor(&mut writer, field, &owner_name, diagnostics);
        if !seen.insert(accessor.clone()) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::DuplicateAccessor,
                    format!("accessor `{accessor}` is generated more than once"),
                )
                .with_owner(&owner_name)
                .with_field(&field.field_name),
            );
        }
    }

    writer.close_block();
    for _ in &owner.containing_types {
        writer.close_block();
    }
    if owner.namespace.is_some() {
        writer.close_block();
    }

    let name = unit_name(owner);
    debug!(owner = %owner_name, unit = %name, accessors = group.fields.len(), "synthesized unit");
    Some(GeneratedUnit::new(name, writer.finish()))
}

/// Writes one accessor and returns its name.
fn write_accessor(
    writer: &mut CodeWriter,
    field: &FieldDescriptor,
    owner_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let name = accessor_name(&field.field_name);
    if name.is_fallback() {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::FallbackIdentifier,
                format!("field name has no lowercase letter; accessor named `{name}`"),
            )
            .with_owner(owner_name)
            .with_field(&field.field_name),
        );
    }

    let strategy = Strategy::for_source(field.source, field.declared_type.is_array())
        .unwrap_or_else(|| {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::NonCanonicalSource,
                    format!(
                        "retrieval source {} is not a single flag; using the self lookup",
                        field.source.bits()
                    ),
                )
                .with_owner(owner_name)
                .with_field(&field.field_name),
            );
            Strategy::FALLBACK
        });

    let backing = &field.field_name;
    let ty = &field.declared_type;
    let call = strategy.render_call(ty);
    trace!(field = %backing, accessor = %name, call = %call, "rendering accessor");

    writer.line(&format!("private {ty} {name} => {backing} is null"));
    writer.line(&format!("    ? ({backing} = {call})"));
    writer.line(&format!("    : {backing};"));
    name.as_str().to_owned()
}
