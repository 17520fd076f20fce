//! The generation pass.
//!
//! [`Generator::generate`] runs schema emission, discovery, resolution,
//! grouping, and synthesis in that order. The generator holds nothing but a
//! borrowed facts capability, so the same inputs always yield the same
//! output and the pass can be repeated or memoized freely.

use std::collections::HashSet;

use tracing::{debug, info_span};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::discovery::discover_fields;
use crate::group::group_by_owner;
use crate::resolve::resolve_fields;
use crate::schema::schema_unit;
use crate::semantic::SemanticFacts;
use crate::synth::{GENERATED_UNIT_SUFFIX, synthesize};
use crate::syntax::SyntaxTree;
use crate::unit::GenerationOutput;

/// Runs generation passes against one semantic-facts provider.
#[derive(Clone, Copy)]
pub struct Generator<'f> {
    facts: &'f dyn SemanticFacts,
}

impl<'f> Generator<'f> {
    /// Creates a generator that consults `facts` during resolution.
    #[must_use]
    pub const fn new(facts: &'f dyn SemanticFacts) -> Self {
        Self { facts }
    }

    /// Runs one pass over `trees`.
    ///
    /// The schema unit is always first, followed by one unit per owner type
    /// with at least one resolved field. Unit names are unique within the
    /// output; an owner whose name is already taken gets a numbered name and
    /// a [`DiagnosticKind::DuplicateUnitName`] diagnostic.
    #[must_use]
    pub fn generate(&self, trees: &[SyntaxTree]) -> GenerationOutput {
        let span = info_span!("generate", trees = trees.len());
        let _entered = span.enter();

        let mut output = GenerationOutput::default();
        output.units.push(schema_unit());

        let discovered = discover_fields(trees);
        debug!(declarations = discovered.len(), "discovery complete");

        let resolution = resolve_fields(&discovered, self.facts);
        debug!(
            descriptors = resolution.descriptors.len(),
            dropped = resolution.diagnostics.len(),
            "resolution complete"
        );
        output.diagnostics = resolution.diagnostics;

        let groups = group_by_owner(resolution.descriptors);
        debug!(groups = groups.len(), "grouping complete");

        let mut taken: HashSet<String> = output
            .units
            .iter()
            .map(|unit| unit.name.clone())
            .collect();
        for group in &groups {
            let Some(mut unit) = synthesize(group, &mut output.diagnostics) else {
                continue;
            };
            if !taken.insert(unit.name.clone()) {
                let renamed = numbered_unit_name(&unit.name, &taken);
                let message = format!("unit `{}` is taken; emitted as `{renamed}`", unit.name);
                let diagnostic = Diagnostic::new(DiagnosticKind::DuplicateUnitName, message)
                    .with_owner(group.owner.qualified_name());
                output.diagnostics.push(diagnostic);
                taken.insert(renamed.clone());
                unit.name = renamed;
            }
            output.units.push(unit);
        }
        debug!(
            units = output.units.len(),
            diagnostics = output.diagnostics.len(),
            "generation complete"
        );
        output
    }
}

/// First free `<stem>.<n>.g.cs` name, counting from 2.
fn numbered_unit_name(name: &str, taken: &HashSet<String>) -> String {
    let stem = name.strip_suffix(GENERATED_UNIT_SUFFIX).unwrap_or(name);
    let mut index = 2_usize;
    loop {
        let candidate = format!("{stem}.{index}{GENERATED_UNIT_SUFFIX}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

impl std::fmt::Debug for Generator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("facts", &"<semantic facts>")
            .finish()
    }
}
