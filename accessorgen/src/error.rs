//! Error types for loading compilation snapshots.

use thiserror::Error;

/// Errors raised while decoding or encoding a [`crate::CompilationSnapshot`].
///
/// The generation pass itself never fails; only the snapshot boundary does.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The snapshot JSON could not be parsed.
    #[error("failed to parse compilation snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    /// The snapshot could not be serialized for fingerprinting.
    #[error("failed to encode compilation snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Two variables or expressions share a node identifier.
    #[error("node id {id} is declared more than once in tree '{path}'")]
    DuplicateNode {
        /// Offending node identifier.
        id: u32,
        /// Tree in which the duplicate was found.
        path: String,
    },
}
