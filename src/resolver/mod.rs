// src/resolver/mod.rs

use std::fmt;

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Leaf name of a generated project directory, as accepted by the
/// download endpoint. Empty means there is nothing to retrieve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactReference(String);

impl ArtifactReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final segment of a server-side path. Both `/` and `\` count as
/// separators, and trailing separators are ignored. No file-system access.
pub fn resolve_artifact(directory: &str) -> ArtifactReference {
    let trimmed = directory.trim_end_matches(SEPARATORS);
    let leaf = trimmed
        .rsplit(SEPARATORS)
        .next()
        .unwrap_or_default();
    ArtifactReference(leaf.to_string())
}
