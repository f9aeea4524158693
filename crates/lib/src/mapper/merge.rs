//! Merge flags, context and results.

use serde::Serialize;

use crate::registry::FieldRegistry;

/// Options controlling one merge call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeFlags {
    simulate: bool,
}

impl MergeFlags {
    pub const fn new() -> Self {
        Self { simulate: false }
    }

    /// Flags for a dry run that only reports conflicts.
    pub const fn simulated() -> Self {
        Self { simulate: true }
    }

    pub const fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Whether the merge only validates, leaving the live tree untouched.
    pub const fn simulate(&self) -> bool {
        self.simulate
    }
}

/// State shared by every mapper taking part in one merge.
///
/// Conflicts are appended in the order they are found and never abort sibling
/// merges. The registry receives the leaf fields a non-simulated merge introduces.
pub struct MergeContext<'a> {
    registry: &'a dyn FieldRegistry,
    flags: MergeFlags,
    conflicts: Vec<String>,
}

impl<'a> MergeContext<'a> {
    pub fn new(registry: &'a dyn FieldRegistry, flags: MergeFlags) -> Self {
        Self {
            registry,
            flags,
            conflicts: Vec::new(),
        }
    }

    pub fn flags(&self) -> MergeFlags {
        self.flags
    }

    /// The registry tracking the document's leaf fields.
    pub fn registry(&self) -> &'a dyn FieldRegistry {
        self.registry
    }

    pub fn add_conflict(&mut self, conflict: impl Into<String>) {
        let conflict = conflict.into();
        tracing::debug!(%conflict, "merge conflict");
        self.conflicts.push(conflict);
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn into_result(self) -> MergeResult {
        MergeResult {
            simulate: self.flags.simulate,
            conflicts: self.conflicts,
        }
    }
}

impl std::fmt::Debug for MergeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeContext")
            .field("flags", &self.flags)
            .field("conflicts", &self.conflicts)
            .finish_non_exhaustive()
    }
}

/// The outcome of a merge: every conflict found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    simulate: bool,
    conflicts: Vec<String>,
}

impl MergeResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Whether the merge ran as a dry run.
    pub fn simulated(&self) -> bool {
        self.simulate
    }

    pub fn into_conflicts(self) -> Vec<String> {
        self.conflicts
    }
}
