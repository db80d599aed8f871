//! Outcome counters of a reconciliation step.

use std::fmt;

#[cfg(test)]
#[path = "apply_result_tests.rs"]
mod tests;

/// Result of applying one configuration section to one project or group.
///
/// Contains counters for the different outcomes of the item operations. In dry-run
/// mode the counters describe the changes that would have been made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Number of items created
    pub created: usize,

    /// Number of items updated
    pub updated: usize,

    /// Number of items deleted
    pub deleted: usize,

    /// Number of items that already matched or were skipped with a warning
    pub skipped: usize,

    /// Number of items that failed to apply
    pub failed: usize,

    /// Names of items that failed (for error reporting)
    pub failed_items: Vec<String>,
}

impl ApplyResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self {
            created: 0,
            updated: 0,
            deleted: 0,
            skipped: 0,
            failed: 0,
            failed_items: Vec::new(),
        }
    }

    /// Returns true if all operations succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if anything was created, updated or deleted.
    pub fn has_changes(&self) -> bool {
        self.created > 0 || self.updated > 0 || self.deleted > 0
    }

    pub(crate) fn record_failure(&mut self, item: impl Into<String>) {
        self.failed += 1;
        self.failed_items.push(item.into());
    }

    /// Adds the counters of `other` to this result.
    pub fn absorb(&mut self, other: ApplyResult) {
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failed_items.extend(other.failed_items);
    }
}

impl Default for ApplyResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} unchanged, {} failed",
            self.created, self.updated, self.deleted, self.skipped, self.failed
        )
    }
}
