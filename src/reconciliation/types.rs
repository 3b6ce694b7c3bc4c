use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::SystemTime;

/// One of the two trees being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Primary,
    Secondary,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Primary => Side::Secondary,
            Side::Secondary => Side::Primary,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Primary => write!(f, "primary"),
            Side::Secondary => write!(f, "secondary"),
        }
    }
}

/// Two relative paths, one per tree, paired by base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedPair {
    pub primary_path: String,
    pub secondary_path: String,
    /// More than one file on either side shared this base name, so the
    /// pairing picked the first in path order
    pub ambiguous: bool,
    /// Creation times recorded by the scan, when the platform reports them
    pub primary_created: Option<SystemTime>,
    pub secondary_created: Option<SystemTime>,
}

impl MovedPair {
    /// Side whose placement is kept: the copy created last. Ties and
    /// unknown creation times keep the secondary placement.
    pub fn authoritative(&self) -> Side {
        match (self.primary_created, self.secondary_created) {
            (Some(p), Some(s)) if p > s => Side::Primary,
            _ => Side::Secondary,
        }
    }
}

/// Classification of every file across both trees.
///
/// A relative path appears in at most one category. Paths present in both
/// trees with equal modification times appear in none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub primary_only: BTreeSet<String>,
    pub secondary_only: BTreeSet<String>,
    /// Base name -> pair
    pub moved: BTreeMap<String, MovedPair>,
    /// Common relative path -> side holding the newer modification time
    pub updated: BTreeMap<String, Side>,
}

impl ReconciliationResult {
    pub fn is_in_sync(&self) -> bool {
        self.primary_only.is_empty()
            && self.secondary_only.is_empty()
            && self.moved.is_empty()
            && self.updated.is_empty()
    }

    pub fn summary(&self) -> ReconciliationSummary {
        ReconciliationSummary {
            primary_only: self.primary_only.len(),
            secondary_only: self.secondary_only.len(),
            moved: self.moved.len(),
            updated: self.updated.len(),
        }
    }
}

/// Counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub primary_only: usize,
    pub secondary_only: usize,
    pub moved: usize,
    pub updated: usize,
}

impl ReconciliationSummary {
    pub fn total(&self) -> usize {
        self.primary_only + self.secondary_only + self.moved + self.updated
    }
}
