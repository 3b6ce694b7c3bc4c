use crate::scanner::ExclusionRules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pair of tree roots to reconcile.
///
/// The persisted keys keep their historical names (`kis_dir` for the
/// primary tree, `client_dir` for the secondary tree).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncProfile {
    #[serde(rename = "kis_dir", alias = "primary_dir")]
    pub primary_dir: String,
    #[serde(rename = "client_dir", alias = "secondary_dir")]
    pub secondary_dir: String,
}

/// The profiles document stored in ~/.docsync/profiles.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// File names excluded from every comparison (exact match)
    #[serde(default)]
    pub excluded_files: Vec<String>,

    /// Directory names excluded wherever they appear in a path
    #[serde(default)]
    pub excluded_dirs: Vec<String>,

    /// Map of profile name -> profile
    #[serde(default)]
    pub profiles: BTreeMap<String, SyncProfile>,
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the exclusion lists for a scan
    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(self.excluded_files.clone(), self.excluded_dirs.clone())
    }

    pub fn profile(&self, name: &str) -> Option<&SyncProfile> {
        self.profiles.get(name)
    }
}
