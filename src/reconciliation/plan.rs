use super::types::{MovedPair, ReconciliationResult, Side};
use crate::scanner::FileTree;
use crate::utils::base_name;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Partition two scanned trees into primary-only, secondary-only, moved
/// and updated files.
///
/// Pure function of its inputs; iteration happens in path order so the
/// same trees always yield the same result.
pub fn reconcile_trees(primary: &FileTree, secondary: &FileTree) -> ReconciliationResult {
    let mut result = ReconciliationResult {
        primary_only: primary
            .keys()
            .filter(|path| !secondary.contains_key(*path))
            .cloned()
            .collect(),
        secondary_only: secondary
            .keys()
            .filter(|path| !primary.contains_key(*path))
            .cloned()
            .collect(),
        ..Default::default()
    };

    detect_moves(&mut result, primary, secondary);

    for (path, primary_entry) in primary {
        let Some(secondary_entry) = secondary.get(path) else {
            continue;
        };

        if primary_entry.modified > secondary_entry.modified {
            result.updated.insert(path.clone(), Side::Primary);
        } else if secondary_entry.modified > primary_entry.modified {
            result.updated.insert(path.clone(), Side::Secondary);
        }
    }

    debug!(
        primary_only = result.primary_only.len(),
        secondary_only = result.secondary_only.len(),
        moved = result.moved.len(),
        updated = result.updated.len(),
        "Reconciliation complete"
    );

    result
}

/// Pair primary-only and secondary-only files that share a base name.
///
/// Candidates are taken in path order. A base name is paired at most once,
/// so later primary files with an already-used name stay primary-only.
fn detect_moves(
    result: &mut ReconciliationResult,
    primary: &FileTree,
    secondary: &FileTree,
) {
    let mut secondary_by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in &result.secondary_only {
        secondary_by_name
            .entry(base_name(path).to_string())
            .or_default()
            .push(path.clone());
    }

    let mut primary_name_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for path in &result.primary_only {
        *primary_name_counts.entry(base_name(path)).or_default() += 1;
    }

    let mut paired_primary = BTreeSet::new();
    let mut paired_secondary = BTreeSet::new();

    for primary_path in &result.primary_only {
        let name = base_name(primary_path);
        if result.moved.contains_key(name) {
            continue;
        }

        let Some(candidates) = secondary_by_name.get_mut(name) else {
            continue;
        };
        if candidates.is_empty() {
            continue;
        }

        let ambiguous = candidates.len() > 1
            || primary_name_counts.get(name).copied().unwrap_or(0) > 1;
        let secondary_path = candidates.remove(0);

        if ambiguous {
            warn!(
                "Ambiguous move match for '{}': pairing '{}' with '{}'",
                name, primary_path, secondary_path
            );
        } else {
            debug!("Detected move of '{}': '{}' <-> '{}'", name, primary_path, secondary_path);
        }

        paired_primary.insert(primary_path.clone());
        paired_secondary.insert(secondary_path.clone());
        let secondary_created = secondary.get(&secondary_path).and_then(|e| e.created);
        result.moved.insert(
            name.to_string(),
            MovedPair {
                primary_path: primary_path.clone(),
                secondary_path,
                ambiguous,
                primary_created: primary.get(primary_path).and_then(|e| e.created),
                secondary_created,
            },
        );
    }

    result.primary_only.retain(|p| !paired_primary.contains(p));
    result.secondary_only.retain(|p| !paired_secondary.contains(p));
}
