//! A single sync run: validate the profile, scan both trees, reconcile,
//! then hand each corrective action to a decider.

use crate::config::{ConfigError, SyncConfig};
use crate::followup::FollowUpLog;
use crate::reconciliation::{
    execute_reconciliation, reconcile_trees, Decider, ExecutionReport, ReconciliationResult,
    SyncRoots,
};
use crate::scanner::{ScanError, ScanOutcome, ScanWarning, TreeScanner};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Label used for the primary tree in prompts and logs
pub const PRIMARY_LABEL: &str = "primary";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    ScanError(#[from] ScanError),

    #[error("Scan task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

/// Comparison of two trees, ready to be executed
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub roots: SyncRoots,
    pub result: ReconciliationResult,
    /// Files that could not be read in either tree
    pub warnings: Vec<ScanWarning>,
}

/// Look up and validate a profile, then compare its two trees
pub async fn prepare_sync(
    config: &SyncConfig,
    profile_name: &str,
    cancel_flag: Option<Arc<AtomicBool>>,
) -> Result<SyncPlan, SyncError> {
    let profile = config
        .profile(profile_name)
        .ok_or_else(|| ConfigError::ProfileNotFound(profile_name.to_string()))?;
    let resolved = profile.validate(profile_name)?;

    let roots = SyncRoots::new(resolved.primary, resolved.secondary)
        .with_labels(PRIMARY_LABEL, resolved.name);

    let mut scanner = TreeScanner::new(config.exclusion_rules());
    if let Some(flag) = cancel_flag {
        scanner = scanner.with_cancel(flag);
    }

    compare_roots(roots, scanner).await
}

/// Scan both roots concurrently and reconcile the results
pub async fn compare_roots(roots: SyncRoots, scanner: TreeScanner) -> Result<SyncPlan, SyncError> {
    info!(
        "Comparing {} ({}) and {} ({})",
        roots.primary_label,
        roots.primary.display(),
        roots.secondary_label,
        roots.secondary.display()
    );
    debug!(
        "Excluded files: {:?}",
        scanner.rules().excluded_files().collect::<Vec<_>>()
    );
    debug!(
        "Excluded dirs: {:?}",
        scanner.rules().excluded_dirs().collect::<Vec<_>>()
    );

    let (primary, secondary) = tokio::try_join!(
        scan_blocking(scanner.clone(), roots.primary.clone()),
        scan_blocking(scanner, roots.secondary.clone())
    )?;

    let result = reconcile_trees(&primary.files, &secondary.files);

    let mut warnings = primary.warnings;
    warnings.extend(secondary.warnings);

    Ok(SyncPlan {
        roots,
        result,
        warnings,
    })
}

async fn scan_blocking(scanner: TreeScanner, root: PathBuf) -> Result<ScanOutcome, SyncError> {
    let outcome = tokio::task::spawn_blocking(move || scanner.scan(&root)).await??;
    Ok(outcome)
}

/// Log the per-category counts of a plan
pub fn log_summary(plan: &SyncPlan) {
    let summary = plan.result.summary();
    let roots = &plan.roots;

    info!("Sync Summary:");
    info!(
        "- {} files to be created on {}.",
        summary.primary_only, roots.secondary_label
    );
    info!(
        "- {} files to be created on {}.",
        summary.secondary_only, roots.primary_label
    );
    info!("- {} files have been moved.", summary.moved);
    info!("- {} files have been updated.", summary.updated);
    if !plan.warnings.is_empty() {
        info!("- {} files could not be read and were skipped.", plan.warnings.len());
    }
}

/// Execute a plan, asking the decider about every action
pub fn run_sync(
    plan: &SyncPlan,
    decider: &mut dyn Decider,
    follow_up: &FollowUpLog,
) -> ExecutionReport {
    if plan.result.is_in_sync() {
        info!(
            "{} and {} are already in sync.",
            plan.roots.primary_label, plan.roots.secondary_label
        );
        return ExecutionReport::default();
    }

    execute_reconciliation(&plan.roots, &plan.result, decider, follow_up)
}
