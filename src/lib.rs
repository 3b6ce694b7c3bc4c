pub mod config;
pub mod document;
pub mod followup;
pub mod reconciliation;
pub mod scanner;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use config::{
    add_excluded_dir, add_excluded_file, add_profile, load_config_or_default, read_config,
    remove_profile, write_config, ConfigError, ResolvedProfile, SyncConfig, SyncProfile,
};
pub use document::{diff_documents, extract_text, DocumentDiff, ExtractError};
pub use followup::FollowUpLog;
pub use reconciliation::{
    execute_reconciliation, plan_actions, reconcile_trees, AutoApprove, ContentCheck, Decider,
    Decision, DryRun, ExecutionReport, MovedPair, ReconciliationResult, Side, SyncAction,
    SyncRoots,
};
pub use scanner::{ExclusionRules, FileEntry, FileTree, ScanError, ScanOutcome, TreeScanner};
pub use sync::{compare_roots, prepare_sync, run_sync, SyncError, SyncPlan};
