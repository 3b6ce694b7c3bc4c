mod execute;
mod plan;
mod types;

pub use execute::{
    apply_action, execute_actions, execute_reconciliation, plan_actions, ActionFailure,
    AutoApprove, ContentCheck, Decider, Decision, DryRun, ExecuteError, ExecutionReport,
    MoveAction, SyncAction, SyncRoots, UpdateAction,
};
pub use plan::reconcile_trees;
pub use types::{MovedPair, ReconciliationResult, ReconciliationSummary, Side};
