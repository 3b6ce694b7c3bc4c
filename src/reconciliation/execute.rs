use super::types::{MovedPair, ReconciliationResult, Side};
use crate::document::{diff_documents, DocumentDiff};
use crate::followup::FollowUpLog;
use crate::utils::{files_identical, join_relative};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Source file {0} does not exist")]
    SourceMissing(PathBuf),
}

/// Roots and display labels of the two trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRoots {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub primary_label: String,
    pub secondary_label: String,
}

impl SyncRoots {
    pub fn new(primary: impl Into<PathBuf>, secondary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            primary_label: "primary".to_string(),
            secondary_label: "secondary".to_string(),
        }
    }

    pub fn with_labels(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_label = primary.into();
        self.secondary_label = secondary.into();
        self
    }

    pub fn root(&self, side: Side) -> &Path {
        match side {
            Side::Primary => &self.primary,
            Side::Secondary => &self.secondary,
        }
    }

    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::Primary => &self.primary_label,
            Side::Secondary => &self.secondary_label,
        }
    }

    /// Absolute location of a relative path inside one tree
    pub fn path(&self, side: Side, relative_path: &str) -> PathBuf {
        join_relative(self.root(side), relative_path)
    }
}

/// Result of comparing the bytes of the two copies of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCheck {
    Identical,
    /// Bytes differ; carries the text diff from the outdated copy to the latest
    Differs(DocumentDiff),
    /// One of the copies could not be read
    Unknown(String),
}

/// Relocate a file inside the tree that does not match the authoritative
/// placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAction {
    pub name: String,
    /// Tree in which the file is moved
    pub tree: Side,
    pub from_path: String,
    pub to_path: String,
    /// Side whose placement is kept (newer creation time)
    pub authoritative: Side,
    pub content: ContentCheck,
    pub ambiguous: bool,
}

/// Copy the newer copy of a common file over the older one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAction {
    pub relative_path: String,
    pub latest: Side,
    pub content: ContentCheck,
}

/// A corrective operation derived from the reconciliation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy a file that exists only in `from` to the same relative path in
    /// the other tree
    Create { relative_path: String, from: Side },
    Move(MoveAction),
    Update(UpdateAction),
}

impl SyncAction {
    /// Path used to identify the action in reports
    pub fn relative_path(&self) -> &str {
        match self {
            SyncAction::Create { relative_path, .. } => relative_path,
            SyncAction::Move(m) => &m.from_path,
            SyncAction::Update(u) => &u.relative_path,
        }
    }

    /// Yes/no question asked before applying the action
    pub fn question(&self, roots: &SyncRoots) -> String {
        match self {
            SyncAction::Create { relative_path, from } => format!(
                "Copy {} from {} to {}?",
                relative_path,
                roots.label(*from),
                roots.label(from.other())
            ),
            SyncAction::Move(m) => format!(
                "Move {} on {} from '/{}' to '/{}' to match {}?",
                m.name,
                roots.label(m.tree),
                m.from_path,
                m.to_path,
                roots.label(m.authoritative)
            ),
            SyncAction::Update(u) => format!(
                "Copy '{}' from {} to {}?",
                u.relative_path,
                roots.label(u.latest),
                roots.label(u.latest.other())
            ),
        }
    }

    /// Note recorded when the decision is postponed
    pub fn follow_up_note(&self, roots: &SyncRoots) -> String {
        match self {
            SyncAction::Create { relative_path, from } => {
                let to = from.other();
                format!(
                    "You chose NOT to copy '{}' from {} to {}.\nPlease manually check:\n - {} path: {}\n - {} path: {}\n",
                    relative_path,
                    roots.label(*from),
                    roots.label(to),
                    roots.label(*from),
                    roots.path(*from, relative_path).display(),
                    roots.label(to),
                    roots.path(to, relative_path).display()
                )
            }
            SyncAction::Move(m) => format!(
                "You chose NOT to move '{}' from '{}' path '/{}' to '/{}' to match '{}'.\nPlease manually check:\n - Outdated file path: {}\n - Destination path: {}\n",
                m.name,
                roots.label(m.tree),
                m.from_path,
                m.to_path,
                roots.label(m.authoritative),
                roots.path(m.tree, &m.from_path).display(),
                roots.path(m.tree, &m.to_path).display()
            ),
            SyncAction::Update(u) => format!(
                "You chose NOT to copy '{}' from {} to {}.\nPlease manually check:\n - Latest file: {}\n - Outdated file: {}\n",
                u.relative_path,
                roots.label(u.latest),
                roots.label(u.latest.other()),
                roots.path(u.latest, &u.relative_path).display(),
                roots.path(u.latest.other(), &u.relative_path).display()
            ),
        }
    }
}

/// What to do with a planned action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Apply,
    Skip,
    /// Leave it for later and record a follow-up note
    Defer,
    /// Stop the run; this action and the remaining ones are left unasked
    Abort,
}

/// Chooses a [`Decision`] for each planned action
pub trait Decider {
    fn decide(&mut self, action: &SyncAction, roots: &SyncRoots) -> Decision;
}

/// Applies every action
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl Decider for AutoApprove {
    fn decide(&mut self, _action: &SyncAction, _roots: &SyncRoots) -> Decision {
        Decision::Apply
    }
}

/// Applies nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl Decider for DryRun {
    fn decide(&mut self, action: &SyncAction, roots: &SyncRoots) -> Decision {
        info!("[dry-run] {}", action.question(roots));
        Decision::Skip
    }
}

/// An action that was attempted and failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub path: String,
    pub message: String,
}

/// Result of executing a list of actions
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub deferred: Vec<String>,
    pub failed: Vec<ActionFailure>,
    /// Actions never decided because the run was aborted
    pub unasked: Vec<String>,
}

impl ExecutionReport {
    pub fn was_aborted(&self) -> bool {
        !self.unasked.is_empty()
    }
}

/// Turn a reconciliation result into concrete actions.
///
/// Order: files to create in the secondary tree, files to create in the
/// primary tree, moves, updates. Moved pairs whose files disappeared since
/// the scan are dropped with a warning.
pub fn plan_actions(roots: &SyncRoots, result: &ReconciliationResult) -> Vec<SyncAction> {
    let mut actions = Vec::new();

    for relative_path in &result.primary_only {
        actions.push(SyncAction::Create {
            relative_path: relative_path.clone(),
            from: Side::Primary,
        });
    }

    for relative_path in &result.secondary_only {
        actions.push(SyncAction::Create {
            relative_path: relative_path.clone(),
            from: Side::Secondary,
        });
    }

    for (name, pair) in &result.moved {
        if let Some(action) = plan_move(roots, name, pair) {
            actions.push(SyncAction::Move(action));
        }
    }

    for (relative_path, latest) in &result.updated {
        actions.push(SyncAction::Update(plan_update(roots, relative_path, *latest)));
    }

    actions
}

fn check_content(outdated: &Path, latest: &Path) -> ContentCheck {
    match files_identical(outdated, latest) {
        Ok(true) => ContentCheck::Identical,
        Ok(false) => ContentCheck::Differs(diff_documents(outdated, latest)),
        Err(e) => ContentCheck::Unknown(e.to_string()),
    }
}

fn plan_move(roots: &SyncRoots, name: &str, pair: &MovedPair) -> Option<MoveAction> {
    let primary_abs = roots.path(Side::Primary, &pair.primary_path);
    let secondary_abs = roots.path(Side::Secondary, &pair.secondary_path);

    debug!("Primary relative path: {}", pair.primary_path);
    debug!("Secondary relative path: {}", pair.secondary_path);

    if !primary_abs.exists() || !secondary_abs.exists() {
        warn!("Skipping move of '{}': one of the copies no longer exists", name);
        return None;
    }

    let authoritative = pair.authoritative();

    let (latest_abs, outdated_abs, from_path, to_path) = match authoritative {
        Side::Primary => (
            primary_abs,
            secondary_abs,
            pair.secondary_path.clone(),
            pair.primary_path.clone(),
        ),
        Side::Secondary => (
            secondary_abs,
            primary_abs,
            pair.primary_path.clone(),
            pair.secondary_path.clone(),
        ),
    };

    let content = check_content(&outdated_abs, &latest_abs);
    match &content {
        ContentCheck::Identical => info!(
            "The file '{}' was moved on {} (file content is the same in both).",
            name,
            roots.label(authoritative)
        ),
        ContentCheck::Differs(_) => warn!(
            "Potentially conflicting move for '{}'. Files differ and were moved. Proceed with caution.",
            name
        ),
        ContentCheck::Unknown(e) => warn!("Could not compare both copies of '{}': {}", name, e),
    }

    Some(MoveAction {
        name: name.to_string(),
        tree: authoritative.other(),
        from_path,
        to_path,
        authoritative,
        content,
        ambiguous: pair.ambiguous,
    })
}

fn plan_update(roots: &SyncRoots, relative_path: &str, latest: Side) -> UpdateAction {
    let latest_abs = roots.path(latest, relative_path);
    let outdated_abs = roots.path(latest.other(), relative_path);

    info!(
        "The file '{}' was modified on {}.",
        relative_path,
        roots.label(latest)
    );

    UpdateAction {
        relative_path: relative_path.to_string(),
        latest,
        content: check_content(&outdated_abs, &latest_abs),
    }
}

/// Perform one action on disk
pub fn apply_action(roots: &SyncRoots, action: &SyncAction) -> Result<(), ExecuteError> {
    match action {
        SyncAction::Create {
            relative_path,
            from,
        } => copy_preserving_times(
            &roots.path(*from, relative_path),
            &roots.path(from.other(), relative_path),
        ),
        SyncAction::Move(m) => {
            let source = roots.path(m.tree, &m.from_path);
            let destination = roots.path(m.tree, &m.to_path);
            if !source.exists() {
                return Err(ExecuteError::SourceMissing(source));
            }
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&source, &destination)?;
            Ok(())
        }
        SyncAction::Update(u) => copy_preserving_times(
            &roots.path(u.latest, &u.relative_path),
            &roots.path(u.latest.other(), &u.relative_path),
        ),
    }
}

/// Copy a file, carrying over its access and modification times
fn copy_preserving_times(source: &Path, destination: &Path) -> Result<(), ExecuteError> {
    if !source.is_file() {
        return Err(ExecuteError::SourceMissing(source.to_path_buf()));
    }

    let metadata = fs::metadata(source)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(source, destination)?;
    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;

    Ok(())
}

/// Ask the decider about each action and carry out the approved ones.
///
/// Failures are recorded per action and do not stop the remaining ones.
/// A [`Decision::Abort`] stops the loop without touching the rest.
pub fn execute_actions(
    roots: &SyncRoots,
    actions: &[SyncAction],
    decider: &mut dyn Decider,
    follow_up: &FollowUpLog,
) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for (index, action) in actions.iter().enumerate() {
        let path = action.relative_path().to_string();

        match decider.decide(action, roots) {
            Decision::Apply => match apply_action(roots, action) {
                Ok(()) => {
                    info!("Applied: {}", action.question(roots).trim_end_matches('?'));
                    report.applied.push(path);
                }
                Err(e) => {
                    error!("Failed to apply action for '{}': {}", path, e);
                    report.failed.push(ActionFailure {
                        path,
                        message: e.to_string(),
                    });
                }
            },
            Decision::Skip => report.skipped.push(path),
            Decision::Defer => {
                if let Err(e) = follow_up.append(&action.follow_up_note(roots)) {
                    warn!(
                        "Failed to write follow-up note to {}: {}",
                        follow_up.path().display(),
                        e
                    );
                }
                report.deferred.push(path);
            }
            Decision::Abort => {
                warn!("Sync aborted; {} action(s) left unasked", actions.len() - index);
                report.unasked = actions[index..]
                    .iter()
                    .map(|a| a.relative_path().to_string())
                    .collect();
                break;
            }
        }
    }

    report
}

/// Plan and execute all actions for a reconciliation result
pub fn execute_reconciliation(
    roots: &SyncRoots,
    result: &ReconciliationResult,
    decider: &mut dyn Decider,
    follow_up: &FollowUpLog,
) -> ExecutionReport {
    let actions = plan_actions(roots, result);
    execute_actions(roots, &actions, decider, follow_up)
}
