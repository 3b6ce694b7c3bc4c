//! Interactive decisions for the sync command
//!
//! Uses dialoguer for yes/no confirmation and prints document diffs in color.

use colored::Colorize;
use dialoguer::Confirm;
use docsync::reconciliation::{ContentCheck, Decider, Decision, SyncAction, SyncRoots};
use docsync::DocumentDiff;
use tracing::{info, warn};

/// Asks the user about each action; "no" postpones it as a follow-up task.
/// An interrupted or failed prompt aborts the run.
pub struct PromptDecider;

impl Decider for PromptDecider {
    fn decide(&mut self, action: &SyncAction, roots: &SyncRoots) -> Decision {
        present(action, roots);

        let answer = Confirm::new()
            .with_prompt(action.question(roots))
            .default(false)
            .interact();
        answer_to_decision(answer)
    }
}

fn answer_to_decision(answer: dialoguer::Result<bool>) -> Decision {
    match answer {
        Ok(true) => Decision::Apply,
        Ok(false) => Decision::Defer,
        Err(e) => {
            warn!("Prompt interrupted: {}", e);
            Decision::Abort
        }
    }
}

/// Whether the two copies are equal and only their dates disagree
fn only_dates_differ(action: &SyncAction) -> bool {
    matches!(action, SyncAction::Update(u) if content_matches(&u.content))
}

fn content_matches(content: &ContentCheck) -> bool {
    matches!(
        content,
        ContentCheck::Identical | ContentCheck::Differs(DocumentDiff::Identical)
    )
}

fn present(action: &SyncAction, roots: &SyncRoots) {
    match action {
        SyncAction::Create {
            relative_path,
            from,
        } => info!(
            "File {} found on {} only, missing on {}.",
            relative_path,
            roots.label(*from),
            roots.label(from.other())
        ),
        SyncAction::Move(m) => {
            if m.ambiguous {
                warn!(
                    "More than one file is named '{}'; check that these two belong together.",
                    m.name
                );
            }
            present_content(&m.content);
        }
        SyncAction::Update(u) => present_content(&u.content),
    }
    if only_dates_differ(action) {
        info!("Copying is recommended to synchronize the modified date.");
    }
}

fn present_content(content: &ContentCheck) {
    match content {
        ContentCheck::Identical | ContentCheck::Differs(DocumentDiff::Identical) => {
            info!("The file content is the same on both sides.");
        }
        ContentCheck::Differs(DocumentDiff::Changed(diff)) => print_diff(diff),
        ContentCheck::Differs(DocumentDiff::Unsupported) => {
            println!("{}", "(diff unsupported for this file type)".dimmed());
        }
        ContentCheck::Unknown(e) => warn!("Could not compare contents: {}", e),
    }
}

fn print_diff(diff: &str) {
    println!("\nShowing diff:");
    for line in diff.lines() {
        if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync::reconciliation::{MoveAction, Side, UpdateAction};
    use std::io;

    #[test]
    fn test_interrupted_prompt_aborts() {
        let answer = Err(dialoguer::Error::IO(io::Error::from(io::ErrorKind::Interrupted)));
        assert_eq!(answer_to_decision(answer), Decision::Abort);
        assert_eq!(answer_to_decision(Ok(true)), Decision::Apply);
        assert_eq!(answer_to_decision(Ok(false)), Decision::Defer);
    }

    #[test]
    fn test_date_hint_only_for_updates() {
        let update = SyncAction::Update(UpdateAction {
            relative_path: "a.txt".to_string(),
            latest: Side::Primary,
            content: ContentCheck::Identical,
        });
        let moved = SyncAction::Move(MoveAction {
            name: "a.txt".to_string(),
            tree: Side::Primary,
            from_path: "x/a.txt".to_string(),
            to_path: "y/a.txt".to_string(),
            authoritative: Side::Secondary,
            content: ContentCheck::Identical,
            ambiguous: false,
        });
        let changed = SyncAction::Update(UpdateAction {
            relative_path: "b.txt".to_string(),
            latest: Side::Secondary,
            content: ContentCheck::Differs(DocumentDiff::Unsupported),
        });

        assert!(only_dates_differ(&update));
        assert!(!only_dates_differ(&moved));
        assert!(!only_dates_differ(&changed));
    }
}
