use tracing::{error, info};

use crate::enforcement::Outcome;
use crate::platform::{Platform, RepoRef};

/// Side effects selected by an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    NotifyOnly,
    NotifyAndRevoke,
}

/// What the workflow actually managed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub action: Action,
    /// Number of the created issue, if creation succeeded.
    pub issue: Option<u64>,
    pub revoked: bool,
}

/// Carry out an outcome against the platform.
///
/// The issue is always attempted before revocation. Failures are logged and
/// reflected in the report; a failed issue does not block revocation.
pub async fn execute(
    platform: &dyn Platform,
    outcome: Outcome,
    repo: &RepoRef,
    collaborator: &str,
) -> Report {
    match outcome {
        Outcome::Skip(reason) => {
            info!(%repo, collaborator, ?reason, "no action taken");
            Report {
                action: Action::Skip,
                issue: None,
                revoked: false,
            }
        }
        Outcome::Monitor(notice) => {
            let issue = file_issue(platform, repo, collaborator, &notice.title, &notice.body).await;
            Report {
                action: Action::NotifyOnly,
                issue,
                revoked: false,
            }
        }
        Outcome::Remove(notice, token) => {
            let issue = file_issue(platform, repo, collaborator, &notice.title, &notice.body).await;

            let revoked = match platform.remove_collaborator(repo, collaborator, token).await {
                Ok(()) => {
                    info!(%repo, collaborator, "collaborator removed");
                    true
                }
                Err(e) => {
                    error!(%repo, collaborator, operation = "remove_collaborator", error = %e, "failed to remove collaborator");
                    false
                }
            };

            Report {
                action: Action::NotifyAndRevoke,
                issue,
                revoked,
            }
        }
    }
}

async fn file_issue(
    platform: &dyn Platform,
    repo: &RepoRef,
    collaborator: &str,
    title: &str,
    body: &str,
) -> Option<u64> {
    match platform.create_issue(repo, title, body).await {
        Ok(issue) => {
            info!(%repo, collaborator, issue = issue.number, "issue created");
            Some(issue.number)
        }
        Err(e) => {
            error!(%repo, collaborator, operation = "create_issue", error = %e, "failed to create issue");
            None
        }
    }
}
