pub mod capability;

use capability::RevocationToken;

use crate::config::policy::PolicyConfig;
use crate::notify;
use crate::webhook::Event;

/// Why an event was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Removal disabled and not in monitor-only mode.
    Disabled,
    /// The added collaborator is on the exclusion list.
    Excluded,
}

/// Issue to file for a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

/// Result of policy evaluation. Exactly one per event.
#[derive(Debug)]
pub enum Outcome {
    Skip(SkipReason),
    Monitor(Notice),
    Remove(Notice, RevocationToken),
}

impl Outcome {
    /// Render the notice body (template, attribution, optional mention line).
    pub fn compose(self, actor: &str, cc_list: &str) -> Self {
        let render = |notice: Notice| Notice {
            body: notify::compose(&notice.body, actor, cc_list),
            title: notice.title,
        };
        match self {
            Outcome::Skip(reason) => Outcome::Skip(reason),
            Outcome::Monitor(notice) => Outcome::Monitor(render(notice)),
            Outcome::Remove(notice, token) => Outcome::Remove(render(notice), token),
        }
    }

    /// Short name for logs. Never includes the issue body.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Skip(SkipReason::Disabled) => "skip:disabled",
            Outcome::Skip(SkipReason::Excluded) => "skip:excluded",
            Outcome::Monitor(_) => "monitor",
            Outcome::Remove(_, _) => "remove",
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Skip(_) => None,
            Outcome::Monitor(notice) | Outcome::Remove(notice, _) => Some(notice),
        }
    }
}

/// Decide what to do about a newly added collaborator.
///
/// First match wins:
/// 1. removal disabled and not monitoring: skip
/// 2. collaborator excluded: skip (overrides monitor mode)
/// 3. monitor-only: file an issue, keep access
/// 4. otherwise: file an issue and revoke access
pub fn evaluate(config: &PolicyConfig, event: &Event) -> Outcome {
    if !config.removal_enabled && !config.monitor_only {
        return Outcome::Skip(SkipReason::Disabled);
    }

    if config.is_excluded(&event.member) {
        return Outcome::Skip(SkipReason::Excluded);
    }

    if config.monitor_only {
        return Outcome::Monitor(Notice {
            title: config.monitor_issue_title.clone(),
            body: config.monitor_issue_body.clone(),
        });
    }

    Outcome::Remove(
        Notice {
            title: config.removed_issue_title.clone(),
            body: config.removed_issue_body.clone(),
        },
        RevocationToken::new(),
    )
}
