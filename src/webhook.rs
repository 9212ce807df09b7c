//! Webhook deliveries: payload model, routing, and conversion into [`Event`].

use serde::Deserialize;

use crate::error::SentryError;
use crate::platform::RepoRef;

/// Event name GitHub uses for collaborator changes.
pub const MEMBER_EVENT: &str = "member";
const ADDED_ACTION: &str = "added";

/// A collaborator was added to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Who added the collaborator.
    pub actor: String,
    /// The collaborator that was added.
    pub member: String,
    pub repository: RepoRef,
    /// Owner of the settings repo consulted for org-wide config.
    pub organization: String,
}

// --- Payload deserialization structs (private, map to the webhook JSON) ---

#[derive(Deserialize)]
struct MemberPayload {
    action: Option<String>,
    member: Option<Account>,
    repository: Option<RepositoryPayload>,
    organization: Option<Account>,
    sender: Option<Account>,
}

#[derive(Deserialize)]
struct Account {
    login: Option<String>,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    name: Option<String>,
    owner: Option<Account>,
}

fn login(account: Option<Account>, field: &str) -> Result<String, SentryError> {
    account
        .and_then(|a| a.login)
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| SentryError::MalformedEvent(format!("missing {field}.login")))
}

/// Parse one delivery.
///
/// Returns `Ok(None)` for anything other than a `member` event with action
/// `added`. Missing identity fields on an in-scope delivery are a
/// `MalformedEvent`.
pub fn parse_delivery(event_name: &str, body: &str) -> Result<Option<Event>, SentryError> {
    if event_name != MEMBER_EVENT {
        return Ok(None);
    }

    let payload: MemberPayload =
        serde_json::from_str(body).map_err(|e| SentryError::MalformedEvent(e.to_string()))?;

    if payload.action.as_deref() != Some(ADDED_ACTION) {
        return Ok(None);
    }

    let repository = payload
        .repository
        .ok_or_else(|| SentryError::MalformedEvent("missing repository".to_owned()))?;
    let name = repository
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| SentryError::MalformedEvent("missing repository.name".to_owned()))?;
    let owner = login(repository.owner, "repository.owner")?;

    // User-owned repositories carry no organization; their owner holds the settings repo.
    let organization = match payload.organization {
        Some(org) => login(Some(org), "organization")?,
        None => owner.clone(),
    };

    Ok(Some(Event {
        actor: login(payload.sender, "sender")?,
        member: login(payload.member, "member")?,
        repository: RepoRef { owner, name },
        organization,
    }))
}
