pub mod github;

use async_trait::async_trait;

use crate::enforcement::capability::RevocationToken;
use crate::error::SentryError;

/// Repository coordinates on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An issue created on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub url: Option<String>,
}

/// The three remote operations the enforcement workflow depends on.
///
/// `remove_collaborator` consumes a `RevocationToken`, so access can only be
/// revoked after the policy evaluator has decided on removal.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Raw (base64) content of a file. `SentryError::NotFound` when absent.
    async fn get_content(&self, owner: &str, repo: &str, path: &str) -> Result<String, SentryError>;

    async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue, SentryError>;

    async fn remove_collaborator(
        &self,
        repo: &RepoRef,
        username: &str,
        token: RevocationToken,
    ) -> Result<(), SentryError>;
}
