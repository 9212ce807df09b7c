#![allow(dead_code)]

use std::sync::{Mutex, Once};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use collab_sentry::enforcement::capability::RevocationToken;
use collab_sentry::error::SentryError;
use collab_sentry::platform::{Issue, Platform, RepoRef};

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(true))
            .with(filter)
            .init();
    });
}

/// One remote call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetContent { owner: String, repo: String, path: String },
    CreateIssue { repo: RepoRef, title: String, body: String },
    RemoveCollaborator { repo: RepoRef, username: String },
}

/// In-memory platform that records every call.
#[derive(Default)]
pub struct RecordingPlatform {
    /// Org config YAML served by `get_content`; `None` answers NotFound.
    pub config_yaml: Option<String>,
    /// Raw content returned verbatim instead of encoding `config_yaml`.
    pub raw_content: Option<String>,
    pub fail_create_issue: bool,
    pub fail_remove: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl RecordingPlatform {
    pub fn with_config(yaml: &str) -> Self {
        Self {
            config_yaml: Some(yaml.to_owned()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Calls other than config fetches.
    pub fn side_effects(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::GetContent { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn get_content(&self, owner: &str, repo: &str, path: &str) -> Result<String, SentryError> {
        self.record(Call::GetContent {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            path: path.to_owned(),
        });
        if let Some(raw) = &self.raw_content {
            return Ok(raw.clone());
        }
        match &self.config_yaml {
            Some(yaml) => Ok(STANDARD.encode(yaml)),
            None => Err(SentryError::NotFound(format!("{owner}/{repo}/{path}"))),
        }
    }

    async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue, SentryError> {
        self.record(Call::CreateIssue {
            repo: repo.clone(),
            title: title.to_owned(),
            body: body.to_owned(),
        });
        if self.fail_create_issue {
            return Err(SentryError::Platform("issues are disabled".to_owned()));
        }
        Ok(Issue { number: 7, url: None })
    }

    async fn remove_collaborator(
        &self,
        repo: &RepoRef,
        username: &str,
        _token: RevocationToken,
    ) -> Result<(), SentryError> {
        self.record(Call::RemoveCollaborator {
            repo: repo.clone(),
            username: username.to_owned(),
        });
        if self.fail_remove {
            return Err(SentryError::Platform("must have admin rights".to_owned()));
        }
        Ok(())
    }
}
