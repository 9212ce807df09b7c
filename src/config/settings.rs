use secrecy::SecretString;

use crate::error::SentryError;

pub const DEFAULT_ORG_WIDE_REPO_NAME: &str = "org-settings";
pub const DEFAULT_FILE_NAME: &str = ".github/remove-outside-collaborators.yml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Where the organization-wide config lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Repository (inside the organization) holding the shared config.
    pub repo: String,
    /// Path of the config file within `repo`.
    pub path: String,
}

impl Default for ConfigLocation {
    fn default() -> Self {
        Self {
            repo: DEFAULT_ORG_WIDE_REPO_NAME.to_owned(),
            path: DEFAULT_FILE_NAME.to_owned(),
        }
    }
}

/// Process-level settings. Built once at startup and passed explicitly to
/// the components that need them.
#[derive(Debug)]
pub struct Settings {
    pub location: ConfigLocation,
    pub api_url: String,
    pub token: Option<SecretString>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SentryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SentryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(SentryError::Settings(format!(
                "GITHUB_API_URL must be an http(s) URL, got '{api_url}'"
            )));
        }

        let path = get("FILE_NAME").unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned());
        let path = path.trim_start_matches('/').to_owned();
        if path.is_empty() {
            return Err(SentryError::Settings("FILE_NAME must name a file".to_owned()));
        }

        Ok(Self {
            location: ConfigLocation {
                repo: get("ORG_WIDE_REPO_NAME")
                    .unwrap_or_else(|| DEFAULT_ORG_WIDE_REPO_NAME.to_owned()),
                path,
            },
            api_url,
            token: get("GITHUB_TOKEN").map(SecretString::from),
        })
    }
}
