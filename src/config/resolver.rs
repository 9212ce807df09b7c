use tracing::{debug, warn};

use super::policy::PolicyConfig;
use super::settings::ConfigLocation;
use crate::error::SentryError;
use crate::platform::Platform;

/// Produces the effective policy for an organization. Config is re-read on
/// every call; nothing is cached between events.
pub struct ConfigResolver {
    location: ConfigLocation,
}

impl ConfigResolver {
    pub fn new(location: ConfigLocation) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &ConfigLocation {
        &self.location
    }

    /// Fetch, decode, and merge the org-wide config over the defaults.
    ///
    /// Never fails: a missing, unreadable, or undecodable file yields the
    /// built-in defaults.
    pub async fn resolve(&self, platform: &dyn Platform, organization: &str) -> PolicyConfig {
        let ConfigLocation { repo, path } = &self.location;

        let fetched = platform
            .get_content(organization, repo, path)
            .await
            .and_then(|encoded| PolicyConfig::decode(&encoded));

        match fetched {
            Ok(config) => {
                debug!(organization, repo, path, "using org-wide config");
                config
            }
            Err(SentryError::NotFound(_)) => {
                debug!(organization, repo, path, "no org-wide config, using defaults");
                PolicyConfig::default()
            }
            Err(e) => {
                warn!(organization, repo, path, error = %e, "org-wide config unavailable, using defaults");
                PolicyConfig::default()
            }
        }
    }
}
