use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::SentryError;

const MAX_POLICY_FILE_SIZE: usize = 64 * 1024; // 64 KiB

pub const DEFAULT_REMOVED_ISSUE_TITLE: &str = "[CRITICAL] An Outside Collaborator has been removed!";
pub const DEFAULT_REMOVED_ISSUE_BODY: &str =
    "NOTE: Outside Collaborators cannot be added to this Org. Please contact an Admin to override.";
pub const DEFAULT_MONITOR_ISSUE_TITLE: &str = "[WARNING] An Outside Collaborator has been added!";
pub const DEFAULT_MONITOR_ISSUE_BODY: &str = "NOTE: Outside Collaborators are not permitted in this Org. \
     Please review this collaborator's access.";

/// Fully merged configuration used for a single event's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    pub removal_enabled: bool,
    pub monitor_only: bool,
    pub excluded_collaborators: Vec<String>,
    pub removed_issue_title: String,
    pub removed_issue_body: String,
    pub monitor_issue_title: String,
    pub monitor_issue_body: String,
    /// Mention list appended to issue bodies. Empty means no mention line.
    pub cc_list: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            removal_enabled: true,
            monitor_only: false,
            excluded_collaborators: Vec::new(),
            removed_issue_title: DEFAULT_REMOVED_ISSUE_TITLE.to_owned(),
            removed_issue_body: DEFAULT_REMOVED_ISSUE_BODY.to_owned(),
            monitor_issue_title: DEFAULT_MONITOR_ISSUE_TITLE.to_owned(),
            monitor_issue_body: DEFAULT_MONITOR_ISSUE_BODY.to_owned(),
            cc_list: String::new(),
        }
    }
}

impl FromStr for PolicyConfig {
    type Err = SentryError;

    /// Parse a YAML org config and merge it over the built-in defaults.
    ///
    /// Only a document that is not a mapping is an error. Each recognized key
    /// is taken on its own; a key holding the wrong type keeps its default.
    fn from_str(content: &str) -> Result<Self, SentryError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value =
            serde_yaml::from_str(content).map_err(|e| SentryError::ConfigDecode(e.to_string()))?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self::default().merge(&mapping)),
            _ => Err(SentryError::ConfigDecode(
                "top-level document must be a mapping".to_owned(),
            )),
        }
    }
}

impl PolicyConfig {
    /// Decode base64-wrapped YAML as returned by the contents API.
    /// Line breaks inside the base64 payload are ignored.
    pub fn decode(encoded: &str) -> Result<Self, SentryError> {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| SentryError::ConfigDecode(format!("invalid base64: {e}")))?;

        if bytes.len() > MAX_POLICY_FILE_SIZE {
            return Err(SentryError::ConfigDecode(format!(
                "config file exceeds {MAX_POLICY_FILE_SIZE} byte limit"
            )));
        }

        let content = String::from_utf8(bytes)
            .map_err(|e| SentryError::ConfigDecode(format!("config is not UTF-8: {e}")))?;

        content.parse()
    }

    /// GitHub logins are case-insensitive.
    pub fn is_excluded(&self, login: &str) -> bool {
        self.excluded_collaborators
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(login))
    }

    /// Shallow, key-by-key override. Absent, null, or mistyped keys keep the current value.
    fn merge(self, mapping: &Mapping) -> Self {
        Self {
            removal_enabled: override_with(mapping, "enableCollaboratorRemoval", as_bool)
                .unwrap_or(self.removal_enabled),
            monitor_only: override_with(mapping, "monitorOnly", as_bool).unwrap_or(self.monitor_only),
            excluded_collaborators: override_with(mapping, "excludeCollaborators", as_logins)
                .unwrap_or(self.excluded_collaborators),
            removed_issue_title: override_with(mapping, "removedIssueTitle", as_text)
                .unwrap_or(self.removed_issue_title),
            removed_issue_body: override_with(mapping, "removedIssueBody", as_text)
                .unwrap_or(self.removed_issue_body),
            monitor_issue_title: override_with(mapping, "monitorIssueTitle", as_text)
                .unwrap_or(self.monitor_issue_title),
            monitor_issue_body: override_with(mapping, "monitorIssueBody", as_text)
                .unwrap_or(self.monitor_issue_body),
            cc_list: override_with(mapping, "ccList", as_text).unwrap_or(self.cc_list),
        }
    }
}

fn override_with<T>(mapping: &Mapping, key: &str, convert: fn(&Value) -> Option<T>) -> Option<T> {
    let value = mapping.get(key)?;
    if value.is_null() {
        return None;
    }
    let converted = convert(value);
    if converted.is_none() {
        warn!(key, value = ?value, "ignoring org config key with unexpected type, keeping default");
    }
    converted
}

fn as_bool(value: &Value) -> Option<bool> {
    value.as_bool()
}

/// Strings, numbers, and booleans all read as text (`12345` is a valid login).
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list of scalars, or a single scalar as a one-entry list.
/// Non-scalar entries are dropped.
fn as_logins(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Sequence(entries) => Some(
            entries
                .iter()
                .filter_map(|entry| {
                    let login = as_text(entry);
                    if login.is_none() && !entry.is_null() {
                        warn!(entry = ?entry, "ignoring non-scalar excludeCollaborators entry");
                    }
                    login
                })
                .collect(),
        ),
        scalar => as_text(scalar).map(|login| vec![login]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_defaults() {
        let config = PolicyConfig::from_str("").expect("empty config should parse");
        assert_eq!(config, PolicyConfig::default());

        let config = PolicyConfig::from_str("~\n").expect("null config should parse");
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn default_values() {
        let config = PolicyConfig::default();
        assert!(config.removal_enabled);
        assert!(!config.monitor_only);
        assert!(config.excluded_collaborators.is_empty());
        assert!(config.cc_list.is_empty());
        assert_eq!(config.removed_issue_title, DEFAULT_REMOVED_ISSUE_TITLE);
    }

    #[test]
    fn cc_list_only_override() {
        let config = PolicyConfig::from_str("ccList: \"@sec-team\"\n").expect("should parse");
        assert_eq!(
            config,
            PolicyConfig {
                cc_list: "@sec-team".to_owned(),
                ..PolicyConfig::default()
            }
        );
    }

    #[test]
    fn full_override() {
        let yaml = r#"
monitorOnly: true
enableCollaboratorRemoval: false
removedIssueTitle: Removed
removedIssueBody: Gone
monitorIssueTitle: Watching
monitorIssueBody: Seen
ccList: "@Security-Admin"
excludeCollaborators: ['test-pro1', 'test-pro']
"#;
        let config = PolicyConfig::from_str(yaml).expect("should parse");
        assert!(config.monitor_only);
        assert!(!config.removal_enabled);
        assert_eq!(config.removed_issue_title, "Removed");
        assert_eq!(config.removed_issue_body, "Gone");
        assert_eq!(config.monitor_issue_title, "Watching");
        assert_eq!(config.monitor_issue_body, "Seen");
        assert_eq!(config.cc_list, "@Security-Admin");
        assert_eq!(config.excluded_collaborators, vec!["test-pro1", "test-pro"]);
    }

    #[test]
    fn unknown_keys_ignored() {
        let yaml = "monitorOnly: true\nexcludeRepos: ['test-pro2', 'test-pro3']\n";
        let config = PolicyConfig::from_str(yaml).expect("unknown keys should be ignored");
        assert!(config.monitor_only);
        assert!(config.removal_enabled);
    }

    #[test]
    fn null_value_keeps_default() {
        let config = PolicyConfig::from_str("ccList:\nmonitorOnly: true\n").expect("should parse");
        assert!(config.cc_list.is_empty());
        assert!(config.monitor_only);
    }

    #[test]
    fn mistyped_key_keeps_its_default_only() {
        let config = PolicyConfig::from_str("monitorOnly: [1, 2]\nccList: '@ops'\n")
            .expect("mistyped keys should not fail the document");
        assert!(!config.monitor_only);
        assert_eq!(config.cc_list, "@ops");
    }

    #[test]
    fn numeric_login_in_exclusions() {
        let config = PolicyConfig::from_str("monitorOnly: true\nexcludeCollaborators: [alice, 12345]\n")
            .expect("should parse");
        assert!(config.monitor_only);
        assert_eq!(config.excluded_collaborators, vec!["alice", "12345"]);
        assert!(config.is_excluded("alice"));
        assert!(config.is_excluded("12345"));
    }

    #[test]
    fn bad_cc_list_keeps_monitor_only() {
        let config = PolicyConfig::from_str("monitorOnly: true\nccList: {team: sec}\n").expect("should parse");
        assert!(config.monitor_only);
        assert!(config.cc_list.is_empty());
    }

    #[test]
    fn single_excluded_login_as_scalar() {
        let config = PolicyConfig::from_str("excludeCollaborators: alice\n").expect("should parse");
        assert_eq!(config.excluded_collaborators, vec!["alice"]);
    }

    #[test]
    fn non_scalar_exclusion_entries_dropped() {
        let config = PolicyConfig::from_str("excludeCollaborators: [alice, [nested], ~]\n").expect("should parse");
        assert_eq!(config.excluded_collaborators, vec!["alice"]);
    }

    #[test]
    fn numeric_text_values() {
        let config = PolicyConfig::from_str("removedIssueTitle: 404\n").expect("should parse");
        assert_eq!(config.removed_issue_title, "404");
    }

    #[test]
    fn scalar_document_rejected() {
        let err = PolicyConfig::from_str("just a string\n").unwrap_err();
        assert!(matches!(err, SentryError::ConfigDecode(_)));
    }

    #[test]
    fn decode_base64_with_line_breaks() {
        let encoded = STANDARD.encode("monitorOnly: true\nccList: '@ops'\n");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{head}\n{tail}\n");

        let config = PolicyConfig::decode(&wrapped).expect("should decode");
        assert!(config.monitor_only);
        assert_eq!(config.cc_list, "@ops");
    }

    #[test]
    fn decode_invalid_base64() {
        let err = PolicyConfig::decode("!!not base64!!").unwrap_err();
        assert!(matches!(err, SentryError::ConfigDecode(_)));
    }

    #[test]
    fn decode_oversized_rejected() {
        let big = format!("ccList: '{}'\n", "a".repeat(MAX_POLICY_FILE_SIZE));
        let err = PolicyConfig::decode(&STANDARD.encode(big)).unwrap_err();
        assert!(matches!(err, SentryError::ConfigDecode(_)));
    }

    #[test]
    fn exclusion_is_case_insensitive() {
        let config = PolicyConfig {
            excluded_collaborators: vec!["Alice".to_owned()],
            ..PolicyConfig::default()
        };
        assert!(config.is_excluded("alice"));
        assert!(config.is_excluded("ALICE"));
        assert!(!config.is_excluded("bob"));
    }
}
