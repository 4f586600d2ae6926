use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A registered development environment.
///
/// The record is immutable once created: `hash` is derived from `name` at
/// creation time and is never recomputed when the record is read back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    pub hash: String,
    pub base_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// RFC 3339 creation time. `None` for records written before it was tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Environment {
    pub fn new(name: &str, base_image: &str) -> Self {
        Self {
            name: name.to_owned(),
            hash: env_hash(name),
            base_image: base_image.to_owned(),
            ssh_key: None,
            repo: None,
            created_at: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        }
    }

    #[must_use]
    pub fn with_ssh_key(mut self, key: Option<&str>) -> Self {
        self.ssh_key = key.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_repo(mut self, repo: Option<&str>) -> Self {
        self.repo = repo.map(str::to_owned);
        self
    }
}

/// Hex-encode each UTF-16 code unit of `name`, concatenated without separators
/// or padding. This is the container id form the editor's attach locator expects.
pub fn env_hash(name: &str) -> String {
    name.encode_utf16().fold(String::new(), |mut out, unit| {
        let _ = write!(out, "{unit:x}");
        out
    })
}

/// Environment names double as container and volume names, so they follow the
/// engine's naming rule: `[a-zA-Z0-9][a-zA-Z0-9_.-]*`, at most 64 characters.
pub fn validate_env_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.len() > 64 {
        return Err(StoreError::InvalidName(
            "environment name must be 1-64 characters".to_owned(),
        ));
    }
    let mut bytes = name.bytes();
    let first_ok = bytes.next().is_some_and(|b| b.is_ascii_alphanumeric());
    if !first_ok
        || !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-')
    {
        return Err(StoreError::InvalidName(format!(
            "'{name}' must match [a-zA-Z0-9][a-zA-Z0-9_.-]*"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_of_char_codes() {
        assert_eq!(env_hash("web"), "776562");
        assert_eq!(env_hash("a-1"), "612d31");
        assert_eq!(env_hash(""), "");
    }

    #[test]
    fn hash_does_not_pad_small_code_units() {
        // U+000A would be "a", not "0a".
        assert_eq!(env_hash("\n"), "a");
        assert_eq!(env_hash("é"), "e9");
    }

    #[test]
    fn new_environment_derives_hash() {
        let env = Environment::new("api", "local/node");
        assert_eq!(env.hash, env_hash("api"));
        assert_eq!(env.base_image, "local/node");
        assert!(env.ssh_key.is_none());
        assert!(env.repo.is_none());
        assert!(env.created_at.is_some());
    }

    #[test]
    fn created_at_has_second_precision() {
        let env = Environment::new("api", "local/node");
        let created = env.created_at.unwrap();
        assert_eq!(created.len(), "2026-01-01T00:00:00Z".len(), "{created}");
        assert!(created.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&created).is_ok());
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_options() {
        let env = Environment::new("api", "local/node").with_repo(Some("git@host:a/b.git"));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["baseImage"], "local/node");
        assert_eq!(value["repo"], "git@host:a/b.git");
        assert!(value.get("sshKey").is_none());
        assert!(value.get("base_image").is_none());
    }

    #[test]
    fn deserializes_record_without_optional_fields() {
        let env: Environment =
            serde_json::from_str(r#"{"name":"x","hash":"78","baseImage":"img"}"#).unwrap();
        assert_eq!(env.name, "x");
        assert!(env.created_at.is_none());
    }

    #[test]
    fn stored_hash_is_not_recomputed() {
        let env: Environment =
            serde_json::from_str(r#"{"name":"x","hash":"legacy","baseImage":"img"}"#).unwrap();
        assert_eq!(env.hash, "legacy");
    }

    #[test]
    fn valid_names() {
        for name in ["web", "my-env", "env_2", "a.b", "0abc"] {
            assert!(validate_env_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_names() {
        let too_long = "a".repeat(65);
        for name in ["", "-lead", ".hidden", "has space", "slash/name", too_long.as_str()] {
            assert!(validate_env_name(name).is_err(), "{name} should be invalid");
        }
    }
}
