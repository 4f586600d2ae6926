use crate::layout::StoreLayout;
use crate::metadata::Environment;
use crate::{fsync_dir, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Docker,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Docker => write!(f, "docker"),
        }
    }
}

/// The persisted config document, including the environment registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub engine: EngineKind,
    #[serde(default)]
    pub engine_path: String,
    #[serde(default)]
    pub ssh_path: String,
    #[serde(default)]
    pub envs: BTreeMap<String, Environment>,
}

impl Config {
    /// Every command except `help` and `config` needs the SSH key directory set.
    pub fn is_configured(&self) -> bool {
        !self.ssh_path.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.envs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Environment, StoreError> {
        self.envs
            .get(name)
            .ok_or_else(|| StoreError::EnvNotFound(name.to_owned()))
    }

    /// Insert a record, replacing any existing record with the same name.
    /// Returns the replaced record.
    pub fn insert(&mut self, env: Environment) -> Option<Environment> {
        self.envs.insert(env.name.clone(), env)
    }

    pub fn remove(&mut self, name: &str) -> Result<Environment, StoreError> {
        self.envs
            .remove(name)
            .ok_or_else(|| StoreError::EnvNotFound(name.to_owned()))
    }

    pub fn list(&self) -> impl Iterator<Item = &Environment> {
        self.envs.values()
    }
}

pub struct ConfigStore {
    layout: StoreLayout,
}

impl ConfigStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Load the config document, returning the default document if the file
    /// does not exist yet. A file that exists but does not parse is an error.
    pub fn load(&self) -> Result<Config, StoreError> {
        self.layout.initialize()?;
        let path = self.layout.config_file();
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| StoreError::InvalidConfig {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overwrite the config file with the full document, pretty-printed.
    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        self.layout.initialize()?;
        let dir = self.layout.root();
        let dest = self.layout.config_file();
        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&dest).map_err(|e| StoreError::Io(e.error))?;
        fsync_dir(dir)?;
        debug!("saved config to {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> ConfigStore {
        ConfigStore::new(StoreLayout::new(dir.join(".dev-env")))
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let config = store.load().unwrap();
        assert_eq!(config.engine, EngineKind::Docker);
        assert!(config.engine_path.is_empty());
        assert!(config.ssh_path.is_empty());
        assert!(config.envs.is_empty());
        assert!(store.layout().root().is_dir());
    }

    #[test]
    fn save_then_load_preserves_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let mut config = Config {
            ssh_path: "/home/me/.ssh".to_owned(),
            ..Config::default()
        };
        config.insert(Environment::new("web", "local/node").with_ssh_key(Some("id_rsa")));
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn saved_file_uses_camel_case_and_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let config = Config {
            ssh_path: "/foo".to_owned(),
            ..Config::default()
        };
        store.save(&config).unwrap();

        let raw = fs::read_to_string(store.layout().config_file()).unwrap();
        assert!(raw.contains("\n  \"engine\": \"docker\""));
        assert!(raw.contains("\"sshPath\": \"/foo\""));
        assert!(raw.contains("\"enginePath\": \"\""));
        assert!(raw.contains("\"envs\": {}"));
    }

    #[test]
    fn load_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.layout().initialize().unwrap();
        fs::write(store.layout().config_file(), "{ not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig { .. }));
    }

    #[test]
    fn load_unknown_engine_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.layout().initialize().unwrap();
        fs::write(store.layout().config_file(), r#"{"engine":"podman"}"#).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn load_partial_document_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.layout().initialize().unwrap();
        fs::write(store.layout().config_file(), r#"{"sshPath":"/k"}"#).unwrap();
        let config = store.load().unwrap();
        assert_eq!(config.ssh_path, "/k");
        assert_eq!(config.engine, EngineKind::Docker);
        assert!(config.envs.is_empty());
    }

    #[test]
    fn is_configured_requires_ssh_path() {
        let mut config = Config::default();
        assert!(!config.is_configured());
        config.ssh_path = "/k".to_owned();
        assert!(config.is_configured());
    }

    #[test]
    fn registry_insert_get_remove() {
        let mut config = Config::default();
        assert!(config.insert(Environment::new("a", "img")).is_none());
        assert!(config.contains("a"));
        assert_eq!(config.get("a").unwrap().base_image, "img");

        let replaced = config.insert(Environment::new("a", "other"));
        assert_eq!(replaced.unwrap().base_image, "img");
        assert_eq!(config.envs.len(), 1);

        config.remove("a").unwrap();
        assert!(!config.contains("a"));
        assert!(matches!(config.get("a"), Err(StoreError::EnvNotFound(_))));
        assert!(matches!(config.remove("a"), Err(StoreError::EnvNotFound(_))));
    }

    #[test]
    fn list_is_sorted_by_name() {
        let mut config = Config::default();
        config.insert(Environment::new("zeta", "img"));
        config.insert(Environment::new("alpha", "img"));
        let names: Vec<_> = config.list().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }
}
