use crate::CoreError;
use devenv_runtime::backend::WORKSPACE_DIR;
use devenv_runtime::{
    select_backend, AttachTarget, BindMount, CloneSpec, RuntimeBackend, RuntimeSpec,
};
use devenv_store::{expand_tilde, validate_env_name, Config, Environment, StoreError};
use tracing::{debug, info, warn};

/// Image used by `create` when none is given.
pub const DEFAULT_IMAGE: &str = "local/node";

/// Requested fields of a new environment; `hash` and timestamps are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnv {
    pub name: String,
    pub base_image: String,
    pub ssh_key: Option<String>,
    pub repo: Option<String>,
}

impl NewEnv {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            base_image: DEFAULT_IMAGE.to_owned(),
            ssh_key: None,
            repo: None,
        }
    }
}

/// Central orchestration engine for environment lifecycle.
///
/// Owns the loaded config document for the duration of one invocation and
/// mutates its registry as operations succeed. Persisting the document is the
/// caller's job.
pub struct Engine {
    config: Config,
    backend: Box<dyn RuntimeBackend>,
}

impl Engine {
    /// Create an engine using the backend selected by the config's `engine`
    /// and `enginePath` settings.
    pub fn new(config: Config) -> Self {
        let backend = select_backend(config.engine, &config.engine_path);
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: Config, backend: Box<dyn RuntimeBackend>) -> Self {
        debug!("engine using '{}' backend", backend.name());
        Self { config, backend }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn require_configured(&self) -> Result<(), CoreError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(CoreError::NotConfigured)
        }
    }

    pub fn get(&self, name: &str) -> Result<&Environment, CoreError> {
        self.config.get(name).map_err(|e| match e {
            StoreError::EnvNotFound(n) => CoreError::EnvNotFound(n),
            other => CoreError::Store(other),
        })
    }

    /// Provision a new environment: volume, optional clone, registry entry.
    ///
    /// With `force`, an existing record of the same name is replaced. If the
    /// clone fails, a volume created for a previously unregistered name is
    /// removed again and the registry is left untouched.
    pub fn create(&mut self, req: &NewEnv, force: bool) -> Result<Environment, CoreError> {
        info!("creating environment '{}'", req.name);
        validate_env_name(&req.name).map_err(|e| match e {
            StoreError::InvalidName(msg) => CoreError::InvalidName(msg),
            other => CoreError::Store(other),
        })?;

        let existed = self.config.contains(&req.name);
        if existed && !force {
            return Err(CoreError::AlreadyExists(req.name.clone()));
        }

        let ssh_mount = self.ssh_mount(req.ssh_key.as_deref())?;
        self.backend.create_volume(&req.name)?;

        if let Some(repo) = &req.repo {
            let spec = CloneSpec {
                volume: req.name.clone(),
                repo: repo.clone(),
                dest: format!("{WORKSPACE_DIR}/{}", req.name),
                ssh_mount,
            };
            info!("cloning {repo} into {}", spec.dest);
            if let Err(e) = self.backend.clone_repo(&spec) {
                if !existed {
                    if let Err(cleanup) = self.backend.remove_volume(&req.name) {
                        warn!(
                            "could not remove volume '{}' after failed clone: {cleanup}",
                            req.name
                        );
                    }
                }
                return Err(e.into());
            }
        }

        let env = Environment::new(&req.name, &req.base_image)
            .with_ssh_key(req.ssh_key.as_deref())
            .with_repo(req.repo.as_deref());
        if self.config.insert(env.clone()).is_some() {
            debug!("replaced existing record for '{}'", env.name);
        }
        Ok(env)
    }

    pub fn start(&self, name: &str) -> Result<(), CoreError> {
        info!("starting environment '{name}'");
        let env = self.get(name)?;
        let spec = RuntimeSpec {
            name: env.name.clone(),
            image: env.base_image.clone(),
            volume: env.name.clone(),
            ssh_mount: self.ssh_mount(env.ssh_key.as_deref())?,
        };
        self.backend.start(&spec)?;
        Ok(())
    }

    pub fn attach(&self, name: &str) -> Result<(), CoreError> {
        info!("attaching to environment '{name}'");
        let env = self.get(name)?;
        let target = AttachTarget {
            name: env.name.clone(),
            hash: env.hash.clone(),
        };
        self.backend.attach(&target)?;
        Ok(())
    }

    pub fn stop(&self, name: &str) -> Result<(), CoreError> {
        info!("stopping environment '{name}'");
        let env = self.get(name)?;
        self.backend.stop(&env.name)?;
        Ok(())
    }

    /// Delete the environment's volume, then its registry entry. A failed
    /// volume removal leaves the entry in place.
    pub fn remove(&mut self, name: &str) -> Result<Environment, CoreError> {
        info!("removing environment '{name}'");
        let volume = self.get(name)?.name.clone();
        self.backend.remove_volume(&volume)?;
        Ok(self.config.remove(name)?)
    }

    /// Resolve a key filename under the configured SSH directory to an
    /// absolute host path mounted at the container's default key location.
    fn ssh_mount(&self, key: Option<&str>) -> Result<Option<BindMount>, CoreError> {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        if self.config.ssh_path.is_empty() {
            return Err(CoreError::NotConfigured);
        }
        let path = std::path::absolute(expand_tilde(&self.config.ssh_path).join(key))?;
        if !path.is_file() {
            return Err(CoreError::SshKeyNotFound(path.display().to_string()));
        }
        debug!("mounting ssh key {}", path.display());
        Ok(Some(BindMount::ssh_key(path)))
    }
}
