use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use airskill_core::{AirskillError, Result};

use crate::schema::AirskillConfig;

/// File name looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "airskill.toml";

/// Loads the AirSkill configuration once per run.
pub struct ConfigLoader {
    config: AirskillConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > AIRSKILL_CONFIG env > ./airskill.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("AIRSKILL_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load the config from disk (or defaults), the project `.env`, and the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let root = project_root(&config_path);

        let env_file = root.join(".env");
        if env_file.is_file() {
            // Existing process variables win over .env entries.
            match dotenvy::from_path(&env_file) {
                Ok(()) => debug!(path = ?env_file, "loaded .env"),
                Err(e) => warn!(path = ?env_file, error = %e, "failed to load .env"),
            }
        }

        Self::load_with_env(&config_path, |key| std::env::var(key).ok())
    }

    /// Load from an explicit file, reading env overrides through `lookup`.
    pub fn load_with_env<F>(config_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(config_path)
                .map_err(|e| AirskillError::io_at(config_path, e))?;
            Self::parse(&raw, config_path)?
        } else {
            debug!(?config_path, "config file not found, using defaults");
            AirskillConfig::default()
        };
        config.root = project_root(config_path);

        let config = Self::apply_env_overrides(config, lookup);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => return Err(AirskillError::Config(e)),
        }

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
        })
    }

    fn parse(raw: &str, config_path: &Path) -> Result<AirskillConfig> {
        toml::from_str::<AirskillConfig>(raw).map_err(|e| {
            AirskillError::Config(format!("failed to parse {}: {}", config_path.display(), e))
        })
    }

    /// Get a snapshot of the loaded config.
    pub fn get(&self) -> AirskillConfig {
        self.config.clone()
    }

    /// Path the config was (or would have been) read from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides. `AIRSKILL_*` always win; the provider API key
    /// only fills in when the file leaves it unset.
    pub fn apply_env_overrides<F>(mut config: AirskillConfig, lookup: F) -> AirskillConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AIRSKILL_LLM_PROVIDER") {
            config.llm.provider = v.trim().to_lowercase();
        }
        if let Some(v) = lookup("AIRSKILL_LLM_MODEL") {
            config.llm.model = v;
        }
        if let Some(v) = lookup("AIRSKILL_BASE_URL") {
            config.site.base_url = v;
        }
        if let Some(v) = lookup("AIRSKILL_LOG_LEVEL") {
            config.logging.level = v;
        }
        if config.llm.credential().is_none() {
            if let Some(var) = config.llm.api_key_env() {
                if let Some(v) = lookup(var).filter(|v| !v.trim().is_empty()) {
                    config.llm.api_key = Some(v.trim().to_string());
                }
            }
        }
        config
    }
}

/// The config file's directory; relative paths in the config resolve here.
fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
