//! Configuration loading
//!
//! Bootstrap settings come from a TOML file with graceful degradation:
//! a missing file logs a warning and the compiled defaults apply.
//!
//! Resolution priority:
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables ([`TomlConfig::apply_env_overrides`])
//! 3. TOML configuration file
//! 4. Compiled defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the TOML file
pub const CONFIG_PATH_ENV: &str = "CPOLL_CONFIG";
/// Environment variable carrying the completion API key
pub const PERSONA_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable selecting the storage backend
pub const STORAGE_BACKEND_ENV: &str = "CPOLL_STORAGE_BACKEND";
/// Environment variable carrying the admin token digest
pub const ADMIN_TOKEN_DIGEST_ENV: &str = "CPOLL_ADMIN_TOKEN_SHA256";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub persona: PersonaConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Replacement state/LGA mapping (JSON); embedded mapping when absent
    #[serde(default)]
    pub reference_data: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Default: 5780
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which response store backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Line-delimited JSON file (development)
    #[default]
    File,
    /// Relational table (production)
    Sql,
}

impl std::str::FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "sql" => Ok(StorageBackend::Sql),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected 'file' or 'sql')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Development backend: one JSON record per line
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Production backend: SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            file_path: default_file_path(),
            database_path: default_database_path(),
        }
    }
}

/// Persona completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_persona_base_url")]
    pub base_url: String,

    #[serde(default = "default_persona_model")]
    pub model: String,

    #[serde(default = "default_persona_timeout_secs")]
    pub timeout_secs: u64,

    /// Completion token ceiling
    #[serde(default = "default_persona_max_tokens")]
    pub max_tokens: u32,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_persona_base_url(),
            model: default_persona_model(),
            timeout_secs: default_persona_timeout_secs(),
            max_tokens: default_persona_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Hex SHA-256 digest of the admin token. Admin endpoints reject every
    /// request while unset.
    #[serde(default)]
    pub token_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_file_path() -> PathBuf {
    PathBuf::from("responses.json")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("cpoll.db")
}

fn default_persona_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_persona_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_persona_timeout_secs() -> u64 {
    30
}

fn default_persona_max_tokens() -> u32 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file location: `<config_dir>/cpoll/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cpoll").join("config.toml"))
}

/// Pick the TOML file to load
///
/// Command-line path first, then `CPOLL_CONFIG`, then the platform default
/// if that file exists. None means run on compiled defaults.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

impl TomlConfig {
    /// Load from `path`; a missing file degrades to defaults with a warning
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No configuration file; using compiled defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!(
                "Configuration file {} not found; using compiled defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Environment variables take priority over the TOML file
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(key) = non_empty_env(PERSONA_API_KEY_ENV) {
            if self.persona.api_key.is_some() {
                warn!(
                    "Persona API key found in both environment and TOML; using {}",
                    PERSONA_API_KEY_ENV
                );
            }
            self.persona.api_key = Some(key);
        }

        if let Some(backend) = non_empty_env(STORAGE_BACKEND_ENV) {
            self.storage.backend = backend.parse()?;
        }

        if let Some(digest) = non_empty_env(ADMIN_TOKEN_DIGEST_ENV) {
            self.admin.token_sha256 = Some(digest);
        }

        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
