//! Layered configuration
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults (the BootstrapBlazor deployment)
//! 2. Global file (`<config_dir>/compdoc/config.toml`)
//! 3. An explicit file passed with `--config`
//! 4. Environment (`COMPDOC_REMOTE_URL`, `COMPDOC_LOCAL_PATH`)
//! 5. Command-line [`Overrides`]
//!
//! File layers are merged table-by-table before deserializing, so a file
//! only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use compdoc_fs::io::DEFAULT_MAX_FILE_SIZE;
use compdoc_git::{Identity, SyncOptions};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const ENV_REMOTE_URL: &str = "COMPDOC_REMOTE_URL";
pub const ENV_LOCAL_PATH: &str = "COMPDOC_LOCAL_PATH";

/// Effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub layout: LayoutConfig,
    pub sync: SyncConfig,
    pub service: ServiceConfig,
}

/// `[repository]`: which remote to mirror and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    pub remote_url: String,
    pub local_path: PathBuf,
    /// Branch to track; the remote's default branch when unset.
    pub branch: Option<String>,
    pub remote_name: String,
    pub identity: IdentityConfig,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            remote_url: "https://github.com/dotnetcore/BootstrapBlazor.git".to_string(),
            local_path: std::env::temp_dir().join("BootstrapBlazorRepo"),
            branch: None,
            remote_name: "origin".to_string(),
            identity: IdentityConfig::default(),
        }
    }
}

/// `[repository.identity]`: signature for merge commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub name: String,
    pub email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        let identity = Identity::default();
        Self {
            name: identity.name,
            email: identity.email,
        }
    }
}

/// `[layout]`: where components, docs and samples live in the mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub components_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub samples_dir: PathBuf,
    /// Component directories starting with this prefix are skipped.
    pub reserved_prefix: String,
    /// Infrastructure directories that are never components.
    pub excluded_dirs: Vec<String>,
    /// Extensions scanned for a `<summary>` description.
    pub description_extensions: Vec<String>,
    /// Suffixes appended to the plural name to find sample files.
    pub sample_extensions: Vec<String>,
    /// Largest file returned as content, in bytes.
    pub max_file_size: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("src/BootstrapBlazor/Components"),
            docs_dir: PathBuf::from("src/BootstrapBlazor.Server/Components"),
            samples_dir: PathBuf::from("src/BootstrapBlazor.Server/Components/Samples"),
            reserved_prefix: ".".to_string(),
            excluded_dirs: vec!["Locales".to_string(), "BaseComponents".to_string()],
            description_extensions: vec!["cs".to_string(), "razor".to_string()],
            sample_extensions: vec!["razor".to_string(), "razor.cs".to_string()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// `[sync]`: background synchronization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub on_startup: bool,
    /// Seconds between periodic syncs; 0 disables them.
    pub interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            interval_secs: 3600,
        }
    }
}

/// `[service]`: protocol-facing behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub error_mode: ErrorMode,
    /// Advertise `get_document` in `tools/list`.
    pub expose_get_document: bool,
}

/// How resolver warnings and failures reach the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Warnings are reported alongside data; failures are tool errors.
    #[default]
    Strict,
    /// Best available data only; warnings and failures are just logged.
    Lenient,
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub remote_url: Option<String>,
    pub local_path: Option<PathBuf>,
    pub no_sync: bool,
}

impl Config {
    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.remote_url {
            self.repository.remote_url = url.clone();
        }
        if let Some(path) = &overrides.local_path {
            self.repository.local_path = path.clone();
        }
        if overrides.no_sync {
            self.sync.on_startup = false;
            self.sync.interval_secs = 0;
        }
    }

    /// Whether any background synchronization is configured.
    pub fn sync_enabled(&self) -> bool {
        self.sync.on_startup || self.sync.interval_secs > 0
    }

    /// Options for the repository synchronizer.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            remote_url: self.repository.remote_url.clone(),
            remote_name: self.repository.remote_name.clone(),
            branch: self.repository.branch.clone(),
            identity: Identity {
                name: self.repository.identity.name.clone(),
                email: self.repository.identity.email.clone(),
            },
        }
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if self.repository.remote_url.trim().is_empty() {
            return Err(invalid("repository.remote_url", "must not be empty"));
        }
        if self.repository.remote_name.trim().is_empty() {
            return Err(invalid("repository.remote_name", "must not be empty"));
        }
        if self.repository.local_path.as_os_str().is_empty() {
            return Err(invalid("repository.local_path", "must not be empty"));
        }

        let layout = &self.layout;
        for (field, dir) in [
            ("layout.components_dir", &layout.components_dir),
            ("layout.docs_dir", &layout.docs_dir),
            ("layout.samples_dir", &layout.samples_dir),
        ] {
            if dir.is_absolute() || dir.has_root() {
                return Err(invalid(field, "must be relative to the repository root"));
            }
        }
        if layout.sample_extensions.is_empty() {
            return Err(invalid("layout.sample_extensions", "must not be empty"));
        }
        if layout.max_file_size == 0 {
            return Err(invalid("layout.max_file_size", "must be greater than zero"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> Error {
    Error::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Loads a [`Config`] from the layered sources.
pub struct ConfigLoader {
    /// Override for the global config directory (used for testing).
    /// When `None`, the platform directory from `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the platform global config and the process environment.
    pub fn new() -> Self {
        Self {
            global_config_dir_override: None,
            explicit_file: None,
            env: Box::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Use `dir` instead of the platform config directory.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    /// Layer an explicit file on top of the global one. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Replace environment lookup.
    pub fn with_env(mut self, env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("compdoc"))
    }

    /// Resolve and validate the configuration.
    pub fn load(&self) -> Result<Config> {
        let mut merged = toml::Table::new();

        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config");
                merge_tables(&mut merged, read_table(&global_config_path)?);
            } else {
                tracing::debug!(?global_config_path, "No global config found, skipping");
            }
        }

        if let Some(path) = &self.explicit_file {
            if !path.is_file() {
                return Err(Error::ConfigNotFound { path: path.clone() });
            }
            tracing::debug!(config_path = ?path, "Loading explicit config");
            merge_tables(&mut merged, read_table(path)?);
        }

        let mut config: Config = toml::Value::Table(merged).try_into()?;

        if let Some(url) = (self.env)(ENV_REMOTE_URL).filter(|v| !v.is_empty()) {
            tracing::debug!(%url, "Remote URL overridden by environment");
            config.repository.remote_url = url;
        }
        if let Some(path) = (self.env)(ENV_LOCAL_PATH).filter(|v| !v.is_empty()) {
            tracing::debug!(%path, "Local path overridden by environment");
            config.repository.local_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)?;
    Ok(content.parse::<toml::Table>()?)
}

/// Deep-merge `overlay` into `base`; nested tables merge, everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
