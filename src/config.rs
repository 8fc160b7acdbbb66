use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// A configuration value that accepts either a single string or a list
///
/// `migration_path = "@app/migrations"` and
/// `migration_path = ["@app/migrations"]` are equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalize to a list, treating a single string as a one-element list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s.clone()],
            OneOrMany::Many(list) => list.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OneOrMany::One(_) => false,
            OneOrMany::Many(list) => list.is_empty(),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(list: Vec<String>) -> Self {
        OneOrMany::Many(list)
    }
}

/// The migration target kind, selected once during configuration resolution
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// One or more filesystem path aliases, each run independently
    Paths(Vec<String>),
    /// A namespace set, run as a single combined invocation
    Namespaces(Vec<String>),
}

/// Configuration for [`MigrationHook`](crate::hook::MigrationHook)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationHookConfig {
    /// Path alias(es) containing migration scripts. Preferred over
    /// `migration_namespaces` when both are set.
    #[serde(default)]
    pub migration_path: Option<OneOrMany>,

    /// Namespace(s) the migration engine should resolve itself. Namespace
    /// targets skip filesystem validation.
    #[serde(default)]
    pub migration_namespaces: Option<OneOrMany>,

    /// Override for the synthetic entry script name. Defaults to the
    /// path component of `entry_url`.
    #[serde(default)]
    pub entry_script: Option<String>,

    /// URL the mocked application pretends it was booted from
    #[serde(default = "default_entry_url")]
    pub entry_url: String,

    /// Path of the mocked application's own TOML configuration, relative
    /// to `root_dir`. `app_config` is accepted as an alias for this key.
    #[serde(default, alias = "app_config")]
    pub config_file: Option<String>,

    /// When false, `on_suite_end` skips the down phase
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,

    /// Project root; relative paths and the built-in `@app` alias resolve
    /// against this directory
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Path aliases (`@name` -> directory), merged over the built-in
    /// `@app` -> `root_dir` entry
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_entry_url() -> String {
    "http://localhost/index-test.php".to_string()
}

fn default_cleanup() -> bool {
    true
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for MigrationHookConfig {
    fn default() -> Self {
        Self {
            migration_path: None,
            migration_namespaces: None,
            entry_script: None,
            entry_url: default_entry_url(),
            config_file: None,
            cleanup: default_cleanup(),
            root_dir: default_root_dir(),
            aliases: HashMap::new(),
        }
    }
}

impl MigrationHookConfig {
    /// Load hook configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}. Make sure the file exists and is readable.",
                path_ref.display(),
                e
            ))
        })?;

        let config: MigrationHookConfig = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}. Check TOML syntax.",
                path_ref.display(),
                e
            ))
        })?;

        log::debug!(
            "Successfully loaded hook configuration from: {}",
            path_ref.display()
        );
        Ok(config)
    }

    /// Select the target kind for this run
    ///
    /// `migration_path` wins over `migration_namespaces`; neither present
    /// (or an empty list) is a hard configuration error.
    pub fn resolve_targets(&self) -> Result<TargetSpec> {
        if let Some(paths) = &self.migration_path {
            if !paths.is_empty() {
                return Ok(TargetSpec::Paths(paths.to_vec()));
            }
        }

        if let Some(namespaces) = &self.migration_namespaces {
            if !namespaces.is_empty() {
                return Ok(TargetSpec::Namespaces(namespaces.to_vec()));
            }
        }

        Err(Error::configuration(
            "At least one of `migration_path` or `migration_namespaces` must be specified.",
        ))
    }

    /// Resolve a path alias to a filesystem path
    ///
    /// Targets starting with `@` resolve their first segment through the
    /// alias map; everything else is taken relative to `root_dir`.
    pub fn resolve_alias(&self, target: &str) -> Result<PathBuf> {
        if let Some(stripped) = target.strip_prefix('@') {
            let (name, rest) = match stripped.find('/') {
                Some(idx) => (&stripped[..idx], &stripped[idx + 1..]),
                None => (stripped, ""),
            };
            let alias = format!("@{}", name);

            let base = match self.aliases.get(&alias) {
                Some(dir) => PathBuf::from(dir),
                // Built-in alias for the project root
                None if alias == "@app" => self.root_dir.clone(),
                None => return Err(Error::InvalidPathAlias(target.to_string())),
            };

            if rest.is_empty() {
                Ok(base)
            } else {
                Ok(base.join(rest))
            }
        } else {
            let path = Path::new(target);
            if path.is_absolute() {
                Ok(path.to_path_buf())
            } else {
                Ok(self.root_dir.join(path))
            }
        }
    }

    /// Resolve a path target and require it to exist on disk
    ///
    /// The missing-path error carries the fully resolved absolute path,
    /// not the alias.
    pub fn validate_path(&self, target: &str) -> Result<PathBuf> {
        let resolved = self.resolve_alias(target)?;
        if !resolved.exists() {
            return Err(Error::MissingMigrationPath(absolute(&resolved)));
        }
        log::debug!("Migration path '{}' resolved to {}", target, resolved.display());
        Ok(resolved)
    }
}

/// Make a path absolute without requiring it to exist
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    }
}
