//! Layered configuration.
//!
//! Values resolve in precedence order: CLI flags (applied by the binary) >
//! environment > project `syndic.toml` > user `<config_dir>/syndic/config.toml`
//! > built-in defaults. Each file is read as a sparse [`ConfigLayer`] so a
//! project file only overrides the keys it actually sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{
    DEFAULT_AGREEMENT_EXPIRY_DAYS, DEFAULT_ASSEMBLY_UPCOMING_DAYS, DEFAULT_EXECUTIVE_TERM_DAYS,
    Selectors,
};
use crate::error::ConfigError;

pub const PROJECT_CONFIG_FILE: &str = "syndic.toml";
pub const DEFAULT_PER_PAGE: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Effective configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyndicConfig {
    pub source: SourceConfig,
    pub windows: WindowConfig,
    pub output: OutputConfig,
}

/// Where entity collections come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding `<kind>.json` files.
    pub dir: Option<PathBuf>,
    /// Base URL of the admin API.
    pub base_url: Option<String>,
    /// Bearer token; never written back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: None,
            base_url: None,
            token: None,
            per_page: DEFAULT_PER_PAGE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub agreement_expiry_days: u32,
    pub assembly_upcoming_days: u32,
    pub executive_term_days: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            agreement_expiry_days: DEFAULT_AGREEMENT_EXPIRY_DAYS,
            assembly_upcoming_days: DEFAULT_ASSEMBLY_UPCOMING_DAYS,
            executive_term_days: DEFAULT_EXECUTIVE_TERM_DAYS,
        }
    }
}

impl WindowConfig {
    /// Default selectors with these windows applied.
    #[must_use]
    pub fn selectors(&self) -> Selectors {
        Selectors {
            agreement_expiry_days: self.agreement_expiry_days,
            assembly_upcoming_days: self.assembly_upcoming_days,
            executive_term_days: self.executive_term_days,
            ..Selectors::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Canonical `pretty`, `text`, or `json`; unset means auto-detect.
    pub format: Option<String>,
}

/// Canonical output format name, accepting the legacy aliases.
#[must_use]
pub fn normalize_format(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// One config file, every key optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub source: SourceLayer,
    pub windows: WindowLayer,
    pub output: OutputLayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SourceLayer {
    pub dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub per_page: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct WindowLayer {
    pub agreement_expiry_days: Option<u32>,
    pub assembly_upcoming_days: Option<u32>,
    pub executive_term_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OutputLayer {
    pub format: Option<String>,
}

impl ConfigLayer {
    /// Keys set in `self` win; the rest fall through to `lower`.
    #[must_use]
    pub fn over(self, lower: Self) -> Self {
        Self {
            source: SourceLayer {
                dir: self.source.dir.or(lower.source.dir),
                base_url: self.source.base_url.or(lower.source.base_url),
                token: self.source.token.or(lower.source.token),
                per_page: self.source.per_page.or(lower.source.per_page),
                timeout_secs: self.source.timeout_secs.or(lower.source.timeout_secs),
            },
            windows: WindowLayer {
                agreement_expiry_days: self
                    .windows
                    .agreement_expiry_days
                    .or(lower.windows.agreement_expiry_days),
                assembly_upcoming_days: self
                    .windows
                    .assembly_upcoming_days
                    .or(lower.windows.assembly_upcoming_days),
                executive_term_days: self
                    .windows
                    .executive_term_days
                    .or(lower.windows.executive_term_days),
            },
            output: OutputLayer {
                format: self.output.format.or(lower.output.format),
            },
        }
    }

    /// Layer built from environment variables, looked up through `var`.
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        Self {
            source: SourceLayer {
                dir: set("SYNDIC_SOURCE_DIR").map(PathBuf::from),
                base_url: set("SYNDIC_BASE_URL"),
                token: set("SYNDIC_TOKEN"),
                ..SourceLayer::default()
            },
            output: OutputLayer {
                // Unrecognized FORMAT values are ignored rather than fatal.
                format: set("FORMAT")
                    .as_deref()
                    .and_then(normalize_format)
                    .map(str::to_string),
            },
            ..Self::default()
        }
    }

    /// Fill unset keys with defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero page size or timeout,
    /// or an unknown output format.
    pub fn resolve(self) -> Result<SyndicConfig, ConfigError> {
        let per_page = self.source.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 {
            return Err(ConfigError::InvalidValue {
                key: "source.per_page",
                value: per_page.to_string(),
            });
        }
        let timeout_secs = self.source.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "source.timeout_secs",
                value: timeout_secs.to_string(),
            });
        }
        let format = match self.output.format {
            Some(raw) => Some(
                normalize_format(&raw)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "output.format",
                        value: raw.clone(),
                    })?
                    .to_string(),
            ),
            None => None,
        };

        let defaults = WindowConfig::default();
        Ok(SyndicConfig {
            source: SourceConfig {
                dir: self.source.dir,
                base_url: self.source.base_url,
                token: self.source.token,
                per_page,
                timeout_secs,
            },
            windows: WindowConfig {
                agreement_expiry_days: self
                    .windows
                    .agreement_expiry_days
                    .unwrap_or(defaults.agreement_expiry_days),
                assembly_upcoming_days: self
                    .windows
                    .assembly_upcoming_days
                    .unwrap_or(defaults.assembly_upcoming_days),
                executive_term_days: self
                    .windows
                    .executive_term_days
                    .unwrap_or(defaults.executive_term_days),
            },
            output: OutputConfig { format },
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read one layer from `path`; a missing file is an empty layer.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it is not valid TOML for this schema.
pub fn load_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    if !path.exists() {
        return Ok(ConfigLayer::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let layer = toml::from_str::<ConfigLayer>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "config layer loaded");
    Ok(layer)
}

/// `<config_dir>/syndic/config.toml` for the current user, if there is one.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("syndic").join("config.toml"))
}

/// Effective configuration for `project_root` from the real environment.
///
/// # Errors
///
/// Propagates any [`ConfigError`] from reading, parsing, or validating a layer.
pub fn resolve_config(project_root: &Path) -> Result<SyndicConfig, ConfigError> {
    resolve_config_with(project_root, user_config_path().as_deref(), |key| {
        std::env::var(key).ok()
    })
}

/// [`resolve_config`] with an explicit user config path and environment.
///
/// # Errors
///
/// Propagates any [`ConfigError`] from reading, parsing, or validating a layer.
pub fn resolve_config_with(
    project_root: &Path,
    user_config: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<SyndicConfig, ConfigError> {
    let user = match user_config {
        Some(path) => load_layer(path)?,
        None => ConfigLayer::default(),
    };
    let project = load_layer(&project_root.join(PROJECT_CONFIG_FILE))?;
    let files = project.over(user);
    ConfigLayer::from_env(var).over(files).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = resolve_config_with(dir.path(), None, no_env).unwrap();
        assert_eq!(cfg, SyndicConfig::default());
        assert_eq!(cfg.source.per_page, 1000);
        assert_eq!(cfg.windows.assembly_upcoming_days, 30);
    }

    #[test]
    fn project_overrides_user_key_by_key() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("user.toml");
        std::fs::write(
            &user,
            "[source]\nbase_url = \"https://user.example\"\nper_page = 200\n\n[windows]\nexecutive_term_days = 60\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[source]\nper_page = 50\n\n[output]\nformat = \"table\"\n",
        )
        .unwrap();

        let cfg = resolve_config_with(dir.path(), Some(&user), no_env).unwrap();
        assert_eq!(cfg.source.base_url.as_deref(), Some("https://user.example"));
        assert_eq!(cfg.source.per_page, 50);
        assert_eq!(cfg.windows.executive_term_days, 60);
        assert_eq!(cfg.windows.agreement_expiry_days, 90);
        assert_eq!(cfg.output.format.as_deref(), Some("text"));
    }

    #[test]
    fn environment_beats_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[source]\ndir = \"data\"\n\n[output]\nformat = \"pretty\"\n",
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            ("SYNDIC_SOURCE_DIR", "/srv/exports"),
            ("SYNDIC_TOKEN", "secret"),
            ("FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let cfg = resolve_config_with(dir.path(), None, |key| {
            env.get(key).map(ToString::to_string)
        })
        .unwrap();
        assert_eq!(cfg.source.dir, Some(PathBuf::from("/srv/exports")));
        assert_eq!(cfg.source.token.as_deref(), Some("secret"));
        assert_eq!(cfg.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn token_is_not_serialized() {
        let mut cfg = SyndicConfig::default();
        cfg.source.token = Some("secret".into());
        let rendered = toml::to_string(&cfg).unwrap();
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);

        std::fs::write(&path, "[source]\nper_page = 0\n").unwrap();
        let err = resolve_config_with(dir.path(), None, no_env).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "source.per_page",
                ..
            }
        ));

        std::fs::write(&path, "[output]\nformat = \"xml\"\n").unwrap();
        assert!(resolve_config_with(dir.path(), None, no_env).is_err());

        std::fs::write(&path, "[windows]\nexpiry = 3\n").unwrap();
        assert!(matches!(
            resolve_config_with(dir.path(), None, no_env),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn windows_feed_selectors() {
        let windows = WindowConfig {
            agreement_expiry_days: 10,
            assembly_upcoming_days: 5,
            executive_term_days: 7,
        };
        let selectors = windows.selectors();
        assert_eq!(selectors.agreement_expiry_days, 10);
        assert_eq!(selectors.executive_term_days, 7);
        assert_eq!(selectors.union_id, None);
    }
}
