//! Configuration management for krokify.
//!
//! Parses `krokify.toml` with serde and discovers it in the current directory
//! or its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [kroki]
//! url = "${KROKI_URL:-http://localhost:8001}"
//! kinds = ["plantuml", "mermaid"]
//! timeout_secs = 30
//!
//! [site]
//! dir = "site"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `kroki.url` supports `${VAR}` (error if unset) and `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use krokify_diagrams::{DEFAULT_KROKI_URL, DiagramLanguage};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "krokify.toml";

/// Site directory used when neither the file nor the CLI name one.
const DEFAULT_SITE_DIR: &str = "site";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki server URL.
    pub kroki_url: Option<String>,
    /// Override enabled diagram kinds.
    pub kinds: Option<Vec<String>>,
    /// Override request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rendering service configuration as written in TOML.
    kroki: KrokiConfigRaw,
    /// Site configuration as written in TOML.
    site: SiteConfigRaw,

    /// Resolved rendering service configuration (set after loading).
    #[serde(skip)]
    pub kroki_resolved: KrokiConfig,
    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct KrokiConfigRaw {
    url: Option<String>,
    kinds: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SiteConfigRaw {
    dir: Option<String>,
}

/// Resolved rendering service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrokiConfig {
    /// Kroki server base URL.
    pub url: String,
    /// Diagram kinds recognized on pages.
    pub languages: Vec<DiagramLanguage>,
    /// Per-request timeout. `None` leaves timing to the transport.
    pub timeout: Option<Duration>,
}

impl Default for KrokiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_KROKI_URL.to_owned(),
            languages: DiagramLanguage::DEFAULT_ENABLED.to_vec(),
            timeout: None,
        }
    }
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Built site directory processed when no paths are given.
    pub dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SITE_DIR),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`kroki.url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `krokify.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// CLI settings take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_default();
        let path = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_config(&cwd),
        };

        let (mut config, base) = match path {
            Some(path) => {
                let config = Self::parse_file(&path)?;
                let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                (config, base)
            }
            None => (Self::default(), cwd),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.resolve(&base)?;
        config.validate()?;

        Ok(config)
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Parse a config file and expand environment variables.
    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply CLI settings on top of the file values.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.kroki_url {
            self.kroki.url = Some(url.clone());
        }
        if let Some(kinds) = &settings.kinds {
            self.kroki.kinds = Some(kinds.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.kroki.timeout_secs = Some(timeout_secs);
        }
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.kroki.url {
            self.kroki.url = Some(expand::expand_env(url, "kroki.url")?);
        }
        Ok(())
    }

    /// Resolve raw values: parse kinds and make paths absolute.
    fn resolve(&mut self, base: &Path) -> Result<(), ConfigError> {
        let languages = match &self.kroki.kinds {
            Some(kinds) => kinds
                .iter()
                .map(|kind| {
                    DiagramLanguage::parse(kind).ok_or_else(|| {
                        ConfigError::Validation(format!(
                            "kroki.kinds: unknown diagram kind '{kind}'"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => DiagramLanguage::DEFAULT_ENABLED.to_vec(),
        };

        self.kroki_resolved = KrokiConfig {
            url: self
                .kroki
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_KROKI_URL.to_owned()),
            languages,
            timeout: self.kroki.timeout_secs.map(Duration::from_secs),
        };
        self.site_resolved = SiteConfig {
            dir: base.join(self.site.dir.as_deref().unwrap_or(DEFAULT_SITE_DIR)),
        };

        Ok(())
    }

    /// Validate resolved configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let kroki = &self.kroki_resolved;
        require_non_empty(&kroki.url, "kroki.url")?;
        require_http_url(&kroki.url, "kroki.url")?;

        if kroki.languages.is_empty() {
            return Err(ConfigError::Validation(
                "kroki.kinds must name at least one diagram kind".to_owned(),
            ));
        }
        if kroki.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Validation(
                "kroki.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolved(toml: &str) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(toml)?;
        config.resolve(Path::new("/project"))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = resolved("").unwrap();
        assert_eq!(config.kroki_resolved.url, "http://localhost:8001");
        assert_eq!(
            config.kroki_resolved.languages,
            vec![DiagramLanguage::PlantUml, DiagramLanguage::Mermaid]
        );
        assert_eq!(config.kroki_resolved.timeout, None);
        assert_eq!(config.site_resolved.dir, PathBuf::from("/project/site"));
    }

    #[test]
    fn test_parse_full_config() {
        let config = resolved(
            r#"
[kroki]
url = "https://kroki.example.com"
kinds = ["plantuml", "kroki-mermaid", "dot"]
timeout_secs = 60

[site]
dir = "public"
"#,
        )
        .unwrap();

        assert_eq!(
            config.kroki_resolved,
            KrokiConfig {
                url: "https://kroki.example.com".to_owned(),
                languages: vec![
                    DiagramLanguage::PlantUml,
                    DiagramLanguage::Mermaid,
                    DiagramLanguage::GraphViz,
                ],
                timeout: Some(Duration::from_secs(60)),
            }
        );
        assert_eq!(config.site_resolved.dir, PathBuf::from("/project/public"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = resolved(
            r#"
[kroki]
kinds = ["plantuml", "flowchart"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err:?}");
        assert!(err.to_string().contains("flowchart"));
    }

    #[test]
    fn test_empty_kinds_rejected() {
        let err = resolved("[kroki]\nkinds = []\n").unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = resolved("[kroki]\nurl = \"localhost:8001\"\n").unwrap_err();
        assert!(err.to_string().contains("http://"));

        let err = resolved("[kroki]\nurl = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = resolved("[kroki]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = resolved("[kroki]\nkroki_url = \"http://x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config: Config = toml::from_str(
            r#"
[kroki]
url = "https://kroki.example.com"
kinds = ["plantuml"]
"#,
        )
        .unwrap();

        config.apply_cli_settings(&CliSettings {
            kroki_url: Some("http://127.0.0.1:9000".to_owned()),
            kinds: Some(vec!["mermaid".to_owned(), "d2".to_owned()]),
            timeout_secs: Some(5),
        });
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.kroki_resolved.url, "http://127.0.0.1:9000");
        assert_eq!(
            config.kroki_resolved.languages,
            vec![DiagramLanguage::Mermaid, DiagramLanguage::D2]
        );
        assert_eq!(config.kroki_resolved.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config: Config = toml::from_str("[kroki]\nurl = \"https://kroki.io\"\n").unwrap();
        config.apply_cli_settings(&CliSettings::default());
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.kroki_resolved.url, "https://kroki.io");
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[kroki]\nurl = \"https://kroki.io\"\n[site]\ndir = \"out\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.kroki_resolved.url, "https://kroki.io");
        assert_eq!(config.site_resolved.dir, temp_dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_cli_overrides_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[kroki]\nurl = \"https://kroki.io\"\n").unwrap();

        let settings = CliSettings {
            kroki_url: Some("http://localhost:9999".to_owned()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.kroki_resolved.url, "http://localhost:9999");
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("site/guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(temp_dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_expand_env_vars_kroki_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("KROKIFY_TEST_URL", "https://kroki.test.com");
        }

        let mut config: Config =
            toml::from_str("[kroki]\nurl = \"${KROKIFY_TEST_URL}\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.kroki.url.as_deref(), Some("https://kroki.test.com"));

        unsafe {
            std::env::remove_var("KROKIFY_TEST_URL");
        }
    }
}
