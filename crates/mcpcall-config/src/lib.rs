//! Layered TOML configuration for mcpcall.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mcpcall_mcp::{EndpointConfig, RequestIdPolicy};
use mcpcall_types::ConfigError;
use serde::{Deserialize, Serialize};

/// Endpoint used when nothing else is configured.
pub const DEFAULT_MCP_URL: &str = "http://localhost:8000/mcp";

/// Resolved configuration for an mcpcall run.
#[derive(Debug, Clone)]
pub struct McpCallConfig {
    /// Name of the config-file endpoint in use, if one was selected.
    pub endpoint_name: Option<String>,
    pub endpoint: EndpointConfig,
    pub config_dir: PathBuf,
}

/// Settings that can be read from the TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub default_endpoint: Option<String>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointConfig>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub sequential_ids: bool,
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// `MCP_URL`
    pub url: Option<String>,
    /// `MCP_API_KEY`
    pub api_key: Option<String>,
    /// `MCPCALL_ENDPOINT`
    pub endpoint: Option<String>,
    /// `MCPCALL_TIMEOUT_MS`, unparsed
    pub timeout_ms: Option<String>,
}

impl EnvOverrides {
    /// Snapshot the relevant environment variables. Empty values count as unset.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            url: var("MCP_URL"),
            api_key: var("MCP_API_KEY"),
            endpoint: var("MCPCALL_ENDPOINT"),
            timeout_ms: var("MCPCALL_TIMEOUT_MS"),
        }
    }
}

impl McpCallConfig {
    /// Load configuration from all sources, applying precedence rules.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables
    /// 3. Config file (~/.mcpcall/config.toml)
    /// 4. Defaults
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let config_dir = config_dir();
        let settings = load_settings_file(&config_dir.join("config.toml"));
        Self::resolve(overrides, EnvOverrides::from_env(), settings, config_dir)
    }

    /// Merge already-gathered sources into a final configuration.
    pub fn resolve(
        overrides: CliOverrides,
        env: EnvOverrides,
        mut settings: SettingsFile,
        config_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        // Endpoint selection: CLI > env > file default
        let endpoint_name = overrides
            .endpoint
            .or(env.endpoint)
            .or(settings.default_endpoint.take());

        let mut endpoint = match &endpoint_name {
            Some(name) => settings.endpoints.remove(name).ok_or_else(|| {
                ConfigError::UnknownEndpoint {
                    name: name.clone(),
                    path: config_dir.join("config.toml").display().to_string(),
                }
            })?,
            None => EndpointConfig::new(DEFAULT_MCP_URL),
        };

        if let Some(url) = overrides.url.or(env.url) {
            endpoint.url = url;
        }
        endpoint.url = endpoint.url.trim().to_string();
        if endpoint.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "url".into(),
                message: "endpoint URL must not be empty".into(),
            });
        }

        if let Some(api_key) = overrides.api_key.or(env.api_key) {
            endpoint.api_key = Some(api_key);
        }

        let env_timeout = env
            .timeout_ms
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: "MCPCALL_TIMEOUT_MS".into(),
                        message: format!("'{raw}' is not a number of milliseconds: {e}"),
                    })
            })
            .transpose()?;
        if let Some(timeout_ms) = overrides.timeout_ms.or(env_timeout) {
            endpoint.timeout_ms = Some(timeout_ms);
        }
        if endpoint.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "timeout_ms".into(),
                message: "must be greater than zero (omit it to wait indefinitely)".into(),
            });
        }

        if overrides.sequential_ids {
            endpoint.request_ids = RequestIdPolicy::Sequential;
        }

        Ok(McpCallConfig {
            endpoint_name,
            endpoint,
            config_dir,
        })
    }
}

/// Get the mcpcall config directory path (~/.mcpcall/).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MCPCALL_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mcpcall")
}

/// Load and parse a TOML settings file, returning defaults on any error.
pub fn load_settings_file(path: &Path) -> SettingsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            SettingsFile::default()
        }),
        Err(_) => SettingsFile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpcall_mcp::AuthScheme;

    const SAMPLE: &str = r#"
default_endpoint = "resume"

[endpoints.resume]
url = "https://anix.ngrok.app/mcp"
api_key = "file-key"
timeout_ms = 30000

[endpoints.local]
url = "http://localhost:8000/mcp"
auth_scheme = "bearer"
request_ids = "sequential"
"#;

    fn sample_settings() -> SettingsFile {
        toml::from_str(SAMPLE).unwrap()
    }

    fn resolve(
        overrides: CliOverrides,
        env: EnvOverrides,
        settings: SettingsFile,
    ) -> Result<McpCallConfig, ConfigError> {
        McpCallConfig::resolve(overrides, env, settings, PathBuf::from("/tmp/mcpcall-test"))
    }

    #[test]
    fn test_default_settings() {
        let settings = SettingsFile::default();
        assert!(settings.default_endpoint.is_none());
        assert!(settings.endpoints.is_empty());
    }

    #[test]
    fn test_settings_toml_parse() {
        let settings = sample_settings();
        assert_eq!(settings.default_endpoint.as_deref(), Some("resume"));
        assert_eq!(settings.endpoints.len(), 2);
        assert_eq!(settings.endpoints["local"].auth_scheme, AuthScheme::Bearer);
    }

    #[test]
    fn defaults_without_any_source() {
        let config = resolve(
            CliOverrides::default(),
            EnvOverrides::default(),
            SettingsFile::default(),
        )
        .unwrap();
        assert!(config.endpoint_name.is_none());
        assert_eq!(config.endpoint, EndpointConfig::new(DEFAULT_MCP_URL));
    }

    #[test]
    fn file_default_endpoint_is_used() {
        let config = resolve(
            CliOverrides::default(),
            EnvOverrides::default(),
            sample_settings(),
        )
        .unwrap();
        assert_eq!(config.endpoint_name.as_deref(), Some("resume"));
        assert_eq!(config.endpoint.url, "https://anix.ngrok.app/mcp");
        assert_eq!(config.endpoint.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.endpoint.timeout_ms, Some(30000));
    }

    #[test]
    fn env_endpoint_beats_file_default() {
        let env = EnvOverrides {
            endpoint: Some("local".into()),
            ..EnvOverrides::default()
        };
        let config = resolve(CliOverrides::default(), env, sample_settings()).unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:8000/mcp");
        assert_eq!(config.endpoint.request_ids, RequestIdPolicy::Sequential);
    }

    #[test]
    fn cli_endpoint_beats_env() {
        let env = EnvOverrides {
            endpoint: Some("local".into()),
            ..EnvOverrides::default()
        };
        let overrides = CliOverrides {
            endpoint: Some("resume".into()),
            ..CliOverrides::default()
        };
        let config = resolve(overrides, env, sample_settings()).unwrap();
        assert_eq!(config.endpoint_name.as_deref(), Some("resume"));
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let overrides = CliOverrides {
            endpoint: Some("prod".into()),
            ..CliOverrides::default()
        };
        match resolve(overrides, EnvOverrides::default(), sample_settings()) {
            Err(ConfigError::UnknownEndpoint { name, path }) => {
                assert_eq!(name, "prod");
                assert!(path.ends_with("config.toml"));
            }
            other => panic!("Expected UnknownEndpoint, got {other:?}"),
        }
    }

    #[test]
    fn url_and_key_precedence() {
        let env = EnvOverrides {
            url: Some("http://env/mcp".into()),
            api_key: Some("env-key".into()),
            ..EnvOverrides::default()
        };
        let config = resolve(CliOverrides::default(), env.clone(), sample_settings()).unwrap();
        assert_eq!(config.endpoint.url, "http://env/mcp");
        assert_eq!(config.endpoint.api_key.as_deref(), Some("env-key"));

        let overrides = CliOverrides {
            url: Some("http://cli/mcp".into()),
            api_key: Some("cli-key".into()),
            ..CliOverrides::default()
        };
        let config = resolve(overrides, env, sample_settings()).unwrap();
        assert_eq!(config.endpoint.url, "http://cli/mcp");
        assert_eq!(config.endpoint.api_key.as_deref(), Some("cli-key"));
    }

    #[test]
    fn env_timeout_is_parsed() {
        let env = EnvOverrides {
            timeout_ms: Some(" 2500 ".into()),
            ..EnvOverrides::default()
        };
        let config = resolve(CliOverrides::default(), env, SettingsFile::default()).unwrap();
        assert_eq!(config.endpoint.timeout_ms, Some(2500));
    }

    #[test]
    fn bad_env_timeout_is_rejected() {
        let env = EnvOverrides {
            timeout_ms: Some("soon".into()),
            ..EnvOverrides::default()
        };
        match resolve(CliOverrides::default(), env, SettingsFile::default()) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "MCPCALL_TIMEOUT_MS"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let overrides = CliOverrides {
            timeout_ms: Some(0),
            ..CliOverrides::default()
        };
        assert!(matches!(
            resolve(overrides, EnvOverrides::default(), SettingsFile::default()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn blank_url_is_rejected() {
        let overrides = CliOverrides {
            url: Some("   ".into()),
            ..CliOverrides::default()
        };
        match resolve(overrides, EnvOverrides::default(), SettingsFile::default()) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "url"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn sequential_flag_overrides_file_policy() {
        let overrides = CliOverrides {
            sequential_ids: true,
            ..CliOverrides::default()
        };
        let config = resolve(overrides, EnvOverrides::default(), sample_settings()).unwrap();
        assert_eq!(config.endpoint.request_ids, RequestIdPolicy::Sequential);
    }

    #[test]
    fn settings_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let settings = load_settings_file(&path);
        assert_eq!(settings.endpoints.len(), 2);
    }

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_file(&dir.path().join("config.toml"));
        assert!(settings.endpoints.is_empty());
    }

    #[test]
    fn malformed_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_endpoint = [unterminated").unwrap();
        let settings = load_settings_file(&path);
        assert!(settings.default_endpoint.is_none());
    }
}
