//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the client credentials are not set there, falls back to a file
//! 3. Probes the working directory and its parents for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GINI_CLIENT_ID`: Client id (required)
//! - `GINI_CLIENT_SECRET`: Client secret (required)
//! - `GINI_USERNAME` / `GINI_PASSWORD`: Credentials for the password grant
//! - `GINI_AUTH_CODE`: Pre-obtained authorization code
//! - `GINI_SCOPES`: Comma separated scopes
//! - `GINI_API_URL`: Resource API base URL
//! - `GINI_USER_CENTER_URL`: Identity service base URL
//! - `GINI_API_VERSION`: API version, e.g. `v1`
//! - `GINI_AUTHENTICATION`: `oauth2` or `basicAuth`
//!
//! ## File Locations
//! The loader probes `gini.toml`, `gini.json`, `config.toml` and
//! `config.json` in the current working directory, then in each parent
//! directory up to the filesystem root.
//!
//! Loaded configurations are not verified; [`Config::verify`] runs when the
//! client is built.

use std::path::{Path, PathBuf};

use giniapi_domain::{AuthStrategy, Config, ConfigError, ConfigResult};

const CONFIG_FILE_NAMES: [&str; 4] = ["gini.toml", "gini.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the client
/// credentials are missing there, falls back to a config file.
///
/// # Errors
/// Returns `ConfigError::Load` if neither source yields a configuration,
/// and `ConfigError::Invalid` for malformed environment values.
pub fn load() -> ConfigResult<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(ConfigError::Load(reason)) => {
            tracing::debug!(%reason, "environment incomplete, trying config file");
            load_from_file(None)
        }
        Err(err) => Err(err),
    }
}

/// Load configuration from environment variables
///
/// `GINI_CLIENT_ID` and `GINI_CLIENT_SECRET` must be set; every other
/// variable is optional.
///
/// # Errors
/// Returns `ConfigError::Load` if a required variable is missing and
/// `ConfigError::Invalid` if `GINI_AUTHENTICATION` names no known strategy.
pub fn load_from_env() -> ConfigResult<Config> {
    let client_id = env_var("GINI_CLIENT_ID")?;
    let client_secret = env_var("GINI_CLIENT_SECRET")?;

    let authentication = match env_opt("GINI_AUTHENTICATION") {
        Some(raw) => raw
            .parse::<AuthStrategy>()
            .map_err(|reason| ConfigError::Invalid { field: "authentication", reason })?,
        None => AuthStrategy::default(),
    };

    let mut config = Config::new(client_id, client_secret, authentication);
    config.username = env_opt("GINI_USERNAME");
    config.password = env_opt("GINI_PASSWORD");
    config.auth_code = env_opt("GINI_AUTH_CODE");
    config.scopes = env_opt("GINI_SCOPES").map(|raw| split_scopes(&raw)).unwrap_or_default();
    if let Some(api) = env_opt("GINI_API_URL") {
        config.endpoints.api = api;
    }
    if let Some(user_center) = env_opt("GINI_USER_CENTER_URL") {
        config.endpoints.user_center = user_center;
    }
    if let Some(version) = env_opt("GINI_API_VERSION") {
        config.api_version = version;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `ConfigError::Load` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> ConfigResult<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Load(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::Load("no config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::Load(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> ConfigResult<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Load(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Load(format!("invalid JSON format: {e}"))),
        _ => Err(ConfigError::Load(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the working directory and its parents for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Get required environment variable
fn env_var(key: &str) -> ConfigResult<String> {
    env_opt(key)
        .ok_or_else(|| ConfigError::Load(format!("missing required environment variable: {key}")))
}

/// Optional environment variable; empty values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 10] = [
        "GINI_CLIENT_ID",
        "GINI_CLIENT_SECRET",
        "GINI_USERNAME",
        "GINI_PASSWORD",
        "GINI_AUTH_CODE",
        "GINI_SCOPES",
        "GINI_API_URL",
        "GINI_USER_CENTER_URL",
        "GINI_API_VERSION",
        "GINI_AUTHENTICATION",
    ];

    fn clear_env() {
        for key in ENV_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        std::env::set_var("GINI_CLIENT_ID", "client");
        std::env::set_var("GINI_CLIENT_SECRET", "secret");
        std::env::set_var("GINI_USERNAME", "user");
        std::env::set_var("GINI_PASSWORD", "pass");
        std::env::set_var("GINI_SCOPES", "read, write,,");
        std::env::set_var("GINI_API_URL", "https://api.example.com");
        std::env::set_var("GINI_API_VERSION", "v2");
        std::env::set_var("GINI_AUTHENTICATION", "basicauth");

        let result = load_from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.client_id, "client");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.user_credentials(), Some(("user", "pass")));
        assert!(config.auth_code.is_none());
        assert_eq!(config.scopes, vec!["read".to_string(), "write".to_string()]);
        assert_eq!(config.endpoints.api, "https://api.example.com");
        assert!(config.endpoints.user_center.is_empty());
        assert_eq!(config.api_version, "v2");
        assert_eq!(config.authentication, AuthStrategy::BasicAuth);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("GINI_CLIENT_ID", "client");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_from_env_unknown_strategy() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("GINI_CLIENT_ID", "client");
        std::env::set_var("GINI_CLIENT_SECRET", "secret");
        std::env::set_var("GINI_AUTHENTICATION", "kerberos");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::Invalid { field: "authentication", .. })));
    }

    #[test]
    fn test_parse_config_json() {
        let json = r#"{
            "client_id": "client",
            "client_secret": "secret",
            "auth_code": "code",
            "authentication": "oauth2"
        }"#;

        let config = parse_config(json, Path::new("gini.json")).unwrap();
        assert_eq!(config.auth_code(), Some("code"));
        assert_eq!(config.authentication, AuthStrategy::OAuth2);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml = r#"
client_id = "client"
client_secret = "secret"
authentication = "basicAuth"
scopes = ["read"]

[endpoints]
api = "https://api.example.com"
"#;

        let config = parse_config(toml, Path::new("gini.toml")).unwrap();
        assert_eq!(config.authentication, AuthStrategy::BasicAuth);
        assert_eq!(config.scopes, vec!["read".to_string()]);
        assert_eq!(config.endpoints.api, "https://api.example.com");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("client_id: x", Path::new("gini.yaml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_probe_prefers_nearest_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("config.json"), "{}").unwrap();
        std::fs::write(root.path().join("a").join("gini.toml"), "").unwrap();

        let found = probe_from(&nested).unwrap();
        assert_eq!(found, root.path().join("a").join("gini.toml"));
    }

    #[test]
    fn test_probe_prefers_gini_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        std::fs::write(dir.path().join("gini.json"), "{}").unwrap();

        assert_eq!(probe_from(dir.path()).unwrap(), dir.path().join("gini.json"));
    }

    #[test]
    fn test_split_scopes() {
        assert_eq!(split_scopes(" a ,b"), vec!["a".to_string(), "b".to_string()]);
        assert!(split_scopes(" , ").is_empty());
    }
}
