//! Configuration loader
//!
//! Loads [`ClientConfig`] from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Start from the built-in defaults
//! 2. Layer the first config file found by [`probe_config_paths`] on top
//! 3. Layer `CTGFORGE_*` environment variables on top of that
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `CTGFORGE_BASE_URL`: API base URL
//! - `CTGFORGE_TIMEOUT_SECS`: Request timeout in (fractional) seconds
//! - `CTGFORGE_USER_AGENT`: User-Agent header value
//! - `CTGFORGE_PAGE_SIZE`: Records per search page
//! - `CTGFORGE_MAX_RETRIES`: Retries after the first attempt
//! - `CTGFORGE_BACKOFF_BASE_SECS`: Base backoff delay in seconds
//! - `CTGFORGE_BACKOFF_CAP_SECS`: Maximum backoff delay in seconds
//! - `CTGFORGE_JITTER_FRACTION`: Symmetric jitter fraction (0.0 - 1.0)
//! - `CTGFORGE_RETRYABLE_STATUS_CODES`: Comma-separated status codes
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./ctgforge.toml`, `./ctgforge.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ctgforge_domain::{CtgError, Result};

use super::settings::ClientConfig;

const ENV_PREFIX: &str = "CTGFORGE_";
const CONFIG_FILE_NAMES: [&str; 4] = ["ctgforge.toml", "ctgforge.json", "config.toml", "config.json"];

/// Load configuration with file and environment layering
///
/// A missing config file is not an error; the defaults are used instead.
///
/// # Errors
/// Returns `CtgError::Config` if a file or variable cannot be parsed, or
/// the final configuration fails validation.
pub fn load() -> Result<ClientConfig> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            ClientConfig::default()
        }
    };

    let config = apply_env_overrides(base, env_lookup)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from defaults plus environment variables
///
/// # Errors
/// Returns `CtgError::Config` if a variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let config = apply_env_overrides(ClientConfig::default(), env_lookup)?;
    config.validate()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and
/// TOML formats (detected by file extension). Keys missing from the file
/// keep their defaults.
///
/// # Errors
/// Returns `CtgError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CtgError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CtgError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CtgError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CtgError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CtgError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CtgError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.join("..");
        dirs.extend([cwd, parent]);
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Layer `CTGFORGE_*` variables from `lookup` on top of `config`
///
/// `lookup` receives the unprefixed name (e.g. `PAGE_SIZE`), which keeps
/// the parsing testable without touching the process environment.
///
/// # Errors
/// Returns `CtgError::Config` naming the variable whose value is invalid.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("BASE_URL") {
        config.base_url = url;
    }
    if let Some(secs) = parse_var::<f64, _>(&lookup, "TIMEOUT_SECS")? {
        config.timeout = seconds("TIMEOUT_SECS", secs)?;
    }
    if let Some(agent) = lookup("USER_AGENT") {
        config.user_agent = agent;
    }
    if let Some(size) = parse_var(&lookup, "PAGE_SIZE")? {
        config.page_size = size;
    }
    if let Some(retries) = parse_var(&lookup, "MAX_RETRIES")? {
        config.retry.max_retries = retries;
    }
    if let Some(secs) = parse_var::<f64, _>(&lookup, "BACKOFF_BASE_SECS")? {
        config.retry.backoff_base = seconds("BACKOFF_BASE_SECS", secs)?;
    }
    if let Some(secs) = parse_var::<f64, _>(&lookup, "BACKOFF_CAP_SECS")? {
        config.retry.backoff_cap = seconds("BACKOFF_CAP_SECS", secs)?;
    }
    if let Some(fraction) = parse_var(&lookup, "JITTER_FRACTION")? {
        config.retry.jitter_fraction = fraction;
    }
    if let Some(codes) = lookup("RETRYABLE_STATUS_CODES") {
        config.retry.retryable_status_codes = codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| {
                code.parse::<u16>().map_err(|e| invalid_var("RETRYABLE_STATUS_CODES", code, e))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(config)
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| invalid_var(name, &raw, e)))
        .transpose()
}

fn seconds(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|e| invalid_var(name, &secs.to_string(), e))
}

fn invalid_var(name: &str, raw: &str, err: impl std::fmt::Display) -> CtgError {
    CtgError::Config(format!("Invalid {ENV_PREFIX}{name} value {raw:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_all_vars_set() {
        let lookup = lookup_from(&[
            ("BASE_URL", "http://localhost:9000/api/v2"),
            ("TIMEOUT_SECS", "2.5"),
            ("USER_AGENT", "ctgforge-tests"),
            ("PAGE_SIZE", "10"),
            ("MAX_RETRIES", "2"),
            ("BACKOFF_BASE_SECS", "0.1"),
            ("BACKOFF_CAP_SECS", "1"),
            ("JITTER_FRACTION", "0"),
            ("RETRYABLE_STATUS_CODES", "429, 503"),
        ]);

        let config = apply_env_overrides(ClientConfig::default(), lookup).unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/api/v2");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.user_agent, "ctgforge-tests");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.backoff_base, Duration::from_millis(100));
        assert_eq!(config.retry.backoff_cap, Duration::from_secs(1));
        assert_eq!(config.retry.jitter_fraction, 0.0);
        assert_eq!(config.retry.retryable_status_codes, vec![429, 503]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_keep_unset_values() {
        let config = apply_env_overrides(ClientConfig::default(), lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_env_overrides_invalid_number() {
        let err = apply_env_overrides(ClientConfig::default(), lookup_from(&[("PAGE_SIZE", "lots")]))
            .unwrap_err();
        assert!(matches!(err, CtgError::Config(ref msg) if msg.contains("CTGFORGE_PAGE_SIZE")));

        let err = apply_env_overrides(
            ClientConfig::default(),
            lookup_from(&[("BACKOFF_CAP_SECS", "-1")]),
        )
        .unwrap_err();
        assert!(matches!(err, CtgError::Config(_)));

        let err = apply_env_overrides(
            ClientConfig::default(),
            lookup_from(&[("RETRYABLE_STATUS_CODES", "429,abc")]),
        )
        .unwrap_err();
        assert!(matches!(err, CtgError::Config(_)));
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "base_url": "http://localhost:8080/api/v2",
            "page_size": 50,
            "retry": { "max_retries": 3, "backoff_base": 0.2 }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api/v2");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.backoff_base, Duration::from_millis(200));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/ctgforge.toml")));
        assert!(matches!(result, Err(CtgError::Config(_))));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
user_agent = "toml-agent"

[retry]
retryable_status_codes = [503]
"#;

        let config = parse_config(toml_content, &PathBuf::from("ctgforge.toml")).unwrap();
        assert_eq!(config.user_agent, "toml-agent");
        assert_eq!(config.retry.retryable_status_codes, vec![503]);
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "page_size": "#, &PathBuf::from("config.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("page_size: 10", &PathBuf::from("ctgforge.yaml"));
        assert!(matches!(result, Err(CtgError::Config(ref msg)) if msg.contains("yaml")));
    }
}
