use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::Chain;
use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub chains: Vec<ChainEntry>,
}

impl Config {
    pub fn chain_alias_to_name(&self) -> BTreeMap<String, String> {
        self.chains
            .iter()
            .map(|chain| (chain.alias.clone(), chain.name.clone()))
            .collect()
    }

    /// Configured alias for `chain`, matched by wire value or display name
    pub fn alias_for(&self, chain: Chain) -> Option<&str> {
        self.chains
            .iter()
            .find(|entry| {
                entry.name.eq_ignore_ascii_case(chain.wire_value())
                    || entry.name.eq_ignore_ascii_case(chain.display_name())
            })
            .map(|entry| entry.alias.as_str())
    }

    pub fn backend_url(&self) -> String {
        normalize_backend_url(&self.app.backend_url)
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn parse(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str::<Config>(content)?)
}

/// Load configuration.
///
/// Inline TOML in `SAMPLER_CONFIG_CONTENT` wins. An explicit path must exist;
/// the default location may be missing, in which case defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Ok(content) = std::env::var("SAMPLER_CONFIG_CONTENT") {
        return parse(&content);
    }

    if let Some(path) = explicit {
        return read(path);
    }

    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    read(&path)
}

fn read(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SAMPLER_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("sampler").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("sampler").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "sampler", "sampler")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("sampler"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("sampler"));
    }
    directories::ProjectDirs::from("io", "sampler", "sampler")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_file_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("sampler.log"))
}

pub fn exports_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("exports"))
}

/// Trim, drop trailing `/`, and default the scheme to `http://`
pub fn normalize_backend_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[app]
backend_url = "https://sampler.example.com/"

[[chains]]
id = 1
name = "eth"
alias = "Ethereum Mainnet"

[[chains]]
name = "arbitrum"
alias = "Arbitrum One"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.backend_url(), "https://sampler.example.com");
        assert_eq!(config.app.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.chains.len(), 2);
        assert_eq!(config.chains[0].id, Some(1));

        let aliases = config.chain_alias_to_name();
        assert_eq!(aliases.get("Ethereum Mainnet").map(String::as_str), Some("eth"));
        assert_eq!(aliases.get("Arbitrum One").map(String::as_str), Some("arbitrum"));
        assert_eq!(config.alias_for(Chain::Ethereum), Some("Ethereum Mainnet"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL);
        assert_eq!(config.app.timeout_secs, 60);
        assert!(config.chain_alias_to_name().is_empty());
        assert_eq!(config.alias_for(Chain::Ethereum), None);
    }

    #[test]
    fn test_alias_matches_display_name() {
        let config = parse("[[chains]]\nname = \"ethereum\"\nalias = \"Mainnet\"\n").unwrap();
        assert_eq!(config.alias_for(Chain::Ethereum), Some("Mainnet"));
        assert_eq!(config.alias_for(Chain::Arbitrum), None);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(parse("[app\nbackend_url = 1"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let missing = std::env::temp_dir().join("sampler-definitely-missing.toml");
        if std::env::var_os("SAMPLER_CONFIG_CONTENT").is_none() {
            assert!(matches!(load(Some(&missing)), Err(ConfigError::Read { .. })));
        }
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, SAMPLE).unwrap();
        let config = read(&path).unwrap();
        assert_eq!(config.chains.len(), 2);
    }

    #[test]
    fn test_normalize_backend_url() {
        assert_eq!(normalize_backend_url("localhost:8080"), "http://localhost:8080");
        assert_eq!(normalize_backend_url(" http://a.b/api/ "), "http://a.b/api");
        assert_eq!(normalize_backend_url("https://x.y"), "https://x.y");
    }
}
