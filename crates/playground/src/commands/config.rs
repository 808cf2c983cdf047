//! Configuration file (playground.toml) and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use playground_manifest::Endpoints;
use playground_server::PlaygroundConfig;

/// Configuration file structure (playground.toml).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default = "default_docs")]
    pub docs: PathBuf,
    /// Project directory the host serves files from
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            docs: default_docs(),
            root: default_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_frontend_entry")]
    pub frontend_entry: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_entry: default_frontend_entry(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndpointsConfig {
    pub frontend_url: Option<String>,
    pub backend_url: Option<String>,
    /// No timeout when unset
    pub prerender_timeout_secs: Option<u64>,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("src/manifest.yaml")
}
fn default_docs() -> PathBuf {
    PathBuf::from("src/openmfe/index.md")
}
fn default_root() -> PathBuf {
    PathBuf::from("src")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7000
}
fn default_frontend_entry() -> String {
    "/frontend/index.ts".to_string()
}

impl ConfigFile {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Override endpoint URLs with `FRONTEND_URL` / `BACKEND_URL`.
    ///
    /// `VITE_FRONTEND_URL` / `VITE_BACKEND_URL` are read when the unprefixed
    /// variable is unset.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| var(name).or_else(|| var(&format!("VITE_{}", name)));

        if let Some(url) = lookup("FRONTEND_URL") {
            self.endpoints.frontend_url = Some(url);
        }
        if let Some(url) = lookup("BACKEND_URL") {
            self.endpoints.backend_url = Some(url);
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            frontend_url: self.endpoints.frontend_url.clone(),
            backend_url: self.endpoints.backend_url.clone(),
        }
    }

    /// Settings for the playground plugin.
    pub fn playground(&self) -> PlaygroundConfig {
        PlaygroundConfig {
            manifest_path: self.paths.manifest.clone(),
            docs_path: self.paths.docs.clone(),
            backend_url: self.endpoints.backend_url.clone(),
            frontend_entry: self.server.frontend_entry.clone(),
            prerender_timeout: self.endpoints.prerender_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Load configuration from `path` if it exists, then apply environment
/// overrides. Returns an error if the file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = ConfigFile::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        config
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        ConfigFile::default()
    };

    config.apply_env(|name| std::env::var(name).ok());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_file() {
        let config = ConfigFile::from_toml("").unwrap();

        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.paths.manifest, PathBuf::from("src/manifest.yaml"));
        assert_eq!(config.paths.docs, PathBuf::from("src/openmfe/index.md"));
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.endpoints.prerender_timeout_secs, None);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = ConfigFile::from_toml(
            r#"
[server]
port = 8080

[endpoints]
backend_url = "http://localhost:3000"
prerender_timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.paths.root, PathBuf::from("src"));

        let playground = config.playground();
        assert_eq!(playground.backend_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(playground.prerender_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playground.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = ConfigFile::from_toml(
            r#"
[endpoints]
frontend_url = "http://file.local"
backend_url = "http://file.local/api"
"#,
        )
        .unwrap();

        config.apply_env(|name| match name {
            "BACKEND_URL" => Some("http://env.local".to_string()),
            _ => None,
        });

        assert_eq!(
            config.endpoints(),
            Endpoints {
                frontend_url: Some("http://file.local".to_string()),
                backend_url: Some("http://env.local".to_string()),
            }
        );
    }

    #[test]
    fn vite_prefixed_variables_are_fallbacks() {
        let mut config = ConfigFile::default();

        config.apply_env(|name| match name {
            "FRONTEND_URL" => Some("http://plain.local".to_string()),
            "VITE_FRONTEND_URL" => Some("http://vite.local".to_string()),
            "VITE_BACKEND_URL" => Some("http://vite.local/api".to_string()),
            _ => None,
        });

        assert_eq!(
            config.endpoints(),
            Endpoints {
                frontend_url: Some("http://plain.local".to_string()),
                backend_url: Some("http://vite.local/api".to_string()),
            }
        );
    }
}
