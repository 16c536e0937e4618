use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::fs;
use std::time::Duration;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub routes_csv: String, // Local path or http(s) URL
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64, // Sessions with no events for this long are dropped
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutesSource {
    Local(PathBuf),
    Remote(String),
}

impl RoutesSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            RoutesSource::Remote(trimmed.to_string())
        } else {
            RoutesSource::Local(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for RoutesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutesSource::Local(path) => write!(f, "{}", path.display()),
            RoutesSource::Remote(url) => f.write_str(url),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    pub fn routes_source(&self) -> RoutesSource {
        RoutesSource::parse(&self.input.routes_csv)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.session_idle_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid server address {}:{}", self.server.host, self.server.port))
    }
}
