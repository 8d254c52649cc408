use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use campusnav_core::CampusGraphConfig;
use serde::Deserialize;

/// Server configuration, read from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub data: DataConfig,
    pub graph: CampusGraphConfig,
    pub outdoor: OutdoorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout_secs: 15,
            concurrency_limit: 256,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Locations of the graph source files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub network: PathBuf,
    pub manual: PathBuf,
    pub pois: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            network: PathBuf::from("data/network.json"),
            manual: PathBuf::from("data/manual.json"),
            pois: PathBuf::from("data/pois.json"),
        }
    }
}

impl DataConfig {
    /// Resolve relative paths against `base`
    pub fn relative_to(&self, base: &Path) -> Self {
        let resolve = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            network: resolve(&self.network),
            manual: resolve(&self.manual),
            pois: resolve(&self.pois),
        }
    }
}

/// Street router used for walks outside the campus
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutdoorConfig {
    /// Base URL of an OSRM-compatible server
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OutdoorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OutdoorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    /// Load a configuration file. Data paths are taken relative to the file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let mut config: ServerConfig = toml::from_str(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        if let Some(dir) = path.parent() {
            config.data = config.data.relative_to(dir);
        }
        Ok(config)
    }
}
