use std::env;
use std::path::PathBuf;

use crate::models::ModelEndpoint;

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub endpoints: Option<Vec<ModelEndpoint>>,
}

#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub max_per_day: u32,
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub huggingface: Option<HuggingFaceConfig>,
    pub quota: Option<QuotaConfig>,
    pub server: Option<ServerConfig>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        HuggingFaceConfig {
            api_key: None,
            endpoints: None,
        }
    }
}

impl HuggingFaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the credential from `HUGGINGFACE_API_KEY`, falling back to the
    /// legacy `VITE_`-prefixed alias.
    pub fn from_env() -> Self {
        let api_key = env::var("HUGGINGFACE_API_KEY")
            .ok()
            .or_else(|| env::var("VITE_HUGGINGFACE_API_KEY").ok())
            .filter(|key| !key.is_empty());

        HuggingFaceConfig {
            api_key,
            endpoints: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<ModelEndpoint>) -> Self {
        self.endpoints = Some(endpoints);
        self
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        QuotaConfig {
            max_per_day: 5,
            store_path: None,
        }
    }
}

impl QuotaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let max_per_day = env::var("ORNAGEN_MAX_PER_DAY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        let store_path = env::var("ORNAGEN_QUOTA_PATH").ok().map(PathBuf::from);

        QuotaConfig {
            max_per_day,
            store_path,
        }
    }

    pub fn with_max_per_day(mut self, max_per_day: u32) -> Self {
        self.max_per_day = max_per_day;
        self
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: None,
            port: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").ok();
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        ServerConfig { host, port }
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            huggingface: None,
            quota: None,
            server: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            huggingface: Some(HuggingFaceConfig::from_env()),
            quota: Some(QuotaConfig::from_env()),
            server: Some(ServerConfig::from_env()),
        }
    }

    pub fn with_huggingface(mut self, config: HuggingFaceConfig) -> Self {
        self.huggingface = Some(config);
        self
    }

    pub fn with_quota(mut self, config: QuotaConfig) -> Self {
        self.quota = Some(config);
        self
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = Some(config);
        self
    }
}
