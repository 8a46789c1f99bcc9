use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub grafana: GrafanaConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// When both login and password are set, the whole adapter surface
    /// requires basic auth with these credentials.
    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub password: String,
}

/// Upstream Grafana instance and its admin credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GrafanaConfig {
    pub host: String,

    #[serde(default = "default_grafana_port")]
    pub port: u16,

    pub login: String,

    pub password: String,

    #[serde(default = "default_grafana_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_request_timeout() -> u64 {
    30
}
fn default_grafana_port() -> u16 {
    3000
}
fn default_grafana_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration validation error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("grafana.host is required")]
    MissingGrafanaHost,

    #[error("grafana.login and grafana.password are required")]
    MissingGrafanaCredentials,

    #[error("server.login and server.password must be set together")]
    PartialServerCredentials,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (later overrides earlier):
    /// 1. `config/default.toml`
    /// 2. `config/local.toml` (optional)
    /// 3. Environment variables prefixed with `GA` (e.g. `GA__SERVER__PORT`)
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides, without
    /// touching the filesystem.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 3001
            request_timeout_secs = 30
            login = ""
            password = ""

            [grafana]
            host = "http://localhost"
            port = 3000
            login = "admin"
            password = "admin"
            timeout_secs = 5

            [logging]
            level = "info"
            format = "json"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.grafana.host.is_empty() {
            return Err(ConfigValidationError::MissingGrafanaHost);
        }
        if self.grafana.login.is_empty() || self.grafana.password.is_empty() {
            return Err(ConfigValidationError::MissingGrafanaCredentials);
        }
        if self.server.login.is_empty() != self.server.password.is_empty() {
            return Err(ConfigValidationError::PartialServerCredentials);
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("invalid server host/port configuration")
    }

    /// Base URL of the upstream instance.
    pub fn grafana_url(&self) -> String {
        format!("{}:{}", self.grafana.host, self.grafana.port)
    }

    pub fn grafana_timeout(&self) -> Duration {
        Duration::from_secs(self.grafana.timeout_secs)
    }

    /// Adapter-level basic auth credentials, when configured.
    pub fn adapter_credentials(&self) -> Option<(&str, &str)> {
        if self.server.login.is_empty() || self.server.password.is_empty() {
            None
        } else {
            Some((&self.server.login, &self.server.password))
        }
    }
}
