use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub booking: BookingConfig,
    #[serde(default)]
    pub sweeper: SweeperConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
    /// Topic carrying one message per created account document.
    pub accounts_topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub from_address: String,
    #[serde(default = "default_sendgrid_url")]
    pub api_url: String,
}

fn default_sendgrid_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Public booking engine origin; slugs are appended as path segments.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SweeperConfig {
    #[serde(default = "default_sweep_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_sweep_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sweep_timeout")]
    pub run_timeout_seconds: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_sweep_interval(),
            page_size: default_sweep_page_size(),
            run_timeout_seconds: default_sweep_timeout(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_sweep_page_size() -> usize {
    500
}

fn default_sweep_timeout() -> u64 {
    120
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file that stays out of git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of LILAC)
            // Eg.. `LILAC__SERVER__PORT=9000` would set `server.port`
            .add_source(config::Environment::with_prefix("LILAC").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
