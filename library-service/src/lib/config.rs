use std::env;

use auth::ConfigurationError;
use auth::DemoAccount;
use auth::PasswordParams;
use auth::TokenSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Credential store selection. Without a URL credentials live in memory.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: default_algorithm(),
            expiration_minutes: default_expiration_minutes(),
        }
    }
}

impl JwtConfig {
    /// # Errors
    /// * `TtlOutOfRange` - `expiration_minutes` does not fit in a duration
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigurationError> {
        let ttl = chrono::Duration::try_minutes(self.expiration_minutes)
            .ok_or(ConfigurationError::TtlOutOfRange(self.expiration_minutes))?;

        Ok(TokenSettings {
            secret: self.secret.clone(),
            algorithm: self.algorithm.clone(),
            ttl,
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// Argon2 cost parameters
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = PasswordParams::default();
        Self {
            memory_cost: params.memory_cost,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
        }
    }
}

impl PasswordConfig {
    pub fn params(&self) -> PasswordParams {
        PasswordParams {
            memory_cost: self.memory_cost,
            time_cost: self.time_cost,
            parallelism: self.parallelism,
        }
    }
}

/// Built-in demo login. Off unless explicitly enabled.
#[derive(Deserialize, Clone)]
pub struct DemoConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_demo_username")]
    pub username: String,
    #[serde(default = "default_demo_password")]
    pub password: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username: default_demo_username(),
            password: default_demo_password(),
        }
    }
}

impl DemoConfig {
    /// The demo account, if enabled.
    pub fn account(&self) -> Option<DemoAccount> {
        self.enabled.then(|| DemoAccount {
            subject: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl std::fmt::Debug for DemoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoConfig")
            .field("enabled", &self.enabled)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration_minutes() -> i64 {
    60
}

fn default_demo_username() -> String {
    "admin".to_string()
}

fn default_demo_password() -> String {
    "admin".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, DEMO__ENABLED, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::build(&run_mode, environment())
    }

    fn build(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        configuration.try_deserialize()
    }
}

/// Environment variables with `__` as separator, without a prefix.
/// Example: JWT__SECRET=... overrides jwt.secret
fn environment() -> Environment {
    Environment::default().separator("__").try_parsing(true)
}
