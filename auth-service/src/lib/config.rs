use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment as EnvironmentSource;
use config::File;
use serde::Deserialize;

/// Deployment tier the service runs in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origin allowed to call the API with credentials.
    #[serde(default)]
    pub frontend_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    /// Frontend and API live on different sites.
    #[serde(default)]
    pub cross_site: bool,
}

/// Optional Argon2 work-factor overrides.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub memory_cost_kib: Option<u32>,
    pub time_cost: Option<u32>,
    pub parallelism: Option<u32>,
}

fn default_port() -> u16 {
    5000
}

fn default_expires_in() -> String {
    "15m".to_string()
}

fn default_cookie_name() -> String {
    "auth_token".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            frontend_url: None,
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            domain: None,
            cross_site: false,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// The environment tier defaults to `RUN_MODE`, falling back to development.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("environment", run_mode.as_str())?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(environment_source())
            .build()?;

        Self::from_builder(configuration)
    }

    /// Deserialize and validate an assembled configuration.
    pub fn from_builder(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret is required".to_string()));
        }

        self.token_ttl()?;

        Ok(())
    }

    /// Session token lifetime parsed from `jwt.expires_in`.
    ///
    /// Cookies carry whole seconds, so anything shorter than one second is rejected.
    pub fn token_ttl(&self) -> Result<Duration, ConfigError> {
        let ttl = auth::parse_duration(&self.jwt.expires_in)
            .map_err(|e| ConfigError::Message(format!("jwt.expires_in: {}", e)))?;

        if ttl < Duration::seconds(1) {
            return Err(ConfigError::Message(format!(
                "jwt.expires_in: {} is shorter than one second",
                self.jwt.expires_in
            )));
        }

        Ok(ttl)
    }

    /// Password hasher tuned by the `password` section.
    pub fn password_hasher(&self) -> Result<auth::PasswordHasher, ConfigError> {
        let PasswordConfig {
            memory_cost_kib,
            time_cost,
            parallelism,
        } = self.password;

        if memory_cost_kib.is_none() && time_cost.is_none() && parallelism.is_none() {
            return Ok(auth::PasswordHasher::new());
        }

        auth::PasswordHasher::with_params(
            memory_cost_kib.unwrap_or(argon2_defaults::M_COST),
            time_cost.unwrap_or(argon2_defaults::T_COST),
            parallelism.unwrap_or(argon2_defaults::P_COST),
        )
        .map_err(|e| ConfigError::Message(format!("password: {}", e)))
    }
}

/// Unprefixed variables with `__` between path segments.
fn environment_source() -> EnvironmentSource {
    EnvironmentSource::default().separator("__")
}

/// Argon2id defaults (RFC 9106 second recommended option, as used by the argon2 crate).
mod argon2_defaults {
    pub const M_COST: u32 = 19 * 1024;
    pub const T_COST: u32 = 2;
    pub const P_COST: u32 = 1;
}
